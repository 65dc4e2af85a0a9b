//! URL Path Helpers
//!
//! Leaf-segment extraction and recombination used by path propagation, plus
//! slug generation for page cloning. Paths follow the CMS convention of a
//! trailing `/segment.html`, with index-type pages carrying a two-segment
//! tail (`/blog/index.html`).

use crate::models::{Page, PageType};
use regex::Regex;
use std::sync::OnceLock;

// Trailing `/segment.html` of an ordinary page path
const LEAF_PATTERN: &str = r"/[A-Za-z0-9\-_]*\.html$";

// Trailing `/segment/segment.html` of an index-type page path
const INDEX_LEAF_PATTERN: &str = r"/[A-Za-z0-9\-_]+/[A-Za-z0-9\-_]+\.html$";

// Characters stripped when slugging a page name into a path segment
const SLUG_STRIP_PATTERN: &str = r"[^A-Za-z0-9\-_]+";

// Dash runs left behind by stripping
const DASH_RUN_PATTERN: &str = r"-{2,}";

/// Extract the leaf path segment of a page path.
///
/// Ordinary pages keep their trailing `/segment.html`; index-type pages keep
/// the trailing two segments. Returns `None` when the path does not match
/// the expected shape; the caller decides whether that is recoverable.
pub fn leaf_segment(path: &str, page_type: PageType) -> Option<&str> {
    static LEAF_REGEX: OnceLock<Regex> = OnceLock::new();
    static INDEX_LEAF_REGEX: OnceLock<Regex> = OnceLock::new();

    let regex = if page_type.has_index_path() {
        INDEX_LEAF_REGEX.get_or_init(|| Regex::new(INDEX_LEAF_PATTERN).unwrap())
    } else {
        LEAF_REGEX.get_or_init(|| Regex::new(LEAF_PATTERN).unwrap())
    };

    regex.find(path).map(|m| m.as_str())
}

/// Nest a leaf segment under a parent path.
///
/// Replacing the parent's trailing `.html` with the leaf (which itself
/// starts with `/` and ends in `.html`) turns the parent's own leaf into a
/// directory level: `/blog.html` + `/post.html` = `/blog/post.html`. Only
/// the trailing suffix is touched, so a custom parent path with `.html`
/// elsewhere in it nests correctly; a parent without the suffix (free-form
/// custom path) gets the leaf appended.
pub fn join_under_parent(parent_path: &str, leaf: &str) -> String {
    match parent_path.strip_suffix(".html") {
        Some(stem) => format!("{stem}{leaf}"),
        None => format!("{parent_path}{leaf}"),
    }
}

/// Kebab-case a page name into a path segment
pub fn slugify(name: &str) -> String {
    static STRIP_REGEX: OnceLock<Regex> = OnceLock::new();
    static DASH_RUN_REGEX: OnceLock<Regex> = OnceLock::new();
    let strip = STRIP_REGEX.get_or_init(|| Regex::new(SLUG_STRIP_PATTERN).unwrap());
    let dash_run = DASH_RUN_REGEX.get_or_init(|| Regex::new(DASH_RUN_PATTERN).unwrap());

    let dashed = name.trim().to_lowercase().replace(' ', "-");
    let stripped = strip.replace_all(&dashed, "");
    dash_run
        .replace_all(&stripped, "-")
        .trim_matches('-')
        .to_string()
}

/// Pick a root path for a clone of `page_name` that collides with no existing
/// page path.
///
/// Tries the slugged name first, then appends a counter (`name1`, `name2`,
/// ...) until no existing path contains the candidate segment.
pub fn unique_clone_path(pages: &[Page], page_name: &str) -> String {
    let base = slugify(page_name);
    let mut counter = 0usize;
    loop {
        let candidate = if counter == 0 {
            base.clone()
        } else {
            format!("{base}{counter}")
        };
        if !pages.iter().any(|page| page.path.contains(&candidate)) {
            return format!("/{candidate}.html");
        }
        counter += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PageType;

    fn page_with_path(id: &str, path: &str) -> Page {
        Page::new_with_id(
            id.to_string(),
            id.to_string(),
            path.to_string(),
            PageType::Post,
            None,
        )
    }

    #[test]
    fn test_leaf_segment_ordinary_page() {
        assert_eq!(
            leaf_segment("/blog/my-post.html", PageType::Post),
            Some("/my-post.html")
        );
        assert_eq!(leaf_segment("/home.html", PageType::Landing), Some("/home.html"));
    }

    #[test]
    fn test_leaf_segment_index_page_keeps_two_segments() {
        assert_eq!(
            leaf_segment("/site/blog/index.html", PageType::BlogIndex),
            Some("/blog/index.html")
        );
    }

    #[test]
    fn test_leaf_segment_pattern_miss() {
        assert_eq!(leaf_segment("/no-extension", PageType::Post), None);
        assert_eq!(leaf_segment("not a path", PageType::Post), None);
        // Index pages need two segments
        assert_eq!(leaf_segment("/index.html", PageType::BlogIndex), None);
    }

    #[test]
    fn test_join_under_parent() {
        assert_eq!(join_under_parent("/a.html", "/b.html"), "/a/b.html");
        assert_eq!(
            join_under_parent("/blog/index.html", "/post.html"),
            "/blog/index/post.html"
        );
    }

    #[test]
    fn test_join_anchors_to_trailing_suffix() {
        // A custom parent path with ".html" mid-path must not be split there
        assert_eq!(
            join_under_parent("/x.html-dir/y.html", "/c.html"),
            "/x.html-dir/y/c.html"
        );
        // A free-form custom parent without the suffix keeps the leaf
        assert_eq!(join_under_parent("/custom", "/c.html"), "/custom/c.html");
    }

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("My New Page"), "my-new-page");
        assert_eq!(slugify("  Trim & Strip!  "), "trim-strip");
        assert_eq!(slugify("already-kebab"), "already-kebab");
    }

    #[test]
    fn test_unique_clone_path_appends_counter() {
        let pages = vec![
            page_with_path("a", "/landing.html"),
            page_with_path("b", "/landing1.html"),
        ];

        assert_eq!(unique_clone_path(&pages, "Landing"), "/landing2.html");
        assert_eq!(unique_clone_path(&pages, "Other"), "/other.html");
    }
}
