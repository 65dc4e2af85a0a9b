//! Page Data Structures
//!
//! This module defines the core `Page` struct and related types for the
//! PageTree reconciler.
//!
//! # Architecture
//!
//! - **Flat list authority**: a `Page` carries a `parent_id` reference but
//!   never a children list. The parent relation on the flat list is the
//!   single source of truth; nested children exist only on derived
//!   [`PageTreeNode`] snapshots, rebuilt whenever the working set changes.
//! - **Custom paths**: a page flagged `is_custom_path` is exempt from
//!   automatic path recomputation when its ancestry changes.
//!
//! # Examples
//!
//! ```rust
//! use pagetree_core::models::{Page, PageType};
//!
//! // A root blog index
//! let index = Page::new(
//!     "Blog".to_string(),
//!     "/blog/index.html".to_string(),
//!     PageType::BlogIndex,
//!     None,
//! );
//!
//! // A post underneath it
//! let post = Page::new(
//!     "First post".to_string(),
//!     "/blog/index/first-post.html".to_string(),
//!     PageType::Post,
//!     Some(index.id.clone()),
//! );
//! assert_eq!(post.parent_id.as_deref(), Some(index.id.as_str()));
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Validation errors for Page data
#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Invalid page path '{path}': {reason}")]
    InvalidPath { path: String, reason: String },

    #[error("Invalid parent reference: {0}")]
    InvalidParent(String),
}

/// Type of a page, controlling drag/drop capabilities and path shape.
///
/// Only [`PageType::BlogIndex`] accepts children, and only [`PageType::Blog`]
/// and [`PageType::Post`] may be dragged. Serialized in the wire format's
/// SCREAMING_SNAKE_CASE (`"BLOG_INDEX"` etc.).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PageType {
    Blog,
    BlogIndex,
    Post,
    Landing,
    Legal,
}

impl PageType {
    /// Whether pages may be dropped into a page of this type
    pub fn accepts_children(&self) -> bool {
        matches!(self, PageType::BlogIndex)
    }

    /// Whether a page of this type may be dragged to a new parent
    pub fn is_draggable(&self) -> bool {
        matches!(self, PageType::Blog | PageType::Post)
    }

    /// Index-type pages carry a two-segment leaf path (`/blog/index.html`)
    /// instead of the ordinary single trailing segment.
    pub fn has_index_path(&self) -> bool {
        matches!(self, PageType::BlogIndex)
    }

    /// Wire-format name of this type (e.g. `"BLOG_INDEX"`)
    pub fn as_str(&self) -> &'static str {
        match self {
            PageType::Blog => "BLOG",
            PageType::BlogIndex => "BLOG_INDEX",
            PageType::Post => "POST",
            PageType::Landing => "LANDING",
            PageType::Legal => "LEGAL",
        }
    }
}

/// Free-form tag attached to a page.
///
/// A tag named `title` supplies the page's display name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageTag {
    pub name: String,
    pub content: String,
}

/// A node in a website's content tree.
///
/// # Fields
///
/// - `id`: unique identifier (UUID string)
/// - `page_name`: operator-facing name
/// - `path`: URL path, conventionally ending in `.html`
/// - `page_type`: behavior class (see [`PageType`])
/// - `parent_id`: optional parent reference; `None` means root
/// - `is_custom_path`: exempts the page from automatic path recomputation
/// - `is_enabled`: published (`true`) vs trashed (`false`)
/// - `semantic_tags`: labels used for bulk tagging and filtering
/// - `tags`: free-form tags; the `title` tag supplies the display name
///
/// Note the deliberate absence of a `children` field: the derived children
/// relation lives only on [`PageTreeNode`] snapshots.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page {
    /// Unique identifier
    pub id: String,

    /// Operator-facing page name
    pub page_name: String,

    /// URL path for this page
    pub path: String,

    /// Page type (drag/drop capability and path shape)
    pub page_type: PageType,

    /// Parent page ID (`None` = root)
    pub parent_id: Option<String>,

    /// Path was manually overridden; exempt from automatic recompute
    #[serde(default)]
    pub is_custom_path: bool,

    /// Published (`true`) vs trashed (`false`)
    pub is_enabled: bool,

    /// Content language code (e.g. `"en"`)
    pub language: String,

    /// Vertical / category the page belongs to
    pub vertical: String,

    /// Labels used for bulk tagging and filtering
    #[serde(default)]
    pub semantic_tags: Vec<String>,

    /// Free-form tags; a `title` tag supplies the display name
    #[serde(default)]
    pub tags: Vec<PageTag>,

    /// Last modification timestamp
    pub updated_at: DateTime<Utc>,
}

impl Page {
    /// Create a new enabled Page with an auto-generated UUID
    pub fn new(
        page_name: String,
        path: String,
        page_type: PageType,
        parent_id: Option<String>,
    ) -> Self {
        Self::new_with_id(
            Uuid::new_v4().to_string(),
            page_name,
            path,
            page_type,
            parent_id,
        )
    }

    /// Create a new enabled Page with an explicit ID
    ///
    /// Used when the identifier is assigned elsewhere (backend load, tests).
    pub fn new_with_id(
        id: String,
        page_name: String,
        path: String,
        page_type: PageType,
        parent_id: Option<String>,
    ) -> Self {
        Self {
            id,
            page_name,
            path,
            page_type,
            parent_id,
            is_custom_path: false,
            is_enabled: true,
            language: "en".to_string(),
            vertical: String::new(),
            semantic_tags: Vec::new(),
            tags: Vec::new(),
            updated_at: Utc::now(),
        }
    }

    /// Whether this page is a root (no parent reference)
    pub fn is_root(&self) -> bool {
        self.parent_id.is_none()
    }

    /// Display name: the `title` tag's content if present, else `page_name`
    pub fn display_name(&self) -> &str {
        self.tags
            .iter()
            .find(|tag| tag.name == "title")
            .map(|tag| tag.content.as_str())
            .unwrap_or(&self.page_name)
    }

    /// Case-insensitive free-text match against the searchable fields:
    /// page name, display name, path, vertical, page type name, and (exact)
    /// language code.
    pub fn matches_search(&self, term: &str) -> bool {
        let term = term.trim().to_lowercase();
        if term.is_empty() {
            return true;
        }
        self.page_name.to_lowercase().contains(&term)
            || self.vertical.to_lowercase().contains(&term)
            || self.language.to_lowercase() == term
            || self.path.to_lowercase().contains(&term)
            || self.page_type.as_str().to_lowercase().contains(&term)
            || self.display_name().to_lowercase().contains(&term)
    }

    /// Validate structural invariants of this page
    ///
    /// # Errors
    ///
    /// Returns error if the id is empty, the path is empty or does not start
    /// with `/`, or the parent reference is the page itself.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.id.is_empty() {
            return Err(ValidationError::MissingField("id".to_string()));
        }
        if self.path.is_empty() {
            return Err(ValidationError::InvalidPath {
                path: self.path.clone(),
                reason: "path is empty".to_string(),
            });
        }
        if !self.path.starts_with('/') {
            return Err(ValidationError::InvalidPath {
                path: self.path.clone(),
                reason: "path must start with '/'".to_string(),
            });
        }
        if self.parent_id.as_deref() == Some(self.id.as_str()) {
            return Err(ValidationError::InvalidParent(format!(
                "page '{}' references itself as parent",
                self.id
            )));
        }
        Ok(())
    }
}

/// A node of the derived nested tree snapshot.
///
/// Produced by the tree builder from the flat working set and handed to the
/// rendering layer wholesale; replacing the previous snapshot is the render
/// contract, there is no incremental mutation of a snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageTreeNode {
    pub page: Page,
    pub children: Vec<PageTreeNode>,
}

impl PageTreeNode {
    /// Flatten this subtree in pre-order (parent before children)
    pub fn flatten_into<'a>(&'a self, out: &mut Vec<&'a Page>) {
        out.push(&self.page);
        for child in &self.children {
            child.flatten_into(out);
        }
    }

    /// Total number of pages in this subtree
    pub fn page_count(&self) -> usize {
        1 + self
            .children
            .iter()
            .map(PageTreeNode::page_count)
            .sum::<usize>()
    }
}

/// Status filter applied to the flat page list before the tree is rebuilt
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum StatusFilter {
    /// Every page regardless of status
    All,
    /// Enabled pages only
    #[default]
    Published,
    /// Disabled pages only
    Trashed,
}

impl StatusFilter {
    /// Whether a page passes this filter
    pub fn matches(&self, page: &Page) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Published => page.is_enabled,
            StatusFilter::Trashed => !page.is_enabled,
        }
    }
}
