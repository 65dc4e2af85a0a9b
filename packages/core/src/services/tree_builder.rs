//! Tree Builder
//!
//! Converts the flat, ordered working set into a nested [`PageTreeNode`]
//! snapshot. Pages whose parent was filtered out of the working set (search,
//! status filter) are promoted to the root level so a page never silently
//! disappears from the rendered tree.

use crate::models::{Page, PageTreeNode};
use std::collections::HashMap;

/// Build a nested tree snapshot from a flat ordered page list.
///
/// Partition the pages into roots (no parent reference) and unattached pages,
/// then repeatedly attach every page whose parent has already been placed.
/// A full pass that attaches nothing means the remaining pages' parents exist
/// only outside the working set; those pages are promoted to the root list
/// ("dead-end promotion").
///
/// Ordering is preserved: roots appear in input order (promoted pages after
/// genuine roots), and each parent's children appear in input order.
///
/// O(n²) worst case (a chain attaches one page per pass); fine at admin-tool
/// scale.
pub fn build_tree(pages: &[Page]) -> Vec<PageTreeNode> {
    let index_of: HashMap<&str, usize> = pages
        .iter()
        .enumerate()
        .map(|(idx, page)| (page.id.as_str(), idx))
        .collect();

    let mut children: Vec<Vec<usize>> = vec![Vec::new(); pages.len()];
    let mut placed = vec![false; pages.len()];
    let mut roots = Vec::new();
    let mut unattached = Vec::new();

    for (idx, page) in pages.iter().enumerate() {
        if page.parent_id.is_none() {
            placed[idx] = true;
            roots.push(idx);
        } else {
            unattached.push(idx);
        }
    }

    while !unattached.is_empty() {
        let before = unattached.len();
        unattached.retain(|&idx| {
            let parent_idx = pages[idx]
                .parent_id
                .as_deref()
                .and_then(|parent_id| index_of.get(parent_id).copied())
                .filter(|&parent_idx| placed[parent_idx]);
            match parent_idx {
                Some(parent_idx) => {
                    children[parent_idx].push(idx);
                    placed[idx] = true;
                    false
                }
                None => true,
            }
        });

        if unattached.len() == before {
            // Dead end: the remaining parents were filtered out of the
            // working set. Promote the stragglers to root.
            tracing::debug!(
                promoted = unattached.len(),
                "promoting pages with hidden parents to the root level"
            );
            roots.append(&mut unattached);
        }
    }

    roots
        .into_iter()
        .map(|idx| build_node(idx, pages, &children))
        .collect()
}

fn build_node(idx: usize, pages: &[Page], children: &[Vec<usize>]) -> PageTreeNode {
    PageTreeNode {
        page: pages[idx].clone(),
        children: children[idx]
            .iter()
            .map(|&child_idx| build_node(child_idx, pages, children))
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PageType;

    fn page(id: &str, parent: Option<&str>) -> Page {
        Page::new_with_id(
            id.to_string(),
            id.to_string(),
            format!("/{id}.html"),
            PageType::Post,
            parent.map(str::to_string),
        )
    }

    fn ids(nodes: &[PageTreeNode]) -> Vec<&str> {
        nodes.iter().map(|node| node.page.id.as_str()).collect()
    }

    #[test]
    fn test_builds_nested_tree() {
        let pages = vec![
            page("a", None),
            page("b", Some("a")),
            page("c", Some("b")),
            page("d", None),
        ];

        let tree = build_tree(&pages);
        assert_eq!(ids(&tree), vec!["a", "d"]);
        assert_eq!(ids(&tree[0].children), vec!["b"]);
        assert_eq!(ids(&tree[0].children[0].children), vec!["c"]);
        assert!(tree[1].children.is_empty());
    }

    #[test]
    fn test_child_order_follows_input_order() {
        let pages = vec![
            page("root", None),
            page("z", Some("root")),
            page("a", Some("root")),
            page("m", Some("root")),
        ];

        let tree = build_tree(&pages);
        assert_eq!(ids(&tree[0].children), vec!["z", "a", "m"]);
    }

    #[test]
    fn test_attachment_is_order_independent() {
        // Child appears before its parent in the flat list; it must still
        // attach (on a later pass) instead of being promoted.
        let pages = vec![page("child", Some("root")), page("root", None)];

        let tree = build_tree(&pages);
        assert_eq!(ids(&tree), vec!["root"]);
        assert_eq!(ids(&tree[0].children), vec!["child"]);
    }

    #[test]
    fn test_dead_end_promotion_keeps_orphans_visible() {
        // "hidden" was filtered out of the working set; its children must be
        // promoted to root rather than dropped.
        let pages = vec![
            page("a", None),
            page("orphan", Some("hidden")),
            page("grandchild", Some("orphan")),
        ];

        let tree = build_tree(&pages);
        // The dead-end pass promotes every remaining page at once, so the
        // orphaned subtree arrives flattened at the root level.
        assert_eq!(ids(&tree), vec!["a", "orphan", "grandchild"]);
        assert!(tree[1].children.is_empty());

        let mut flat = Vec::new();
        for node in &tree {
            node.flatten_into(&mut flat);
        }
        assert_eq!(flat.len(), pages.len());
    }

    #[test]
    fn test_no_data_loss_under_any_partition() {
        let pages = vec![
            page("a", None),
            page("b", Some("a")),
            page("c", Some("b")),
            page("d", Some("missing")),
            page("e", None),
        ];

        let tree = build_tree(&pages);
        let total: usize = tree.iter().map(PageTreeNode::page_count).sum();
        assert_eq!(total, pages.len());

        let mut flat = Vec::new();
        for node in &tree {
            node.flatten_into(&mut flat);
        }

        let mut seen: Vec<&str> = flat.iter().map(|p| p.id.as_str()).collect();
        seen.sort_unstable();
        assert_eq!(seen, vec!["a", "b", "c", "d", "e"]);
    }

    #[test]
    fn test_preorder_is_parent_before_child() {
        let pages = vec![
            page("c", Some("b")),
            page("b", Some("a")),
            page("a", None),
        ];

        let tree = build_tree(&pages);
        let mut flat = Vec::new();
        for node in &tree {
            node.flatten_into(&mut flat);
        }

        for (pos, page) in flat.iter().enumerate() {
            if let Some(parent_id) = page.parent_id.as_deref() {
                let parent_pos = flat.iter().position(|p| p.id == parent_id).unwrap();
                assert!(parent_pos < pos, "parent {parent_id} must precede {}", page.id);
            }
        }
    }

    #[test]
    fn test_parent_cycle_in_data_terminates_and_promotes_flat() {
        // Malformed feed: a <-> b. Neither can attach; both are promoted.
        let pages = vec![
            page("a", Some("b")),
            page("b", Some("a")),
            page("c", None),
        ];

        let tree = build_tree(&pages);
        assert_eq!(ids(&tree), vec!["c", "a", "b"]);
        assert!(tree.iter().all(|node| node.children.is_empty()));
    }
}
