//! Cycle Guard
//!
//! Validates a proposed reparent before any mutation: accepting a candidate
//! parent must never make the dragged page its own ancestor. The walk is
//! bounded by the working-set size so a malformed feed (a parent loop already
//! present in the data) cannot hang the check.

use crate::models::Page;
use std::collections::HashMap;

/// Check whether attaching `dragged_id` under `candidate_parent_id` would
/// create a cycle.
///
/// Walks upward from the candidate parent via `parent_id` links within the
/// supplied working set. Reaching the dragged page means the candidate is a
/// descendant of it: cycle. Reaching a root, or a parent outside the working
/// set, terminates with acceptance.
///
/// If the walk exhausts its bound without terminating, the parent relation
/// already contains a loop; the move is rejected rather than trusted.
pub fn would_create_cycle(pages: &[Page], dragged_id: &str, candidate_parent_id: &str) -> bool {
    let parent_of: HashMap<&str, Option<&str>> = pages
        .iter()
        .map(|page| (page.id.as_str(), page.parent_id.as_deref()))
        .collect();

    let mut current = Some(candidate_parent_id);
    for _ in 0..=pages.len() {
        match current {
            None => return false,
            Some(id) if id == dragged_id => return true,
            Some(id) => current = parent_of.get(id).copied().flatten(),
        }
    }

    tracing::warn!(
        dragged_id,
        candidate_parent_id,
        "parent chain did not terminate within the working set; rejecting move"
    );
    true
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

    #[test]
    fn test_rejects_direct_child_as_parent() {
        let pages = vec![page("a", None), page("b", Some("a"))];
        assert!(would_create_cycle(&pages, "a", "b"));
    }

    #[test]
    fn test_rejects_deep_descendant_as_parent() {
        let pages = vec![
            page("a", None),
            page("b", Some("a")),
            page("c", Some("b")),
            page("d", Some("c")),
        ];
        assert!(would_create_cycle(&pages, "a", "d"));
    }

    #[test]
    fn test_accepts_unrelated_parent() {
        let pages = vec![page("a", None), page("b", Some("a")), page("c", None)];
        assert!(!would_create_cycle(&pages, "b", "c"));
        assert!(!would_create_cycle(&pages, "c", "b"));
    }

    #[test]
    fn test_walk_stops_at_parent_outside_working_set() {
        // "b" chains up to a parent that was filtered out; the walk must
        // terminate with acceptance.
        let pages = vec![page("a", None), page("b", Some("hidden"))];
        assert!(!would_create_cycle(&pages, "a", "b"));
    }

    #[test]
    fn test_malformed_parent_loop_is_rejected_not_hung() {
        let pages = vec![page("a", Some("b")), page("b", Some("a")), page("x", None)];
        assert!(would_create_cycle(&pages, "x", "a"));
    }
}
