//! Service Layer Error Types
//!
//! Errors raised by the reconciler. None of these are fatal: every variant is
//! scoped to a single operation and leaves the tree in its pre-operation
//! state, recoverable by operator action.

use crate::store::StoreError;
use thiserror::Error;

/// Reconciler operation errors
#[derive(Error, Debug)]
pub enum ReconcilerError {
    /// Page not found in the current working set
    #[error("Page not found: {id}")]
    PageNotFound { id: String },

    /// Invalid parent reference
    #[error("Invalid parent page: {parent_id}")]
    InvalidParent { parent_id: String },

    /// The proposed move would make a page its own ancestor
    #[error("Circular reference detected: {context}")]
    CircularReference { context: String },

    /// Page hierarchy constraint violation (drop target does not accept
    /// children, page type is not draggable, ...)
    #[error("Hierarchy constraint violated: {0}")]
    HierarchyViolation(String),

    /// A page's path does not match the expected trailing-segment shape
    #[error("Path '{path}' of page {page_id} does not match the expected shape")]
    PathPatternMismatch { page_id: String, path: String },

    /// A drop was reported without a drag in progress
    #[error("No drag operation is in progress")]
    NoActiveDrag,

    /// Structural edits are rejected while a save is in flight
    #[error("A save is in flight; retry once it completes")]
    SaveInFlight,

    /// A save completion was reported without a save in flight
    #[error("No save is in flight")]
    NoActiveSave,

    /// The persistence layer rejected an operation (load, batched save,
    /// clone); pending edits are preserved for retry
    #[error("Persistence operation failed: {0}")]
    StoreFailed(#[from] StoreError),
}

impl ReconcilerError {
    /// Create a page not found error
    pub fn page_not_found(id: impl Into<String>) -> Self {
        Self::PageNotFound { id: id.into() }
    }

    /// Create an invalid parent error
    pub fn invalid_parent(parent_id: impl Into<String>) -> Self {
        Self::InvalidParent {
            parent_id: parent_id.into(),
        }
    }

    /// Create a circular reference error
    pub fn circular_reference(context: impl Into<String>) -> Self {
        Self::CircularReference {
            context: context.into(),
        }
    }

    /// Create a hierarchy violation error
    pub fn hierarchy_violation(msg: impl Into<String>) -> Self {
        Self::HierarchyViolation(msg.into())
    }

    /// Create a path pattern mismatch error
    pub fn path_pattern_mismatch(page_id: impl Into<String>, path: impl Into<String>) -> Self {
        Self::PathPatternMismatch {
            page_id: page_id.into(),
            path: path.into(),
        }
    }
}
