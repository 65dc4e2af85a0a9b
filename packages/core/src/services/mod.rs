//! Business Services
//!
//! This module contains the tree reconciliation logic:
//!
//! - `PageTreeService` - the reconciler: drag lifecycle, filter/search
//!   composition, edit accumulation, batched save
//! - `tree_builder` - flat list to nested snapshot, with dead-end promotion
//! - `cycle` - bounded upward walk rejecting self-ancestor moves
//! - `path` - leaf-segment extraction, path recombination, clone slugs
//! - `Notifier` - operator notification seam

pub mod cycle;
pub mod error;
pub mod notifier;
pub mod page_tree_service;
pub mod path;
pub mod tree_builder;


pub use error::ReconcilerError;
pub use notifier::{Notifier, TracingNotifier};
pub use page_tree_service::{
    BulkTagAction, DragOutcome, DropTarget, PageTreeService, DEFAULT_MAX_ROWS, SHOW_MORE_STEP,
};
pub use tree_builder::build_tree;
