//! Data Models
//!
//! This module contains the core data structures used throughout PageTree:
//!
//! - `Page` - a node in a website's content tree (the unit of display,
//!   tagging, and path assignment)
//! - `PageTreeNode` - the derived nested snapshot handed to rendering layers
//! - `EditRecord` / `EditSet` - pending changes accumulated between saves
//!
//! The flat page list is the single source of truth for hierarchy; nested
//! children only ever exist on derived snapshots.

mod edit;
mod page;

pub use edit::{EditRecord, EditSet, UpdatePagesPathRequest};
pub use page::{Page, PageTag, PageTreeNode, PageType, StatusFilter, ValidationError};
