//! PageTree Core Business Logic Layer
//!
//! This crate provides the in-memory tree reconciliation logic behind a
//! website page-hierarchy admin surface: building a nested page tree from a
//! flat list, validating reparenting moves, recomputing URL paths when a
//! subtree moves, and batching the resulting edits for a single save.
//!
//! # Architecture
//!
//! - **Flat list is authoritative**: pages are held as a flat list carrying
//!   `parentId` references; the nested tree handed to rendering layers is a
//!   derived snapshot, rebuilt whenever the working set changes.
//! - **Synchronous mutation**: all tree mutations happen synchronously on a
//!   UI input event. The only async boundary is the batched save, behind the
//!   [`store::PageStore`] trait.
//! - **Edits accumulate**: structural changes are captured as
//!   [`models::EditRecord`] snapshots and flushed as one ordered batch.
//!
//! # Modules
//!
//! - [`models`] - Data structures (Page, EditRecord, tree snapshots)
//! - [`services`] - Tree builder, cycle guard, path propagation, the reconciler
//! - [`store`] - Persistence seam and an in-memory reference implementation

pub mod models;
pub mod services;
pub mod store;

// Re-export commonly used types
pub use models::*;
pub use services::*;
pub use store::*;
