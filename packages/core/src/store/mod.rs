//! Persistence Seam
//!
//! The reconciler never owns transport. Loading a website's flat page list
//! and flushing the batched path edits go through the [`PageStore`] trait;
//! [`MemoryPageStore`] is an in-process reference implementation of the
//! contract, used by integration tests.

mod error;
mod memory;
mod page_store;

pub use error::StoreError;
pub use memory::MemoryPageStore;
pub use page_store::PageStore;
