//! Page Store Trait
//!
//! Async persistence contract between the reconciler and whatever backend an
//! embedding application wires in. The reconciler only ever reads a website's
//! flat page list at open time and writes the accumulated path edits as one
//! batch; cloning is included because it allocates server-side state (the new
//! page id).

use crate::models::{Page, UpdatePagesPathRequest};
use crate::store::StoreError;
use async_trait::async_trait;

/// Persistence backend for website pages
#[async_trait]
pub trait PageStore: Send + Sync {
    /// Load the full flat page list of a website
    async fn load_pages(&self, website_id: &str) -> Result<Vec<Page>, StoreError>;

    /// Apply a batch of path/parent edits atomically
    ///
    /// Either every record in the batch is applied or none is; a failed save
    /// must leave the stored pages untouched so the client can retry the same
    /// batch.
    async fn update_pages_path(&self, batch: &UpdatePagesPathRequest) -> Result<(), StoreError>;

    /// Clone an existing page under a fresh id at `new_path`
    async fn clone_page(
        &self,
        website_id: &str,
        page_id: &str,
        new_path: &str,
    ) -> Result<Page, StoreError>;
}
