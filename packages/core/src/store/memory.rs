//! In-Memory Page Store
//!
//! Reference implementation of [`PageStore`] backed by a mutex-guarded map.
//! Serves integration tests and doubles as executable documentation of the
//! contract (batch atomicity, clone id allocation, path conflict rejection).

use crate::models::{Page, UpdatePagesPathRequest};
use crate::store::{PageStore, StoreError};
use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use tokio::sync::Mutex;
use uuid::Uuid;

/// In-process [`PageStore`] implementation
#[derive(Debug, Default)]
pub struct MemoryPageStore {
    websites: Mutex<HashMap<String, Vec<Page>>>,
}

impl MemoryPageStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a website with its flat page list
    pub async fn insert_website(&self, website_id: impl Into<String>, pages: Vec<Page>) {
        self.websites.lock().await.insert(website_id.into(), pages);
    }

    /// Read back a stored page (test introspection)
    pub async fn get_page(&self, website_id: &str, page_id: &str) -> Option<Page> {
        self.websites
            .lock()
            .await
            .get(website_id)?
            .iter()
            .find(|page| page.id == page_id)
            .cloned()
    }
}

#[async_trait]
impl PageStore for MemoryPageStore {
    async fn load_pages(&self, website_id: &str) -> Result<Vec<Page>, StoreError> {
        self.websites
            .lock()
            .await
            .get(website_id)
            .cloned()
            .ok_or_else(|| StoreError::website_not_found(website_id))
    }

    async fn update_pages_path(&self, batch: &UpdatePagesPathRequest) -> Result<(), StoreError> {
        let mut websites = self.websites.lock().await;
        let pages = websites
            .get_mut(&batch.website_id)
            .ok_or_else(|| StoreError::website_not_found(&batch.website_id))?;

        // Validate the whole batch before touching anything, so a bad record
        // cannot leave a half-applied save behind.
        for record in &batch.pages {
            if !pages.iter().any(|page| page.id == record.page_id) {
                return Err(StoreError::page_not_found(&record.page_id));
            }
        }

        let now = Utc::now();
        for record in &batch.pages {
            let page = pages
                .iter_mut()
                .find(|page| page.id == record.page_id)
                .expect("validated above");
            page.page_name = record.page_name.clone();
            page.path = record.path.clone();
            page.parent_id = record.parent_id.clone();
            page.is_custom_path = record.is_custom_path;
            page.updated_at = now;
        }
        Ok(())
    }

    async fn clone_page(
        &self,
        website_id: &str,
        page_id: &str,
        new_path: &str,
    ) -> Result<Page, StoreError> {
        let mut websites = self.websites.lock().await;
        let pages = websites
            .get_mut(website_id)
            .ok_or_else(|| StoreError::website_not_found(website_id))?;

        if pages.iter().any(|page| page.path == new_path) {
            return Err(StoreError::path_conflict(new_path));
        }

        let source = pages
            .iter()
            .find(|page| page.id == page_id)
            .ok_or_else(|| StoreError::page_not_found(page_id))?;

        let mut clone = source.clone();
        clone.id = Uuid::new_v4().to_string();
        clone.path = new_path.to_string();
        clone.parent_id = None;
        clone.updated_at = Utc::now();
        pages.push(clone.clone());
        Ok(clone)
    }
}
