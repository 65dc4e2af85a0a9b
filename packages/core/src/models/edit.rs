//! Pending Edit Records
//!
//! Structural changes (reparent, path rewrite) are captured as [`EditRecord`]
//! snapshots keyed by page id. Records accumulate across any number of drag
//! operations in an [`EditSet`] and are flushed as one
//! [`UpdatePagesPathRequest`] batch; the set is cleared only after the save
//! succeeds, so a failed save leaves everything in place for retry.

use crate::models::Page;
use serde::{Deserialize, Serialize};

/// Snapshot of a page at the moment of its most recent structural change.
///
/// The serialized field names (`pageId`, `pageName`, `path`, `parentId`,
/// `isCustomPath`) are the persistence contract and must not change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EditRecord {
    pub page_id: String,
    pub page_name: String,
    pub path: String,
    pub parent_id: Option<String>,
    pub is_custom_path: bool,
}

impl EditRecord {
    /// Capture the current state of a page
    pub fn snapshot(page: &Page) -> Self {
        Self {
            page_id: page.id.clone(),
            page_name: page.page_name.clone(),
            path: page.path.clone(),
            parent_id: page.parent_id.clone(),
            is_custom_path: page.is_custom_path,
        }
    }
}

/// Accumulated pending edits since the last successful save.
///
/// Keyed by page id with upsert-in-place semantics: a page edited twice keeps
/// its original position in the batch but carries its latest snapshot.
#[derive(Debug, Clone, Default)]
pub struct EditSet {
    records: Vec<EditRecord>,
}

impl EditSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace the record for a page, preserving first-insertion
    /// order across updates
    pub fn upsert(&mut self, record: EditRecord) {
        match self
            .records
            .iter_mut()
            .find(|existing| existing.page_id == record.page_id)
        {
            Some(existing) => *existing = record,
            None => self.records.push(record),
        }
    }

    /// Look up the pending record for a page, if any
    pub fn get(&self, page_id: &str) -> Option<&EditRecord> {
        self.records.iter().find(|record| record.page_id == page_id)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Drop all pending records (after a successful save)
    pub fn clear(&mut self) {
        self.records.clear();
    }

    /// Records in batch order
    pub fn records(&self) -> &[EditRecord] {
        &self.records
    }
}

/// The batched save payload sent to the persistence layer.
///
/// Shape on the wire:
/// `{ "websiteId": ..., "pages": [{ "pageId", "path", "pageName", "parentId", "isCustomPath" }] }`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePagesPathRequest {
    pub website_id: String,
    pub pages: Vec<EditRecord>,
}
