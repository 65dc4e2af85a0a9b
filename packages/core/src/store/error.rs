//! Persistence Error Types

use thiserror::Error;

/// Persistence operation errors
///
/// Save failures are non-fatal: the reconciler preserves its edit set on any
/// error so the operator can simply save again.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Unknown website
    #[error("Website not found: {website_id}")]
    WebsiteNotFound { website_id: String },

    /// Unknown page within a known website
    #[error("Page not found: {id}")]
    PageNotFound { id: String },

    /// A clone target path is already taken
    #[error("Path already in use: {path}")]
    PathConflict { path: String },

    /// Backend temporarily unreachable; the operation may be retried
    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

impl StoreError {
    /// Create a website not found error
    pub fn website_not_found(website_id: impl Into<String>) -> Self {
        Self::WebsiteNotFound {
            website_id: website_id.into(),
        }
    }

    /// Create a page not found error
    pub fn page_not_found(id: impl Into<String>) -> Self {
        Self::PageNotFound { id: id.into() }
    }

    /// Create a path conflict error
    pub fn path_conflict(path: impl Into<String>) -> Self {
        Self::PathConflict { path: path.into() }
    }

    /// Create an unavailable error
    pub fn unavailable(msg: impl Into<String>) -> Self {
        Self::Unavailable(msg.into())
    }
}
