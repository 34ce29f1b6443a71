//! Review history.
//!
//! Completed reviews are handed to a [`ReviewStore`]. The review pipeline
//! itself never touches storage; the binary decides whether and where to
//! record results.

pub mod store;

use async_trait::async_trait;
use thiserror::Error;

use crate::models::CodeReview;

pub use store::FileStore;

/// Default page size for [`ReviewQuery`].
pub const DEFAULT_LIST_LIMIT: usize = 50;

/// Errors from a review store.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("review history I/O error at {path}: {source}")]
    Io {
        path: std::path::PathBuf,
        source: std::io::Error,
    },

    #[error("failed to encode review record: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("review history is unavailable: no storage directory could be determined")]
    NoDirectory,
}

/// Filter and paging for [`ReviewStore::list`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewQuery {
    pub limit: usize,
    pub skip: usize,
    /// Only reviews recorded for this user, when set.
    pub user_id: Option<String>,
}

impl Default for ReviewQuery {
    fn default() -> Self {
        Self {
            limit: DEFAULT_LIST_LIMIT,
            skip: 0,
            user_id: None,
        }
    }
}

impl ReviewQuery {
    /// Every review, optionally restricted to one user.
    pub fn all(user_id: Option<String>) -> Self {
        Self {
            limit: usize::MAX,
            skip: 0,
            user_id,
        }
    }
}

/// Persistence for completed reviews.
#[async_trait]
pub trait ReviewStore: Send + Sync {
    /// Store a review and return its id.
    async fn insert(&self, review: &CodeReview) -> Result<String, StoreError>;

    /// Fetch one review. Unknown ids yield `Ok(None)`.
    async fn get(&self, id: &str) -> Result<Option<CodeReview>, StoreError>;

    /// Reviews matching `query`, newest first.
    async fn list(&self, query: &ReviewQuery) -> Result<Vec<CodeReview>, StoreError>;
}
