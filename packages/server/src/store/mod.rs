//! Content record model and storage trait.
//!
//! The store is a key-addressed document store: create, point-read,
//! shallow merge-update, append-to-posts, delete, and a time-ordered
//! paginated scan. Two implementations:
//! - [`MemoryContentStore`] — for tests and development
//! - [`PostgresContentStore`] — JSONB-backed, for production

mod memory;
mod postgres;

pub use memory::MemoryContentStore;
pub use postgres::PostgresContentStore;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// What a record currently primarily represents.
///
/// Tracking field only; the authoritative shape is the `idea`/`posts`
/// contents themselves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentKind {
    Idea,
    Post,
}

impl ContentKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContentKind::Idea => "idea",
            ContentKind::Post => "post",
        }
    }
}

impl std::str::FromStr for ContentKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "idea" => Ok(ContentKind::Idea),
            "post" => Ok(ContentKind::Post),
            other => Err(format!("unknown content kind: {}", other)),
        }
    }
}

/// The unit of persisted work product.
///
/// Invariant: a record with a non-empty `posts` sequence has a non-empty
/// `idea` (posts are never generated without one). The reverse is fine:
/// an idea with no posts just means the post is still pending.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContentRecord {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub kind: ContentKind,
    pub provider: String,
    pub input_text: String,
    #[serde(default)]
    pub reference_posts: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub idea: Option<String>,
    #[serde(default)]
    pub posts: Vec<String>,
}

/// Fields for creating a new record; the store assigns id and timestamps.
#[derive(Debug, Clone)]
pub struct NewContent {
    pub kind: ContentKind,
    pub provider: String,
    pub input_text: String,
    pub reference_posts: Vec<String>,
    pub idea: Option<String>,
    pub posts: Vec<String>,
}

/// A shallow merge-update: only present fields change.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ContentPatch {
    pub kind: Option<ContentKind>,
    pub provider: Option<String>,
    pub input_text: Option<String>,
    pub reference_posts: Option<Vec<String>>,
    pub idea: Option<String>,
    pub posts: Option<Vec<String>>,
}

impl ContentPatch {
    /// True when the patch names no fields at all.
    pub fn is_empty(&self) -> bool {
        self.kind.is_none()
            && self.provider.is_none()
            && self.input_text.is_none()
            && self.reference_posts.is_none()
            && self.idea.is_none()
            && self.posts.is_none()
    }
}

/// Errors from the storage layer.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Underlying database failure
    #[error("storage error: {0}")]
    Database(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// Stored data could not be decoded
    #[error("corrupt record: {0}")]
    Corrupt(String),
}

impl From<sqlx::Error> for StoreError {
    fn from(e: sqlx::Error) -> Self {
        StoreError::Database(Box::new(e))
    }
}

/// Result type alias for store operations.
pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Key-addressed document store for content records.
#[async_trait]
pub trait ContentStore: Send + Sync {
    /// Persist a new record; the store assigns id and timestamps.
    async fn create(&self, draft: NewContent) -> StoreResult<ContentRecord>;

    /// Point-read by id.
    async fn get(&self, id: Uuid) -> StoreResult<Option<ContentRecord>>;

    /// Shallow field-level merge. Refreshes `updated_at`. Returns
    /// `false` (not an error) when the id does not exist.
    async fn merge_update(&self, id: Uuid, patch: ContentPatch) -> StoreResult<bool>;

    /// Append one post variant. Atomic with respect to concurrent
    /// appends to the same record: no appended element is ever lost.
    /// Returns `false` when the id does not exist.
    async fn append_post(&self, id: Uuid, text: &str) -> StoreResult<bool>;

    /// Delete by id. Returns `false` when the id does not exist.
    async fn delete(&self, id: Uuid) -> StoreResult<bool>;

    /// Time-ordered scan, most recently created first.
    async fn list(&self, skip: i64, limit: i64) -> StoreResult<Vec<ContentRecord>>;
}
