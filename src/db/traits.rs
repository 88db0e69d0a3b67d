// Store trait — the persistence contract the pipeline writes against.
//
// Methods are async so the SQLite backend (sync rusqlite behind a Mutex)
// and any future native-async backend fit the same interface.

use anyhow::Result;
use async_trait::async_trait;

use super::models::PostRecord;
use crate::error::PersistError;

#[async_trait]
pub trait Store: Send + Sync {
    /// Count the number of user-created tables in the database.
    async fn table_count(&self) -> Result<i64>;

    /// Upsert all records by `post_id` as one unordered batch and return
    /// how many were written.
    ///
    /// A record failure does not stop the batch: remaining records are
    /// still attempted, and the failures come back together as
    /// `PersistError::Batch` naming every failed key.
    async fn upsert_posts(&self, records: &[PostRecord]) -> Result<usize, PersistError>;

    /// Load one stored post by id.
    async fn get_post(&self, post_id: i64) -> Result<Option<PostRecord>>;

    /// Total number of stored posts.
    async fn post_count(&self) -> Result<i64>;

    /// Stored-post counts per account, descending.
    async fn posts_per_account(&self) -> Result<Vec<(String, i64)>>;

    /// Get a crawl state value by key (e.g., "last_crawl_at").
    async fn get_crawl_state(&self, key: &str) -> Result<Option<String>>;

    /// Set a crawl state value (upsert).
    async fn set_crawl_state(&self, key: &str, value: &str) -> Result<()>;
}
