// Data models — the flat record that maps to a database row.
//
// Kept separate from the queries so the shaper and pipeline can use the
// type without depending on rusqlite directly.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One persisted post — the flat shape written to the `posts` table.
///
/// `post_id` is the natural unique key; writing the same id again fully
/// replaces the row. Outer fields (`screen_name`, `created_at`, `text`)
/// always come from the fetched post itself; counters, entities, and
/// `normalized_text` come from the effective post (the repost origin when
/// `is_repost` is set, otherwise the post itself).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PostRecord {
    pub post_id: i64,
    pub screen_name: String,
    pub is_repost: bool,
    pub created_at: DateTime<Utc>,
    /// Minutes between the run's capture instant and `created_at`. Signed —
    /// clock skew can push it negative, and that is stored as-is.
    pub age_minutes: f64,
    pub text: String,
    pub source_post_id: Option<i64>,
    pub source_text: Option<String>,
    pub repost_count: i64,
    pub like_count: i64,
    /// Comma-joined entity values in source order, "" when the post has none.
    pub mentions: String,
    pub tags: String,
    pub urls: String,
    pub media: String,
    pub normalized_text: String,
}
