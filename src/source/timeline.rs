// Timeline fetching — wire types and the per-account fetch.
//
// The API returns a JSON array of posts per account, newest first. A
// repost carries the original post inline under `reposted_status`; the
// presence of that field is the only repost signal. Entity lists default
// to empty, so "no hashtags" and "entities object missing" deserialize to
// the same thing.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use tracing::{debug, info};

use super::client::TimelineClient;
use crate::error::DecodingError;

/// One post as the source API serves it.
#[derive(Debug, Clone, Deserialize)]
pub struct RawPost {
    pub id: i64,
    pub user: Author,
    pub created_at: DateTime<Utc>,
    pub text: String,
    #[serde(default)]
    pub repost_count: i64,
    #[serde(default)]
    pub like_count: i64,
    /// The original post, present only when this post is a repost.
    #[serde(default)]
    pub reposted_status: Option<Box<RawPost>>,
    #[serde(default)]
    pub entities: Entities,
}

impl RawPost {
    pub fn is_repost(&self) -> bool {
        self.reposted_status.is_some()
    }

    /// The post whose counters, entities, and text are authoritative: the
    /// repost origin if there is one, otherwise this post.
    ///
    /// Resolution is a single level — a repost-of-a-repost (which the
    /// source API is not expected to produce) is not unwound further.
    pub fn effective(&self) -> &RawPost {
        match &self.reposted_status {
            Some(origin) => origin,
            None => self,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Author {
    pub screen_name: String,
}

/// Structured entities, one list per kind. Every list is present —
/// possibly empty, never "missing".
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Entities {
    #[serde(default)]
    pub mentions: Vec<Mention>,
    #[serde(default)]
    pub tags: Vec<Tag>,
    #[serde(default)]
    pub urls: Vec<Link>,
    #[serde(default)]
    pub media: Vec<Media>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Mention {
    pub screen_name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Tag {
    pub text: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Link {
    pub expanded_url: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Media {
    pub media_url: String,
}

/// Fetch up to `limit` recent posts from one account's timeline, in the
/// order the API returns them (newest first).
///
/// The response body is UTF-8 validated here — the one decode step in the
/// system. A bad byte sequence is a typed `DecodingError` naming the
/// handle, not silently lossy text.
pub async fn fetch_timeline(
    client: &TimelineClient,
    handle: &str,
    limit: u32,
) -> Result<Vec<RawPost>> {
    let limit_str = limit.to_string();
    let body = client
        .get_raw(
            "timeline",
            &[("screen_name", handle), ("count", &limit_str)],
        )
        .await
        .with_context(|| format!("Failed to fetch timeline for @{handle}"))?;

    let text = std::str::from_utf8(&body).map_err(|e| DecodingError {
        handle: handle.to_string(),
        offset: e.valid_up_to(),
    })?;

    let posts: Vec<RawPost> = serde_json::from_str(text)
        .with_context(|| format!("Failed to deserialize timeline for @{handle}"))?;

    debug!(handle = handle, count = posts.len(), "Fetched timeline page");

    Ok(posts)
}

/// Fetch recent posts for every handle, concatenated in handle-list order.
///
/// One handle's failure fails the whole batch — per-handle isolation is
/// the pipeline's opt-in, not this function's.
pub async fn fetch_recent(
    client: &TimelineClient,
    handles: &[String],
    limit: u32,
) -> Result<Vec<RawPost>> {
    let mut all_posts = Vec::new();
    for handle in handles {
        let posts = fetch_timeline(client, handle, limit).await?;
        all_posts.extend(posts);
    }

    info!(
        accounts = handles.len(),
        posts = all_posts.len(),
        "Collected timelines"
    );

    Ok(all_posts)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_timeline_payload() {
        let json = r#"[
            {
                "id": 101,
                "user": {"screen_name": "nytimes"},
                "created_at": "2026-08-28T12:00:00Z",
                "text": "Breaking: markets rally",
                "repost_count": 12,
                "like_count": 340,
                "entities": {
                    "tags": [{"text": "markets"}],
                    "urls": [{"expanded_url": "https://example.com/a"}]
                }
            },
            {
                "id": 102,
                "user": {"screen_name": "nytimes"},
                "created_at": "2026-08-28T11:30:00Z",
                "text": "RT @thetimes: original take",
                "reposted_status": {
                    "id": 99,
                    "user": {"screen_name": "thetimes"},
                    "created_at": "2026-08-28T10:00:00Z",
                    "text": "original take",
                    "repost_count": 7,
                    "like_count": 21
                }
            }
        ]"#;

        let posts: Vec<RawPost> = serde_json::from_str(json).unwrap();
        assert_eq!(posts.len(), 2);

        let original = &posts[0];
        assert!(!original.is_repost());
        assert_eq!(original.effective().id, 101);
        assert_eq!(original.entities.tags[0].text, "markets");
        // Absent entity kinds deserialize as empty lists, not errors
        assert!(original.entities.mentions.is_empty());
        assert!(original.entities.media.is_empty());

        let repost = &posts[1];
        assert!(repost.is_repost());
        assert_eq!(repost.effective().id, 99);
        assert_eq!(repost.effective().repost_count, 7);
    }

    #[test]
    fn test_effective_resolves_one_level_only() {
        let json = r#"{
            "id": 3,
            "user": {"screen_name": "a"},
            "created_at": "2026-08-28T12:00:00Z",
            "text": "RT of RT",
            "reposted_status": {
                "id": 2,
                "user": {"screen_name": "b"},
                "created_at": "2026-08-28T11:00:00Z",
                "text": "RT again",
                "reposted_status": {
                    "id": 1,
                    "user": {"screen_name": "c"},
                    "created_at": "2026-08-28T10:00:00Z",
                    "text": "the root post"
                }
            }
        }"#;

        let post: RawPost = serde_json::from_str(json).unwrap();
        // Shallow resolution: the middle post wins, not the root
        assert_eq!(post.effective().id, 2);
    }
}
