// Record shaping — flattens one fetched post into the persisted shape.
//
// Outer fields always come from the post as fetched; counters, entities,
// and the normalized text come from the effective post (the repost origin
// when there is one). The capture instant is taken once per run and passed
// in, so every record of a batch ages against the same clock reading.

use chrono::{DateTime, Utc};

use crate::db::models::PostRecord;
use crate::normalize::TextNormalizer;
use crate::source::timeline::{Entities, RawPost};

/// Shape one raw post into its flat persisted record.
pub fn shape(post: &RawPost, captured_at: DateTime<Utc>, normalizer: &TextNormalizer) -> PostRecord {
    let effective = post.effective();
    let is_repost = post.is_repost();

    // Signed minutes with sub-minute precision; negative under clock skew.
    let age_minutes = (captured_at - post.created_at).num_milliseconds() as f64 / 60_000.0;

    let (source_post_id, source_text) = if is_repost {
        (Some(effective.id), Some(effective.text.clone()))
    } else {
        (None, None)
    };

    // Normalization always runs on the effective text — the origin's text
    // for a repost, never the outer "RT @..." wrapper.
    let normalized_text = normalizer.normalize(&effective.text);

    let entities = &effective.entities;

    PostRecord {
        post_id: post.id,
        screen_name: post.user.screen_name.clone(),
        is_repost,
        created_at: post.created_at,
        age_minutes,
        text: post.text.clone(),
        source_post_id,
        source_text,
        repost_count: effective.repost_count,
        like_count: effective.like_count,
        mentions: join_entities(entities, |e| e.mentions.iter().map(|m| m.screen_name.as_str())),
        tags: join_entities(entities, |e| e.tags.iter().map(|t| t.text.as_str())),
        urls: join_entities(entities, |e| e.urls.iter().map(|u| u.expanded_url.as_str())),
        media: join_entities(entities, |e| e.media.iter().map(|m| m.media_url.as_str())),
        normalized_text,
    }
}

/// Comma-join one entity kind's values, preserving source order. No
/// deduplication; an empty list joins to "".
fn join_entities<'a, F, I>(entities: &'a Entities, select: F) -> String
where
    F: FnOnce(&'a Entities) -> I,
    I: Iterator<Item = &'a str>,
{
    select(entities).collect::<Vec<_>>().join(",")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn raw(json: &str) -> RawPost {
        serde_json::from_str(json).unwrap()
    }

    fn capture() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 8, 28, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_original_post_shapes_from_itself() {
        let post = raw(r#"{
            "id": 101,
            "user": {"screen_name": "nytimes"},
            "created_at": "2026-08-28T11:58:30Z",
            "text": "Check this out! http://x.co/abc #cool",
            "repost_count": 4,
            "like_count": 9,
            "entities": {"tags": [{"text": "cool"}]}
        }"#);

        let record = shape(&post, capture(), &TextNormalizer::new());
        assert_eq!(record.post_id, 101);
        assert_eq!(record.screen_name, "nytimes");
        assert!(!record.is_repost);
        assert_eq!(record.source_post_id, None);
        assert_eq!(record.source_text, None);
        assert_eq!(record.repost_count, 4);
        assert_eq!(record.like_count, 9);
        assert_eq!(record.tags, "cool");
        assert_eq!(record.normalized_text, "check cool");
        // 90 seconds old -> 1.5 minutes
        assert!((record.age_minutes - 1.5).abs() < 1e-9);
    }

    #[test]
    fn test_repost_resolves_effective_post() {
        let post = raw(r#"{
            "id": 1,
            "user": {"screen_name": "nytimes"},
            "created_at": "2026-08-28T11:00:00Z",
            "text": "RT @thetimes: original text",
            "repost_count": 0,
            "like_count": 0,
            "reposted_status": {
                "id": 2,
                "user": {"screen_name": "thetimes"},
                "created_at": "2026-08-28T09:00:00Z",
                "text": "original text",
                "repost_count": 5,
                "like_count": 17,
                "entities": {"mentions": [{"screen_name": "someone"}]}
            }
        }"#);

        let record = shape(&post, capture(), &TextNormalizer::new());
        // Outer fields stay the repost's own
        assert_eq!(record.post_id, 1);
        assert_eq!(record.screen_name, "nytimes");
        assert_eq!(record.text, "RT @thetimes: original text");
        // Everything effective comes from the origin
        assert!(record.is_repost);
        assert_eq!(record.source_post_id, Some(2));
        assert_eq!(record.source_text.as_deref(), Some("original text"));
        assert_eq!(record.repost_count, 5);
        assert_eq!(record.like_count, 17);
        assert_eq!(record.mentions, "someone");
        assert_eq!(record.normalized_text, "origin text");
        // Age is measured against the outer post's timestamp
        assert!((record.age_minutes - 60.0).abs() < 1e-9);
    }

    #[test]
    fn test_empty_entities_join_to_empty_strings() {
        let post = raw(r#"{
            "id": 7,
            "user": {"screen_name": "nytimes"},
            "created_at": "2026-08-28T12:00:00Z",
            "text": "no entities here"
        }"#);

        let record = shape(&post, capture(), &TextNormalizer::new());
        assert_eq!(record.mentions, "");
        assert_eq!(record.tags, "");
        assert_eq!(record.urls, "");
        assert_eq!(record.media, "");
    }

    #[test]
    fn test_entity_order_preserved_without_dedup() {
        let post = raw(r#"{
            "id": 8,
            "user": {"screen_name": "nytimes"},
            "created_at": "2026-08-28T12:00:00Z",
            "text": "tags",
            "entities": {"tags": [{"text": "b"}, {"text": "a"}, {"text": "b"}]}
        }"#);

        let record = shape(&post, capture(), &TextNormalizer::new());
        assert_eq!(record.tags, "b,a,b");
    }

    #[test]
    fn test_clock_skew_yields_negative_age() {
        let post = raw(r#"{
            "id": 9,
            "user": {"screen_name": "nytimes"},
            "created_at": "2026-08-28T12:02:00Z",
            "text": "from the future"
        }"#);

        let record = shape(&post, capture(), &TextNormalizer::new());
        assert!((record.age_minutes + 2.0).abs() < 1e-9);
    }
}
