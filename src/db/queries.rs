// Database queries — all SQL lives here.
//
// Every database interaction goes through this module, keeping the rest
// of the app on clean Rust interfaces.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};

use super::models::PostRecord;

// --- Posts ---

/// Upsert one post by id — a full field-for-field replace, never a merge.
pub fn upsert_post(conn: &Connection, record: &PostRecord) -> Result<()> {
    conn.execute(
        "INSERT INTO posts (post_id, screen_name, is_repost, created_at, age_minutes, text,
                            source_post_id, source_text, repost_count, like_count,
                            mentions, tags, urls, media, normalized_text, fetched_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, datetime('now'))
         ON CONFLICT(post_id) DO UPDATE SET
            screen_name = ?2,
            is_repost = ?3,
            created_at = ?4,
            age_minutes = ?5,
            text = ?6,
            source_post_id = ?7,
            source_text = ?8,
            repost_count = ?9,
            like_count = ?10,
            mentions = ?11,
            tags = ?12,
            urls = ?13,
            media = ?14,
            normalized_text = ?15,
            fetched_at = datetime('now')",
        params![
            record.post_id,
            record.screen_name,
            record.is_repost,
            record.created_at.to_rfc3339(),
            record.age_minutes,
            record.text,
            record.source_post_id,
            record.source_text,
            record.repost_count,
            record.like_count,
            record.mentions,
            record.tags,
            record.urls,
            record.media,
            record.normalized_text,
        ],
    )?;
    Ok(())
}

/// Load one post by id.
pub fn get_post(conn: &Connection, post_id: i64) -> Result<Option<PostRecord>> {
    let mut stmt = conn.prepare(
        "SELECT post_id, screen_name, is_repost, created_at, age_minutes, text,
                source_post_id, source_text, repost_count, like_count,
                mentions, tags, urls, media, normalized_text
         FROM posts WHERE post_id = ?1",
    )?;

    let row = stmt
        .query_row(params![post_id], |row| {
            Ok((
                PostRecord {
                    post_id: row.get(0)?,
                    screen_name: row.get(1)?,
                    is_repost: row.get(2)?,
                    created_at: Utc::now(), // placeholder, parsed below
                    age_minutes: row.get(4)?,
                    text: row.get(5)?,
                    source_post_id: row.get(6)?,
                    source_text: row.get(7)?,
                    repost_count: row.get(8)?,
                    like_count: row.get(9)?,
                    mentions: row.get(10)?,
                    tags: row.get(11)?,
                    urls: row.get(12)?,
                    media: row.get(13)?,
                    normalized_text: row.get(14)?,
                },
                row.get::<_, String>(3)?,
            ))
        })
        .optional()?;

    match row {
        Some((mut record, created_at)) => {
            record.created_at = DateTime::parse_from_rfc3339(&created_at)
                .with_context(|| format!("Bad created_at for post {post_id}: {created_at}"))?
                .with_timezone(&Utc);
            Ok(Some(record))
        }
        None => Ok(None),
    }
}

/// Total number of stored posts.
pub fn post_count(conn: &Connection) -> Result<i64> {
    let count: i64 = conn.query_row("SELECT COUNT(*) FROM posts", [], |row| row.get(0))?;
    Ok(count)
}

/// Number of stored posts per account, ordered by count descending.
pub fn posts_per_account(conn: &Connection) -> Result<Vec<(String, i64)>> {
    let mut stmt = conn.prepare(
        "SELECT screen_name, COUNT(*) FROM posts
         GROUP BY screen_name ORDER BY COUNT(*) DESC",
    )?;
    let rows = stmt.query_map([], |row| Ok((row.get(0)?, row.get(1)?)))?;

    let mut counts = Vec::new();
    for row in rows {
        counts.push(row?);
    }
    Ok(counts)
}

// --- Crawl state ---

/// Get a crawl state value by key (e.g., "last_crawl_at").
pub fn get_crawl_state(conn: &Connection, key: &str) -> Result<Option<String>> {
    let mut stmt = conn.prepare("SELECT value FROM crawl_state WHERE key = ?1")?;
    let result = stmt.query_row(params![key], |row| row.get(0)).optional()?;
    Ok(result)
}

/// Set a crawl state value (upsert).
pub fn set_crawl_state(conn: &Connection, key: &str, value: &str) -> Result<()> {
    conn.execute(
        "INSERT INTO crawl_state (key, value, updated_at)
         VALUES (?1, ?2, datetime('now'))
         ON CONFLICT(key) DO UPDATE SET value = ?2, updated_at = datetime('now')",
        params![key, value],
    )?;
    Ok(())
}
