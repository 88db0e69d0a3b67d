// Database schema — table creation.
//
// A `schema_version` table tracks the applied schema so future changes
// can run as versioned migrations. `create_tables` is idempotent and safe
// to call on every startup.

use anyhow::{Context, Result};
use rusqlite::Connection;

/// Create all tables if they don't exist yet.
pub fn create_tables(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "
        -- Tracks schema version for future migrations
        CREATE TABLE IF NOT EXISTS schema_version (
            version INTEGER PRIMARY KEY,
            applied_at TEXT NOT NULL DEFAULT (datetime('now'))
        );

        -- One row per crawled post, keyed on the source post id.
        -- Re-crawling a post replaces the row wholesale.
        CREATE TABLE IF NOT EXISTS posts (
            post_id INTEGER PRIMARY KEY,
            screen_name TEXT NOT NULL,       -- outer author, even for reposts
            is_repost INTEGER NOT NULL,
            created_at TEXT NOT NULL,        -- outer post timestamp, RFC 3339
            age_minutes REAL NOT NULL,       -- capture instant minus created_at
            text TEXT NOT NULL,              -- outer post text
            source_post_id INTEGER,          -- repost origin id (reposts only)
            source_text TEXT,                -- repost origin text (reposts only)
            repost_count INTEGER NOT NULL,   -- from the effective post
            like_count INTEGER NOT NULL,     -- from the effective post
            mentions TEXT NOT NULL,          -- comma-joined handles
            tags TEXT NOT NULL,              -- comma-joined hashtag texts
            urls TEXT NOT NULL,              -- comma-joined expanded links
            media TEXT NOT NULL,             -- comma-joined media links
            normalized_text TEXT NOT NULL,
            fetched_at TEXT NOT NULL DEFAULT (datetime('now'))
        );

        -- Crawl state — last run time and counters for `driftwood status`
        CREATE TABLE IF NOT EXISTS crawl_state (
            key TEXT PRIMARY KEY,
            value TEXT NOT NULL,
            updated_at TEXT NOT NULL DEFAULT (datetime('now'))
        );

        -- Index for per-account lookups
        CREATE INDEX IF NOT EXISTS idx_posts_screen_name
            ON posts(screen_name);

        -- Index for recency queries
        CREATE INDEX IF NOT EXISTS idx_posts_created_at
            ON posts(created_at);
        ",
    )
    .context("Failed to create database tables")?;

    // Record initial schema version if not already set
    conn.execute(
        "INSERT OR IGNORE INTO schema_version (version) VALUES (?1)",
        [1],
    )?;

    Ok(())
}

/// Count the number of tables in the database (useful for init confirmation).
pub fn table_count(conn: &Connection) -> Result<i64> {
    let count: i64 = conn.query_row(
        "SELECT COUNT(*) FROM sqlite_master WHERE type='table' AND name NOT LIKE 'sqlite_%'",
        [],
        |row| row.get(0),
    )?;
    Ok(count)
}
