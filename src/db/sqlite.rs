// SqliteStore — rusqlite backend implementing the Store trait.
//
// The Connection is wrapped in tokio::sync::Mutex because Connection is
// !Send. Trait methods lock the mutex, do synchronous rusqlite work, and
// return; the lock is never held across .await points.

use anyhow::Result;
use async_trait::async_trait;
use rusqlite::Connection;
use tokio::sync::Mutex;

use super::models::PostRecord;
use super::traits::Store;
use crate::error::PersistError;

pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    /// Wrap an already-opened rusqlite Connection.
    pub fn new(conn: Connection) -> Self {
        Self {
            conn: Mutex::new(conn),
        }
    }
}

#[async_trait]
impl Store for SqliteStore {
    async fn table_count(&self) -> Result<i64> {
        let conn = self.conn.lock().await;
        super::schema::table_count(&conn)
    }

    async fn upsert_posts(&self, records: &[PostRecord]) -> Result<usize, PersistError> {
        let conn = self.conn.lock().await;

        let mut written = 0;
        let mut failed = Vec::new();
        for record in records {
            match super::queries::upsert_post(&conn, record) {
                Ok(()) => written += 1,
                Err(e) => failed.push((record.post_id, e.to_string())),
            }
        }

        if failed.is_empty() {
            Ok(written)
        } else {
            Err(PersistError::Batch {
                attempted: records.len(),
                failed,
            })
        }
    }

    async fn get_post(&self, post_id: i64) -> Result<Option<PostRecord>> {
        let conn = self.conn.lock().await;
        super::queries::get_post(&conn, post_id)
    }

    async fn post_count(&self) -> Result<i64> {
        let conn = self.conn.lock().await;
        super::queries::post_count(&conn)
    }

    async fn posts_per_account(&self) -> Result<Vec<(String, i64)>> {
        let conn = self.conn.lock().await;
        super::queries::posts_per_account(&conn)
    }

    async fn get_crawl_state(&self, key: &str) -> Result<Option<String>> {
        let conn = self.conn.lock().await;
        super::queries::get_crawl_state(&conn, key)
    }

    async fn set_crawl_state(&self, key: &str, value: &str) -> Result<()> {
        let conn = self.conn.lock().await;
        super::queries::set_crawl_state(&conn, key, value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::schema::create_tables;
    use chrono::{TimeZone, Utc};

    async fn test_store() -> SqliteStore {
        let conn = Connection::open_in_memory().unwrap();
        create_tables(&conn).unwrap();
        SqliteStore::new(conn)
    }

    fn sample_record(post_id: i64) -> PostRecord {
        PostRecord {
            post_id,
            screen_name: "nytimes".into(),
            is_repost: false,
            created_at: Utc.with_ymd_and_hms(2026, 8, 28, 10, 0, 0).unwrap(),
            age_minutes: 12.5,
            text: "Breaking news".into(),
            source_post_id: None,
            source_text: None,
            repost_count: 3,
            like_count: 40,
            mentions: String::new(),
            tags: "news".into(),
            urls: String::new(),
            media: String::new(),
            normalized_text: "break news".into(),
        }
    }

    #[tokio::test]
    async fn test_upsert_and_get_round_trip() {
        let store = test_store().await;
        let record = sample_record(1);

        let written = store.upsert_posts(&[record.clone()]).await.unwrap();
        assert_eq!(written, 1);

        let loaded = store.get_post(1).await.unwrap().unwrap();
        assert_eq!(loaded, record);
    }

    #[tokio::test]
    async fn test_upsert_same_id_replaces_every_field() {
        let store = test_store().await;
        store.upsert_posts(&[sample_record(1)]).await.unwrap();

        let mut updated = sample_record(1);
        updated.text = "Corrected headline".into();
        updated.tags = String::new();
        updated.like_count = 41;
        updated.age_minutes = 0.5;
        store.upsert_posts(&[updated.clone()]).await.unwrap();

        // Still one row, and it matches the second write wholesale —
        // the first write's tags did not survive as a merge.
        assert_eq!(store.post_count().await.unwrap(), 1);
        let loaded = store.get_post(1).await.unwrap().unwrap();
        assert_eq!(loaded, updated);
    }

    #[tokio::test]
    async fn test_batch_failure_lists_failed_ids_and_keeps_the_rest() {
        let conn = Connection::open_in_memory().unwrap();
        create_tables(&conn).unwrap();
        // Reject one specific id at the SQL level so a single record in
        // the middle of the batch fails
        conn.execute_batch(
            "CREATE TRIGGER reject_poison BEFORE INSERT ON posts
             WHEN NEW.post_id = 666
             BEGIN SELECT RAISE(ABORT, 'rejected'); END;",
        )
        .unwrap();
        let store = SqliteStore::new(conn);

        let err = store
            .upsert_posts(&[sample_record(1), sample_record(666), sample_record(3)])
            .await
            .unwrap_err();

        // The error names exactly the failed key...
        assert_eq!(err.failed_ids(), vec![666]);

        // ...and the other writes stand
        assert_eq!(store.post_count().await.unwrap(), 2);
        assert!(store.get_post(1).await.unwrap().is_some());
        assert!(store.get_post(3).await.unwrap().is_some());
        assert!(store.get_post(666).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_get_missing_post_is_none() {
        let store = test_store().await;
        assert!(store.get_post(404).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_posts_per_account_counts() {
        let store = test_store().await;
        let mut other = sample_record(2);
        other.screen_name = "thetimes".into();
        store
            .upsert_posts(&[sample_record(1), other, sample_record(3)])
            .await
            .unwrap();

        let counts = store.posts_per_account().await.unwrap();
        assert_eq!(counts[0], ("nytimes".to_string(), 2));
        assert_eq!(counts[1], ("thetimes".to_string(), 1));
    }

    #[tokio::test]
    async fn test_crawl_state_round_trip() {
        let store = test_store().await;
        assert!(store.get_crawl_state("last_crawl_at").await.unwrap().is_none());

        store
            .set_crawl_state("last_crawl_at", "2026-08-28T10:00:00Z")
            .await
            .unwrap();
        store
            .set_crawl_state("last_crawl_at", "2026-08-28T11:00:00Z")
            .await
            .unwrap();

        assert_eq!(
            store.get_crawl_state("last_crawl_at").await.unwrap().as_deref(),
            Some("2026-08-28T11:00:00Z")
        );
    }
}
