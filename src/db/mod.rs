// Database layer — SQLite storage for crawled posts and crawl state.
//
// rusqlite with the "bundled" feature, so there's no system SQLite
// dependency. The database file lives wherever DRIFTWOOD_DB_PATH points
// (defaults to ./driftwood.db).

pub mod models;
pub mod queries;
pub mod schema;
pub mod sqlite;
pub mod traits;

pub use self::traits::Store;

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use rusqlite::Connection;

use self::sqlite::SqliteStore;

/// Open (or create) the database and run migrations.
///
/// This is the main entry point — called by `driftwood init` and by any
/// command that needs database access.
pub fn initialize(db_path: &str) -> Result<Arc<dyn Store>> {
    // Create parent directories if needed
    if let Some(parent) = Path::new(db_path).parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory for database: {db_path}"))?;
        }
    }

    let conn = Connection::open(db_path)
        .with_context(|| format!("Failed to open database at {db_path}"))?;

    // WAL mode for better concurrent read performance
    conn.pragma_update(None, "journal_mode", "WAL")?;

    schema::create_tables(&conn)?;

    Ok(Arc::new(SqliteStore::new(conn)))
}

/// Open an existing database (fails if it doesn't exist yet).
pub fn open(db_path: &str) -> Result<Arc<dyn Store>> {
    if !Path::new(db_path).exists() {
        anyhow::bail!("Database not found at {db_path}. Run `driftwood init` first.");
    }

    let conn = Connection::open(db_path)
        .with_context(|| format!("Failed to open database at {db_path}"))?;

    conn.pragma_update(None, "journal_mode", "WAL")?;

    Ok(Arc::new(SqliteStore::new(conn)))
}
