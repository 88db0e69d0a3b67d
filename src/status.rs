// System status display — DB stats, stored posts, last crawl time.

use anyhow::Result;
use std::sync::Arc;

use crate::db::Store;

/// Display system status to the terminal.
pub async fn show(store: &Arc<dyn Store>, db_path: &str) -> Result<()> {
    // Database file size
    let file_size = std::fs::metadata(db_path)
        .map(|m| format_bytes(m.len()))
        .unwrap_or_else(|_| "unknown".to_string());
    println!("Database: {} ({})", db_path, file_size);

    // Stored posts, broken down by account
    let total = store.post_count().await?;
    println!("Stored posts: {total}");
    for (screen_name, count) in store.posts_per_account().await? {
        println!("  @{screen_name}: {count}");
    }

    // Last crawl
    match store.get_crawl_state("last_crawl_at").await? {
        Some(last_crawl) => {
            let written = store
                .get_crawl_state("last_crawl_posts")
                .await?
                .unwrap_or_else(|| "?".to_string());
            println!("Last crawl: {last_crawl} ({written} posts written)");
        }
        None => {
            println!("Last crawl: never");
            println!("  Run `driftwood crawl` to fetch the followed accounts");
        }
    }

    Ok(())
}

fn format_bytes(bytes: u64) -> String {
    if bytes < 1024 {
        format!("{} B", bytes)
    } else if bytes < 1024 * 1024 {
        format!("{:.1} KB", bytes as f64 / 1024.0)
    } else {
        format!("{:.1} MB", bytes as f64 / (1024.0 * 1024.0))
    }
}
