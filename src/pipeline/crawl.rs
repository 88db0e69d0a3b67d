// The crawl run — one fetch phase, one pure transform phase, one batch
// persist. Single-threaded and synchronous in structure; re-running is
// idempotent because persistence is upsert-replace by post id.

use anyhow::{Context, Result};
use chrono::Utc;
use std::sync::Arc;
use tracing::{info, warn};

use crate::db::Store;
use crate::normalize::TextNormalizer;
use crate::record;
use crate::source::client::TimelineClient;
use crate::source::timeline::{self, RawPost};

/// What one run did, for the terminal summary.
#[derive(Debug, Default)]
pub struct CrawlSummary {
    pub accounts: usize,
    pub accounts_failed: usize,
    pub posts_fetched: usize,
    pub posts_written: usize,
}

/// Run one full crawl: fetch every account's recent posts, shape them
/// against a single capture instant, and upsert the whole batch.
///
/// With `keep_going` unset (the default), one account's fetch failure
/// aborts the run before anything is persisted. With it set, failures are
/// isolated per account: the failing handle is logged and counted, and the
/// other accounts' posts still get processed and persisted.
pub async fn run(
    client: &TimelineClient,
    store: &Arc<dyn Store>,
    accounts: &[String],
    fetch_limit: u32,
    keep_going: bool,
) -> Result<CrawlSummary> {
    let mut summary = CrawlSummary {
        accounts: accounts.len(),
        ..Default::default()
    };

    // One clock reading for the whole batch — every record's age_minutes
    // is measured against this instant.
    let captured_at = Utc::now();

    // --- Fetch phase ---
    let raw_posts: Vec<RawPost> = if keep_going {
        let mut collected = Vec::new();
        for handle in accounts {
            match timeline::fetch_timeline(client, handle, fetch_limit).await {
                Ok(posts) => collected.extend(posts),
                Err(e) => {
                    warn!(handle = %handle, error = %e, "Skipping account after fetch failure");
                    summary.accounts_failed += 1;
                }
            }
        }
        collected
    } else {
        timeline::fetch_recent(client, accounts, fetch_limit).await?
    };
    summary.posts_fetched = raw_posts.len();

    // --- Transform phase (pure) ---
    let normalizer = TextNormalizer::new();
    let records: Vec<_> = raw_posts
        .iter()
        .map(|post| record::shape(post, captured_at, &normalizer))
        .collect();

    // --- Persist phase ---
    summary.posts_written = match store.upsert_posts(&records).await {
        Ok(written) => written,
        Err(e) => {
            // Name the failed keys so a caller can retry just those
            warn!(failed_ids = ?e.failed_ids(), "Post batch failed to persist");
            return Err(e).context("Post batch failed to persist");
        }
    };

    store
        .set_crawl_state("last_crawl_at", &captured_at.to_rfc3339())
        .await?;
    store
        .set_crawl_state("last_crawl_posts", &summary.posts_written.to_string())
        .await?;

    info!(
        accounts = summary.accounts,
        accounts_failed = summary.accounts_failed,
        fetched = summary.posts_fetched,
        written = summary.posts_written,
        "Crawl complete"
    );

    Ok(summary)
}
