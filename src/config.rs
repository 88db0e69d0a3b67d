use std::env;

use anyhow::Result;

/// Default per-account fetch cap when DRIFTWOOD_FETCH_LIMIT is unset.
pub const DEFAULT_FETCH_LIMIT: u32 = 200;

/// Timeline API credentials — passed into the client at construction,
/// never read as ambient state by the fetch path.
#[derive(Debug, Clone)]
pub struct ApiCredentials {
    pub consumer_key: String,
    pub consumer_secret: String,
    pub access_token: String,
    pub access_secret: String,
}

impl ApiCredentials {
    fn is_complete(&self) -> bool {
        !self.consumer_key.is_empty()
            && !self.consumer_secret.is_empty()
            && !self.access_token.is_empty()
            && !self.access_secret.is_empty()
    }
}

/// Central configuration loaded from environment variables.
///
/// All secrets come from env vars (never hardcoded). The .env file
/// is loaded automatically at startup via dotenvy.
pub struct Config {
    /// Handles of the followed accounts, in crawl order.
    pub accounts: Vec<String>,
    /// Per-account cap on fetched posts (default 200).
    pub fetch_limit: u32,
    pub api_url: String,
    pub credentials: ApiCredentials,
    pub db_path: String,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Only db_path and fetch_limit have defaults — the account list and
    /// credentials are required for anything beyond `init` and `status`.
    pub fn load() -> Result<Self> {
        let accounts = parse_accounts(&env::var("DRIFTWOOD_ACCOUNTS").unwrap_or_default());

        let fetch_limit = match env::var("DRIFTWOOD_FETCH_LIMIT") {
            Ok(raw) => raw
                .parse()
                .map_err(|_| anyhow::anyhow!("DRIFTWOOD_FETCH_LIMIT is not a number: {raw}"))?,
            Err(_) => DEFAULT_FETCH_LIMIT,
        };

        Ok(Self {
            accounts,
            fetch_limit,
            api_url: env::var("TIMELINE_API_URL").unwrap_or_default(),
            credentials: ApiCredentials {
                consumer_key: env::var("TIMELINE_CONSUMER_KEY").unwrap_or_default(),
                consumer_secret: env::var("TIMELINE_CONSUMER_SECRET").unwrap_or_default(),
                access_token: env::var("TIMELINE_ACCESS_TOKEN").unwrap_or_default(),
                access_secret: env::var("TIMELINE_ACCESS_SECRET").unwrap_or_default(),
            },
            db_path: env::var("DRIFTWOOD_DB_PATH").unwrap_or_else(|_| "./driftwood.db".to_string()),
        })
    }

    /// Check that there is at least one account to crawl.
    pub fn require_accounts(&self) -> Result<()> {
        if self.accounts.is_empty() {
            anyhow::bail!(
                "DRIFTWOOD_ACCOUNTS not set. Add a comma-separated handle list\n\
                 to your .env file, e.g. DRIFTWOOD_ACCOUNTS=nytimes,thetimes"
            );
        }
        Ok(())
    }

    /// Check that the API endpoint and all four credential values are set.
    /// Call this before any operation that talks to the timeline API.
    pub fn require_api(&self) -> Result<()> {
        if self.api_url.is_empty() {
            anyhow::bail!("TIMELINE_API_URL not set. Add it to your .env file.");
        }
        if !self.credentials.is_complete() {
            anyhow::bail!(
                "Timeline API credentials incomplete. Set TIMELINE_CONSUMER_KEY,\n\
                 TIMELINE_CONSUMER_SECRET, TIMELINE_ACCESS_TOKEN, and\n\
                 TIMELINE_ACCESS_SECRET in your .env file."
            );
        }
        Ok(())
    }
}

/// Split a comma-separated handle list, trimming whitespace and any
/// leading @, dropping empty segments.
fn parse_accounts(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|h| h.trim().trim_start_matches('@').to_string())
        .filter(|h| !h.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_accounts_trims_and_skips_empties() {
        assert_eq!(
            parse_accounts(" nytimes, @thetimes ,,guardian"),
            vec!["nytimes", "thetimes", "guardian"]
        );
        assert!(parse_accounts("").is_empty());
        assert!(parse_accounts(" , ").is_empty());
    }
}
