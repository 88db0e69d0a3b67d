// Timeline API client — a thin reqwest wrapper.
//
// Credentials are an explicit value passed in at construction, never
// ambient process state. The gateway authenticates on header values; there
// is no request signing.

use anyhow::{Context, Result};
use tracing::debug;

use crate::config::ApiCredentials;

/// HTTP client for the timeline API.
pub struct TimelineClient {
    client: reqwest::Client,
    base_url: String,
}

impl TimelineClient {
    /// Create a client pointing at the given base URL, authenticating every
    /// request with the given credentials.
    pub fn new(base_url: &str, credentials: &ApiCredentials) -> Result<Self> {
        let mut headers = reqwest::header::HeaderMap::new();
        let mut add = |name: &'static str, value: &str| -> Result<()> {
            let mut value = reqwest::header::HeaderValue::from_str(value)
                .with_context(|| format!("Credential is not a valid header value: {name}"))?;
            value.set_sensitive(true);
            headers.insert(name, value);
            Ok(())
        };
        add("x-consumer-key", &credentials.consumer_key)?;
        add("x-consumer-secret", &credentials.consumer_secret)?;
        add("x-access-token", &credentials.access_token)?;
        add("x-access-secret", &credentials.access_secret)?;

        let client = reqwest::Client::builder()
            .user_agent("driftwood/0.1 (timeline-crawler)")
            .default_headers(headers)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// GET an API path and return the raw response body.
    ///
    /// Returns bytes, not text — UTF-8 validation is the caller's single
    /// explicit decode step.
    pub async fn get_raw(&self, path: &str, params: &[(&str, &str)]) -> Result<Vec<u8>> {
        let url = format!("{}/{}", self.base_url, path.trim_start_matches('/'));

        debug!(path = path, "timeline API GET");

        let response = self
            .client
            .get(&url)
            .query(params)
            .send()
            .await
            .with_context(|| format!("Timeline API request failed: {path}"))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("Timeline API {path} returned {status}: {body}");
        }

        let bytes = response
            .bytes()
            .await
            .with_context(|| format!("Failed to read {path} response body"))?;
        Ok(bytes.to_vec())
    }
}
