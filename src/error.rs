// Typed error kinds for the two contracts that need structured failures:
// boundary text decoding and batch persistence. Everything else uses
// anyhow and propagates to main.

use thiserror::Error;

/// A payload from the timeline API was not valid UTF-8.
///
/// Decoding happens exactly once, at the fetch boundary — everything past
/// the source client operates on already-validated `String`s.
#[derive(Debug, Error)]
#[error("response for @{handle} is not valid UTF-8 at byte {offset}")]
pub struct DecodingError {
    pub handle: String,
    pub offset: usize,
}

/// Failure of the persistence batch.
///
/// The batch is unordered and a bad record must not silently sink the
/// whole write, so per-record failures are collected and reported together
/// with the keys that failed. Records not listed were written.
#[derive(Debug, Error)]
pub enum PersistError {
    #[error("{} of {attempted} record(s) failed to upsert: {}", .failed.len(), format_keys(.failed))]
    Batch {
        attempted: usize,
        /// (post_id, underlying error message) for each failed record.
        failed: Vec<(i64, String)>,
    },
}

impl PersistError {
    /// The post ids that failed, for callers that want to retry just those.
    pub fn failed_ids(&self) -> Vec<i64> {
        match self {
            PersistError::Batch { failed, .. } => failed.iter().map(|(id, _)| *id).collect(),
        }
    }
}

fn format_keys(failed: &[(i64, String)]) -> String {
    failed
        .iter()
        .map(|(id, _)| id.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}
