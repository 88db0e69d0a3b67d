// Driftwood: timeline crawler for a fixed set of social accounts.
//
// This is the library root. Each module corresponds to a phase of the
// fetch -> transform -> persist pipeline, plus the shared config and
// error types.

pub mod config;
pub mod db;
pub mod error;
pub mod normalize;
pub mod pipeline;
pub mod record;
pub mod source;
pub mod status;
