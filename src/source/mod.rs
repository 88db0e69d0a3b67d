// Source layer — the timeline API the crawl reads from.
//
// `client` is the HTTP plumbing (credentials, raw GETs); `timeline` holds
// the wire types and the per-account fetch. All text entering the system
// is UTF-8 validated here, at the boundary — nothing downstream re-decodes.

pub mod client;
pub mod timeline;
