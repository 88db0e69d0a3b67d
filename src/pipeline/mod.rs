// Pipeline — wiring the fetch, transform, and persist phases into runs.

pub mod crawl;
