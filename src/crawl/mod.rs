// src/crawl/mod.rs
// =============================================================================
// This module handles website crawling.
//
// Features:
// - Breadth-first crawling starting from a seed URL
// - Same-origin pages are crawled; cross-origin links are probed once
// - Each URL is fetched at most once (fragments are ignored)
// - Optional depth limit
//
// Submodules:
// - normalize: URL resolution and origin comparison
// - queue: the crawl session (frontier, visited set, external cache)
// - report: what the crawl returns
// =============================================================================

mod normalize;
mod queue;
mod report;

pub use queue::crawl;
pub use report::CrawlReport;

/// Errors that stop a crawl before it starts
///
/// Everything that goes wrong once crawling has begun is recorded as a
/// broken link instead.
#[derive(Debug, thiserror::Error)]
pub enum CrawlError {
    #[error("invalid root URL '{url}': {reason}")]
    InvalidSeed { url: String, reason: String },

    #[error("failed to create HTTP client: {0}")]
    Client(#[from] reqwest::Error),
}
