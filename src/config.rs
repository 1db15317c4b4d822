// src/config.rs
// =============================================================================
// Options that control a single crawl run.
//
// The CLI (src/cli.rs) builds a CrawlOptions from flags and environment
// variables. Tests build one directly with struct update syntax:
//
//   CrawlOptions { mode: CrawlMode::InternalOnly, ..CrawlOptions::default() }
// =============================================================================

use serde::Serialize;
use std::time::Duration;

/// Root URL used when none is given on the command line
pub const DEFAULT_ROOT_URL: &str = "http://127.0.0.1:8000";

/// User-Agent header sent with every request
pub const DEFAULT_USER_AGENT: &str = "azaccess-link-checker/1.0";

/// Network timeout per request, in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 5;

/// How much of an HTML body we read before scanning it for links (64 KiB)
pub const DEFAULT_MAX_BODY_BYTES: usize = 64 * 1024;

/// Which links get verified during a crawl
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CrawlMode {
    /// Crawl same-origin pages and check every cross-origin link once
    Full,
    /// Crawl same-origin pages only; cross-origin links are never requested
    InternalOnly,
}

impl CrawlMode {
    /// The word printed in front of each visited URL
    pub fn progress_verb(self) -> &'static str {
        match self {
            CrawlMode::Full => "Crawling",
            CrawlMode::InternalOnly => "Checking",
        }
    }

    pub fn checks_external(self) -> bool {
        self == CrawlMode::Full
    }
}

#[derive(Debug, Clone)]
pub struct CrawlOptions {
    pub mode: CrawlMode,
    pub timeout: Duration,
    pub user_agent: String,
    pub max_body_bytes: usize,
    /// Maximum link hops from the seed page (None = follow everything)
    pub max_depth: Option<usize>,
    /// Print a progress line to stdout for every visited URL
    pub progress: bool,
}

impl Default for CrawlOptions {
    fn default() -> Self {
        Self {
            mode: CrawlMode::Full,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
            max_depth: None,
            progress: true,
        }
    }
}
