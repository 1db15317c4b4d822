// src/crawl/report.rs
// =============================================================================
// What a finished crawl hands back to the caller.
//
// The report is plain data: main.rs decides whether to print it as text or
// JSON and which exit code to use.
// =============================================================================

use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use url::Url;

use crate::checker::{BrokenReason, LinkOutcome};
use crate::config::CrawlMode;

/// Exit code when every link was fine
pub const EXIT_OK: i32 = 0;

/// Exit code when at least one broken link was found
pub const EXIT_BROKEN: i32 = 2;

/// One reference that could not be fetched successfully
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BrokenLink {
    pub url: Url,
    pub reason: BrokenReason,
    /// The page that referenced this URL (None for the seed itself)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub found_on: Option<Url>,
    /// True for cross-origin links checked with the lightweight probe
    pub external: bool,
}

impl fmt::Display for BrokenLink {
    // (url, status-or-ERROR, diagnostic) [found on <page>]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "({}, {}, {})",
            self.url,
            self.reason.status_label(),
            self.reason.diagnostic()
        )?;
        if let Some(page) = &self.found_on {
            write!(f, " found on {}", page)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CrawlReport {
    pub seed: Url,
    pub mode: CrawlMode,
    /// Same-origin URLs in the order they were visited
    pub visited: Vec<Url>,
    /// Broken references in crawl order
    pub broken: Vec<BrokenLink>,
    /// Every cross-origin URL that was probed, with its outcome
    pub external: BTreeMap<Url, LinkOutcome>,
}

impl CrawlReport {
    pub fn has_broken_links(&self) -> bool {
        !self.broken.is_empty()
    }

    pub fn exit_code(&self) -> i32 {
        if self.has_broken_links() {
            EXIT_BROKEN
        } else {
            EXIT_OK
        }
    }
}
