// src/cli.rs
// =============================================================================
// This file defines our command-line interface using the `clap` crate.
//
// There is a single command:
//
//   link-check [ROOT_URL] [--internal-only] [--json] ...
//
// A few flags can also be set through LINK_CHECK_* environment variables,
// which is handy in CI where the command line lives in a shared script.
// =============================================================================

use clap::Parser;
use std::time::Duration;

use crate::config::{
    CrawlMode, CrawlOptions, DEFAULT_MAX_BODY_BYTES, DEFAULT_ROOT_URL, DEFAULT_TIMEOUT_SECS,
    DEFAULT_USER_AGENT,
};

#[derive(Parser, Debug)]
#[command(
    name = "link-check",
    version,
    about = "Crawl a website and report broken links",
    long_about = "link-check crawls every same-origin page reachable from ROOT_URL, \
                  checks each cross-origin link once, and exits with code 2 if anything is broken."
)]
pub struct Cli {
    /// Root URL to start crawling from
    #[arg(default_value = DEFAULT_ROOT_URL)]
    pub root_url: String,

    /// Only check same-origin links; never contact other hosts
    #[arg(long)]
    pub internal_only: bool,

    /// Print the report as JSON instead of text (progress lines are suppressed)
    #[arg(long)]
    pub json: bool,

    /// Network timeout per request, in seconds
    #[arg(long, env = "LINK_CHECK_TIMEOUT", default_value_t = DEFAULT_TIMEOUT_SECS)]
    pub timeout: u64,

    /// User-Agent header sent with every request
    #[arg(long, env = "LINK_CHECK_USER_AGENT", default_value = DEFAULT_USER_AGENT)]
    pub user_agent: String,

    /// Maximum link hops from the root page (default: unlimited)
    #[arg(long)]
    pub max_depth: Option<usize>,

    /// How many bytes of each HTML page to scan for links
    #[arg(long, default_value_t = DEFAULT_MAX_BODY_BYTES)]
    pub max_body_bytes: usize,

    /// Increase log output on stderr (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

impl Cli {
    pub fn mode(&self) -> CrawlMode {
        if self.internal_only {
            CrawlMode::InternalOnly
        } else {
            CrawlMode::Full
        }
    }

    pub fn crawl_options(&self) -> CrawlOptions {
        CrawlOptions {
            mode: self.mode(),
            timeout: Duration::from_secs(self.timeout),
            user_agent: self.user_agent.clone(),
            max_body_bytes: self.max_body_bytes,
            max_depth: self.max_depth,
            progress: !self.json,
        }
    }
}
