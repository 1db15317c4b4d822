// src/crawl/queue.rs
// =============================================================================
// This module implements the breadth-first crawl.
//
// How it works:
// 1. Start with the seed URL in a FIFO queue (the frontier)
// 2. Pop the oldest URL, skip it if already visited, otherwise fetch it
// 3. Record a broken link for transport failures and status >= 400
// 4. For HTML pages, extract every href/src and resolve it
// 5. Same-origin links go to the back of the queue
// 6. Cross-origin links are probed once and cached (full mode only)
// 7. Repeat until the queue is empty
//
// All state lives in CrawlSession, which is created per crawl() call and
// consumed into a CrawlReport. Nothing is global.
//
// Nothing that goes wrong with a single URL stops the crawl: every failure
// becomes a BrokenLink and the loop moves on.
// =============================================================================

use std::collections::{BTreeMap, HashMap, HashSet, VecDeque};
use tracing::{debug, info, warn};
use url::Url;

use super::normalize::{parse_seed, resolve, same_origin, strip_fragment};
use super::report::{BrokenLink, CrawlReport};
use super::CrawlError;
use crate::checker::{extract_links, BrokenReason, FetchOutcome, Fetcher, LinkOutcome};
use crate::config::CrawlOptions;

// Represents a page in the crawl queue
#[derive(Debug, Clone)]
struct CrawlItem {
    url: Url,
    found_on: Option<Url>, // The page that linked here (None for the seed)
    depth: usize,          // How many link hops from the seed
}

/// State owned by one crawl run
pub struct CrawlSession {
    seed: Url,
    options: CrawlOptions,
    frontier: VecDeque<CrawlItem>,
    queued: HashSet<Url>,
    visited: HashSet<Url>,
    visit_order: Vec<Url>,
    external: HashMap<Url, LinkOutcome>,
    broken: Vec<BrokenLink>,
}

// Crawls a website starting from a URL
//
// Parameters:
//   seed: The root URL to start crawling from
//   options: mode, timeout, limits (see config.rs)
//
// Returns: the CrawlReport, or an error if the seed URL is unusable or the
// HTTP client cannot be created. No other failure is fatal.
pub async fn crawl(seed: &str, options: CrawlOptions) -> Result<CrawlReport, CrawlError> {
    let seed = parse_seed(seed)?;
    let fetcher = Fetcher::new(&options)?;

    let mut session = CrawlSession::new(seed, options);
    session.run(&fetcher).await;
    Ok(session.into_report())
}

impl CrawlSession {
    pub fn new(seed: Url, options: CrawlOptions) -> Self {
        let mut session = Self {
            seed: seed.clone(),
            options,
            frontier: VecDeque::new(),
            queued: HashSet::new(),
            visited: HashSet::new(),
            visit_order: Vec::new(),
            external: HashMap::new(),
            broken: Vec::new(),
        };
        session.enqueue(CrawlItem {
            url: seed,
            found_on: None,
            depth: 0,
        });
        session
    }

    /// Processes the frontier until it is empty
    pub async fn run(&mut self, fetcher: &Fetcher) {
        info!(seed = %self.seed, mode = ?self.options.mode, "crawl started");

        while let Some(item) = self.frontier.pop_front() {
            self.queued.remove(&item.url);

            // Skip if already visited
            if !self.visited.insert(item.url.clone()) {
                continue;
            }
            self.visit_order.push(item.url.clone());

            if self.options.progress {
                println!("{} {}", self.options.mode.progress_verb(), item.url);
            }

            self.visit(fetcher, item).await;
        }

        info!(
            pages = self.visit_order.len(),
            broken = self.broken.len(),
            external = self.external.len(),
            "crawl finished"
        );
    }

    // Fetches one same-origin page and follows its links
    async fn visit(&mut self, fetcher: &Fetcher, item: CrawlItem) {
        let page = match fetcher.fetch(&item.url).await {
            FetchOutcome::Fetched(page) => page,
            FetchOutcome::Unreachable(err) => {
                self.record_broken(item.url, BrokenReason::Unreachable(err), item.found_on, false);
                return;
            }
        };

        if page.is_error() {
            let status = page.status.as_u16();
            self.record_broken(item.url, BrokenReason::Http(status), item.found_on, false);
            return;
        }

        // Same-origin redirects were followed: the landing page counts as
        // visited too, and is not processed a second time
        let landed_on = strip_fragment(page.final_url.clone());
        if landed_on != item.url {
            if !self.visited.insert(landed_on.clone()) {
                debug!(url = %item.url, target = %landed_on, "redirect to a page already visited");
                return;
            }
            self.visit_order.push(landed_on);
        }

        // The fetcher stops at redirects that leave the origin; the target is
        // treated like any other link on this page and never crawled
        if let Some(target) = page.redirect_to {
            debug!(url = %item.url, target = %target, "redirect not followed");
            self.follow(fetcher, &item, strip_fragment(target), &mut HashSet::new())
                .await;
            return;
        }

        // Only HTML bodies carry links; everything else is a leaf
        let Some(body) = page.body else {
            debug!(url = %item.url, content_type = ?page.content_type, "leaf page");
            return;
        };

        let links = extract_links(&String::from_utf8_lossy(&body));
        debug!(url = %item.url, links = links.len(), "links extracted");

        // The same external URL is reported once per referencing page
        let mut externals_on_page = HashSet::new();

        for raw in links {
            // Relative links resolve against where the page actually lives
            let Some(target) = resolve(&page.final_url, &raw) else {
                continue;
            };
            self.follow(fetcher, &item, strip_fragment(target), &mut externals_on_page)
                .await;
        }
    }

    // Same-origin targets are queued; cross-origin targets are probed
    // (full mode only), once per referencing page
    async fn follow(
        &mut self,
        fetcher: &Fetcher,
        from: &CrawlItem,
        target: Url,
        externals_on_page: &mut HashSet<Url>,
    ) {
        if same_origin(&self.seed, &target) {
            if self.within_depth(from.depth) {
                self.enqueue(CrawlItem {
                    url: target,
                    found_on: Some(from.url.clone()),
                    depth: from.depth + 1,
                });
            }
        } else if self.options.mode.checks_external() && externals_on_page.insert(target.clone()) {
            self.check_external(fetcher, target, &from.url).await;
        }
    }

    // Probes a cross-origin link at most once per run
    async fn check_external(&mut self, fetcher: &Fetcher, url: Url, found_on: &Url) {
        let outcome = match self.external_outcome(&url) {
            LinkOutcome::Unchecked => {
                let outcome = fetcher.check(&url).await;
                self.external.insert(url.clone(), outcome.clone());
                outcome
            }
            cached => cached,
        };

        if let LinkOutcome::Broken(reason) = outcome {
            self.record_broken(url, reason, Some(found_on.clone()), true);
        }
    }

    /// The cached result for an external URL (`Unchecked` if never probed)
    pub fn external_outcome(&self, url: &Url) -> LinkOutcome {
        self.external.get(url).cloned().unwrap_or(LinkOutcome::Unchecked)
    }

    // Adds a same-origin URL to the back of the queue unless it has been
    // visited or is already waiting
    fn enqueue(&mut self, item: CrawlItem) {
        if self.visited.contains(&item.url) || self.queued.contains(&item.url) {
            return;
        }
        self.queued.insert(item.url.clone());
        self.frontier.push_back(item);
    }

    fn within_depth(&self, depth: usize) -> bool {
        self.options.max_depth.map_or(true, |max| depth < max)
    }

    fn record_broken(&mut self, url: Url, reason: BrokenReason, found_on: Option<Url>, external: bool) {
        warn!(%url, status = %reason.status_label(), diagnostic = %reason.diagnostic(), "broken link");
        self.broken.push(BrokenLink {
            url,
            reason,
            found_on,
            external,
        });
    }

    pub fn into_report(self) -> CrawlReport {
        CrawlReport {
            seed: self.seed,
            mode: self.options.mode,
            visited: self.visit_order,
            broken: self.broken,
            external: self.external.into_iter().collect::<BTreeMap<_, _>>(),
        }
    }
}
