// src/checker/mod.rs
// =============================================================================
// Everything that looks at a single document or a single URL.
//
// Submodules:
// - http: fetches pages and probes links, classifies failures
// - html: extracts raw href/src references from HTML
//
// The crawl module decides WHAT to fetch; this module knows HOW.
// =============================================================================

mod html;
mod http;

pub use html::extract_links;
pub use http::{BrokenReason, FetchOutcome, Fetcher, LinkOutcome, TransportError};
