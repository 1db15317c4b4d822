// src/checker/html.rs
// =============================================================================
// This module extracts raw link references from HTML pages.
//
// We use the `scraper` crate which:
// - Parses HTML into a DOM with html5ever (the same algorithm browsers use)
// - Never fails: unterminated tags and stray markup are repaired, not rejected
// - Treats <script> and <style> content as raw text, so markup inside
//   scripts is never mistaken for links
//
// What counts as a link:
// - The value of any `href` attribute (a, link, area, ...)
// - The value of any `src` attribute (img, script, iframe, ...)
//
// Values are returned exactly as written. Resolving them against the page
// URL happens in crawl::normalize. <base> tags are not honored.
// =============================================================================

use scraper::Html;

/// Attributes whose values are treated as link references, in the order
/// they are reported for a single element
const LINK_ATTRIBUTES: [&str; 2] = ["href", "src"];

/// A parsed page that can be scanned for links any number of times
pub struct PageLinks {
    document: Html,
}

impl PageLinks {
    /// Parses the HTML text once
    pub fn parse(html: &str) -> Self {
        Self {
            document: Html::parse_document(html),
        }
    }

    /// Returns the raw href/src values in document order
    ///
    /// The iterator is lazy and borrows the parsed document; calling iter()
    /// again starts over from the first element.
    pub fn iter(&self) -> impl Iterator<Item = &str> + '_ {
        self.document
            .tree
            .root()
            .descendants()
            .filter_map(|node| node.value().as_element())
            .flat_map(|element| {
                LINK_ATTRIBUTES
                    .into_iter()
                    .filter_map(move |name| element.attr(name))
            })
            .filter(|value| !value.trim().is_empty())
    }
}

// Extracts all raw link references from HTML content
//
// Parameters:
//   html: the HTML content to scan
//
// Returns: owned copies of every href/src value, in document order
//
// Example:
//   html = "<a href='/docs'>Docs</a><img src='logo.png'>"
//   result = ["/docs", "logo.png"]
pub fn extract_links(html: &str) -> Vec<String> {
    PageLinks::parse(html).iter().map(str::to_owned).collect()
}
