// src/crawl/normalize.rs
// =============================================================================
// URL normalization and origin comparison.
//
// - resolve(): turn an href/src value into an absolute, fetchable URL
// - strip_fragment(): the crawl identity key (/page#a == /page#b)
// - same_origin(): decides frontier (internal) vs external check
// - parse_seed(): validates the root URL before any crawling starts
// =============================================================================

use url::Url;

use super::CrawlError;

// References with these prefixes never point at something we can fetch
const IGNORED_PREFIXES: [&str; 3] = ["javascript:", "mailto:", "tel:"];

// Resolves a possibly-relative reference against the page it was found on
//
// Examples (base = "https://example.com/docs/page"):
//   "/about"            -> Some("https://example.com/about")
//   "../other"          -> Some("https://example.com/other")
//   "https://other.com" -> Some("https://other.com/")
//   "#section"          -> None (pure fragment)
//   "mailto:a@b.c"      -> None
//   "data:text/plain,x" -> None (not http/https)
pub fn resolve(base: &Url, raw_href: &str) -> Option<Url> {
    let href = raw_href.trim();
    if href.is_empty() || href.starts_with('#') {
        return None;
    }

    let lowered = href.to_ascii_lowercase();
    if IGNORED_PREFIXES.iter().any(|prefix| lowered.starts_with(prefix)) {
        return None;
    }

    let url = base.join(href).ok()?;
    match url.scheme() {
        "http" | "https" => Some(url),
        _ => None,
    }
}

/// Removes the fragment component
pub fn strip_fragment(mut url: Url) -> Url {
    url.set_fragment(None);
    url
}

/// True iff scheme, host and port (after scheme defaults) all match
pub fn same_origin(a: &Url, b: &Url) -> bool {
    a.scheme() == b.scheme()
        && a.host_str() == b.host_str()
        && a.port_or_known_default() == b.port_or_known_default()
}

/// Parses and validates the root URL of a crawl
pub fn parse_seed(raw: &str) -> Result<Url, CrawlError> {
    let invalid = |reason: &str| CrawlError::InvalidSeed {
        url: raw.to_string(),
        reason: reason.to_string(),
    };

    let url = Url::parse(raw.trim()).map_err(|e| invalid(&e.to_string()))?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(invalid("scheme must be http or https"));
    }
    if url.host_str().map_or(true, str::is_empty) {
        return Err(invalid("URL has no host"));
    }

    Ok(strip_fragment(url))
}

// -----------------------------------------------------------------------------
// NOTES:
//
// 1. What is port_or_known_default()?
//    - The explicit port if there is one, else 80 for http and 443 for https
//    - port_or_known_default() turns "http://a/" and "http://a:80/" into the
//      same (http, a, 80) triple
//
// 2. What does base.join() do?
//    - Resolves a reference the way a browser does
//    - "https://example.com/docs/page" + "next" = "https://example.com/docs/next"
//    - Absolute references replace the base entirely
// -----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> Url {
        Url::parse("https://example.com/docs/page").unwrap()
    }

    #[test]
    fn test_resolve_absolute_link() {
        let result = resolve(&base(), "https://other.com");
        assert_eq!(result.map(String::from), Some("https://other.com/".to_string()));
    }

    #[test]
    fn test_resolve_relative_links() {
        let root_relative = resolve(&base(), "/about").unwrap();
        assert_eq!(root_relative.as_str(), "https://example.com/about");

        let parent = resolve(&base(), "../other").unwrap();
        assert_eq!(parent.as_str(), "https://example.com/other");

        let sibling = resolve(&base(), "next?page=2").unwrap();
        assert_eq!(sibling.as_str(), "https://example.com/docs/next?page=2");
    }

    #[test]
    fn test_skip_anchor() {
        assert_eq!(resolve(&base(), "#section"), None);
    }

    #[test]
    fn test_skip_special_schemes() {
        assert_eq!(resolve(&base(), "mailto:test@example.com"), None);
        assert_eq!(resolve(&base(), "tel:+15550100"), None);
        assert_eq!(resolve(&base(), "javascript:void(0)"), None);
        assert_eq!(resolve(&base(), "  JavaScript:alert(1)"), None);
    }

    #[test]
    fn test_skip_unfetchable_schemes() {
        assert_eq!(resolve(&base(), "data:text/plain,hello"), None);
        assert_eq!(resolve(&base(), "ftp://files.example.com/a.zip"), None);
    }

    #[test]
    fn test_resolve_keeps_fragment_for_stripping_later() {
        let url = resolve(&base(), "/a#x").unwrap();
        assert_eq!(url.fragment(), Some("x"));
        assert_eq!(strip_fragment(url).as_str(), "https://example.com/a");
    }

    #[test]
    fn test_fragment_variants_collapse() {
        let a = strip_fragment(resolve(&base(), "/a#x").unwrap());
        let b = strip_fragment(resolve(&base(), "/a#y").unwrap());
        assert_eq!(a, b);
    }

    #[test]
    fn test_same_origin_applies_default_ports() {
        let a = Url::parse("http://example.com/x").unwrap();
        let b = Url::parse("http://example.com:80/y").unwrap();
        assert!(same_origin(&a, &b));
    }

    #[test]
    fn test_different_origins() {
        let seed = Url::parse("http://127.0.0.1:8000/").unwrap();
        let other_port = Url::parse("http://127.0.0.1:9000/").unwrap();
        let other_scheme = Url::parse("https://127.0.0.1:8000/").unwrap();
        let other_host = Url::parse("http://localhost:8000/").unwrap();
        assert!(!same_origin(&seed, &other_port));
        assert!(!same_origin(&seed, &other_scheme));
        assert!(!same_origin(&seed, &other_host));
    }

    #[test]
    fn test_parse_seed() {
        let seed = parse_seed("http://127.0.0.1:8000#top").unwrap();
        assert_eq!(seed.as_str(), "http://127.0.0.1:8000/");
    }

    #[test]
    fn test_parse_seed_rejects_unusable_roots() {
        assert!(matches!(parse_seed("not a url"), Err(CrawlError::InvalidSeed { .. })));
        assert!(matches!(parse_seed("/relative/path"), Err(CrawlError::InvalidSeed { .. })));
        assert!(matches!(parse_seed("file:///tmp/index.html"), Err(CrawlError::InvalidSeed { .. })));
    }
}
