// src/checker/http.rs
// =============================================================================
// This module talks to the network.
//
// Key functionality:
// - fetch(): GET a page, keep the status, read a bounded HTML body prefix
// - check(): lightweight HEAD probe used for cross-origin links
//   (falls back to GET when the server does not support HEAD)
// - Classifies failure modes (timeout, DNS, connection, TLS, redirects)
// - Page fetches only follow redirects that stay on the same origin
//
// A response with status >= 400 is NOT a transport failure: the server was
// reached and answered. Only requests that never got an answer become
// TransportError.
//
// No retries: a single failed attempt is final for that URL within the run.
// =============================================================================

use futures::StreamExt; // StreamExt gives us .next() on the body stream
use reqwest::redirect::Policy;
use reqwest::{Client, Response, StatusCode};
use serde::Serialize;
use std::error::Error as _;
use tracing::debug;
use url::Url;

use crate::config::CrawlOptions;

/// Why a request never produced an HTTP response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, thiserror::Error)]
#[serde(tag = "kind", content = "detail", rename_all = "snake_case")]
pub enum TransportError {
    #[error("timeout")]
    Timeout,
    #[error("dns error: {0}")]
    Dns(String),
    #[error("connection failed: {0}")]
    Connect(String),
    #[error("tls error: {0}")]
    Tls(String),
    #[error("too many redirects")]
    TooManyRedirects,
    #[error("{0}")]
    Other(String),
}

impl From<reqwest::Error> for TransportError {
    // reqwest errors can happen for many reasons. The top-level message is
    // usually "error sending request for url (...)", so the details come from
    // the source chain.
    fn from(error: reqwest::Error) -> Self {
        let kind = ErrorKind {
            timeout: error.is_timeout(),
            redirect: error.is_redirect(),
            connect: error.is_connect(),
        };
        classify(kind, &error.to_string(), &describe_causes(&error))
    }
}

// The flags reqwest exposes on its error type
#[derive(Debug, Clone, Copy, Default)]
struct ErrorKind {
    timeout: bool,
    redirect: bool,
    connect: bool,
}

// Picks a TransportError from the error flags and the source chain
//
// Keyword matching only looks at `causes`: the top-level message embeds the
// request URL, and a host such as ssl.example.org must not read as a TLS
// failure.
fn classify(kind: ErrorKind, top: &str, causes: &str) -> TransportError {
    let detail = if causes.is_empty() {
        top.to_string()
    } else {
        format!("{}: {}", top, causes)
    };
    let lowered = causes.to_lowercase();

    if kind.timeout {
        TransportError::Timeout
    } else if kind.redirect {
        TransportError::TooManyRedirects
    } else if lowered.contains("certificate") || lowered.contains("tls") || lowered.contains("ssl") {
        TransportError::Tls(detail)
    } else if kind.connect {
        if lowered.contains("dns") || lowered.contains("resolve") || lowered.contains("lookup") {
            TransportError::Dns(detail)
        } else {
            TransportError::Connect(detail)
        }
    } else {
        TransportError::Other(detail)
    }
}

// Joins the sources of an error (not the error itself) into one line
fn describe_causes(error: &reqwest::Error) -> String {
    let mut parts = Vec::new();
    let mut source = error.source();
    while let Some(cause) = source {
        parts.push(cause.to_string());
        source = cause.source();
    }
    parts.join(": ")
}

/// Why a link counts as broken
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BrokenReason {
    /// The server answered with status >= 400
    Http(u16),
    /// The server could not be reached at all
    Unreachable(TransportError),
}

impl BrokenReason {
    /// The status column of the report: the numeric code, or ERROR
    pub fn status_label(&self) -> String {
        match self {
            BrokenReason::Http(code) => code.to_string(),
            BrokenReason::Unreachable(_) => "ERROR".to_string(),
        }
    }

    pub fn diagnostic(&self) -> String {
        match self {
            BrokenReason::Http(_) => "HTTP error".to_string(),
            BrokenReason::Unreachable(err) => err.to_string(),
        }
    }
}

/// Result of checking one cross-origin link
///
/// `Unchecked` is what the crawler reports for a URL it has no cached
/// answer for yet; a probe only ever produces `Ok` or `Broken`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", content = "reason", rename_all = "snake_case")]
pub enum LinkOutcome {
    Unchecked,
    Ok,
    Broken(BrokenReason),
}

/// A response that came back from the server
#[derive(Debug, Clone)]
pub struct Page {
    pub status: StatusCode,
    /// The URL after following redirects
    pub final_url: Url,
    pub content_type: Option<String>,
    /// Where a redirect pointed when it was not followed (cross-origin)
    pub redirect_to: Option<Url>,
    /// Bounded body prefix; only present for successful text/html responses
    pub body: Option<Vec<u8>>,
}

impl Page {
    pub fn is_error(&self) -> bool {
        self.status.as_u16() >= 400
    }
}

#[derive(Debug, Clone)]
pub enum FetchOutcome {
    Fetched(Page),
    Unreachable(TransportError),
}

/// Redirects followed per request before giving up
const MAX_REDIRECTS: usize = 5;

/// HTTP clients shared by every request in a crawl run
pub struct Fetcher {
    // Page fetches: redirects are only followed within one origin
    pages: Client,
    // External probes: redirects are followed anywhere
    probes: Client,
    max_body_bytes: usize,
}

impl Fetcher {
    // Builds the clients once; connection pooling is reused across requests
    pub fn new(options: &CrawlOptions) -> Result<Self, reqwest::Error> {
        let pages = Client::builder()
            .timeout(options.timeout)
            .user_agent(options.user_agent.clone())
            .redirect(same_origin_redirects())
            .build()?;

        let probes = Client::builder()
            .timeout(options.timeout)
            .user_agent(options.user_agent.clone())
            .redirect(Policy::limited(MAX_REDIRECTS))
            .build()?;

        Ok(Self {
            pages,
            probes,
            max_body_bytes: options.max_body_bytes,
        })
    }

    /// Full-page fetch used for same-origin pages
    ///
    /// Only text/html bodies are read, and only up to the configured limit.
    pub async fn fetch(&self, url: &Url) -> FetchOutcome {
        debug!(%url, "GET");
        let response = match self.pages.get(url.clone()).send().await {
            Ok(response) => response,
            Err(e) => return FetchOutcome::Unreachable(e.into()),
        };

        let status = response.status();
        let final_url = response.url().clone();
        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_owned);

        // A redirect we stopped at never carries the page we wanted
        let redirect_to = if status.is_redirection() {
            response
                .headers()
                .get(reqwest::header::LOCATION)
                .and_then(|v| v.to_str().ok())
                .and_then(|location| final_url.join(location).ok())
        } else {
            None
        };

        let wants_body = status.as_u16() < 400
            && !status.is_redirection()
            && content_type.as_deref().map(is_html).unwrap_or(false);

        let body = if wants_body {
            match read_prefix(response, self.max_body_bytes).await {
                Ok(bytes) => Some(bytes),
                Err(e) => return FetchOutcome::Unreachable(e.into()),
            }
        } else {
            None
        };

        FetchOutcome::Fetched(Page {
            status,
            final_url,
            content_type,
            redirect_to,
            body,
        })
    }

    /// Status-only probe used for cross-origin links
    pub async fn check(&self, url: &Url) -> LinkOutcome {
        debug!(%url, "HEAD");
        let status = match self.probes.head(url.clone()).send().await {
            Ok(response) if needs_get_fallback(response.status()) => {
                debug!(%url, status = response.status().as_u16(), "HEAD not supported, retrying with GET");
                self.probes.get(url.clone()).send().await.map(|r| r.status())
            }
            Ok(response) => Ok(response.status()),
            Err(e) => Err(e),
        };

        match status {
            Ok(status) if status.as_u16() >= 400 => LinkOutcome::Broken(BrokenReason::Http(status.as_u16())),
            Ok(_) => LinkOutcome::Ok,
            Err(e) => LinkOutcome::Broken(BrokenReason::Unreachable(e.into())),
        }
    }
}

// Follows redirects that stay on the same (scheme, host, port) and stops at
// the first one that leaves it; the 3xx response is then returned as-is
fn same_origin_redirects() -> Policy {
    Policy::custom(|attempt| {
        let leaves_origin = attempt
            .previous()
            .last()
            .map_or(false, |prev| prev.origin() != attempt.url().origin());

        if leaves_origin {
            attempt.stop()
        } else if attempt.previous().len() > MAX_REDIRECTS {
            attempt.error("too many redirects")
        } else {
            attempt.follow()
        }
    })
}

// True if the Content-Type header names an HTML document
fn is_html(content_type: &str) -> bool {
    content_type.to_ascii_lowercase().contains("text/html")
}

// Some servers reject HEAD outright even though the resource exists
fn needs_get_fallback(status: StatusCode) -> bool {
    matches!(status, StatusCode::METHOD_NOT_ALLOWED | StatusCode::NOT_IMPLEMENTED)
}

// Reads at most `limit` bytes of the body, then drops the rest of the stream
async fn read_prefix(response: Response, limit: usize) -> Result<Vec<u8>, reqwest::Error> {
    let mut body = Vec::new();
    let mut stream = response.bytes_stream();

    while let Some(chunk) = stream.next().await {
        let chunk = chunk?;
        let room = limit - body.len();
        if chunk.len() >= room {
            body.extend_from_slice(&chunk[..room]);
            break;
        }
        body.extend_from_slice(&chunk);
    }

    Ok(body)
}
