//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for the crawler, including:
//! - Building the HTTP client with the identifying user agent
//! - Classifying responses (status, Content-Type, size)
//! - Reading and decoding page bodies
//! - Mapping network errors onto the failure taxonomy
//!
//! There are no retries: one failed attempt is final for a URL.

use crate::config::{FetchConfig, UserAgentConfig};
use crate::crawler::encoding::{charset_from_content_type, decode_body};
use reqwest::header::{CONTENT_LENGTH, CONTENT_TYPE};
use reqwest::{redirect::Policy, Client, Response};
use std::fmt;
use std::time::Duration;
use url::Url;

/// Redirect hops followed before giving up
pub const MAX_REDIRECTS: usize = 10;

/// Why a fetch attempt failed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FailureKind {
    /// The request or body read exceeded the timeout
    Timeout,
    /// DNS failure, refused connection, TLS failure
    ConnectionError,
    /// Redirect chain longer than [`MAX_REDIRECTS`]
    TooManyRedirects,
    /// Non-2xx response
    HttpStatus(u16),
    /// Content-Type is not `text/html`
    UnsupportedContentType,
    /// Declared or actual body size above the ceiling
    OversizeContent,
    /// The body could not be decoded (e.g. corrupt compression)
    DecodeError,
    /// Any other request failure
    OtherRequestError,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Timeout => write!(f, "Timeout"),
            Self::ConnectionError => write!(f, "ConnectionError"),
            Self::TooManyRedirects => write!(f, "TooManyRedirects"),
            Self::HttpStatus(code) => write!(f, "HttpStatus({})", code),
            Self::UnsupportedContentType => write!(f, "UnsupportedContentType"),
            Self::OversizeContent => write!(f, "OversizeContent"),
            Self::DecodeError => write!(f, "DecodeError"),
            Self::OtherRequestError => write!(f, "OtherRequestError"),
        }
    }
}

/// Result of a fetch attempt
#[derive(Debug)]
pub enum FetchOutcome {
    /// Successfully fetched and decoded an HTML page
    Success {
        /// Final URL after redirects
        final_url: Url,
        /// Decoded page body
        body: String,
        /// Content-Type header value
        content_type: String,
        /// Name of the encoding used to decode the body
        encoding: &'static str,
    },

    /// The attempt failed; the URL will not be retried
    Failure {
        /// Classified reason
        kind: FailureKind,
        /// Human-readable detail for logging
        detail: String,
    },
}

impl FetchOutcome {
    fn failure(kind: FailureKind, detail: impl Into<String>) -> Self {
        Self::Failure {
            kind,
            detail: detail.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    /// The failure kind, if this outcome is a failure
    pub fn failure_kind(&self) -> Option<FailureKind> {
        match self {
            Self::Success { .. } => None,
            Self::Failure { kind, .. } => Some(*kind),
        }
    }
}

/// Builds an HTTP client with proper configuration
///
/// # Example
///
/// ```no_run
/// use seoran::config::{FetchConfig, UserAgentConfig};
/// use seoran::crawler::build_http_client;
///
/// let client = build_http_client(&UserAgentConfig::default(), &FetchConfig::default()).unwrap();
/// ```
pub fn build_http_client(
    user_agent: &UserAgentConfig,
    fetch: &FetchConfig,
) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(user_agent.header_value())
        .timeout(Duration::from_secs(fetch.timeout_seconds))
        .redirect(Policy::limited(MAX_REDIRECTS))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Session-scoped fetcher: one client, one size ceiling
pub struct Fetcher {
    client: Client,
    max_content_length: u64,
}

impl Fetcher {
    /// Creates a fetcher from configuration
    pub fn new(user_agent: &UserAgentConfig, fetch: &FetchConfig) -> Result<Self, reqwest::Error> {
        Ok(Self {
            client: build_http_client(user_agent, fetch)?,
            max_content_length: fetch.max_content_length,
        })
    }

    /// Fetches one URL; see [`fetch_url`]
    pub async fn fetch(&self, url: &Url) -> FetchOutcome {
        fetch_url(&self.client, url, self.max_content_length).await
    }
}

/// Fetches a URL and classifies the outcome
///
/// # Classification Order
///
/// | Condition | Outcome |
/// |-----------|---------|
/// | Status not 2xx | `HttpStatus(code)` |
/// | Content-Type without `text/html` | `UnsupportedContentType` (body not read) |
/// | Content-Length above ceiling | `OversizeContent` (body not read) |
/// | Body grows above ceiling while reading | `OversizeContent` |
/// | Network error at any point | `Timeout` / `ConnectionError` / `TooManyRedirects` / `DecodeError` / `OtherRequestError` |
/// | Otherwise | `Success` with the decoded body |
///
/// The response is dropped, releasing the connection, on every path.
pub async fn fetch_url(client: &Client, url: &Url, max_content_length: u64) -> FetchOutcome {
    let response = match client.get(url.as_str()).send().await {
        Ok(response) => response,
        Err(e) => return classify_error(&e),
    };

    let status = response.status();
    if !status.is_success() {
        return FetchOutcome::failure(
            FailureKind::HttpStatus(status.as_u16()),
            format!(
                "HTTP {} {}",
                status.as_u16(),
                status.canonical_reason().unwrap_or("")
            )
            .trim_end()
            .to_string(),
        );
    }

    let content_type = response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
        .to_string();

    if !content_type.to_ascii_lowercase().contains("text/html") {
        let shown = if content_type.is_empty() {
            "missing"
        } else {
            content_type.as_str()
        };
        return FetchOutcome::failure(
            FailureKind::UnsupportedContentType,
            format!("Expected text/html, got {}", shown),
        );
    }

    if let Some(declared) = declared_length(&response) {
        if declared > max_content_length {
            return FetchOutcome::failure(
                FailureKind::OversizeContent,
                format!(
                    "Declared Content-Length {} exceeds limit of {} bytes",
                    declared, max_content_length
                ),
            );
        }
    }

    let final_url = response.url().clone();
    let bytes = match read_body(response, max_content_length).await {
        Ok(bytes) => bytes,
        Err(outcome) => return outcome,
    };

    let (body, used) = decode_body(&bytes, charset_from_content_type(&content_type));

    FetchOutcome::Success {
        final_url,
        body,
        content_type,
        encoding: used.name(),
    }
}

/// Content-Length as sent by the server
fn declared_length(response: &Response) -> Option<u64> {
    response
        .headers()
        .get(CONTENT_LENGTH)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().parse::<u64>().ok())
        .or_else(|| response.content_length())
}

/// Streams the body, stopping as soon as it passes the ceiling
async fn read_body(mut response: Response, max_content_length: u64) -> Result<Vec<u8>, FetchOutcome> {
    let mut bytes = Vec::new();

    loop {
        match response.chunk().await {
            Ok(Some(chunk)) => {
                if (bytes.len() + chunk.len()) as u64 > max_content_length {
                    return Err(FetchOutcome::failure(
                        FailureKind::OversizeContent,
                        format!("Body exceeds limit of {} bytes", max_content_length),
                    ));
                }
                bytes.extend_from_slice(&chunk);
            }
            Ok(None) => return Ok(bytes),
            Err(e) => return Err(classify_error(&e)),
        }
    }
}

/// Maps a reqwest error onto the failure taxonomy
fn classify_error(error: &reqwest::Error) -> FetchOutcome {
    let kind = if error.is_timeout() {
        FailureKind::Timeout
    } else if error.is_redirect() {
        FailureKind::TooManyRedirects
    } else if error.is_connect() {
        FailureKind::ConnectionError
    } else if error.is_decode() {
        FailureKind::DecodeError
    } else {
        FailureKind::OtherRequestError
    };

    FetchOutcome::failure(kind, error.to_string())
}
