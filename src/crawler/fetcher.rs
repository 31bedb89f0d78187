//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for the crawler, including:
//! - Building HTTP clients with proper user agent strings
//! - GET requests with manually followed redirects (hop counting)
//! - A hard wall-clock timeout per fetch attempt
//! - Transport error classification
//!
//! Failures never cross this boundary as errors: every call produces a
//! `FetchOutcome`, with the failure carried in `transport_error`.

use crate::config::{CrawlerConfig, UserAgentConfig};
use crate::url::{normalize, CrawlUrl};
use reqwest::{header, redirect::Policy, Client, Response, StatusCode};
use std::fmt;
use std::time::{Duration, Instant};

/// Transport-level failure of a fetch
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    /// The request did not complete within the timeout
    Timeout,

    /// The connection could not be established (refused, DNS, TLS handshake)
    ConnectionError,

    /// Any other transport failure
    Other(String),
}

impl TransportError {
    /// Classifies a reqwest error
    pub fn from_reqwest(error: &reqwest::Error) -> Self {
        if error.is_timeout() {
            Self::Timeout
        } else if error.is_connect() {
            Self::ConnectionError
        } else {
            Self::Other(error.to_string())
        }
    }
}

impl fmt::Display for TransportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Timeout => f.write_str("Timeout"),
            Self::ConnectionError => f.write_str("Connection Error"),
            Self::Other(detail) => f.write_str(detail),
        }
    }
}

/// Result of fetching one URL
///
/// `status_code` is `None` exactly when `transport_error` is set; the two
/// constructors are the only way to build one.
#[derive(Debug, Clone, PartialEq)]
pub struct FetchOutcome {
    status_code: Option<u16>,
    redirect_count: u32,
    final_url: CrawlUrl,
    elapsed: Duration,
    transport_error: Option<TransportError>,
}

impl FetchOutcome {
    /// An outcome that ended in an HTTP response
    pub fn from_status(
        final_url: CrawlUrl,
        status_code: u16,
        redirect_count: u32,
        elapsed: Duration,
    ) -> Self {
        Self {
            status_code: Some(status_code),
            redirect_count,
            final_url,
            elapsed,
            transport_error: None,
        }
    }

    /// An outcome that ended in a transport failure
    ///
    /// Failures report the requested URL and zero hops, however far a
    /// redirect chain got before it broke.
    pub fn from_error(requested_url: CrawlUrl, error: TransportError, elapsed: Duration) -> Self {
        Self {
            status_code: None,
            redirect_count: 0,
            final_url: requested_url,
            elapsed,
            transport_error: Some(error),
        }
    }

    pub fn status_code(&self) -> Option<u16> {
        self.status_code
    }

    /// Number of redirect hops followed before the final response
    pub fn redirect_count(&self) -> u32 {
        self.redirect_count
    }

    /// URL of the last request made (the requested URL when no redirect happened)
    pub fn final_url(&self) -> &CrawlUrl {
        &self.final_url
    }

    /// Wall-clock time of the whole fetch, redirects included
    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    pub fn transport_error(&self) -> Option<&TransportError> {
        self.transport_error.as_ref()
    }

    /// Returns true if the fetch ended in a 200 response
    pub fn is_success(&self) -> bool {
        self.status_code == Some(200)
    }
}

/// A fetch outcome together with the response content
#[derive(Debug, Clone)]
pub struct FetchedPage {
    pub outcome: FetchOutcome,

    /// Response body; only read for 200 responses that look like HTML
    pub body: Option<String>,
}

impl FetchedPage {
    fn failed(requested_url: &CrawlUrl, error: TransportError) -> Self {
        Self {
            outcome: FetchOutcome::from_error(requested_url.clone(), error, Duration::ZERO),
            body: None,
        }
    }

    /// Returns the final status code and HTML body of a page worth parsing
    pub fn html(&self) -> Option<(u16, &str)> {
        match self.outcome.status_code {
            Some(status @ 200) => self.body.as_deref().map(|body| (status, body)),
            _ => None,
        }
    }
}

/// Per-fetch limits
#[derive(Debug, Clone, Copy)]
pub struct FetchOptions {
    /// Hard limit for the whole attempt, redirects included
    pub timeout: Duration,

    /// Redirect hops followed before giving up
    pub max_redirects: u32,
}

impl FetchOptions {
    pub fn from_config(config: &CrawlerConfig) -> Self {
        Self {
            timeout: Duration::from_secs(config.request_timeout_secs),
            max_redirects: config.max_redirects,
        }
    }
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self::from_config(&CrawlerConfig::default())
    }
}

/// Builds an HTTP client with proper configuration
///
/// Automatic redirects are disabled; [`fetch_url`] follows them itself so it
/// can count hops.
///
/// # Example
///
/// ```no_run
/// use link_audit::config::Config;
/// use link_audit::crawler::build_http_client;
///
/// let config = Config::default();
/// let client = build_http_client(&config.user_agent, &config.crawler).unwrap();
/// ```
pub fn build_http_client(
    user_agent: &UserAgentConfig,
    crawler: &CrawlerConfig,
) -> Result<Client, reqwest::Error> {
    let timeout = Duration::from_secs(crawler.request_timeout_secs);

    Client::builder()
        .user_agent(user_agent.header_value())
        .timeout(timeout)
        .connect_timeout(timeout.min(Duration::from_secs(10)))
        .redirect(Policy::none()) // Handle redirects manually
        .gzip(true)
        .brotli(true)
        .build()
}

/// Fetches a URL, following redirects, under a hard timeout
///
/// # Request Flow
///
/// 1. Send GET request
/// 2. On a 3xx with a usable `Location`, resolve it and repeat
///    (at most `max_redirects` hops)
/// 3. On the final response, read the body if it is a 200 HTML page
///
/// | Condition | Result |
/// |-----------|--------|
/// | Final response | `status_code = Some(code)` |
/// | Attempt exceeds timeout | `Timeout` |
/// | Connection refused / DNS / TLS | `ConnectionError` |
/// | More than `max_redirects` hops | `Other("too many redirects ...")` |
/// | Any other client error | `Other(detail)` |
///
/// There are no retries: a failure is final for this URL.
pub async fn fetch_url(client: &Client, url: &CrawlUrl, options: &FetchOptions) -> FetchedPage {
    let started = Instant::now();

    let attempt = follow_redirects(client, url, options);
    let mut page = match tokio::time::timeout(options.timeout, attempt).await {
        Ok(page) => page,
        Err(_) => {
            tracing::debug!("Fetch of {} exceeded {:?}", url, options.timeout);
            FetchedPage::failed(url, TransportError::Timeout)
        }
    };
    page.outcome.elapsed = started.elapsed();
    page
}

async fn follow_redirects(client: &Client, url: &CrawlUrl, options: &FetchOptions) -> FetchedPage {
    let mut current = url.clone();
    let mut redirects = 0u32;

    loop {
        let response = match client.get(current.url().clone()).send().await {
            Ok(response) => response,
            Err(e) => {
                tracing::debug!("Request to {} failed: {}", current, e);
                let error = TransportError::from_reqwest(&e);
                return FetchedPage::failed(url, error);
            }
        };

        let status = response.status();
        if status.is_redirection() {
            if let Some(next) = redirect_target(&current, &response) {
                if redirects >= options.max_redirects {
                    let error = TransportError::Other(format!(
                        "too many redirects (more than {})",
                        options.max_redirects
                    ));
                    return FetchedPage::failed(url, error);
                }

                tracing::trace!("{} redirects ({}) to {}", current, status.as_u16(), next);
                redirects += 1;
                current = next;
                continue;
            }
        }

        return read_final_response(url, current, redirects, response).await;
    }
}

/// Resolves the `Location` header of a redirect response
///
/// Returns None when the header is missing or does not resolve to an
/// HTTP(S) URL; the 3xx is then treated as the final response.
fn redirect_target(current: &CrawlUrl, response: &Response) -> Option<CrawlUrl> {
    let location = response.headers().get(header::LOCATION)?.to_str().ok()?;
    normalize(current, location).ok()
}

async fn read_final_response(
    requested_url: &CrawlUrl,
    final_url: CrawlUrl,
    redirects: u32,
    response: Response,
) -> FetchedPage {
    let status = response.status();
    let content_type = response
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);

    let body = if status == StatusCode::OK && is_html_content_type(content_type.as_deref()) {
        match response.text().await {
            Ok(body) => Some(body),
            Err(e) => {
                tracing::debug!("Failed to read body of {}: {}", final_url, e);
                let error = TransportError::from_reqwest(&e);
                return FetchedPage::failed(requested_url, error);
            }
        }
    } else {
        None
    };

    FetchedPage {
        outcome: FetchOutcome::from_status(final_url, status.as_u16(), redirects, Duration::ZERO),
        body,
    }
}

/// Returns true for HTML content types, or when the server sent none
fn is_html_content_type(content_type: Option<&str>) -> bool {
    match content_type {
        None => true,
        Some(value) => {
            let value = value.to_ascii_lowercase();
            value.contains("text/html") || value.contains("application/xhtml+xml")
        }
    }
}
