use crate::url::CrawlUrl;
use crate::UrlError;
use url::Url;

/// Resolves `href` against `base` and returns its canonical form
///
/// # Normalization Steps
///
/// 1. Trim surrounding whitespace from the href
/// 2. Resolve it against the base URL (standard reference resolution)
/// 3. Reject any scheme other than `http`/`https` (`mailto:`, `javascript:`,
///    `tel:`, `data:`, ...)
/// 4. Reject URLs without a host
/// 5. Remove the fragment
///
/// Nothing else is rewritten: query strings are kept verbatim, so
/// `?page=1` and `?page=2` stay distinct URLs.
///
/// # Examples
///
/// ```
/// use link_audit::url::{normalize, parse_start_url};
///
/// let base = parse_start_url("https://example.com/docs/intro").unwrap();
/// let url = normalize(&base, "../about#team").unwrap();
/// assert_eq!(url.as_str(), "https://example.com/about");
/// ```
pub fn normalize(base: &CrawlUrl, href: &str) -> Result<CrawlUrl, UrlError> {
    let trimmed = href.trim();
    let resolved = base
        .url()
        .join(trimmed)
        .map_err(|e| UrlError::Parse(format!("{}: {}", trimmed, e)))?;

    canonicalize(resolved, href)
}

/// Parses an absolute start URL into canonical form
///
/// This is the only URL the crawl cannot do without: a failure here is
/// reported to the caller before any fetch is attempted.
///
/// # Examples
///
/// ```
/// use link_audit::url::parse_start_url;
///
/// let url = parse_start_url("https://example.com/#main").unwrap();
/// assert_eq!(url.as_str(), "https://example.com/");
/// assert!(parse_start_url("mailto:someone@example.com").is_err());
/// ```
pub fn parse_start_url(url_str: &str) -> Result<CrawlUrl, UrlError> {
    let trimmed = url_str.trim();
    let parsed = Url::parse(trimmed).map_err(|e| UrlError::Parse(format!("{}: {}", trimmed, e)))?;

    canonicalize(parsed, url_str)
}

fn canonicalize(mut url: Url, original: &str) -> Result<CrawlUrl, UrlError> {
    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(UrlError::InvalidScheme(format!(
            "Only HTTP and HTTPS schemes are supported, got: {}",
            url.scheme()
        )));
    }

    if url.host_str().map_or(true, str::is_empty) {
        return Err(UrlError::MissingDomain);
    }

    url.set_fragment(None);

    Ok(CrawlUrl::new(url, original))
}
