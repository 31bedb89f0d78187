use crate::url::CrawlUrl;
use url::Url;

/// Extracts the domain from a URL
///
/// This function retrieves the host portion of a URL and converts it to lowercase.
/// If the URL has no host, it returns None.
///
/// # Examples
///
/// ```
/// use url::Url;
/// use link_audit::url::extract_domain;
///
/// let url = Url::parse("https://EXAMPLE.COM/path").unwrap();
/// assert_eq!(extract_domain(&url), Some("example.com".to_string()));
///
/// let url = Url::parse("https://sub.example.com:8080/path").unwrap();
/// assert_eq!(extract_domain(&url), Some("sub.example.com".to_string()));
/// ```
pub fn extract_domain(url: &Url) -> Option<String> {
    url.host_str().map(|h| h.to_lowercase())
}

/// Returns true iff the URL's host equals the crawl's root domain
///
/// The comparison is exact: subdomains are out of scope, and neither the
/// scheme nor the port is considered.
pub fn in_scope(url: &CrawlUrl, root_domain: &str) -> bool {
    url.url()
        .host_str()
        .is_some_and(|host| host.eq_ignore_ascii_case(root_domain))
}
