//! HTML parser for extracting links
//!
//! This module handles parsing fetched HTML and extracting:
//! - Outbound links from `<a href>` tags, with their anchor text
//! - Single elements by tag and attribute, for page analyzers
//!
//! Parsing is best-effort: malformed markup never fails, it only yields
//! fewer elements.

use crate::url::{normalize, CrawlUrl};
use scraper::{ElementRef, Html, Selector};

/// Maximum number of characters kept from an anchor's text
pub const MAX_ANCHOR_TEXT_CHARS: usize = 100;

/// An outbound link found on a page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkEdge {
    /// Page the link was found on
    pub source: CrawlUrl,

    /// The `href` exactly as written in the markup
    pub target_raw: String,

    /// Whitespace-collapsed anchor text, at most 100 characters
    pub anchor_text: String,
}

impl LinkEdge {
    /// Resolves the link target against its source page
    ///
    /// Returns None for targets that are not HTTP(S) URLs.
    pub fn resolve(&self) -> Option<CrawlUrl> {
        normalize(&self.source, &self.target_raw).ok()
    }
}

/// A parsed HTML document
///
/// Wraps the HTML tree so callers query it through a small typed surface
/// instead of raw selectors.
pub struct ParsedDocument {
    html: Html,
}

impl ParsedDocument {
    /// Parses a full HTML document
    pub fn parse(html: &str) -> Self {
        Self {
            html: Html::parse_document(html),
        }
    }

    /// Returns every `<a>` element that carries an `href`
    pub fn anchors(&self) -> Vec<ElementRef<'_>> {
        match Selector::parse("a[href]") {
            Ok(selector) => self.html.select(&selector).collect(),
            Err(_) => Vec::new(),
        }
    }

    /// Finds the first `tag` element whose `attribute` satisfies `predicate`
    ///
    /// # Arguments
    ///
    /// * `tag` - Element name, e.g. `"meta"`
    /// * `attribute` - Attribute the predicate is applied to
    /// * `predicate` - Receives the attribute value
    ///
    /// # Example
    ///
    /// ```
    /// use link_audit::crawler::ParsedDocument;
    ///
    /// let doc = ParsedDocument::parse(r#"<meta name="description" content="Hi">"#);
    /// let meta = doc.find_first("meta", "name", |v| v == "description").unwrap();
    /// assert_eq!(meta.value().attr("content"), Some("Hi"));
    /// ```
    pub fn find_first<P>(&self, tag: &str, attribute: &str, predicate: P) -> Option<ElementRef<'_>>
    where
        P: Fn(&str) -> bool,
    {
        let selector = Selector::parse(tag).ok()?;
        self.html
            .select(&selector)
            .find(|element| element.value().attr(attribute).is_some_and(&predicate))
    }

    /// Returns the trimmed text of the first `<title>`, if any
    pub fn title(&self) -> Option<String> {
        let selector = Selector::parse("title").ok()?;
        self.html
            .select(&selector)
            .next()
            .map(|element| element.text().collect::<String>().trim().to_string())
            .filter(|s| !s.is_empty())
    }
}

impl std::fmt::Debug for ParsedDocument {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ParsedDocument").finish_non_exhaustive()
    }
}

/// Extracts the outbound links of a page
///
/// # Link Extraction Rules
///
/// **Include:**
/// - `<a href="...">` anywhere in the document
/// - `rel="nofollow"` links
///
/// **Exclude:**
/// - Empty `href`s
/// - `<a href="..." download>`
/// - `href`s that do not resolve to an HTTP(S) URL
///   (`javascript:`, `mailto:`, `tel:`, `data:`, unparsable)
///
/// # Arguments
///
/// * `source` - URL the HTML was served from; relative links resolve against it
/// * `html` - The HTML content
///
/// # Returns
///
/// The links in document order. Duplicates are kept; the frontier drops them.
pub fn extract_links(source: &CrawlUrl, html: &str) -> Vec<LinkEdge> {
    let document = ParsedDocument::parse(html);
    links_from_document(source, &document)
}

/// Extracts links from an already parsed document
pub fn links_from_document(source: &CrawlUrl, document: &ParsedDocument) -> Vec<LinkEdge> {
    let mut links = Vec::new();

    for element in document.anchors() {
        if element.value().attr("download").is_some() {
            continue;
        }

        let Some(href) = element.value().attr("href") else {
            continue;
        };
        let href = href.trim();
        if href.is_empty() {
            continue;
        }

        let edge = LinkEdge {
            source: source.clone(),
            target_raw: href.to_string(),
            anchor_text: anchor_text(&element),
        };

        if edge.resolve().is_some() {
            links.push(edge);
        } else {
            tracing::trace!("Skipping link {:?} on {}", href, source);
        }
    }

    links
}

/// Collapses whitespace in an element's text and truncates it
fn anchor_text(element: &ElementRef<'_>) -> String {
    let collapsed = element
        .text()
        .flat_map(str::split_whitespace)
        .collect::<Vec<_>>()
        .join(" ");

    truncate_chars(&collapsed, MAX_ANCHOR_TEXT_CHARS)
}

fn truncate_chars(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((idx, _)) => text[..idx].to_string(),
        None => text.to_string(),
    }
}
