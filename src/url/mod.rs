//! URL handling module for link-audit
//!
//! This module provides the canonical URL type used as frontier identity,
//! relative-reference normalization, and the same-host scope filter.

mod domain;
mod normalize;

use std::fmt;
use std::hash::{Hash, Hasher};
use url::Url;

// Re-export main functions
pub use domain::{extract_domain, in_scope};
pub use normalize::{normalize, parse_start_url};

/// A crawlable URL in canonical form, plus the text it was discovered as
///
/// Two `CrawlUrl`s are equal when their canonical forms are equal; the
/// original text is carried for diagnostics only.
#[derive(Debug, Clone)]
pub struct CrawlUrl {
    canonical: Url,
    original: String,
}

impl CrawlUrl {
    pub(crate) fn new(canonical: Url, original: impl Into<String>) -> Self {
        Self {
            canonical,
            original: original.into(),
        }
    }

    /// The canonical URL (absolute, HTTP(S), no fragment)
    pub fn url(&self) -> &Url {
        &self.canonical
    }

    /// The canonical URL as a string
    pub fn as_str(&self) -> &str {
        self.canonical.as_str()
    }

    /// The un-normalized form this URL was created from
    pub fn original(&self) -> &str {
        &self.original
    }

    /// The lowercase host of the canonical URL
    pub fn host(&self) -> Option<String> {
        extract_domain(&self.canonical)
    }
}

impl PartialEq for CrawlUrl {
    fn eq(&self, other: &Self) -> bool {
        self.canonical.as_str() == other.canonical.as_str()
    }
}

impl Eq for CrawlUrl {}

impl Hash for CrawlUrl {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.canonical.as_str().hash(state);
    }
}

impl fmt::Display for CrawlUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.canonical.as_str())
    }
}
