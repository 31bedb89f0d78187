//! Per-page analysis boundary
//!
//! Page analyzers (SEO checks, SERP feature extraction and the like) see one
//! fetched and parsed page at a time and return a flat report. They never see
//! the frontier or other pages, so they can be added to a crawl without
//! touching its traversal.

use crate::crawler::ParsedDocument;
use crate::url::CrawlUrl;
use std::fmt;
use std::time::Duration;

/// A fetched page handed to analyzers
#[derive(Debug)]
pub struct ParsedPage {
    /// URL the page was served from, after redirects
    pub url: CrawlUrl,

    pub status_code: u16,

    /// Time the fetch took
    pub elapsed: Duration,

    pub document: ParsedDocument,
}

/// How serious a finding is
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Severity {
    Info,
    Warning,
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Info => f.write_str("info"),
            Self::Warning => f.write_str("warning"),
            Self::Error => f.write_str("error"),
        }
    }
}

/// One observation about a page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Finding {
    pub severity: Severity,

    /// The element the finding is about, e.g. `"title"`
    pub element: String,

    pub message: String,
}

impl Finding {
    pub fn new(severity: Severity, element: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            severity,
            element: element.into(),
            message: message.into(),
        }
    }
}

/// Everything one analyzer found on one page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageReport {
    /// Name of the analyzer that produced the report
    pub analyzer: String,

    pub url: CrawlUrl,

    pub findings: Vec<Finding>,
}

impl PageReport {
    pub fn new(analyzer: impl Into<String>, url: CrawlUrl) -> Self {
        Self {
            analyzer: analyzer.into(),
            url,
            findings: Vec::new(),
        }
    }

    /// Appends a finding
    pub fn push(&mut self, finding: Finding) {
        self.findings.push(finding);
    }

    /// Returns true if no finding is at `Warning` or above
    pub fn is_clean(&self) -> bool {
        self.findings
            .iter()
            .all(|finding| finding.severity < Severity::Warning)
    }
}

/// A stateless, single-page analysis
///
/// Implementations must not keep cross-page state; the crawl may hand pages
/// over in any order.
pub trait PageAnalyzer: Send + Sync {
    /// Name recorded in every report this analyzer produces
    fn name(&self) -> &str;

    /// Analyzes one page
    fn analyze(&self, page: &ParsedPage) -> PageReport;
}
