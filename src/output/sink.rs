//! Append-only log of crawl results and the summary derived from it

use crate::crawler::{FetchOutcome, IssueCategory};
use crate::url::CrawlUrl;
use chrono::{DateTime, Local};
use std::collections::BTreeMap;

/// The result of fetching one URL
///
/// Records are immutable once created; the sink only ever appends them.
#[derive(Debug, Clone, PartialEq)]
pub struct CrawlRecord {
    url: CrawlUrl,
    outcome: FetchOutcome,
    category: IssueCategory,
    timestamp: DateTime<Local>,
}

impl CrawlRecord {
    /// Creates a record stamped with the current local time
    pub fn new(url: CrawlUrl, outcome: FetchOutcome, category: IssueCategory) -> Self {
        Self::at(url, outcome, category, Local::now())
    }

    /// Creates a record with an explicit timestamp
    pub fn at(
        url: CrawlUrl,
        outcome: FetchOutcome,
        category: IssueCategory,
        timestamp: DateTime<Local>,
    ) -> Self {
        Self {
            url,
            outcome,
            category,
            timestamp,
        }
    }

    /// The URL that was requested
    pub fn url(&self) -> &CrawlUrl {
        &self.url
    }

    pub fn outcome(&self) -> &FetchOutcome {
        &self.outcome
    }

    pub fn category(&self) -> IssueCategory {
        self.category
    }

    pub fn timestamp(&self) -> DateTime<Local> {
        self.timestamp
    }
}

/// Aggregate counts over the result log
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CrawlSummary {
    /// Number of URLs fetched
    pub total: usize,

    /// Status 200 reached without any redirect
    pub ok_count: usize,

    /// Fetches that followed at least one redirect
    pub redirect_count: usize,

    /// Final status 404
    pub broken_count: usize,

    /// Fetches that ended in a transport error
    pub error_count: usize,

    /// Number of records per issue category
    pub by_category: BTreeMap<IssueCategory, usize>,
}

impl CrawlSummary {
    /// Returns the count for one category
    pub fn category_count(&self, category: IssueCategory) -> usize {
        self.by_category.get(&category).copied().unwrap_or(0)
    }

    /// Returns the share of healthy URLs as a percentage
    pub fn ok_rate(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        (self.ok_count as f64 / self.total as f64) * 100.0
    }
}

/// Ordered, append-only log of crawl records
#[derive(Debug, Clone, Default)]
pub struct ResultSink {
    records: Vec<CrawlRecord>,
}

impl ResultSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a record to the log
    pub fn record(&mut self, record: CrawlRecord) {
        self.records.push(record);
    }

    /// The records in the order they were recorded
    pub fn records(&self) -> &[CrawlRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Computes the summary with a single pass over the log
    ///
    /// Nothing is cached, so the summary always matches the records.
    pub fn summary(&self) -> CrawlSummary {
        let mut summary = CrawlSummary {
            total: self.records.len(),
            ..CrawlSummary::default()
        };

        for record in &self.records {
            let outcome = record.outcome();

            if outcome.status_code() == Some(200) && outcome.redirect_count() == 0 {
                summary.ok_count += 1;
            }
            if outcome.redirect_count() > 0 {
                summary.redirect_count += 1;
            }
            if outcome.status_code() == Some(404) {
                summary.broken_count += 1;
            }
            if outcome.transport_error().is_some() {
                summary.error_count += 1;
            }

            *summary.by_category.entry(record.category()).or_insert(0) += 1;
        }

        summary
    }
}
