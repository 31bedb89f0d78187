//! Output module for crawl results
//!
//! This module handles:
//! - Accumulating per-URL crawl records
//! - Deriving aggregate summaries from the record log
//! - Exporting records as CSV or JSON

mod export;
mod sink;
pub mod stats;
mod traits;

pub use export::{default_csv_path, CsvExporter, ExportRow, JsonExporter, TIMESTAMP_FORMAT};
pub use sink::{CrawlRecord, CrawlSummary, ResultSink};
pub use stats::{format_summary, print_summary};
pub use traits::{Exporter, OutputError, OutputResult};
