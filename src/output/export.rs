//! CSV and JSON exports of the result log

use crate::output::{CrawlRecord, Exporter, OutputResult, ResultSink};
use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::io::Write;
use std::path::PathBuf;

/// Timestamp format of exported rows
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// One exported record, fields in export order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportRow {
    pub url: String,
    pub status_code: Option<u16>,
    pub redirect_chain: u32,
    pub final_url: String,
    /// Seconds, rounded to two decimals
    pub response_time: f64,
    pub error: Option<String>,
    pub issue_type: String,
    pub timestamp: String,
}

impl ExportRow {
    /// Column names, in order
    pub const FIELDS: [&'static str; 8] = [
        "url",
        "status_code",
        "redirect_chain",
        "final_url",
        "response_time",
        "error",
        "issue_type",
        "timestamp",
    ];

    pub fn from_record(record: &CrawlRecord) -> Self {
        let outcome = record.outcome();

        Self {
            url: record.url().as_str().to_string(),
            status_code: outcome.status_code(),
            redirect_chain: outcome.redirect_count(),
            final_url: outcome.final_url().as_str().to_string(),
            response_time: round_secs(outcome.elapsed().as_secs_f64()),
            error: outcome.transport_error().map(|e| e.to_string()),
            issue_type: record.category().label(),
            timestamp: record.timestamp().format(TIMESTAMP_FORMAT).to_string(),
        }
    }

    pub fn from_sink(sink: &ResultSink) -> Vec<Self> {
        sink.records().iter().map(Self::from_record).collect()
    }
}

fn round_secs(secs: f64) -> f64 {
    (secs * 100.0).round() / 100.0
}

/// Writes one CSV row per record, with a header row
#[derive(Debug, Clone, Copy, Default)]
pub struct CsvExporter;

impl Exporter for CsvExporter {
    fn format_name(&self) -> &'static str {
        "CSV"
    }

    fn write_rows(&self, rows: &[ExportRow], writer: &mut dyn Write) -> OutputResult<()> {
        // Header written by hand so an empty log still gets one
        let mut csv_writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(writer);

        csv_writer.write_record(ExportRow::FIELDS)?;
        for row in rows {
            csv_writer.serialize(row)?;
        }
        csv_writer.flush()?;
        Ok(())
    }
}

/// Writes the records as a pretty-printed JSON array
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonExporter;

impl Exporter for JsonExporter {
    fn format_name(&self) -> &'static str {
        "JSON"
    }

    fn write_rows(&self, rows: &[ExportRow], writer: &mut dyn Write) -> OutputResult<()> {
        serde_json::to_writer_pretty(&mut *writer, rows)?;
        writer.write_all(b"\n")?;
        Ok(())
    }
}

/// Default CSV file name for a run started at `now`
///
/// # Example
///
/// ```
/// use chrono::{Local, TimeZone};
/// use link_audit::output::default_csv_path;
///
/// let now = Local.with_ymd_and_hms(2024, 3, 9, 14, 5, 7).unwrap();
/// assert_eq!(
///     default_csv_path(now).to_str(),
///     Some("link_report_20240309_140507.csv")
/// );
/// ```
pub fn default_csv_path(now: DateTime<Local>) -> PathBuf {
    PathBuf::from(format!("link_report_{}.csv", now.format("%Y%m%d_%H%M%S")))
}
