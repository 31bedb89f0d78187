//! Exporter trait and output errors

use crate::output::{ExportRow, ResultSink};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use thiserror::Error;

/// Errors that can occur during output operations
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("Failed to write CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("Failed to write JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;

/// A serialization of the result log
///
/// Exporters are pure: they write exactly the rows of the sink, in order,
/// and compute nothing else.
pub trait Exporter {
    /// Short format name used in log messages
    fn format_name(&self) -> &'static str;

    /// Writes the rows to `writer`
    ///
    /// An empty slice still produces a well-formed document.
    fn write_rows(&self, rows: &[ExportRow], writer: &mut dyn Write) -> OutputResult<()>;

    /// Writes the whole sink to a file, replacing it if it exists
    ///
    /// # Arguments
    ///
    /// * `sink` - The results to export
    /// * `path` - Destination file
    ///
    /// # Returns
    ///
    /// The number of rows written
    fn export_to_path(&self, sink: &ResultSink, path: &Path) -> OutputResult<usize> {
        let rows = ExportRow::from_sink(sink);
        let mut writer = BufWriter::new(File::create(path)?);
        self.write_rows(&rows, &mut writer)?;
        writer.flush()?;

        tracing::info!(
            "Wrote {} {} rows to {}",
            rows.len(),
            self.format_name(),
            path.display()
        );
        Ok(rows.len())
    }
}
