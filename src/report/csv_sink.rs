//! Results CSV persistence
//!
//! The results file is truncated when a run starts and every record is
//! flushed as soon as it is written, so an interrupted run leaves the
//! rows measured so far and a rerun never appends to an old file.

use std::fs::{self, File};
use std::path::{Path, PathBuf};

use crate::models::MeasurementRecord;
use crate::{SbcBenchError, Result};

/// Column names of the results file
pub const CSV_HEADER: [&str; 4] = ["Test Type", "Data Size (MB)", "Run", "Result"];

/// Incremental writer for the results CSV
pub struct ResultsWriter {
    writer: csv::Writer<File>,
    path: PathBuf,
    rows_written: usize,
}

impl ResultsWriter {
    /// Create the parent directory if needed, truncate the file and write the header
    pub fn create(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| SbcBenchError::WriteError(
                format!("Failed to create results directory {}: {}", parent.display(), e)
            ))?;
        }

        let file = File::create(path).map_err(|e| SbcBenchError::WriteError(
            format!("Failed to create results file {}: {}", path.display(), e)
        ))?;

        let mut results = Self {
            writer: csv::Writer::from_writer(file),
            path: path.to_path_buf(),
            rows_written: 0,
        };
        results.write_row(&CSV_HEADER)?;
        Ok(results)
    }

    /// Append one record and flush it to the file
    pub fn append(&mut self, record: &MeasurementRecord) -> Result<()> {
        let row = Self::format_row(record);
        self.write_row(&row)?;
        self.rows_written += 1;
        Ok(())
    }

    /// CSV fields for a record; numbers carry two decimals
    pub fn format_row(record: &MeasurementRecord) -> [String; 4] {
        [
            record.test_type().description().to_string(),
            format!("{:.2}", record.size_mb()),
            record.run().to_string(),
            record.formatted_result(),
        ]
    }

    fn write_row<T: AsRef<[u8]>>(&mut self, fields: &[T]) -> Result<()> {
        self.writer
            .write_record(fields)
            .and_then(|_| self.writer.flush().map_err(csv::Error::from))
            .map_err(|e| SbcBenchError::WriteError(
                format!("Failed to write results file {}: {}", self.path.display(), e)
            ))
    }

    /// Number of records written, header excluded
    pub fn rows_written(&self) -> usize {
        self.rows_written
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}
