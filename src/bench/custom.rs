//! Custom structured-file benchmark
//!
//! Builds an in-memory table of sample rows sized to the configured data
//! size, then times writing it out as CSV and reading it back into typed
//! rows. Results are wall-clock seconds.

use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use std::time::Instant;

use rand::{rngs::SmallRng, Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::models::{MeasurementContext, MeasurementRecord};
use crate::util::units::mb_to_bytes;
use crate::{SbcBenchError, Result};

/// Column names of the generated table
pub const HEADER: [&str; 3] = ["id", "name", "value"];

/// One row of the generated table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SampleRow {
    pub id: u64,
    pub name: String,
    pub value: u32,
}

impl SampleRow {
    fn new(id: u64, value: u32) -> Self {
        Self {
            id,
            name: format!("sample_{}", id),
            value,
        }
    }

    /// Bytes this row occupies in the CSV, delimiters and newline included
    pub fn encoded_len(&self) -> u64 {
        (decimal_len(self.id) + 1 + self.name.len() + 1 + decimal_len(u64::from(self.value)) + 1)
            as u64
    }
}

fn decimal_len(mut n: u64) -> usize {
    let mut len = 1;
    while n >= 10 {
        n /= 10;
        len += 1;
    }
    len
}

/// Bytes taken by the header line
pub fn header_len() -> u64 {
    (HEADER.iter().map(|h| h.len()).sum::<usize>() + HEADER.len()) as u64
}

/// Generated table plus its expected serialized size
#[derive(Debug, Clone)]
pub struct Dataset {
    pub rows: Vec<SampleRow>,
    /// Serialized size in bytes, header included
    pub encoded_bytes: u64,
}

impl Dataset {
    /// Generate rows until the serialized size reaches `target_bytes`
    ///
    /// The last row may overshoot the target by less than one row length.
    /// At least one data row is always generated.
    pub fn generate(target_bytes: u64, seed: u64) -> Self {
        let mut rng = SmallRng::seed_from_u64(seed);
        let mut rows = Vec::new();
        let mut encoded_bytes = header_len();

        while encoded_bytes < target_bytes || rows.is_empty() {
            let row = SampleRow::new(rows.len() as u64, rng.gen_range(0..1_000_000));
            encoded_bytes += row.encoded_len();
            rows.push(row);
        }

        Self { rows, encoded_bytes }
    }
}

/// Custom benchmark executor
pub struct CustomBenchmark {
    work_dir: PathBuf,
}

impl CustomBenchmark {
    /// Create an executor writing its CSV file into `work_dir`
    pub fn new(work_dir: &Path) -> Self {
        Self {
            work_dir: work_dir.to_path_buf(),
        }
    }

    /// CSV file used for a given data size
    pub fn test_file(&self, size_mb: f64) -> PathBuf {
        self.work_dir
            .join(format!("custom_write_{}.csv", mb_to_bytes(size_mb)))
    }

    /// Build the dataset for a data size; seeded by size so runs are comparable
    pub fn dataset(&self, size_mb: f64) -> Dataset {
        let target = mb_to_bytes(size_mb);
        Dataset::generate(target, target)
    }

    /// Time serializing `dataset` to the test file, synced to disk
    pub fn run_write(&self, ctx: &MeasurementContext, dataset: &Dataset) -> Result<MeasurementRecord> {
        let path = self.test_file(ctx.size_mb);
        let fail = |what: &str, e: &dyn std::fmt::Display| {
            SbcBenchError::MeasurementError(
                ctx.failure(format!("{} {}: {}", what, path.display(), e)),
            )
        };

        let start = Instant::now();
        let file = File::create(&path).map_err(|e| fail("create", &e))?;
        let mut writer = csv::Writer::from_writer(BufWriter::new(file));
        for row in &dataset.rows {
            writer.serialize(row).map_err(|e| fail("write", &e))?;
        }
        let buffered = writer
            .into_inner()
            .map_err(|e| fail("flush", &e.error().to_string()))?;
        let file = buffered
            .into_inner()
            .map_err(|e| fail("flush", &e.error().to_string()))?;
        file.sync_all().map_err(|e| fail("sync", &e))?;
        let elapsed = start.elapsed();

        debug!(
            %ctx,
            rows = dataset.rows.len(),
            bytes = dataset.encoded_bytes,
            secs = elapsed.as_secs_f64(),
            "custom write complete"
        );
        Ok(ctx.record(elapsed.as_secs_f64()))
    }

    /// Time reading the test file back into typed rows
    ///
    /// Fails if the file does not hold exactly `expected_rows` rows.
    pub fn run_read(&self, ctx: &MeasurementContext, expected_rows: usize) -> Result<MeasurementRecord> {
        let path = self.test_file(ctx.size_mb);
        let fail = |what: &str, e: &dyn std::fmt::Display| {
            SbcBenchError::MeasurementError(
                ctx.failure(format!("{} {}: {}", what, path.display(), e)),
            )
        };

        let start = Instant::now();
        let mut reader = csv::Reader::from_path(&path).map_err(|e| fail("open", &e))?;
        let rows = reader
            .deserialize::<SampleRow>()
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(|e| fail("read", &e))?;
        let elapsed = start.elapsed();

        if rows.len() != expected_rows {
            return Err(SbcBenchError::MeasurementError(ctx.failure(format!(
                "read {} rows from {}, expected {}",
                rows.len(),
                path.display(),
                expected_rows
            ))));
        }

        debug!(%ctx, rows = rows.len(), secs = elapsed.as_secs_f64(), "custom read complete");
        Ok(ctx.record(elapsed.as_secs_f64()))
    }
}
