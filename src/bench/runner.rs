//! Benchmark orchestration
//!
//! Walks every (size, run, test type) combination strictly in sequence,
//! one measurement at a time. Each record is persisted as soon as it is
//! measured. A failed measurement is reported and the loop moves on;
//! only an unwritable results file stops the run.

use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;

use chrono::{DateTime, Utc};
use indicatif::ProgressBar;
use tracing::{debug, info, warn};

use crate::bench::custom::CustomBenchmark;
use crate::bench::synthetic::SyntheticBenchmark;
use crate::config::BenchmarkConfig;
use crate::io::ProcessRunner;
use crate::models::{MeasurementContext, MeasurementFailure, MeasurementRecord, TestType};
use crate::report::ResultsWriter;
use crate::{SbcBenchError, Result};

/// Everything a finished run produced
#[derive(Debug, Clone)]
pub struct RunOutcome {
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    /// Successful measurements in execution order
    pub records: Vec<MeasurementRecord>,
    /// Measurements that were reported instead of recorded
    pub failures: Vec<MeasurementFailure>,
}

impl RunOutcome {
    /// Number of measurements attempted
    pub fn attempted(&self) -> usize {
        self.records.len() + self.failures.len()
    }

    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Sequential benchmark driver
pub struct BenchmarkRunner<'a> {
    config: &'a BenchmarkConfig,
    process: &'a dyn ProcessRunner,
}

impl<'a> BenchmarkRunner<'a> {
    /// Create a runner for a validated configuration
    pub fn new(config: &'a BenchmarkConfig, process: &'a dyn ProcessRunner) -> Result<Self> {
        config.validate()?;
        Ok(Self { config, process })
    }

    /// Run every combination, reporting progress on `progress`
    ///
    /// The progress bar length should be `config.expected_measurements()`;
    /// `ProgressBar::hidden()` disables console output.
    pub fn run(&self, progress: &ProgressBar) -> Result<RunOutcome> {
        self.run_reporting(progress, &mut io::sink())
    }

    /// Like `run`, but per-measurement lines go to `out` whenever the
    /// progress bar is hidden (stderr not a terminal, or a hidden bar)
    pub fn run_reporting<W: Write>(&self, progress: &ProgressBar, out: &mut W) -> Result<RunOutcome> {
        let started_at = Utc::now();
        let results_dir = self.config.results_dir();
        fs::create_dir_all(&results_dir).map_err(|e| SbcBenchError::WriteError(
            format!("Failed to create results directory {}: {}", results_dir.display(), e)
        ))?;

        let mut writer = ResultsWriter::create(&self.config.results_file())?;
        let synthetic = SyntheticBenchmark::new(self.process, &self.config.fio, &results_dir);
        let custom = CustomBenchmark::new(&results_dir);

        let mut records = Vec::with_capacity(self.config.expected_measurements());
        let mut failures = Vec::new();

        info!(
            hardware = %self.config.hardware_label,
            sizes = ?self.config.data_sizes_mb,
            runs = self.config.num_runs,
            dir = %results_dir.display(),
            "starting benchmark"
        );

        for &size_mb in &self.config.data_sizes_mb {
            console_line(progress, out, format!("\nTesting with size: {:.2} MB", size_mb));
            let dataset = custom.dataset(size_mb);

            for run in 1..=self.config.num_runs {
                console_line(progress, out, format!("Run {} of {}", run, self.config.num_runs));

                let mut scratch = synthetic.test_files();
                scratch.push(custom.test_file(size_mb));
                // Removed when this run ends, including an early return
                let _scratch = ScratchFiles::new(scratch, self.config.keep_test_files);

                for test_type in TestType::ALL {
                    let ctx = MeasurementContext::new(test_type, size_mb, run);
                    progress.set_message(ctx.to_string());

                    let measured = match test_type {
                        TestType::CustomWrite => custom.run_write(&ctx, &dataset),
                        TestType::CustomRead => custom.run_read(&ctx, dataset.rows.len()),
                        _ => synthetic.run(&ctx),
                    };

                    match measured {
                        Ok(record) => {
                            writer.append(&record)?;
                            console_line(
                                progress,
                                out,
                                format!("  {}: {}", test_type, record.formatted_result()),
                            );
                            records.push(record);
                        }
                        Err(SbcBenchError::MeasurementError(failure)) => {
                            warn!(%failure, "measurement failed");
                            console_line(
                                progress,
                                out,
                                format!("  {}: FAILED ({})", test_type, failure.reason),
                            );
                            failures.push(failure);
                        }
                        Err(other) => return Err(other),
                    }
                    progress.inc(1);
                }
            }
        }

        info!(
            recorded = writer.rows_written(),
            failed = failures.len(),
            file = %writer.path().display(),
            "benchmark finished"
        );

        Ok(RunOutcome {
            started_at,
            finished_at: Utc::now(),
            records,
            failures,
        })
    }
}

fn console_line<W: Write>(progress: &ProgressBar, out: &mut W, line: String) {
    if progress.is_hidden() {
        // Best effort: a closed stdout must not abort the run
        if let Err(e) = writeln!(out, "{}", line) {
            debug!(error = %e, "console output dropped");
        }
    } else {
        progress.println(line);
    }
}

/// Scratch files of one run, deleted on drop unless kept
struct ScratchFiles {
    paths: Vec<PathBuf>,
    keep: bool,
}

impl ScratchFiles {
    fn new(paths: Vec<PathBuf>, keep: bool) -> Self {
        Self { paths, keep }
    }
}

impl Drop for ScratchFiles {
    fn drop(&mut self) {
        if self.keep {
            return;
        }
        for path in &self.paths {
            if let Err(e) = fs::remove_file(path) {
                if e.kind() != io::ErrorKind::NotFound {
                    warn!(path = %path.display(), error = %e, "failed to remove test file");
                }
            }
        }
    }
}
