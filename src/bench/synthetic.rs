//! Synthetic benchmark operations
//!
//! Runs `fio` for sequential and random reads and writes at a given data
//! size and turns its text report into a `MeasurementRecord`.

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::config::FioSettings;
use crate::io::ProcessRunner;
use crate::models::{MeasurementContext, MeasurementRecord, TestType};
use crate::util::units::{mb_to_bytes, parse_throughput};
use crate::{SbcBenchError, Result, SYNTHETIC_TOOL};

/// Fixed per-test-type `fio` job parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FioJob {
    /// Job name passed with `--name`
    pub name: &'static str,
    /// Access pattern passed with `--rw`
    pub rw_mode: &'static str,
    /// Scratch file inside the results directory
    pub file_name: &'static str,
    /// Whether the random block size applies
    pub random: bool,
}

impl FioJob {
    /// Job for a synthetic test type; `None` for the custom tests
    pub fn for_test(test_type: TestType) -> Option<Self> {
        let job = match test_type {
            TestType::SeqWrite => Self {
                name: "sequential_write",
                rw_mode: "write",
                file_name: "seq_write_test",
                random: false,
            },
            TestType::SeqRead => Self {
                name: "sequential_read",
                rw_mode: "read",
                file_name: "seq_read_test",
                random: false,
            },
            TestType::RandWrite => Self {
                name: "random_write",
                rw_mode: "randwrite",
                file_name: "rand_write_test",
                random: true,
            },
            TestType::RandRead => Self {
                name: "random_read",
                rw_mode: "randread",
                file_name: "rand_read_test",
                random: true,
            },
            TestType::CustomWrite | TestType::CustomRead => return None,
        };
        Some(job)
    }
}

/// Synthetic benchmark executor
pub struct SyntheticBenchmark<'a> {
    runner: &'a dyn ProcessRunner,
    settings: &'a FioSettings,
    work_dir: PathBuf,
}

impl<'a> SyntheticBenchmark<'a> {
    /// Create an executor writing its test files into `work_dir`
    pub fn new(runner: &'a dyn ProcessRunner, settings: &'a FioSettings, work_dir: &Path) -> Self {
        Self {
            runner,
            settings,
            work_dir: work_dir.to_path_buf(),
        }
    }

    /// Path of the scratch file used by a job
    pub fn test_file(&self, job: &FioJob) -> PathBuf {
        self.work_dir.join(job.file_name)
    }

    /// Scratch files of all four synthetic jobs
    pub fn test_files(&self) -> Vec<PathBuf> {
        TestType::SYNTHETIC
            .iter()
            .filter_map(|t| FioJob::for_test(*t))
            .map(|job| self.test_file(&job))
            .collect()
    }

    /// Full `fio` argument list for one job at `size_bytes`
    pub fn command_args(&self, job: &FioJob, size_bytes: u64) -> Vec<String> {
        let s = self.settings;
        let block_size = if job.random {
            &s.rand_block_size
        } else {
            &s.seq_block_size
        };

        vec![
            "--name".to_string(),
            job.name.to_string(),
            "--filename".to_string(),
            self.test_file(job).display().to_string(),
            "--size".to_string(),
            size_bytes.to_string(),
            "--time_based".to_string(),
            format!("--runtime={}s", s.runtime_secs),
            format!("--ramp_time={}s", s.ramp_time_secs),
            format!("--ioengine={}", s.ioengine),
            format!("--direct={}", u8::from(s.direct_io)),
            "--verify=0".to_string(),
            "--bs".to_string(),
            block_size.clone(),
            "--iodepth".to_string(),
            s.io_depth.to_string(),
            "--rw".to_string(),
            job.rw_mode.to_string(),
            "--numjobs".to_string(),
            s.num_jobs.to_string(),
            "--group_reporting".to_string(),
        ]
    }

    /// Run one synthetic measurement and return its throughput record
    pub fn run(&self, ctx: &MeasurementContext) -> Result<MeasurementRecord> {
        let job = FioJob::for_test(ctx.test_type).ok_or_else(|| {
            SbcBenchError::MeasurementError(ctx.failure("not a synthetic test type"))
        })?;
        let args = self.command_args(&job, mb_to_bytes(ctx.size_mb));

        let output = self.runner.run(SYNTHETIC_TOOL, &args).map_err(|e| {
            SbcBenchError::MeasurementError(
                ctx.failure(format!("failed to start {}: {}", SYNTHETIC_TOOL, e)),
            )
        })?;

        if !output.success {
            return Err(SbcBenchError::MeasurementError(ctx.failure(format!(
                "{} failed with {}: {}",
                SYNTHETIC_TOOL,
                output.status_text(),
                output.stderr.trim()
            ))));
        }

        let mbps = parse_throughput(&output.stdout)
            .map_err(|e| SbcBenchError::MeasurementError(ctx.failure(e.to_string())))?;
        debug!(%ctx, mbps, "synthetic measurement complete");

        Ok(ctx.record(mbps))
    }
}
