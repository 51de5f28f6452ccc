//! A complete benchmark session
//!
//! Platform check, config loading, dependency probe, the measurement loop,
//! the console summary and run metadata, in that order. The binary is a
//! thin wrapper that supplies the real process runner and stdout.

use std::io::Write;
use std::path::Path;

use indicatif::ProgressBar;
use tracing::info;

use crate::bench::{BenchmarkRunner, RunOutcome};
use crate::config::BenchmarkConfig;
use crate::io::ProcessRunner;
use crate::report::{render_table, summarize, HostInfo, RunMetadata};
use crate::{deps, Result, SbcBenchError, METADATA_FILE};

/// Run one session against the config file at `config_path`, or the
/// first standard location when `None`
///
/// Console output (progress lines when `progress` is hidden, then the
/// summary table) goes to `out`. Returns `IncompleteRun` when any
/// measurement failed; the results file and metadata are written first.
pub fn run_session<W: Write>(
    config_path: Option<&Path>,
    process: &dyn ProcessRunner,
    progress: &ProgressBar,
    out: &mut W,
) -> Result<RunOutcome> {
    deps::ensure_supported_platform()?;

    // Config errors must surface before any subprocess is spawned
    let config = match config_path {
        Some(path) => BenchmarkConfig::load_from(path)?,
        None => BenchmarkConfig::load()?,
    };
    let runner = BenchmarkRunner::new(&config, process)?;
    deps::ensure_tool_installed(process)?;

    progress.set_length(config.expected_measurements() as u64);
    let outcome = runner.run_reporting(progress, out)?;
    progress.finish_and_clear();

    writeln!(
        out,
        "\nResults for {} (saved to {})\n",
        config.hardware_label,
        config.results_file().display()
    )?;
    writeln!(out, "{}", render_table(&summarize(&outcome.records), &outcome.failures))?;

    let metadata_path = config.results_dir().join(METADATA_FILE);
    RunMetadata {
        started_at: outcome.started_at,
        finished_at: outcome.finished_at,
        host: HostInfo::detect(),
        config: &config,
        expected_measurements: config.expected_measurements(),
        recorded_measurements: outcome.records.len(),
        failures: &outcome.failures,
    }
    .write(&metadata_path)?;
    info!(path = %metadata_path.display(), "metadata written");

    if outcome.is_complete() {
        Ok(outcome)
    } else {
        Err(SbcBenchError::IncompleteRun {
            failed: outcome.failures.len(),
            attempted: outcome.attempted(),
        })
    }
}
