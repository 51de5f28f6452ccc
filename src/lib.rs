//! SBCBench - storage throughput benchmark harness
//!
//! Measures the throughput of a mounted filesystem on a single-board
//! computer by driving `fio` for raw sequential/random I/O and timing a
//! structured CSV write/read workload, then persists every measurement
//! and prints a per-group summary.

use thiserror::Error;

pub mod bench;
pub mod config;
pub mod deps;
pub mod io;
pub mod models;
pub mod report;
pub mod session;
pub mod util;

use models::MeasurementFailure;

/// Errors surfaced by the harness
#[derive(Debug, Error)]
pub enum SbcBenchError {
    /// I/O operation failed outside of a measurement
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
    /// Configuration file missing, unreadable or invalid
    #[error("Configuration error: {0}")]
    ConfigError(String),
    /// Synthetic I/O tool missing and could not be installed
    #[error("Dependency error: {0}")]
    DependencyError(String),
    /// A single measurement failed; the run continues with the next one
    #[error("Measurement error: {0}")]
    MeasurementError(MeasurementFailure),
    /// Output directory or results file not writable
    #[error("Write error: {0}")]
    WriteError(String),
    /// Host OS cannot run the benchmark
    #[error("Unsupported platform: {0}")]
    UnsupportedPlatform(String),
    /// Run finished but some measurements were reported as failed
    #[error("Incomplete run: {failed} of {attempted} measurements failed")]
    IncompleteRun { failed: usize, attempted: usize },
}

impl From<toml::de::Error> for SbcBenchError {
    fn from(err: toml::de::Error) -> Self {
        SbcBenchError::ConfigError(format!("TOML parsing error: {}", err))
    }
}

impl From<csv::Error> for SbcBenchError {
    fn from(err: csv::Error) -> Self {
        SbcBenchError::WriteError(format!("CSV error: {}", err))
    }
}

impl From<serde_json::Error> for SbcBenchError {
    fn from(err: serde_json::Error) -> Self {
        SbcBenchError::WriteError(format!("JSON serialization error: {}", err))
    }
}

/// Result type alias for SBCBench operations
pub type Result<T> = std::result::Result<T, SbcBenchError>;

/// Error reporting utilities for the binary
pub mod error {
    use super::SbcBenchError;

    /// Convert error to a message telling the user what to do next
    pub fn user_friendly_message(error: &SbcBenchError) -> String {
        match error {
            SbcBenchError::ConfigError(msg) => {
                format!("{}. Check the fields of {}.", msg, crate::CONFIG_FILE)
            }
            SbcBenchError::DependencyError(msg) => format!(
                "{}. Please install it manually using 'sudo apt install {}'.",
                msg,
                crate::SYNTHETIC_TOOL
            ),
            SbcBenchError::WriteError(msg) => format!(
                "{}. Check permissions and free space of the output directory.",
                msg
            ),
            SbcBenchError::UnsupportedPlatform(msg) => {
                format!("{}. This benchmark only runs on Linux.", msg)
            }
            SbcBenchError::IncompleteRun { .. } => format!(
                "{}. The failed combinations are listed above; completed rows were saved.",
                error
            ),
            _ => error.to_string(),
        }
    }

    /// Process exit code for a fatal error
    pub fn exit_code(error: &SbcBenchError) -> u8 {
        match error {
            SbcBenchError::ConfigError(_) => 1,
            SbcBenchError::DependencyError(_) | SbcBenchError::UnsupportedPlatform(_) => 2,
            SbcBenchError::WriteError(_) | SbcBenchError::IoError(_) => 3,
            SbcBenchError::IncompleteRun { .. } | SbcBenchError::MeasurementError(_) => 4,
        }
    }
}

pub const APP_NAME: &str = "sbcbench";
pub const CONFIG_FILE: &str = "benchmark_config.toml";
pub const RESULTS_FILE: &str = "benchmark_results.csv";
pub const METADATA_FILE: &str = "run_metadata.json";
pub const RESULTS_DIR_PREFIX: &str = "hw_benchmark_results_";
pub const SYNTHETIC_TOOL: &str = "fio";

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{MeasurementContext, TestType};

    #[test]
    fn test_exit_codes_are_distinct_per_class() {
        let config = SbcBenchError::ConfigError("x".into());
        let dependency = SbcBenchError::DependencyError("x".into());
        let write = SbcBenchError::WriteError("x".into());
        let incomplete = SbcBenchError::IncompleteRun { failed: 1, attempted: 6 };

        assert_eq!(error::exit_code(&config), 1);
        assert_eq!(error::exit_code(&dependency), 2);
        assert_eq!(error::exit_code(&write), 3);
        assert_eq!(error::exit_code(&incomplete), 4);
    }

    #[test]
    fn test_dependency_message_names_manual_install() {
        let msg = error::user_friendly_message(&SbcBenchError::DependencyError(
            "fio is not installed".into(),
        ));
        assert!(msg.contains("sudo apt install fio"));
    }

    #[test]
    fn test_measurement_error_carries_context() {
        let err = SbcBenchError::MeasurementError(MeasurementFailure::new(
            MeasurementContext::new(TestType::RandRead, 10.0, 2),
            "no bandwidth line",
        ));
        let text = err.to_string();
        assert!(text.contains("Random Read"));
        assert!(text.contains("10.00 MB"));
        assert!(text.contains("run 2"));
        assert!(text.contains("no bandwidth line"));
    }
}
