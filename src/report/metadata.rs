//! Run metadata persistence
//!
//! Written next to the results CSV once a run finishes: when it ran, on
//! what host, with which configuration, and which measurements failed.

use std::fs;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::config::BenchmarkConfig;
use crate::models::MeasurementFailure;
use crate::{SbcBenchError, Result};

/// Host the benchmark ran on
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HostInfo {
    /// Operating system and architecture
    pub os: String,
    /// Kernel release, "unknown" if unavailable
    pub kernel: String,
}

impl HostInfo {
    pub fn detect() -> Self {
        Self {
            os: format!("{} {}", std::env::consts::OS, std::env::consts::ARCH),
            kernel: fs::read_to_string("/proc/sys/kernel/osrelease")
                .map(|s| s.trim().to_string())
                .unwrap_or_else(|_| "unknown".to_string()),
        }
    }
}

/// Summary of a finished run
#[derive(Debug, Clone, Serialize)]
pub struct RunMetadata<'a> {
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub host: HostInfo,
    pub config: &'a BenchmarkConfig,
    pub expected_measurements: usize,
    pub recorded_measurements: usize,
    pub failures: &'a [MeasurementFailure],
}

impl RunMetadata<'_> {
    /// Write as pretty-printed JSON, replacing any previous file
    pub fn write(&self, path: &Path) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content).map_err(|e| SbcBenchError::WriteError(
            format!("Failed to write metadata file {}: {}", path.display(), e)
        ))
    }
}
