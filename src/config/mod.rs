//! Configuration loading module
//!
//! Reads `benchmark_config.toml`, validates it and resolves where results
//! are written. The loaded `BenchmarkConfig` is passed explicitly to every
//! component; there is no process-wide config state.

use std::fs;
use std::path::{Path, PathBuf};
use serde::{Deserialize, Serialize};
use crate::util::units::parse_block_size;
use crate::{SbcBenchError, Result, APP_NAME, CONFIG_FILE, RESULTS_DIR_PREFIX, RESULTS_FILE};

/// Validated benchmark configuration
#[derive(Debug, Clone, Serialize)]
pub struct BenchmarkConfig {
    /// Hardware label; names the output directory
    pub hardware_label: String,
    /// Data sizes in MB (1 MB = 1 MiB), in run order
    pub data_sizes_mb: Vec<f64>,
    /// Number of runs per size
    pub num_runs: u32,
    /// Synthetic tool tuning
    pub fio: FioSettings,
    /// Whether to keep scratch test files after each run
    pub keep_test_files: bool,
    /// Directory the output directory is created in
    pub base_dir: PathBuf,
}

/// Parameters handed to `fio` for every synthetic test
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FioSettings {
    /// Measured runtime per invocation
    pub runtime_secs: u64,
    /// Warm-up excluded from the measurement
    pub ramp_time_secs: u64,
    pub io_depth: u32,
    /// Parallel jobs, reported as one group
    pub num_jobs: u32,
    pub ioengine: String,
    /// Bypass the page cache (O_DIRECT)
    pub direct_io: bool,
    /// Block size for sequential tests, `fio` notation
    pub seq_block_size: String,
    /// Block size for random tests, `fio` notation
    pub rand_block_size: String,
}

impl Default for FioSettings {
    fn default() -> Self {
        Self {
            runtime_secs: 60,
            ramp_time_secs: 2,
            io_depth: 64,
            num_jobs: 4,
            ioengine: "libaio".to_string(),
            direct_io: true,
            seq_block_size: "1M".to_string(),
            rand_block_size: "4K".to_string(),
        }
    }
}

impl FioSettings {
    /// Validate tuning parameters
    pub fn validate(&self) -> Result<()> {
        if self.runtime_secs == 0 {
            return Err(SbcBenchError::ConfigError(
                "fio.runtime_secs must be greater than 0".to_string()
            ));
        }
        if self.io_depth == 0 {
            return Err(SbcBenchError::ConfigError(
                "fio.io_depth must be greater than 0".to_string()
            ));
        }
        if self.num_jobs == 0 {
            return Err(SbcBenchError::ConfigError(
                "fio.num_jobs must be greater than 0".to_string()
            ));
        }
        if self.ioengine.trim().is_empty() {
            return Err(SbcBenchError::ConfigError(
                "fio.ioengine must not be empty".to_string()
            ));
        }
        parse_block_size(&self.seq_block_size)
            .map_err(|e| SbcBenchError::ConfigError(format!("fio.seq_block_size: {}", e)))?;
        parse_block_size(&self.rand_block_size)
            .map_err(|e| SbcBenchError::ConfigError(format!("fio.rand_block_size: {}", e)))?;
        Ok(())
    }
}

/// On-disk layout of the config file
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    test_hw: String,
    #[serde(rename = "test_data_sizes_mB")]
    test_data_sizes_mb: Vec<f64>,
    num_runs: i64,
    #[serde(default)]
    keep_test_files: bool,
    #[serde(default)]
    fio: FioSettings,
}

impl BenchmarkConfig {
    /// Parse and validate configuration text; results go under `base_dir`
    pub fn from_toml_str(content: &str, base_dir: impl Into<PathBuf>) -> Result<Self> {
        let file: ConfigFile = toml::from_str(content)?;

        if file.num_runs < 1 {
            return Err(SbcBenchError::ConfigError(format!(
                "num_runs must be at least 1 (got {})",
                file.num_runs
            )));
        }
        let num_runs = u32::try_from(file.num_runs).map_err(|_| {
            SbcBenchError::ConfigError(format!("num_runs too large: {}", file.num_runs))
        })?;

        let config = Self {
            hardware_label: file.test_hw.trim().to_string(),
            data_sizes_mb: file.test_data_sizes_mb,
            num_runs,
            fio: file.fio,
            keep_test_files: file.keep_test_files,
            base_dir: base_dir.into(),
        };
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a specific file; results go next to it
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| SbcBenchError::ConfigError(
                format!("Failed to read config file {}: {}", path.display(), e)
            ))?;

        let base_dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };

        Self::from_toml_str(&content, base_dir).map_err(|e| match e {
            SbcBenchError::ConfigError(msg) => {
                SbcBenchError::ConfigError(format!("{}: {}", path.display(), msg))
            }
            other => other,
        })
    }

    /// Load configuration from the first existing standard location
    pub fn load() -> Result<Self> {
        let candidates = Self::config_file_candidates();
        match candidates.iter().find(|p| p.is_file()) {
            Some(path) => Self::load_from(path),
            None => Err(SbcBenchError::ConfigError(format!(
                "No config file found (searched: {})",
                candidates
                    .iter()
                    .map(|p| p.display().to_string())
                    .collect::<Vec<_>>()
                    .join(", ")
            ))),
        }
    }

    /// Standard config locations, in lookup order:
    /// `./benchmark_config.toml`, then `$CONFIG_HOME/sbcbench/benchmark_config.toml`
    pub fn config_file_candidates() -> Vec<PathBuf> {
        let mut candidates = vec![PathBuf::from(CONFIG_FILE)];
        if let Some(config_dir) = dirs::config_dir() {
            candidates.push(config_dir.join(APP_NAME).join(CONFIG_FILE));
        }
        candidates
    }

    /// Validate the configuration parameters
    pub fn validate(&self) -> Result<()> {
        let label = &self.hardware_label;
        if label.is_empty() {
            return Err(SbcBenchError::ConfigError(
                "test_hw must name the hardware under test".to_string()
            ));
        }
        if label.contains(['/', '\\']) || label == "." || label == ".." {
            return Err(SbcBenchError::ConfigError(
                format!("test_hw must be usable as a directory name: {:?}", label)
            ));
        }

        if self.data_sizes_mb.is_empty() {
            return Err(SbcBenchError::ConfigError(
                "test_data_sizes_mB must list at least one size".to_string()
            ));
        }
        if let Some(bad) = self
            .data_sizes_mb
            .iter()
            .find(|size| !size.is_finite() || **size <= 0.0)
        {
            return Err(SbcBenchError::ConfigError(
                format!("test_data_sizes_mB entries must be positive numbers (got {})", bad)
            ));
        }

        if self.num_runs == 0 {
            return Err(SbcBenchError::ConfigError(
                "num_runs must be at least 1".to_string()
            ));
        }

        self.fio.validate()
    }

    /// Output directory name for a hardware label
    pub fn results_dir_name(hardware_label: &str) -> String {
        format!("{}{}", RESULTS_DIR_PREFIX, hardware_label)
    }

    /// Directory receiving results and scratch test files
    pub fn results_dir(&self) -> PathBuf {
        self.base_dir.join(Self::results_dir_name(&self.hardware_label))
    }

    /// Path of the results CSV
    pub fn results_file(&self) -> PathBuf {
        self.results_dir().join(RESULTS_FILE)
    }

    /// Number of measurements a complete run produces
    pub fn expected_measurements(&self) -> usize {
        self.data_sizes_mb.len() * self.num_runs as usize * crate::models::TestType::ALL.len()
    }
}
