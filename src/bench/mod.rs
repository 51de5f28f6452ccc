//! Benchmark engine module
//!
//! Contains the synthetic (`fio`) and custom (CSV) measurements and the
//! sequential loop that drives them.

pub mod custom;
pub mod runner;
pub mod synthetic;

// Re-export commonly used types
pub use custom::{CustomBenchmark, Dataset, SampleRow};
pub use runner::{BenchmarkRunner, RunOutcome};
pub use synthetic::{FioJob, SyntheticBenchmark};
