//! Measurement record data models
//!
//! A `MeasurementRecord` is produced once per (test type, size, run) and
//! never modified afterwards. Failed measurements are carried as
//! `MeasurementFailure` so they can be reported and reproduced.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Benchmark step kinds, in the order they run for each (size, run)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TestType {
    /// Synthetic sequential write
    SeqWrite,
    /// Synthetic sequential read
    SeqRead,
    /// Synthetic random write
    RandWrite,
    /// Synthetic random read
    RandRead,
    /// Structured CSV write, timed
    CustomWrite,
    /// Structured CSV read, timed
    CustomRead,
}

impl TestType {
    /// Every test type in execution order
    pub const ALL: [TestType; 6] = [
        TestType::SeqWrite,
        TestType::SeqRead,
        TestType::RandWrite,
        TestType::RandRead,
        TestType::CustomWrite,
        TestType::CustomRead,
    ];

    /// The four test types measured by the synthetic I/O tool
    pub const SYNTHETIC: [TestType; 4] = [
        TestType::SeqWrite,
        TestType::SeqRead,
        TestType::RandWrite,
        TestType::RandRead,
    ];

    /// Human-readable name, also used in the "Test Type" CSV column
    pub fn description(&self) -> &'static str {
        match self {
            TestType::SeqWrite => "Sequential Write",
            TestType::SeqRead => "Sequential Read",
            TestType::RandWrite => "Random Write",
            TestType::RandRead => "Random Read",
            TestType::CustomWrite => "Custom CSV Write",
            TestType::CustomRead => "Custom CSV Read",
        }
    }

    /// Unit the result of this test type is expressed in
    pub fn unit(&self) -> ResultUnit {
        if self.is_synthetic() {
            ResultUnit::MegabytesPerSecond
        } else {
            ResultUnit::Seconds
        }
    }

    pub fn is_synthetic(&self) -> bool {
        !matches!(self, TestType::CustomWrite | TestType::CustomRead)
    }
}

impl fmt::Display for TestType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.description())
    }
}

/// Unit attached to a measurement value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResultUnit {
    /// Decimal megabytes per second
    #[serde(rename = "MB/s")]
    MegabytesPerSecond,
    /// Wall-clock seconds
    #[serde(rename = "seconds")]
    Seconds,
}

impl ResultUnit {
    /// Literal suffix written after the value in the "Result" column
    pub fn suffix(&self) -> &'static str {
        match self {
            ResultUnit::MegabytesPerSecond => "MB/s",
            ResultUnit::Seconds => "seconds",
        }
    }
}

impl fmt::Display for ResultUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.suffix())
    }
}

/// Identifies one (test type, size, run) combination
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MeasurementContext {
    pub test_type: TestType,
    pub size_mb: f64,
    /// 1-based run index
    pub run: u32,
}

impl MeasurementContext {
    pub fn new(test_type: TestType, size_mb: f64, run: u32) -> Self {
        Self { test_type, size_mb, run }
    }

    /// Build the record for a successful measurement of this combination
    pub fn record(&self, value: f64) -> MeasurementRecord {
        MeasurementRecord::new(self.test_type, self.size_mb, self.run, value)
    }

    /// Build the failure report for this combination
    pub fn failure(&self, reason: impl Into<String>) -> MeasurementFailure {
        MeasurementFailure::new(*self, reason)
    }
}

impl fmt::Display for MeasurementContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}, {:.2} MB, run {}",
            self.test_type, self.size_mb, self.run
        )
    }
}

/// One successful measurement
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeasurementRecord {
    test_type: TestType,
    size_mb: f64,
    run: u32,
    value: f64,
    unit: ResultUnit,
}

impl MeasurementRecord {
    /// Create a record; the unit follows from the test type
    pub fn new(test_type: TestType, size_mb: f64, run: u32, value: f64) -> Self {
        Self {
            test_type,
            size_mb,
            run,
            value,
            unit: test_type.unit(),
        }
    }

    pub fn test_type(&self) -> TestType {
        self.test_type
    }

    pub fn size_mb(&self) -> f64 {
        self.size_mb
    }

    pub fn run(&self) -> u32 {
        self.run
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    pub fn unit(&self) -> ResultUnit {
        self.unit
    }

    /// Value with two decimals and its unit suffix, e.g. "123.45 MB/s"
    pub fn formatted_result(&self) -> String {
        format!("{:.2} {}", self.value, self.unit.suffix())
    }
}

/// A measurement that could not be taken, with enough context to rerun it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeasurementFailure {
    pub context: MeasurementContext,
    pub reason: String,
}

impl MeasurementFailure {
    pub fn new(context: MeasurementContext, reason: impl Into<String>) -> Self {
        Self {
            context,
            reason: reason.into(),
        }
    }
}

impl fmt::Display for MeasurementFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.context, self.reason)
    }
}
