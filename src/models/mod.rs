//! Data models module
//!
//! Contains the measurement record produced by every benchmark step and
//! the context used to report failed measurements.

pub mod record;

pub use record::{
    MeasurementContext,
    MeasurementFailure,
    MeasurementRecord,
    ResultUnit,
    TestType,
};
