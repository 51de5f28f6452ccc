//! Utility functions module
//!
//! Contains helpers for size conversion and for reading throughput
//! figures out of the synthetic tool's report.

pub mod units;

// Re-export commonly used functions
pub use units::{
    mb_to_bytes, parse_block_size,
    parse_throughput, ThroughputParseError,
};
