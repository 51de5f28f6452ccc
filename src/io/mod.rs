//! Process I/O module
//!
//! Contains the subprocess seam used to probe, install and drive the
//! external synthetic I/O tool.

pub mod process;

pub use process::{ProcessOutput, ProcessRunner, SystemRunner};
