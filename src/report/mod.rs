//! Result reporting module
//!
//! Persists every measurement to CSV as it is taken, aggregates records
//! into per-group statistics for the console, and writes run metadata.

pub mod csv_sink;
pub mod metadata;
pub mod summary;

pub use csv_sink::{ResultsWriter, CSV_HEADER};
pub use metadata::{HostInfo, RunMetadata};
pub use summary::{render_table, summarize, SummaryRow};
