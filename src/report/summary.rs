//! Console summary
//!
//! Groups records by (test type, data size) and reports the arithmetic
//! mean alongside min and max across runs.

use std::fmt::Write;

use crate::models::{MeasurementFailure, MeasurementRecord, ResultUnit, TestType};

/// Aggregate of all runs for one (test type, size) group
#[derive(Debug, Clone, PartialEq)]
pub struct SummaryRow {
    pub test_type: TestType,
    pub size_mb: f64,
    pub runs: usize,
    pub mean: f64,
    pub min: f64,
    pub max: f64,
    pub unit: ResultUnit,
}

/// Group records in order of first appearance and compute statistics
pub fn summarize(records: &[MeasurementRecord]) -> Vec<SummaryRow> {
    let mut groups: Vec<(TestType, f64, Vec<f64>)> = Vec::new();

    for record in records {
        // Sizes come from the same config value, so bitwise equality is exact
        let size_bits = record.size_mb().to_bits();
        match groups
            .iter()
            .position(|(t, size, _)| *t == record.test_type() && size.to_bits() == size_bits)
        {
            Some(i) => groups[i].2.push(record.value()),
            None => groups.push((record.test_type(), record.size_mb(), vec![record.value()])),
        }
    }

    groups
        .into_iter()
        .map(|(test_type, size_mb, values)| {
            let runs = values.len();
            let mean = values.iter().sum::<f64>() / runs as f64;
            let min = values.iter().copied().fold(f64::INFINITY, f64::min);
            let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
            SummaryRow {
                test_type,
                size_mb,
                runs,
                mean,
                min,
                max,
                unit: test_type.unit(),
            }
        })
        .collect()
}

/// Render the summary and any failures as an aligned text table
pub fn render_table(rows: &[SummaryRow], failures: &[MeasurementFailure]) -> String {
    let headers = ["Test Type", "Data Size (MB)", "Runs", "Mean", "Min", "Max"];
    let body: Vec<[String; 6]> = rows
        .iter()
        .map(|row| {
            [
                row.test_type.description().to_string(),
                format!("{:.2}", row.size_mb),
                row.runs.to_string(),
                format!("{:.2} {}", row.mean, row.unit),
                format!("{:.2} {}", row.min, row.unit),
                format!("{:.2} {}", row.max, row.unit),
            ]
        })
        .collect();

    let mut widths = headers.map(str::len);
    for cells in &body {
        for (width, cell) in widths.iter_mut().zip(cells) {
            *width = (*width).max(cell.len());
        }
    }

    let mut out = String::new();
    let line = |out: &mut String, cells: &[&str]| {
        let padded: Vec<String> = cells
            .iter()
            .zip(widths.iter())
            .enumerate()
            .map(|(i, (cell, width))| {
                // Text left-aligned, numbers right-aligned
                if i == 0 {
                    format!("{:<width$}", cell, width = *width)
                } else {
                    format!("{:>width$}", cell, width = *width)
                }
            })
            .collect();
        let _ = writeln!(out, "{}", padded.join("  ").trim_end());
    };

    line(&mut out, &headers[..]);
    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    let _ = writeln!(out, "{}", rule.join("  "));
    for cells in &body {
        let refs: Vec<&str> = cells.iter().map(String::as_str).collect();
        line(&mut out, &refs[..]);
    }

    if !failures.is_empty() {
        let _ = writeln!(out, "\nFailed measurements ({}):", failures.len());
        for failure in failures {
            let _ = writeln!(out, "  {}", failure);
        }
    }

    out
}
