//! Shared helpers for integration tests

#![allow(dead_code)]

use std::cell::RefCell;
use std::io;
use std::path::Path;

use sbcbench::config::BenchmarkConfig;
use sbcbench::io::{ProcessOutput, ProcessRunner};

/// Stands in for `fio`: answers every call with a fixed report
pub struct FakeFio {
    pub report: String,
    pub calls: RefCell<Vec<Vec<String>>>,
}

impl FakeFio {
    pub fn reporting(report: &str) -> Self {
        Self {
            report: report.to_string(),
            calls: RefCell::new(Vec::new()),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.borrow().len()
    }
}

impl ProcessRunner for FakeFio {
    fn run(&self, _program: &str, args: &[String]) -> io::Result<ProcessOutput> {
        self.calls.borrow_mut().push(args.to_vec());
        Ok(ProcessOutput {
            success: true,
            code: Some(0),
            stdout: self.report.clone(),
            stderr: String::new(),
        })
    }
}

pub fn config_in(dir: &Path, label: &str, sizes: &str, runs: i64) -> sbcbench::Result<BenchmarkConfig> {
    BenchmarkConfig::from_toml_str(
        &format!(
            "test_hw = \"{}\"\ntest_data_sizes_mB = {}\nnum_runs = {}\n",
            label, sizes, runs
        ),
        dir,
    )
}

/// Data rows of a results CSV, header excluded
pub fn result_rows(path: &Path) -> Vec<csv::StringRecord> {
    let mut reader = csv::Reader::from_path(path).expect("results file readable");
    reader
        .records()
        .collect::<Result<Vec<_>, _>>()
        .expect("valid csv")
}
