//! End-to-end runs against a scripted `fio`

mod common;

use common::{config_in, result_rows, FakeFio};
use indicatif::ProgressBar;
use sbcbench::bench::BenchmarkRunner;
use sbcbench::models::{ResultUnit, TestType};
use sbcbench::report::CSV_HEADER;
use sbcbench::SbcBenchError;
use tempfile::tempdir;

const REPORT: &str = "seq: (groupid=0, jobs=4): err= 0\n  write: IOPS=117, BW=123.45MB/s (123MB/s)(7407MiB/60001msec)\n";

#[test]
fn test_record_count_matches_runs_sizes_and_types() {
    let dir = tempdir().unwrap();
    let config = config_in(dir.path(), "test_hw", "[0.1, 0.2, 0.3]", 2).unwrap();
    let fio = FakeFio::reporting(REPORT);

    let outcome = BenchmarkRunner::new(&config, &fio)
        .unwrap()
        .run(&ProgressBar::hidden())
        .unwrap();

    assert_eq!(outcome.records.len(), 2 * 3 * 6);
    assert_eq!(outcome.records.len(), config.expected_measurements());
    assert_eq!(result_rows(&config.results_file()).len(), 2 * 3 * 6);
    assert_eq!(fio.call_count(), 2 * 3 * 4);
}

#[test]
fn test_results_file_layout() {
    let dir = tempdir().unwrap();
    let config = config_in(dir.path(), "test_hw", "[0.1]", 1).unwrap();
    let fio = FakeFio::reporting(REPORT);

    BenchmarkRunner::new(&config, &fio)
        .unwrap()
        .run(&ProgressBar::hidden())
        .unwrap();

    let path = dir.path().join("hw_benchmark_results_test_hw").join("benchmark_results.csv");
    let mut reader = csv::Reader::from_path(&path).unwrap();
    let headers: Vec<&str> = reader.headers().unwrap().iter().collect();
    assert_eq!(headers, CSV_HEADER);

    let rows = result_rows(&path);
    assert_eq!(&rows[0][0], "Sequential Write");
    assert_eq!(&rows[0][1], "0.10");
    assert_eq!(&rows[0][2], "1");
    assert_eq!(&rows[0][3], "123.45 MB/s");

    assert_eq!(&rows[4][0], "Custom CSV Write");
    assert!(rows[4][3].ends_with(" seconds"));
    assert_eq!(&rows[5][0], "Custom CSV Read");
    assert!(rows[5][3].ends_with(" seconds"));
}

#[test]
fn test_rerun_overwrites_previous_results() {
    let dir = tempdir().unwrap();
    let config = config_in(dir.path(), "test_hw", "[0.1]", 2).unwrap();
    let fio = FakeFio::reporting(REPORT);

    for _ in 0..2 {
        BenchmarkRunner::new(&config, &fio)
            .unwrap()
            .run(&ProgressBar::hidden())
            .unwrap();
    }

    assert_eq!(result_rows(&config.results_file()).len(), 2 * 6);
}

#[test]
fn test_one_megabyte_produces_all_six_types() {
    let dir = tempdir().unwrap();
    let config = config_in(dir.path(), "small", "[1]", 1).unwrap();
    let fio = FakeFio::reporting(REPORT);

    let outcome = BenchmarkRunner::new(&config, &fio)
        .unwrap()
        .run(&ProgressBar::hidden())
        .unwrap();

    let types: Vec<TestType> = outcome.records.iter().map(|r| r.test_type()).collect();
    assert_eq!(types, TestType::ALL);
    for record in &outcome.records {
        assert!(record.value().is_finite());
        assert!(record.value() >= 0.0);
    }
    assert_eq!(outcome.records[0].unit(), ResultUnit::MegabytesPerSecond);
    assert_eq!(outcome.records[5].unit(), ResultUnit::Seconds);
}

#[test]
fn test_fio_receives_size_in_bytes() {
    let dir = tempdir().unwrap();
    let config = config_in(dir.path(), "bytes", "[2]", 1).unwrap();
    let fio = FakeFio::reporting(REPORT);

    BenchmarkRunner::new(&config, &fio)
        .unwrap()
        .run(&ProgressBar::hidden())
        .unwrap();

    for args in fio.calls.borrow().iter() {
        let pos = args.iter().position(|a| a == "--size").unwrap();
        assert_eq!(args[pos + 1], "2097152");
    }
}

#[test]
fn test_unparseable_report_is_reported_not_recorded() {
    let dir = tempdir().unwrap();
    let config = config_in(dir.path(), "broken", "[0.1]", 1).unwrap();
    let fio = FakeFio::reporting("fio: engine libaio not loadable\n");

    let outcome = BenchmarkRunner::new(&config, &fio)
        .unwrap()
        .run(&ProgressBar::hidden())
        .unwrap();

    assert_eq!(outcome.failures.len(), 4);
    assert_eq!(outcome.records.len(), 2);
    assert!(outcome
        .failures
        .iter()
        .all(|f| f.context.test_type.is_synthetic() && f.context.run == 1));
    assert_eq!(result_rows(&config.results_file()).len(), 2);
}

#[test]
fn test_unwritable_output_is_write_error() {
    let dir = tempdir().unwrap();
    let config = config_in(dir.path(), "blocked", "[0.1]", 1).unwrap();
    std::fs::write(config.results_dir(), "not a directory").unwrap();
    let fio = FakeFio::reporting(REPORT);

    let result = BenchmarkRunner::new(&config, &fio)
        .unwrap()
        .run(&ProgressBar::hidden());

    assert!(matches!(result, Err(SbcBenchError::WriteError(_))));
    assert_eq!(fio.call_count(), 0);
}
