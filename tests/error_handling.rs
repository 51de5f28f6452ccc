use sbcbench::error;
use sbcbench::models::{MeasurementContext, TestType};
use sbcbench::SbcBenchError;

#[test]
fn test_user_friendly_messages() {
    let msg = error::user_friendly_message(&SbcBenchError::WriteError("x".into()));
    assert!(msg.contains("permissions"));

    let msg = error::user_friendly_message(&SbcBenchError::UnsupportedPlatform("macos".into()));
    assert!(msg.contains("Linux"));

    let msg = error::user_friendly_message(&SbcBenchError::ConfigError("num_runs must be at least 1".into()));
    assert!(msg.contains("benchmark_config.toml"));
}

#[test]
fn test_measurement_failures_exit_non_zero() {
    let failure = MeasurementContext::new(TestType::SeqRead, 1.0, 1).failure("boom");
    assert_ne!(error::exit_code(&SbcBenchError::MeasurementError(failure)), 0);
    assert_ne!(
        error::exit_code(&SbcBenchError::IncompleteRun { failed: 1, attempted: 6 }),
        0
    );
}
