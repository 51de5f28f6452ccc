use std::process::ExitCode;

use indicatif::{ProgressBar, ProgressStyle};
use sbcbench::io::SystemRunner;
use sbcbench::session::run_session;
use sbcbench::{error, Result};
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "benchmark aborted");
            eprintln!("ERROR: {}", error::user_friendly_message(&e));
            ExitCode::from(error::exit_code(&e))
        }
    }
}

fn run() -> Result<()> {
    let pb = ProgressBar::new(0);
    if let Ok(style) = ProgressStyle::with_template("{spinner} [{pos}/{len}] {elapsed_precise} {msg}") {
        pb.set_style(style);
    }

    let stdout = std::io::stdout();
    run_session(None, &SystemRunner::new(), &pb, &mut stdout.lock())?;
    Ok(())
}
