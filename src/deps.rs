//! Dependency checking
//!
//! Makes sure the host can run the benchmark: a Linux kernel and an
//! installed `fio`. A missing tool gets one unattended install attempt
//! through the package manager; if that fails the run stops.

use tracing::{info, warn};

use crate::io::ProcessRunner;
use crate::{SbcBenchError, Result, SYNTHETIC_TOOL};

/// Refuse to run anywhere but Linux
pub fn ensure_supported_platform() -> Result<()> {
    check_platform(std::env::consts::OS)
}

fn check_platform(os: &str) -> Result<()> {
    if os == "linux" {
        Ok(())
    } else {
        Err(SbcBenchError::UnsupportedPlatform(format!(
            "detected '{}'",
            os
        )))
    }
}

/// Probe for the synthetic tool by running `fio --version`
pub fn is_tool_installed(runner: &dyn ProcessRunner) -> bool {
    match runner.run(SYNTHETIC_TOOL, &["--version".to_string()]) {
        Ok(output) if output.success => {
            info!(version = %output.stdout.trim(), "found {}", SYNTHETIC_TOOL);
            true
        }
        Ok(output) => {
            warn!(status = %output.status_text(), "{} probe failed", SYNTHETIC_TOOL);
            false
        }
        Err(e) => {
            warn!(error = %e, "{} could not be started", SYNTHETIC_TOOL);
            false
        }
    }
}

/// Package manager command installing the tool unattended
///
/// Prefixed with `sudo` unless already running as root.
pub fn install_command(is_root: bool) -> (String, Vec<String>) {
    let mut args = vec![
        "apt-get".to_string(),
        "install".to_string(),
        "-y".to_string(),
        SYNTHETIC_TOOL.to_string(),
    ];
    if is_root {
        let program = args.remove(0);
        (program, args)
    } else {
        ("sudo".to_string(), args)
    }
}

#[cfg(unix)]
fn running_as_root() -> bool {
    // SAFETY: geteuid has no preconditions and cannot fail
    unsafe { libc::geteuid() == 0 }
}

#[cfg(not(unix))]
fn running_as_root() -> bool {
    false
}

/// Ensure the tool is available, installing it if needed
pub fn ensure_tool_installed(runner: &dyn ProcessRunner) -> Result<()> {
    ensure_tool_installed_as(runner, running_as_root())
}

fn ensure_tool_installed_as(runner: &dyn ProcessRunner, is_root: bool) -> Result<()> {
    if is_tool_installed(runner) {
        return Ok(());
    }

    println!(
        "{} is not installed. Attempting to install it via apt...",
        SYNTHETIC_TOOL
    );
    let (program, args) = install_command(is_root);
    let installed = match runner.run(&program, &args) {
        Ok(output) if output.success => true,
        Ok(output) => {
            warn!(
                status = %output.status_text(),
                stderr = %output.stderr.trim(),
                "package install failed"
            );
            false
        }
        Err(e) => {
            warn!(error = %e, "package manager could not be started");
            false
        }
    };

    if installed && is_tool_installed(runner) {
        println!("{} was successfully installed.", SYNTHETIC_TOOL);
        return Ok(());
    }

    Err(SbcBenchError::DependencyError(format!(
        "Could not install '{}'",
        SYNTHETIC_TOOL
    )))
}
