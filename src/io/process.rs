use std::io;
use std::process::{Command, Stdio};

use tracing::debug;

/// Captured result of a finished subprocess
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProcessOutput {
    /// Whether the process exited with status 0
    pub success: bool,
    /// Exit code, if the process was not killed by a signal
    pub code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl ProcessOutput {
    /// Short description of how the process ended
    pub fn status_text(&self) -> String {
        match self.code {
            Some(code) => format!("exit status {}", code),
            None => "terminated by signal".to_string(),
        }
    }
}

/// Subprocess execution seam
///
/// Every external command (tool probe, package install, benchmark runs)
/// goes through this trait so orchestration can be exercised without the
/// real tools installed.
pub trait ProcessRunner {
    /// Run `program` with `args`, block until it exits and capture its output
    fn run(&self, program: &str, args: &[String]) -> io::Result<ProcessOutput>;
}

/// Runs commands on the host with `std::process::Command`
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemRunner;

impl SystemRunner {
    pub fn new() -> Self {
        Self
    }
}

impl ProcessRunner for SystemRunner {
    fn run(&self, program: &str, args: &[String]) -> io::Result<ProcessOutput> {
        debug!(program, args = %args.join(" "), "spawning process");

        let output = Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .output()?;

        let result = ProcessOutput {
            success: output.status.success(),
            code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        };
        debug!(program, status = %result.status_text(), "process finished");
        Ok(result)
    }
}
