use serde::{Deserialize, Serialize};
use std::process::{ExitStatus, Output};

/// Exit code used when the platform reports neither an exit code nor a signal.
pub const UNKNOWN_RETCODE: i32 = -1;

/// Captured outcome of one inference process.
///
/// A non-zero `retcode` is a normal value here: the run still completes, and it is
/// up to the caller to decide what a failed inference means.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunResult {
    pub retcode: i32,
    pub stdout: String,
    pub stderr: String,
}

impl RunResult {
    pub fn success(&self) -> bool {
        self.retcode == 0
    }
}

impl From<Output> for RunResult {
    fn from(output: Output) -> Self {
        Self {
            retcode: retcode_of(output.status),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        }
    }
}

/// Signal terminations map to the negated signal number.
#[cfg(unix)]
fn retcode_of(status: ExitStatus) -> i32 {
    use std::os::unix::process::ExitStatusExt;

    status
        .code()
        .or_else(|| status.signal().map(|signal| -signal))
        .unwrap_or(UNKNOWN_RETCODE)
}

#[cfg(not(unix))]
fn retcode_of(status: ExitStatus) -> i32 {
    status.code().unwrap_or(UNKNOWN_RETCODE)
}
