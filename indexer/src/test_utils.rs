//! Scripted command execution for tests that must not spawn processes.

use crate::error::{IndexerError, Result};
use crate::trigger::CommandExecutor;
use std::collections::VecDeque;
use std::process::{ExitStatus, Output};
use std::sync::{Mutex, PoisonError};

/// Creates an `ExitStatus` from an exit code (Unix implementation).
#[cfg(unix)]
#[must_use]
pub fn exit_status(code: i32) -> ExitStatus {
    use std::os::unix::process::ExitStatusExt;

    ExitStatus::from_raw(code << 8)
}

/// Creates an `ExitStatus` from an exit code (Windows implementation).
#[cfg(windows)]
#[must_use]
pub fn exit_status(code: i32) -> ExitStatus {
    use std::os::windows::process::ExitStatusExt;

    ExitStatus::from_raw(code.unsigned_abs())
}

/// Creates a successful command `Output` with the given stdout.
#[must_use]
pub fn success_output(stdout: &str) -> Output {
    Output {
        status: exit_status(0),
        stdout: stdout.as_bytes().to_vec(),
        stderr: Vec::new(),
    }
}

/// Creates a failed command `Output` with the given stdout and stderr.
#[must_use]
pub fn failure_output(stdout: &str, stderr: &str) -> Output {
    Output {
        status: exit_status(1),
        stdout: stdout.as_bytes().to_vec(),
        stderr: stderr.as_bytes().to_vec(),
    }
}

/// An expected command invocation and its scripted result.
#[derive(Debug)]
pub struct ExpectedCall {
    /// The program to execute (for example `npm`).
    pub cmd: &'static str,
    /// The arguments passed to the program.
    pub args: Vec<&'static str>,
    /// The result returned when this command is invoked.
    pub result: Result<Output>,
}

impl ExpectedCall {
    /// Expect `cmd args...` and answer with `output`.
    #[must_use]
    pub fn new(cmd: &'static str, args: &[&'static str], output: Output) -> Self {
        Self {
            cmd,
            args: args.to_vec(),
            result: Ok(output),
        }
    }
}

/// A [`CommandExecutor`] that replays expected invocations in order.
///
/// Invocations that do not match the next expectation, or arrive after the
/// script is exhausted, fail with [`IndexerError::StubMismatch`].
#[derive(Debug)]
pub struct StubExecutor {
    expected: Mutex<VecDeque<ExpectedCall>>,
}

impl StubExecutor {
    /// Creates a new `StubExecutor` with the given expected calls.
    #[must_use]
    pub fn new(expected: Vec<ExpectedCall>) -> Self {
        Self {
            expected: Mutex::new(expected.into()),
        }
    }

    /// Number of expected calls not yet consumed.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.expected
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Asserts that all expected command invocations have been consumed.
    ///
    /// # Panics
    ///
    /// Panics if there are remaining expected calls that were not invoked.
    pub fn assert_finished(&self) {
        assert_eq!(
            self.remaining(),
            0,
            "expected no further command invocations"
        );
    }
}

impl CommandExecutor for StubExecutor {
    fn run(&self, cmd: &str, args: &[&str]) -> Result<Output> {
        let mut expected = self
            .expected
            .lock()
            .map_err(|_| IndexerError::StubMismatch {
                message: "expectation queue poisoned".to_owned(),
            })?;
        let Some(call) = expected.pop_front() else {
            return Err(IndexerError::StubMismatch {
                message: format!("unexpected command invocation: {cmd} {args:?}"),
            });
        };

        if call.cmd != cmd || call.args.as_slice() != args {
            return Err(IndexerError::StubMismatch {
                message: format!(
                    "expected {} {:?}, got {cmd} {args:?}",
                    call.cmd, call.args
                ),
            });
        }

        call.result
    }
}
