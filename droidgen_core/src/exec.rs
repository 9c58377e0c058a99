//! External process invocation.
//!
//! Tasks never spawn processes directly. They go through a [`CommandExecutor`],
//! which lets tests substitute a recording implementation and lets a host
//! (e.g. a `build.rs`) wrap invocations with its own bookkeeping.

use crate::error::{DroidgenError, Result};
use std::io;
use std::path::Path;
use std::process::Command;
use tracing::{debug, info, warn};

/// Outcome of a single external program run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionResult {
    /// Exit code, or `None` if the process was terminated by a signal.
    pub exit_code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
    pub succeeded: bool,
}

impl ExecutionResult {
    /// Stdout and stderr joined, for diagnostics.
    pub fn merged_output(&self) -> String {
        match (self.stdout.trim_end(), self.stderr.trim_end()) {
            ("", err) => err.to_string(),
            (out, "") => out.to_string(),
            (out, err) => format!("{out}\n{err}"),
        }
    }
}

/// Runs external programs on behalf of the generation tasks.
#[cfg_attr(test, mockall::automock)]
pub trait CommandExecutor {
    /// Runs `program` with `args` in `working_dir` and waits for it to finish.
    ///
    /// # Errors
    ///
    /// - [`DroidgenError::ToolNotFound`] if the program does not exist or is
    ///   not executable.
    /// - [`DroidgenError::ToolSpawn`] for any other start failure.
    /// - [`DroidgenError::ToolExecutionFailed`] if `fail_on_non_zero_exit` is
    ///   set and the program did not exit successfully.
    fn execute(
        &self,
        program: &str,
        args: &[String],
        working_dir: &Path,
        fail_on_non_zero_exit: bool,
    ) -> Result<ExecutionResult>;
}

/// [`CommandExecutor`] backed by [`std::process::Command`].
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessExecutor;

impl ProcessExecutor {
    pub fn new() -> Self {
        Self
    }
}

impl CommandExecutor for ProcessExecutor {
    fn execute(
        &self,
        program: &str,
        args: &[String],
        working_dir: &Path,
        fail_on_non_zero_exit: bool,
    ) -> Result<ExecutionResult> {
        info!("{} {:?}", program, args);
        debug!("Working directory: {}", working_dir.display());

        let output = Command::new(program)
            .args(args)
            .current_dir(working_dir)
            .output()
            .map_err(|source| match source.kind() {
                io::ErrorKind::NotFound | io::ErrorKind::PermissionDenied => {
                    DroidgenError::ToolNotFound {
                        program: program.to_string(),
                        source,
                    }
                }
                _ => DroidgenError::ToolSpawn {
                    program: program.to_string(),
                    source,
                },
            })?;

        let result = ExecutionResult {
            exit_code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            succeeded: output.status.success(),
        };

        for line in result.stdout.lines().filter(|l| !l.trim().is_empty()) {
            debug!("[{}] {}", program, line);
        }
        for line in result.stderr.lines().filter(|l| !l.trim().is_empty()) {
            warn!("[{}] {}", program, line);
        }

        if !result.succeeded && fail_on_non_zero_exit {
            return Err(DroidgenError::ToolExecutionFailed {
                program: program.to_string(),
                exit_code: result.exit_code,
                output: result.merged_output(),
            });
        }

        Ok(result)
    }
}
