// gitpilot: Interactive Git Workflow Runner
//
// SPDX-FileCopyrightText: 2026 Gitpilot Contributors
// SPDX-License-Identifier: GPL-3.0-or-later

//! Process execution and lifecycle management.
//!
//! ```text
//! run()
//!    |
//!    v
//! build_command()
//! args, cwd, stdio
//!    |
//!    v
//! spawn() --- start failure ---> Err(SpawnFailed)
//!    |                           (or failed output with
//!    v                            IGNORE_START_ERRORS)
//! wait_with_output (optional timeout)
//!    |
//!    v
//! ProcessOutput { exit_code, stdout, stderr }
//! ```
//!
//! A non-zero exit status never produces an error; callers decide what a
//! failed outcome means.

use std::process::Stdio;
use tokio::process::Command;
use tracing::{debug, trace, warn};

use crate::error::ProcessError;

use super::builder::{ProcessBuilder, ProcessFlags, ProcessOutput, StreamFlags};

impl ProcessBuilder {
    /// Returns the display name for this process.
    fn display_name(&self) -> String {
        self.name_override().map_or_else(
            || {
                self.program().file_stem().map_or_else(
                    || "process".to_string(),
                    |s| s.to_string_lossy().into_owned(),
                )
            },
            String::from,
        )
    }

    /// Returns the full command line as a string (for logging).
    fn command_line(&self) -> String {
        let mut cmd = format!("{}", self.program().display());
        for arg in self.args_slice() {
            use std::fmt::Write as _;
            if arg.contains(' ') {
                let _ = write!(cmd, " \"{arg}\"");
            } else {
                let _ = write!(cmd, " {arg}");
            }
        }
        cmd
    }

    /// Spawns the process and waits for completion.
    ///
    /// This is the main entry point for executing a process. The returned
    /// [`ProcessOutput`] carries the exit code and any captured streams; a
    /// non-zero exit is reported through it, never as an error.
    ///
    /// # Errors
    ///
    /// Returns a [`ProcessError`] only if:
    /// - The child process cannot be spawned at all (and
    ///   `IGNORE_START_ERRORS` is not set).
    /// - The configured timeout elapses before the process exits.
    /// - Captured output cannot be read.
    pub async fn run(self) -> std::result::Result<ProcessOutput, ProcessError> {
        let name = self.display_name();
        let cmd_line = self.command_line();

        if let Some(cwd) = self.working_dir() {
            debug!(cwd = %cwd.display(), "cd");
        }
        debug!(cmd = %cmd_line, "exec");

        let mut command = self.build_command();

        let child = match command.spawn() {
            Ok(child) => child,
            Err(e) => {
                if self
                    .process_flags()
                    .contains(ProcessFlags::IGNORE_START_ERRORS)
                {
                    warn!(process = %name, error = %e, "spawn failed, reporting failed output");
                    return Ok(ProcessOutput::new(-1, String::new(), e.to_string()));
                }
                return Err(ProcessError::SpawnFailed {
                    command: cmd_line,
                    source: e,
                });
            }
        };

        let pid = child.id();
        trace!(process = %name, pid = ?pid, "spawned");

        let output = self.wait_for_output(&name, &cmd_line, child).await?;

        trace!(process = %name, exit_code = output.exit_code(), "completed");
        Ok(output)
    }

    /// Waits for the child to exit, honoring the configured timeout.
    ///
    /// `kill_on_drop` on the command reaps the child if the timeout branch
    /// abandons the wait future.
    async fn wait_for_output(
        &self,
        name: &str,
        cmd_line: &str,
        child: tokio::process::Child,
    ) -> std::result::Result<ProcessOutput, ProcessError> {
        let wait = child.wait_with_output();

        let output = if let Some(timeout_duration) = self.timeout_duration() {
            match tokio::time::timeout(timeout_duration, wait).await {
                Ok(result) => result,
                Err(_) => {
                    warn!(process = %name, timeout = ?timeout_duration, "process timed out");
                    return Err(ProcessError::Timeout {
                        command: cmd_line.to_string(),
                        timeout_secs: timeout_duration.as_secs(),
                    });
                }
            }
        } else {
            wait.await
        };

        let output = output.map_err(|e| ProcessError::OutputError {
            command: cmd_line.to_string(),
            message: e.to_string(),
        })?;

        let stdout = if self.stdout_flags().contains(StreamFlags::CAPTURE) {
            String::from_utf8_lossy(&output.stdout).into_owned()
        } else {
            String::new()
        };
        let stderr = if self.stderr_flags().contains(StreamFlags::CAPTURE) {
            String::from_utf8_lossy(&output.stderr).into_owned()
        } else {
            String::new()
        };

        Ok(ProcessOutput::new(
            output.status.code().unwrap_or(-1),
            stdout,
            stderr,
        ))
    }

    /// Builds the tokio Command from this builder's configuration.
    fn build_command(&self) -> Command {
        let mut command = Command::new(self.program());

        command.args(self.args_slice());

        if let Some(cwd) = self.working_dir() {
            command.current_dir(cwd);
        }

        for (key, value) in self.env_slice() {
            command.env(key, value);
        }

        // Workflows never feed interactive input to git
        command.stdin(Stdio::null());
        command.stdout(Self::stdio_from_flags(self.stdout_flags()));
        command.stderr(Self::stdio_from_flags(self.stderr_flags()));
        command.kill_on_drop(true);

        command
    }

    /// Converts `StreamFlags` to Stdio configuration.
    fn stdio_from_flags(flags: StreamFlags) -> Stdio {
        if flags.contains(StreamFlags::INHERIT) {
            Stdio::inherit()
        } else if flags.contains(StreamFlags::BIT_BUCKET) {
            Stdio::null()
        } else {
            Stdio::piped()
        }
    }
}
