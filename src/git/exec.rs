// gitpilot: Interactive Git Workflow Runner
//
// SPDX-FileCopyrightText: 2026 Gitpilot Contributors
// SPDX-License-Identifier: GPL-3.0-or-later

//! Git subprocess execution.
//!
//! ```text
//! GitExecutor::run(["status", "--porcelain"])
//!     |
//!     v
//! git -C <workdir> ...  (workdir passed explicitly, process-wide
//!     |                  cwd is never touched)
//!     v
//! CommandOutcome { succeeded, stdout, diagnostic }
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::core::process::ProcessBuilder;
use crate::error::ProcessError;

use super::outcome::CommandOutcome;

/// Runs git commands against one repository root.
///
/// The executor never interprets failures; it reports them as failed
/// [`CommandOutcome`]s. Only "git could not be started at all" is an error.
#[derive(Debug, Clone)]
pub struct GitExecutor {
    git: PathBuf,
    workdir: PathBuf,
    timeout: Option<Duration>,
}

impl GitExecutor {
    /// Creates an executor for the given working directory.
    ///
    /// # Errors
    ///
    /// Returns a `ProcessError::ExecutableNotFound` if `git` is not in PATH.
    pub fn new(workdir: impl AsRef<Path>) -> std::result::Result<Self, ProcessError> {
        let git = ProcessBuilder::find("git").ok_or_else(|| ProcessError::ExecutableNotFound {
            name: "git".to_string(),
        })?;
        Ok(Self {
            git,
            workdir: workdir.as_ref().to_path_buf(),
            timeout: None,
        })
    }

    /// Sets a per-invocation timeout. Default is none: a hung git process
    /// hangs the workflow, matching the wrapped tool's own behavior.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// Returns a new executor for a different working directory, keeping
    /// the resolved git path and timeout.
    #[must_use]
    pub fn for_dir(&self, workdir: impl AsRef<Path>) -> Self {
        Self {
            git: self.git.clone(),
            workdir: workdir.as_ref().to_path_buf(),
            timeout: self.timeout,
        }
    }

    /// The repository root this executor operates on.
    #[must_use]
    pub fn workdir(&self) -> &Path {
        &self.workdir
    }

    /// Repository marker check: presence of the reserved `.git` directory.
    /// Existence only; its contents are never parsed.
    #[must_use]
    pub fn is_repository(&self) -> bool {
        self.workdir.join(".git").is_dir()
    }

    /// Runs `git <args>` in the executor's working directory and captures
    /// both streams.
    ///
    /// Never interactive: credential and terminal prompts are disabled so a
    /// missing login surfaces as a classified failure instead of a hang.
    ///
    /// # Errors
    ///
    /// Returns a [`ProcessError`] only when the process cannot be started
    /// or times out; a non-zero git exit is a failed [`CommandOutcome`].
    pub async fn run(&self, args: &[&str]) -> std::result::Result<CommandOutcome, ProcessError> {
        let output = ProcessBuilder::new(&self.git)
            .args(args)
            .cwd(&self.workdir)
            .env("GIT_TERMINAL_PROMPT", "0")
            .env("GCM_INTERACTIVE", "never")
            .maybe_timeout(self.timeout)
            .name(format!("git {}", args.first().copied().unwrap_or("")))
            .run()
            .await?;
        Ok(CommandOutcome::from(output))
    }

    /// Like [`run`](Self::run), but returns trimmed stdout on success and a
    /// `GitError::CommandFailed` on a non-zero exit. For internal queries
    /// where a failure is not part of the workflow.
    pub(crate) async fn query(&self, args: &[&str]) -> crate::error::Result<String> {
        let outcome = self.run(args).await?;
        if outcome.succeeded {
            Ok(outcome.stdout.trim().to_string())
        } else {
            Err(crate::error::GitError::CommandFailed {
                command: format!("git {}", args.join(" ")),
                message: outcome.diagnostic.trim().to_string(),
            }
            .into())
        }
    }
}
