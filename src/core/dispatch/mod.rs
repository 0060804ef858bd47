// gitpilot: Interactive Git Workflow Runner
//
// SPDX-FileCopyrightText: 2026 Gitpilot Contributors
// SPDX-License-Identifier: GPL-3.0-or-later

//! Batched and parallel command dispatch.
//!
//! ```text
//! run_parallel([c1, c2, c3])     run_batched([c1, c2, c3])
//!      |    |    |                        |
//!      v    v    v                        v
//!    three processes              one shell invocation
//!    joined together              "c1 && c2 && c3"
//!      |                                  |
//!      v                                  v
//!  Vec<ProcessOutput>               ProcessOutput
//!  (input order kept)         (first failure aborts rest)
//! ```
//!
//! Batching amortizes process-spawn overhead for sequential command chains;
//! parallel dispatch amortizes wall-clock latency for independent queries.
//! Handlers choose per call site.

use std::path::Path;
use std::time::Duration;

use futures_util::future;
use tracing::debug;

use crate::core::process::{ProcessBuilder, ProcessOutput};
use crate::error::ProcessError;

/// Options shared by both dispatch entry points.
#[derive(Debug, Clone, Default)]
pub struct DispatchOptions {
    /// Working directory for every command.
    pub cwd: Option<std::path::PathBuf>,
    /// Per-invocation timeout (applies to each parallel command, and to the
    /// whole joined invocation when batching).
    pub timeout: Option<Duration>,
}

impl DispatchOptions {
    /// Options running in the given directory, no timeout.
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        Self {
            cwd: Some(dir.as_ref().to_path_buf()),
            timeout: None,
        }
    }
}

fn builder_for(command: &str, options: &DispatchOptions) -> ProcessBuilder {
    let mut builder = ProcessBuilder::raw(command).maybe_timeout(options.timeout);
    if let Some(dir) = &options.cwd {
        builder = builder.cwd(dir);
    }
    builder
}

/// Issues all commands concurrently and collects every outcome.
///
/// The returned vector's i-th element always corresponds to the i-th input
/// command, regardless of which process finished first.
///
/// # Errors
///
/// Returns a [`ProcessError`] if any command cannot be started at all.
/// A command that started and exited non-zero is reported through its
/// [`ProcessOutput`], not as an error.
pub async fn run_parallel(
    commands: &[String],
    options: &DispatchOptions,
) -> std::result::Result<Vec<ProcessOutput>, ProcessError> {
    debug!(count = commands.len(), "parallel dispatch");

    let futures = commands
        .iter()
        .map(|command| builder_for(command, options).run());

    // join_all preserves input order in its output
    future::try_join_all(futures).await
}

/// Joins commands with `&&` into a single invocation.
///
/// Each subsequent command runs only if the previous one succeeded; a failure
/// anywhere aborts the remainder and the single outcome reflects the first
/// failure's diagnostic text.
///
/// # Errors
///
/// Returns a [`ProcessError`] if the shell itself cannot be started.
pub async fn run_batched(
    commands: &[String],
    options: &DispatchOptions,
) -> std::result::Result<ProcessOutput, ProcessError> {
    let joined = commands.join(" && ");
    debug!(count = commands.len(), cmd = %joined, "batched dispatch");

    builder_for(&joined, options).run().await
}
