// gitpilot: Interactive Git Workflow Runner
//
// SPDX-FileCopyrightText: 2026 Gitpilot Contributors
// SPDX-License-Identifier: GPL-3.0-or-later

//! Repository analytics.
//!
//! ```text
//! repo_analytics(cache, root, window)
//!        |
//!   cache key "analytics:<root>"
//!        |
//!        v  (miss)
//! run_parallel:  rev-list --count HEAD
//!                log --format=%an
//!                log -1 --format=%h %s (%ar)
//!                branch --show-current
//!        |
//!        v
//! RepoAnalytics { commits, authors, last_commit, branch }
//! ```
//!
//! Four independent read-only queries, so they dispatch concurrently and the
//! combined answer sits behind the freshness-windowed cache.

use std::path::Path;
use std::time::Duration;

use crate::core::cache::ResultCache;
use crate::core::dispatch::{self, DispatchOptions};
use crate::error::{GitError, Result};

/// Aggregated read-only statistics for one repository.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RepoAnalytics {
    /// Total commits reachable from HEAD.
    pub commits: u64,
    /// Distinct author names, in first-seen order.
    pub authors: Vec<String>,
    /// One-line summary of the most recent commit.
    pub last_commit: String,
    /// Currently checked-out branch (empty on detached HEAD).
    pub branch: String,
}

/// Computes analytics for the repository at `root`, memoized per path for
/// `window`.
///
/// # Errors
///
/// Fails when `root` is not a repository or any query command cannot run.
pub async fn repo_analytics(
    cache: &ResultCache<RepoAnalytics>,
    root: &Path,
    window: Duration,
) -> Result<RepoAnalytics> {
    let key = format!("analytics:{}", root.display());
    cache
        .get_or_compute(&key, window, || compute(root))
        .await
}

async fn compute(root: &Path) -> Result<RepoAnalytics> {
    let commands = vec![
        "git rev-list --count HEAD".to_string(),
        "git log --format=%an".to_string(),
        "git log -1 --format=\"%h %s (%ar)\"".to_string(),
        "git branch --show-current".to_string(),
    ];
    let options = DispatchOptions::in_dir(root);
    let outputs = dispatch::run_parallel(&commands, &options).await?;

    for (command, output) in commands.iter().zip(&outputs) {
        if !output.success() {
            return Err(GitError::CommandFailed {
                command: command.clone(),
                message: output.stderr().trim().to_string(),
            }
            .into());
        }
    }

    let commits = outputs[0].stdout().trim().parse::<u64>().unwrap_or(0);

    let mut authors = Vec::new();
    for author in outputs[1].stdout().lines() {
        let author = author.trim();
        if !author.is_empty() && !authors.iter().any(|a| a == author) {
            authors.push(author.to_string());
        }
    }

    Ok(RepoAnalytics {
        commits,
        authors,
        last_commit: outputs[2].stdout().trim().to_string(),
        branch: outputs[3].stdout().trim().to_string(),
    })
}
