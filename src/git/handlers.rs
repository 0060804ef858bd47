// gitpilot: Interactive Git Workflow Runner
//
// SPDX-FileCopyrightText: 2026 Gitpilot Contributors
// SPDX-License-Identifier: GPL-3.0-or-later

//! High-level workflow handlers.
//!
//! ```text
//! push()
//!   repo check -> add . -> status --porcelain -> commit -m -> push
//!        |           |                               |          |
//!        |           v                               v          v
//!        |      remediate+retry              remediate+retry  non-fast-forward
//!        v                                                    negotiation
//!   "This is not a Git repository!"
//! ```
//!
//! Handlers never interpret exit codes themselves; they classify the
//! diagnostic text, apply at most one remediation, retry at most once, and
//! fold everything into an [`OperationResult`]. Decision points go through
//! the injected [`Prompter`].

use std::path::{Path, PathBuf};

use futures_util::future::join_all;
use tracing::{info, warn};

use crate::auth::Credentials;
use crate::config::GitConfig;
use crate::ui::Prompter;

use super::classify::{ErrorKind, classify};
use super::exec::GitExecutor;
use super::outcome::{CommandOutcome, OperationFlags, OperationResult};
use super::remedy::{RemediationAttempt, Remediator};

/// Presentation of the history operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HistoryFormat {
    /// `git log --oneline`.
    #[default]
    Oneline,
    /// `git log --pretty=format:"%h - %an, %ar : %s"`.
    Detailed,
    /// `git log --graph --oneline`.
    Graph,
}

/// Scope of the branch listing operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BranchScope {
    /// `git branch`.
    #[default]
    Local,
    /// `git branch -r`.
    Remote,
    /// `git branch --show-current`.
    Current,
}

/// Interactive git workflows over one repository.
pub struct Workflows<'a> {
    exec: GitExecutor,
    prompter: &'a dyn Prompter,
    git: GitConfig,
    credentials: Option<Credentials>,
}

impl<'a> Workflows<'a> {
    #[must_use]
    pub const fn new(
        exec: GitExecutor,
        prompter: &'a dyn Prompter,
        git: GitConfig,
        credentials: Option<Credentials>,
    ) -> Self {
        Self {
            exec,
            prompter,
            git,
            credentials,
        }
    }

    /// The executor these workflows run against.
    #[must_use]
    pub const fn executor(&self) -> &GitExecutor {
        &self.exec
    }

    fn remediator(&self) -> Remediator<'_> {
        Remediator::new(
            &self.exec,
            self.prompter,
            &self.git.default_remote,
            self.credentials.as_ref(),
        )
    }

    /// Runs a command; on failure classifies it, applies at most one
    /// remediation, and retries exactly once when the fix took.
    async fn run_recovering(
        &self,
        args: &[&str],
    ) -> crate::error::Result<(CommandOutcome, Option<RemediationAttempt>)> {
        let first = self.exec.run(args).await?;
        if first.succeeded {
            return Ok((first, None));
        }
        let kind = classify(&first.diagnostic);
        warn!(command = %args.join(" "), kind = %kind, "git command failed");
        let attempt = self.remediator().attempt(kind).await;
        if attempt.retryable() {
            let second = self.exec.run(args).await?;
            return Ok((second, Some(attempt)));
        }
        Ok((first, Some(attempt)))
    }

    fn not_a_repository() -> OperationResult {
        OperationResult::fail("This is not a Git repository!")
    }

    /// The stage-commit-push workflow.
    ///
    /// Uses the configured default commit message when `message` is `None`.
    /// A diverged remote is negotiated interactively; see
    /// [`negotiate_non_fast_forward`](Self::negotiate_non_fast_forward).
    ///
    /// # Errors
    ///
    /// Only when a git subprocess cannot be started or times out. Everything
    /// git itself reports comes back inside the [`OperationResult`].
    pub async fn push(&self, message: Option<&str>) -> crate::error::Result<OperationResult> {
        if !self.exec.is_repository() {
            return Ok(Self::not_a_repository());
        }

        let (staged, _) = self.run_recovering(&["add", "."]).await?;
        if !staged.succeeded {
            let proceed = self.prompter.confirm(
                "Staging failed. Commit and push what is already staged?",
                false,
            );
            if !proceed {
                return Ok(OperationResult::fail("Push cancelled: staging failed")
                    .with_diagnostic(staged.diagnostic)
                    .with_flag(OperationFlags::CANCELLED_BY_CALLER));
            }
        }

        let status = self.exec.run(&["status", "--porcelain"]).await?;
        if status.succeeded && status.stdout.trim().is_empty() {
            return Ok(OperationResult::ok("No changes to commit"));
        }

        let msg = message.unwrap_or(&self.git.default_commit_message);
        let (committed, _) = self.run_recovering(&["commit", "-m", msg]).await?;
        if !committed.succeeded {
            let kind = classify(&committed.diagnostic);
            if kind == ErrorKind::NothingToCommit {
                return Ok(OperationResult::ok("No changes to commit"));
            }
            return Ok(OperationResult::fail(format!("Commit failed: {kind}"))
                .with_diagnostic(committed.diagnostic));
        }
        info!(message = msg, "committed");

        let pushed = self.exec.run(&["push"]).await?;
        if pushed.succeeded {
            return Ok(OperationResult::ok("Changes pushed successfully"));
        }
        let kind = classify(&pushed.diagnostic);
        if kind == ErrorKind::NonFastForward {
            return self.negotiate_non_fast_forward(&pushed.diagnostic).await;
        }
        let attempt = self.remediator().attempt(kind).await;
        if attempt.retryable() {
            let retry = self.exec.run(&["push"]).await?;
            if retry.succeeded {
                return Ok(OperationResult::ok(format!(
                    "Changes pushed successfully ({})",
                    attempt.detail
                )));
            }
            return Ok(OperationResult::fail(format!("Push failed: {kind}"))
                .with_diagnostic(retry.diagnostic));
        }
        Ok(OperationResult::fail(format!("Push failed: {kind}"))
            .with_diagnostic(format!("{}\n{}", attempt.detail, pushed.diagnostic.trim())))
    }

    /// Recovery for a push rejected because the remote moved ahead.
    ///
    /// The sequence stops at the first declined confirmation:
    /// 1. pull the remote commits and retry the push,
    /// 2. if the pull conflicts, stop; conflicts are never resolved here,
    /// 3. if the retried push is still rejected, offer a force push with
    ///    explicit overwrite wording, `--force-with-lease` only.
    async fn negotiate_non_fast_forward(
        &self,
        diagnostic: &str,
    ) -> crate::error::Result<OperationResult> {
        let pull_first = self.prompter.confirm(
            "The remote has commits your branch is missing. Pull them and retry the push?",
            true,
        );
        if !pull_first {
            return Ok(OperationResult::fail("Push cancelled: the remote is ahead")
                .with_diagnostic(diagnostic)
                .with_flag(OperationFlags::CANCELLED_BY_CALLER));
        }

        let pulled = self.exec.run(&["pull"]).await?;
        if !pulled.succeeded {
            let kind = classify(&pulled.diagnostic);
            if kind == ErrorKind::MergeConflict {
                return Ok(OperationResult::fail(
                    "Pull produced merge conflicts; resolve them, commit, and push again",
                )
                .with_diagnostic(pulled.diagnostic)
                .with_flag(OperationFlags::CONFLICTS_DETECTED));
            }
            return Ok(OperationResult::fail(format!("Pull failed: {kind}"))
                .with_diagnostic(pulled.diagnostic));
        }

        let retry = self.exec.run(&["push"]).await?;
        if retry.succeeded {
            return Ok(OperationResult::ok(
                "Changes pushed after merging remote commits",
            ));
        }

        let force = self.prompter.confirm(
            "The push is still rejected. Force push? This overwrites remote history and cannot be undone.",
            false,
        );
        if !force {
            return Ok(OperationResult::fail("Push cancelled: force push declined")
                .with_diagnostic(retry.diagnostic)
                .with_flag(OperationFlags::FORCE_PUSH_REQUIRED)
                .with_flag(OperationFlags::CANCELLED_BY_CALLER));
        }

        warn!("force pushing with --force-with-lease");
        let forced = self.exec.run(&["push", "--force-with-lease"]).await?;
        if forced.succeeded {
            Ok(OperationResult::ok("Force push completed")
                .with_flag(OperationFlags::FORCE_PUSH_REQUIRED))
        } else {
            Ok(OperationResult::fail("Force push failed")
                .with_diagnostic(forced.diagnostic)
                .with_flag(OperationFlags::FORCE_PUSH_REQUIRED))
        }
    }

    /// Pulls the current branch's upstream.
    ///
    /// # Errors
    ///
    /// Only subprocess start/timeout failures.
    pub async fn pull(&self) -> crate::error::Result<OperationResult> {
        if !self.exec.is_repository() {
            return Ok(Self::not_a_repository());
        }
        let (outcome, _) = self.run_recovering(&["pull"]).await?;
        if outcome.succeeded {
            let summary = outcome.stdout.trim();
            return Ok(OperationResult::ok(if summary.is_empty() {
                "Already up to date"
            } else {
                summary
            }));
        }
        let kind = classify(&outcome.diagnostic);
        if kind == ErrorKind::MergeConflict {
            return Ok(OperationResult::fail(
                "Pull produced merge conflicts; resolve them manually",
            )
            .with_diagnostic(outcome.diagnostic)
            .with_flag(OperationFlags::CONFLICTS_DETECTED));
        }
        Ok(OperationResult::fail(format!("Pull failed: {kind}"))
            .with_diagnostic(outcome.diagnostic))
    }

    /// Stages everything under the repository root (`git add .`).
    ///
    /// # Errors
    ///
    /// Only subprocess start/timeout failures.
    pub async fn stage(&self) -> crate::error::Result<OperationResult> {
        if !self.exec.is_repository() {
            return Ok(Self::not_a_repository());
        }
        let (outcome, _) = self.run_recovering(&["add", "."]).await?;
        if outcome.succeeded {
            Ok(OperationResult::ok("Changes staged"))
        } else {
            let kind = classify(&outcome.diagnostic);
            Ok(OperationResult::fail(format!("Staging failed: {kind}"))
                .with_diagnostic(outcome.diagnostic))
        }
    }

    /// Commits staged changes with the given or configured default message.
    ///
    /// A clean tree is a benign outcome, not a failure.
    ///
    /// # Errors
    ///
    /// Only subprocess start/timeout failures.
    pub async fn commit(&self, message: Option<&str>) -> crate::error::Result<OperationResult> {
        if !self.exec.is_repository() {
            return Ok(Self::not_a_repository());
        }
        let msg = message.unwrap_or(&self.git.default_commit_message);
        let (outcome, _) = self.run_recovering(&["commit", "-m", msg]).await?;
        if outcome.succeeded {
            return Ok(OperationResult::ok(format!("Committed: {msg}")));
        }
        let kind = classify(&outcome.diagnostic);
        if kind == ErrorKind::NothingToCommit {
            return Ok(OperationResult::ok("No changes to commit"));
        }
        Ok(OperationResult::fail(format!("Commit failed: {kind}"))
            .with_diagnostic(outcome.diagnostic))
    }

    /// Shows the working tree status (`git status`).
    ///
    /// # Errors
    ///
    /// Only subprocess start/timeout failures.
    pub async fn status(&self) -> crate::error::Result<OperationResult> {
        if !self.exec.is_repository() {
            return Ok(Self::not_a_repository());
        }
        let outcome = self.exec.run(&["status"]).await?;
        if outcome.succeeded {
            Ok(OperationResult::ok(outcome.stdout.trim_end()))
        } else {
            let kind = classify(&outcome.diagnostic);
            Ok(OperationResult::fail(format!("Status failed: {kind}"))
                .with_diagnostic(outcome.diagnostic))
        }
    }

    /// Shows recent commits. `limit` falls back to the configured
    /// `history_limit`.
    ///
    /// # Errors
    ///
    /// Only subprocess start/timeout failures.
    pub async fn history(
        &self,
        limit: Option<u32>,
        format: HistoryFormat,
    ) -> crate::error::Result<OperationResult> {
        if !self.exec.is_repository() {
            return Ok(Self::not_a_repository());
        }
        let count = format!("-{}", limit.unwrap_or(self.git.history_limit));
        let args: Vec<&str> = match format {
            HistoryFormat::Oneline => vec!["log", "--oneline", count.as_str()],
            HistoryFormat::Detailed => {
                vec!["log", "--pretty=format:%h - %an, %ar : %s", count.as_str()]
            }
            HistoryFormat::Graph => vec!["log", "--graph", "--oneline", count.as_str()],
        };
        let outcome = self.exec.run(&args).await?;
        if outcome.succeeded {
            Ok(OperationResult::ok(outcome.stdout.trim_end()))
        } else {
            let kind = classify(&outcome.diagnostic);
            Ok(OperationResult::fail(format!("History failed: {kind}"))
                .with_diagnostic(outcome.diagnostic))
        }
    }

    /// Lists branches in the requested scope.
    ///
    /// # Errors
    ///
    /// Only subprocess start/timeout failures.
    pub async fn branches(&self, scope: BranchScope) -> crate::error::Result<OperationResult> {
        if !self.exec.is_repository() {
            return Ok(Self::not_a_repository());
        }
        let args: &[&str] = match scope {
            BranchScope::Local => &["branch"],
            BranchScope::Remote => &["branch", "-r"],
            BranchScope::Current => &["branch", "--show-current"],
        };
        let outcome = self.exec.run(args).await?;
        if outcome.succeeded {
            Ok(OperationResult::ok(outcome.stdout.trim_end()))
        } else {
            let kind = classify(&outcome.diagnostic);
            Ok(OperationResult::fail(format!("Branch listing failed: {kind}"))
                .with_diagnostic(outcome.diagnostic))
        }
    }

    /// Creates and switches to a new branch (`git checkout -b`).
    ///
    /// # Errors
    ///
    /// Only subprocess start/timeout failures.
    pub async fn create_branch(&self, name: &str) -> crate::error::Result<OperationResult> {
        if !self.exec.is_repository() {
            return Ok(Self::not_a_repository());
        }
        let (outcome, _) = self.run_recovering(&["checkout", "-b", name]).await?;
        if outcome.succeeded {
            Ok(OperationResult::ok(format!("Switched to new branch '{name}'")))
        } else {
            let kind = classify(&outcome.diagnostic);
            Ok(OperationResult::fail(format!("Could not create branch '{name}': {kind}"))
                .with_diagnostic(outcome.diagnostic))
        }
    }

    /// Switches to an existing branch. When local changes would be
    /// overwritten, offers to stash them first.
    ///
    /// # Errors
    ///
    /// Only subprocess start/timeout failures.
    pub async fn switch_branch(&self, name: &str) -> crate::error::Result<OperationResult> {
        if !self.exec.is_repository() {
            return Ok(Self::not_a_repository());
        }
        let outcome = self.exec.run(&["checkout", name]).await?;
        if outcome.succeeded {
            return Ok(OperationResult::ok(format!("Switched to branch '{name}'")));
        }
        let kind = classify(&outcome.diagnostic);
        if kind == ErrorKind::MergeConflict {
            let stash = self.prompter.confirm(
                "Local changes would be overwritten. Stash them and switch?",
                true,
            );
            if !stash {
                return Ok(OperationResult::fail(format!(
                    "Switch to '{name}' cancelled: local changes in the way"
                ))
                .with_diagnostic(outcome.diagnostic)
                .with_flag(OperationFlags::CANCELLED_BY_CALLER));
            }
            let stashed = self.exec.run(&["stash"]).await?;
            if !stashed.succeeded {
                return Ok(OperationResult::fail("Stash failed")
                    .with_diagnostic(stashed.diagnostic));
            }
            let retry = self.exec.run(&["checkout", name]).await?;
            if retry.succeeded {
                return Ok(OperationResult::ok(format!(
                    "Switched to branch '{name}' (local changes stashed; `git stash pop` restores them)"
                )));
            }
            return Ok(OperationResult::fail(format!("Could not switch to '{name}'"))
                .with_diagnostic(retry.diagnostic));
        }
        Ok(OperationResult::fail(format!("Could not switch to '{name}': {kind}"))
            .with_diagnostic(outcome.diagnostic))
    }

    /// Clones `url` into the executor's working directory (`git clone`).
    ///
    /// # Errors
    ///
    /// Only subprocess start/timeout failures.
    pub async fn clone_repo(
        &self,
        url: &str,
        dest: Option<&str>,
    ) -> crate::error::Result<OperationResult> {
        let mut args = vec!["clone", url];
        if let Some(dest) = dest {
            args.push(dest);
        }
        let (outcome, _) = self.run_recovering(&args).await?;
        if outcome.succeeded {
            Ok(OperationResult::ok(format!("Cloned {url}")))
        } else {
            let kind = classify(&outcome.diagnostic);
            Ok(OperationResult::fail(format!("Clone failed: {kind}"))
                .with_diagnostic(outcome.diagnostic))
        }
    }

    /// Summarizes the status of several repositories concurrently.
    ///
    /// Results come back in the order of `roots`, one per repository, each
    /// folded into an [`OperationResult`] so one broken checkout never hides
    /// the others.
    ///
    /// # Errors
    ///
    /// Only subprocess start/timeout failures.
    pub async fn status_all(
        &self,
        roots: &[PathBuf],
    ) -> crate::error::Result<Vec<(PathBuf, OperationResult)>> {
        let checks = roots.iter().map(|root| async move {
            let result = self.status_of(root).await;
            (root.clone(), result)
        });
        let mut out = Vec::with_capacity(roots.len());
        for (root, result) in join_all(checks).await {
            out.push((root, result?));
        }
        Ok(out)
    }

    async fn status_of(&self, root: &Path) -> crate::error::Result<OperationResult> {
        let exec = self.exec.for_dir(root);
        if !exec.is_repository() {
            return Ok(Self::not_a_repository());
        }
        let outcome = exec.run(&["status", "--porcelain"]).await?;
        if !outcome.succeeded {
            let kind = classify(&outcome.diagnostic);
            return Ok(OperationResult::fail(format!("Status failed: {kind}"))
                .with_diagnostic(outcome.diagnostic));
        }
        let dirty = outcome.stdout.lines().filter(|l| !l.trim().is_empty()).count();
        if dirty == 0 {
            Ok(OperationResult::ok("clean"))
        } else {
            Ok(OperationResult::ok(format!("{dirty} changed file(s)")))
        }
    }
}
