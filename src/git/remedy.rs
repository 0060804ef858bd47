// gitpilot: Interactive Git Workflow Runner
//
// SPDX-FileCopyrightText: 2026 Gitpilot Contributors
// SPDX-License-Identifier: GPL-3.0-or-later

//! Automatic remediation.
//!
//! ```text
//! ErrorKind --> Remediator::attempt --> RemediationAttempt
//!                                        { applied, succeeded, detail }
//! ```
//!
//! One attempt per failure, then the caller retries the original command
//! exactly once. Every fix is idempotent: remediating a state that is
//! already clean reports success instead of failing. Kinds with no safe
//! automatic fix (merge conflicts, non-fast-forward) report
//! `applied: false`; the workflow layer owns those.

use tracing::{debug, info};

use crate::auth::Credentials;
use crate::ui::Prompter;

use super::classify::ErrorKind;
use super::exec::GitExecutor;
use super::outcome::CommandOutcome;

/// Record of one remediation attempt, for logging and for the caller's
/// retry decision.
#[derive(Debug, Clone)]
pub struct RemediationAttempt {
    pub kind: ErrorKind,
    /// Whether any fix was actually tried for this kind.
    pub applied: bool,
    /// Whether the fix left the repository in a retryable state.
    pub succeeded: bool,
    /// Human-readable account of what was (or was not) done.
    pub detail: String,
}

impl RemediationAttempt {
    fn applied(kind: ErrorKind, succeeded: bool, detail: impl Into<String>) -> Self {
        Self {
            kind,
            applied: true,
            succeeded,
            detail: detail.into(),
        }
    }

    fn skipped(kind: ErrorKind, detail: impl Into<String>) -> Self {
        Self {
            kind,
            applied: false,
            succeeded: false,
            detail: detail.into(),
        }
    }

    fn from_outcome(kind: ErrorKind, outcome: &CommandOutcome, action: &str) -> Self {
        if outcome.succeeded {
            Self::applied(kind, true, action)
        } else {
            Self::applied(
                kind,
                false,
                format!("{action} failed: {}", outcome.diagnostic.trim()),
            )
        }
    }

    /// Whether the caller should retry the failed command.
    #[must_use]
    pub const fn retryable(&self) -> bool {
        self.applied && self.succeeded
    }
}

/// Applies the fix registered for a classified failure.
pub struct Remediator<'a> {
    exec: &'a GitExecutor,
    prompter: &'a dyn Prompter,
    default_remote: &'a str,
    credentials: Option<&'a Credentials>,
}

impl<'a> Remediator<'a> {
    #[must_use]
    pub const fn new(
        exec: &'a GitExecutor,
        prompter: &'a dyn Prompter,
        default_remote: &'a str,
        credentials: Option<&'a Credentials>,
    ) -> Self {
        Self {
            exec,
            prompter,
            default_remote,
            credentials,
        }
    }

    /// Attempts the registered fix for `kind`.
    ///
    /// Infallible by design: a fix whose own git command cannot even start
    /// is reported as a failed attempt, never as an error, so the workflow
    /// always gets a record to log and act on.
    pub async fn attempt(&self, kind: ErrorKind) -> RemediationAttempt {
        info!(kind = %kind, "attempting remediation");
        let attempt = match kind {
            ErrorKind::IndexLocked => self.remove_index_lock(),
            ErrorKind::NotARepository => self.init_repository().await,
            ErrorKind::PermissionDenied => self.relax_index_permissions(),
            ErrorKind::LargeFile => self.install_lfs().await,
            ErrorKind::CorruptedIndex => self.rebuild_index().await,
            ErrorKind::BranchConfigMissing => self.set_upstream().await,
            ErrorKind::AuthenticationFailed => self.diagnose_credentials(),
            ErrorKind::NetworkUnreachable => self.probe_remote().await,
            ErrorKind::IdentityNotConfigured => self.configure_identity().await,
            ErrorKind::RemoteNotConfigured => self.diagnose_remotes().await,
            ErrorKind::DiskSpaceExhausted => self.collect_garbage().await,
            ErrorKind::MergeConflict => RemediationAttempt::skipped(
                kind,
                "conflicts require manual resolution; no automatic fix is safe",
            ),
            ErrorKind::NonFastForward => RemediationAttempt::skipped(
                kind,
                "divergent histories are negotiated interactively by the push workflow",
            ),
            ErrorKind::NothingToCommit => {
                RemediationAttempt::skipped(kind, "nothing to fix; the working tree is clean")
            }
            ErrorKind::Unclassified => {
                RemediationAttempt::skipped(kind, "no fix is registered for this failure")
            }
        };
        debug!(
            kind = %kind,
            applied = attempt.applied,
            succeeded = attempt.succeeded,
            detail = %attempt.detail,
            "remediation finished"
        );
        attempt
    }

    /// Removes a stale `index.lock`. An already-absent lock counts as
    /// success: the goal state is "no lock", not "we deleted a file".
    fn remove_index_lock(&self) -> RemediationAttempt {
        let lock = self.exec.workdir().join(".git").join("index.lock");
        match std::fs::remove_file(&lock) {
            Ok(()) => RemediationAttempt::applied(
                ErrorKind::IndexLocked,
                true,
                "removed stale .git/index.lock",
            ),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => RemediationAttempt::applied(
                ErrorKind::IndexLocked,
                true,
                "lock file already gone",
            ),
            Err(e) => RemediationAttempt::applied(
                ErrorKind::IndexLocked,
                false,
                format!("could not remove {}: {e}", lock.display()),
            ),
        }
    }

    async fn init_repository(&self) -> RemediationAttempt {
        if self.exec.is_repository() {
            return RemediationAttempt::applied(
                ErrorKind::NotARepository,
                true,
                "repository already initialized",
            );
        }
        match self.exec.run(&["init"]).await {
            Ok(outcome) => RemediationAttempt::from_outcome(
                ErrorKind::NotARepository,
                &outcome,
                "initialized a new repository with `git init`",
            ),
            Err(e) => {
                RemediationAttempt::applied(ErrorKind::NotARepository, false, e.to_string())
            }
        }
    }

    /// Makes a read-only `.git/index` writable again.
    fn relax_index_permissions(&self) -> RemediationAttempt {
        let index = self.exec.workdir().join(".git").join("index");
        let metadata = match std::fs::metadata(&index) {
            Ok(m) => m,
            Err(_) => {
                return RemediationAttempt::skipped(
                    ErrorKind::PermissionDenied,
                    "no .git/index to fix; the denied path is outside this repository",
                );
            }
        };
        let mut perms = metadata.permissions();
        if !perms.readonly() {
            return RemediationAttempt::applied(
                ErrorKind::PermissionDenied,
                true,
                ".git/index is already writable",
            );
        }
        #[allow(clippy::permissions_set_readonly_false)]
        perms.set_readonly(false);
        match std::fs::set_permissions(&index, perms) {
            Ok(()) => RemediationAttempt::applied(
                ErrorKind::PermissionDenied,
                true,
                "made .git/index writable",
            ),
            Err(e) => RemediationAttempt::applied(
                ErrorKind::PermissionDenied,
                false,
                format!("could not change permissions on .git/index: {e}"),
            ),
        }
    }

    async fn install_lfs(&self) -> RemediationAttempt {
        let probe = self.exec.run(&["lfs", "version"]).await;
        match probe {
            Ok(outcome) if outcome.succeeded => match self.exec.run(&["lfs", "install"]).await {
                Ok(outcome) => RemediationAttempt::from_outcome(
                    ErrorKind::LargeFile,
                    &outcome,
                    "enabled git-lfs; re-add the large file via `git lfs track`",
                ),
                Err(e) => RemediationAttempt::applied(ErrorKind::LargeFile, false, e.to_string()),
            },
            _ => RemediationAttempt::skipped(
                ErrorKind::LargeFile,
                "git-lfs is not installed; install it or remove the oversized file",
            ),
        }
    }

    /// Deletes the corrupt index and rebuilds it from HEAD. Staged-but-
    /// uncommitted paths become unstaged; working tree files are untouched.
    async fn rebuild_index(&self) -> RemediationAttempt {
        let index = self.exec.workdir().join(".git").join("index");
        if let Err(e) = std::fs::remove_file(&index)
            && e.kind() != std::io::ErrorKind::NotFound
        {
            return RemediationAttempt::applied(
                ErrorKind::CorruptedIndex,
                false,
                format!("could not remove corrupt index: {e}"),
            );
        }
        match self.exec.run(&["reset"]).await {
            Ok(outcome) => RemediationAttempt::from_outcome(
                ErrorKind::CorruptedIndex,
                &outcome,
                "removed the corrupt index and rebuilt it with `git reset`",
            ),
            Err(e) => RemediationAttempt::applied(ErrorKind::CorruptedIndex, false, e.to_string()),
        }
    }

    async fn set_upstream(&self) -> RemediationAttempt {
        let branch = match self.exec.query(&["branch", "--show-current"]).await {
            Ok(b) if !b.is_empty() => b,
            _ => {
                return RemediationAttempt::skipped(
                    ErrorKind::BranchConfigMissing,
                    "cannot determine the current branch (detached HEAD?)",
                );
            }
        };
        match self
            .exec
            .run(&["push", "-u", self.default_remote, &branch])
            .await
        {
            Ok(outcome) => RemediationAttempt::from_outcome(
                ErrorKind::BranchConfigMissing,
                &outcome,
                &format!("set upstream with `git push -u {} {branch}`", self.default_remote),
            ),
            Err(e) => {
                RemediationAttempt::applied(ErrorKind::BranchConfigMissing, false, e.to_string())
            }
        }
    }

    /// Auth failures are never fixed automatically; this reports what the
    /// credential store knows so the caller sees an actionable message.
    fn diagnose_credentials(&self) -> RemediationAttempt {
        let detail = match self.credentials {
            Some(creds) if creds.has_token() => format!(
                "stored credentials for '{}' were rejected by the remote; \
                 refresh the token with `gitpilot login`",
                creds.username
            ),
            Some(creds) => format!(
                "credentials for '{}' have no access token; run `gitpilot login`",
                creds.username
            ),
            None => "no stored credentials; run `gitpilot login`".to_string(),
        };
        RemediationAttempt::applied(ErrorKind::AuthenticationFailed, false, detail)
    }

    /// Connectivity probe. Success means the network recovered and the
    /// failed command is worth retrying.
    async fn probe_remote(&self) -> RemediationAttempt {
        match self
            .exec
            .run(&["ls-remote", "--exit-code", self.default_remote, "HEAD"])
            .await
        {
            Ok(outcome) if outcome.succeeded => RemediationAttempt::applied(
                ErrorKind::NetworkUnreachable,
                true,
                "remote is reachable again",
            ),
            Ok(outcome) => RemediationAttempt::applied(
                ErrorKind::NetworkUnreachable,
                false,
                format!("remote still unreachable: {}", outcome.diagnostic.trim()),
            ),
            Err(e) => {
                RemediationAttempt::applied(ErrorKind::NetworkUnreachable, false, e.to_string())
            }
        }
    }

    async fn configure_identity(&self) -> RemediationAttempt {
        let name = self.prompter.ask("Your name for commit authorship");
        let email = self.prompter.ask("Your email for commit authorship");
        if name.trim().is_empty() || email.trim().is_empty() {
            return RemediationAttempt::skipped(
                ErrorKind::IdentityNotConfigured,
                "identity not provided; set it with `git config user.name/user.email`",
            );
        }
        let name_set = self
            .exec
            .run(&["config", "user.name", name.trim()])
            .await;
        let email_set = self
            .exec
            .run(&["config", "user.email", email.trim()])
            .await;
        match (name_set, email_set) {
            (Ok(a), Ok(b)) if a.succeeded && b.succeeded => RemediationAttempt::applied(
                ErrorKind::IdentityNotConfigured,
                true,
                format!("configured identity as {} <{}>", name.trim(), email.trim()),
            ),
            (Ok(a), Ok(b)) => RemediationAttempt::applied(
                ErrorKind::IdentityNotConfigured,
                false,
                format!(
                    "git config failed: {} {}",
                    a.diagnostic.trim(),
                    b.diagnostic.trim()
                ),
            ),
            (Err(e), _) | (_, Err(e)) => {
                RemediationAttempt::applied(ErrorKind::IdentityNotConfigured, false, e.to_string())
            }
        }
    }

    /// No remote can be invented on the user's behalf; report what exists.
    async fn diagnose_remotes(&self) -> RemediationAttempt {
        let detail = match self.exec.query(&["remote"]).await {
            Ok(remotes) if remotes.is_empty() => format!(
                "no remotes configured; add one with `git remote add {} <url>`",
                self.default_remote
            ),
            Ok(remotes) => format!(
                "configured remotes ({}) do not include a usable push destination",
                remotes.split_whitespace().collect::<Vec<_>>().join(", ")
            ),
            Err(e) => format!("could not list remotes: {e}"),
        };
        RemediationAttempt::applied(ErrorKind::RemoteNotConfigured, false, detail)
    }

    async fn collect_garbage(&self) -> RemediationAttempt {
        match self.exec.run(&["gc", "--prune=now"]).await {
            Ok(outcome) => RemediationAttempt::from_outcome(
                ErrorKind::DiskSpaceExhausted,
                &outcome,
                "reclaimed space with `git gc --prune=now`",
            ),
            Err(e) => {
                RemediationAttempt::applied(ErrorKind::DiskSpaceExhausted, false, e.to_string())
            }
        }
    }
}
