// gitpilot: Interactive Git Workflow Runner
//
// SPDX-FileCopyrightText: 2026 Gitpilot Contributors
// SPDX-License-Identifier: GPL-3.0-or-later

//! Diagnostic text classification.
//!
//! ```text
//! classify(text)
//!     |
//!     v
//! case-fold --> SIGNATURES (ordered, first match wins)
//!     |
//!     v
//! ErrorKind  (Unclassified when nothing matches)
//! ```
//!
//! The table is ordered: specific signatures must sit before broader ones
//! they are substrings of, or the broad entry would always win and the
//! specific remediation would never run. New signatures are inserted above
//! any catch-all that could swallow them.

/// Closed set of recognized failure scenarios.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    NotARepository,
    IndexLocked,
    PermissionDenied,
    LargeFile,
    CorruptedIndex,
    MergeConflict,
    BranchConfigMissing,
    AuthenticationFailed,
    NetworkUnreachable,
    IdentityNotConfigured,
    RemoteNotConfigured,
    DiskSpaceExhausted,
    NonFastForward,
    NothingToCommit,
    Unclassified,
}

impl ErrorKind {
    /// Short human-readable description for operation summaries.
    #[must_use]
    pub const fn describe(self) -> &'static str {
        match self {
            Self::NotARepository => "not a git repository",
            Self::IndexLocked => "the index is locked by another process",
            Self::PermissionDenied => "permission denied on repository files",
            Self::LargeFile => "a file exceeds the remote's size limit",
            Self::CorruptedIndex => "the index file is corrupted",
            Self::MergeConflict => "merge conflicts need manual resolution",
            Self::BranchConfigMissing => "the branch has no configured upstream",
            Self::AuthenticationFailed => "authentication with the remote failed",
            Self::NetworkUnreachable => "the remote host is unreachable",
            Self::IdentityNotConfigured => "git user identity is not configured",
            Self::RemoteNotConfigured => "no usable remote is configured",
            Self::DiskSpaceExhausted => "no disk space left",
            Self::NonFastForward => "the remote has commits the local branch lacks",
            Self::NothingToCommit => "nothing to commit",
            Self::Unclassified => "unrecognized git failure",
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.describe())
    }
}

/// One table entry: any of the substrings maps to the kind.
type Signature = (&'static [&'static str], ErrorKind);

/// Ordered signature table. First match wins.
///
/// Ordering constraints encoded here:
/// - `index.lock` before `PermissionDenied` ("unable to create ... index.lock"
///   often also mentions permissions).
/// - "does not appear to be a git repository" (a remote-URL failure) before
///   "not a git repository", which is a substring of it.
/// - "permission denied (publickey)" (an SSH auth failure) before the generic
///   "permission denied".
pub(crate) const SIGNATURES: &[Signature] = &[
    (&["index.lock"], ErrorKind::IndexLocked),
    (
        &[
            "does not appear to be a git repository",
            "no configured push destination",
            "no such remote",
        ],
        ErrorKind::RemoteNotConfigured,
    ),
    (&["not a git repository"], ErrorKind::NotARepository),
    (
        &[
            "permission denied (publickey)",
            "authentication failed",
            "could not read username",
            "invalid username or password",
            "support for password authentication was removed",
        ],
        ErrorKind::AuthenticationFailed,
    ),
    (
        &["permission denied", "insufficient permission"],
        ErrorKind::PermissionDenied,
    ),
    (
        &["file size limit", "want to store in git lfs"],
        ErrorKind::LargeFile,
    ),
    (
        &[
            "index file corrupt",
            "bad index file",
            "index file smaller than expected",
        ],
        ErrorKind::CorruptedIndex,
    ),
    (
        &[
            "merge conflict",
            "fix conflicts",
            "needs merge",
            "automatic merge failed",
            "would be overwritten by checkout",
            "would be overwritten by merge",
        ],
        ErrorKind::MergeConflict,
    ),
    (
        &["no upstream branch", "--set-upstream"],
        ErrorKind::BranchConfigMissing,
    ),
    (
        &[
            "could not resolve host",
            "unable to access",
            "connection timed out",
            "connection refused",
            "network is unreachable",
        ],
        ErrorKind::NetworkUnreachable,
    ),
    (
        &[
            "please tell me who you are",
            "unable to auto-detect email address",
            "empty ident name",
        ],
        ErrorKind::IdentityNotConfigured,
    ),
    (
        &["no space left on device", "disk quota exceeded"],
        ErrorKind::DiskSpaceExhausted,
    ),
    (
        &[
            "non-fast-forward",
            "fetch first",
            "updates were rejected",
            "behind its remote counterpart",
        ],
        ErrorKind::NonFastForward,
    ),
    (
        &[
            "nothing to commit",
            "no changes added to commit",
            "working tree clean",
        ],
        ErrorKind::NothingToCommit,
    ),
];

/// Maps a failure's diagnostic text to a symbolic kind.
///
/// Case-folds the text, then tests the ordered table; the first entry with
/// any matching substring wins. No match yields [`ErrorKind::Unclassified`].
#[must_use]
pub fn classify(diagnostic: &str) -> ErrorKind {
    let folded = diagnostic.to_lowercase();
    for (needles, kind) in SIGNATURES {
        if needles.iter().any(|needle| folded.contains(needle)) {
            return *kind;
        }
    }
    ErrorKind::Unclassified
}
