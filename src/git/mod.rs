// gitpilot: Interactive Git Workflow Runner
//
// SPDX-FileCopyrightText: 2026 Gitpilot Contributors
// SPDX-License-Identifier: GPL-3.0-or-later

//! Git workflow layer.
//!
//! ```text
//! handlers (push/pull/branch/..)
//!     |            \
//!     v             v
//! GitExecutor    classify --> ErrorKind --> Remediator
//! (subprocess)   (ordered signature       (one idempotent
//!                 table, first match)      fix per kind)
//! ```
//!
//! Every handler converts failures into an [`OperationResult`]; nothing
//! escapes a handler as an error except "git could not be started at all".

pub mod analytics;
pub mod classify;
pub mod exec;
pub mod handlers;
mod outcome;
pub mod remedy;


pub use analytics::{RepoAnalytics, repo_analytics};
pub use classify::{ErrorKind, classify};
pub use exec::GitExecutor;
pub use handlers::{BranchScope, HistoryFormat, Workflows};
pub use outcome::{CommandOutcome, OperationFlags, OperationResult};
pub use remedy::{RemediationAttempt, Remediator};
