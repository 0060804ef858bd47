// gitpilot: Interactive Git Workflow Runner
//
// SPDX-FileCopyrightText: 2026 Gitpilot Contributors
// SPDX-License-Identifier: GPL-3.0-or-later

//! Result types returned by the executor and the workflow handlers.

use bitflags::bitflags;

use crate::core::process::ProcessOutput;

/// Result of one external git invocation.
///
/// Created fresh per invocation, immutable, never persisted. When
/// `succeeded` is false, `stdout` must not be trusted to reflect a
/// persisted state.
#[derive(Debug, Clone, Default)]
pub struct CommandOutcome {
    /// Whether the command exited with code 0.
    pub succeeded: bool,
    /// Captured standard output (may be empty).
    pub stdout: String,
    /// Captured error stream; empty on success.
    pub diagnostic: String,
}

impl From<ProcessOutput> for CommandOutcome {
    fn from(output: ProcessOutput) -> Self {
        Self {
            succeeded: output.success(),
            stdout: output.stdout().to_string(),
            diagnostic: output.stderr().to_string(),
        }
    }
}

bitflags! {
    /// Flags describing how a workflow ended.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct OperationFlags: u8 {
        /// The operation stopped on merge conflicts needing manual resolution.
        const CONFLICTS_DETECTED = 0x01;
        /// The push can only proceed by force; the caller declined or must decide.
        const FORCE_PUSH_REQUIRED = 0x02;
        /// The caller declined a decision point.
        const CANCELLED_BY_CALLER = 0x04;
    }
}

/// Result of a completed high-level workflow, returned to the UI layer.
///
/// Produced once per handler invocation; never mutated after return.
#[derive(Debug, Clone)]
pub struct OperationResult {
    pub succeeded: bool,
    pub message: String,
    pub diagnostic: Option<String>,
    pub flags: OperationFlags,
}

impl OperationResult {
    /// A successful result with the given summary.
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            succeeded: true,
            message: message.into(),
            diagnostic: None,
            flags: OperationFlags::empty(),
        }
    }

    /// A failed result with the given summary.
    pub fn fail(message: impl Into<String>) -> Self {
        Self {
            succeeded: false,
            message: message.into(),
            diagnostic: None,
            flags: OperationFlags::empty(),
        }
    }

    /// Attaches the raw diagnostic text for manual troubleshooting.
    #[must_use]
    pub fn with_diagnostic(mut self, diagnostic: impl Into<String>) -> Self {
        let text = diagnostic.into();
        if !text.trim().is_empty() {
            self.diagnostic = Some(text);
        }
        self
    }

    /// Adds a flag.
    #[must_use]
    pub const fn with_flag(mut self, flag: OperationFlags) -> Self {
        self.flags = self.flags.union(flag);
        self
    }

    /// Whether the caller declined a decision point.
    #[must_use]
    pub const fn cancelled(&self) -> bool {
        self.flags.contains(OperationFlags::CANCELLED_BY_CALLER)
    }
}
