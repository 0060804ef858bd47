// gitpilot: Interactive Git Workflow Runner
//
// SPDX-FileCopyrightText: 2026 Gitpilot Contributors
// SPDX-License-Identifier: GPL-3.0-or-later

//! Error handling module.
//!
//! ```text
//!                anyhow::Error (seams)
//!                        ^
//!      +--------+--------+--------+--------+
//!      |        |        |        |        |
//!    GitError ProcessError AuthError ApiError ConfigError
//! ```
//!
//! Each subsystem defines its own `thiserror` enum and converts into
//! [`anyhow::Error`] at the application seams via `?`:
//!
//!   Git     CommandFailed
//!   Process ExecutableNotFound, SpawnFailed, Timeout, OutputError
//!   Auth    NotLoggedIn, CredentialStore, NoConfigDir
//!   Api     Reqwest, HttpStatus, InvalidRepoName
//!   Config  InvalidValue

use thiserror::Error;

/// Convenience alias for `anyhow::Result`.
pub type Result<T> = anyhow::Result<T>;

// --- Git Errors ---

/// Git operation errors.
///
/// These cover the cases where an operation cannot even be attempted.
/// A git command that started and reported failure is *not* an error;
/// it is a failed [`crate::git::CommandOutcome`] handled by the classifier.
#[derive(Debug, Error)]
pub enum GitError {
    /// Git command could not be executed at all.
    #[error("git command failed: {command} - {message}")]
    CommandFailed { command: String, message: String },
}

// --- Process Errors ---

/// Process execution errors.
#[derive(Debug, Error)]
pub enum ProcessError {
    /// Executable not found in PATH.
    #[error("executable not found: '{name}' (not in PATH)")]
    ExecutableNotFound { name: String },

    /// Failed to spawn process.
    #[error("failed to spawn process '{command}': {source}")]
    SpawnFailed {
        command: String,
        #[source]
        source: std::io::Error,
    },

    /// Process timed out.
    #[error("process '{command}' timed out after {timeout_secs} seconds")]
    Timeout { command: String, timeout_secs: u64 },

    /// Failed to read process output.
    #[error("failed to read output from process '{command}': {message}")]
    OutputError { command: String, message: String },
}

// --- Auth Errors ---

/// Credential store errors.
#[derive(Debug, Error)]
pub enum AuthError {
    /// No credentials stored and interactive login declined.
    #[error("not logged in; run `gitpilot login` first")]
    NotLoggedIn,

    /// Credential file could not be read or written.
    #[error("credential store error at '{path}': {message}")]
    CredentialStore { path: String, message: String },

    /// Home/config directory could not be determined.
    #[error("cannot locate a config directory for credentials")]
    NoConfigDir,
}

// --- Hosting API Errors ---

/// Remote hosting API errors.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Error from reqwest library.
    #[error("reqwest error: {0}")]
    Reqwest(#[from] reqwest::Error),

    /// HTTP error response.
    #[error("http error {status} for {url}: {body}")]
    HttpStatus {
        status: u16,
        url: String,
        body: String,
    },

    /// Repository name failed validation.
    #[error("invalid repository name '{name}': {reason}")]
    InvalidRepoName { name: String, reason: String },
}

// --- Config Errors ---

/// Configuration-related errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Invalid configuration value.
    #[error("invalid value for '{key}' in section '[{section}]': {message}")]
    InvalidValue {
        section: String,
        key: String,
        message: String,
    },
}
