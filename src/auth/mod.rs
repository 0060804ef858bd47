// gitpilot: Interactive Git Workflow Runner
//
// SPDX-FileCopyrightText: 2026 Gitpilot Contributors
// SPDX-License-Identifier: GPL-3.0-or-later

//! Credential storage.
//!
//! ```text
//! ~/.gitpilot/credentials.json
//!     |
//!     v
//! CredentialStore::current() -> Option<Credentials>
//!     |
//!     v
//! github::GitHubClient / remedy (auth hints)
//! ```
//!
//! Plain JSON on disk, 0600 on unix. Workflows treat credentials as
//! optional: nothing here is consulted unless an operation needs the
//! hosting API or an auth failure is being explained.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::AuthError;
use crate::ui::Prompter;

/// A stored hosting-service login.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    /// Personal access token; absent when the user only recorded a name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
}

impl Credentials {
    /// True when the stored login can authenticate API calls.
    #[must_use]
    pub fn has_token(&self) -> bool {
        self.token.as_deref().is_some_and(|t| !t.is_empty())
    }
}

/// File-backed credential store.
#[derive(Debug, Clone)]
pub struct CredentialStore {
    path: PathBuf,
}

impl CredentialStore {
    /// Opens the default store under the user's home directory.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::NoConfigDir` when no home directory can be
    /// determined.
    pub fn open_default() -> std::result::Result<Self, AuthError> {
        let home = dirs::home_dir().ok_or(AuthError::NoConfigDir)?;
        Ok(Self::at(home.join(".gitpilot").join("credentials.json")))
    }

    /// Opens a store at an explicit path. For tests and `--config` setups.
    #[must_use]
    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The backing file path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads stored credentials. A missing file is `Ok(None)`, not an error.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::CredentialStore` when the file exists but cannot
    /// be read or parsed.
    pub fn current(&self) -> std::result::Result<Option<Credentials>, AuthError> {
        if !self.path.exists() {
            return Ok(None);
        }
        let raw = std::fs::read_to_string(&self.path).map_err(|e| self.store_error(&e))?;
        let creds: Credentials =
            serde_json::from_str(&raw).map_err(|e| self.store_error(&e))?;
        Ok(Some(creds))
    }

    /// Persists credentials, creating parent directories as needed.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::CredentialStore` on any filesystem failure.
    pub fn save(&self, creds: &Credentials) -> std::result::Result<(), AuthError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| self.store_error(&e))?;
        }
        let raw = serde_json::to_string_pretty(creds).map_err(|e| self.store_error(&e))?;
        std::fs::write(&self.path, raw).map_err(|e| self.store_error(&e))?;
        self.restrict_permissions()?;
        debug!(path = %self.path.display(), "credentials saved");
        Ok(())
    }

    /// Removes stored credentials. Removing a missing file is a no-op.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::CredentialStore` when the file exists but cannot
    /// be removed.
    pub fn clear(&self) -> std::result::Result<(), AuthError> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(self.store_error(&e)),
        }
    }

    /// Prompts for a username and token and stores them.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::NotLoggedIn` when the caller enters an empty
    /// username, or a store error when the file cannot be written.
    pub fn interactive_login(
        &self,
        prompter: &dyn Prompter,
    ) -> std::result::Result<Credentials, AuthError> {
        let username = prompter.ask("GitHub username");
        if username.trim().is_empty() {
            return Err(AuthError::NotLoggedIn);
        }
        let token = prompter.ask("Personal access token (blank to skip)");
        let creds = Credentials {
            username: username.trim().to_string(),
            token: if token.trim().is_empty() {
                None
            } else {
                Some(token.trim().to_string())
            },
        };
        self.save(&creds)?;
        Ok(creds)
    }

    #[cfg(unix)]
    fn restrict_permissions(&self) -> std::result::Result<(), AuthError> {
        use std::os::unix::fs::PermissionsExt;
        std::fs::set_permissions(&self.path, std::fs::Permissions::from_mode(0o600))
            .map_err(|e| self.store_error(&e))
    }

    #[cfg(not(unix))]
    fn restrict_permissions(&self) -> std::result::Result<(), AuthError> {
        Ok(())
    }

    fn store_error(&self, source: &dyn std::fmt::Display) -> AuthError {
        AuthError::CredentialStore {
            path: self.path.display().to_string(),
            message: source.to_string(),
        }
    }
}
