// gitpilot: Interactive Git Workflow Runner
//
// SPDX-FileCopyrightText: 2026 Gitpilot Contributors
// SPDX-License-Identifier: GPL-3.0-or-later

//! Configuration management for gitpilot.
//!
//! # Configuration Hierarchy
//!
//! ```text
//! Priority (low → high)
//! 1. defaults
//! 2. gitpilot.toml (cwd)
//! 3. --config FILE
//! 4. GITPILOT_* env vars
//! 5. CLI overrides
//! ```
//!
//! # Environment Variable Mapping
//!
//! Section and key are separated by a double underscore:
//!
//! ```text
//! GITPILOT_GIT__DEFAULT_REMOTE=upstream → git.default_remote = "upstream"
//! GITPILOT_CACHE__FRESHNESS_MS=10000    → cache.freshness_ms = 10000
//! ```

pub mod loader;

#[cfg(test)]
mod tests;

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{ConfigError, Result};
use crate::logging::LogLevel;

use loader::ConfigLoader;

/// Complete application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Global options.
    pub global: GlobalConfig,
    /// Git workflow options.
    pub git: GitConfig,
    /// Result cache options.
    pub cache: CacheConfig,
    /// Hosting API options.
    pub github: GithubConfig,
}

/// Global configuration options.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GlobalConfig {
    /// Log level for stdout output (0-5).
    pub output_log_level: LogLevel,
    /// Log level for file output (0-5).
    pub file_log_level: LogLevel,
    /// Path to log file (empty = console only).
    pub log_file: Option<PathBuf>,
    /// Answer yes to every confirmation prompt.
    pub assume_yes: bool,
}

impl Default for GlobalConfig {
    fn default() -> Self {
        Self {
            output_log_level: LogLevel::INFO,
            file_log_level: LogLevel::DEBUG,
            log_file: None,
            assume_yes: false,
        }
    }
}

/// Git workflow configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GitConfig {
    /// Commit message used when none is supplied.
    pub default_commit_message: String,
    /// Remote name used for upstream configuration.
    pub default_remote: String,
    /// Number of entries shown by the history operation.
    pub history_limit: u32,
    /// Optional per-invocation timeout for git subprocesses, in seconds.
    /// Unset means no timeout; a hung git process hangs the workflow.
    pub timeout_secs: Option<u64>,
}

impl Default for GitConfig {
    fn default() -> Self {
        Self {
            default_commit_message: "Auto commit".to_string(),
            default_remote: "origin".to_string(),
            history_limit: 10,
            timeout_secs: None,
        }
    }
}

/// Result cache configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CacheConfig {
    /// Freshness window for cached query results, in milliseconds.
    pub freshness_ms: u64,
    /// Maximum number of timing samples retained per operation.
    pub perf_cap: usize,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            freshness_ms: 5_000,
            perf_cap: 100,
        }
    }
}

/// Hosting API configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GithubConfig {
    /// Base URL of the hosting API (overridable for tests).
    pub api_base: String,
    /// Clone URL prefix for repositories owned by the logged-in user.
    pub clone_url_prefix: String,
}

impl Default for GithubConfig {
    fn default() -> Self {
        Self {
            api_base: "https://api.github.com".to_string(),
            clone_url_prefix: "https://github.com".to_string(),
        }
    }
}

impl Config {
    /// Create a new configuration builder.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use gitpilot::config::Config;
    ///
    /// let config = Config::builder()
    ///     .add_toml_file_optional("gitpilot.toml")
    ///     .with_env_prefix("GITPILOT")
    ///     .build()?;
    /// # Ok::<(), anyhow::Error>(())
    /// ```
    #[must_use]
    pub fn builder() -> ConfigLoader {
        ConfigLoader::new()
    }

    /// Load configuration from a single TOML file (simple API).
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, contains invalid TOML, or
    /// does not match the `Config` structure.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::builder().add_toml_file(path).build()
    }

    /// Load configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns an error if the content is not valid TOML or does not match
    /// the `Config` structure.
    pub fn from_str(content: &str) -> Result<Self> {
        Self::builder().add_toml_str(content).build()
    }

    /// Validates cross-field constraints after deserialization.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError::InvalidValue` for out-of-range values.
    pub(crate) fn resolve_and_validate(&mut self) -> Result<()> {
        if self.git.history_limit == 0 {
            return Err(ConfigError::InvalidValue {
                section: "git".to_string(),
                key: "history_limit".to_string(),
                message: "must be at least 1".to_string(),
            }
            .into());
        }
        if self.cache.perf_cap == 0 {
            return Err(ConfigError::InvalidValue {
                section: "cache".to_string(),
                key: "perf_cap".to_string(),
                message: "must be at least 1".to_string(),
            }
            .into());
        }
        if self.git.default_remote.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                section: "git".to_string(),
                key: "default_remote".to_string(),
                message: "must not be empty".to_string(),
            }
            .into());
        }
        Ok(())
    }

    /// Freshness window as a `Duration`.
    #[must_use]
    pub const fn freshness_window(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.cache.freshness_ms)
    }

    /// Per-invocation subprocess timeout, if configured.
    #[must_use]
    pub fn process_timeout(&self) -> Option<std::time::Duration> {
        self.git.timeout_secs.map(std::time::Duration::from_secs)
    }
}
