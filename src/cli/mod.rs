// gitpilot: Interactive Git Workflow Runner
//
// SPDX-FileCopyrightText: 2026 Gitpilot Contributors
// SPDX-License-Identifier: GPL-3.0-or-later

//! Command-line interface.
//!
//! ```text
//! gitpilot [GLOBAL OPTIONS] <COMMAND>
//!
//! Workflow:  push, pull, status, log, branch, switch, new, clone
//! Hosting:   create, delete, visibility, login, logout
//! Insight:   stats
//! ```

pub mod global;

#[cfg(test)]
mod tests;

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

use crate::git::HistoryFormat;

pub use global::GlobalOptions;

/// Interactive git workflow runner.
#[derive(Debug, Parser)]
#[command(name = "gitpilot", version, about, long_about = None)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOptions,

    #[command(subcommand)]
    pub command: Commands,
}

/// History presentation flag for `gitpilot log`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum LogFormat {
    /// One line per commit.
    #[default]
    Oneline,
    /// Hash, author, relative date and subject.
    Detailed,
    /// ASCII commit graph.
    Graph,
}

impl From<LogFormat> for HistoryFormat {
    fn from(format: LogFormat) -> Self {
        match format {
            LogFormat::Oneline => Self::Oneline,
            LogFormat::Detailed => Self::Detailed,
            LogFormat::Graph => Self::Graph,
        }
    }
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Stage, commit and push all changes.
    Push {
        /// Commit message (defaults to the configured message).
        #[arg(short, long)]
        message: Option<String>,
    },

    /// Pull the current branch's upstream.
    Pull,

    /// Stage all changes without committing.
    Add,

    /// Commit staged changes without pushing.
    Commit {
        /// Commit message (defaults to the configured message).
        #[arg(short, long)]
        message: Option<String>,
    },

    /// Show the working tree status.
    Status {
        /// Check these repository roots instead of the working directory.
        #[arg(value_name = "DIR")]
        repos: Vec<PathBuf>,
    },

    /// Show recent commits.
    Log {
        /// Number of commits to show (defaults to the configured limit).
        #[arg(short = 'n', long)]
        count: Option<u32>,

        /// Presentation format.
        #[arg(short, long, value_enum, default_value_t = LogFormat::Oneline)]
        format: LogFormat,
    },

    /// List branches.
    Branch {
        /// List remote-tracking branches instead of local ones.
        #[arg(short, long, conflicts_with = "current")]
        remote: bool,

        /// Show only the current branch name.
        #[arg(short, long)]
        current: bool,
    },

    /// Switch to an existing branch.
    Switch {
        /// Branch name.
        name: String,
    },

    /// Create and switch to a new branch.
    New {
        /// Branch name.
        name: String,
    },

    /// Clone a repository into the working directory.
    Clone {
        /// Full URL, or a bare name of one of your own repositories.
        repo: String,
    },

    /// Create a repository on the hosting service.
    Create {
        /// Repository name.
        name: String,

        /// Create it as private.
        #[arg(short, long)]
        private: bool,
    },

    /// Delete a repository on the hosting service.
    Delete {
        /// Repository name.
        name: String,
    },

    /// Change a hosted repository's visibility.
    Visibility {
        /// Repository name.
        name: String,

        /// Make it private (public without this flag).
        #[arg(short, long)]
        private: bool,
    },

    /// Store hosting-service credentials.
    Login,

    /// Remove stored credentials.
    Logout,

    /// Show repository statistics.
    Stats,
}
