// gitpilot: Interactive Git Workflow Runner
//
// SPDX-FileCopyrightText: 2026 Gitpilot Contributors
// SPDX-License-Identifier: GPL-3.0-or-later

//! Global options shared by every subcommand.

use std::path::PathBuf;

use clap::Args;

use crate::config::Config;
use crate::logging::LogLevel;

/// Options accepted before any subcommand.
#[derive(Debug, Args)]
pub struct GlobalOptions {
    /// Run as if started in this directory.
    #[arg(short = 'C', long = "dir", global = true, value_name = "DIR")]
    pub dir: Option<PathBuf>,

    /// Configuration file (TOML).
    #[arg(long, global = true, env = "GITPILOT_CONFIG", value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Console log level, 0 (silent) to 5 (trace).
    #[arg(long, global = true, value_name = "LEVEL", value_parser = clap::value_parser!(u8).range(0..=5))]
    pub log_level: Option<u8>,

    /// Also write logs to this file.
    #[arg(long, global = true, value_name = "FILE")]
    pub log_file: Option<PathBuf>,

    /// Answer yes to every confirmation prompt.
    #[arg(short = 'y', long = "yes", global = true)]
    pub assume_yes: bool,
}

impl GlobalOptions {
    /// Folds command-line overrides into a loaded configuration.
    /// CLI flags always win over file and environment values.
    pub fn apply_to(&self, config: &mut Config) {
        if let Some(level) = self.log_level
            && let Some(level) = LogLevel::from_u8(level)
        {
            config.global.output_log_level = level;
        }
        if let Some(log_file) = &self.log_file {
            config.global.log_file = Some(log_file.clone());
        }
        if self.assume_yes {
            config.global.assume_yes = true;
        }
    }

    /// The effective working directory for this invocation.
    ///
    /// # Errors
    ///
    /// Fails only when no `-C` was given and the process working directory
    /// cannot be read.
    pub fn workdir(&self) -> std::io::Result<PathBuf> {
        match &self.dir {
            Some(dir) => Ok(dir.clone()),
            None => std::env::current_dir(),
        }
    }
}
