// gitpilot: Interactive Git Workflow Runner
//
// SPDX-FileCopyrightText: 2026 Gitpilot Contributors
// SPDX-License-Identifier: GPL-3.0-or-later

//! Process execution abstraction.
//!
//! ```text
//! ProcessBuilder --> run() --> ProcessOutput
//!                              { exit_code, stdout, stderr }
//!
//! A non-zero exit is NOT an error here; callers inspect
//! ProcessOutput::success(). Only failure to start the process
//! at all surfaces as Err.
//! ```

pub mod builder;
mod runner;

#[cfg(test)]
mod tests;

pub use builder::{ProcessBuilder, ProcessFlags, ProcessOutput, StreamFlags};
