// gitpilot: Interactive Git Workflow Runner
//
// SPDX-FileCopyrightText: 2026 Gitpilot Contributors
// SPDX-License-Identifier: GPL-3.0-or-later

//! Caller interaction.
//!
//! Workflows never read the terminal directly; every decision point goes
//! through a [`Prompter`] passed in by the caller. This keeps handlers
//! testable and lets `--yes` swap in [`AssumeYes`] wholesale.

use std::io::{BufRead, Write};
use std::sync::Mutex;

use tracing::debug;

/// Interactive decision points used by the workflow handlers.
pub trait Prompter: Send + Sync {
    /// Asks a yes/no question. `default` is returned on empty input.
    fn confirm(&self, message: &str, default: bool) -> bool;

    /// Asks for a free-form line of input.
    fn ask(&self, message: &str) -> String;
}

/// Reads answers from stdin and writes prompts to stdout.
#[derive(Debug, Default, Clone, Copy)]
pub struct TerminalPrompter;

impl TerminalPrompter {
    fn read_line() -> String {
        let mut line = String::new();
        let stdin = std::io::stdin();
        if stdin.lock().read_line(&mut line).is_err() {
            return String::new();
        }
        line.trim().to_string()
    }

    fn write_prompt(text: &str) {
        let mut stdout = std::io::stdout();
        // Best effort; a closed stdout means nobody is reading anyway
        let _ = write!(stdout, "{text}");
        let _ = stdout.flush();
    }
}

impl Prompter for TerminalPrompter {
    fn confirm(&self, message: &str, default: bool) -> bool {
        let hint = if default { "[Y/n]" } else { "[y/N]" };
        Self::write_prompt(&format!("{message} {hint} "));
        let answer = Self::read_line().to_lowercase();
        match answer.as_str() {
            "" => default,
            "y" | "yes" => true,
            _ => false,
        }
    }

    fn ask(&self, message: &str) -> String {
        Self::write_prompt(&format!("{message}: "));
        Self::read_line()
    }
}

/// Answers yes to every confirmation (`--yes`). Free-form questions return
/// an empty string, so remediations needing real input stay unapplied.
#[derive(Debug, Default, Clone, Copy)]
pub struct AssumeYes;

impl Prompter for AssumeYes {
    fn confirm(&self, message: &str, _default: bool) -> bool {
        debug!(prompt = message, "auto-confirmed");
        true
    }

    fn ask(&self, _message: &str) -> String {
        String::new()
    }
}

/// Replays a fixed script of answers. For tests.
#[derive(Debug, Default)]
pub struct ScriptedPrompter {
    confirms: Mutex<Vec<bool>>,
    answers: Mutex<Vec<String>>,
}

impl ScriptedPrompter {
    /// Builds a prompter that pops `confirms` and `answers` front-first.
    /// Exhausted scripts fall back to `false` / empty string.
    #[must_use]
    pub fn new(confirms: Vec<bool>, answers: Vec<String>) -> Self {
        Self {
            confirms: Mutex::new(confirms),
            answers: Mutex::new(answers),
        }
    }
}

impl Prompter for ScriptedPrompter {
    fn confirm(&self, _message: &str, _default: bool) -> bool {
        let mut confirms = self
            .confirms
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        if confirms.is_empty() {
            false
        } else {
            confirms.remove(0)
        }
    }

    fn ask(&self, _message: &str) -> String {
        let mut answers = self
            .answers
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        if answers.is_empty() {
            String::new()
        } else {
            answers.remove(0)
        }
    }
}
