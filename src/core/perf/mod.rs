// gitpilot: Interactive Git Workflow Runner
//
// SPDX-FileCopyrightText: 2026 Gitpilot Contributors
// SPDX-License-Identifier: GPL-3.0-or-later

//! Bounded per-operation timing samples.
//!
//! ```text
//! record("push", 412ms) --> series["push"]: [.., 412ms]
//!                            (oldest dropped past cap)
//! summary("push") --> { count, mean, max }
//! ```
//!
//! Not correctness-critical; used for the `stats` output only.

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;
use std::time::Duration;

/// Aggregate view over one operation's samples.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PerfSummary {
    pub count: usize,
    pub mean: Duration,
    pub max: Duration,
}

/// Records wall-clock durations per operation name, keeping at most `cap`
/// samples each (oldest dropped first).
#[derive(Debug)]
pub struct PerfRecorder {
    cap: usize,
    series: Mutex<HashMap<String, VecDeque<Duration>>>,
}

impl PerfRecorder {
    /// Creates a recorder keeping at most `cap` samples per operation.
    #[must_use]
    pub fn new(cap: usize) -> Self {
        Self {
            cap: cap.max(1),
            series: Mutex::new(HashMap::new()),
        }
    }

    /// Appends one sample for `operation`.
    pub fn record(&self, operation: &str, duration: Duration) {
        let mut series = self
            .series
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        let samples = series.entry(operation.to_string()).or_default();
        if samples.len() == self.cap {
            samples.pop_front();
        }
        samples.push_back(duration);
    }

    /// Returns the aggregate for `operation`, or `None` if never recorded.
    #[must_use]
    pub fn summary(&self, operation: &str) -> Option<PerfSummary> {
        let series = self
            .series
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        let samples = series.get(operation)?;
        if samples.is_empty() {
            return None;
        }

        let total: Duration = samples.iter().sum();
        let max = samples.iter().max().copied().unwrap_or_default();
        Some(PerfSummary {
            count: samples.len(),
            mean: total / u32::try_from(samples.len()).unwrap_or(u32::MAX),
            max,
        })
    }

    /// Names of all operations with at least one sample, sorted.
    #[must_use]
    pub fn operations(&self) -> Vec<String> {
        let series = self
            .series
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        let mut names: Vec<String> = series.keys().cloned().collect();
        names.sort_unstable();
        names
    }
}
