// gitpilot: Interactive Git Workflow Runner
//
// SPDX-FileCopyrightText: 2026 Gitpilot Contributors
// SPDX-License-Identifier: GPL-3.0-or-later

//! Time-windowed result memoization.
//!
//! ```text
//! get_or_compute(key, window, compute)
//!        |
//!   fresh hit? ----yes----> stored value (compute skipped)
//!        |
//!        no (miss or stale; stale entry evicted first)
//!        |
//!        v
//!   compute() --> store {value, now} --> value
//! ```
//!
//! The cache is owned by the application context and passed into handlers;
//! there is no module-level singleton. Mutation is guarded by a `Mutex`
//! because handlers may run on different runtime threads. No at-most-one
//! concurrent computation is guaranteed: two racing callers may both
//! compute, and the later store wins.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use tracing::trace;

use crate::error::Result;

/// A cached value with its creation timestamp.
#[derive(Debug, Clone)]
struct CacheEntry<T> {
    value: T,
    created_at: Instant,
}

impl<T> CacheEntry<T> {
    fn is_fresh(&self, window: Duration) -> bool {
        self.created_at.elapsed() < window
    }
}

/// A freshness-windowed memoization map keyed by operation identity.
#[derive(Debug, Default)]
pub struct ResultCache<T> {
    entries: Mutex<HashMap<String, CacheEntry<T>>>,
}

impl<T: Clone> ResultCache<T> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Returns the cached value for `key` if it is still within `window`,
    /// otherwise invokes `compute`, stores its result, and returns it.
    ///
    /// A stale entry behaves as a miss and is evicted before recomputation;
    /// it is never returned. A failed computation stores nothing.
    ///
    /// # Errors
    ///
    /// Propagates whatever error `compute` returns.
    pub async fn get_or_compute<F, Fut>(
        &self,
        key: &str,
        window: Duration,
        compute: F,
    ) -> Result<T>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        {
            let mut entries = self
                .entries
                .lock()
                .unwrap_or_else(std::sync::PoisonError::into_inner);
            if let Some(entry) = entries.get(key) {
                if entry.is_fresh(window) {
                    trace!(key, "cache hit");
                    return Ok(entry.value.clone());
                }
                trace!(key, "cache entry stale, evicting");
                entries.remove(key);
            }
        }

        trace!(key, "cache miss, computing");
        let value = compute().await?;

        let mut entries = self
            .entries
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        entries.insert(
            key.to_string(),
            CacheEntry {
                value: value.clone(),
                created_at: Instant::now(),
            },
        );

        Ok(value)
    }

    /// Removes all entries regardless of freshness.
    pub fn clear(&self) {
        self.entries
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .clear();
    }

    /// Number of stored entries (fresh or stale).
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests;
