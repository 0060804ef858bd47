// gitpilot: Interactive Git Workflow Runner
//
// SPDX-FileCopyrightText: 2026 Gitpilot Contributors
// SPDX-License-Identifier: GPL-3.0-or-later

use super::ResultCache;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

#[tokio::test]
async fn test_fresh_hit_skips_compute() {
    let cache: ResultCache<String> = ResultCache::new();
    let calls = AtomicUsize::new(0);
    let window = Duration::from_secs(60);

    for _ in 0..3 {
        let value = cache
            .get_or_compute("analytics:/repo", window, || async {
                calls.fetch_add(1, Ordering::SeqCst);
                Ok("computed".to_string())
            })
            .await
            .expect("compute should succeed");
        assert_eq!(value, "computed");
    }

    assert_eq!(calls.load(Ordering::SeqCst), 1, "compute must run once");
}

#[tokio::test]
async fn test_stale_entry_recomputes() {
    let cache: ResultCache<u32> = ResultCache::new();
    let calls = AtomicUsize::new(0);
    let window = Duration::from_millis(30);

    let first = cache
        .get_or_compute("k", window, || async {
            calls.fetch_add(1, Ordering::SeqCst);
            Ok(1)
        })
        .await
        .unwrap();

    tokio::time::sleep(Duration::from_millis(60)).await;

    let second = cache
        .get_or_compute("k", window, || async {
            calls.fetch_add(1, Ordering::SeqCst);
            Ok(2)
        })
        .await
        .unwrap();

    assert_eq!(first, 1);
    assert_eq!(second, 2, "stale value must never be returned");
    assert_eq!(calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_keys_are_independent() {
    let cache: ResultCache<&'static str> = ResultCache::new();
    let window = Duration::from_secs(60);

    let a = cache
        .get_or_compute("a", window, || async { Ok("va") })
        .await
        .unwrap();
    let b = cache
        .get_or_compute("b", window, || async { Ok("vb") })
        .await
        .unwrap();

    assert_eq!((a, b), ("va", "vb"));
    assert_eq!(cache.len(), 2);
}

#[tokio::test]
async fn test_failed_compute_stores_nothing() {
    let cache: ResultCache<u32> = ResultCache::new();
    let window = Duration::from_secs(60);

    let result = cache
        .get_or_compute("k", window, || async { anyhow::bail!("boom") })
        .await;
    assert!(result.is_err());
    assert!(cache.is_empty(), "errors must not be cached");

    let value = cache
        .get_or_compute("k", window, || async { Ok(7) })
        .await
        .unwrap();
    assert_eq!(value, 7);
}

#[tokio::test]
async fn test_clear_is_total() {
    let cache: ResultCache<u32> = ResultCache::new();
    let window = Duration::from_secs(60);

    for key in ["x", "y", "z"] {
        cache
            .get_or_compute(key, window, || async { Ok(0) })
            .await
            .unwrap();
    }
    assert_eq!(cache.len(), 3);

    cache.clear();
    assert!(cache.is_empty());
}
