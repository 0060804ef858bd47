// gitpilot: Interactive Git Workflow Runner
//
// SPDX-FileCopyrightText: 2026 Gitpilot Contributors
// SPDX-License-Identifier: GPL-3.0-or-later

use super::Config;
use std::time::Duration;

#[test]
fn test_defaults() {
    let config = Config::default();
    assert_eq!(config.git.default_commit_message, "Auto commit");
    assert_eq!(config.git.default_remote, "origin");
    assert_eq!(config.git.history_limit, 10);
    assert_eq!(config.git.timeout_secs, None);
    assert_eq!(config.cache.freshness_ms, 5_000);
    assert_eq!(config.cache.perf_cap, 100);
    assert_eq!(config.github.api_base, "https://api.github.com");
}

#[test]
fn test_from_toml_str() {
    let config = Config::from_str(
        r#"
        [git]
        default_commit_message = "wip"
        history_limit = 25
        timeout_secs = 30

        [cache]
        freshness_ms = 250
        "#,
    )
    .expect("config should parse");

    assert_eq!(config.git.default_commit_message, "wip");
    assert_eq!(config.git.history_limit, 25);
    assert_eq!(config.process_timeout(), Some(Duration::from_secs(30)));
    assert_eq!(config.freshness_window(), Duration::from_millis(250));
    // Untouched sections keep defaults
    assert_eq!(config.git.default_remote, "origin");
}

#[test]
fn test_unknown_field_rejected() {
    let result = Config::from_str(
        r"
        [git]
        defualt_remote = 'origin'
        ",
    );
    assert!(result.is_err(), "typoed key should be rejected");
}

#[test]
fn test_validation_history_limit() {
    let result = Config::from_str(
        r"
        [git]
        history_limit = 0
        ",
    );
    assert!(result.is_err(), "zero history limit should be rejected");
}

#[test]
fn test_validation_empty_remote() {
    let result = Config::from_str(
        r"
        [git]
        default_remote = '  '
        ",
    );
    assert!(result.is_err(), "blank remote should be rejected");
}

#[test]
fn test_env_override() {
    // SAFETY: single-threaded access to a variable no other test reads.
    unsafe { std::env::set_var("GITPILOT_GIT__DEFAULT_REMOTE", "upstream") };
    let config = Config::builder()
        .with_env_prefix("GITPILOT")
        .build()
        .expect("config should build");
    unsafe { std::env::remove_var("GITPILOT_GIT__DEFAULT_REMOTE") };
    assert_eq!(config.git.default_remote, "upstream");
}

#[test]
fn test_env_override_parses_numbers() {
    // SAFETY: single-threaded access to a variable no other test reads.
    unsafe { std::env::set_var("GITPILOT_CACHE__FRESHNESS_MS", "10000") };
    let config = Config::builder()
        .with_env_prefix("GITPILOT")
        .build()
        .expect("config should build");
    unsafe { std::env::remove_var("GITPILOT_CACHE__FRESHNESS_MS") };
    assert_eq!(config.cache.freshness_ms, 10_000);
}

#[test]
fn test_loader_override() {
    let config = Config::builder()
        .set("git.history_limit", 3i64)
        .expect("override should apply")
        .build()
        .expect("config should build");
    assert_eq!(config.git.history_limit, 3);
}
