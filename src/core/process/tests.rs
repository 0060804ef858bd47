// gitpilot: Interactive Git Workflow Runner
//
// SPDX-FileCopyrightText: 2026 Gitpilot Contributors
// SPDX-License-Identifier: GPL-3.0-or-later

use super::builder::{ProcessBuilder, ProcessFlags};
use std::time::Duration;

#[tokio::test]
async fn test_process_echo() {
    #[cfg(windows)]
    let output = ProcessBuilder::raw("Write-Output 'hello'")
        .run()
        .await
        .expect("echo should succeed");

    #[cfg(not(windows))]
    let output = ProcessBuilder::new("echo")
        .arg("hello")
        .run()
        .await
        .expect("echo should succeed");

    assert!(output.success());
    assert_eq!(output.stdout().trim(), "hello");
}

#[tokio::test]
async fn test_nonzero_exit_is_not_an_error() {
    let output = ProcessBuilder::raw("exit 42")
        .run()
        .await
        .expect("a started process never errors on exit code");

    assert!(!output.success());
    assert_eq!(output.exit_code(), 42);
}

#[tokio::test]
async fn test_stderr_captured_separately() {
    #[cfg(not(windows))]
    {
        let output = ProcessBuilder::raw("echo out; echo err 1>&2; exit 1")
            .run()
            .await
            .expect("process should complete");
        assert_eq!(output.stdout().trim(), "out");
        assert_eq!(output.stderr().trim(), "err");
        assert!(!output.success());
    }
}

#[tokio::test]
async fn test_cwd_is_explicit() {
    let temp = tempfile::tempdir().expect("failed to create temp dir");
    #[cfg(not(windows))]
    {
        let output = ProcessBuilder::raw("pwd")
            .cwd(temp.path())
            .run()
            .await
            .expect("pwd should succeed");
        let reported = std::fs::canonicalize(output.stdout().trim()).unwrap();
        let expected = std::fs::canonicalize(temp.path()).unwrap();
        assert_eq!(reported, expected);
    }
    // The process-wide cwd must not have moved
    assert_ne!(
        std::env::current_dir().unwrap(),
        temp.path(),
        "builder must never mutate the process-wide working directory"
    );
}

#[tokio::test]
async fn test_env_merged_over_parent() {
    #[cfg(not(windows))]
    {
        let output = ProcessBuilder::raw("echo \"$GITPILOT_TEST_VAR\"")
            .env("GITPILOT_TEST_VAR", "42")
            .run()
            .await
            .expect("echo should succeed");
        assert_eq!(output.stdout().trim(), "42");
    }
}

#[tokio::test]
async fn test_spawn_failure_is_an_error() {
    let result = ProcessBuilder::new("/nonexistent/program_12345").run().await;
    assert!(result.is_err(), "unstartable process should be an error");
}

#[tokio::test]
async fn test_spawn_failure_ignored_with_flag() {
    let output = ProcessBuilder::new("/nonexistent/program_12345")
        .flag(ProcessFlags::IGNORE_START_ERRORS)
        .run()
        .await
        .expect("flag should convert start error to failed output");
    assert!(!output.success());
    assert_eq!(output.exit_code(), -1);
    assert!(!output.stderr().is_empty());
}

#[tokio::test]
async fn test_timeout_kills_hung_process() {
    #[cfg(not(windows))]
    {
        let result = ProcessBuilder::raw("sleep 10")
            .timeout(Duration::from_millis(100))
            .run()
            .await;
        assert!(result.is_err(), "hung process should time out");
    }
}

#[test]
fn test_executable_lookup_found() {
    // cargo is always available since we're running tests with cargo
    assert!(ProcessBuilder::exists("cargo"));
    let path = ProcessBuilder::find("cargo").expect("cargo should be found");
    assert!(path.exists());
    let builder = ProcessBuilder::which("cargo").expect("which should find cargo");
    assert!(builder.program().exists());
}

#[test]
fn test_executable_lookup_not_found() {
    let program = "nonexistent_program_12345";
    assert!(!ProcessBuilder::exists(program));
    assert!(ProcessBuilder::find(program).is_none());
    assert!(ProcessBuilder::which(program).is_err());
}
