// gitpilot: Interactive Git Workflow Runner
//
// SPDX-FileCopyrightText: 2026 Gitpilot Contributors
// SPDX-License-Identifier: GPL-3.0-or-later

//! End-to-end workflow tests against real git repositories.
//!
//! Each test builds a disposable topology (seed repo, bare remote, one or
//! two clones) under a tempdir and drives the workflows exactly as the CLI
//! would, with a scripted prompter standing in for the user.

use std::path::{Path, PathBuf};

use gitpilot::config::GitConfig;
use gitpilot::git::{GitExecutor, OperationFlags, Workflows};
use gitpilot::ui::ScriptedPrompter;

async fn git(dir: &Path, args: &[&str]) {
    let exec = GitExecutor::new(dir).expect("git in PATH");
    let outcome = exec.run(args).await.expect("git runs");
    assert!(
        outcome.succeeded,
        "git {args:?} failed in {}: {}",
        dir.display(),
        outcome.diagnostic
    );
}

async fn git_stdout(dir: &Path, args: &[&str]) -> String {
    let exec = GitExecutor::new(dir).expect("git in PATH");
    let outcome = exec.run(args).await.expect("git runs");
    assert!(outcome.succeeded, "git {args:?} failed: {}", outcome.diagnostic);
    outcome.stdout.trim().to_string()
}

async fn configure_identity(dir: &Path) {
    git(dir, &["config", "user.name", "Test"]).await;
    git(dir, &["config", "user.email", "test@example.com"]).await;
    // merge on pull; newer git refuses divergent pulls without a strategy
    git(dir, &["config", "pull.rebase", "false"]).await;
}

/// Seed repo with one commit, published as a bare remote.
async fn setup_remote(base: &Path) -> PathBuf {
    let seed = base.join("seed");
    std::fs::create_dir(&seed).expect("mkdir seed");
    git(&seed, &["init", "-b", "main"]).await;
    configure_identity(&seed).await;
    std::fs::write(seed.join("README.md"), "seed\n").expect("write");
    git(&seed, &["add", "."]).await;
    git(&seed, &["commit", "-m", "initial"]).await;

    let remote = base.join("remote.git");
    git(
        base,
        &[
            "clone",
            "--bare",
            seed.to_str().expect("utf8 path"),
            remote.to_str().expect("utf8 path"),
        ],
    )
    .await;
    remote
}

async fn clone_from(base: &Path, remote: &Path, name: &str) -> PathBuf {
    git(
        base,
        &["clone", remote.to_str().expect("utf8 path"), name],
    )
    .await;
    let clone = base.join(name);
    configure_identity(&clone).await;
    clone
}

fn workflows<'a>(dir: &Path, prompter: &'a ScriptedPrompter) -> Workflows<'a> {
    let exec = GitExecutor::new(dir).expect("git in PATH");
    Workflows::new(exec, prompter, GitConfig::default(), None)
}

async fn remote_head(remote: &Path) -> String {
    git_stdout(remote, &["rev-parse", "HEAD"]).await
}

fn decline_everything() -> ScriptedPrompter {
    ScriptedPrompter::new(vec![], vec![])
}

#[tokio::test]
async fn push_outside_a_repository_fails_with_exact_message() {
    let dir = tempfile::tempdir().expect("tempdir");
    let prompter = decline_everything();
    let result = workflows(dir.path(), &prompter)
        .push(None)
        .await
        .expect("push runs");
    assert!(!result.succeeded);
    assert_eq!(result.message, "This is not a Git repository!");
}

#[tokio::test]
async fn clean_tree_push_reports_no_changes() {
    let base = tempfile::tempdir().expect("tempdir");
    let remote = setup_remote(base.path()).await;
    let clone = clone_from(base.path(), &remote, "work").await;
    let before = git_stdout(&clone, &["rev-parse", "HEAD"]).await;

    let prompter = decline_everything();
    let result = workflows(&clone, &prompter)
        .push(None)
        .await
        .expect("push runs");
    assert!(result.succeeded);
    assert_eq!(result.message, "No changes to commit");

    // no commit was created
    let after = git_stdout(&clone, &["rev-parse", "HEAD"]).await;
    assert_eq!(before, after);
}

#[tokio::test]
async fn push_commits_and_publishes_changes() {
    let base = tempfile::tempdir().expect("tempdir");
    let remote = setup_remote(base.path()).await;
    let clone = clone_from(base.path(), &remote, "work").await;

    std::fs::write(clone.join("data.txt"), "payload\n").expect("write");
    let prompter = decline_everything();
    let result = workflows(&clone, &prompter)
        .push(Some("add data"))
        .await
        .expect("push runs");
    assert!(result.succeeded, "push failed: {:?}", result.diagnostic);

    let remote_log = git_stdout(&remote, &["log", "-1", "--format=%s"]).await;
    assert_eq!(remote_log, "add data");
}

#[tokio::test]
async fn push_without_message_uses_the_configured_default() {
    let base = tempfile::tempdir().expect("tempdir");
    let remote = setup_remote(base.path()).await;
    let clone = clone_from(base.path(), &remote, "work").await;

    std::fs::write(clone.join("data.txt"), "payload\n").expect("write");
    let prompter = decline_everything();
    let result = workflows(&clone, &prompter)
        .push(None)
        .await
        .expect("push runs");
    assert!(result.succeeded);

    let remote_log = git_stdout(&remote, &["log", "-1", "--format=%s"]).await;
    assert_eq!(remote_log, "Auto commit");
}

/// Diverge two clones: `ahead` pushes first, `behind` then holds a local
/// commit the remote does not have.
async fn diverge(
    base: &Path,
    remote: &Path,
    behind_file: &str,
    ahead_file: &str,
) -> (PathBuf, PathBuf) {
    let behind = clone_from(base, remote, "behind").await;
    let ahead = clone_from(base, remote, "ahead").await;

    std::fs::write(ahead.join(ahead_file), "from ahead\n").expect("write");
    git(&ahead, &["add", "."]).await;
    git(&ahead, &["commit", "-m", "ahead change"]).await;
    git(&ahead, &["push"]).await;

    std::fs::write(behind.join(behind_file), "from behind\n").expect("write");
    git(&behind, &["add", "."]).await;
    git(&behind, &["commit", "-m", "behind change"]).await;

    (behind, ahead)
}

#[tokio::test]
async fn declined_pull_cancels_the_push_and_leaves_the_remote_alone() {
    let base = tempfile::tempdir().expect("tempdir");
    let remote = setup_remote(base.path()).await;
    let (behind, _ahead) = diverge(base.path(), &remote, "b.txt", "a.txt").await;
    let head_before = remote_head(&remote).await;

    let prompter = ScriptedPrompter::new(vec![false], vec![]);
    let result = workflows(&behind, &prompter)
        .push(Some("behind push"))
        .await
        .expect("push runs");

    assert!(!result.succeeded);
    assert!(result.cancelled());
    assert_eq!(remote_head(&remote).await, head_before);
}

#[tokio::test]
async fn diverged_push_merges_remote_commits_and_succeeds() {
    let base = tempfile::tempdir().expect("tempdir");
    let remote = setup_remote(base.path()).await;
    let (behind, _ahead) = diverge(base.path(), &remote, "b.txt", "a.txt").await;

    let prompter = ScriptedPrompter::new(vec![true], vec![]);
    let result = workflows(&behind, &prompter)
        .push(Some("behind push"))
        .await
        .expect("push runs");

    assert!(result.succeeded, "push failed: {:?}", result.diagnostic);
    assert_eq!(result.message, "Changes pushed after merging remote commits");

    // remote now contains both sides
    let subjects = git_stdout(&remote, &["log", "--format=%s"]).await;
    assert!(subjects.contains("ahead change"));
    assert!(subjects.contains("behind change"));
}

#[tokio::test]
async fn conflicting_pull_stops_without_force_pushing() {
    let base = tempfile::tempdir().expect("tempdir");
    let remote = setup_remote(base.path()).await;
    // both sides edit README.md
    let (behind, _ahead) = diverge(base.path(), &remote, "README.md", "README.md").await;
    let head_before = remote_head(&remote).await;

    // yes to pull-and-retry; any later prompt (force push) is declined
    let prompter = ScriptedPrompter::new(vec![true], vec![]);
    let result = workflows(&behind, &prompter)
        .push(Some("behind push"))
        .await
        .expect("push runs");

    assert!(!result.succeeded);
    assert!(result.flags.contains(OperationFlags::CONFLICTS_DETECTED));
    assert_eq!(remote_head(&remote).await, head_before);
}

/// Makes the bare remote reject every ref update through a pre-receive hook.
///
/// Non-fast-forward detection happens on the client before the hook runs,
/// so the first push is still rejected as non-fast-forward; the hook only
/// fires on the retried push after the merge, which keeps the remote
/// rejecting right up to the force-push offer.
#[cfg(unix)]
fn lock_remote(remote: &Path) {
    use std::os::unix::fs::PermissionsExt;
    let hook = remote.join("hooks").join("pre-receive");
    std::fs::write(&hook, "#!/bin/sh\necho locked >&2\nexit 1\n").expect("write hook");
    std::fs::set_permissions(&hook, std::fs::Permissions::from_mode(0o755))
        .expect("hook permissions");
}

#[cfg(unix)]
#[tokio::test]
async fn still_rejected_push_offers_force_and_declining_leaves_the_remote_alone() {
    let base = tempfile::tempdir().expect("tempdir");
    let remote = setup_remote(base.path()).await;
    let (behind, _ahead) = diverge(base.path(), &remote, "b.txt", "a.txt").await;
    lock_remote(&remote);
    let head_before = remote_head(&remote).await;

    // yes to pull-and-retry, no to the force push
    let prompter = ScriptedPrompter::new(vec![true, false], vec![]);
    let result = workflows(&behind, &prompter)
        .push(Some("behind push"))
        .await
        .expect("push runs");

    assert!(!result.succeeded);
    assert_eq!(result.message, "Push cancelled: force push declined");
    assert!(result.flags.contains(OperationFlags::FORCE_PUSH_REQUIRED));
    assert!(result.cancelled());
    assert_eq!(remote_head(&remote).await, head_before);
}

#[cfg(unix)]
#[tokio::test]
async fn accepted_force_push_issues_force_with_lease_only() {
    let base = tempfile::tempdir().expect("tempdir");
    let remote = setup_remote(base.path()).await;
    let (behind, _ahead) = diverge(base.path(), &remote, "b.txt", "a.txt").await;
    lock_remote(&remote);
    let head_before = remote_head(&remote).await;

    // yes to pull-and-retry, yes to the force push; the hook rejects the
    // lease-guarded attempt too, so nothing may land on the remote
    let prompter = ScriptedPrompter::new(vec![true, true], vec![]);
    let result = workflows(&behind, &prompter)
        .push(Some("behind push"))
        .await
        .expect("push runs");

    assert!(!result.succeeded);
    assert_eq!(result.message, "Force push failed");
    assert!(result.flags.contains(OperationFlags::FORCE_PUSH_REQUIRED));
    assert!(!result.cancelled());
    assert_eq!(remote_head(&remote).await, head_before);
}

#[tokio::test]
async fn switching_with_dirty_tree_offers_a_stash() {
    let base = tempfile::tempdir().expect("tempdir");
    let remote = setup_remote(base.path()).await;
    let clone = clone_from(base.path(), &remote, "work").await;

    // feature branch rewrites README.md, main keeps the seed content
    git(&clone, &["checkout", "-b", "feature"]).await;
    std::fs::write(clone.join("README.md"), "feature\n").expect("write");
    git(&clone, &["add", "."]).await;
    git(&clone, &["commit", "-m", "feature edit"]).await;
    git(&clone, &["checkout", "main"]).await;
    std::fs::write(clone.join("README.md"), "dirty\n").expect("write");

    let prompter = ScriptedPrompter::new(vec![true], vec![]);
    let result = workflows(&clone, &prompter)
        .switch_branch("feature")
        .await
        .expect("switch runs");

    assert!(result.succeeded, "switch failed: {:?}", result.diagnostic);
    assert!(result.message.contains("stashed"));
    let branch = git_stdout(&clone, &["branch", "--show-current"]).await;
    assert_eq!(branch, "feature");
}

#[tokio::test]
async fn switching_with_dirty_tree_can_be_declined() {
    let base = tempfile::tempdir().expect("tempdir");
    let remote = setup_remote(base.path()).await;
    let clone = clone_from(base.path(), &remote, "work").await;

    git(&clone, &["checkout", "-b", "feature"]).await;
    std::fs::write(clone.join("README.md"), "feature\n").expect("write");
    git(&clone, &["add", "."]).await;
    git(&clone, &["commit", "-m", "feature edit"]).await;
    git(&clone, &["checkout", "main"]).await;
    std::fs::write(clone.join("README.md"), "dirty\n").expect("write");

    let prompter = ScriptedPrompter::new(vec![false], vec![]);
    let result = workflows(&clone, &prompter)
        .switch_branch("feature")
        .await
        .expect("switch runs");

    assert!(!result.succeeded);
    assert!(result.cancelled());
    let branch = git_stdout(&clone, &["branch", "--show-current"]).await;
    assert_eq!(branch, "main");
}

#[tokio::test]
async fn commit_on_a_clean_tree_is_benign() {
    let base = tempfile::tempdir().expect("tempdir");
    let remote = setup_remote(base.path()).await;
    let clone = clone_from(base.path(), &remote, "work").await;

    let prompter = decline_everything();
    let result = workflows(&clone, &prompter)
        .commit(None)
        .await
        .expect("commit runs");
    assert!(result.succeeded);
    assert_eq!(result.message, "No changes to commit");
}

#[tokio::test]
async fn stage_then_commit_without_pushing() {
    let base = tempfile::tempdir().expect("tempdir");
    let remote = setup_remote(base.path()).await;
    let clone = clone_from(base.path(), &remote, "work").await;
    let remote_before = remote_head(&remote).await;

    std::fs::write(clone.join("staged.txt"), "x\n").expect("write");
    let prompter = decline_everything();
    let flows = workflows(&clone, &prompter);

    let staged = flows.stage().await.expect("stage runs");
    assert!(staged.succeeded);
    let porcelain = git_stdout(&clone, &["status", "--porcelain"]).await;
    assert!(porcelain.starts_with("A "));

    let committed = flows.commit(Some("local only")).await.expect("commit runs");
    assert!(committed.succeeded);

    // nothing was pushed
    assert_eq!(remote_head(&remote).await, remote_before);
}

#[tokio::test]
async fn pull_reports_already_up_to_date() {
    let base = tempfile::tempdir().expect("tempdir");
    let remote = setup_remote(base.path()).await;
    let clone = clone_from(base.path(), &remote, "work").await;

    let prompter = decline_everything();
    let result = workflows(&clone, &prompter).pull().await.expect("pull runs");
    assert!(result.succeeded, "pull failed: {:?}", result.diagnostic);
}

#[tokio::test]
async fn status_all_summarizes_many_repositories_in_order() {
    let base = tempfile::tempdir().expect("tempdir");
    let remote = setup_remote(base.path()).await;
    let clean = clone_from(base.path(), &remote, "clean").await;
    let dirty = clone_from(base.path(), &remote, "dirty").await;
    std::fs::write(dirty.join("x.txt"), "x\n").expect("write");
    let not_repo = base.path().join("plain");
    std::fs::create_dir(&not_repo).expect("mkdir");

    let roots = vec![clean.clone(), dirty.clone(), not_repo.clone()];
    let prompter = decline_everything();
    let results = workflows(base.path(), &prompter)
        .status_all(&roots)
        .await
        .expect("status_all runs");

    assert_eq!(results.len(), 3);
    assert_eq!(results[0].0, clean);
    assert_eq!(results[0].1.message, "clean");
    assert_eq!(results[1].1.message, "1 changed file(s)");
    assert_eq!(results[2].1.message, "This is not a Git repository!");
}

#[tokio::test]
async fn history_respects_limit_and_format() {
    let base = tempfile::tempdir().expect("tempdir");
    let remote = setup_remote(base.path()).await;
    let clone = clone_from(base.path(), &remote, "work").await;

    for i in 0..3 {
        std::fs::write(clone.join(format!("f{i}.txt")), "x\n").expect("write");
        git(&clone, &["add", "."]).await;
        git(&clone, &["commit", "-m", &format!("commit {i}")]).await;
    }

    let prompter = decline_everything();
    let flows = workflows(&clone, &prompter);

    let result = flows
        .history(Some(2), gitpilot::git::HistoryFormat::Oneline)
        .await
        .expect("log runs");
    assert!(result.succeeded);
    assert_eq!(result.message.lines().count(), 2);

    let detailed = flows
        .history(Some(1), gitpilot::git::HistoryFormat::Detailed)
        .await
        .expect("log runs");
    assert!(detailed.message.contains("Test,"));
    assert!(detailed.message.contains(": commit 2"));
}

#[tokio::test]
async fn new_branch_is_created_and_checked_out() {
    let base = tempfile::tempdir().expect("tempdir");
    let remote = setup_remote(base.path()).await;
    let clone = clone_from(base.path(), &remote, "work").await;

    let prompter = decline_everything();
    let result = workflows(&clone, &prompter)
        .create_branch("topic")
        .await
        .expect("branch runs");
    assert!(result.succeeded);
    let branch = git_stdout(&clone, &["branch", "--show-current"]).await;
    assert_eq!(branch, "topic");
}

#[tokio::test]
async fn batched_queries_share_one_shell_invocation() {
    use gitpilot::core::dispatch::{DispatchOptions, run_batched};

    let base = tempfile::tempdir().expect("tempdir");
    let remote = setup_remote(base.path()).await;
    let clone = clone_from(base.path(), &remote, "work").await;

    let commands = vec![
        "git rev-parse HEAD".to_string(),
        "git branch --show-current".to_string(),
        "git status --porcelain".to_string(),
    ];
    let output = run_batched(&commands, &DispatchOptions::in_dir(&clone))
        .await
        .expect("batch runs");
    assert!(output.success(), "batch failed: {}", output.stderr());
    assert!(output.stdout().contains("main"));

    // a failing command aborts the remainder
    let commands = vec![
        "git rev-parse HEAD".to_string(),
        "git nonsense-subcommand".to_string(),
        "git branch --show-current".to_string(),
    ];
    let output = run_batched(&commands, &DispatchOptions::in_dir(&clone))
        .await
        .expect("batch runs");
    assert!(!output.success());
    assert!(!output.stdout().contains("main"));
}

#[tokio::test]
async fn analytics_aggregate_commits_and_authors() {
    let base = tempfile::tempdir().expect("tempdir");
    let remote = setup_remote(base.path()).await;
    let clone = clone_from(base.path(), &remote, "work").await;

    std::fs::write(clone.join("more.txt"), "x\n").expect("write");
    git(&clone, &["add", "."]).await;
    git(&clone, &["commit", "-m", "second"]).await;

    let cache = gitpilot::core::cache::ResultCache::new();
    let stats = gitpilot::git::repo_analytics(
        &cache,
        &clone,
        std::time::Duration::from_secs(5),
    )
    .await
    .expect("analytics");

    assert_eq!(stats.commits, 2);
    assert_eq!(stats.authors, vec!["Test".to_string()]);
    assert_eq!(stats.branch, "main");
    assert!(stats.last_commit.contains("second"));
}
