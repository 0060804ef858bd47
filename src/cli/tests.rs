// gitpilot: Interactive Git Workflow Runner
//
// SPDX-FileCopyrightText: 2026 Gitpilot Contributors
// SPDX-License-Identifier: GPL-3.0-or-later

use clap::Parser;

use super::{Cli, Commands, LogFormat};
use crate::config::Config;
use crate::git::HistoryFormat;
use crate::logging::LogLevel;

fn parse(args: &[&str]) -> Cli {
    Cli::try_parse_from(args).expect("parse")
}

#[test]
fn push_takes_an_optional_message() {
    let cli = parse(&["gitpilot", "push", "-m", "fix typo"]);
    match cli.command {
        Commands::Push { message } => assert_eq!(message.as_deref(), Some("fix typo")),
        other => panic!("unexpected command: {other:?}"),
    }

    let cli = parse(&["gitpilot", "push"]);
    assert!(matches!(cli.command, Commands::Push { message: None }));
}

#[test]
fn log_defaults_to_oneline() {
    let cli = parse(&["gitpilot", "log"]);
    match cli.command {
        Commands::Log { count, format } => {
            assert_eq!(count, None);
            assert_eq!(format, LogFormat::Oneline);
        }
        other => panic!("unexpected command: {other:?}"),
    }

    let cli = parse(&["gitpilot", "log", "-n", "3", "--format", "graph"]);
    match cli.command {
        Commands::Log { count, format } => {
            assert_eq!(count, Some(3));
            assert_eq!(HistoryFormat::from(format), HistoryFormat::Graph);
        }
        other => panic!("unexpected command: {other:?}"),
    }
}

#[test]
fn add_and_commit_split_the_push_workflow() {
    assert!(matches!(parse(&["gitpilot", "add"]).command, Commands::Add));
    match parse(&["gitpilot", "commit", "-m", "wip"]).command {
        Commands::Commit { message } => assert_eq!(message.as_deref(), Some("wip")),
        other => panic!("unexpected command: {other:?}"),
    }
}

#[test]
fn branch_scope_flags_conflict() {
    assert!(Cli::try_parse_from(["gitpilot", "branch", "--remote", "--current"]).is_err());
    let cli = parse(&["gitpilot", "branch", "--remote"]);
    assert!(matches!(
        cli.command,
        Commands::Branch {
            remote: true,
            current: false
        }
    ));
}

#[test]
fn status_accepts_multiple_roots() {
    let cli = parse(&["gitpilot", "status", "/a", "/b"]);
    match cli.command {
        Commands::Status { repos } => assert_eq!(repos.len(), 2),
        other => panic!("unexpected command: {other:?}"),
    }
}

#[test]
fn global_options_are_accepted_after_the_subcommand() {
    let cli = parse(&["gitpilot", "status", "--yes", "-C", "/tmp/repo"]);
    assert!(cli.global.assume_yes);
    assert_eq!(
        cli.global.dir.as_deref(),
        Some(std::path::Path::new("/tmp/repo"))
    );
}

#[test]
fn cli_overrides_win_over_config() {
    let cli = parse(&["gitpilot", "--log-level", "5", "--yes", "status"]);
    let mut config = Config::default();
    cli.global.apply_to(&mut config);
    assert_eq!(config.global.output_log_level, LogLevel::TRACE);
    assert!(config.global.assume_yes);
}

#[test]
fn hosting_commands_parse() {
    assert!(matches!(
        parse(&["gitpilot", "create", "demo", "--private"]).command,
        Commands::Create {
            private: true,
            ..
        }
    ));
    assert!(matches!(
        parse(&["gitpilot", "delete", "demo"]).command,
        Commands::Delete { .. }
    ));
    assert!(matches!(
        parse(&["gitpilot", "visibility", "demo"]).command,
        Commands::Visibility { private: false, .. }
    ));
    assert!(matches!(parse(&["gitpilot", "login"]).command, Commands::Login));
    assert!(matches!(parse(&["gitpilot", "logout"]).command, Commands::Logout));
}
