// gitpilot: Interactive Git Workflow Runner
//
// SPDX-FileCopyrightText: 2026 Gitpilot Contributors
// SPDX-License-Identifier: GPL-3.0-or-later

//! Library root.
//!
//! # Crate Architecture
//!
//! ```text
//!                        main.rs
//!                           |
//!                +----------+----------+
//!                v                     v
//!             cli (clap)          cmd (runners)
//!                |        push / pull / branch / repo
//!                +----------+----------+
//!                           v
//!              ,---------------------------,
//!              |          config           |
//!              |   TOML, layered settings  |
//!              '--+-----------+--------+---'
//!                 |           |        |
//!                 v           v        v
//!               git         github    auth
//!        handlers/classify  REST API  credentials
//!          remedy/analytics
//!               |
//!          +----+------------------------------+
//!          |  core   process, dispatch,        |
//!          |         cache, perf               |
//!          +-----------------------------------+
//!          |  foundation   error, logging, ui  |
//!          +-----------------------------------+
//! ```

pub mod auth;
pub mod cli;
pub mod cmd;
pub mod config;
pub mod core;
pub mod error;
pub mod git;
pub mod github;
pub mod logging;
pub mod ui;
