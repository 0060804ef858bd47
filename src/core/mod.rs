// gitpilot: Interactive Git Workflow Runner
//
// SPDX-FileCopyrightText: 2026 Gitpilot Contributors
// SPDX-License-Identifier: GPL-3.0-or-later

//! Core infrastructure: subprocess execution, dispatch, caching, timing.

pub mod cache;
pub mod dispatch;
pub mod perf;
pub mod process;
