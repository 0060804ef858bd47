// gitpilot: Interactive Git Workflow Runner
//
// SPDX-FileCopyrightText: 2026 Gitpilot Contributors
// SPDX-License-Identifier: GPL-3.0-or-later

use std::process::ExitCode;

use clap::Parser;
use mimalloc::MiMalloc;

use gitpilot::cli::Cli;
use gitpilot::cmd::App;
use gitpilot::core::process::ProcessBuilder;
use gitpilot::error::Result;
use gitpilot::logging::{LogConfig, init_logging};

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli).await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("gitpilot: {e:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<ExitCode> {
    let app = App::from_options(&cli.global)?;

    let log_config = LogConfig::builder()
        .with_console_level(app.config().global.output_log_level)
        .with_file_level(app.config().global.file_log_level)
        .maybe_with_log_file(
            app.config()
                .global
                .log_file
                .as_ref()
                .map(|p| p.display().to_string()),
        )
        .build();
    let _guard = init_logging(&log_config)?;

    // Everything downstream assumes the wrapped tool exists; fail fast.
    if !ProcessBuilder::exists("git") {
        anyhow::bail!("git is not installed or not in PATH");
    }

    app.run(cli.command).await
}
