// gitpilot: Interactive Git Workflow Runner
//
// SPDX-FileCopyrightText: 2026 Gitpilot Contributors
// SPDX-License-Identifier: GPL-3.0-or-later

//! Command execution.
//!
//! ```text
//! Cli --> App::from_options --> App::run(command)
//!              |                     |
//!              v                     v
//!         Config + store       Workflows / GitHubClient / analytics
//!              |                     |
//!              v                     v
//!          Prompter           OperationResult --> stdout + ExitCode
//! ```
//!
//! The application context owns everything with state: configuration, the
//! prompter, the analytics cache, the timing recorder and the credential
//! store. Handlers receive what they need and nothing more.

use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Instant;

use anyhow::Context;
use tracing::{debug, info};

use crate::auth::{CredentialStore, Credentials};
use crate::cli::{Commands, GlobalOptions};
use crate::config::Config;
use crate::core::cache::ResultCache;
use crate::core::perf::PerfRecorder;
use crate::error::{AuthError, Result};
use crate::git::{
    BranchScope, GitExecutor, OperationResult, RepoAnalytics, Workflows, repo_analytics,
};
use crate::github::GitHubClient;
use crate::ui::{AssumeYes, Prompter, TerminalPrompter};

/// Everything a command invocation needs, built once per run.
pub struct App {
    config: Config,
    workdir: PathBuf,
    prompter: Box<dyn Prompter>,
    perf: PerfRecorder,
    analytics: ResultCache<RepoAnalytics>,
    store: CredentialStore,
}

impl App {
    /// Loads configuration and assembles the application context.
    ///
    /// # Errors
    ///
    /// Fails on unreadable or invalid configuration, or when no home
    /// directory exists for the credential store.
    pub fn from_options(global: &GlobalOptions) -> Result<Self> {
        let mut loader = Config::builder().add_toml_file_optional("gitpilot.toml");
        if let Some(file) = &global.config {
            loader = loader.add_toml_file(file);
        }
        let mut config = loader.with_env_prefix("GITPILOT").build()?;
        global.apply_to(&mut config);

        let workdir = global.workdir().context("cannot determine working directory")?;
        let prompter: Box<dyn Prompter> = if config.global.assume_yes {
            Box::new(AssumeYes)
        } else {
            Box::new(TerminalPrompter)
        };
        let perf = PerfRecorder::new(config.cache.perf_cap);
        let store = CredentialStore::open_default()?;

        Ok(Self {
            config,
            workdir,
            prompter,
            perf,
            analytics: ResultCache::new(),
            store,
        })
    }

    /// The loaded configuration.
    #[must_use]
    pub const fn config(&self) -> &Config {
        &self.config
    }

    fn executor(&self) -> Result<GitExecutor> {
        let exec =
            GitExecutor::new(&self.workdir)?.with_timeout(self.config.process_timeout());
        Ok(exec)
    }

    fn workflows(&self) -> Result<Workflows<'_>> {
        let credentials = self.store.current().unwrap_or_default();
        Ok(Workflows::new(
            self.executor()?,
            self.prompter.as_ref(),
            self.config.git.clone(),
            credentials,
        ))
    }

    fn client(&self) -> Result<GitHubClient> {
        let creds = self.logged_in()?;
        let token = creds.token.ok_or(AuthError::NotLoggedIn)?;
        Ok(GitHubClient::new(
            &self.config.github.api_base,
            creds.username,
            token,
        )?)
    }

    fn logged_in(&self) -> Result<Credentials> {
        self.store.current()?.ok_or_else(|| AuthError::NotLoggedIn.into())
    }

    /// Executes one parsed command.
    ///
    /// # Errors
    ///
    /// Propagates setup failures (missing git, bad config, not logged in).
    /// Failures git itself reported come back as a non-success exit code
    /// after being printed, never as an `Err`.
    pub async fn run(&self, command: Commands) -> Result<ExitCode> {
        match command {
            Commands::Push { message } => {
                let result = self
                    .timed("push", self.workflows()?.push(message.as_deref()))
                    .await?;
                Ok(Self::report(&result))
            }
            Commands::Pull => {
                let result = self.timed("pull", self.workflows()?.pull()).await?;
                Ok(Self::report(&result))
            }
            Commands::Add => {
                let result = self.timed("add", self.workflows()?.stage()).await?;
                Ok(Self::report(&result))
            }
            Commands::Commit { message } => {
                let result = self
                    .timed("commit", self.workflows()?.commit(message.as_deref()))
                    .await?;
                Ok(Self::report(&result))
            }
            Commands::Status { repos } => {
                if repos.is_empty() {
                    let result = self.timed("status", self.workflows()?.status()).await?;
                    return Ok(Self::report(&result));
                }
                let results = self
                    .timed("status-all", self.workflows()?.status_all(&repos))
                    .await?;
                let mut all_ok = true;
                for (root, result) in &results {
                    println!("{}: {}", root.display(), result.message);
                    all_ok &= result.succeeded;
                }
                Ok(if all_ok { ExitCode::SUCCESS } else { ExitCode::FAILURE })
            }
            Commands::Log { count, format } => {
                let result = self
                    .timed("log", self.workflows()?.history(count, format.into()))
                    .await?;
                Ok(Self::report(&result))
            }
            Commands::Branch { remote, current } => {
                let scope = if current {
                    BranchScope::Current
                } else if remote {
                    BranchScope::Remote
                } else {
                    BranchScope::Local
                };
                let result = self
                    .timed("branch", self.workflows()?.branches(scope))
                    .await?;
                Ok(Self::report(&result))
            }
            Commands::Switch { name } => {
                let result = self
                    .timed("switch", self.workflows()?.switch_branch(&name))
                    .await?;
                Ok(Self::report(&result))
            }
            Commands::New { name } => {
                let result = self
                    .timed("new-branch", self.workflows()?.create_branch(&name))
                    .await?;
                Ok(Self::report(&result))
            }
            Commands::Clone { repo } => {
                let url = self.resolve_clone_url(&repo)?;
                let result = self
                    .timed("clone", self.workflows()?.clone_repo(&url, None))
                    .await?;
                Ok(Self::report(&result))
            }
            Commands::Create { name, private } => {
                let client = self.client()?;
                let presence = client.presence(&name, &self.workdir).await?;
                if presence.remote {
                    println!("Repository '{name}' already exists");
                } else {
                    client.create_repository(&name, private).await?;
                    println!("Created repository '{name}'");
                }
                if presence.local {
                    return Ok(ExitCode::SUCCESS);
                }
                // fall through to a local checkout, as a fresh repo is
                // almost always wanted on disk too
                let clone_here = self
                    .prompter
                    .confirm(&format!("Clone '{name}' into the working directory?"), true);
                if !clone_here {
                    return Ok(ExitCode::SUCCESS);
                }
                let url = self.resolve_clone_url(&name)?;
                let result = self
                    .timed("clone", self.workflows()?.clone_repo(&url, None))
                    .await?;
                Ok(Self::report(&result))
            }
            Commands::Delete { name } => {
                let really = self.prompter.confirm(
                    &format!("Delete repository '{name}' from the hosting service? This cannot be undone."),
                    false,
                );
                if !really {
                    println!("Aborted");
                    return Ok(ExitCode::FAILURE);
                }
                self.client()?.delete_repository(&name).await?;
                println!("Deleted repository '{name}'");

                let local = self.workdir.join(&name);
                if local.join(".git").is_dir()
                    && self.prompter.confirm(
                        &format!("Also remove the local checkout '{}'?", local.display()),
                        false,
                    )
                {
                    std::fs::remove_dir_all(&local)
                        .with_context(|| format!("failed to remove {}", local.display()))?;
                    println!("Removed {}", local.display());
                }
                Ok(ExitCode::SUCCESS)
            }
            Commands::Visibility { name, private } => {
                self.client()?.set_visibility(&name, private).await?;
                println!(
                    "Repository '{name}' is now {}",
                    if private { "private" } else { "public" }
                );
                Ok(ExitCode::SUCCESS)
            }
            Commands::Login => {
                let creds = self.store.interactive_login(self.prompter.as_ref())?;
                println!("Logged in as {}", creds.username);
                Ok(ExitCode::SUCCESS)
            }
            Commands::Logout => {
                self.store.clear()?;
                println!("Logged out");
                Ok(ExitCode::SUCCESS)
            }
            Commands::Stats => {
                let stats = self
                    .timed(
                        "stats",
                        repo_analytics(
                            &self.analytics,
                            &self.workdir,
                            self.config.freshness_window(),
                        ),
                    )
                    .await?;
                println!("Branch:       {}", stats.branch);
                println!("Commits:      {}", stats.commits);
                println!("Authors:      {}", stats.authors.join(", "));
                println!("Last commit:  {}", stats.last_commit);
                Ok(ExitCode::SUCCESS)
            }
        }
    }

    /// Bare repository names are expanded to the logged-in user's clone URL;
    /// anything with a scheme or scp-style host passes through unchanged.
    fn resolve_clone_url(&self, repo: &str) -> Result<String> {
        if repo.contains("://") || repo.contains('@') {
            return Ok(repo.to_string());
        }
        let creds = self.logged_in()?;
        let prefix = self.config.github.clone_url_prefix.trim_end_matches('/');
        match &creds.token {
            Some(token) => {
                let host = prefix.trim_start_matches("https://");
                Ok(format!(
                    "https://{}:{token}@{host}/{}/{repo}.git",
                    creds.username, creds.username
                ))
            }
            None => Ok(format!("{prefix}/{}/{repo}.git", creds.username)),
        }
    }

    async fn timed<T>(
        &self,
        operation: &str,
        fut: impl Future<Output = Result<T>>,
    ) -> Result<T> {
        let start = Instant::now();
        let value = fut.await?;
        let elapsed = start.elapsed();
        self.perf.record(operation, elapsed);
        if let Some(summary) = self.perf.summary(operation) {
            debug!(
                operation,
                ms = elapsed.as_millis(),
                samples = summary.count,
                mean_ms = summary.mean.as_millis(),
                max_ms = summary.max.as_millis(),
                "timing"
            );
        }
        Ok(value)
    }

    fn report(result: &OperationResult) -> ExitCode {
        if result.message.is_empty() {
            info!("operation finished with no output");
        } else {
            println!("{}", result.message);
        }
        if let Some(diagnostic) = &result.diagnostic {
            eprintln!("{}", diagnostic.trim_end());
        }
        if result.succeeded {
            ExitCode::SUCCESS
        } else {
            ExitCode::FAILURE
        }
    }
}
