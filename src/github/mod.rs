// gitpilot: Interactive Git Workflow Runner
//
// SPDX-FileCopyrightText: 2026 Gitpilot Contributors
// SPDX-License-Identifier: GPL-3.0-or-later

//! Hosting API client.
//!
//! ```text
//! GitHubClient
//!   create_repository    POST   /user/repos
//!   delete_repository    DELETE /repos/{user}/{name}
//!   set_visibility       PATCH  /repos/{user}/{name}
//!   remote_exists        GET    /repos/{user}/{name}
//! ```
//!
//! The base URL is injected so tests point the client at a local mock
//! server. The client never touches git; repository management and the
//! working tree stay in separate layers.

use std::sync::OnceLock;

use regex::Regex;
use reqwest::StatusCode;
use serde::Serialize;
use tracing::{debug, info};

use crate::error::ApiError;

const USER_AGENT: &str = concat!("gitpilot/", env!("CARGO_PKG_VERSION"));

fn repo_name_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^[A-Za-z0-9_.-]+$").unwrap_or_else(|_| unreachable!("pattern is valid"))
    })
}

/// Validates a repository name against the hosting service's rules.
///
/// # Errors
///
/// Returns `ApiError::InvalidRepoName` for empty names, names over 100
/// characters, names starting with `-`, or names with characters outside
/// `[A-Za-z0-9_.-]`.
pub fn validate_repo_name(name: &str) -> std::result::Result<(), ApiError> {
    let reason = if name.is_empty() {
        Some("must not be empty")
    } else if name.len() > 100 {
        Some("must be at most 100 characters")
    } else if name.starts_with('-') {
        Some("must not start with '-'")
    } else if !repo_name_pattern().is_match(name) {
        Some("may only contain letters, digits, '_', '.' and '-'")
    } else {
        None
    };
    match reason {
        Some(reason) => Err(ApiError::InvalidRepoName {
            name: name.to_string(),
            reason: reason.to_string(),
        }),
        None => Ok(()),
    }
}

/// Where a repository already exists, relative to one local base directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RepoPresence {
    /// A checkout named after the repository exists under the base directory.
    pub local: bool,
    /// The repository exists on the hosting service.
    pub remote: bool,
}

#[derive(Serialize)]
struct CreateRepoBody<'a> {
    name: &'a str,
    private: bool,
}

#[derive(Serialize)]
struct VisibilityBody {
    private: bool,
}

/// Authenticated client for one user's repositories.
#[derive(Debug, Clone)]
pub struct GitHubClient {
    http: reqwest::Client,
    api_base: String,
    username: String,
    token: String,
}

impl GitHubClient {
    /// Builds a client against `api_base` (no trailing slash).
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Reqwest` when the underlying client cannot be
    /// constructed.
    pub fn new(
        api_base: impl Into<String>,
        username: impl Into<String>,
        token: impl Into<String>,
    ) -> std::result::Result<Self, ApiError> {
        let http = reqwest::Client::builder().user_agent(USER_AGENT).build()?;
        Ok(Self {
            http,
            api_base: api_base.into().trim_end_matches('/').to_string(),
            username: username.into(),
            token: token.into(),
        })
    }

    fn repo_url(&self, name: &str) -> String {
        format!("{}/repos/{}/{name}", self.api_base, self.username)
    }

    fn authorized(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        request
            .header("Authorization", format!("token {}", self.token))
            .header("Accept", "application/vnd.github+json")
    }

    /// Creates a repository under the authenticated user.
    ///
    /// Returns `true` when the repository was created, `false` when it
    /// already existed (the service answers 422 for duplicates).
    ///
    /// # Errors
    ///
    /// `ApiError::InvalidRepoName` for a rejected name, `ApiError::HttpStatus`
    /// for any other non-success answer.
    pub async fn create_repository(
        &self,
        name: &str,
        private: bool,
    ) -> std::result::Result<bool, ApiError> {
        validate_repo_name(name)?;
        let url = format!("{}/user/repos", self.api_base);
        let response = self
            .authorized(self.http.post(&url))
            .json(&CreateRepoBody { name, private })
            .send()
            .await?;
        match response.status() {
            StatusCode::CREATED => {
                info!(repo = name, private, "repository created");
                Ok(true)
            }
            StatusCode::UNPROCESSABLE_ENTITY => {
                debug!(repo = name, "repository already exists");
                Ok(false)
            }
            status => Err(Self::http_error(status, &url, response).await),
        }
    }

    /// Deletes a repository owned by the authenticated user.
    ///
    /// # Errors
    ///
    /// `ApiError::HttpStatus` unless the service answers 204.
    pub async fn delete_repository(&self, name: &str) -> std::result::Result<(), ApiError> {
        validate_repo_name(name)?;
        let url = self.repo_url(name);
        let response = self.authorized(self.http.delete(&url)).send().await?;
        if response.status() == StatusCode::NO_CONTENT {
            info!(repo = name, "repository deleted");
            Ok(())
        } else {
            Err(Self::http_error(response.status(), &url, response).await)
        }
    }

    /// Toggles a repository between private and public.
    ///
    /// # Errors
    ///
    /// `ApiError::HttpStatus` unless the service answers 200.
    pub async fn set_visibility(
        &self,
        name: &str,
        private: bool,
    ) -> std::result::Result<(), ApiError> {
        validate_repo_name(name)?;
        let url = self.repo_url(name);
        let response = self
            .authorized(self.http.patch(&url))
            .json(&VisibilityBody { private })
            .send()
            .await?;
        if response.status() == StatusCode::OK {
            info!(repo = name, private, "visibility updated");
            Ok(())
        } else {
            Err(Self::http_error(response.status(), &url, response).await)
        }
    }

    /// Whether the repository exists on the hosting service.
    ///
    /// # Errors
    ///
    /// `ApiError::HttpStatus` for any answer other than 200 or 404.
    pub async fn remote_exists(&self, name: &str) -> std::result::Result<bool, ApiError> {
        validate_repo_name(name)?;
        let url = self.repo_url(name);
        let response = self.authorized(self.http.get(&url)).send().await?;
        match response.status() {
            StatusCode::OK => Ok(true),
            StatusCode::NOT_FOUND => Ok(false),
            status => Err(Self::http_error(status, &url, response).await),
        }
    }

    /// Checks both sides at once: a local checkout named `name` under
    /// `local_base`, and the hosted repository.
    ///
    /// # Errors
    ///
    /// Same as [`remote_exists`](Self::remote_exists).
    pub async fn presence(
        &self,
        name: &str,
        local_base: &std::path::Path,
    ) -> std::result::Result<RepoPresence, ApiError> {
        let local = local_base.join(name).join(".git").is_dir();
        let remote = self.remote_exists(name).await?;
        Ok(RepoPresence { local, remote })
    }

    /// Clone URL with embedded credentials, for cloning private
    /// repositories without a prompt.
    #[must_use]
    pub fn authenticated_clone_url(&self, clone_url_prefix: &str, name: &str) -> String {
        let host = clone_url_prefix
            .trim_start_matches("https://")
            .trim_end_matches('/');
        format!(
            "https://{}:{}@{host}/{}/{name}.git",
            self.username, self.token, self.username
        )
    }

    async fn http_error(status: StatusCode, url: &str, response: reqwest::Response) -> ApiError {
        let body = response.text().await.unwrap_or_default();
        ApiError::HttpStatus {
            status: status.as_u16(),
            url: url.to_string(),
            body,
        }
    }
}

#[cfg(test)]
mod tests;
