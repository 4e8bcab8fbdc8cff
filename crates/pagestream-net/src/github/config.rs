//! Connection settings for the GitHub issues source.

use serde::{Deserialize, Serialize};

/// Environment variable the token is read from by default.
pub const DEFAULT_TOKEN_ENV: &str = "GITHUB_TOKEN";

/// Where to fetch issues from and how.
///
/// The token is never serialized; it comes from the environment or is set in
/// code.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GitHubConfig {
    /// API root, without a trailing slash.
    pub api_base: String,
    /// Repository owner.
    pub owner: String,
    /// Repository name.
    pub repo: String,
    /// Personal access token.
    #[serde(skip)]
    pub token: Option<String>,
    /// User agent override. GitHub rejects requests without one.
    pub user_agent: Option<String>,
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for GitHubConfig {
    fn default() -> Self {
        Self {
            api_base: "https://api.github.com".to_string(),
            owner: "facebook".to_string(),
            repo: "react".to_string(),
            token: None,
            user_agent: None,
            timeout_secs: 30,
        }
    }
}

impl GitHubConfig {
    /// Default settings for `owner/repo`.
    pub fn new(owner: impl Into<String>, repo: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            repo: repo.into(),
            ..Self::default()
        }
    }

    /// Default settings with the token taken from `GITHUB_TOKEN`.
    pub fn from_env() -> Self {
        Self::default().with_token_from(DEFAULT_TOKEN_ENV)
    }

    /// Read the token from the environment variable `var`.
    ///
    /// An unset or blank variable leaves the source unauthenticated.
    #[must_use]
    pub fn with_token_from(mut self, var: &str) -> Self {
        self.token = std::env::var(var)
            .ok()
            .map(|token| token.trim().to_string())
            .filter(|token| !token.is_empty());
        self
    }

    /// Use `token` for authentication.
    #[must_use]
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Point at a different API root, e.g. a GitHub Enterprise host or a
    /// mock server.
    #[must_use]
    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into();
        self
    }

    /// The issues list path relative to the API root.
    pub fn issues_path(&self) -> String {
        format!("/repos/{}/{}/issues", self.owner, self.repo)
    }
}

impl std::fmt::Debug for GitHubConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GitHubConfig")
            .field("api_base", &self.api_base)
            .field("owner", &self.owner)
            .field("repo", &self.repo)
            .field("has_token", &self.token.is_some())
            .field("user_agent", &self.user_agent)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}
