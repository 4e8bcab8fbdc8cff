//! The GitHub issues page source.

use std::time::Duration;

use pagestream_core::{FetchResult, PageRequest, PageSource};
use serde::Deserialize;

use super::config::GitHubConfig;
use super::issue::GitHubIssue;
use crate::error::{NetworkError, Result};
use crate::http::{Authentication, HttpClient, RateLimitInfo, RestApiClient};

const TARGET: &str = "pagestream_net::github";

/// Media type for the v3 REST API.
pub const GITHUB_V3_MEDIA_TYPE: &str = "application/vnd.github.v3+json";

/// Remaining-request count at or below which every page logs a warning.
const LOW_RATE_LIMIT: u64 = 10;

/// Error body GitHub sends with 4xx responses.
#[derive(Deserialize)]
struct ApiErrorBody {
    message: String,
}

/// Serves pages of `GET /repos/{owner}/{repo}/issues`.
///
/// The query's state, labels, sort and direction map onto the endpoint's
/// parameters of the same names; the page number and size onto `page` and
/// `per_page`.
///
/// # Example
///
/// ```ignore
/// use pagestream_net::github::{GitHubConfig, GitHubIssueSource};
///
/// let source = GitHubIssueSource::new(GitHubConfig::from_env())?;
/// ```
#[derive(Debug, Clone)]
pub struct GitHubIssueSource {
    client: RestApiClient,
    issues_path: String,
}

impl GitHubIssueSource {
    /// Build a source and its HTTP client from `config`.
    pub fn new(config: GitHubConfig) -> Result<Self> {
        let mut http = HttpClient::builder().timeout(Duration::from_secs(config.timeout_secs));
        if let Some(user_agent) = &config.user_agent {
            http = http.user_agent(user_agent.clone());
        }

        let client = RestApiClient::builder(config.api_base.clone())
            .http_client(http.build()?)
            .accept(GITHUB_V3_MEDIA_TYPE)
            .auth(config.token.clone().map(Authentication::Token))
            .build()?;

        Ok(Self::with_client(client, &config))
    }

    /// Use an already configured REST client for `config`'s repository.
    pub fn with_client(client: RestApiClient, config: &GitHubConfig) -> Self {
        if !client.has_auth() {
            tracing::warn!(
                target: TARGET,
                owner = %config.owner,
                repo = %config.repo,
                "no GitHub token configured; unauthenticated requests are limited to 60 per hour"
            );
        }
        Self {
            client,
            issues_path: config.issues_path(),
        }
    }

    /// The REST client requests go through.
    pub fn client(&self) -> &RestApiClient {
        &self.client
    }

    /// Fetch one page of issues, pull requests included.
    pub async fn fetch_issues(&self, request: &PageRequest) -> Result<Vec<GitHubIssue>> {
        let query = &request.query;
        let response = self
            .client
            .get(&self.issues_path)
            .query("state", query.state)
            .query_opt("labels", query.labels_param())
            .query("sort", query.sort)
            .query("direction", query.direction)
            .query("per_page", request.page_size)
            .query("page", request.page)
            .send()
            .await?;

        let rate = RateLimitInfo::from_response(&response);

        if !response.is_success() {
            let status = response.status();
            if matches!(status, 403 | 429) && rate.is_rate_limited() {
                tracing::warn!(
                    target: TARGET,
                    status,
                    reset = ?rate.reset_timestamp,
                    "GitHub rate limit exhausted"
                );
                return Err(NetworkError::RateLimited {
                    retry_after: rate.wait_duration(),
                });
            }

            let reason = response.reason().unwrap_or_default();
            let body = response.text().await.unwrap_or_default();
            tracing::error!(
                target: TARGET,
                status,
                reason,
                body = %body,
                page = request.page,
                "GitHub API error"
            );
            return Err(NetworkError::HttpStatus {
                status,
                message: error_message(&body),
            });
        }

        if let Some(remaining) = rate.remaining {
            tracing::debug!(target: TARGET, remaining, limit = ?rate.limit, "rate limit");
            if remaining <= LOW_RATE_LIMIT {
                tracing::warn!(target: TARGET, remaining, "GitHub rate limit nearly spent");
            }
        }

        let issues: Vec<GitHubIssue> = response.json().await?;
        tracing::debug!(
            target: TARGET,
            page = request.page,
            received = issues.len(),
            "fetched issues"
        );
        Ok(issues)
    }
}

/// GitHub's `message` field when the body is its JSON error shape, the raw
/// body otherwise.
fn error_message(body: &str) -> Option<String> {
    if body.trim().is_empty() {
        return None;
    }
    match serde_json::from_str::<ApiErrorBody>(body) {
        Ok(parsed) => Some(parsed.message),
        Err(_) => Some(body.to_string()),
    }
}

impl PageSource for GitHubIssueSource {
    type Record = GitHubIssue;

    async fn fetch_page(&self, request: PageRequest) -> FetchResult<Vec<GitHubIssue>> {
        Ok(self.fetch_issues(&request).await?)
    }
}
