//! Issue records as returned by the GitHub REST API.

use pagestream_core::{IssueState, Record};
use serde::{Deserialize, Serialize};

/// One entry of `GET /repos/{owner}/{repo}/issues`.
///
/// The endpoint also returns pull requests; those carry a `pull_request`
/// object and are dropped by the item store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GitHubIssue {
    /// Global identifier, used for dedup.
    pub id: u64,
    /// Per-repository issue number.
    pub number: u64,
    /// Issue title.
    pub title: String,
    /// Markdown body, absent when the issue has none.
    #[serde(default)]
    pub body: Option<String>,
    /// Open or closed.
    pub state: IssueState,
    /// Link to the issue on github.com.
    #[serde(default)]
    pub html_url: String,
    /// ISO 8601 timestamp, kept as sent.
    pub created_at: String,
    /// ISO 8601 timestamp of the last update.
    pub updated_at: String,
    /// Number of comments.
    #[serde(default)]
    pub comments: u32,
    /// Issue author.
    pub user: IssueUser,
    /// Attached labels, in the order GitHub returns them.
    #[serde(default)]
    pub labels: Vec<IssueLabel>,
    /// Present when the entry is a pull request.
    #[serde(default)]
    pub pull_request: Option<PullRequestRef>,
}

/// Issue author.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssueUser {
    /// GitHub username.
    pub login: String,
    /// Avatar image URL.
    #[serde(default)]
    pub avatar_url: String,
}

/// A label attached to an issue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssueLabel {
    pub id: u64,
    pub name: String,
    /// Hex color without the leading `#`.
    #[serde(default)]
    pub color: String,
}

/// Marker present on entries that are pull requests.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PullRequestRef {
    /// API URL of the pull request.
    #[serde(default)]
    pub url: String,
}

impl GitHubIssue {
    /// Whether this entry is a pull request rather than an issue.
    pub fn is_pull_request(&self) -> bool {
        self.pull_request.is_some()
    }
}

impl Record for GitHubIssue {
    type Id = u64;

    fn id(&self) -> u64 {
        self.id
    }

    fn is_secondary(&self) -> bool {
        self.is_pull_request()
    }
}
