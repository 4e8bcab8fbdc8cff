//! GitHub issues as a page source.
//!
//! [`GitHubIssueSource`] implements [`PageSource`](pagestream_core::PageSource)
//! over the repository issues endpoint. Pull requests come back from the same
//! endpoint and are marked secondary so the list drops them.

mod config;
mod issue;
mod source;

pub use config::{DEFAULT_TOKEN_ENV, GitHubConfig};
pub use issue::{GitHubIssue, IssueLabel, IssueUser, PullRequestRef};
pub use source::{GITHUB_V3_MEDIA_TYPE, GitHubIssueSource};
