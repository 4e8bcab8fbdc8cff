//! Networking for pagestream.
//!
//! - [`http`]: a GET-only HTTP client over `reqwest` with a REST helper that
//!   handles base URLs, default headers, credentials and rate-limit headers
//! - [`github`]: the GitHub issues [`PageSource`](pagestream_core::PageSource)
//!
//! Failures surface as [`NetworkError`] and convert into
//! [`FetchError`](pagestream_core::FetchError) at the page source boundary.

mod error;
pub mod github;
pub mod http;

pub use error::{NetworkError, Result};
pub use github::{GitHubConfig, GitHubIssue, GitHubIssueSource};
