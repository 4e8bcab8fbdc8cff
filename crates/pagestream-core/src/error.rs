//! Error types for the list engine.

use thiserror::Error;

use crate::query::QueryGeneration;

/// A failure reported by a page source.
///
/// Stored inside [`FetchState::Failed`](crate::FetchState::Failed) and
/// carried through signals, so it must stay cheap to clone.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    /// The source could not be reached (DNS, connect, TLS, timeout).
    #[error("network error: {0}")]
    Network(String),

    /// The source answered with a non-success status.
    #[error("HTTP {status}: {message}")]
    Http {
        /// The HTTP status code.
        status: u16,
        /// The response body or reason phrase.
        message: String,
    },

    /// The source answered but the payload could not be decoded.
    #[error("invalid page payload: {0}")]
    Decode(String),

    /// The source refused the request because its quota is spent.
    #[error("rate limited by page source{}", retry_hint(.retry_after_secs))]
    RateLimited {
        /// Seconds until the quota resets, when the source says.
        retry_after_secs: Option<u64>,
    },

    /// Any other source-specific failure.
    #[error("{0}")]
    Other(String),
}

impl FetchError {
    /// Create an [`FetchError::Other`] from any displayable message.
    pub fn other(message: impl Into<String>) -> Self {
        Self::Other(message.into())
    }
}

fn retry_hint(retry_after_secs: &Option<u64>) -> String {
    match retry_after_secs {
        Some(secs) => format!(" (retry in {secs}s)"),
        None => String::new(),
    }
}

/// A viewport that violates the window calculator's preconditions.
///
/// The calculator clamps the input and logs this error; it is never returned
/// to callers.
#[derive(Error, Debug, Clone, Copy, PartialEq)]
pub enum ViewportError {
    /// The scroll offset was negative.
    #[error("scroll offset must be non-negative, got {0}")]
    NegativeScrollOffset(f64),

    /// The viewport height was zero, negative or not a number.
    #[error("viewport height must be positive, got {0}")]
    NonPositiveHeight(f64),
}

/// A fetch that resolved after the query configuration it was issued for was
/// replaced.
///
/// Its records are dropped instead of being appended to the new store.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("discarded page {page} fetched for query generation {issued_for}, current generation is {current}")]
pub struct StaleFetch {
    /// The page number the stale ticket requested.
    pub page: u32,
    /// The generation captured when the fetch began.
    pub issued_for: QueryGeneration,
    /// The generation active when the fetch resolved.
    pub current: QueryGeneration,
}

/// A specialized Result type for page fetches.
pub type FetchResult<T> = std::result::Result<T, FetchError>;
