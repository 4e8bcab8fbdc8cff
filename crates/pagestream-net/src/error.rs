//! Error types for the networking module.

use std::fmt;
use std::time::Duration;

use pagestream_core::FetchError;

/// Network-specific errors.
#[derive(Debug, Clone)]
pub enum NetworkError {
    /// HTTP request failed.
    Request(String),
    /// Invalid URL provided.
    InvalidUrl(String),
    /// Request timed out.
    Timeout,
    /// Connection refused or failed.
    Connection(String),
    /// Invalid header name or value.
    InvalidHeader(String),
    /// JSON deserialization error.
    Json(String),
    /// HTTP error status (4xx or 5xx).
    HttpStatus {
        /// The HTTP status code.
        status: u16,
        /// Optional error message from the response body.
        message: Option<String>,
    },
    /// The server refused the request because the rate limit is spent.
    RateLimited {
        /// How long until the limit resets, if the server said.
        retry_after: Option<Duration>,
    },
    /// Redirect limit exceeded.
    TooManyRedirects,
}

impl fmt::Display for NetworkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Request(msg) => write!(f, "HTTP request error: {msg}"),
            Self::InvalidUrl(msg) => write!(f, "Invalid URL: {msg}"),
            Self::Timeout => write!(f, "Request timed out"),
            Self::Connection(msg) => write!(f, "Connection error: {msg}"),
            Self::InvalidHeader(msg) => write!(f, "Invalid header: {msg}"),
            Self::Json(msg) => write!(f, "JSON error: {msg}"),
            Self::HttpStatus { status, message } => {
                if let Some(msg) = message {
                    write!(f, "HTTP {status}: {msg}")
                } else {
                    write!(f, "HTTP {status}")
                }
            }
            Self::RateLimited { retry_after } => match retry_after {
                Some(wait) => write!(f, "Rate limited, retry in {}s", wait.as_secs()),
                None => write!(f, "Rate limited"),
            },
            Self::TooManyRedirects => write!(f, "Too many redirects"),
        }
    }
}

impl std::error::Error for NetworkError {}

impl From<reqwest::Error> for NetworkError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout
        } else if err.is_connect() {
            Self::Connection(err.to_string())
        } else if err.is_redirect() {
            Self::TooManyRedirects
        } else if err.is_decode() {
            Self::Json(err.to_string())
        } else {
            Self::Request(err.to_string())
        }
    }
}

impl From<url::ParseError> for NetworkError {
    fn from(err: url::ParseError) -> Self {
        Self::InvalidUrl(err.to_string())
    }
}

impl From<serde_json::Error> for NetworkError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err.to_string())
    }
}

impl From<http::header::InvalidHeaderName> for NetworkError {
    fn from(err: http::header::InvalidHeaderName) -> Self {
        Self::InvalidHeader(err.to_string())
    }
}

impl From<http::header::InvalidHeaderValue> for NetworkError {
    fn from(err: http::header::InvalidHeaderValue) -> Self {
        Self::InvalidHeader(err.to_string())
    }
}

impl From<NetworkError> for FetchError {
    fn from(err: NetworkError) -> Self {
        match err {
            NetworkError::Timeout
            | NetworkError::Connection(_)
            | NetworkError::Request(_)
            | NetworkError::TooManyRedirects => FetchError::Network(err.to_string()),
            NetworkError::HttpStatus { status, message } => FetchError::Http {
                status,
                message: message.unwrap_or_default(),
            },
            NetworkError::RateLimited { retry_after } => FetchError::RateLimited {
                retry_after_secs: retry_after.map(|wait| wait.as_secs()),
            },
            NetworkError::Json(msg) => FetchError::Decode(msg),
            NetworkError::InvalidUrl(_) | NetworkError::InvalidHeader(_) => {
                FetchError::Other(err.to_string())
            }
        }
    }
}

/// A specialized Result type for network operations.
pub type Result<T> = std::result::Result<T, NetworkError>;
