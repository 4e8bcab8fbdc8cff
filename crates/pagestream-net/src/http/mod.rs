//! HTTP client for pagestream.
//!
//! A small GET-only layer over `reqwest`: a configurable [`HttpClient`], a
//! [`HttpResponse`] wrapper, and a [`RestApiClient`] that adds a base URL,
//! default headers and credentials.
//!
//! # Example
//!
//! ```ignore
//! use pagestream_net::http::{RateLimitInfo, RestApiClient};
//!
//! let client = RestApiClient::builder("https://api.github.com").build()?;
//! let response = client.get("/repos/facebook/react/issues").query("page", 1).send().await?;
//! let rate = RateLimitInfo::from_response(&response);
//! println!("{:?} requests left", rate.remaining);
//! ```

mod client;
mod request;
mod response;
mod rest_api;

pub use client::{Authentication, HttpClient, HttpClientBuilder, HttpClientConfig};
pub use request::{HttpRequest, HttpRequestBuilder};
pub use response::HttpResponse;
pub use rest_api::{RateLimitInfo, RestApiClient, RestApiClientBuilder, RestApiRequestBuilder};
