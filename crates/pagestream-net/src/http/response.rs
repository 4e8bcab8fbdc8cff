//! HTTP response types.

use serde::de::DeserializeOwned;

use crate::error::{NetworkError, Result};

/// An HTTP response from a request.
pub struct HttpResponse {
    inner: reqwest::Response,
}

impl HttpResponse {
    pub(crate) fn from_reqwest(response: reqwest::Response) -> Self {
        Self { inner: response }
    }

    /// Get the HTTP status code.
    pub fn status(&self) -> u16 {
        self.inner.status().as_u16()
    }

    /// The canonical reason phrase for the status, if there is one.
    pub fn reason(&self) -> Option<&'static str> {
        self.inner.status().canonical_reason()
    }

    /// Check if the response indicates success (2xx status).
    pub fn is_success(&self) -> bool {
        self.inner.status().is_success()
    }

    /// Get the response headers.
    pub fn headers(&self) -> &http::HeaderMap {
        self.inner.headers()
    }

    /// Get a specific header value.
    pub fn header(&self, name: impl AsRef<str>) -> Option<&str> {
        self.inner
            .headers()
            .get(name.as_ref())
            .and_then(|v| v.to_str().ok())
    }

    /// Get the final URL after redirects.
    pub fn url(&self) -> &str {
        self.inner.url().as_str()
    }

    /// Get the response body as text.
    pub async fn text(self) -> Result<String> {
        Ok(self.inner.text().await?)
    }

    /// Parse the response body as JSON.
    ///
    /// The body is read in full first so decode errors carry serde's message
    /// with line and column.
    pub async fn json<T: DeserializeOwned>(self) -> Result<T> {
        let body = self.inner.bytes().await?;
        Ok(serde_json::from_slice(&body)?)
    }

    /// Check if the status code indicates success, consuming the body for the error message.
    pub async fn error_for_status_with_body(self) -> Result<Self> {
        let status = self.status();
        if self.is_success() {
            Ok(self)
        } else {
            let message = self.text().await.ok().filter(|body| !body.is_empty());
            Err(NetworkError::HttpStatus { status, message })
        }
    }
}

impl std::fmt::Debug for HttpResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpResponse")
            .field("status", &self.status())
            .field("url", &self.url())
            .finish()
    }
}
