//! HTTP request types and builder.

use std::time::Duration;

use super::client::{Authentication, HttpClient};
use super::response::HttpResponse;
use crate::error::Result;

/// A built GET request ready to be sent.
#[derive(Debug, Clone)]
pub struct HttpRequest {
    /// The request URL, without query string.
    pub url: String,
    /// Request headers.
    pub headers: http::HeaderMap,
    /// Query parameters, in insertion order.
    pub query: Vec<(String, String)>,
    /// Request timeout override.
    pub timeout: Option<Duration>,
    /// Authentication.
    pub auth: Option<Authentication>,
}

impl HttpRequest {
    /// The full URL including the encoded query string.
    pub fn full_url(&self) -> Result<url::Url> {
        let mut url = url::Url::parse(&self.url)?;
        if !self.query.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in &self.query {
                pairs.append_pair(key, value);
            }
        }
        Ok(url)
    }
}

/// Builder for constructing HTTP requests.
pub struct HttpRequestBuilder {
    client: HttpClient,
    request: HttpRequest,
}

impl HttpRequestBuilder {
    pub(crate) fn new(client: HttpClient, url: String) -> Self {
        Self {
            client,
            request: HttpRequest {
                url,
                headers: http::HeaderMap::new(),
                query: Vec::new(),
                timeout: None,
                auth: None,
            },
        }
    }

    /// Add a header to the request. Invalid names or values are ignored.
    pub fn header(
        mut self,
        name: impl TryInto<http::HeaderName>,
        value: impl TryInto<http::HeaderValue>,
    ) -> Self {
        if let (Ok(name), Ok(value)) = (name.try_into(), value.try_into()) {
            self.request.headers.insert(name, value);
        }
        self
    }

    /// Add a query parameter.
    pub fn query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.request.query.push((key.into(), value.into()));
        self
    }

    /// Set a timeout for this specific request.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.request.timeout = Some(timeout);
        self
    }

    /// Build the request without sending it.
    pub fn build(self) -> HttpRequest {
        self.request
    }

    /// Send the request and wait for the response.
    pub async fn send(self) -> Result<HttpResponse> {
        send_request(&self.client, self.request).await
    }
}

/// Send a built request on `client`.
pub(crate) async fn send_request(
    client: &HttpClient,
    request: HttpRequest,
) -> Result<HttpResponse> {
    let url = request.full_url()?;
    tracing::debug!(target: "pagestream_net::http", %url, "GET");

    let mut req_builder = client.reqwest_client().get(url);

    for (name, value) in request.headers.iter() {
        req_builder = req_builder.header(name, value);
    }
    if let Some(auth) = &request.auth {
        req_builder = req_builder.header(http::header::AUTHORIZATION, auth.header_value());
    }
    if let Some(timeout) = request.timeout {
        req_builder = req_builder.timeout(timeout);
    }

    let response = req_builder.send().await?;
    Ok(HttpResponse::from_reqwest(response))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_url_encodes_query() {
        let client = HttpClient::builder().build().expect("Failed to build client");
        let request = client
            .get("https://api.github.com/repos/facebook/react/issues")
            .query("labels", "Type: Bug,Status: Unconfirmed")
            .query("page", "2")
            .build();

        let url = request.full_url().expect("valid url");
        assert_eq!(url.path(), "/repos/facebook/react/issues");
        let pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();
        assert_eq!(
            pairs,
            vec![
                ("labels".to_string(), "Type: Bug,Status: Unconfirmed".to_string()),
                ("page".to_string(), "2".to_string()),
            ]
        );
    }

    #[test]
    fn test_invalid_url() {
        let client = HttpClient::builder().build().expect("Failed to build client");
        let request = client.get("not a url").build();
        assert!(request.full_url().is_err());
    }
}
