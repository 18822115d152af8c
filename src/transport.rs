//! Credentialed JSON-over-HTTP transport.
//!
//! DESIGN
//! ======
//! `ApiTransport` is the seam between the session gate / form submitters and
//! the network. `HttpTransport` wraps a `reqwest::Client` with a shared cookie
//! jar so every request carries the session cookie, the way a browser sends
//! `credentials: "include"` requests.
//!
//! Non-2xx statuses are not errors here: the backend answers rejected logins
//! with a JSON body on 401/400, and callers need that body.

use std::sync::Arc;
use std::time::Duration;

use reqwest::Url;
use reqwest::cookie::{CookieStore, Jar};
use serde_json::Value;

use crate::config::Timeouts;
use crate::error::ClientError;

/// Status and decoded JSON body of a backend response.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    pub status: u16,
    pub body: Value,
}

impl ApiResponse {
    #[must_use]
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Credentialed JSON requests against the backend.
#[async_trait::async_trait]
pub trait ApiTransport: Send + Sync {
    /// Issue a `GET` and decode the JSON body.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the body is not JSON.
    async fn get_json(&self, url: &Url) -> Result<ApiResponse, ClientError>;

    /// Issue a `POST` with a JSON body and decode the JSON response.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the body is not JSON.
    async fn post_json(&self, url: &Url, body: &Value) -> Result<ApiResponse, ClientError>;
}

// =============================================================================
// HTTP TRANSPORT
// =============================================================================

pub struct HttpTransport {
    http: reqwest::Client,
    jar: Arc<Jar>,
}

impl HttpTransport {
    /// Build a transport with an empty cookie jar.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be constructed.
    pub fn new(timeouts: Timeouts) -> Result<Self, ClientError> {
        let jar = Arc::new(Jar::default());
        let http = reqwest::Client::builder()
            .cookie_provider(Arc::clone(&jar))
            .timeout(Duration::from_secs(timeouts.request_secs))
            .connect_timeout(Duration::from_secs(timeouts.connect_secs))
            .build()
            .map_err(|e| ClientError::HttpClientBuild(e.to_string()))?;
        Ok(Self { http, jar })
    }

    /// Seed the jar with a `name=value` session cookie scoped to `url`.
    #[must_use]
    pub fn with_session_cookie(self, url: &Url, cookie: &str) -> Self {
        self.jar.add_cookie_str(cookie, url);
        self
    }

    /// Cookies the jar would send to `url`, as a `Cookie` header value.
    #[must_use]
    pub fn session_cookies(&self, url: &Url) -> Option<String> {
        self.jar
            .cookies(url)
            .and_then(|value| value.to_str().ok().map(ToOwned::to_owned))
    }

    async fn decode(response: reqwest::Response) -> Result<ApiResponse, ClientError> {
        let status = response.status().as_u16();
        let text = response.text().await?;
        let body = serde_json::from_str::<Value>(&text)?;
        Ok(ApiResponse { status, body })
    }
}

#[async_trait::async_trait]
impl ApiTransport for HttpTransport {
    async fn get_json(&self, url: &Url) -> Result<ApiResponse, ClientError> {
        tracing::debug!(%url, "GET");
        let response = self.http.get(url.clone()).send().await?;
        Self::decode(response).await
    }

    async fn post_json(&self, url: &Url, body: &Value) -> Result<ApiResponse, ClientError> {
        tracing::debug!(%url, "POST");
        let response = self.http.post(url.clone()).json(body).send().await?;
        Self::decode(response).await
    }
}

#[cfg(test)]
#[path = "transport_test.rs"]
mod tests;
