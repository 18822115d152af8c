//! Error types for configuration and backend transport.

/// Errors produced while building [`crate::config::ClientConfig`].
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The current page URL could not be parsed or has no host.
    #[error("invalid page URL {url:?}: {reason}")]
    InvalidPageUrl { url: String, reason: String },

    /// A numeric variable held something other than an unsigned integer.
    #[error("invalid value for {var}: {value:?}")]
    InvalidNumber { var: &'static str, value: String },
}

/// Errors produced by [`crate::transport::ApiTransport`] calls.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// The HTTP request could not be sent or its body could not be read.
    #[error("http request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The response body was not valid JSON.
    #[error("invalid JSON payload: {0}")]
    InvalidJson(#[from] serde_json::Error),

    /// A request URL could not be built from the base URL and path.
    #[error("invalid request URL: {0}")]
    InvalidUrl(String),

    /// The underlying HTTP client could not be constructed.
    #[error("HTTP client build failed: {0}")]
    HttpClientBuild(String),
}
