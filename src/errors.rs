//! Error types for the API client.

/// Errors that can occur when talking to the enterprise-subsidy service.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// A required configuration value is missing or empty.
    #[error("missing configuration: {0}")]
    Config(String),
    /// Fetching an access token from the OAuth2 provider failed.
    #[error("authentication failed: {0}")]
    Auth(String),
    /// A URL could not be constructed from the configured base URL.
    #[error("invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
    /// The HTTP request could not be sent or the response body read.
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),
    /// The response body was not valid JSON for the expected type.
    #[error("failed to decode response body: {0}")]
    Decode(#[from] serde_json::Error),
    /// The service returned a non-success status. Carries the original
    /// response body unchanged; callers interpret the status code
    /// (403 auth failure, 422 business-rule rejection, 429 retry-later, ...).
    #[error("request failed with status {status}")]
    HttpStatus { status: u16, body: String },
    /// The operation is not supported by the targeted API version.
    #[error("not supported by this client: {0}")]
    Unsupported(&'static str),
    /// The requested client version does not exist.
    #[error("{0} is not a valid client version")]
    UnsupportedVersion(u8),
}
