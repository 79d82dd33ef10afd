use std::sync::Arc;

use thiserror::Error;

/// Result type used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors returned by the OSIAM client.
///
/// Update builders never fail on their default path; everything that talks to the server or
/// parses its responses returns this error.
#[derive(Error, Debug, Clone)]
#[non_exhaustive]
pub enum Error {
    /// The configured endpoint is not a valid base URL.
    #[error("invalid endpoint configuration")]
    InvalidEndpoint(#[source] url::ParseError),

    /// The resource id is empty.
    #[error("invalid resource id, must not be empty")]
    InvalidId,

    /// The access token (or client credentials) were rejected.
    #[error("unauthorized, access token or client credentials are likely invalid")]
    Unauthorized,

    /// The access token is valid but lacks the scope for the operation.
    #[error("forbidden, access token lacks the required scope")]
    Forbidden,

    /// The requested resource does not exist.
    #[error("no resource found")]
    NoResult,

    /// The server refused the request because it conflicts with an existing resource.
    #[error("conflict: {0}")]
    Conflict(String),

    /// The server rejected the request payload.
    #[error("bad request: {0}")]
    BadRequest(String),

    /// The server answered with a status the client does not handle.
    #[error("unexpected response status {status}: {message}")]
    UnexpectedStatus {
        /// HTTP status code.
        status: u16,
        /// Error description taken from the response body.
        message: String,
    },

    /// A strictly built update document both sets and deletes the same value.
    #[error("conflicting update: {0}")]
    ConflictingUpdate(String),

    /// Network error.
    #[error(transparent)]
    // reqwest::Error is not clonable, so we're wrapping it in an Arc.
    Network(Arc<reqwest::Error>),

    /// The response body could not be parsed.
    #[error("error parsing response body")]
    Deserialize(#[source] Arc<serde_json::Error>),

    /// The request body could not be serialized.
    #[error("error serializing request body")]
    Serialize(#[source] Arc<serde_json::Error>),
}

impl From<reqwest::Error> for Error {
    fn from(value: reqwest::Error) -> Self {
        Error::Network(Arc::new(value.without_url()))
    }
}
