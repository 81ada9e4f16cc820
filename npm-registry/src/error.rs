use thiserror::Error;

use crate::schema::SchemaError;

/// Errors that can occur when talking to the npm services
#[derive(Error, Debug)]
pub enum NpmError {
    /// Non-2xx response from a downstream service
    #[error("HTTP {status} {status_text} from {url}")]
    UpstreamHttp {
        status: u16,
        status_text: String,
        url: String,
    },

    /// Decoded JSON does not match the declared shape
    #[error("Invalid response: {0}")]
    SchemaValidation(#[from] SchemaError),

    /// Every candidate location was tried and none served the resource
    #[error("{message}")]
    ResourceNotFound { message: String },

    /// Transport-level failure: DNS, refused connection, timeout, bad body
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Caller supplied an argument the operation cannot use
    #[error("Invalid argument: {message}")]
    InvalidArgument { message: String },

    /// Invalid URL error
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

impl NpmError {
    /// Create an upstream HTTP error from a response status
    pub fn upstream(status: reqwest::StatusCode, url: impl Into<String>) -> Self {
        Self::UpstreamHttp {
            status: status.as_u16(),
            status_text: status.canonical_reason().unwrap_or("Unknown").to_owned(),
            url: url.into(),
        }
    }

    /// Create a new resource not found error
    pub fn resource_not_found<S: Into<String>>(message: S) -> Self {
        Self::ResourceNotFound {
            message: message.into(),
        }
    }

    /// Create a new invalid argument error
    pub fn invalid_argument<S: Into<String>>(message: S) -> Self {
        Self::InvalidArgument {
            message: message.into(),
        }
    }

    /// True for a 404 from upstream
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::UpstreamHttp { status: 404, .. } | Self::ResourceNotFound { .. })
    }
}

/// Type alias for Results using NpmError
pub type Result<T> = std::result::Result<T, NpmError>;
