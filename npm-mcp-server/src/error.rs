use npm_registry::NpmError;
use thiserror::Error;

/// Protocol-level failures. Upstream failures inside a tool or resource never
/// reach this type; they are reported in-band as error-flagged results.
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("invalid request: {0}")]
    InvalidRequest(String),
    #[error("unknown method: {0}")]
    InvalidMethod(String),
    #[error("invalid parameters: {0}")]
    InvalidParams(String),
    #[error("parse error: {0}")]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Npm(#[from] NpmError),
    #[error("configuration error: {0}")]
    Config(String),
    #[error("serialization error: {0}")]
    Serialization(serde_json::Error),
}

impl ServerError {
    /// JSON-RPC error code.
    pub fn code(&self) -> i32 {
        match self {
            ServerError::InvalidRequest(_) => -32600,
            ServerError::InvalidMethod(_) => -32601,
            ServerError::InvalidParams(_) => -32602,
            ServerError::Json(_) => -32700,
            ServerError::Io(_) => -32020,
            ServerError::Npm(_) => -32010,
            ServerError::Config(_) => -32011,
            ServerError::Serialization(_) => -32603,
        }
    }
}

pub type ServerResult<T> = Result<T, ServerError>;
