//! Backend error types

use thiserror::Error;

use crate::gateway::GatewayError;
use crate::types::ToolName;

/// Errors raised while executing a tool
#[derive(Error, Debug)]
pub enum BackendError {
    /// Path resolves outside the backend's root
    #[error("Path outside allowed directory: {0}")]
    PathEscape(String),

    #[error("File not found: {0}")]
    FileNotFound(String),

    #[error("Directory not found: {0}")]
    DirectoryNotFound(String),

    #[error("Path is not a directory: {0}")]
    NotADirectory(String),

    /// `process_data` payload is not valid JSON
    #[error("Invalid JSON data: {0}")]
    InvalidPayload(String),

    /// Filter condition does not match `field OP literal`
    #[error("Invalid filter condition: {0}")]
    InvalidCondition(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Request to {url} timed out")]
    UpstreamTimeout { url: String },

    #[error("Request failed: {message}")]
    UpstreamUnreachable { message: String },

    #[error("Failed to create HTTP client: {0}")]
    Client(String),

    #[error(transparent)]
    Gateway(#[from] GatewayError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Routed a request the backend does not declare
    #[error("{backend} backend does not handle {tool}")]
    Unsupported { backend: String, tool: ToolName },
}

pub type BackendResult<T> = Result<T, BackendError>;

impl BackendError {
    pub fn unsupported(backend: impl Into<String>, tool: ToolName) -> Self {
        Self::Unsupported {
            backend: backend.into(),
            tool,
        }
    }

    /// Classify a failed outbound request to `url`
    pub fn from_upstream(error: &reqwest::Error, url: &str) -> Self {
        if error.is_timeout() {
            Self::UpstreamTimeout { url: url.to_string() }
        } else {
            Self::UpstreamUnreachable {
                message: error.to_string(),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gateway_errors_keep_their_message() {
        let err: BackendError = GatewayError::NoModelsAvailable.into();
        assert_eq!(err.to_string(), "No models available in LM Studio");
    }

    #[test]
    fn test_messages() {
        assert_eq!(
            BackendError::PathEscape("../../etc/passwd".into()).to_string(),
            "Path outside allowed directory: ../../etc/passwd"
        );
        assert_eq!(
            BackendError::UpstreamTimeout {
                url: "http://slow".into()
            }
            .to_string(),
            "Request to http://slow timed out"
        );
        assert_eq!(
            BackendError::unsupported("file", ToolName::CallApi).to_string(),
            "file backend does not handle call_api"
        );
    }
}
