//! Gateway error types

use thiserror::Error;

/// Errors that can occur while talking to the local inference server
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GatewayError {
    /// Connection refused or host unreachable
    #[error("Cannot connect to LM Studio at {url}. Make sure LM Studio is running with the local server enabled.")]
    Unreachable { url: String },

    /// Non-2xx response
    #[error("LM Studio API error: {status}")]
    HttpError { status: u16 },

    /// Request exceeded the configured timeout
    #[error("Request to LM Studio at {url} timed out")]
    Timeout { url: String },

    /// The model list is empty and no model was requested
    #[error("No models available in LM Studio")]
    NoModelsAvailable,

    /// Body could not be decoded
    #[error("Invalid response from LM Studio: {0}")]
    InvalidResponse(String),

    /// HTTP client could not be constructed
    #[error("Failed to create HTTP client: {0}")]
    Client(String),
}

pub type GatewayResult<T> = Result<T, GatewayError>;

impl GatewayError {
    /// Classify a transport failure
    pub fn from_transport(error: &reqwest::Error, base_url: &str) -> Self {
        if error.is_timeout() {
            GatewayError::Timeout {
                url: base_url.to_string(),
            }
        } else if let Some(status) = error.status() {
            GatewayError::HttpError {
                status: status.as_u16(),
            }
        } else if error.is_decode() {
            GatewayError::InvalidResponse(error.to_string())
        } else {
            GatewayError::Unreachable {
                url: base_url.to_string(),
            }
        }
    }
}
