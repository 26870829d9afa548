//! Dispatch error types

use thiserror::Error;

use crate::backends::BackendError;
use crate::types::ToolName;

/// Errors surfaced by the dispatch engine
///
/// Per-call errors are rendered into an error envelope by `invoke`; only the
/// startup variants (`MissingHandler`, `DuplicateHandler`) escape as `Err`.
#[derive(Error, Debug)]
pub enum DispatchError {
    #[error("Unknown tool: {0}")]
    UnknownCapability(String),

    #[error("Missing required fields for {tool}: {}", .missing_fields.join(", "))]
    ValidationFailed {
        tool: String,
        missing_fields: Vec<String>,
    },

    #[error("Invalid arguments for {tool}: {message}")]
    InvalidArguments { tool: String, message: String },

    #[error(transparent)]
    Backend(#[from] BackendError),

    #[error("No handler registered for enabled tool {0}")]
    MissingHandler(ToolName),

    #[error("Tool {tool} has two handlers: {first} and {second}")]
    DuplicateHandler {
        tool: ToolName,
        first: String,
        second: String,
    },

    #[error("Resources are not enabled")]
    ResourcesDisabled,

    #[error("Unsupported resource URI: {0}")]
    UnsupportedResource(String),

    /// A backend panicked; details go to the log, not the caller
    #[error("Internal error while executing {0}")]
    Internal(String),
}

pub type DispatchResult<T> = Result<T, DispatchError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages() {
        assert_eq!(
            DispatchError::UnknownCapability("calculate".into()).to_string(),
            "Unknown tool: calculate"
        );
        assert_eq!(
            DispatchError::ValidationFailed {
                tool: "write_file".into(),
                missing_fields: vec!["path".into(), "content".into()],
            }
            .to_string(),
            "Missing required fields for write_file: path, content"
        );
        assert_eq!(
            DispatchError::Backend(BackendError::FileNotFound("a.txt".into())).to_string(),
            "File not found: a.txt"
        );
    }
}
