//! Backend trait definition

use async_trait::async_trait;
use serde_json::Value;

use crate::types::{ToolName, ToolRequest};

use super::error::BackendResult;

/// Successful output of a backend call
#[derive(Debug, Clone, PartialEq)]
pub enum ToolOutput {
    /// Returned to the caller verbatim
    Text(String),
    /// Rendered as pretty-printed JSON
    Json(Value),
}

impl ToolOutput {
    /// The text placed in the result envelope
    pub fn render(&self) -> String {
        match self {
            ToolOutput::Text(text) => text.clone(),
            ToolOutput::Json(value) => format!("{:#}", value),
        }
    }
}

/// A side-effecting handler for one or more tools
///
/// The dispatch engine routes each parsed `ToolRequest` to the backend that
/// declared its tool in `capabilities()`.
#[async_trait]
pub trait Backend: Send + Sync {
    /// Short name used in logs
    fn name(&self) -> &str;

    /// Tools this backend handles
    fn capabilities(&self) -> &'static [ToolName];

    /// Execute a request for one of `capabilities()`
    async fn call(&self, request: ToolRequest) -> BackendResult<ToolOutput>;

    /// Called once at shutdown, before the engine drops its backends
    ///
    /// Network clients are released on drop, not here; implementations
    /// that own nothing needing explicit teardown may only log.
    async fn close(&self) {}
}
