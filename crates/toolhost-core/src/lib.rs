//! Toolhost Core
//!
//! Capability registry, dispatch engine and tool backends for an MCP tool host.
//! The server binary only wires configuration, logging and the stdio transport;
//! everything else lives here and can be embedded in other hosts.
//!
//! ## Layout
//!
//! - `registry`: static tool catalog filtered by configuration
//! - `dispatch`: validation, routing and error wrapping for every call
//! - `backends`: file, HTTP proxy, data transform and inference handlers
//! - `gateway`: client for a local OpenAI-compatible LM Studio server
//! - `mcp`: rmcp `ServerHandler` over the dispatch engine
//!
//! ```rust,ignore
//! use toolhost_core::{build_engine, ServerConfig, ToolHostService};
//!
//! let engine = Arc::new(build_engine(&config, logger.clone())?);
//! let envelope = engine.invoke("read_file", args).await;
//! ```

pub mod types;
pub mod logging;
pub mod config;
pub mod registry;
pub mod gateway;
pub mod backends;
pub mod dispatch;
pub mod mcp;

#[cfg(test)]
mod test_support;

// Re-export commonly used types
pub use types::{
    CapabilityDescriptor, CapabilityKind, ChatMessage, MessageRole, ResultEnvelope, SchemaNode,
    ToolName, ToolRequest,
};

pub use logging::{ConsoleLogger, LogLevel, Logger, MemoryLogger, NoOpLogger};

pub use config::{ConfigError, EnablementConfig, FileConfigProvider, ServerConfig};

pub use registry::CapabilityRegistry;

pub use gateway::{GatewayError, InferenceGateway};

pub use backends::{Backend, BackendError, ToolOutput};

pub use dispatch::{build_engine, DispatchEngine, DispatchError};

pub use mcp::{McpError, ToolHostService};
