//! MCP (Model Context Protocol) server module
//!
//! Uses the official rmcp SDK for the transport and session protocol.
//!
//! # Example
//!
//! ```rust,ignore
//! use toolhost_core::dispatch::build_engine;
//! use toolhost_core::mcp::ToolHostService;
//!
//! let engine = Arc::new(build_engine(&config, logger.clone())?);
//! ToolHostService::new(engine.clone(), logger).serve_stdio().await?;
//! engine.shutdown().await;
//! ```

mod server;

pub use server::{envelope_to_result, McpError, McpResult, ToolHostService};
