//! MCP server adapter using the official rmcp SDK
//!
//! Binds a `DispatchEngine` to `tools/list`, `tools/call`, `resources/list`
//! and `resources/read`. The engine already turns tool failures into error
//! envelopes, so `call_tool` only fails at the protocol level.

use std::future::Future;
use std::sync::Arc;

use rmcp::model::{
    AnnotateAble, CallToolRequestParams, CallToolResult, Content, ErrorData, Implementation,
    ListResourcesResult, ListToolsResult, PaginatedRequestParams, ProtocolVersion, RawResource,
    ReadResourceRequestParams, ReadResourceResult, Resource, ResourceContents, ServerCapabilities,
    ServerInfo, Tool,
};
use rmcp::service::RequestContext;
use rmcp::{RoleServer, ServerHandler, ServiceExt};
use serde_json::{Map, Value};
use thiserror::Error;

use crate::dispatch::{DispatchEngine, DispatchError};
use crate::logging::Logger;
use crate::types::{CapabilityDescriptor, ResultEnvelope};

/// MCP server errors
#[derive(Error, Debug)]
pub enum McpError {
    #[error("Initialization failed: {0}")]
    InitializationFailed(String),

    #[error("Session ended with error: {0}")]
    Session(String),
}

pub type McpResult<T> = Result<T, McpError>;

/// Exposes a dispatch engine as an MCP server
#[derive(Clone)]
pub struct ToolHostService {
    engine: Arc<DispatchEngine>,
    logger: Arc<dyn Logger>,
}

impl ToolHostService {
    pub fn new(engine: Arc<DispatchEngine>, logger: Arc<dyn Logger>) -> Self {
        Self { engine, logger }
    }

    pub fn engine(&self) -> &DispatchEngine {
        &self.engine
    }

    /// Serve over stdin/stdout until the client disconnects
    pub async fn serve_stdio(self) -> McpResult<()> {
        let logger = self.logger.clone();
        crate::log_info!(logger, "[McpServer] Serving on stdio");

        let running = self
            .serve(rmcp::transport::stdio())
            .await
            .map_err(|e| McpError::InitializationFailed(e.to_string()))?;
        let reason = running
            .waiting()
            .await
            .map_err(|e| McpError::Session(e.to_string()))?;

        crate::log_info!(logger, "[McpServer] Session closed: {:?}", reason);
        Ok(())
    }

    fn tools(&self) -> Vec<Tool> {
        self.engine
            .list_capabilities()
            .iter()
            .filter(|c| c.is_tool())
            .map(to_mcp_tool)
            .collect()
    }

    fn resources(&self) -> Vec<Resource> {
        self.engine.list_resources().iter().filter_map(to_mcp_resource).collect()
    }
}

fn to_mcp_tool(descriptor: &CapabilityDescriptor) -> Tool {
    let schema = match descriptor.input_schema.to_json() {
        Value::Object(map) => map,
        _ => Map::new(),
    };
    Tool::new(descriptor.name.clone(), descriptor.description.clone(), Arc::new(schema))
}

fn to_mcp_resource(descriptor: &CapabilityDescriptor) -> Option<Resource> {
    let mut raw = RawResource::new(descriptor.uri.clone()?, descriptor.name.clone());
    raw.description = Some(descriptor.description.clone());
    raw.mime_type = descriptor.mime_type.clone();
    Some(raw.no_annotation())
}

/// One text content item per envelope entry
pub fn envelope_to_result(envelope: ResultEnvelope) -> CallToolResult {
    let is_error = envelope.is_error();
    let content: Vec<Content> = envelope
        .entries
        .into_iter()
        .map(|entry| Content::text(entry.text))
        .collect();

    if is_error {
        CallToolResult::error(content)
    } else {
        CallToolResult::success(content)
    }
}

fn resource_error(error: DispatchError) -> ErrorData {
    match error {
        DispatchError::UnsupportedResource(_) | DispatchError::ResourcesDisabled => {
            ErrorData::invalid_params(error.to_string(), None)
        }
        other => ErrorData::resource_not_found(other.to_string(), None),
    }
}

impl ServerHandler for ToolHostService {
    fn list_tools(
        &self,
        _request: Option<PaginatedRequestParams>,
        _context: RequestContext<RoleServer>,
    ) -> impl Future<Output = Result<ListToolsResult, ErrorData>> + Send + '_ {
        std::future::ready(Ok(ListToolsResult::with_all_items(self.tools())))
    }

    fn call_tool(
        &self,
        request: CallToolRequestParams,
        _context: RequestContext<RoleServer>,
    ) -> impl Future<Output = Result<CallToolResult, ErrorData>> + Send + '_ {
        async move {
            let arguments = request.arguments.unwrap_or_default();
            let envelope = self.engine.invoke(&request.name, arguments).await;
            Ok(envelope_to_result(envelope))
        }
    }

    fn list_resources(
        &self,
        _request: Option<PaginatedRequestParams>,
        _context: RequestContext<RoleServer>,
    ) -> impl Future<Output = Result<ListResourcesResult, ErrorData>> + Send + '_ {
        std::future::ready(Ok(ListResourcesResult::with_all_items(self.resources())))
    }

    fn read_resource(
        &self,
        request: ReadResourceRequestParams,
        _context: RequestContext<RoleServer>,
    ) -> impl Future<Output = Result<ReadResourceResult, ErrorData>> + Send + '_ {
        async move {
            let text = self
                .engine
                .read_resource(&request.uri)
                .await
                .map_err(resource_error)?;
            Ok(ReadResourceResult {
                contents: vec![ResourceContents::text(text, request.uri)],
            })
        }
    }

    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            capabilities: ServerCapabilities::builder()
                .enable_tools()
                .enable_resources()
                .build(),
            protocol_version: ProtocolVersion::LATEST,
            server_info: Implementation {
                name: "toolhost".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
                title: Some("Toolhost MCP".to_string()),
                ..Default::default()
            },
            instructions: Some(
                "Exposes file, HTTP, data-processing and local LLM tools. Only tools enabled in the server configuration are listed; call tools/list first.".to_string(),
            ),
        }
    }
}
