//! Dispatch engine
//!
//! Every call goes through the same steps: enablement check, required-field
//! check, typed parse, routing, rendering. Whatever happens, the caller gets
//! a `ResultEnvelope`.

use std::any::Any;
use std::collections::HashMap;
use std::panic::AssertUnwindSafe;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use futures::FutureExt;
use serde_json::{Map, Value};

use crate::backends::{Backend, ToolOutput};
use crate::logging::Logger;
use crate::registry::CapabilityRegistry;
use crate::types::{CapabilityDescriptor, ReadFileArgs, ResultEnvelope, ToolName, ToolRequest};

use super::error::{DispatchError, DispatchResult};

const FILE_URI_SCHEME: &str = "file://";

pub struct DispatchEngine {
    registry: Arc<CapabilityRegistry>,
    routes: HashMap<ToolName, Arc<dyn Backend>>,
    backends: Vec<Arc<dyn Backend>>,
    closed: AtomicBool,
    logger: Arc<dyn Logger>,
}

impl DispatchEngine {
    /// Build the routing table and verify it covers every enabled capability
    pub fn new(
        registry: Arc<CapabilityRegistry>,
        backends: Vec<Arc<dyn Backend>>,
        logger: Arc<dyn Logger>,
    ) -> DispatchResult<Self> {
        let mut routes: HashMap<ToolName, Arc<dyn Backend>> = HashMap::new();
        for backend in &backends {
            for tool in backend.capabilities() {
                if let Some(existing) = routes.get(tool) {
                    return Err(DispatchError::DuplicateHandler {
                        tool: *tool,
                        first: existing.name().to_string(),
                        second: backend.name().to_string(),
                    });
                }
                routes.insert(*tool, backend.clone());
            }
        }

        for tool in registry.enabled_tools() {
            if !routes.contains_key(&tool) {
                return Err(DispatchError::MissingHandler(tool));
            }
        }
        if registry.config().resources_enabled && !routes.contains_key(&ToolName::ReadFile) {
            return Err(DispatchError::MissingHandler(ToolName::ReadFile));
        }

        crate::log_debug!(
            logger,
            "[Dispatch] Routing {} tools across {} backends",
            routes.len(),
            backends.len()
        );

        Ok(Self {
            registry,
            routes,
            backends,
            closed: AtomicBool::new(false),
            logger,
        })
    }

    pub fn registry(&self) -> &CapabilityRegistry {
        &self.registry
    }

    /// Exposed capabilities, tools first
    pub fn list_capabilities(&self) -> &[CapabilityDescriptor] {
        self.registry.list_enabled()
    }

    /// Run one tool call to completion; never fails
    pub async fn invoke(&self, name: &str, arguments: Map<String, Value>) -> ResultEnvelope {
        let outcome = AssertUnwindSafe(self.try_invoke(name, arguments))
            .catch_unwind()
            .await;

        match outcome {
            Ok(Ok(output)) => {
                crate::log_debug!(self.logger, "[Dispatch] {} completed", name);
                ResultEnvelope::text(output.render())
            }
            Ok(Err(e)) => {
                crate::log_error!(self.logger, "[Dispatch] Error executing tool {}: {}", name, e);
                ResultEnvelope::error(e)
            }
            Err(panic) => {
                crate::log_error!(
                    self.logger,
                    "[Dispatch] Tool {} panicked: {}",
                    name,
                    panic_message(panic.as_ref())
                );
                ResultEnvelope::error(DispatchError::Internal(name.to_string()))
            }
        }
    }

    async fn try_invoke(&self, name: &str, arguments: Map<String, Value>) -> DispatchResult<ToolOutput> {
        let (tool, descriptor) = self
            .registry
            .enabled_tool(name)
            .ok_or_else(|| DispatchError::UnknownCapability(name.to_string()))?;

        let missing_fields = descriptor.input_schema.missing_required(&arguments);
        if !missing_fields.is_empty() {
            return Err(DispatchError::ValidationFailed {
                tool: name.to_string(),
                missing_fields,
            });
        }

        let request = ToolRequest::parse(tool, arguments).map_err(|e| DispatchError::InvalidArguments {
            tool: name.to_string(),
            message: e.to_string(),
        })?;

        let backend = self.route(tool)?;
        crate::log_debug!(self.logger, "[Dispatch] {} -> {} backend", name, backend.name());
        Ok(backend.call(request).await?)
    }

    fn route(&self, tool: ToolName) -> DispatchResult<&Arc<dyn Backend>> {
        self.routes.get(&tool).ok_or(DispatchError::MissingHandler(tool))
    }

    /// Exposed resources
    pub fn list_resources(&self) -> &[CapabilityDescriptor] {
        self.registry.resources()
    }

    /// Read a `file://` resource through the file backend
    pub async fn read_resource(&self, uri: &str) -> DispatchResult<String> {
        let result: DispatchResult<String> = async {
            if !self.registry.config().resources_enabled {
                return Err(DispatchError::ResourcesDisabled);
            }
            let path = uri
                .strip_prefix(FILE_URI_SCHEME)
                .ok_or_else(|| DispatchError::UnsupportedResource(uri.to_string()))?;

            let request = ToolRequest::ReadFile(ReadFileArgs {
                path: path.to_string(),
            });
            let output = self.route(ToolName::ReadFile)?.call(request).await?;
            Ok(output.render())
        }
        .await;

        if let Err(e) = &result {
            crate::log_error!(self.logger, "[Dispatch] Error reading resource {}: {}", uri, e);
        }
        result
    }

    /// Close every backend; later calls are no-ops
    pub async fn shutdown(&self) {
        if self.closed.swap(true, Ordering::SeqCst) {
            return;
        }
        for backend in &self.backends {
            backend.close().await;
        }
        crate::log_info!(self.logger, "[Dispatch] Shut down {} backends", self.backends.len());
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(message) = panic.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = panic.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic payload".to_string()
    }
}
