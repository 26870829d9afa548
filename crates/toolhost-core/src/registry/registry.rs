//! Capability registry
//!
//! Owns the enablement view and answers two questions: which capabilities
//! are exposed, and is a given name one of them. The enabled list is computed
//! once at construction; configuration is not reloaded at runtime.

use std::sync::Arc;

use crate::config::EnablementConfig;
use crate::logging::Logger;
use crate::types::{CapabilityDescriptor, ToolName};

use super::catalog::{data_resource, tool_catalog};

/// The set of capabilities exposed under one configuration
pub struct CapabilityRegistry {
    config: EnablementConfig,
    /// Enabled tools, in catalog order
    tools: Vec<ToolName>,
    /// Descriptors of the enabled tools (same order), then the resources
    exposed: Vec<CapabilityDescriptor>,
}

impl CapabilityRegistry {
    /// Build the registry, logging unknown tool names found in configuration
    pub fn new(config: EnablementConfig, logger: Arc<dyn Logger>) -> Self {
        for name in &config.enabled_tool_names {
            if ToolName::from_name(name).is_none() {
                crate::log_warn!(logger, "[Registry] Ignoring unknown tool in configuration: {}", name);
            }
        }

        let (tools, mut exposed): (Vec<ToolName>, Vec<CapabilityDescriptor>) = tool_catalog()
            .iter()
            .filter(|(tool, _)| tool_enabled(&config, *tool))
            .cloned()
            .unzip();

        if config.resources_enabled {
            exposed.push(data_resource(&config.resource_base_path));
        }

        crate::log_info!(
            logger,
            "[Registry] {} tools and {} resources enabled",
            tools.len(),
            exposed.len() - tools.len()
        );

        Self {
            config,
            tools,
            exposed,
        }
    }

    pub fn config(&self) -> &EnablementConfig {
        &self.config
    }

    /// Whether `name` is an exposed capability (tool name or resource name)
    pub fn is_enabled(&self, name: &str) -> bool {
        self.enabled_tool(name).is_some() || self.resources().iter().any(|r| r.name == name)
    }

    /// Look up an exposed tool by name
    pub fn enabled_tool(&self, name: &str) -> Option<(ToolName, &CapabilityDescriptor)> {
        let index = self.tools.iter().position(|tool| tool.as_str() == name)?;
        Some((self.tools[index], &self.exposed[index]))
    }

    /// Exposed tools in catalog order, then exposed resources
    pub fn list_enabled(&self) -> &[CapabilityDescriptor] {
        &self.exposed
    }

    /// Exposed tools only
    pub fn enabled_tools(&self) -> impl Iterator<Item = ToolName> + '_ {
        self.tools.iter().copied()
    }

    /// Exposed resources only
    pub fn resources(&self) -> &[CapabilityDescriptor] {
        &self.exposed[self.tools.len()..]
    }
}

fn tool_enabled(config: &EnablementConfig, tool: ToolName) -> bool {
    if !config.enabled_tool_names.contains(tool.as_str()) {
        return false;
    }
    !tool.requires_inference() || config.inference_enabled
}
