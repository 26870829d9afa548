//! Capability descriptors

use serde::{Deserialize, Serialize};

use super::schema::SchemaNode;

/// Whether a capability is callable or readable
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CapabilityKind {
    Tool,
    Resource,
}

/// A named capability the engine can expose
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CapabilityDescriptor {
    /// Unique name (tool name, or resource display name)
    pub name: String,
    pub kind: CapabilityKind,
    pub description: String,
    /// JSON Schema for tool arguments
    #[serde(rename = "inputSchema")]
    pub input_schema: SchemaNode,
    /// Resource location, resources only
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uri: Option<String>,
    #[serde(rename = "mimeType", skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,
}

impl CapabilityDescriptor {
    /// Create a tool descriptor
    pub fn tool(name: impl Into<String>, description: impl Into<String>, input_schema: SchemaNode) -> Self {
        Self {
            name: name.into(),
            kind: CapabilityKind::Tool,
            description: description.into(),
            input_schema,
            uri: None,
            mime_type: None,
        }
    }

    /// Create a resource descriptor
    pub fn resource(
        name: impl Into<String>,
        description: impl Into<String>,
        uri: impl Into<String>,
        mime_type: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            kind: CapabilityKind::Resource,
            description: description.into(),
            input_schema: SchemaNode::object(),
            uri: Some(uri.into()),
            mime_type: Some(mime_type.into()),
        }
    }

    pub fn is_tool(&self) -> bool {
        self.kind == CapabilityKind::Tool
    }

    pub fn is_resource(&self) -> bool {
        self.kind == CapabilityKind::Resource
    }
}
