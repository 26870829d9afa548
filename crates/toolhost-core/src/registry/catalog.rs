//! Static tool catalog
//!
//! Declaration order here is the order tools are listed to callers.

use once_cell::sync::Lazy;

use crate::types::{
    CapabilityDescriptor, SchemaNode, ToolName, DEFAULT_CHAT_MAX_TOKENS,
    DEFAULT_GENERATE_MAX_TOKENS, DEFAULT_TEMPERATURE,
};

/// Display name of the data directory resource
pub const DATA_RESOURCE_NAME: &str = "Data Directory";

static TOOL_CATALOG: Lazy<Vec<(ToolName, CapabilityDescriptor)>> = Lazy::new(|| {
    ToolName::ALL
        .iter()
        .map(|tool| (*tool, describe(*tool)))
        .collect()
});

/// Every tool descriptor, in declaration order, paired with its name
pub fn tool_catalog() -> &'static [(ToolName, CapabilityDescriptor)] {
    &TOOL_CATALOG
}

/// The descriptor for a single tool
pub fn tool_descriptor(tool: ToolName) -> &'static CapabilityDescriptor {
    // ALL and the catalog are built from the same list, so every tool has an entry
    &TOOL_CATALOG[tool as usize].1
}

/// Descriptor for the data directory resource rooted at `base_path`
pub fn data_resource(base_path: &str) -> CapabilityDescriptor {
    CapabilityDescriptor::resource(
        DATA_RESOURCE_NAME,
        "Access to data files",
        format!("file://{}", base_path),
        "application/json",
    )
}

fn describe(tool: ToolName) -> CapabilityDescriptor {
    let name = tool.as_str();
    match tool {
        ToolName::ReadFile => CapabilityDescriptor::tool(
            name,
            "Read content from a file",
            SchemaNode::object()
                .property("path", SchemaNode::string().describe("Path to the file to read"))
                .require("path"),
        ),
        ToolName::WriteFile => CapabilityDescriptor::tool(
            name,
            "Write content to a file",
            SchemaNode::object()
                .property("path", SchemaNode::string().describe("Path to the file to write"))
                .property("content", SchemaNode::string().describe("Content to write to the file"))
                .require("path")
                .require("content"),
        ),
        ToolName::ListFiles => CapabilityDescriptor::tool(
            name,
            "List files in a directory",
            SchemaNode::object()
                .property("directory", SchemaNode::string().describe("Directory path to list"))
                .require("directory"),
        ),
        ToolName::DeleteFile => CapabilityDescriptor::tool(
            name,
            "Delete a file",
            SchemaNode::object()
                .property("path", SchemaNode::string().describe("Path to the file to delete"))
                .require("path"),
        ),
        ToolName::CallApi => CapabilityDescriptor::tool(
            name,
            "Make an HTTP API call",
            SchemaNode::object()
                .property("url", SchemaNode::string().describe("API endpoint URL"))
                .property(
                    "method",
                    SchemaNode::string()
                        .one_of(["GET", "POST", "PUT", "DELETE"])
                        .describe("HTTP method"),
                )
                .property("headers", SchemaNode::object().describe("HTTP headers"))
                .property("body", SchemaNode::object().describe("Request body"))
                .require("url")
                .require("method"),
        ),
        ToolName::ProcessData => CapabilityDescriptor::tool(
            name,
            "Process and transform data",
            SchemaNode::object()
                .property("data", SchemaNode::string().describe("Data to process (JSON string)"))
                .property(
                    "operation",
                    SchemaNode::string()
                        .one_of(["filter", "sort", "transform", "aggregate"])
                        .describe("Operation to perform"),
                )
                .property(
                    "condition",
                    SchemaNode::string().describe("Filter condition, e.g. status == \"active\" or age >= 18"),
                )
                .property("key", SchemaNode::string().describe("Field to sort objects by"))
                .property(
                    "reverse",
                    SchemaNode::boolean().describe("Sort in descending order").with_default(false),
                )
                .property("mapping", SchemaNode::object().describe("Key renames for transform"))
                .property(
                    "function",
                    SchemaNode::string()
                        .one_of(["sum", "avg", "count", "min", "max"])
                        .describe("Aggregate function")
                        .with_default("sum"),
                )
                .property("field", SchemaNode::string().describe("Field to aggregate over"))
                .require("data")
                .require("operation"),
        ),
        ToolName::LmStudioGenerate => CapabilityDescriptor::tool(
            name,
            "Generate text using LM Studio local LLM",
            SchemaNode::object()
                .property("prompt", SchemaNode::string().describe("Input prompt for text generation"))
                .property(
                    "model",
                    SchemaNode::string().describe("Model name (optional, uses default if not specified)"),
                )
                .property(
                    "max_tokens",
                    SchemaNode::integer()
                        .describe("Maximum tokens to generate")
                        .with_default(DEFAULT_GENERATE_MAX_TOKENS),
                )
                .property(
                    "temperature",
                    SchemaNode::number()
                        .describe("Sampling temperature (0.0-1.0)")
                        .with_default(DEFAULT_TEMPERATURE),
                )
                .require("prompt"),
        ),
        ToolName::LmStudioChat => CapabilityDescriptor::tool(
            name,
            "Chat completion using LM Studio local LLM",
            SchemaNode::object()
                .property(
                    "messages",
                    SchemaNode::array(
                        SchemaNode::object()
                            .property("role", SchemaNode::string().one_of(["user", "assistant", "system"]))
                            .property("content", SchemaNode::string())
                            .require("role")
                            .require("content"),
                    )
                    .describe("List of messages with 'role' and 'content'"),
                )
                .property("model", SchemaNode::string().describe("Model name (optional)"))
                .property(
                    "temperature",
                    SchemaNode::number()
                        .describe("Sampling temperature")
                        .with_default(DEFAULT_TEMPERATURE),
                )
                .property(
                    "max_tokens",
                    SchemaNode::integer()
                        .describe("Maximum tokens to generate")
                        .with_default(DEFAULT_CHAT_MAX_TOKENS),
                )
                .require("messages"),
        ),
        ToolName::LmStudioListModels => CapabilityDescriptor::tool(
            name,
            "List available models in LM Studio",
            SchemaNode::object(),
        ),
        ToolName::LmStudioTestConnection => CapabilityDescriptor::tool(
            name,
            "Test connection to LM Studio",
            SchemaNode::object(),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_covers_every_tool_in_order() {
        let catalog = tool_catalog();
        assert_eq!(catalog.len(), ToolName::ALL.len());

        for (index, (tool, descriptor)) in catalog.iter().enumerate() {
            assert_eq!(*tool, ToolName::ALL[index]);
            assert_eq!(descriptor.name, tool.as_str());
            assert!(descriptor.is_tool());
            assert_eq!(tool_descriptor(*tool), descriptor);
        }
    }

    #[test]
    fn test_generation_defaults_are_advertised() {
        let schema = tool_descriptor(ToolName::LmStudioGenerate).input_schema.to_json();
        assert_eq!(schema["properties"]["max_tokens"]["default"], 100);
        assert_eq!(schema["properties"]["temperature"]["default"], 0.7);

        let chat = tool_descriptor(ToolName::LmStudioChat).input_schema.to_json();
        assert_eq!(chat["properties"]["max_tokens"]["default"], 500);
    }

    #[test]
    fn test_data_resource() {
        let resource = data_resource("./data");
        assert!(resource.is_resource());
        assert_eq!(resource.name, DATA_RESOURCE_NAME);
        assert_eq!(resource.uri.as_deref(), Some("file://./data"));
    }
}
