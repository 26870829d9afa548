//! Typed tool names and per-tool request arguments
//!
//! The dispatch engine parses the untyped argument bag into a `ToolRequest`
//! once, so backends only ever see strongly typed input.

use std::collections::BTreeMap;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::message::ChatMessage;

/// Default `max_tokens` for text generation
pub const DEFAULT_GENERATE_MAX_TOKENS: u32 = 100;
/// Default `max_tokens` for chat completion
pub const DEFAULT_CHAT_MAX_TOKENS: u32 = 500;
/// Default sampling temperature for both completion kinds
pub const DEFAULT_TEMPERATURE: f64 = 0.7;

/// Every tool the catalog knows about, in declaration order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ToolName {
    ReadFile,
    WriteFile,
    ListFiles,
    DeleteFile,
    CallApi,
    ProcessData,
    LmStudioGenerate,
    LmStudioChat,
    LmStudioListModels,
    LmStudioTestConnection,
}

impl ToolName {
    pub const ALL: [ToolName; 10] = [
        ToolName::ReadFile,
        ToolName::WriteFile,
        ToolName::ListFiles,
        ToolName::DeleteFile,
        ToolName::CallApi,
        ToolName::ProcessData,
        ToolName::LmStudioGenerate,
        ToolName::LmStudioChat,
        ToolName::LmStudioListModels,
        ToolName::LmStudioTestConnection,
    ];

    /// Wire name of the tool
    pub fn as_str(&self) -> &'static str {
        match self {
            ToolName::ReadFile => "read_file",
            ToolName::WriteFile => "write_file",
            ToolName::ListFiles => "list_files",
            ToolName::DeleteFile => "delete_file",
            ToolName::CallApi => "call_api",
            ToolName::ProcessData => "process_data",
            ToolName::LmStudioGenerate => "lm_studio_generate",
            ToolName::LmStudioChat => "lm_studio_chat",
            ToolName::LmStudioListModels => "lm_studio_list_models",
            ToolName::LmStudioTestConnection => "lm_studio_test_connection",
        }
    }

    /// Look up a tool by wire name
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|t| t.as_str() == name)
    }

    /// Whether the tool is only exposed while the inference gateway is enabled
    pub fn requires_inference(&self) -> bool {
        matches!(
            self,
            ToolName::LmStudioGenerate
                | ToolName::LmStudioChat
                | ToolName::LmStudioListModels
                | ToolName::LmStudioTestConnection
        )
    }
}

impl std::fmt::Display for ToolName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ReadFileArgs {
    pub path: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct WriteFileArgs {
    pub path: String,
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ListFilesArgs {
    #[serde(default = "default_directory")]
    pub directory: String,
}

fn default_directory() -> String {
    ".".to_string()
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DeleteFileArgs {
    pub path: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CallApiArgs {
    pub url: String,
    #[serde(default = "default_method")]
    pub method: String,
    #[serde(default)]
    pub headers: Option<BTreeMap<String, String>>,
    /// Strings are sent verbatim, anything else is JSON encoded
    #[serde(default)]
    pub body: Option<Value>,
}

fn default_method() -> String {
    "GET".to_string()
}

/// Operations supported by `process_data`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataOperation {
    Filter,
    Sort,
    Transform,
    Aggregate,
}

/// Aggregate functions supported by `process_data`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AggregateFunction {
    #[default]
    Sum,
    Avg,
    Count,
    Min,
    Max,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ProcessDataArgs {
    /// JSON text, or an already structured value
    pub data: Value,
    pub operation: DataOperation,
    /// Filter condition, `field OP literal`
    #[serde(default)]
    pub condition: Option<String>,
    /// Sort key for lists of objects
    #[serde(default)]
    pub key: Option<String>,
    #[serde(default)]
    pub reverse: bool,
    /// Key renames applied by `transform`
    #[serde(default)]
    pub mapping: Option<BTreeMap<String, String>>,
    #[serde(default)]
    pub function: AggregateFunction,
    /// Field aggregated over for lists of objects
    #[serde(default)]
    pub field: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct GenerateArgs {
    pub prompt: String,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default = "default_generate_max_tokens")]
    pub max_tokens: u32,
    #[serde(default = "default_temperature")]
    pub temperature: f64,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ChatArgs {
    pub messages: Vec<ChatMessage>,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default = "default_temperature")]
    pub temperature: f64,
    #[serde(default = "default_chat_max_tokens")]
    pub max_tokens: u32,
}

fn default_generate_max_tokens() -> u32 {
    DEFAULT_GENERATE_MAX_TOKENS
}

fn default_chat_max_tokens() -> u32 {
    DEFAULT_CHAT_MAX_TOKENS
}

fn default_temperature() -> f64 {
    DEFAULT_TEMPERATURE
}

/// A fully parsed tool invocation
#[derive(Debug, Clone, PartialEq)]
pub enum ToolRequest {
    ReadFile(ReadFileArgs),
    WriteFile(WriteFileArgs),
    ListFiles(ListFilesArgs),
    DeleteFile(DeleteFileArgs),
    CallApi(CallApiArgs),
    ProcessData(ProcessDataArgs),
    Generate(GenerateArgs),
    Chat(ChatArgs),
    ListModels,
    TestConnection,
}

impl ToolRequest {
    /// Parse an argument bag for `tool`
    pub fn parse(tool: ToolName, arguments: Map<String, Value>) -> Result<Self, serde_json::Error> {
        let args = Value::Object(arguments);
        Ok(match tool {
            ToolName::ReadFile => ToolRequest::ReadFile(decode(args)?),
            ToolName::WriteFile => ToolRequest::WriteFile(decode(args)?),
            ToolName::ListFiles => ToolRequest::ListFiles(decode(args)?),
            ToolName::DeleteFile => ToolRequest::DeleteFile(decode(args)?),
            ToolName::CallApi => ToolRequest::CallApi(decode(args)?),
            ToolName::ProcessData => ToolRequest::ProcessData(decode(args)?),
            ToolName::LmStudioGenerate => ToolRequest::Generate(decode(args)?),
            ToolName::LmStudioChat => ToolRequest::Chat(decode(args)?),
            ToolName::LmStudioListModels => ToolRequest::ListModels,
            ToolName::LmStudioTestConnection => ToolRequest::TestConnection,
        })
    }

    /// The tool this request targets
    pub fn tool(&self) -> ToolName {
        match self {
            ToolRequest::ReadFile(_) => ToolName::ReadFile,
            ToolRequest::WriteFile(_) => ToolName::WriteFile,
            ToolRequest::ListFiles(_) => ToolName::ListFiles,
            ToolRequest::DeleteFile(_) => ToolName::DeleteFile,
            ToolRequest::CallApi(_) => ToolName::CallApi,
            ToolRequest::ProcessData(_) => ToolName::ProcessData,
            ToolRequest::Generate(_) => ToolName::LmStudioGenerate,
            ToolRequest::Chat(_) => ToolName::LmStudioChat,
            ToolRequest::ListModels => ToolName::LmStudioListModels,
            ToolRequest::TestConnection => ToolName::LmStudioTestConnection,
        }
    }
}

fn decode<T: DeserializeOwned>(args: Value) -> Result<T, serde_json::Error> {
    serde_json::from_value(args)
}
