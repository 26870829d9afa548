//! Core types shared by the registry, engine and backends

mod capability;
mod envelope;
mod message;
mod request;
mod schema;

pub use capability::{CapabilityDescriptor, CapabilityKind};
pub use envelope::{EnvelopeEntry, ResultEnvelope};
pub use message::{ChatMessage, MessageRole, ReplyMessage};
pub use request::{
    AggregateFunction, CallApiArgs, ChatArgs, DataOperation, DeleteFileArgs, GenerateArgs,
    ListFilesArgs, ProcessDataArgs, ReadFileArgs, ToolName, ToolRequest, WriteFileArgs,
    DEFAULT_CHAT_MAX_TOKENS, DEFAULT_GENERATE_MAX_TOKENS, DEFAULT_TEMPERATURE,
};
pub use schema::{SchemaNode, SchemaType};
