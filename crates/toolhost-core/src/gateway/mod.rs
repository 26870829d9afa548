//! Local inference gateway (OpenAI-compatible LM Studio server)

mod client;
mod error;
mod types;

pub use client::InferenceGateway;
pub use error::{GatewayError, GatewayResult};
pub use types::{ChatCompletion, ConnectionState, ConnectionStatus, TextGeneration, TokenUsage};
