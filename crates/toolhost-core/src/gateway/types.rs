//! Wire and result types for the OpenAI-compatible local inference API

use serde::{Deserialize, Serialize};

use crate::types::{ChatMessage, ReplyMessage};

// Requests. Field order is the order sent on the wire.

#[derive(Debug, Serialize)]
pub(crate) struct CompletionRequest<'a> {
    pub model: &'a str,
    pub prompt: &'a str,
    pub max_tokens: u32,
    pub temperature: f64,
}

#[derive(Debug, Serialize)]
pub(crate) struct ChatRequest<'a> {
    pub model: &'a str,
    pub messages: &'a [ChatMessage],
    pub temperature: f64,
    pub max_tokens: u32,
}

// Responses. Everything is optional; the server decides what it fills in.

#[derive(Debug, Default, Deserialize)]
pub(crate) struct ModelList {
    #[serde(default)]
    pub data: Vec<ModelEntry>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ModelEntry {
    #[serde(default)]
    pub id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct CompletionResponse {
    #[serde(default)]
    pub choices: Vec<CompletionChoice>,
    #[serde(default)]
    pub usage: Option<TokenUsage>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct CompletionChoice {
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ChatResponse {
    #[serde(default)]
    pub choices: Vec<ChatChoice>,
    #[serde(default)]
    pub usage: Option<TokenUsage>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ChatChoice {
    #[serde(default)]
    pub message: ReplyMessage,
    #[serde(default)]
    pub finish_reason: Option<String>,
}

/// Token accounting reported by the server
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenUsage {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prompt_tokens: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completion_tokens: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_tokens: Option<u64>,
}

/// Result of a text completion
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TextGeneration {
    pub text: String,
    /// Model that served the request (the resolved default when none was given)
    pub model: String,
    pub usage: TokenUsage,
    pub finish_reason: String,
}

/// Result of a chat completion
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatCompletion {
    pub message: ReplyMessage,
    pub model: String,
    pub usage: TokenUsage,
    pub finish_reason: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ConnectionState {
    Connected,
    Disconnected,
}

/// Health report from `test_connection`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConnectionStatus {
    pub status: ConnectionState,
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub models_count: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub models: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ConnectionStatus {
    pub fn connected(url: impl Into<String>, models: Vec<String>) -> Self {
        Self {
            status: ConnectionState::Connected,
            url: url.into(),
            models_count: Some(models.len()),
            models: Some(models),
            error: None,
        }
    }

    pub fn disconnected(url: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            status: ConnectionState::Disconnected,
            url: url.into(),
            models_count: None,
            models: None,
            error: Some(error.into()),
        }
    }

    pub fn is_connected(&self) -> bool {
        self.status == ConnectionState::Connected
    }
}
