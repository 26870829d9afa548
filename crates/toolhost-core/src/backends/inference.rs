//! Inference backend: renders gateway results for the `lm_studio_*` tools

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use crate::gateway::InferenceGateway;
use crate::logging::Logger;
use crate::types::{ToolName, ToolRequest};

use super::error::{BackendError, BackendResult};
use super::traits::{Backend, ToolOutput};

const INFERENCE_TOOLS: &[ToolName] = &[
    ToolName::LmStudioGenerate,
    ToolName::LmStudioChat,
    ToolName::LmStudioListModels,
    ToolName::LmStudioTestConnection,
];

pub struct InferenceBackend {
    gateway: Arc<InferenceGateway>,
    logger: Arc<dyn Logger>,
}

impl InferenceBackend {
    pub fn new(gateway: Arc<InferenceGateway>, logger: Arc<dyn Logger>) -> Self {
        Self { gateway, logger }
    }

    pub fn gateway(&self) -> &InferenceGateway {
        &self.gateway
    }
}

#[async_trait]
impl Backend for InferenceBackend {
    fn name(&self) -> &str {
        "inference"
    }

    fn capabilities(&self) -> &'static [ToolName] {
        INFERENCE_TOOLS
    }

    async fn call(&self, request: ToolRequest) -> BackendResult<ToolOutput> {
        match request {
            ToolRequest::Generate(args) => {
                let result = self
                    .gateway
                    .generate_text(&args.prompt, args.model.as_deref(), args.max_tokens, args.temperature)
                    .await?;
                let tokens = result
                    .usage
                    .total_tokens
                    .map(|t| t.to_string())
                    .unwrap_or_else(|| "N/A".to_string());
                Ok(ToolOutput::Text(format!(
                    "Generated text:\n{}\n\nModel: {}\nTokens used: {}",
                    result.text, result.model, tokens
                )))
            }
            ToolRequest::Chat(args) => {
                let result = self
                    .gateway
                    .chat_completion(&args.messages, args.model.as_deref(), args.temperature, args.max_tokens)
                    .await?;
                Ok(ToolOutput::Text(format!(
                    "Assistant: {}\n\nModel: {}",
                    result.message.content, result.model
                )))
            }
            ToolRequest::ListModels => {
                let models = self.gateway.list_models().await?;
                Ok(ToolOutput::Text(format!(
                    "Available models in LM Studio:\n{:#}",
                    Value::from(models)
                )))
            }
            ToolRequest::TestConnection => {
                let status = self.gateway.test_connection().await;
                Ok(ToolOutput::Json(serde_json::to_value(status)?))
            }
            other => Err(BackendError::unsupported(self.name(), other.tool())),
        }
    }

    async fn close(&self) {
        crate::log_debug!(self.logger, "[LMStudio] Backend shut down ({})", self.gateway.base_url());
    }
}
