//! HTTP client for an LM Studio style local inference server
//!
//! Liveness is decided per call; construction never touches the network.

use std::sync::Arc;
use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::logging::Logger;
use crate::types::ChatMessage;

use super::error::{GatewayError, GatewayResult};
use super::types::{
    ChatCompletion, ChatRequest, ChatResponse, CompletionRequest, CompletionResponse,
    ConnectionStatus, ModelList, TextGeneration,
};

const MODELS_PATH: &str = "/v1/models";
const COMPLETIONS_PATH: &str = "/v1/completions";
const CHAT_COMPLETIONS_PATH: &str = "/v1/chat/completions";

/// Gateway to the local inference server
pub struct InferenceGateway {
    base_url: String,
    client: reqwest::Client,
    logger: Arc<dyn Logger>,
}

impl InferenceGateway {
    /// Create a gateway for `base_url` (a trailing `/` is trimmed)
    pub fn new(base_url: &str, timeout: Duration, logger: Arc<dyn Logger>) -> GatewayResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| GatewayError::Client(e.to_string()))?;

        let base_url = base_url.trim_end_matches('/').to_string();
        crate::log_info!(logger, "[LMStudio] Gateway initialized with URL: {}", base_url);

        Ok(Self {
            base_url,
            client,
            logger,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn decode<T: DeserializeOwned>(&self, response: reqwest::Response) -> GatewayResult<T> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            crate::log_error!(
                self.logger,
                "[LMStudio] HTTP error from LM Studio: {} - {}",
                status.as_u16(),
                body
            );
            return Err(GatewayError::HttpError {
                status: status.as_u16(),
            });
        }

        let body = response
            .text()
            .await
            .map_err(|e| GatewayError::from_transport(&e, &self.base_url))?;
        serde_json::from_str(&body).map_err(|e| GatewayError::InvalidResponse(e.to_string()))
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> GatewayResult<T> {
        let response = self
            .client
            .get(self.endpoint(path))
            .send()
            .await
            .map_err(|e| GatewayError::from_transport(&e, &self.base_url))?;
        self.decode(response).await
    }

    async fn post_json<B: Serialize, T: DeserializeOwned>(&self, path: &str, body: &B) -> GatewayResult<T> {
        let response = self
            .client
            .post(self.endpoint(path))
            .json(body)
            .send()
            .await
            .map_err(|e| GatewayError::from_transport(&e, &self.base_url))?;
        self.decode(response).await
    }

    async fn fetch_models(&self) -> GatewayResult<ModelList> {
        self.get_json(MODELS_PATH).await
    }

    /// Ids of the models the server offers; an empty list is valid
    pub async fn list_models(&self) -> GatewayResult<Vec<String>> {
        let models = self.fetch_models().await.map_err(|e| {
            crate::log_error!(self.logger, "[LMStudio] Error listing models: {}", e);
            e
        })?;

        Ok(models
            .data
            .into_iter()
            .map(|m| m.id.unwrap_or_else(|| "unknown".to_string()))
            .collect())
    }

    /// First model in the server's list. Not cached.
    pub async fn resolve_default_model(&self) -> GatewayResult<String> {
        let models = self.fetch_models().await?;
        let first = models
            .data
            .into_iter()
            .next()
            .ok_or(GatewayError::NoModelsAvailable)?;
        let id = first
            .id
            .filter(|id| !id.is_empty())
            .ok_or_else(|| GatewayError::InvalidResponse("model entry without an id".to_string()))?;

        crate::log_info!(self.logger, "[LMStudio] Using default model: {}", id);
        Ok(id)
    }

    async fn model_or_default(&self, model: Option<&str>) -> GatewayResult<String> {
        match model.filter(|m| !m.is_empty()) {
            Some(model) => Ok(model.to_string()),
            None => self.resolve_default_model().await,
        }
    }

    /// Plain text completion
    pub async fn generate_text(
        &self,
        prompt: &str,
        model: Option<&str>,
        max_tokens: u32,
        temperature: f64,
    ) -> GatewayResult<TextGeneration> {
        let result: GatewayResult<TextGeneration> = async {
            let model = self.model_or_default(model).await?;
            let request = CompletionRequest {
                model: &model,
                prompt,
                max_tokens,
                temperature,
            };
            let response: CompletionResponse = self.post_json(COMPLETIONS_PATH, &request).await?;

            let choice = response.choices.into_iter().next();
            Ok(TextGeneration {
                text: choice.as_ref().map(|c| c.text.clone()).unwrap_or_default(),
                finish_reason: choice.and_then(|c| c.finish_reason).unwrap_or_default(),
                usage: response.usage.unwrap_or_default(),
                model,
            })
        }
        .await;

        if let Err(e) = &result {
            crate::log_error!(self.logger, "[LMStudio] Error generating text: {}", e);
        }
        result
    }

    /// Chat completion over a message history
    pub async fn chat_completion(
        &self,
        messages: &[ChatMessage],
        model: Option<&str>,
        temperature: f64,
        max_tokens: u32,
    ) -> GatewayResult<ChatCompletion> {
        let result: GatewayResult<ChatCompletion> = async {
            let model = self.model_or_default(model).await?;
            let request = ChatRequest {
                model: &model,
                messages,
                temperature,
                max_tokens,
            };
            let response: ChatResponse = self.post_json(CHAT_COMPLETIONS_PATH, &request).await?;

            let choice = response.choices.into_iter().next();
            Ok(ChatCompletion {
                message: choice.as_ref().map(|c| c.message.clone()).unwrap_or_default(),
                finish_reason: choice.and_then(|c| c.finish_reason).unwrap_or_default(),
                usage: response.usage.unwrap_or_default(),
                model,
            })
        }
        .await;

        if let Err(e) = &result {
            crate::log_error!(self.logger, "[LMStudio] Error in chat completion: {}", e);
        }
        result
    }

    /// Health check; reports failures in the status instead of returning them
    pub async fn test_connection(&self) -> ConnectionStatus {
        match self.list_models().await {
            Ok(models) => ConnectionStatus::connected(&self.base_url, models),
            Err(e) => ConnectionStatus::disconnected(&self.base_url, e.to_string()),
        }
    }
}

impl std::fmt::Debug for InferenceGateway {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InferenceGateway")
            .field("base_url", &self.base_url)
            .finish()
    }
}
