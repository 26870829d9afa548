//! Assemble a dispatch engine from configuration

use std::sync::Arc;

use crate::backends::{
    Backend, BackendError, DataTransformBackend, FileBackend, HttpProxyBackend, InferenceBackend,
};
use crate::config::{EnablementConfig, ServerConfig};
use crate::gateway::InferenceGateway;
use crate::logging::Logger;
use crate::registry::CapabilityRegistry;

use super::engine::DispatchEngine;
use super::error::DispatchResult;

/// Build an engine, reading `LM_STUDIO_URL` from the environment
pub fn build_engine(config: &ServerConfig, logger: Arc<dyn Logger>) -> DispatchResult<DispatchEngine> {
    build_engine_with(config, config.enablement(), logger)
}

/// Build an engine from an already resolved enablement view
///
/// The inference backend (and its HTTP client) only exists while inference
/// is enabled.
pub fn build_engine_with(
    config: &ServerConfig,
    enablement: EnablementConfig,
    logger: Arc<dyn Logger>,
) -> DispatchResult<DispatchEngine> {
    let mut backends: Vec<Arc<dyn Backend>> = vec![
        Arc::new(FileBackend::new(&config.files.root, logger.clone())?),
        Arc::new(HttpProxyBackend::new(config.http_timeout(), logger.clone())?),
        Arc::new(DataTransformBackend::new(logger.clone())),
    ];

    if enablement.inference_enabled {
        let gateway = InferenceGateway::new(
            &enablement.inference_base_url,
            config.gateway_timeout(),
            logger.clone(),
        )
        .map_err(BackendError::from)?;
        backends.push(Arc::new(InferenceBackend::new(Arc::new(gateway), logger.clone())));
    }

    let registry = Arc::new(CapabilityRegistry::new(enablement, logger.clone()));
    DispatchEngine::new(registry, backends, logger)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logging::NoOpLogger;
    use crate::test_support::fake_gateway;
    use serde_json::{json, Map, Value};
    use tempfile::tempdir;

    fn bag(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap()
    }

    fn config_json(value: Value) -> ServerConfig {
        serde_json::from_value(value).unwrap()
    }

    #[tokio::test]
    async fn test_engine_from_config() {
        let dir = tempdir().unwrap();
        let config = config_json(json!({
            "tools": {"enabled": ["write_file", "read_file", "process_data", "lm_studio_generate"]},
            "files": {"root": dir.path().to_string_lossy()}
        }));

        let engine = build_engine_with(&config, config.enablement_with_env(None), Arc::new(NoOpLogger::new())).unwrap();
        let names: Vec<_> = engine.list_capabilities().iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["read_file", "write_file", "process_data"]);

        let envelope = engine
            .invoke("process_data", bag(json!({"data": "[1, 2, 3]", "operation": "aggregate", "function": "count"})))
            .await;
        assert_eq!(envelope.first_text(), Some("3"));

        let envelope = engine.invoke("lm_studio_generate", bag(json!({"prompt": "Hi"}))).await;
        assert_eq!(envelope.first_text(), Some("Error: Unknown tool: lm_studio_generate"));

        engine.shutdown().await;
    }

    #[tokio::test]
    async fn test_inference_tools_through_engine() {
        let dir = tempdir().unwrap();
        let server = fake_gateway(&["m1", "m2"]).await;
        let config = config_json(json!({
            "tools": {"enabled": ["lm_studio_generate", "lm_studio_test_connection"]},
            "lm_studio": {"enabled": true, "base_url": server.base_url},
            "files": {"root": dir.path().to_string_lossy()}
        }));

        let engine = build_engine_with(&config, config.enablement_with_env(None), Arc::new(NoOpLogger::new())).unwrap();

        let envelope = engine.invoke("lm_studio_generate", bag(json!({"prompt": "Hi"}))).await;
        assert!(!envelope.is_error());
        assert!(envelope.first_text().unwrap().contains("Model: m1"));
        assert_eq!(server.requests_to("/v1/completions")[0].json()["model"], "m1");

        let envelope = engine.invoke("lm_studio_test_connection", Map::new()).await;
        let status: Value = serde_json::from_str(envelope.first_text().unwrap()).unwrap();
        assert_eq!(status["status"], "connected");
        assert_eq!(status["models_count"], 2);
    }

    #[tokio::test]
    async fn test_empty_model_list_through_engine() {
        let dir = tempdir().unwrap();
        let server = fake_gateway(&[]).await;
        let config = config_json(json!({
            "tools": {"enabled": ["lm_studio_chat"]},
            "lm_studio": {"enabled": true, "base_url": server.base_url},
            "files": {"root": dir.path().to_string_lossy()}
        }));

        let engine = build_engine_with(&config, config.enablement_with_env(None), Arc::new(NoOpLogger::new())).unwrap();
        let envelope = engine
            .invoke(
                "lm_studio_chat",
                bag(json!({"messages": [{"role": "user", "content": "Hello"}]})),
            )
            .await;

        assert!(envelope.is_error());
        assert_eq!(envelope.first_text(), Some("Error: No models available in LM Studio"));
        assert!(server.requests_to("/v1/chat/completions").is_empty());
    }
}
