//! Generic HTTP proxy backend for `call_api`

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, CONTENT_TYPE};
use reqwest::Method;
use serde_json::{json, Value};

use crate::logging::Logger;
use crate::types::{CallApiArgs, ToolName, ToolRequest};

use super::error::{BackendError, BackendResult};
use super::traits::{Backend, ToolOutput};

/// Forwards arbitrary requests through one long-lived client
pub struct HttpProxyBackend {
    client: reqwest::Client,
    logger: Arc<dyn Logger>,
}

impl HttpProxyBackend {
    pub fn new(timeout: Duration, logger: Arc<dyn Logger>) -> BackendResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| BackendError::Client(e.to_string()))?;
        Ok(Self { client, logger })
    }

    /// Perform the request and describe the response as
    /// `{status_code, headers, data}`; `data` is parsed JSON when possible
    pub async fn call_api(&self, args: &CallApiArgs) -> BackendResult<Value> {
        let method = Method::from_bytes(args.method.to_uppercase().as_bytes())
            .map_err(|_| BackendError::InvalidArgument(format!("Invalid HTTP method: {}", args.method)))?;
        let mut headers = build_headers(args.headers.as_ref())?;

        let mut request = self.client.request(method.clone(), &args.url);
        match &args.body {
            None | Some(Value::Null) => {}
            Some(Value::String(text)) => {
                set_default_content_type(&mut headers);
                request = request.body(text.clone());
            }
            Some(other) => {
                set_default_content_type(&mut headers);
                request = request.body(serde_json::to_vec(other)?);
            }
        }

        let response = request.headers(headers).send().await.map_err(|e| {
            let err = BackendError::from_upstream(&e, &args.url);
            crate::log_error!(self.logger, "[HttpProxy] {} {} failed: {}", method, args.url, err);
            err
        })?;

        let status = response.status().as_u16();
        let response_headers: BTreeMap<String, String> = response
            .headers()
            .iter()
            .map(|(k, v)| (k.to_string(), String::from_utf8_lossy(v.as_bytes()).into_owned()))
            .collect();
        let text = response
            .text()
            .await
            .map_err(|e| BackendError::from_upstream(&e, &args.url))?;
        let data = serde_json::from_str(&text).unwrap_or(Value::String(text));

        crate::log_info!(self.logger, "[HttpProxy] API call: {} {} - Status: {}", method, args.url, status);

        Ok(json!({
            "status_code": status,
            "headers": response_headers,
            "data": data,
        }))
    }
}

fn build_headers(headers: Option<&BTreeMap<String, String>>) -> BackendResult<HeaderMap> {
    let mut map = HeaderMap::new();
    for (name, value) in headers.into_iter().flatten() {
        let name = HeaderName::from_bytes(name.as_bytes())
            .map_err(|_| BackendError::InvalidArgument(format!("Invalid header name: {}", name)))?;
        let value = HeaderValue::from_str(value)
            .map_err(|_| BackendError::InvalidArgument(format!("Invalid value for header {}", name)))?;
        map.insert(name, value);
    }
    Ok(map)
}

fn set_default_content_type(headers: &mut HeaderMap) {
    if !headers.contains_key(CONTENT_TYPE) {
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    }
}

#[async_trait]
impl Backend for HttpProxyBackend {
    fn name(&self) -> &str {
        "http"
    }

    fn capabilities(&self) -> &'static [ToolName] {
        &[ToolName::CallApi]
    }

    async fn call(&self, request: ToolRequest) -> BackendResult<ToolOutput> {
        match request {
            ToolRequest::CallApi(args) => self.call_api(&args).await.map(ToolOutput::Json),
            other => Err(BackendError::unsupported(self.name(), other.tool())),
        }
    }

    async fn close(&self) {
        crate::log_debug!(self.logger, "[HttpProxy] Backend shut down");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logging::NoOpLogger;
    use crate::test_support::{FakeRoute, FakeUpstream, UNREACHABLE_URL};

    fn backend(timeout: Duration) -> HttpProxyBackend {
        HttpProxyBackend::new(timeout, Arc::new(NoOpLogger::new())).unwrap()
    }

    fn args(url: String, method: &str, body: Option<Value>) -> CallApiArgs {
        CallApiArgs {
            url,
            method: method.to_string(),
            headers: None,
            body,
        }
    }

    #[tokio::test]
    async fn test_get_parses_json_body() {
        let server = FakeUpstream::start(vec![FakeRoute::json(
            reqwest::Method::GET,
            "/users/1",
            json!({"id": 1, "name": "Ada"}),
        )])
        .await;

        let result = backend(Duration::from_secs(5))
            .call_api(&args(server.url("/users/1"), "get", None))
            .await
            .unwrap();

        assert_eq!(result["status_code"], 200);
        assert_eq!(result["data"]["name"], "Ada");
        assert_eq!(result["headers"]["x-upstream"], "fake");
    }

    #[tokio::test]
    async fn test_close_leaves_client_usable_until_drop() {
        let server = FakeUpstream::start(vec![FakeRoute::json(reqwest::Method::GET, "/ping", json!({"ok": true}))]).await;
        let backend = backend(Duration::from_secs(5));

        backend.close().await;
        let result = backend.call_api(&args(server.url("/ping"), "GET", None)).await.unwrap();
        assert_eq!(result["data"]["ok"], true);
    }

    #[tokio::test]
    async fn test_non_json_body_stays_text() {
        let server = FakeUpstream::start(vec![
            FakeRoute::text(reqwest::Method::GET, "/health", "ok").with_status(503)
        ])
        .await;

        let result = backend(Duration::from_secs(5))
            .call_api(&args(server.url("/health"), "GET", None))
            .await
            .unwrap();

        assert_eq!(result["status_code"], 503);
        assert_eq!(result["data"], "ok");
    }

    #[tokio::test]
    async fn test_structured_body_is_json_encoded() {
        let server = FakeUpstream::start(vec![FakeRoute::json(
            reqwest::Method::POST,
            "/items",
            json!({"created": true}),
        )])
        .await;

        backend(Duration::from_secs(5))
            .call_api(&args(server.url("/items"), "POST", Some(json!({"name": "widget"}))))
            .await
            .unwrap();

        let sent = &server.requests_to("/items")[0];
        assert_eq!(sent.method, "POST");
        assert_eq!(sent.headers["content-type"], "application/json");
        assert_eq!(sent.json(), json!({"name": "widget"}));
    }

    #[tokio::test]
    async fn test_explicit_content_type_is_kept() {
        let server = FakeUpstream::start(vec![FakeRoute::text(reqwest::Method::PUT, "/raw", "")]).await;

        let mut request = args(server.url("/raw"), "PUT", Some(json!("a,b,c")));
        request.headers = Some(BTreeMap::from([("Content-Type".to_string(), "text/csv".to_string())]));
        backend(Duration::from_secs(5)).call_api(&request).await.unwrap();

        let sent = &server.requests_to("/raw")[0];
        assert_eq!(sent.headers["content-type"], "text/csv");
        assert_eq!(sent.body, "a,b,c");
    }

    #[tokio::test]
    async fn test_timeout() {
        let server = FakeUpstream::start(vec![FakeRoute::text(reqwest::Method::GET, "/slow", "late")
            .with_delay(Duration::from_secs(2))])
        .await;
        let url = server.url("/slow");

        let err = backend(Duration::from_millis(200))
            .call_api(&args(url.clone(), "GET", None))
            .await
            .unwrap_err();

        assert!(matches!(err, BackendError::UpstreamTimeout { .. }));
        assert_eq!(err.to_string(), format!("Request to {} timed out", url));
    }

    #[tokio::test]
    async fn test_unreachable() {
        let err = backend(Duration::from_secs(5))
            .call_api(&args(format!("{}/x", UNREACHABLE_URL), "GET", None))
            .await
            .unwrap_err();

        assert!(matches!(err, BackendError::UpstreamUnreachable { .. }));
        assert!(err.to_string().starts_with("Request failed: "));
    }

    #[tokio::test]
    async fn test_invalid_method() {
        let err = backend(Duration::from_secs(5))
            .call_api(&args("http://localhost".into(), "NOT A METHOD", None))
            .await
            .unwrap_err();
        assert!(matches!(err, BackendError::InvalidArgument(_)));
    }
}
