//! In-process fake HTTP servers for tests
//!
//! `FakeUpstream` serves canned responses on an ephemeral loopback port and
//! records every request it receives, so tests can assert both on what the
//! client got back and on what it sent (or did not send).

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use axum::extract::State;
use axum::http::{header, HeaderMap, Method, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::Router;
use parking_lot::Mutex;
use serde_json::{json, Value};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

/// An address nothing listens on
pub const UNREACHABLE_URL: &str = "http://127.0.0.1:1";

/// A canned response for one method and path
#[derive(Debug, Clone)]
pub struct FakeRoute {
    method: Method,
    path: String,
    status: StatusCode,
    content_type: String,
    body: String,
    delay: Option<Duration>,
}

impl FakeRoute {
    pub fn json(method: Method, path: &str, body: Value) -> Self {
        Self {
            method,
            path: path.to_string(),
            status: StatusCode::OK,
            content_type: "application/json".to_string(),
            body: body.to_string(),
            delay: None,
        }
    }

    pub fn text(method: Method, path: &str, body: &str) -> Self {
        Self {
            method,
            path: path.to_string(),
            status: StatusCode::OK,
            content_type: "text/plain".to_string(),
            body: body.to_string(),
            delay: None,
        }
    }

    pub fn with_status(mut self, status: u16) -> Self {
        self.status = StatusCode::from_u16(status).unwrap();
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }
}

/// A request as the fake server saw it
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: String,
    pub path: String,
    pub headers: BTreeMap<String, String>,
    pub body: String,
}

impl RecordedRequest {
    pub fn json(&self) -> Value {
        serde_json::from_str(&self.body).unwrap()
    }
}

#[derive(Default)]
struct FakeState {
    routes: Vec<FakeRoute>,
    requests: Mutex<Vec<RecordedRequest>>,
}

pub struct FakeUpstream {
    pub base_url: String,
    state: Arc<FakeState>,
    task: JoinHandle<()>,
}

impl FakeUpstream {
    pub async fn start(routes: Vec<FakeRoute>) -> Self {
        let state = Arc::new(FakeState {
            routes,
            requests: Mutex::new(Vec::new()),
        });

        let app = Router::new().fallback(respond).with_state(state.clone());
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let task = tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        Self {
            base_url: format!("http://{}", addr),
            state,
            task,
        }
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.state.requests.lock().clone()
    }

    pub fn requests_to(&self, path: &str) -> Vec<RecordedRequest> {
        self.requests().into_iter().filter(|r| r.path == path).collect()
    }
}

impl Drop for FakeUpstream {
    fn drop(&mut self) {
        self.task.abort();
    }
}

async fn respond(
    State(state): State<Arc<FakeState>>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: String,
) -> Response {
    state.requests.lock().push(RecordedRequest {
        method: method.to_string(),
        path: uri.path().to_string(),
        headers: headers
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_str().unwrap_or_default().to_string()))
            .collect(),
        body,
    });

    let route = state
        .routes
        .iter()
        .find(|r| r.method == method && r.path == uri.path())
        .cloned();

    match route {
        Some(route) => {
            if let Some(delay) = route.delay {
                tokio::time::sleep(delay).await;
            }
            (
                route.status,
                [
                    (header::CONTENT_TYPE, route.content_type),
                    (header::HeaderName::from_static("x-upstream"), "fake".to_string()),
                ],
                route.body,
            )
                .into_response()
        }
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

/// Routes of a local inference server offering `models`
pub fn gateway_routes(models: &[&str]) -> Vec<FakeRoute> {
    let data: Vec<Value> = models
        .iter()
        .map(|id| json!({"id": id, "object": "model", "owned_by": "organization_owner"}))
        .collect();

    vec![
        FakeRoute::json(Method::GET, "/v1/models", json!({"object": "list", "data": data})),
        FakeRoute::json(
            Method::POST,
            "/v1/completions",
            json!({
                "id": "cmpl-1",
                "object": "text_completion",
                "choices": [{"index": 0, "text": " Hello there!", "finish_reason": "stop"}],
                "usage": {"prompt_tokens": 3, "completion_tokens": 4, "total_tokens": 7}
            }),
        ),
        FakeRoute::json(
            Method::POST,
            "/v1/chat/completions",
            json!({
                "id": "chatcmpl-1",
                "object": "chat.completion",
                "choices": [{
                    "index": 0,
                    "message": {"role": "assistant", "content": "Rust is a systems language."},
                    "finish_reason": "stop"
                }],
                "usage": {"prompt_tokens": 9, "completion_tokens": 6, "total_tokens": 15}
            }),
        ),
    ]
}

/// A fake local inference server offering `models`
pub async fn fake_gateway(models: &[&str]) -> FakeUpstream {
    FakeUpstream::start(gateway_routes(models)).await
}
