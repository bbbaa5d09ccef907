//! Mock forum API server for integration tests.

#![allow(dead_code)]

use axum::body::Body;
use axum::extract::State;
use axum::http::{Request, Response, StatusCode};
use axum::routing::any;
use axum::Router;
use std::collections::{HashMap, VecDeque};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::Mutex;

/// A captured request for assertions.
#[derive(Debug, Clone)]
pub struct CapturedRequest {
    pub method: String,
    pub path: String,
    pub query: Option<String>,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

impl CapturedRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    pub fn bearer(&self) -> Option<&str> {
        self.header("authorization")?.strip_prefix("Bearer ")
    }

    pub fn json(&self) -> serde_json::Value {
        serde_json::from_slice(&self.body).expect("request body is not JSON")
    }

    /// Body with the multipart boundary replaced by a fixed marker, so two
    /// encodings of the same form compare equal.
    pub fn normalized_multipart(&self) -> Option<String> {
        let boundary = self
            .header("content-type")?
            .strip_prefix("multipart/form-data; boundary=")?;
        Some(String::from_utf8_lossy(&self.body).replace(boundary, "BOUNDARY"))
    }

    pub fn is(&self, method: &str, path: &str) -> bool {
        self.method == method && self.path == path
    }
}

/// A mock response to return.
#[derive(Debug, Clone)]
pub struct MockResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
    pub delay_ms: u64,
}

impl Default for MockResponse {
    fn default() -> Self {
        Self {
            status: 200,
            headers: vec![("content-type".to_string(), "application/json".to_string())],
            body: br#"{"ok": true}"#.to_vec(),
            delay_ms: 0,
        }
    }
}

impl MockResponse {
    pub fn json(body: &str) -> Self {
        Self {
            body: body.as_bytes().to_vec(),
            ..Self::default()
        }
    }

    pub fn value(body: serde_json::Value) -> Self {
        Self::json(&body.to_string())
    }

    pub fn error(status: u16, message: &str) -> Self {
        Self {
            status,
            body: format!(r#"{{"message": "{}"}}"#, message).into_bytes(),
            ..Self::default()
        }
    }

    /// 401 carrying the API's token-expired discriminator.
    pub fn token_expired() -> Self {
        Self {
            status: 401,
            body: br#"{"type": "token expired", "message": "jwt expired"}"#.to_vec(),
            ..Self::default()
        }
    }

    /// Successful refresh exchange returning `token`.
    pub fn refreshed(token: &str) -> Self {
        Self::value(serde_json::json!({ "accessToken": token }))
    }

    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        self.headers.push((name.to_string(), value.to_string()));
        self
    }

    pub fn with_delay(mut self, ms: u64) -> Self {
        self.delay_ms = ms;
        self
    }
}

#[derive(Default)]
struct Route {
    queue: VecDeque<MockResponse>,
    always: Option<MockResponse>,
}

#[derive(Clone)]
struct MockState {
    requests: Arc<Mutex<Vec<CapturedRequest>>>,
    routes: Arc<Mutex<HashMap<String, Route>>>,
    responses: Arc<Mutex<VecDeque<MockResponse>>>,
    accepted_token: Arc<Mutex<Option<String>>>,
}

/// Mock backend server for testing.
pub struct MockBackend {
    pub addr: SocketAddr,
    state: MockState,
    shutdown: tokio::sync::watch::Sender<bool>,
}

impl MockBackend {
    /// Start a new mock backend server.
    pub async fn start() -> Self {
        let state = MockState {
            requests: Arc::new(Mutex::new(Vec::new())),
            routes: Arc::new(Mutex::new(HashMap::new())),
            responses: Arc::new(Mutex::new(VecDeque::new())),
            accepted_token: Arc::new(Mutex::new(None)),
        };

        let (shutdown_tx, mut shutdown_rx) = tokio::sync::watch::channel(false);

        let app = Router::new()
            .route("/{*path}", any(handle_request))
            .with_state(state.clone());

        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind mock server");
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async move {
                    let _ = shutdown_rx.changed().await;
                })
                .await
                .ok();
        });

        // Wait for server to be ready
        tokio::time::sleep(tokio::time::Duration::from_millis(10)).await;

        Self {
            addr,
            state,
            shutdown: shutdown_tx,
        }
    }

    /// Enqueue a response for the next request that matches no route.
    pub async fn enqueue_response(&self, resp: MockResponse) {
        self.state.responses.lock().await.push_back(resp);
    }

    /// Enqueue a one-shot response for `"METHOD /path"`.
    pub async fn route(&self, key: &str, resp: MockResponse) {
        self.state
            .routes
            .lock()
            .await
            .entry(key.to_string())
            .or_default()
            .queue
            .push_back(resp);
    }

    /// Answer every request to `"METHOD /path"` with `resp` once its
    /// one-shot queue is drained.
    pub async fn route_always(&self, key: &str, resp: MockResponse) {
        self.state
            .routes
            .lock()
            .await
            .entry(key.to_string())
            .or_default()
            .always = Some(resp);
    }

    /// Reject requests outside `/auth` whose bearer token is not `token`
    /// with a token-expired 401.
    pub async fn accept_only_token(&self, token: &str) {
        *self.state.accepted_token.lock().await = Some(token.to_string());
    }

    /// Get all captured requests.
    pub async fn captured_requests(&self) -> Vec<CapturedRequest> {
        self.state.requests.lock().await.clone()
    }

    /// Number of captured requests to `path` with `method`.
    pub async fn count(&self, method: &str, path: &str) -> usize {
        self.state
            .requests
            .lock()
            .await
            .iter()
            .filter(|r| r.is(method, path))
            .count()
    }

    /// Get the base URL for this mock server.
    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Clear captured requests and queued responses.
    pub async fn clear(&self) {
        self.state.requests.lock().await.clear();
        self.state.routes.lock().await.clear();
        self.state.responses.lock().await.clear();
    }
}

impl Drop for MockBackend {
    fn drop(&mut self) {
        let _ = self.shutdown.send(true);
    }
}

async fn handle_request(State(state): State<MockState>, req: Request<Body>) -> Response<Body> {
    let method = req.method().to_string();
    let path = req.uri().path().to_string();
    let query = req.uri().query().map(str::to_string);
    let headers: Vec<(String, String)> = req
        .headers()
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_str().unwrap_or("").to_string()))
        .collect();

    let body_bytes = axum::body::to_bytes(req.into_body(), 4 * 1024 * 1024)
        .await
        .unwrap_or_default()
        .to_vec();

    let captured = CapturedRequest {
        method,
        path,
        query,
        headers,
        body: body_bytes,
    };
    state.requests.lock().await.push(captured.clone());

    let mock_resp = next_response(&state, &captured).await;

    if mock_resp.delay_ms > 0 {
        tokio::time::sleep(tokio::time::Duration::from_millis(mock_resp.delay_ms)).await;
    }

    let mut builder = Response::builder().status(StatusCode::from_u16(mock_resp.status).unwrap());
    for (name, value) in mock_resp.headers {
        builder = builder.header(name, value);
    }
    builder.body(Body::from(mock_resp.body)).unwrap()
}

async fn next_response(state: &MockState, req: &CapturedRequest) -> MockResponse {
    if !req.path.starts_with("/auth/") {
        if let Some(accepted) = state.accepted_token.lock().await.as_deref() {
            if req.bearer() != Some(accepted) {
                return MockResponse::token_expired();
            }
        }
    }

    let key = format!("{} {}", req.method, req.path);
    if let Some(route) = state.routes.lock().await.get_mut(&key) {
        if let Some(resp) = route.queue.pop_front().or_else(|| route.always.clone()) {
            return resp;
        }
    }

    state
        .responses
        .lock()
        .await
        .pop_front()
        .unwrap_or_default()
}
