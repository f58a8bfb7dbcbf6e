//! Fake suggestion API server for integration tests.
//!
//! Spins up a minimal `axum` HTTP server on a random TCP port bound to
//! 127.0.0.1. Serves `GET /api/v1/resources/mesh`, records every request's
//! query parameters and `Accept` header, and answers with a configurable
//! status and body. Individual terms can be given their own response or an
//! artificial delay to force completions out of order.
//!
//! # Example
//!
//! ```rust,no_run
//! let api = FakeSuggestApi::start().await.unwrap();
//! api.respond_with(200, PAIN_BODY).await;
//! // Point the client at api.base_url()
//! ```

use axum::{
    extract::{Query, State},
    http::{header, HeaderMap, StatusCode},
    response::IntoResponse,
    routing::get,
    Router,
};
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::Mutex;

pub const SUGGEST_PATH: &str = "/api/v1/resources/mesh";

/// One request as the server saw it.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    /// Decoded query parameters in the order they were sent.
    pub params: Vec<(String, String)>,
    pub accept: Option<String>,
}

impl RecordedRequest {
    pub fn param(&self, key: &str) -> Option<&str> {
        self.params.iter().find(|(k, _)| k == key).map(|(_, v)| v.as_str())
    }
}

#[derive(Clone)]
struct Reply {
    status: u16,
    body: String,
}

/// State shared between the router and test code.
struct ApiState {
    requests: Vec<RecordedRequest>,
    default_reply: Reply,
    /// Per-term replies, overriding the default.
    replies: HashMap<String, Reply>,
    /// Per-term delay before answering.
    delays: HashMap<String, Duration>,
}

impl Default for ApiState {
    fn default() -> Self {
        Self {
            requests: Vec::new(),
            default_reply: Reply { status: 200, body: super::fixtures::EMPTY_BODY.to_string() },
            replies: HashMap::new(),
            delays: HashMap::new(),
        }
    }
}

/// Handle to the running fake suggestion server.
pub struct FakeSuggestApi {
    addr: SocketAddr,
    state: Arc<Mutex<ApiState>>,
}

impl FakeSuggestApi {
    /// Start the server on a random port. Returns once it is listening.
    pub async fn start() -> std::io::Result<Self> {
        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        let state = Arc::new(Mutex::new(ApiState::default()));

        let app = Router::new()
            .route(SUGGEST_PATH, get(suggest))
            .with_state(state.clone());

        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        // Give the task a moment to register.
        tokio::time::sleep(Duration::from_millis(5)).await;

        Ok(Self { addr, state })
    }

    /// Base URL for the API (e.g. `http://127.0.0.1:PORT`).
    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Answer every request without a per-term reply with `status` and `body`.
    pub async fn respond_with(&self, status: u16, body: &str) {
        self.state.lock().await.default_reply = Reply { status, body: body.to_string() };
    }

    /// Answer requests for exactly `term` with `status` and `body`.
    pub async fn respond_to(&self, term: &str, status: u16, body: &str) {
        self.state
            .lock()
            .await
            .replies
            .insert(term.to_string(), Reply { status, body: body.to_string() });
    }

    /// Hold requests for exactly `term` for `delay` before answering.
    pub async fn delay(&self, term: &str, delay: Duration) {
        self.state.lock().await.delays.insert(term.to_string(), delay);
    }

    /// Every request received so far, oldest first.
    pub async fn requests(&self) -> Vec<RecordedRequest> {
        self.state.lock().await.requests.clone()
    }
}

// ---------------------------------------------------------------------------
// Route handlers
// ---------------------------------------------------------------------------

async fn suggest(
    State(state): State<Arc<Mutex<ApiState>>>,
    Query(params): Query<Vec<(String, String)>>,
    headers: HeaderMap,
) -> impl IntoResponse {
    let term = params
        .iter()
        .find(|(k, _)| k == "term")
        .map(|(_, v)| v.clone())
        .unwrap_or_default();

    let (reply, delay) = {
        let mut state = state.lock().await;
        state.requests.push(RecordedRequest {
            params: params.clone(),
            accept: headers
                .get(header::ACCEPT)
                .and_then(|v| v.to_str().ok())
                .map(str::to_string),
        });
        let reply = state.replies.get(&term).cloned().unwrap_or_else(|| state.default_reply.clone());
        (reply, state.delays.get(&term).copied())
    };

    if let Some(delay) = delay {
        tokio::time::sleep(delay).await;
    }

    let status = StatusCode::from_u16(reply.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (status, [(header::CONTENT_TYPE, "application/json")], reply.body)
}
