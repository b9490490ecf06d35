// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared test infrastructure: a scripted mock of the upstream token and MPSK
//! endpoints, plus config/credential builders.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use axum::extract::State;
use axum::http::{HeaderMap, Method, StatusCode, Uri};
use axum::routing::{any, post};
use axum::Router;
use parking_lot::Mutex;
use tokio::net::TcpListener;

use crate::config::PanelConfig;
use crate::credential::Credential;

/// A request received by the mock MPSK resource endpoint.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: String,
    pub path: String,
    pub query: String,
    pub authorization: Option<String>,
    pub body: serde_json::Value,
}

/// Scripted responses: the nth call gets the nth entry, then the last repeats.
struct Script {
    responses: Vec<(u16, String)>,
    calls: AtomicUsize,
}

impl Script {
    fn new(responses: Vec<(u16, String)>) -> Self {
        Self { responses, calls: AtomicUsize::new(0) }
    }

    fn next(&self) -> (StatusCode, String) {
        let idx = self.calls.fetch_add(1, Ordering::Relaxed);
        let (status, body) = self
            .responses
            .get(idx)
            .or_else(|| self.responses.last())
            .cloned()
            .unwrap_or((500, "{}".to_owned()));
        (StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR), body)
    }
}

struct MockState {
    token: Script,
    resource: Script,
    token_forms: Mutex<Vec<String>>,
    resource_requests: Mutex<Vec<RecordedRequest>>,
}

/// In-process stand-in for the upstream API, bound to `127.0.0.1:0`.
pub struct MockUpstream {
    addr: SocketAddr,
    state: Arc<MockState>,
}

impl MockUpstream {
    /// Start a mock serving `token` responses on `POST /oauth2/token` and
    /// `resource` responses on any method under `/cloudAuth/api/v2/mpsk/`.
    pub async fn start(
        token: Vec<(u16, String)>,
        resource: Vec<(u16, String)>,
    ) -> anyhow::Result<Self> {
        let state = Arc::new(MockState {
            token: Script::new(token),
            resource: Script::new(resource),
            token_forms: Mutex::new(Vec::new()),
            resource_requests: Mutex::new(Vec::new()),
        });

        let app = Router::new()
            .route("/oauth2/token", post(token_handler))
            .route("/cloudAuth/api/v2/mpsk/{*rest}", any(resource_handler))
            .with_state(Arc::clone(&state));

        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        tokio::spawn(async move {
            axum::serve(listener, app).await.ok();
        });

        Ok(Self { addr, state })
    }

    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn token_url(&self) -> String {
        format!("http://{}/oauth2/token", self.addr)
    }

    pub fn token_calls(&self) -> usize {
        self.state.token_forms.lock().len()
    }

    /// Raw form bodies posted to the token endpoint, in order.
    pub fn token_forms(&self) -> Vec<String> {
        self.state.token_forms.lock().clone()
    }

    pub fn resource_requests(&self) -> Vec<RecordedRequest> {
        self.state.resource_requests.lock().clone()
    }
}

async fn token_handler(State(s): State<Arc<MockState>>, body: String) -> (StatusCode, String) {
    s.token_forms.lock().push(body);
    s.token.next()
}

async fn resource_handler(
    State(s): State<Arc<MockState>>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: String,
) -> (StatusCode, String) {
    let authorization =
        headers.get("authorization").and_then(|v| v.to_str().ok()).map(str::to_owned);
    s.resource_requests.lock().push(RecordedRequest {
        method: method.to_string(),
        path: uri.path().to_owned(),
        query: uri.query().unwrap_or_default().to_owned(),
        authorization,
        body: serde_json::from_str(&body).unwrap_or(serde_json::Value::Null),
    });
    s.resource.next()
}

/// JSON body of a successful token response.
pub fn token_body(access_token: &str, expires_in: u64, refresh_token: Option<&str>) -> String {
    let mut body = serde_json::json!({
        "access_token": access_token,
        "expires_in": expires_in,
        "token_type": "bearer",
    });
    if let Some(rt) = refresh_token {
        body["refresh_token"] = serde_json::Value::String(rt.to_owned());
    }
    body.to_string()
}

pub fn test_credential(refresh_token: &str) -> Credential {
    Credential {
        client_id: "client-1".to_owned(),
        client_secret: "secret-1".to_owned(),
        refresh_token: refresh_token.to_owned(),
    }
}

/// Panel config pointing at `base_url` with file output disabled.
pub fn test_config(base_url: &str) -> PanelConfig {
    PanelConfig {
        host: "127.0.0.1".into(),
        port: 0,
        group: "g1".into(),
        api_base: base_url.to_owned(),
        token_url: None,
        credentials: PathBuf::from(".env"),
        audit_log: None,
        list_limit: 50,
        http_timeout_secs: Some(5),
        log_format: "text".into(),
        log_level: "debug".into(),
    }
}
