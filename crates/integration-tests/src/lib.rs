//! Integration test harness for Inkstone.
//!
//! Each test spawns a stub identity/content backend on an ephemeral port,
//! then a gateway wired at it, and drives both over real HTTP.
//!
//! The stub backend reports a fixed role for any bearer token and records
//! how often its endpoints are hit, so tests can assert not just on denied
//! responses but on the absence of forwarded traffic.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::net::SocketAddr;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use axum::{
    Json, Router,
    body::Bytes,
    extract::{Request, State},
    http::{HeaderMap, StatusCode, header},
    response::{IntoResponse, Response},
    routing::{any, get},
};
use secrecy::SecretString;
use serde_json::json;

use inkstone_admin::config::{BackendConfig, GatewayConfig};
use inkstone_admin::routes;
use inkstone_admin::state::AppState;
use inkstone_core::Email;

/// Email the test gateway is configured with.
pub const TEST_ADMIN_EMAIL: &str = "admin@inkstone.studio";

/// Password the test gateway is configured with.
pub const TEST_ADMIN_PASSWORD: &str = "correct-horse-battery-staple";

/// Handle on a running stub backend.
#[derive(Clone)]
pub struct StubBackend {
    /// Address the stub is listening on.
    pub addr: SocketAddr,
    /// Times the current-user endpoint was hit.
    pub me_hits: Arc<AtomicUsize>,
    /// Times any content endpoint was hit (i.e. forwarded proxy calls).
    pub content_hits: Arc<AtomicUsize>,
}

impl StubBackend {
    /// Forwarded proxy calls seen so far.
    #[must_use]
    pub fn forwarded(&self) -> usize {
        self.content_hits.load(Ordering::SeqCst)
    }

    /// Identity checks seen so far.
    #[must_use]
    pub fn identity_checks(&self) -> usize {
        self.me_hits.load(Ordering::SeqCst)
    }
}

#[derive(Clone)]
struct BackendStubState {
    role: &'static str,
    me_hits: Arc<AtomicUsize>,
    content_hits: Arc<AtomicUsize>,
}

/// Spawn a stub identity/content backend that reports `role` for any
/// bearer token.
///
/// # Panics
///
/// Panics if the listener cannot be bound.
pub async fn spawn_backend(role: &'static str) -> StubBackend {
    let me_hits = Arc::new(AtomicUsize::new(0));
    let content_hits = Arc::new(AtomicUsize::new(0));

    let state = BackendStubState {
        role,
        me_hits: Arc::clone(&me_hits),
        content_hits: Arc::clone(&content_hits),
    };

    let app = Router::new()
        .route("/auth/me", get(me))
        .route("/{*path}", any(content))
        .with_state(state);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("failed to bind stub backend");
    let addr = listener.local_addr().expect("stub backend address");

    tokio::spawn(async move {
        axum::serve(listener, app)
            .await
            .expect("stub backend server error");
    });

    StubBackend {
        addr,
        me_hits,
        content_hits,
    }
}

/// Stub current-user endpoint: any bearer token maps to the configured role.
async fn me(State(state): State<BackendStubState>, headers: HeaderMap) -> Response {
    state.me_hits.fetch_add(1, Ordering::SeqCst);

    let bearer = headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "));

    match bearer {
        Some(token) if !token.is_empty() => Json(json!({
            "user": {
                "id": "u-1",
                "role": state.role,
                "email": TEST_ADMIN_EMAIL,
                "displayName": "Stub Admin"
            }
        }))
        .into_response(),
        _ => StatusCode::UNAUTHORIZED.into_response(),
    }
}

/// Stub content endpoint: records the hit and echoes the request back so
/// tests can assert on what was forwarded.
async fn content(State(state): State<BackendStubState>, request: Request) -> Response {
    state.content_hits.fetch_add(1, Ordering::SeqCst);

    let method = request.method().to_string();
    let path = request.uri().path().to_string();
    let query = request.uri().query().unwrap_or("").to_string();
    let authorization = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .unwrap_or("")
        .to_string();
    let body = axum::body::to_bytes(request.into_body(), 64 * 1024)
        .await
        .unwrap_or_else(|_| Bytes::new());

    (
        StatusCode::CREATED,
        Json(json!({
            "method": method,
            "path": path,
            "query": query,
            "authorization": authorization,
            "body": String::from_utf8_lossy(&body),
        })),
    )
        .into_response()
}

/// Spawn a gateway wired at the given backend and return its address.
///
/// # Panics
///
/// Panics if state construction or binding fails.
pub async fn spawn_gateway(backend: SocketAddr) -> SocketAddr {
    let state = AppState::new(test_config(backend)).expect("failed to build gateway state");
    let app = Router::new().merge(routes::routes()).with_state(state);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("failed to bind gateway");
    let addr = listener.local_addr().expect("gateway address");

    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("gateway server error");
    });

    addr
}

fn test_config(backend: SocketAddr) -> GatewayConfig {
    GatewayConfig {
        host: "127.0.0.1".parse().expect("loopback"),
        port: 0,
        base_url: "http://localhost:3001".to_string(),
        session_secret: SecretString::from("mz3vQ8kT1xWj5nRb9cHd7fLp2gYs4uE6"),
        admin_email: Email::parse(TEST_ADMIN_EMAIL).expect("valid test email"),
        admin_password: SecretString::from(TEST_ADMIN_PASSWORD),
        backend: BackendConfig {
            base_url: format!("http://{backend}")
                .parse()
                .expect("valid backend url"),
            timeout: Duration::from_secs(2),
        },
        sentry_dsn: None,
        sentry_environment: None,
        sentry_sample_rate: 1.0,
        sentry_traces_sample_rate: 1.0,
        tls: None,
    }
}
