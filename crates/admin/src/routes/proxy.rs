//! Privileged API proxy to the content backend.
//!
//! Every request is independently authorized against the identity backend
//! before anything is forwarded. On success the original method, query and
//! body go upstream with the session token attached as the bearer
//! credential, and the backend's status and body stream back verbatim -
//! nothing is reinterpreted on the way through.

use axum::{
    Router,
    body::Body,
    extract::{Path, Request, State},
    http::header,
    response::Response,
    routing::any,
};

use crate::error::AppError;
use crate::middleware::RequireAdmin;
use crate::state::AppState;

/// Build the proxy router.
pub fn router() -> Router<AppState> {
    Router::new().route("/api/admin/{*path}", any(forward))
}

/// Forward a privileged request to the backend.
///
/// ANY /api/admin/{*path}
async fn forward(
    State(state): State<AppState>,
    Path(path): Path<String>,
    RequireAdmin(ctx): RequireAdmin,
    request: Request,
) -> Result<Response, AppError> {
    let path_and_query = match request.uri().query() {
        Some(query) => format!("{path}?{query}"),
        None => path,
    };

    let method = request.method().clone();
    let content_type = request.headers().get(header::CONTENT_TYPE).cloned();
    let body = reqwest::Body::wrap_stream(request.into_body().into_data_stream());

    let upstream = state
        .backend()
        .forward(method, &path_and_query, content_type, body, &ctx.token)
        .await?;

    let status = upstream.status();
    let upstream_content_type = upstream.headers().get(header::CONTENT_TYPE).cloned();

    let mut response = Response::builder().status(status);
    if let Some(content_type) = upstream_content_type {
        response = response.header(header::CONTENT_TYPE, content_type);
    }

    response
        .body(Body::from_stream(upstream.bytes_stream()))
        .map_err(|e| AppError::Internal(e.to_string()))
}
