//! Unified error handling for the admin gateway.
//!
//! Every error kind collapses to a binary allow/deny plus a generic message
//! at the HTTP boundary. The detailed kinds exist for internal logging only
//! and must never reach a response body where they could aid credential
//! guessing or token forgery.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::auth::AuthError;
use crate::upstream::UpstreamError;

/// Application-level error type for the admin gateway.
#[derive(Debug, Error)]
pub enum AppError {
    /// Caller is not authenticated or not authorized for the admin surface.
    #[error("unauthorized")]
    Unauthorized,

    /// Bad request from client.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// The backend could not be reached for a proxied call.
    #[error("Upstream error: {0}")]
    Upstream(#[from] UpstreamError),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<AuthError> for AppError {
    fn from(err: AuthError) -> Self {
        // The kind goes to the log; the wire sees only the opaque 401.
        tracing::debug!(error = %err, "authentication failure");
        Self::Unauthorized
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Log server-side failures with Sentry
        if matches!(self, Self::Internal(_) | Self::Upstream(_)) {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Admin gateway request error"
            );
        }

        let status = match &self {
            Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Upstream(_) => StatusCode::BAD_GATEWAY,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        // Don't expose internal error details to clients
        let message = match &self {
            Self::Unauthorized => "unauthorized".to_string(),
            Self::Upstream(_) => "upstream error".to_string(),
            Self::Internal(_) => "internal server error".to_string(),
            Self::BadRequest(_) => self.to_string(),
        };

        (status, message).into_response()
    }
}
