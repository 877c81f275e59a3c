//! HTTP route handlers for the admin gateway.
//!
//! # Route Structure
//!
//! ```text
//! # Auth (local credential gate)
//! POST /auth/login             - Mint the signed session cookie
//! POST /auth/logout            - Clear the session cookie (always succeeds)
//! GET  /auth/session           - Local signature probe (grants nothing)
//!
//! # Admin screens (advisory gate, redirects)
//! GET  /admin                  - Dashboard shell
//!
//! # Privileged proxy (authoritative gate, 401s)
//! ANY  /api/admin/{*path}      - Forward to the backend with the bearer token
//! ```

pub mod auth;
pub mod pages;
pub mod proxy;

use axum::Router;

use crate::state::AppState;

/// Assemble every route group.
pub fn routes() -> Router<AppState> {
    Router::new()
        .merge(auth::router())
        .merge(pages::router())
        .merge(proxy::router())
}
