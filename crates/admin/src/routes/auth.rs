//! Authentication route handlers for the admin gateway.
//!
//! Local login/logout for the single configured admin identity, plus a
//! session probe the admin UI can poll without touching the backend.

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    routing::{get, post},
};
use axum_extra::extract::cookie::CookieJar;
use serde::Deserialize;

use crate::error::AppError;
use crate::state::AppState;
use crate::{auth, session};

/// Login request body.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    /// Submitted email.
    pub email: String,
    /// Submitted password.
    pub password: String,
}

/// Build the auth router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/auth/login", post(login))
        .route("/auth/logout", post(logout))
        .route("/auth/session", get(session_probe))
}

/// Mint the signed session cookie.
///
/// POST /auth/login
///
/// The success body never carries the token - the cookie is the only
/// transport. Failure is a uniform 401 regardless of which factor was
/// wrong.
async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(body): Json<LoginRequest>,
) -> Result<(CookieJar, StatusCode), AppError> {
    let token = state.gate().login(&body.email, &body.password)?;
    tracing::info!("admin login succeeded");

    let cookie = session::session_cookie(token.into_inner(), state.cookies_secure());
    Ok((jar.add(cookie), StatusCode::NO_CONTENT))
}

/// Clear the session cookie.
///
/// POST /auth/logout
///
/// Always succeeds, session or not. With no server-side token registry,
/// overwriting the cookie with `Max-Age=0` is the revocation; a token
/// string captured before logout stays verifiable until the cookie's
/// natural expiry or a key rotation.
async fn logout(jar: CookieJar) -> (CookieJar, StatusCode) {
    (jar.add(session::expired_cookie()), StatusCode::NO_CONTENT)
}

/// Local signature check of the session cookie.
///
/// GET /auth/session
///
/// Lets the admin UI decide whether to render the login form without a
/// backend round-trip. Grants nothing: every privileged operation still
/// resolves the caller's role upstream.
async fn session_probe(State(state): State<AppState>, jar: CookieJar) -> StatusCode {
    let Some(token) = session::read_token(&jar) else {
        return StatusCode::UNAUTHORIZED;
    };

    match auth::token::decode(&token) {
        Ok((nonce, signature)) if state.signer().verify(nonce, signature) => {
            StatusCode::NO_CONTENT
        }
        _ => StatusCode::UNAUTHORIZED,
    }
}
