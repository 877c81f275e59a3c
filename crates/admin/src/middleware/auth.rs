//! Authentication extractors for the admin gateway.
//!
//! Two gates over the same session cookie:
//!
//! - [`RequireAdmin`] is authoritative. Privileged API routes use it; any
//!   denial is a bare 401 and nothing is forwarded.
//! - [`AdminPage`] is advisory. Server-rendered admin screens use it to
//!   redirect visitors away before any admin chrome renders; it controls
//!   visibility only and grants no data access.
//!
//! Both run the local fast-fail screen first (a forged local cookie never
//! generates backend traffic) and then ask the identity backend, which is
//! the single authority on roles. Checks are live per request; there is no
//! cache to go stale.

use axum::{
    extract::{FromRef, FromRequestParts},
    http::{StatusCode, request::Parts},
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::cookie::CookieJar;

use inkstone_core::Role;

use crate::models::UpstreamIdentity;
use crate::state::AppState;
use crate::{auth, session};

/// What a privileged handler needs: the live-verified role and the token to
/// attach when forwarding. The token passes through unchanged.
#[derive(Debug, Clone)]
pub struct AdminContext {
    /// Role the backend reported for this request.
    pub role: Role,
    /// The bearer credential as read from the cookie.
    pub token: String,
}

/// Extractor that authoritatively requires the admin role.
///
/// # Example
///
/// ```rust,ignore
/// async fn privileged_handler(
///     RequireAdmin(ctx): RequireAdmin,
/// ) -> impl IntoResponse {
///     format!("acting as {}", ctx.role)
/// }
/// ```
pub struct RequireAdmin(pub AdminContext);

/// Rejection for the API surface: a 401 with no detail, whatever the cause.
pub struct ApiRejection;

impl IntoResponse for ApiRejection {
    fn into_response(self) -> Response {
        (StatusCode::UNAUTHORIZED, "unauthorized").into_response()
    }
}

impl<S> FromRequestParts<S> for RequireAdmin
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = ApiRejection;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let state = AppState::from_ref(state);
        let jar = CookieJar::from_headers(&parts.headers);

        let Some(token) = session::read_token(&jar) else {
            return Err(ApiRejection);
        };

        if let Err(err) = auth::screen_token(state.signer(), &token) {
            tracing::debug!(error = %err, "session cookie rejected before upstream check");
            return Err(ApiRejection);
        }

        match state.backend().resolve_role(&token).await {
            Some(role) if role.is_admin() => Ok(Self(AdminContext { role, token })),
            Some(role) => {
                // Authenticated but insufficient: same hard denial on the API.
                tracing::debug!(%role, "role not allowed on the admin surface");
                Err(ApiRejection)
            }
            None => Err(ApiRejection),
        }
    }
}

/// Extractor that advisorily gates a server-rendered admin page.
///
/// Unauthenticated visitors are sent to the login page; authenticated
/// visitors without the admin role are sent back to the site root.
pub struct AdminPage(pub UpstreamIdentity);

/// Rejection for admin pages: a redirect, never an error page.
pub enum PageRejection {
    /// No usable session - go log in.
    RedirectToLogin,
    /// Live identity, wrong role - back to the public site.
    RedirectHome,
}

impl IntoResponse for PageRejection {
    fn into_response(self) -> Response {
        match self {
            Self::RedirectToLogin => Redirect::to("/auth/login").into_response(),
            Self::RedirectHome => Redirect::to("/").into_response(),
        }
    }
}

impl<S> FromRequestParts<S> for AdminPage
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = PageRejection;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let state = AppState::from_ref(state);
        let jar = CookieJar::from_headers(&parts.headers);

        let Some(token) = session::read_token(&jar) else {
            return Err(PageRejection::RedirectToLogin);
        };

        if let Err(err) = auth::screen_token(state.signer(), &token) {
            tracing::debug!(error = %err, "session cookie rejected before upstream check");
            return Err(PageRejection::RedirectToLogin);
        }

        match state.backend().current_user(&token).await {
            Ok(identity) if identity.role.is_admin() => Ok(Self(identity)),
            Ok(identity) => {
                tracing::debug!(role = %identity.role, "admin page refused for non-admin role");
                Err(PageRejection::RedirectHome)
            }
            Err(err) => {
                // Backend denial, timeout, or outage all read as signed out.
                tracing::debug!(error = %err, "identity resolution failed for admin page");
                Err(PageRejection::RedirectToLogin)
            }
        }
    }
}
