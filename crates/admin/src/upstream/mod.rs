//! Identity backend client.
//!
//! Provides the authoritative role resolution for every admin page and
//! privileged proxy route, plus the request forwarding the proxy routes use.
//! Each check is a live round-trip - there is deliberately no cache, so a
//! role change on the backend takes effect on the very next request.

mod error;

pub use error::UpstreamError;

use core::fmt;
use std::time::Duration;

use reqwest::header::HeaderValue;
use serde::Deserialize;
use tracing::instrument;
use url::Url;

use inkstone_core::Role;

use crate::models::UpstreamIdentity;

/// Path of the identity backend's current-user endpoint.
const ME_ENDPOINT: &str = "auth/me";

/// HTTP client for the identity/content backend.
#[derive(Clone)]
pub struct BackendClient {
    client: reqwest::Client,
    base_url: Url,
}

impl fmt::Debug for BackendClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BackendClient")
            .field("base_url", &self.base_url.as_str())
            .finish_non_exhaustive()
    }
}

/// Response envelope of the current-user endpoint.
#[derive(Deserialize)]
struct MeResponse {
    user: UpstreamIdentity,
}

impl BackendClient {
    /// Create a client with a bounded total timeout.
    ///
    /// The timeout is what keeps a slow backend from hanging admin pages;
    /// callers treat a timeout as "unauthenticated", never as a fatal error.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be built.
    pub fn new(base_url: Url, timeout: Duration) -> Result<Self, UpstreamError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { client, base_url })
    }

    fn endpoint(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.as_str().trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    /// Ask the backend who the bearer of `token` is.
    ///
    /// # Errors
    ///
    /// [`UpstreamError::Denied`] on any non-2xx status,
    /// [`UpstreamError::Unavailable`] on transport or decode failure.
    #[instrument(skip(self, token))]
    pub async fn current_user(&self, token: &str) -> Result<UpstreamIdentity, UpstreamError> {
        let response = self
            .client
            .get(self.endpoint(ME_ENDPOINT))
            .bearer_auth(token)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(UpstreamError::Denied(status));
        }

        let body: MeResponse = response.json().await?;
        Ok(body.user)
    }

    /// Resolve the live role behind `token`, failing closed.
    ///
    /// Any error - denial, timeout, network failure, a role outside the
    /// closed set - collapses to `None`. `None` means unauthenticated,
    /// never "assume authorized".
    pub async fn resolve_role(&self, token: &str) -> Option<Role> {
        match self.current_user(token).await {
            Ok(identity) => Some(identity.role),
            Err(err) => {
                tracing::debug!(error = %err, "role resolution failed");
                None
            }
        }
    }

    /// Forward a privileged request to the backend with `token` attached as
    /// the bearer credential.
    ///
    /// The token passes through unchanged - it is never re-derived or
    /// re-signed here. A non-2xx answer from the backend is not an error:
    /// the proxy streams it back verbatim.
    ///
    /// # Errors
    ///
    /// [`UpstreamError::Unavailable`] on transport failure only.
    #[instrument(skip(self, body, token), fields(path = %path_and_query))]
    pub async fn forward(
        &self,
        method: reqwest::Method,
        path_and_query: &str,
        content_type: Option<HeaderValue>,
        body: reqwest::Body,
        token: &str,
    ) -> Result<reqwest::Response, UpstreamError> {
        let mut request = self
            .client
            .request(method, self.endpoint(path_and_query))
            .bearer_auth(token)
            .body(body);

        if let Some(content_type) = content_type {
            request = request.header(reqwest::header::CONTENT_TYPE, content_type);
        }

        Ok(request.send().await?)
    }

    /// Reachability probe for the readiness endpoint. Any HTTP answer
    /// (including a 401) counts as reachable.
    pub async fn probe(&self) -> bool {
        self.client
            .get(self.endpoint(ME_ENDPOINT))
            .send()
            .await
            .is_ok()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn client(base: &str) -> BackendClient {
        BackendClient::new(Url::parse(base).unwrap(), Duration::from_secs(1)).unwrap()
    }

    #[test]
    fn test_endpoint_joins_without_double_slash() {
        let c = client("http://backend.internal:4000/");
        assert_eq!(
            c.endpoint("auth/me"),
            "http://backend.internal:4000/auth/me"
        );
        assert_eq!(
            c.endpoint("/api/blogs?page=2"),
            "http://backend.internal:4000/api/blogs?page=2"
        );
    }

    #[test]
    fn test_endpoint_preserves_base_path() {
        let c = client("http://backend.internal:4000/v2");
        assert_eq!(c.endpoint("auth/me"), "http://backend.internal:4000/v2/auth/me");
    }

    #[test]
    fn test_me_response_envelope() {
        let body: MeResponse = serde_json::from_str(
            r#"{"user":{"id":"u-1","role":"admin","email":"admin@inkstone.studio"}}"#,
        )
        .unwrap();
        assert_eq!(body.user.role, Role::Admin);
    }

    #[test]
    fn test_me_response_requires_user_envelope() {
        // A bare identity without the envelope is a decode failure, which
        // the resolver treats as unauthenticated.
        let result = serde_json::from_str::<MeResponse>(
            r#"{"id":"u-1","role":"admin","email":"admin@inkstone.studio"}"#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_debug_omits_client_internals() {
        let c = client("http://backend.internal:4000");
        let debug = format!("{c:?}");
        assert!(debug.contains("backend.internal"));
    }
}
