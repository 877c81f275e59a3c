//! Identity backend error types.

use thiserror::Error;

/// Errors from the identity backend client.
///
/// Callers on the authorization path collapse every variant to
/// "unauthenticated" - the backend being down never grants access.
#[derive(Debug, Error)]
pub enum UpstreamError {
    /// The backend answered the identity check with a non-2xx status.
    #[error("identity backend denied the token (status {0})")]
    Denied(reqwest::StatusCode),

    /// Timeout, network failure, or a body that did not decode.
    #[error("identity backend unavailable: {0}")]
    Unavailable(#[from] reqwest::Error),
}
