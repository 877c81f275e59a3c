//! Admin authentication error types.

use thiserror::Error;

/// Errors that can occur during admin authentication operations.
///
/// At the HTTP boundary every variant collapses to the same opaque 401; the
/// distinctions exist for internal logging only.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum AuthError {
    /// Login attempt failed. The message is deliberately uniform: callers
    /// must not be able to tell a wrong email from a wrong password.
    #[error("invalid credentials")]
    InvalidCredentials,

    /// Token does not parse into nonce + signature.
    #[error("malformed session token")]
    MalformedToken,

    /// Signature does not match the recomputed value.
    #[error("invalid session token signature")]
    InvalidSignature,
}
