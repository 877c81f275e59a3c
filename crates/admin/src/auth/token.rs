//! Session token codec.
//!
//! A token is `nonce:signature`. Both halves are lowercase hex produced by
//! components in this crate, so the delimiter can never occur inside either
//! part - that contract is guaranteed by construction, not validated here.
//! Backend-issued bearer tokens never contain `:` either, which makes the
//! delimiter double as the discriminator between local and forwarded tokens.

use core::fmt;

use thiserror::Error;

/// Delimiter between the nonce and the signature.
pub const TOKEN_DELIMITER: char = ':';

/// Errors that can occur when decoding a [`SessionToken`] string.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum TokenError {
    /// The delimiter is absent, or one side of it is empty.
    #[error("token is not in nonce:signature form")]
    Malformed,
}

/// An opaque admin session token in `nonce:signature` form.
///
/// Possession is the whole credential (capability token): nothing about the
/// holder is encoded in it, and expiry lives in the cookie attributes, not
/// in the token itself.
#[derive(Clone, PartialEq, Eq)]
pub struct SessionToken(String);

impl SessionToken {
    /// Returns the token as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the token and returns its inner string.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Debug for SessionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("SessionToken").field(&"[REDACTED]").finish()
    }
}

/// Join a nonce and its signature into a token.
#[must_use]
pub fn encode(nonce: &str, signature: &str) -> SessionToken {
    SessionToken(format!("{nonce}{TOKEN_DELIMITER}{signature}"))
}

/// Split a token back into `(nonce, signature)`.
///
/// Splits on the first occurrence of the delimiter.
///
/// # Errors
///
/// Returns [`TokenError::Malformed`] if the delimiter is absent or either
/// part is empty.
pub fn decode(token: &str) -> Result<(&str, &str), TokenError> {
    let (nonce, signature) = token
        .split_once(TOKEN_DELIMITER)
        .ok_or(TokenError::Malformed)?;

    if nonce.is_empty() || signature.is_empty() {
        return Err(TokenError::Malformed);
    }

    Ok((nonce, signature))
}

/// Whether a cookie-borne value is in local `nonce:signature` form, as
/// opposed to a backend-issued bearer token carried by a legacy cookie.
#[must_use]
pub fn has_local_form(token: &str) -> bool {
    token.contains(TOKEN_DELIMITER)
}
