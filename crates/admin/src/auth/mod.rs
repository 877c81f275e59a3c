//! Admin authentication service.
//!
//! The local credential gate mints stateless signed session tokens for the
//! single configured admin identity. It is the only token issuer in this
//! repository; authorization on every privileged operation is decided by the
//! upstream resolver, with local signature verification acting purely as a
//! fast-fail screen in front of it.

mod error;
pub mod signer;
pub mod token;

pub use error::AuthError;
pub use signer::Signer;
pub use token::SessionToken;

use core::fmt;

use inkstone_core::Email;
use secrecy::{ExposeSecret, SecretString};

use self::signer::{constant_time_eq, mint_nonce};

/// The single configured admin identity.
///
/// Built once by the bootstrap layer from `ADMIN_EMAIL` / `ADMIN_PASSWORD`
/// and injected here; business logic never reads ambient process state.
pub struct AdminCredentials {
    /// Configured admin email.
    pub email: Email,
    /// Configured admin password.
    pub password: SecretString,
}

impl fmt::Debug for AdminCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AdminCredentials")
            .field("email", &self.email)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

/// Mints session tokens for the configured admin identity.
///
/// No attempt counter, no lockout: rate limiting belongs to the reverse
/// proxy in front of this gateway.
#[derive(Debug)]
pub struct CredentialGate {
    credentials: AdminCredentials,
    signer: Signer,
}

impl CredentialGate {
    /// Create a gate over the injected credentials and signer.
    #[must_use]
    pub const fn new(credentials: AdminCredentials, signer: Signer) -> Self {
        Self {
            credentials,
            signer,
        }
    }

    /// Check submitted credentials and mint a fresh session token.
    ///
    /// Both factors are compared unconditionally and constant-time, so a
    /// wrong email costs the same as a wrong password.
    ///
    /// # Errors
    ///
    /// Returns the single uniform [`AuthError::InvalidCredentials`] on any
    /// mismatch.
    pub fn login(&self, email: &str, password: &str) -> Result<SessionToken, AuthError> {
        let email_ok = constant_time_eq(email.as_bytes(), self.credentials.email.as_bytes());
        let password_ok = constant_time_eq(
            password.as_bytes(),
            self.credentials.password.expose_secret().as_bytes(),
        );

        if !(email_ok & password_ok) {
            return Err(AuthError::InvalidCredentials);
        }

        let nonce = mint_nonce();
        let signature = self.signer.sign(&nonce);
        Ok(token::encode(&nonce, &signature))
    }
}

/// Screen a cookie-borne token against the local signer.
///
/// Applies only to tokens in local `nonce:signature` form; a backend-issued
/// bearer token carried by a legacy cookie passes through untouched - the
/// upstream resolver is the authority either way. A local-form token that
/// fails to decode or verify is rejected here, before any backend traffic.
///
/// # Errors
///
/// [`AuthError::MalformedToken`] or [`AuthError::InvalidSignature`]; the
/// two are treated identically by every caller.
pub fn screen_token(signer: &Signer, token_value: &str) -> Result<(), AuthError> {
    if !token::has_local_form(token_value) {
        return Ok(());
    }

    let (nonce, signature) =
        token::decode(token_value).map_err(|_| AuthError::MalformedToken)?;

    if signer.verify(nonce, signature) {
        Ok(())
    } else {
        Err(AuthError::InvalidSignature)
    }
}
