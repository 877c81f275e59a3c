//! Application state shared across handlers.
//!
//! Everything in here is read-only after startup; requests share it through
//! an `Arc` and never coordinate. Secret rotation is a new process with a
//! new key, not a runtime write.

use std::sync::Arc;

use crate::auth::{AdminCredentials, CredentialGate, Signer};
use crate::config::GatewayConfig;
use crate::upstream::{BackendClient, UpstreamError};

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: GatewayConfig,
    signer: Signer,
    gate: CredentialGate,
    backend: BackendClient,
}

impl AppState {
    /// Build state from configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend HTTP client cannot be constructed.
    pub fn new(config: GatewayConfig) -> Result<Self, UpstreamError> {
        let signer = Signer::new(config.session_secret.clone());
        let gate = CredentialGate::new(
            AdminCredentials {
                email: config.admin_email.clone(),
                password: config.admin_password.clone(),
            },
            signer.clone(),
        );
        let backend = BackendClient::new(config.backend.base_url.clone(), config.backend.timeout)?;

        Ok(Self {
            inner: Arc::new(AppStateInner {
                config,
                signer,
                gate,
                backend,
            }),
        })
    }

    /// The loaded gateway configuration.
    #[must_use]
    pub fn config(&self) -> &GatewayConfig {
        &self.inner.config
    }

    /// The session token signer/verifier.
    #[must_use]
    pub fn signer(&self) -> &Signer {
        &self.inner.signer
    }

    /// The local credential gate.
    #[must_use]
    pub fn gate(&self) -> &CredentialGate {
        &self.inner.gate
    }

    /// The identity/content backend client.
    #[must_use]
    pub fn backend(&self) -> &BackendClient {
        &self.inner.backend
    }

    /// Whether session cookies should carry the `Secure` attribute.
    #[must_use]
    pub fn cookies_secure(&self) -> bool {
        self.inner.config.cookies_secure()
    }
}
