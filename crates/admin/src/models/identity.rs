//! Identity types returned by the upstream backend.

use serde::{Deserialize, Serialize};

use inkstone_core::{Email, Role};

/// The caller's identity as reported by the identity backend's current-user
/// endpoint.
///
/// Resolved live for the single request that needed it and never cached, so
/// role changes on the backend take effect immediately everywhere.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpstreamIdentity {
    /// Backend-owned user ID, opaque to this gateway.
    pub id: String,
    /// Role to compare against the admin allow-list.
    pub role: Role,
    /// The user's email address.
    pub email: Email,
    /// Optional human-readable name for the admin shell.
    #[serde(rename = "displayName", default)]
    pub display_name: Option<String>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_backend_shape() {
        let identity: UpstreamIdentity = serde_json::from_str(
            r#"{"id":"u-42","role":"admin","email":"admin@inkstone.studio","displayName":"Mare"}"#,
        )
        .unwrap();
        assert_eq!(identity.id, "u-42");
        assert_eq!(identity.role, Role::Admin);
        assert_eq!(identity.email.as_str(), "admin@inkstone.studio");
        assert_eq!(identity.display_name.as_deref(), Some("Mare"));
    }

    #[test]
    fn test_display_name_is_optional() {
        let identity: UpstreamIdentity = serde_json::from_str(
            r#"{"id":"u-42","role":"editor","email":"ed@inkstone.studio"}"#,
        )
        .unwrap();
        assert_eq!(identity.display_name, None);
    }

    #[test]
    fn test_unknown_role_fails_closed() {
        // A role outside the closed set must not deserialize at all.
        let result = serde_json::from_str::<UpstreamIdentity>(
            r#"{"id":"u-42","role":"root","email":"x@inkstone.studio"}"#,
        );
        assert!(result.is_err());
    }
}
