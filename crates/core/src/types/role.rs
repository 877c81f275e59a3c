//! Admin role types.
//!
//! The role set is closed: anything the identity backend reports outside this
//! enum fails deserialization and is treated as no role at all (fail closed).

use serde::{Deserialize, Serialize};

/// Role reported by the identity backend for an authenticated user.
///
/// Every admin screen and privileged proxy route in the gateway requires
/// [`Role::Admin`]; the other variants exist so that a valid but
/// insufficient role can be distinguished from an unauthenticated caller
/// (the page gate redirects them differently).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Full access to the admin control surface.
    Admin,
    /// Can author content on the backend, but has no admin access here.
    Editor,
    /// Read-only access on the backend, no admin access here.
    Viewer,
}

impl Role {
    /// Whether this role is allowed through the admin gate.
    #[must_use]
    pub const fn is_admin(self) -> bool {
        matches!(self, Self::Admin)
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Admin => write!(f, "admin"),
            Self::Editor => write!(f, "editor"),
            Self::Viewer => write!(f, "viewer"),
        }
    }
}

impl std::str::FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(Self::Admin),
            "editor" => Ok(Self::Editor),
            "viewer" => Ok(Self::Viewer),
            _ => Err(format!("invalid role: {s}")),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_display_round_trips_through_from_str() {
        for role in [Role::Admin, Role::Editor, Role::Viewer] {
            let parsed: Role = role.to_string().parse().unwrap();
            assert_eq!(parsed, role);
        }
    }

    #[test]
    fn test_from_str_rejects_unknown() {
        assert!("superuser".parse::<Role>().is_err());
        assert!("".parse::<Role>().is_err());
        assert!("Admin".parse::<Role>().is_err());
    }

    #[test]
    fn test_serde_snake_case() {
        let json = serde_json::to_string(&Role::Admin).unwrap();
        assert_eq!(json, "\"admin\"");

        let role: Role = serde_json::from_str("\"editor\"").unwrap();
        assert_eq!(role, Role::Editor);
    }

    #[test]
    fn test_serde_rejects_unknown_role() {
        assert!(serde_json::from_str::<Role>("\"root\"").is_err());
    }

    #[test]
    fn test_is_admin() {
        assert!(Role::Admin.is_admin());
        assert!(!Role::Editor.is_admin());
        assert!(!Role::Viewer.is_admin());
    }
}
