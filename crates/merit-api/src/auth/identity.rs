// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! The request-scoped authenticated identity.

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use merit_core::User;

// =============================================================================
// Identity
// =============================================================================

/// The resolved principal for one request.
///
/// Built exactly once per request by the authentication middleware
/// after the token, revocation, and directory checks all pass, then
/// attached to the request extensions. Read-only downstream; dropped
/// when the request ends.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Identity {
    /// Account id (the token subject).
    pub user_id: Uuid,
    /// Role id from the directory record, not the token.
    pub role_id: Uuid,
    /// Login name.
    pub username: String,
    /// Display name.
    pub full_name: String,
    /// Contact email.
    pub email: String,
}

impl Identity {
    /// Builds an identity from a freshly fetched directory record.
    pub fn from_user(user: &User) -> Self {
        Self {
            user_id: user.id,
            role_id: user.role_id,
            username: user.username.clone(),
            full_name: user.full_name.clone(),
            email: user.email.clone(),
        }
    }
}

// =============================================================================
// SessionToken
// =============================================================================

/// The raw bearer token behind the current request.
///
/// Attached alongside [`Identity`] so logout can revoke the exact
/// string the client presented, with the expiry taken from its
/// already-validated claims.
#[derive(Debug, Clone)]
pub struct SessionToken {
    /// The raw token string from the Authorization header.
    pub raw: String,
    /// Expiry instant from the validated claims.
    pub expires_at: DateTime<Utc>,
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_from_user() {
        let user = User::new(
            "alice",
            "alice@campus.edu",
            "$2b$12$hash",
            "Alice Tan",
            Uuid::new_v4(),
        );

        let identity = Identity::from_user(&user);

        assert_eq!(identity.user_id, user.id);
        assert_eq!(identity.role_id, user.role_id);
        assert_eq!(identity.username, "alice");
        assert_eq!(identity.full_name, "Alice Tan");
    }

    #[test]
    fn test_identity_serializes_safe_fields_only() {
        let user = User::new("bob", "bob@campus.edu", "$2b$12$hash", "Bob", Uuid::new_v4());
        let identity = Identity::from_user(&user);

        let json = serde_json::to_string(&identity).unwrap();
        assert!(json.contains("\"username\":\"bob\""));
        assert!(json.contains("fullName"));
        assert!(!json.contains("hash"));
    }
}
