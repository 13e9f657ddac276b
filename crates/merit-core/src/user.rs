// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! User directory record.

use serde::Serialize;
use uuid::Uuid;

/// A user account as seen by the authorization core.
///
/// This is the record shape the [`UserDirectory`](crate::UserDirectory)
/// hands back. The password hash is never serialized; it exists only so
/// the login path can verify credentials.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Stable account id (the token subject).
    pub id: Uuid,
    /// Login name, unique across the directory.
    pub username: String,
    /// Contact email.
    pub email: String,
    /// Salted one-way password hash.
    #[serde(skip_serializing)]
    pub password_hash: String,
    /// Display name.
    pub full_name: String,
    /// Assigned role id.
    pub role_id: Uuid,
    /// Whether the account may authenticate.
    pub is_active: bool,
}

impl User {
    /// Creates an active user record.
    pub fn new(
        username: impl Into<String>,
        email: impl Into<String>,
        password_hash: impl Into<String>,
        full_name: impl Into<String>,
        role_id: Uuid,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            username: username.into(),
            email: email.into(),
            password_hash: password_hash.into(),
            full_name: full_name.into(),
            role_id,
            is_active: true,
        }
    }

    /// Marks the account inactive.
    pub fn deactivated(mut self) -> Self {
        self.is_active = false;
        self
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_password_hash_not_serialized() {
        let user = User::new("alice", "alice@campus.edu", "$2b$hash", "Alice", Uuid::new_v4());
        let json = serde_json::to_string(&user).unwrap();

        assert!(json.contains("alice"));
        assert!(!json.contains("$2b$hash"));
        assert!(!json.contains("passwordHash"));
    }

    #[test]
    fn test_deactivated() {
        let user = User::new("bob", "bob@campus.edu", "h", "Bob", Uuid::new_v4());
        assert!(user.is_active);
        assert!(!user.deactivated().is_active);
    }
}
