// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Typed token claims.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// =============================================================================
// TokenPurpose
// =============================================================================

/// What a signed token is allowed to be used for.
///
/// Access and refresh tokens are signed with distinct secrets, so a
/// leaked refresh token cannot be replayed as an access token or vice
/// versa. The purpose is also embedded in the claims as a second line
/// of defense.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenPurpose {
    /// Short-lived credential proving identity + role on each request.
    Access,
    /// Long-lived credential used solely to mint new access tokens.
    Refresh,
}

impl TokenPurpose {
    /// Returns the purpose name as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            TokenPurpose::Access => "access",
            TokenPurpose::Refresh => "refresh",
        }
    }
}

impl std::fmt::Display for TokenPurpose {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// =============================================================================
// Claims
// =============================================================================

/// Claims embedded in a signed token.
///
/// Produced and consumed only by [`JwtManager`](super::JwtManager);
/// handlers never see raw claim maps. Access tokens carry the subject's
/// role id; refresh tokens carry the subject alone, because the role is
/// re-fetched fresh when the token is used.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject - the account id.
    pub sub: Uuid,

    /// Role id, present on access tokens only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role_id: Option<Uuid>,

    /// Purpose this token was issued for.
    pub purpose: TokenPurpose,

    /// Expiration time (Unix timestamp). Always set.
    pub exp: i64,

    /// Issued at time (Unix timestamp).
    pub iat: i64,
}

impl Claims {
    /// Creates access-token claims for a subject.
    pub fn access(subject: Uuid, role_id: Uuid, ttl_secs: i64, now: i64) -> Self {
        Self {
            sub: subject,
            role_id: Some(role_id),
            purpose: TokenPurpose::Access,
            exp: now + ttl_secs,
            iat: now,
        }
    }

    /// Creates refresh-token claims for a subject.
    pub fn refresh(subject: Uuid, ttl_secs: i64, now: i64) -> Self {
        Self {
            sub: subject,
            role_id: None,
            purpose: TokenPurpose::Refresh,
            exp: now + ttl_secs,
            iat: now,
        }
    }

    /// Returns the subject id.
    pub fn subject(&self) -> Uuid {
        self.sub
    }

    /// Returns `true` if the token is expired at the given instant.
    ///
    /// The check is strict: a token presented exactly at its expiry
    /// instant is rejected.
    pub fn is_expired_at(&self, now: i64) -> bool {
        now >= self.exp
    }

    /// Returns the expiration time as a `DateTime`.
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.exp, 0)
    }
}

// =============================================================================
// Tests
// =============================================================================
