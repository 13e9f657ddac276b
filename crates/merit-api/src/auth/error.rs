// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Authentication and authorization failure taxonomy.

use axum::http::StatusCode;
use thiserror::Error;

use super::Permission;

/// Every way a request can fail authentication or authorization.
///
/// All variants are terminal for the request: no retries, no partial
/// success. The display strings are the user-visible messages;
/// [`CredentialsInvalid`](AuthError::CredentialsInvalid) deliberately
/// covers both unknown-username and wrong-password so login failures
/// never reveal which check tripped.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    /// No bearer token on the request.
    #[error("missing authorization header")]
    MissingCredentials,

    /// The token string is not a well-formed signed token.
    #[error("malformed token")]
    Malformed,

    /// The signature does not verify against the expected secret.
    #[error("invalid token signature")]
    InvalidSignature,

    /// The token is past its expiry instant.
    #[error("token expired")]
    Expired,

    /// The token decoded but its claims are unusable (wrong purpose,
    /// missing subject).
    #[error("invalid token claims")]
    MalformedClaims,

    /// The token was revoked server-side before its natural expiry.
    #[error("token already logged out")]
    Revoked,

    /// The token subject no longer exists in the user directory.
    #[error("user not found")]
    SubjectNotFound,

    /// The subject's account is deactivated.
    #[error("account is not active")]
    AccountInactive,

    /// Unknown username or wrong password.
    #[error("invalid credentials")]
    CredentialsInvalid,

    /// The presented refresh token failed validation or was rotated
    /// away.
    #[error("invalid or expired refresh token")]
    InvalidRefreshToken,

    /// The authenticated subject does not hold the required permission.
    #[error("forbidden: missing permission {permission}")]
    MissingPermission {
        /// The permission the route requires.
        permission: Permission,
    },

    /// The user directory or permission store could not be reached.
    #[error("backing store unavailable")]
    StoreUnavailable,

    /// A permission gate ran without an authenticated identity.
    #[error("authentication required")]
    Unauthenticated,
}

impl AuthError {
    /// Returns the HTTP status code for this failure.
    pub fn status_code(&self) -> StatusCode {
        match self {
            AuthError::MissingCredentials
            | AuthError::Malformed
            | AuthError::InvalidSignature
            | AuthError::Expired
            | AuthError::MalformedClaims
            | AuthError::Revoked
            | AuthError::SubjectNotFound
            | AuthError::CredentialsInvalid
            | AuthError::InvalidRefreshToken
            | AuthError::Unauthenticated => StatusCode::UNAUTHORIZED,
            AuthError::AccountInactive | AuthError::MissingPermission { .. } => {
                StatusCode::FORBIDDEN
            }
            AuthError::StoreUnavailable => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Returns `true` if this failure should be logged at error level.
    pub fn is_server_error(&self) -> bool {
        matches!(self, AuthError::StoreUnavailable)
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(
            AuthError::MissingCredentials.status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(AuthError::Revoked.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            AuthError::AccountInactive.status_code(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            AuthError::MissingPermission {
                permission: Permission::UserManage
            }
            .status_code(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            AuthError::StoreUnavailable.status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_login_failures_share_one_message() {
        // Unknown username and wrong password must be indistinguishable.
        assert_eq!(
            AuthError::CredentialsInvalid.to_string(),
            "invalid credentials"
        );
    }

    #[test]
    fn test_missing_permission_names_the_permission() {
        let err = AuthError::MissingPermission {
            permission: Permission::UserManage,
        };
        assert_eq!(err.to_string(), "forbidden: missing permission user:manage");
    }

    #[test]
    fn test_server_error_classification() {
        assert!(AuthError::StoreUnavailable.is_server_error());
        assert!(!AuthError::Revoked.is_server_error());
        assert!(!AuthError::CredentialsInvalid.is_server_error());
    }
}
