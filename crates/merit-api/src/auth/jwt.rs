// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Signed token issuance and validation.

use std::sync::Arc;

use chrono::Utc;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use uuid::Uuid;

use super::{AuthError, Claims, TokenPurpose};
use crate::config::AuthConfig;
use crate::error::{ApiError, ApiResult};

// =============================================================================
// JwtManager
// =============================================================================

/// Issues and validates signed tokens.
///
/// Access and refresh tokens are signed with distinct secrets keyed by
/// [`TokenPurpose`]. Expiry is checked here, strictly (`now >= exp`
/// fails), against an injectable time source; the jsonwebtoken layer is
/// only responsible for signature and format.
#[derive(Clone)]
pub struct JwtManager {
    access: Arc<PurposeKeys>,
    refresh: Arc<PurposeKeys>,
    validation: Arc<Validation>,
    access_ttl_secs: i64,
    refresh_ttl_secs: i64,
    now_fn: fn() -> i64,
}

struct PurposeKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

impl PurposeKeys {
    fn from_secret(secret: &str) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
        }
    }
}

fn current_timestamp() -> i64 {
    Utc::now().timestamp()
}

impl JwtManager {
    /// Creates a manager from the auth configuration.
    pub fn new(config: &AuthConfig) -> ApiResult<Self> {
        if config.access_secret.is_empty() || config.refresh_secret.is_empty() {
            return Err(ApiError::internal("token secrets are not configured"));
        }

        // Expiry and purpose are validated manually so the clock can be
        // injected; jsonwebtoken only checks signature and format.
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.validate_aud = false;
        validation.set_required_spec_claims::<&str>(&[]);

        Ok(Self {
            access: Arc::new(PurposeKeys::from_secret(&config.access_secret)),
            refresh: Arc::new(PurposeKeys::from_secret(&config.refresh_secret)),
            validation: Arc::new(validation),
            access_ttl_secs: config.access_ttl_secs,
            refresh_ttl_secs: config.refresh_ttl_secs,
            now_fn: current_timestamp,
        })
    }

    /// Replaces the time source. Intended for tests.
    pub fn with_clock(mut self, now_fn: fn() -> i64) -> Self {
        self.now_fn = now_fn;
        self
    }

    /// Returns the current instant from the injected time source.
    pub fn now(&self) -> i64 {
        (self.now_fn)()
    }

    /// Serializes and signs claims with the secret for their purpose.
    pub fn issue(&self, claims: &Claims) -> ApiResult<String> {
        let header = Header::new(Algorithm::HS256);

        encode(&header, claims, &self.keys(claims.purpose).encoding)
            .map_err(|e| ApiError::internal(format!("failed to sign token: {}", e)))
    }

    /// Issues an access token carrying subject and role.
    pub fn issue_access_token(&self, subject: Uuid, role_id: Uuid) -> ApiResult<String> {
        let claims = Claims::access(subject, role_id, self.access_ttl_secs, self.now());
        self.issue(&claims)
    }

    /// Issues a refresh token carrying the subject alone.
    pub fn issue_refresh_token(&self, subject: Uuid) -> ApiResult<String> {
        let claims = Claims::refresh(subject, self.refresh_ttl_secs, self.now());
        self.issue(&claims)
    }

    /// Verifies a token against the purpose-specific secret and returns
    /// its claims.
    pub fn parse(&self, token: &str, purpose: TokenPurpose) -> Result<Claims, AuthError> {
        let data = decode::<Claims>(token, &self.keys(purpose).decoding, &self.validation)
            .map_err(|e| match e.kind() {
                jsonwebtoken::errors::ErrorKind::InvalidSignature
                | jsonwebtoken::errors::ErrorKind::InvalidAlgorithm => AuthError::InvalidSignature,
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => AuthError::Expired,
                _ => AuthError::Malformed,
            })?;

        let claims = data.claims;

        // Secrets already differ per purpose; the claim check catches
        // deployments where both were configured to the same value.
        if claims.purpose != purpose {
            return Err(AuthError::MalformedClaims);
        }

        if claims.is_expired_at(self.now()) {
            return Err(AuthError::Expired);
        }

        Ok(claims)
    }

    /// Returns the access-token lifetime in seconds.
    pub fn access_ttl_secs(&self) -> i64 {
        self.access_ttl_secs
    }

    /// Returns the refresh-token lifetime in seconds.
    pub fn refresh_ttl_secs(&self) -> i64 {
        self.refresh_ttl_secs
    }

    fn keys(&self, purpose: TokenPurpose) -> &PurposeKeys {
        match purpose {
            TokenPurpose::Access => &self.access,
            TokenPurpose::Refresh => &self.refresh,
        }
    }
}

impl std::fmt::Debug for JwtManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtManager")
            .field("access_ttl_secs", &self.access_ttl_secs)
            .field("refresh_ttl_secs", &self.refresh_ttl_secs)
            .finish()
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> AuthConfig {
        AuthConfig {
            access_secret: "access-secret-long-enough-for-testing-purposes".to_string(),
            refresh_secret: "refresh-secret-long-enough-for-testing-purposes".to_string(),
            ..AuthConfig::default()
        }
    }

    fn far_future() -> i64 {
        4_000_000_000
    }

    #[test]
    fn test_issue_and_parse_access_token() {
        let manager = JwtManager::new(&test_config()).unwrap();
        let subject = Uuid::new_v4();
        let role = Uuid::new_v4();

        let token = manager.issue_access_token(subject, role).unwrap();
        assert_eq!(token.split('.').count(), 3);

        let claims = manager.parse(&token, TokenPurpose::Access).unwrap();
        assert_eq!(claims.subject(), subject);
        assert_eq!(claims.role_id, Some(role));
    }

    #[test]
    fn test_refresh_token_has_no_role() {
        let manager = JwtManager::new(&test_config()).unwrap();
        let subject = Uuid::new_v4();

        let token = manager.issue_refresh_token(subject).unwrap();
        let claims = manager.parse(&token, TokenPurpose::Refresh).unwrap();

        assert_eq!(claims.subject(), subject);
        assert_eq!(claims.role_id, None);
    }

    #[test]
    fn test_wrong_secret_is_invalid_signature() {
        let manager = JwtManager::new(&test_config()).unwrap();
        let other = JwtManager::new(&AuthConfig {
            access_secret: "a-completely-different-access-secret-value".to_string(),
            refresh_secret: "a-completely-different-refresh-secret-value".to_string(),
            ..AuthConfig::default()
        })
        .unwrap();

        let token = manager
            .issue_access_token(Uuid::new_v4(), Uuid::new_v4())
            .unwrap();

        assert_eq!(
            other.parse(&token, TokenPurpose::Access),
            Err(AuthError::InvalidSignature)
        );
    }

    #[test]
    fn test_cross_purpose_token_is_rejected() {
        // Refresh tokens are signed with a different secret, so an
        // access token presented as a refresh token fails the signature
        // check.
        let manager = JwtManager::new(&test_config()).unwrap();

        let access = manager
            .issue_access_token(Uuid::new_v4(), Uuid::new_v4())
            .unwrap();

        assert_eq!(
            manager.parse(&access, TokenPurpose::Refresh),
            Err(AuthError::InvalidSignature)
        );
    }

    #[test]
    fn test_purpose_claim_guards_shared_secret() {
        // If both purposes were configured with the same secret the
        // signature check passes; the purpose claim still rejects.
        let shared = AuthConfig {
            access_secret: "one-shared-secret-used-for-both-purposes!!".to_string(),
            refresh_secret: "one-shared-secret-used-for-both-purposes!!".to_string(),
            ..AuthConfig::default()
        };
        let manager = JwtManager::new(&shared).unwrap();

        let access = manager
            .issue_access_token(Uuid::new_v4(), Uuid::new_v4())
            .unwrap();

        assert_eq!(
            manager.parse(&access, TokenPurpose::Refresh),
            Err(AuthError::MalformedClaims)
        );
    }

    #[test]
    fn test_expired_token() {
        let manager = JwtManager::new(&test_config()).unwrap();
        let token = manager
            .issue_access_token(Uuid::new_v4(), Uuid::new_v4())
            .unwrap();

        // Same manager, clock moved past the access TTL.
        let late = manager.clone().with_clock(far_future);
        assert_eq!(
            late.parse(&token, TokenPurpose::Access),
            Err(AuthError::Expired)
        );
    }

    #[test]
    fn test_expiry_check_is_strict() {
        fn fixed_now() -> i64 {
            1_700_000_000
        }

        let manager = JwtManager::new(&test_config())
            .unwrap()
            .with_clock(fixed_now);

        // Expires exactly at the instant the clock reports.
        let claims = Claims::access(Uuid::new_v4(), Uuid::new_v4(), 0, fixed_now());
        let token = manager.issue(&claims).unwrap();

        assert_eq!(
            manager.parse(&token, TokenPurpose::Access),
            Err(AuthError::Expired)
        );
    }

    #[test]
    fn test_garbage_token_is_malformed() {
        let manager = JwtManager::new(&test_config()).unwrap();

        assert_eq!(
            manager.parse("not-a-token", TokenPurpose::Access),
            Err(AuthError::Malformed)
        );
        assert_eq!(
            manager.parse("a.b.c", TokenPurpose::Access),
            Err(AuthError::Malformed)
        );
    }

    #[test]
    fn test_empty_secret_is_rejected() {
        let config = AuthConfig {
            access_secret: String::new(),
            ..test_config()
        };
        assert!(JwtManager::new(&config).is_err());
    }
}
