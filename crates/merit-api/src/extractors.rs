// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Custom extractors for API handlers.

use axum::{
    extract::FromRequestParts,
    http::request::Parts,
    Json,
};
use serde::de::DeserializeOwned;

use crate::auth::{AuthError, Identity, SessionToken};
use crate::error::ApiError;

// =============================================================================
// Auth Extractor
// =============================================================================

/// Extractor for the authenticated identity.
///
/// Reads the [`Identity`] the authentication middleware attached.
/// Rejects with 401 when the middleware did not run, so a handler that
/// demands an identity fails closed even on a misconfigured route.
///
/// # Example
///
/// ```rust,ignore
/// async fn handler(Auth(identity): Auth) -> impl IntoResponse {
///     format!("Hello, {}", identity.username)
/// }
/// ```
pub struct Auth(pub Identity);

impl<S> FromRequestParts<S> for Auth
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Identity>()
            .cloned()
            .map(Auth)
            .ok_or_else(|| ApiError::from(AuthError::Unauthenticated))
    }
}

// =============================================================================
// SessionBearer Extractor
// =============================================================================

/// Extractor for the raw bearer token behind the request.
///
/// Used by logout, which needs the exact token string and its validated
/// expiry to feed the revocation registry.
pub struct SessionBearer(pub SessionToken);

impl<S> FromRequestParts<S> for SessionBearer
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<SessionToken>()
            .cloned()
            .map(SessionBearer)
            .ok_or_else(|| ApiError::from(AuthError::MissingCredentials))
    }
}

// =============================================================================
// Validated JSON Extractor
// =============================================================================

/// Extractor for JSON payloads.
///
/// Wraps axum's `Json` so malformed bodies reject with the uniform
/// error envelope instead of axum's default rejection shape.
pub struct ValidatedJson<T>(pub T);

impl<S, T> axum::extract::FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(
        req: axum::http::Request<axum::body::Body>,
        state: &S,
    ) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|e| ApiError::bad_request(format!("invalid request body: {}", e)))?;

        Ok(ValidatedJson(value))
    }
}

// =============================================================================
// Tests
// =============================================================================
