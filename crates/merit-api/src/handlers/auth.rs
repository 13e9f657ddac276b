// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Authentication handlers.

use axum::{extract::State, response::IntoResponse, Json};
use serde::{Deserialize, Serialize};

use merit_core::User;

use crate::auth::{AuthError, TokenPurpose};
use crate::error::{ApiError, ApiResult};
use crate::extractors::{Auth, SessionBearer, ValidatedJson};
use crate::response::{ApiResponse, TokenPair};
use crate::state::AppState;

// =============================================================================
// Login
// =============================================================================

/// Login request body.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    /// Login name.
    pub username: String,
    /// Password.
    pub password: String,
}

/// Login response: the token pair plus the safe account fields.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    /// Short-lived access token.
    pub access_token: String,
    /// Long-lived refresh token.
    pub refresh_token: String,
    /// The authenticated account (never the password hash).
    pub user: User,
}

/// POST /app/auth/login
///
/// Verifies credentials and mints a token pair. Unknown usernames and
/// wrong passwords produce the identical response, so the endpoint
/// cannot be used to probe which accounts exist.
pub async fn login(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<LoginRequest>,
) -> ApiResult<impl IntoResponse> {
    if request.username.is_empty() || request.password.is_empty() {
        return Err(ApiError::bad_request("username and password are required"));
    }

    let user = state
        .directory()
        .find_by_username(&request.username)
        .await?
        .ok_or(AuthError::CredentialsInvalid)?;

    if !user.is_active {
        return Err(AuthError::AccountInactive.into());
    }

    let password_ok = bcrypt::verify(&request.password, &user.password_hash)
        .map_err(|e| ApiError::internal(format!("password hash verification failed: {}", e)))?;
    if !password_ok {
        return Err(AuthError::CredentialsInvalid.into());
    }

    let access_token = state.jwt().issue_access_token(user.id, user.role_id)?;
    let refresh_token = state.jwt().issue_refresh_token(user.id)?;

    tracing::info!(user_id = %user.id, "user logged in");

    Ok(Json(ApiResponse::success(LoginResponse {
        access_token,
        refresh_token,
        user,
    })))
}

// =============================================================================
// Refresh
// =============================================================================

/// Refresh request body.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshRequest {
    /// Refresh token.
    pub refresh_token: String,
}

/// POST /app/auth/refresh
///
/// Exchanges a refresh token for a fresh token pair. The subject is
/// re-fetched from the directory, so a role change is reflected in the
/// new access token. The used refresh token is revoked until its
/// natural expiry; every refresh token is single-use.
pub async fn refresh(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<RefreshRequest>,
) -> ApiResult<impl IntoResponse> {
    if request.refresh_token.is_empty() {
        return Err(ApiError::bad_request("missing refresh token"));
    }

    if state.revocations().is_revoked(&request.refresh_token) {
        return Err(AuthError::InvalidRefreshToken.into());
    }

    let claims = state
        .jwt()
        .parse(&request.refresh_token, TokenPurpose::Refresh)
        .map_err(|_| AuthError::InvalidRefreshToken)?;

    let user = state
        .directory()
        .find_by_id(claims.subject())
        .await?
        .ok_or(AuthError::SubjectNotFound)?;

    if !user.is_active {
        return Err(AuthError::AccountInactive.into());
    }

    let access_token = state.jwt().issue_access_token(user.id, user.role_id)?;
    let refresh_token = state.jwt().issue_refresh_token(user.id)?;

    // Rotate: the old refresh token dies with this exchange.
    if let Some(expires_at) = claims.expires_at() {
        state.revocations().revoke(&request.refresh_token, expires_at);
    }

    tracing::debug!(user_id = %user.id, "token pair rotated");

    Ok(Json(ApiResponse::success(TokenPair {
        access_token,
        refresh_token,
    })))
}

// =============================================================================
// Logout
// =============================================================================

/// POST /app/auth/logout
///
/// Revokes the presented access token until its natural expiry. The
/// revocation happens synchronously; once the response is out, the
/// token is dead.
pub async fn logout(
    State(state): State<AppState>,
    SessionBearer(session): SessionBearer,
) -> ApiResult<impl IntoResponse> {
    state.revocations().revoke(&session.raw, session.expires_at);

    tracing::info!("user logged out");

    Ok(Json(ApiResponse::success("logged out")))
}

// =============================================================================
// Profile
// =============================================================================

/// GET /app/auth/profile
///
/// Returns the authenticated account's safe fields.
pub async fn profile(Auth(identity): Auth) -> ApiResult<impl IntoResponse> {
    Ok(Json(ApiResponse::success(identity)))
}

// =============================================================================
// Tests
// =============================================================================
