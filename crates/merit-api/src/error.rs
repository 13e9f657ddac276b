// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! API error types and HTTP mapping.
//!
//! Every failure leaving this crate renders as the uniform error
//! envelope `{"status": "error", "message": "..."}` with the matching
//! HTTP status code.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::auth::AuthError;
use crate::response::ApiResponse;

/// Result type alias for API operations.
pub type ApiResult<T> = Result<T, ApiError>;

// =============================================================================
// ApiError
// =============================================================================

/// API error with HTTP status code mapping.
///
/// Handlers return this; the `IntoResponse` impl converts it to the
/// uniform error envelope.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Resource not found (404).
    #[error("{resource} not found")]
    NotFound {
        /// The resource that was not found.
        resource: String,
    },

    /// Malformed input (400).
    #[error("{message}")]
    BadRequest {
        /// Error message.
        message: String,
    },

    /// Authentication or authorization failure (401/403/500).
    #[error("{0}")]
    Auth(#[from] AuthError),

    /// Internal server error (500). The message is logged, never sent
    /// to the client.
    #[error("internal server error")]
    Internal {
        /// Detail for logs.
        message: String,
    },
}

impl ApiError {
    /// Creates a not found error.
    pub fn not_found(resource: impl Into<String>) -> Self {
        Self::NotFound {
            resource: resource.into(),
        }
    }

    /// Creates a bad request error.
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest {
            message: message.into(),
        }
    }

    /// Creates an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Returns the HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::NotFound { .. } => StatusCode::NOT_FOUND,
            ApiError::BadRequest { .. } => StatusCode::BAD_REQUEST,
            ApiError::Auth(e) => e.status_code(),
            ApiError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Returns `true` if this error should be logged at error level.
    pub fn is_server_error(&self) -> bool {
        match self {
            ApiError::Internal { .. } => true,
            ApiError::Auth(e) => e.is_server_error(),
            _ => false,
        }
    }

    /// Returns the user-visible message.
    ///
    /// Internal failures (and store outages) collapse to a generic
    /// message; the detail stays in the logs.
    pub fn user_message(&self) -> String {
        match self {
            ApiError::Internal { .. } | ApiError::Auth(AuthError::StoreUnavailable) => {
                "internal server error".to_string()
            }
            other => other.to_string(),
        }
    }
}

// =============================================================================
// IntoResponse Implementation
// =============================================================================

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        if self.is_server_error() {
            tracing::error!(error = %self, detail = ?self, status = %status, "request failed");
        } else {
            tracing::debug!(error = %self, status = %status, "request rejected");
        }

        let body = ApiResponse::<()>::error(self.user_message());

        (status, Json(body)).into_response()
    }
}

impl From<merit_core::DirectoryError> for ApiError {
    fn from(err: merit_core::DirectoryError) -> Self {
        tracing::error!(error = %err, "collaborator store failure");
        ApiError::Auth(AuthError::StoreUnavailable)
    }
}

// =============================================================================
// Tests
// =============================================================================
