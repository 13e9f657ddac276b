// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Account lookup handlers.
//!
//! Account CRUD lives outside this service; the one lookup exposed here
//! rides on the directory contract the authorization core already
//! consumes, and is gated by `user:manage`.

use axum::{
    extract::{Path, State},
    response::IntoResponse,
    Json,
};
use uuid::Uuid;

use crate::error::{ApiError, ApiResult};
use crate::response::ApiResponse;
use crate::state::AppState;

/// GET /app/users/{id}
///
/// Returns a user's safe fields. Requires the `user:manage` permission.
pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<impl IntoResponse> {
    let id = Uuid::parse_str(&id).map_err(|_| ApiError::bad_request("invalid user id"))?;

    let user = state
        .directory()
        .find_by_id(id)
        .await?
        .ok_or_else(|| ApiError::not_found("user"))?;

    Ok(Json(ApiResponse::success(user)))
}
