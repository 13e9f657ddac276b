// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # merit-api
//!
//! HTTP API server and authorization core for the MERIT
//! academic-achievement backend.
//!
//! This crate provides bearer-token authentication (access + refresh
//! pairs), server-side token revocation, and role-based permission
//! resolution, fronted by an axum router.

#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod auth;
pub mod config;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod response;
pub mod server;
pub mod state;

pub use auth::{
    AuthError, Claims, Identity, JwtManager, Permission, PermissionSet, RevocationRegistry, Role,
    SessionToken, TokenPurpose,
};
pub use config::{ApiConfig, AuthConfig};
pub use error::{ApiError, ApiResult};
pub use response::ApiResponse;
pub use server::ApiServer;
pub use state::AppState;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
