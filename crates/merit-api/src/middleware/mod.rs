// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Middleware for the API server.
//!
//! Two layers gate every protected route, in order:
//!
//! - [`AuthMiddleware`]: authenticates the bearer token and attaches
//!   the resolved [`Identity`](crate::auth::Identity)
//! - [`RbacMiddleware`]: checks the route's required permission against
//!   a fresh permission-store query

mod auth;
mod rbac;

pub use auth::{AuthLayer, AuthMiddleware};
pub use rbac::{RbacLayer, RbacMiddleware};
