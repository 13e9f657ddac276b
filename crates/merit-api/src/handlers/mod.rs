// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! API handlers for all endpoints.
//!
//! - [`auth`]: login, refresh, logout, profile
//! - [`users`]: account lookup for administrators
//! - [`health`]: liveness probe

mod auth;
mod health;
mod users;

pub use auth::*;
pub use health::*;
pub use users::*;
