// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # merit-core
//!
//! Domain types and collaborator contracts for the MERIT
//! academic-achievement backend.
//!
//! The authorization core in `merit-api` never talks to a database
//! directly. It consumes two narrow contracts defined here:
//!
//! - [`UserDirectory`]: lookup of user records by id or username
//! - [`PermissionStore`]: resolution of a subject's permission names
//!
//! In-memory implementations of both live in [`memory`] and back the
//! development mode and the test suites. Production deployments plug in
//! their own store-backed implementations.

#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod directory;
pub mod memory;
pub mod user;

pub use directory::{DirectoryError, PermissionStore, UserDirectory};
pub use memory::{InMemoryDirectory, InMemoryPermissionStore};
pub use user::User;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
