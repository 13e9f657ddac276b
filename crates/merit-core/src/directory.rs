// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Collaborator contracts consumed by the authorization core.
//!
//! Both traits are intentionally narrow. The directory answers "who is
//! this subject", the permission store answers "what may this subject
//! do". Absence is not an error: a missing record is `Ok(None)` and an
//! unknown subject resolves to an empty permission set. Errors mean the
//! backing store itself could not be reached.

use std::collections::HashSet;

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::user::User;

// =============================================================================
// DirectoryError
// =============================================================================

/// Failure reaching a backing store.
///
/// Lookups distinguish "the record does not exist" (`Ok(None)`) from
/// "the store did not answer" (this error). Callers surface the latter
/// as an internal failure and never retry inline.
#[derive(Debug, Error)]
pub enum DirectoryError {
    /// The backing store could not be reached or returned a malformed
    /// result.
    #[error("backing store unavailable: {message}")]
    Unavailable {
        /// Description of the underlying failure, for logs only.
        message: String,
    },
}

impl DirectoryError {
    /// Creates an unavailable error.
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable {
            message: message.into(),
        }
    }
}

// =============================================================================
// UserDirectory
// =============================================================================

/// Lookup of user records.
///
/// Implementations wrap whatever store actually holds the accounts; the
/// authorization core only ever calls these two methods.
#[async_trait]
pub trait UserDirectory: Send + Sync {
    /// Finds a user by account id.
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, DirectoryError>;

    /// Finds a user by login name.
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, DirectoryError>;
}

// =============================================================================
// PermissionStore
// =============================================================================

/// Resolution of a subject's effective permission names.
///
/// The result is the full set granted through the subject's role (a
/// join across role and role-permission mapping, owned by the store).
/// The core queries this on every authorization check; implementations
/// must not cache stale grants on its behalf.
#[async_trait]
pub trait PermissionStore: Send + Sync {
    /// Returns the permission names granted to the subject.
    ///
    /// An unknown subject resolves to an empty set.
    async fn permissions_for(&self, subject: Uuid) -> Result<HashSet<String>, DirectoryError>;
}
