// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! In-memory collaborator implementations.
//!
//! These back the development mode and the test suites. They hold
//! everything behind a [`parking_lot::RwLock`] and clone records out,
//! so they are safe to share across request tasks via `Arc`.

use std::collections::{HashMap, HashSet};

use async_trait::async_trait;
use parking_lot::RwLock;
use uuid::Uuid;

use crate::directory::{DirectoryError, PermissionStore, UserDirectory};
use crate::user::User;

// =============================================================================
// InMemoryDirectory
// =============================================================================

/// User directory held entirely in memory.
#[derive(Debug, Default)]
pub struct InMemoryDirectory {
    users: RwLock<HashMap<Uuid, User>>,
}

impl InMemoryDirectory {
    /// Creates an empty directory.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or replaces a user record, returning its id.
    pub fn insert(&self, user: User) -> Uuid {
        let id = user.id;
        self.users.write().insert(id, user);
        id
    }

    /// Flips a user's active flag. Returns `false` if the id is unknown.
    pub fn set_active(&self, id: Uuid, active: bool) -> bool {
        match self.users.write().get_mut(&id) {
            Some(user) => {
                user.is_active = active;
                true
            }
            None => false,
        }
    }

    /// Returns the number of records.
    pub fn len(&self) -> usize {
        self.users.read().len()
    }

    /// Returns `true` if the directory holds no records.
    pub fn is_empty(&self) -> bool {
        self.users.read().is_empty()
    }
}

#[async_trait]
impl UserDirectory for InMemoryDirectory {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, DirectoryError> {
        Ok(self.users.read().get(&id).cloned())
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, DirectoryError> {
        Ok(self
            .users
            .read()
            .values()
            .find(|u| u.username == username)
            .cloned())
    }
}

// =============================================================================
// InMemoryPermissionStore
// =============================================================================

/// Permission store held entirely in memory.
///
/// Grants are keyed by subject id. Mutations take effect on the next
/// authorization check; nothing is cached downstream.
#[derive(Debug, Default)]
pub struct InMemoryPermissionStore {
    grants: RwLock<HashMap<Uuid, HashSet<String>>>,
}

impl InMemoryPermissionStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Grants a set of permission names to a subject, replacing any
    /// previous grant.
    pub fn grant<I, S>(&self, subject: Uuid, permissions: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let names = permissions.into_iter().map(Into::into).collect();
        self.grants.write().insert(subject, names);
    }

    /// Removes every grant for a subject.
    pub fn revoke_all(&self, subject: Uuid) {
        self.grants.write().remove(&subject);
    }
}

#[async_trait]
impl PermissionStore for InMemoryPermissionStore {
    async fn permissions_for(&self, subject: Uuid) -> Result<HashSet<String>, DirectoryError> {
        Ok(self
            .grants
            .read()
            .get(&subject)
            .cloned()
            .unwrap_or_default())
    }
}

// =============================================================================
// Tests
// =============================================================================
