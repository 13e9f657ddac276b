// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Server-side token revocation.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use parking_lot::RwLock;

// =============================================================================
// RevocationRegistry
// =============================================================================

/// Set of tokens revoked before their natural expiry.
///
/// Entries map the raw token string to its original expiry instant.
/// Lookups prune entries whose expiry has passed: an expired token is
/// already rejected by the signature/expiry check, so keeping its entry
/// would only leak memory, never security.
///
/// The registry is process-local state. It does not survive a restart
/// and does not replicate across server instances; a horizontally
/// scaled deployment needs an external revocation store or access
/// tokens short-lived enough that revocation is unnecessary.
///
/// Access is read-heavy (every authenticated request) and write-light
/// (one insert per logout or refresh rotation), so a reader/writer lock
/// guards the map; the lookup escalates to the write lock only when it
/// has an expired entry to prune.
#[derive(Debug, Default)]
pub struct RevocationRegistry {
    entries: RwLock<HashMap<String, DateTime<Utc>>>,
}

impl RevocationRegistry {
    /// Creates an empty registry.
    ///
    /// The registry has no global instance; the composition root
    /// constructs one and hands it to whoever needs it.
    pub fn new() -> Self {
        Self::default()
    }

    /// Revokes a token until the given expiry instant.
    ///
    /// Idempotent: revoking the same token again overwrites the entry
    /// and nothing else.
    pub fn revoke(&self, token: &str, expires_at: DateTime<Utc>) {
        self.entries.write().insert(token.to_string(), expires_at);
    }

    /// Returns `true` if the token is revoked and its stored expiry is
    /// still in the future.
    ///
    /// A found-but-expired entry is deleted as a side effect and
    /// reported not-revoked.
    pub fn is_revoked(&self, token: &str) -> bool {
        let expires_at = match self.entries.read().get(token) {
            Some(expires_at) => *expires_at,
            None => return false,
        };

        if Utc::now() >= expires_at {
            self.entries.write().remove(token);
            return false;
        }

        true
    }

    /// Returns the number of live entries (including not-yet-pruned
    /// expired ones).
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    /// Returns `true` if the registry holds no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}

// =============================================================================
// Tests
// =============================================================================
