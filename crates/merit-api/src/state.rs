// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Application state shared across handlers.

use std::sync::Arc;

use merit_core::{PermissionStore, UserDirectory};

use crate::auth::{JwtManager, RevocationRegistry};
use crate::config::ApiConfig;
use crate::error::{ApiError, ApiResult};

// =============================================================================
// AppState
// =============================================================================

/// Application state shared across all handlers.
///
/// This is the composition root's view of the core: it owns the token
/// codec, THE revocation registry instance, and the collaborator
/// handles, and hands references down to middleware and handlers.
/// Nothing here is a process-wide singleton.
#[derive(Clone)]
pub struct AppState {
    /// API configuration.
    pub config: Arc<ApiConfig>,
    /// Token codec.
    pub jwt: Arc<JwtManager>,
    /// Revocation registry.
    pub revocations: Arc<RevocationRegistry>,
    /// User directory collaborator.
    pub directory: Arc<dyn UserDirectory>,
    /// Permission store collaborator.
    pub permissions: Arc<dyn PermissionStore>,
}

impl AppState {
    /// Creates a new app state builder.
    pub fn builder() -> AppStateBuilder {
        AppStateBuilder::new()
    }

    /// Returns the token codec.
    pub fn jwt(&self) -> &JwtManager {
        &self.jwt
    }

    /// Returns the revocation registry.
    pub fn revocations(&self) -> &RevocationRegistry {
        &self.revocations
    }

    /// Returns the user directory.
    pub fn directory(&self) -> &Arc<dyn UserDirectory> {
        &self.directory
    }

    /// Returns the permission store.
    pub fn permissions(&self) -> &Arc<dyn PermissionStore> {
        &self.permissions
    }
}

// =============================================================================
// AppStateBuilder
// =============================================================================

/// Builder for constructing AppState.
pub struct AppStateBuilder {
    config: Option<ApiConfig>,
    jwt: Option<Arc<JwtManager>>,
    revocations: Option<Arc<RevocationRegistry>>,
    directory: Option<Arc<dyn UserDirectory>>,
    permissions: Option<Arc<dyn PermissionStore>>,
}

impl AppStateBuilder {
    /// Creates a new builder.
    pub fn new() -> Self {
        Self {
            config: None,
            jwt: None,
            revocations: None,
            directory: None,
            permissions: None,
        }
    }

    /// Sets the configuration.
    pub fn config(mut self, config: ApiConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Sets the token codec.
    pub fn jwt(mut self, jwt: Arc<JwtManager>) -> Self {
        self.jwt = Some(jwt);
        self
    }

    /// Sets the revocation registry.
    pub fn revocations(mut self, revocations: Arc<RevocationRegistry>) -> Self {
        self.revocations = Some(revocations);
        self
    }

    /// Sets the user directory.
    pub fn directory(mut self, directory: Arc<dyn UserDirectory>) -> Self {
        self.directory = Some(directory);
        self
    }

    /// Sets the permission store.
    pub fn permissions(mut self, permissions: Arc<dyn PermissionStore>) -> Self {
        self.permissions = Some(permissions);
        self
    }

    /// Builds the AppState.
    ///
    /// The codec and registry are constructed from config when not
    /// injected; the two collaborators have no default and must be
    /// provided.
    pub fn build(self) -> ApiResult<AppState> {
        let config = self.config.unwrap_or_default();

        let jwt = match self.jwt {
            Some(jwt) => jwt,
            None => Arc::new(JwtManager::new(&config.auth)?),
        };

        let revocations = self
            .revocations
            .unwrap_or_else(|| Arc::new(RevocationRegistry::new()));

        let directory = self
            .directory
            .ok_or_else(|| ApiError::internal("user directory is not configured"))?;

        let permissions = self
            .permissions
            .ok_or_else(|| ApiError::internal("permission store is not configured"))?;

        Ok(AppState {
            config: Arc::new(config),
            jwt,
            revocations,
            directory,
            permissions,
        })
    }
}

impl Default for AppStateBuilder {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use merit_core::{InMemoryDirectory, InMemoryPermissionStore};

    #[test]
    fn test_builder_requires_collaborators() {
        let result = AppState::builder().config(ApiConfig::default()).build();
        assert!(result.is_err());
    }

    #[test]
    fn test_builder_constructs_codec_and_registry() {
        let state = AppState::builder()
            .config(ApiConfig::default())
            .directory(Arc::new(InMemoryDirectory::new()))
            .permissions(Arc::new(InMemoryPermissionStore::new()))
            .build()
            .unwrap();

        assert!(state.revocations().is_empty());
        assert_eq!(state.jwt().access_ttl_secs(), 86_400);
    }
}
