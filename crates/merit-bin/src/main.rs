// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! MERIT - academic achievement tracking backend
//!
//! Main binary entry point for the API server.

mod cli;
mod logging;
mod shutdown;

use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use tracing::{error, info, warn};
use uuid::Uuid;

use merit_api::auth::Role;
use merit_api::{ApiConfig, ApiServer, AppState};
use merit_core::{InMemoryDirectory, InMemoryPermissionStore, User};

use crate::cli::Cli;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init_logging(&cli.log_level, cli.log_format);

    let mut config = ApiConfig::from_env();
    if let Some(host) = cli.host {
        config.host = host;
    }
    if let Some(port) = cli.port {
        config.port = port;
    }
    if cli.dev {
        config.development = true;
    }

    if let Err(e) = config.validate() {
        error!(error = %e, "configuration rejected");
        return ExitCode::FAILURE;
    }

    let (directory, permissions) = match build_stores(&config) {
        Ok(stores) => stores,
        Err(e) => {
            error!(error = %e, "failed to build stores");
            return ExitCode::FAILURE;
        }
    };

    let state = match AppState::builder()
        .config(config)
        .directory(directory)
        .permissions(permissions)
        .build()
    {
        Ok(state) => state,
        Err(e) => {
            error!(error = %e, "failed to build application state");
            return ExitCode::FAILURE;
        }
    };

    info!(version = merit_api::VERSION, "MERIT starting");

    let server = ApiServer::new(state);
    if let Err(e) = server.run_with_shutdown(shutdown::shutdown_signal()).await {
        error!(error = %e, "server exited with error");
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}

/// Builds the collaborator stores.
///
/// Production deployments wire store-backed implementations here; this
/// binary ships the in-memory pair, seeded with demo accounts in
/// development mode.
fn build_stores(
    config: &ApiConfig,
) -> Result<
    (
        Arc<InMemoryDirectory>,
        Arc<InMemoryPermissionStore>,
    ),
    merit_api::ApiError,
> {
    let directory = Arc::new(InMemoryDirectory::new());
    let permissions = Arc::new(InMemoryPermissionStore::new());

    if config.development {
        seed_demo_accounts(&directory, &permissions)?;
        warn!("development mode: in-memory directory seeded with demo accounts");
    }

    Ok((directory, permissions))
}

/// Seeds one account per role. Demo credentials are `<role>` /
/// `<role>123`.
fn seed_demo_accounts(
    directory: &InMemoryDirectory,
    permissions: &InMemoryPermissionStore,
) -> Result<(), merit_api::ApiError> {
    for role in [Role::Student, Role::Advisor, Role::Admin] {
        let username = role.as_str();
        let password = format!("{}123", username);
        let hash = bcrypt::hash(&password, bcrypt::DEFAULT_COST)
            .map_err(|e| merit_api::ApiError::internal(format!("failed to hash password: {}", e)))?;

        let user = User::new(
            username,
            format!("{}@merit.local", username),
            hash,
            username.to_uppercase(),
            Uuid::new_v4(),
        );
        let id = directory.insert(user);
        permissions.grant(id, role.default_permission_names());

        info!(username, password = %password, "seeded demo account");
    }

    Ok(())
}
