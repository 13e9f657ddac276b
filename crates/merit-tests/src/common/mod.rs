// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Shared test fixtures.
//!
//! [`TestApp`] stands up a complete in-memory deployment: router,
//! token codec, revocation registry, and seeded directory/permission
//! stores. Requests are driven through `tower::ServiceExt::oneshot`,
//! no socket involved.

use std::sync::Arc;

use axum::{
    body::Body,
    http::{header, Request, Response, StatusCode},
    Router,
};
use http_body_util::BodyExt;
use tower::ServiceExt;
use uuid::Uuid;

use merit_api::auth::{JwtManager, RevocationRegistry, Role};
use merit_api::{ApiConfig, ApiServer, AppState};
use merit_core::{InMemoryDirectory, InMemoryPermissionStore, User};

/// Password shared by every seeded account.
pub const TEST_PASSWORD: &str = "correct horse battery staple";

/// Low bcrypt cost keeps the suite fast; strength is irrelevant here.
const TEST_BCRYPT_COST: u32 = 4;

// =============================================================================
// TestApp
// =============================================================================

/// A complete in-memory deployment of the backend.
pub struct TestApp {
    /// The assembled router.
    pub router: Router,
    /// Token codec, for minting and inspecting tokens in tests.
    pub jwt: Arc<JwtManager>,
    /// The revocation registry instance behind the router.
    pub revocations: Arc<RevocationRegistry>,
    /// Seeded user directory.
    pub directory: Arc<InMemoryDirectory>,
    /// Seeded permission store.
    pub permissions: Arc<InMemoryPermissionStore>,
    /// Seeded admin account (holds `user:manage`).
    pub admin: User,
    /// Seeded student account.
    pub student: User,
    /// Seeded advisor account.
    pub advisor: User,
    /// Seeded deactivated account.
    pub inactive: User,
}

impl TestApp {
    /// Builds and seeds a fresh deployment.
    pub fn spawn() -> Self {
        let mut config = ApiConfig::default().with_development(true);
        config.auth.access_secret =
            "integration-access-secret-with-plenty-of-length".to_string();
        config.auth.refresh_secret =
            "integration-refresh-secret-with-plenty-of-length".to_string();

        let directory = Arc::new(InMemoryDirectory::new());
        let permissions = Arc::new(InMemoryPermissionStore::new());
        let revocations = Arc::new(RevocationRegistry::new());
        let jwt = Arc::new(JwtManager::new(&config.auth).expect("valid auth config"));

        let admin = seed_user(&directory, &permissions, "admin", Role::Admin, true);
        let student = seed_user(&directory, &permissions, "student", Role::Student, true);
        let advisor = seed_user(&directory, &permissions, "advisor", Role::Advisor, true);
        let inactive = seed_user(&directory, &permissions, "ghost", Role::Student, false);

        let state = AppState::builder()
            .config(config)
            .jwt(jwt.clone())
            .revocations(revocations.clone())
            .directory(directory.clone())
            .permissions(permissions.clone())
            .build()
            .expect("valid app state");

        let router = ApiServer::new(state).router();

        Self {
            router,
            jwt,
            revocations,
            directory,
            permissions,
            admin,
            student,
            advisor,
            inactive,
        }
    }

    /// Sends a request through the router and returns the parsed
    /// response.
    pub async fn send(&self, request: Request<Body>) -> TestResponse {
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("router never errors");
        TestResponse::from_response(response).await
    }

    /// Logs a seeded user in and returns the token pair.
    pub async fn login(&self, username: &str) -> (String, String) {
        let response = self
            .send(json_request(
                "POST",
                "/app/auth/login",
                serde_json::json!({ "username": username, "password": TEST_PASSWORD }),
            ))
            .await;

        assert_eq!(response.status, StatusCode::OK, "login failed: {:?}", response.body);
        (
            response.data()["accessToken"].as_str().unwrap().to_string(),
            response.data()["refreshToken"].as_str().unwrap().to_string(),
        )
    }
}

fn seed_user(
    directory: &InMemoryDirectory,
    permissions: &InMemoryPermissionStore,
    username: &str,
    role: Role,
    active: bool,
) -> User {
    let hash = bcrypt::hash(TEST_PASSWORD, TEST_BCRYPT_COST).expect("bcrypt hash");
    let mut user = User::new(
        username,
        format!("{username}@campus.edu"),
        hash,
        username.to_uppercase(),
        Uuid::new_v4(),
    );
    user.is_active = active;

    let id = directory.insert(user.clone());
    permissions.grant(id, role.default_permission_names());

    user
}

// =============================================================================
// Requests
// =============================================================================

/// Builds a JSON request.
pub fn json_request(method: &str, uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .expect("valid request")
}

/// Builds a request carrying a bearer token.
pub fn bearer_request(method: &str, uri: &str, token: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::empty())
        .expect("valid request")
}

/// Builds a request with neither body nor credentials.
pub fn bare_request(method: &str, uri: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .expect("valid request")
}

// =============================================================================
// TestResponse
// =============================================================================

/// A buffered response with its JSON envelope parsed.
#[derive(Debug)]
pub struct TestResponse {
    /// HTTP status code.
    pub status: StatusCode,
    /// Parsed body; `Null` when the body was empty or not JSON.
    pub body: serde_json::Value,
}

impl TestResponse {
    async fn from_response(response: Response<Body>) -> Self {
        let status = response.status();
        let bytes = response
            .into_body()
            .collect()
            .await
            .expect("body collects")
            .to_bytes();
        let body = serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null);

        Self { status, body }
    }

    /// Returns the `data` payload of a success envelope.
    pub fn data(&self) -> &serde_json::Value {
        assert_eq!(self.body["status"], "success", "not a success envelope: {:?}", self.body);
        &self.body["data"]
    }

    /// Returns the `message` of an error envelope.
    pub fn error_message(&self) -> &str {
        assert_eq!(self.body["status"], "error", "not an error envelope: {:?}", self.body);
        self.body["message"].as_str().unwrap_or_default()
    }
}
