// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # Authorization Integration Tests
//!
//! End-to-end tests for the session-trust core, driven through the
//! assembled router:
//!
//! - `test_auth_*`: login, logout, refresh, session validation
//! - `test_rbac_*`: permission gating
//! - `test_error_*`: error envelope behavior

use axum::http::StatusCode;
use axum::routing::get;
use axum::Router;
use std::sync::Arc;
use tower::ServiceExt;

use merit_api::auth::{Permission, TokenPurpose};
use merit_api::middleware::RbacLayer;
use merit_core::InMemoryPermissionStore;

use merit_tests::common::{
    bare_request, bearer_request, json_request, TestApp, TEST_PASSWORD,
};

// =============================================================================
// Login
// =============================================================================

#[tokio::test]
async fn test_auth_login_issues_decodable_token_pair() {
    let app = TestApp::spawn();

    let response = app
        .send(json_request(
            "POST",
            "/app/auth/login",
            serde_json::json!({ "username": "student", "password": TEST_PASSWORD }),
        ))
        .await;

    assert_eq!(response.status, StatusCode::OK);
    let data = response.data();

    // Access claims carry subject and role.
    let access = data["accessToken"].as_str().unwrap();
    let claims = app.jwt.parse(access, TokenPurpose::Access).unwrap();
    assert_eq!(claims.subject(), app.student.id);
    assert_eq!(claims.role_id, Some(app.student.role_id));

    // Refresh claims carry the subject alone.
    let refresh = data["refreshToken"].as_str().unwrap();
    let claims = app.jwt.parse(refresh, TokenPurpose::Refresh).unwrap();
    assert_eq!(claims.subject(), app.student.id);
    assert_eq!(claims.role_id, None);

    // Safe user fields are echoed, the hash is not.
    assert_eq!(data["user"]["username"], "student");
    assert!(data["user"].get("passwordHash").is_none());
}

#[tokio::test]
async fn test_auth_login_wrong_password_does_not_reveal_accounts() {
    let app = TestApp::spawn();

    let wrong_password = app
        .send(json_request(
            "POST",
            "/app/auth/login",
            serde_json::json!({ "username": "student", "password": "wrong" }),
        ))
        .await;

    let unknown_user = app
        .send(json_request(
            "POST",
            "/app/auth/login",
            serde_json::json!({ "username": "nobody", "password": "wrong" }),
        ))
        .await;

    assert_eq!(wrong_password.status, StatusCode::UNAUTHORIZED);
    assert_eq!(unknown_user.status, StatusCode::UNAUTHORIZED);
    // Identical responses: the endpoint cannot be used to probe which
    // usernames exist.
    assert_eq!(wrong_password.body, unknown_user.body);
}

#[tokio::test]
async fn test_auth_login_inactive_account_is_rejected() {
    let app = TestApp::spawn();

    let response = app
        .send(json_request(
            "POST",
            "/app/auth/login",
            serde_json::json!({ "username": "ghost", "password": TEST_PASSWORD }),
        ))
        .await;

    assert_eq!(response.status, StatusCode::FORBIDDEN);
    assert_eq!(response.error_message(), "account is not active");
}

#[tokio::test]
async fn test_auth_login_empty_fields_are_rejected() {
    let app = TestApp::spawn();

    let response = app
        .send(json_request(
            "POST",
            "/app/auth/login",
            serde_json::json!({ "username": "", "password": "" }),
        ))
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}

// =============================================================================
// Session validation
// =============================================================================

#[tokio::test]
async fn test_auth_protected_route_requires_token() {
    let app = TestApp::spawn();

    let response = app.send(bare_request("GET", "/app/auth/profile")).await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.error_message(), "missing authorization header");
}

#[tokio::test]
async fn test_auth_profile_returns_identity() {
    let app = TestApp::spawn();
    let (access, _) = app.login("advisor").await;

    let response = app
        .send(bearer_request("GET", "/app/auth/profile", &access))
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.data()["username"], "advisor");
    assert_eq!(
        response.data()["userId"],
        serde_json::json!(app.advisor.id)
    );
}

#[tokio::test]
async fn test_auth_garbage_token_is_rejected() {
    let app = TestApp::spawn();

    let response = app
        .send(bearer_request("GET", "/app/auth/profile", "not.a.token"))
        .await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_auth_deactivated_account_loses_live_session() {
    let app = TestApp::spawn();
    let (access, _) = app.login("student").await;

    // The token is still unexpired, but the account is gone.
    app.directory.set_active(app.student.id, false);

    let response = app
        .send(bearer_request("GET", "/app/auth/profile", &access))
        .await;

    assert_eq!(response.status, StatusCode::FORBIDDEN);
    assert_eq!(response.error_message(), "account is not active");
}

// =============================================================================
// Logout and revocation
// =============================================================================

#[tokio::test]
async fn test_auth_logout_revokes_the_token() {
    let app = TestApp::spawn();
    let (access, _) = app.login("student").await;

    let response = app
        .send(bearer_request("POST", "/app/auth/logout", &access))
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(app.revocations.len(), 1);

    // Reusing the token before its natural expiry fails.
    let replay = app
        .send(bearer_request("GET", "/app/auth/profile", &access))
        .await;
    assert_eq!(replay.status, StatusCode::UNAUTHORIZED);
    assert_eq!(replay.error_message(), "token already logged out");
}

#[tokio::test]
async fn test_auth_logout_requires_a_session() {
    let app = TestApp::spawn();

    let response = app.send(bare_request("POST", "/app/auth/logout")).await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}

// =============================================================================
// Refresh
// =============================================================================

#[tokio::test]
async fn test_auth_refresh_rotates_the_pair() {
    let app = TestApp::spawn();
    let (_, refresh) = app.login("student").await;

    let response = app
        .send(json_request(
            "POST",
            "/app/auth/refresh",
            serde_json::json!({ "refreshToken": refresh }),
        ))
        .await;

    assert_eq!(response.status, StatusCode::OK);
    let new_access = response.data()["accessToken"].as_str().unwrap().to_string();

    // The fresh access token works.
    let profile = app
        .send(bearer_request("GET", "/app/auth/profile", &new_access))
        .await;
    assert_eq!(profile.status, StatusCode::OK);

    // The used refresh token was revoked by the rotation.
    let replay = app
        .send(json_request(
            "POST",
            "/app/auth/refresh",
            serde_json::json!({ "refreshToken": refresh }),
        ))
        .await;
    assert_eq!(replay.status, StatusCode::UNAUTHORIZED);
    assert_eq!(replay.error_message(), "invalid or expired refresh token");
}

#[tokio::test]
async fn test_auth_refresh_rejects_wrong_purpose_token() {
    let app = TestApp::spawn();
    let (access, _) = app.login("student").await;

    // An access token is signed with the access secret; the refresh
    // endpoint must not accept it.
    let response = app
        .send(json_request(
            "POST",
            "/app/auth/refresh",
            serde_json::json!({ "refreshToken": access }),
        ))
        .await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.error_message(), "invalid or expired refresh token");
}

#[tokio::test]
async fn test_auth_refresh_reflects_role_changes() {
    let app = TestApp::spawn();
    let (_, refresh) = app.login("student").await;

    // Reassign the account's role between login and refresh.
    let new_role = uuid::Uuid::new_v4();
    let mut updated = app.student.clone();
    updated.role_id = new_role;
    app.directory.insert(updated);

    let response = app
        .send(json_request(
            "POST",
            "/app/auth/refresh",
            serde_json::json!({ "refreshToken": refresh }),
        ))
        .await;

    assert_eq!(response.status, StatusCode::OK);
    let access = response.data()["accessToken"].as_str().unwrap();
    let claims = app.jwt.parse(access, TokenPurpose::Access).unwrap();
    assert_eq!(claims.role_id, Some(new_role));
}

#[tokio::test]
async fn test_auth_refresh_missing_token_is_bad_request() {
    let app = TestApp::spawn();

    let response = app
        .send(json_request(
            "POST",
            "/app/auth/refresh",
            serde_json::json!({ "refreshToken": "" }),
        ))
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}

// =============================================================================
// RBAC
// =============================================================================

#[tokio::test]
async fn test_rbac_missing_permission_is_403() {
    let app = TestApp::spawn();
    let (access, _) = app.login("student").await;

    let uri = format!("/app/users/{}", app.admin.id);
    let response = app.send(bearer_request("GET", &uri, &access)).await;

    assert_eq!(response.status, StatusCode::FORBIDDEN);
    assert_eq!(
        response.error_message(),
        "forbidden: missing permission user:manage"
    );
}

#[tokio::test]
async fn test_rbac_granted_permission_allows_lookup() {
    let app = TestApp::spawn();
    let (access, _) = app.login("admin").await;

    let uri = format!("/app/users/{}", app.student.id);
    let response = app.send(bearer_request("GET", &uri, &access)).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.data()["username"], "student");
    assert!(response.data().get("passwordHash").is_none());
}

#[tokio::test]
async fn test_rbac_downgrade_applies_on_the_next_request() {
    let app = TestApp::spawn();
    let (access, _) = app.login("admin").await;

    let uri = format!("/app/users/{}", app.student.id);
    let allowed = app.send(bearer_request("GET", &uri, &access)).await;
    assert_eq!(allowed.status, StatusCode::OK);

    // Strip the grant; no cache stands between the store and the gate.
    app.permissions.revoke_all(app.admin.id);

    let denied = app.send(bearer_request("GET", &uri, &access)).await;
    assert_eq!(denied.status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_rbac_gate_without_authenticator_fails_closed() {
    // A gated route wired without the authentication layer is a
    // configuration error; it must reject, not crash.
    let store = Arc::new(InMemoryPermissionStore::new());
    let router: Router = Router::new().route(
        "/gated",
        get(|| async { "unreachable" })
            .route_layer(RbacLayer::require(Permission::UserManage, store)),
    );

    let response = router
        .oneshot(bare_request("GET", "/gated"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

// =============================================================================
// Errors and envelopes
// =============================================================================

#[tokio::test]
async fn test_error_malformed_body_uses_the_error_envelope() {
    let app = TestApp::spawn();

    let request = axum::http::Request::builder()
        .method("POST")
        .uri("/app/auth/login")
        .header("content-type", "application/json")
        .body(axum::body::Body::from("{not json"))
        .unwrap();

    let response = app.send(request).await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["status"], "error");
}

#[tokio::test]
async fn test_error_unknown_user_id_is_404() {
    let app = TestApp::spawn();
    let (access, _) = app.login("admin").await;

    let uri = format!("/app/users/{}", uuid::Uuid::new_v4());
    let response = app.send(bearer_request("GET", &uri, &access)).await;

    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert_eq!(response.error_message(), "user not found");
}

#[tokio::test]
async fn test_error_invalid_user_id_is_400() {
    let app = TestApp::spawn();
    let (access, _) = app.login("admin").await;

    let response = app
        .send(bearer_request("GET", "/app/users/not-a-uuid", &access))
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_health_is_public() {
    let app = TestApp::spawn();

    let response = app.send(bare_request("GET", "/health")).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["status"], "ok");
}
