// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Bearer-token authentication middleware.

use std::collections::HashSet;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use axum::{
    body::Body,
    http::{header, Request},
    response::{IntoResponse, Response},
};
use tower::{Layer, Service};

use merit_core::UserDirectory;

use crate::auth::{
    AuthError, Identity, JwtManager, RevocationRegistry, SessionToken, TokenPurpose,
};
use crate::error::ApiError;

// =============================================================================
// AuthLayer
// =============================================================================

/// Layer for bearer-token authentication.
///
/// Wraps services so that every request outside the public paths must
/// carry a valid, unrevoked access token for an existing, active
/// account. On success the resolved [`Identity`] and the raw
/// [`SessionToken`] are attached to the request extensions.
#[derive(Clone)]
pub struct AuthLayer {
    jwt: Arc<JwtManager>,
    revocations: Arc<RevocationRegistry>,
    directory: Arc<dyn UserDirectory>,
    public_paths: Arc<HashSet<String>>,
}

impl AuthLayer {
    /// Creates a new auth layer.
    pub fn new(
        jwt: Arc<JwtManager>,
        revocations: Arc<RevocationRegistry>,
        directory: Arc<dyn UserDirectory>,
    ) -> Self {
        Self {
            jwt,
            revocations,
            directory,
            public_paths: Arc::new(HashSet::new()),
        }
    }

    /// Adds public paths that don't require authentication.
    pub fn with_public_paths(mut self, paths: Vec<String>) -> Self {
        self.public_paths = Arc::new(paths.into_iter().collect());
        self
    }

    /// Creates with the default public paths (health probe plus the
    /// endpoints that hand out tokens in the first place).
    pub fn with_default_public_paths(self) -> Self {
        self.with_public_paths(vec![
            "/health".to_string(),
            "/app/auth/login".to_string(),
            "/app/auth/refresh".to_string(),
        ])
    }
}

impl<S> Layer<S> for AuthLayer {
    type Service = AuthMiddleware<S>;

    fn layer(&self, inner: S) -> Self::Service {
        AuthMiddleware {
            inner,
            jwt: self.jwt.clone(),
            revocations: self.revocations.clone(),
            directory: self.directory.clone(),
            public_paths: self.public_paths.clone(),
        }
    }
}

// =============================================================================
// AuthMiddleware
// =============================================================================

/// Middleware performing the end-to-end authentication check.
#[derive(Clone)]
pub struct AuthMiddleware<S> {
    inner: S,
    jwt: Arc<JwtManager>,
    revocations: Arc<RevocationRegistry>,
    directory: Arc<dyn UserDirectory>,
    public_paths: Arc<HashSet<String>>,
}

impl<S> AuthMiddleware<S> {
    fn is_public_path(&self, path: &str) -> bool {
        self.public_paths.contains(path)
    }
}

impl<S> Service<Request<Body>> for AuthMiddleware<S>
where
    S: Service<Request<Body>, Response = Response> + Clone + Send + 'static,
    S::Future: Send + 'static,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut req: Request<Body>) -> Self::Future {
        let jwt = self.jwt.clone();
        let revocations = self.revocations.clone();
        let directory = self.directory.clone();
        let is_public = self.is_public_path(req.uri().path());
        let mut inner = self.inner.clone();

        Box::pin(async move {
            if is_public {
                return inner.call(req).await;
            }

            let token = match extract_bearer_token(&req) {
                Some(token) => token,
                None => {
                    tracing::debug!("no authorization token provided");
                    return Ok(reject(AuthError::MissingCredentials));
                }
            };

            // Revocation is checked before the signature: a logged-out
            // token is rejected even while it would still verify.
            if revocations.is_revoked(&token) {
                tracing::debug!("rejected revoked token");
                return Ok(reject(AuthError::Revoked));
            }

            let claims = match jwt.parse(&token, TokenPurpose::Access) {
                Ok(claims) => claims,
                Err(e) => {
                    tracing::debug!(error = %e, "token validation failed");
                    return Ok(reject(e));
                }
            };

            // The subject is re-fetched on every request so a deleted
            // or deactivated account loses its live sessions
            // immediately, not at token expiry.
            let user = match directory.find_by_id(claims.subject()).await {
                Ok(Some(user)) => user,
                Ok(None) => {
                    tracing::debug!(subject = %claims.subject(), "token subject not found");
                    return Ok(reject(AuthError::SubjectNotFound));
                }
                Err(e) => {
                    tracing::error!(error = %e, "user directory lookup failed");
                    return Ok(reject(AuthError::StoreUnavailable));
                }
            };

            if !user.is_active {
                tracing::debug!(subject = %user.id, "rejected inactive account");
                return Ok(reject(AuthError::AccountInactive));
            }

            let expires_at = match claims.expires_at() {
                Some(expires_at) => expires_at,
                None => return Ok(reject(AuthError::MalformedClaims)),
            };

            req.extensions_mut().insert(SessionToken {
                raw: token,
                expires_at,
            });
            req.extensions_mut().insert(Identity::from_user(&user));

            inner.call(req).await
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

fn reject(error: AuthError) -> Response {
    ApiError::from(error).into_response()
}

/// Extracts the bearer token from the Authorization header.
fn extract_bearer_token<B>(req: &Request<B>) -> Option<String> {
    req.headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer ").map(|s| s.to_string()))
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::{HeaderValue, StatusCode};
    use chrono::{Duration, Utc};
    use merit_core::{InMemoryDirectory, User};
    use tower::ServiceExt;
    use uuid::Uuid;

    use crate::config::AuthConfig;

    fn test_jwt() -> Arc<JwtManager> {
        let config = AuthConfig {
            access_secret: "access-secret-long-enough-for-middleware-tests".to_string(),
            refresh_secret: "refresh-secret-long-enough-for-middleware-tests".to_string(),
            ..AuthConfig::default()
        };
        Arc::new(JwtManager::new(&config).unwrap())
    }

    fn seeded_directory() -> (Arc<InMemoryDirectory>, User) {
        let directory = Arc::new(InMemoryDirectory::new());
        let user = User::new(
            "alice",
            "alice@campus.edu",
            "$2b$12$hash",
            "Alice",
            Uuid::new_v4(),
        );
        directory.insert(user.clone());
        (directory, user)
    }

    fn ok_service() -> tower::util::ServiceFn<
        fn(
            Request<Body>,
        ) -> std::future::Ready<Result<Response, std::convert::Infallible>>,
    > {
        tower::service_fn(|req: Request<Body>| {
            // Echo whether an identity was attached.
            let status = if req.extensions().get::<Identity>().is_some() {
                StatusCode::OK
            } else {
                StatusCode::NO_CONTENT
            };
            std::future::ready(Ok::<_, std::convert::Infallible>(
                Response::builder().status(status).body(Body::empty()).unwrap(),
            ))
        })
    }

    fn request(path: &str, token: Option<&str>) -> Request<Body> {
        let mut req = Request::builder().uri(path).body(Body::empty()).unwrap();
        if let Some(token) = token {
            req.headers_mut().insert(
                header::AUTHORIZATION,
                HeaderValue::from_str(&format!("Bearer {}", token)).unwrap(),
            );
        }
        req
    }

    #[test]
    fn test_extract_bearer_token() {
        let mut req = Request::builder().uri("/test").body(Body::empty()).unwrap();
        assert!(extract_bearer_token(&req).is_none());

        req.headers_mut()
            .insert(header::AUTHORIZATION, HeaderValue::from_static("Basic abc"));
        assert!(extract_bearer_token(&req).is_none());

        req.headers_mut().insert(
            header::AUTHORIZATION,
            HeaderValue::from_static("Bearer mytoken123"),
        );
        assert_eq!(extract_bearer_token(&req), Some("mytoken123".to_string()));
    }

    #[tokio::test]
    async fn test_missing_token_is_rejected() {
        let (directory, _) = seeded_directory();
        let layer = AuthLayer::new(test_jwt(), Arc::new(RevocationRegistry::new()), directory);
        let service = layer.layer(ok_service());

        let response = service.oneshot(request("/app/auth/profile", None)).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_valid_token_attaches_identity() {
        let jwt = test_jwt();
        let (directory, user) = seeded_directory();
        let token = jwt.issue_access_token(user.id, user.role_id).unwrap();

        let layer = AuthLayer::new(jwt, Arc::new(RevocationRegistry::new()), directory);
        let service = layer.layer(ok_service());

        let response = service
            .oneshot(request("/app/auth/profile", Some(&token)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_revoked_token_is_rejected() {
        let jwt = test_jwt();
        let (directory, user) = seeded_directory();
        let token = jwt.issue_access_token(user.id, user.role_id).unwrap();

        let revocations = Arc::new(RevocationRegistry::new());
        revocations.revoke(&token, Utc::now() + Duration::hours(1));

        let layer = AuthLayer::new(jwt, revocations, directory);
        let service = layer.layer(ok_service());

        let response = service
            .oneshot(request("/app/auth/profile", Some(&token)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_unknown_subject_is_rejected() {
        let jwt = test_jwt();
        let directory = Arc::new(InMemoryDirectory::new());
        let token = jwt
            .issue_access_token(Uuid::new_v4(), Uuid::new_v4())
            .unwrap();

        let layer = AuthLayer::new(jwt, Arc::new(RevocationRegistry::new()), directory);
        let service = layer.layer(ok_service());

        let response = service
            .oneshot(request("/app/auth/profile", Some(&token)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_inactive_account_is_rejected() {
        let jwt = test_jwt();
        let (directory, user) = seeded_directory();
        let token = jwt.issue_access_token(user.id, user.role_id).unwrap();
        directory.set_active(user.id, false);

        let layer = AuthLayer::new(jwt, Arc::new(RevocationRegistry::new()), directory);
        let service = layer.layer(ok_service());

        let response = service
            .oneshot(request("/app/auth/profile", Some(&token)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_public_path_bypasses_authentication() {
        let (directory, _) = seeded_directory();
        let layer = AuthLayer::new(test_jwt(), Arc::new(RevocationRegistry::new()), directory)
            .with_default_public_paths();
        let service = layer.layer(ok_service());

        let response = service.oneshot(request("/health", None)).await.unwrap();
        // Inner service ran without an identity attached.
        assert_eq!(response.status(), StatusCode::NO_CONTENT);
    }
}
