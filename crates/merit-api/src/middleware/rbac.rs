// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Role-based access control middleware.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use axum::{
    body::Body,
    http::Request,
    response::{IntoResponse, Response},
};
use tower::{Layer, Service};

use merit_core::PermissionStore;

use crate::auth::{AuthError, Identity, Permission, PermissionSet};
use crate::error::ApiError;

// =============================================================================
// RbacLayer
// =============================================================================

/// Per-route layer requiring a permission.
///
/// The permission store is queried on EVERY request; nothing is
/// cached. A role downgrade therefore takes effect on the subject's
/// very next request, at the price of one store round-trip per gated
/// call.
#[derive(Clone)]
pub struct RbacLayer {
    required: Permission,
    store: Arc<dyn PermissionStore>,
}

impl RbacLayer {
    /// Creates a layer requiring the given permission.
    pub fn require(required: Permission, store: Arc<dyn PermissionStore>) -> Self {
        Self { required, store }
    }
}

impl<S> Layer<S> for RbacLayer {
    type Service = RbacMiddleware<S>;

    fn layer(&self, inner: S) -> Self::Service {
        RbacMiddleware {
            inner,
            required: self.required,
            store: self.store.clone(),
        }
    }
}

// =============================================================================
// RbacMiddleware
// =============================================================================

/// Middleware enforcing a route's required permission.
#[derive(Clone)]
pub struct RbacMiddleware<S> {
    inner: S,
    required: Permission,
    store: Arc<dyn PermissionStore>,
}

impl<S> Service<Request<Body>> for RbacMiddleware<S>
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

    fn call(&mut self, req: Request<Body>) -> Self::Future {
        let required = self.required;
        let store = self.store.clone();
        let mut inner = self.inner.clone();

        Box::pin(async move {
            // Fail closed: a gated route with no authenticated identity
            // is a wiring error, not an allowed request.
            let identity = match req.extensions().get::<Identity>() {
                Some(identity) => identity.clone(),
                None => {
                    tracing::warn!("permission gate reached without an authenticated identity");
                    return Ok(reject(AuthError::Unauthenticated));
                }
            };

            let names = match store.permissions_for(identity.user_id).await {
                Ok(names) => names,
                Err(e) => {
                    tracing::error!(error = %e, subject = %identity.user_id, "permission store lookup failed");
                    return Ok(reject(AuthError::StoreUnavailable));
                }
            };

            let permissions = PermissionSet::from_names(names);

            if permissions.contains(required) {
                inner.call(req).await
            } else {
                tracing::warn!(
                    subject = %identity.user_id,
                    required = %required,
                    "permission denied"
                );
                Ok(reject(AuthError::MissingPermission {
                    permission: required,
                }))
            }
        })
    }
}

fn reject(error: AuthError) -> Response {
    ApiError::from(error).into_response()
}

// =============================================================================
// Tests
// =============================================================================
