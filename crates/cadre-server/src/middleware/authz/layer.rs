//! Per-route permission-check middleware.

use super::permission::{evaluate, PermissionCode, PermissionDecision};
use crate::{error::ApiError, middleware::auth::AuthUser};
use axum::{
    body::Body,
    http::Request,
    response::{IntoResponse, Response},
};
use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};
use tower::{Layer, Service};
use tracing::{info, warn};

/// Middleware factory: guard a route with one permission code.
///
/// Must be layered inside the authentication middleware; without an
/// attached user context the check fails closed.
pub fn require_permission(code: PermissionCode) -> RequirePermissionLayer {
    RequirePermissionLayer::new(code)
}

/// Layer form of the permission check.
#[derive(Clone, Copy)]
pub struct RequirePermissionLayer {
    code: PermissionCode,
}

impl RequirePermissionLayer {
    pub fn new(code: PermissionCode) -> Self {
        Self { code }
    }
}

impl<S> Layer<S> for RequirePermissionLayer {
    type Service = RequirePermissionMiddleware<S>;

    fn layer(&self, inner: S) -> Self::Service {
        RequirePermissionMiddleware {
            inner,
            code: self.code,
        }
    }
}

/// Permission-check middleware service.
#[derive(Clone)]
pub struct RequirePermissionMiddleware<S> {
    inner: S,
    code: PermissionCode,
}

impl<S> Service<Request<Body>> for RequirePermissionMiddleware<S>
where
    S: Service<Request<Body>, Response = Response> + Clone + Send + 'static,
    S::Future: Send + 'static,
{
    type Response = Response;
    type Error = S::Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, req: Request<Body>) -> Self::Future {
        let code = self.code;
        let mut inner = self.inner.clone();

        Box::pin(async move {
            let user = req.extensions().get::<AuthUser>();

            match evaluate(user, code) {
                PermissionDecision::Denied => {
                    match user {
                        Some(user) => warn!(
                            event = "authz_denied",
                            user_id = %user.id,
                            permission = %code,
                            "Authorization denied"
                        ),
                        None => warn!(
                            event = "authz_denied",
                            permission = %code,
                            "Permission check without authenticated user"
                        ),
                    }
                    // Status is final here, before the audit observer runs.
                    Ok(ApiError::InsufficientPermissions.into_response())
                }
                decision => {
                    if let Some(user) = user {
                        info!(
                            event = "authz_granted",
                            user_id = %user.id,
                            permission = %code,
                            super_admin = decision == PermissionDecision::GrantedSuperAdmin,
                            "Authorization granted"
                        );
                    }
                    inner.call(req).await
                }
            }
        })
    }
}
