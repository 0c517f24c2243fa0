//! Authentication middleware layer.

use super::{
    jwt::decode_token,
    types::{AuthUser, TokenType},
};
use crate::error::ApiError;
use axum::{
    body::Body,
    http::{header, Request},
    response::{IntoResponse, Response},
};
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};
use tower::{Layer, Service};

/// Authentication layer configuration.
#[derive(Clone)]
pub struct AuthLayer {
    jwt_secret: Arc<String>,
}

impl AuthLayer {
    /// Create new auth layer.
    pub fn new(jwt_secret: impl Into<String>) -> Self {
        Self {
            jwt_secret: Arc::new(jwt_secret.into()),
        }
    }
}

impl<S> Layer<S> for AuthLayer {
    type Service = AuthMiddleware<S>;

    fn layer(&self, inner: S) -> Self::Service {
        AuthMiddleware {
            inner,
            jwt_secret: self.jwt_secret.clone(),
        }
    }
}

/// Authentication middleware service.
///
/// On success inserts an [`AuthUser`] into request extensions; on any
/// failure short-circuits with a 401 JSON response. Downstream services are
/// never invoked for unauthenticated requests.
#[derive(Clone)]
pub struct AuthMiddleware<S> {
    inner: S,
    jwt_secret: Arc<String>,
}

impl<S> Service<Request<Body>> for AuthMiddleware<S>
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

    fn call(&mut self, mut req: Request<Body>) -> Self::Future {
        let jwt_secret = self.jwt_secret.clone();
        let mut inner = self.inner.clone();

        Box::pin(async move {
            let token = match extract_token(&req) {
                Ok(token) => token,
                Err(err) => return Ok(err.into_response()),
            };

            let claims = match decode_token(&token, &jwt_secret) {
                Ok(claims) => claims,
                Err(err) => return Ok(ApiError::from(err).into_response()),
            };

            if claims.token_type != TokenType::Access {
                return Ok(ApiError::InvalidToken.into_response());
            }
            if claims.is_expired() {
                return Ok(ApiError::TokenExpired.into_response());
            }

            match AuthUser::from_claims(&claims) {
                Some(auth_user) => {
                    req.extensions_mut().insert(auth_user);
                }
                None => return Ok(ApiError::InvalidToken.into_response()),
            }

            // Continue to handler
            inner.call(req).await
        })
    }
}

fn extract_token(req: &Request<Body>) -> Result<String, ApiError> {
    // Try Authorization header first
    if let Some(auth_header) = req.headers().get(header::AUTHORIZATION) {
        let auth_str = auth_header.to_str().map_err(|_| ApiError::InvalidToken)?;

        if let Some(token) = auth_str.strip_prefix("Bearer ") {
            return Ok(token.to_string());
        }
    }

    // Try cookie as fallback
    if let Some(cookie_header) = req.headers().get(header::COOKIE) {
        let cookie_str = cookie_header.to_str().map_err(|_| ApiError::InvalidToken)?;

        for cookie in cookie_str.split(';') {
            let cookie = cookie.trim();
            if let Some(token) = cookie.strip_prefix("access_token=") {
                return Ok(token.to_string());
            }
        }
    }

    Err(ApiError::Unauthorized)
}
