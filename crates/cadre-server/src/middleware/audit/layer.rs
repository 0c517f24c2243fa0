//! Audit middleware layer.

use super::observer::{AuditObserver, RequestAudit};
use super::redaction::redact_json;
use crate::middleware::auth::AuthUser;
use axum::{
    body::Body,
    extract::{ConnectInfo, FromRequestParts, MatchedPath, RawPathParams},
    http::{header, request::Parts, HeaderMap, Request},
    response::Response,
};
use cadre_audit_capture::AuditRecorder;
use cadre_audit_types::{AuditAction, AuditActor};
use std::collections::HashMap;
use std::future::Future;
use std::net::SocketAddr;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};
use tower::{Layer, Service};

const DEFAULT_BODY_CAPTURE_LIMIT: usize = 64 * 1024;

/// Per-route audit configuration.
#[derive(Debug, Clone)]
struct AuditRouteConfig {
    resource: Option<String>,
    action: Option<AuditAction>,
    resource_id_param: Option<String>,
    body_capture_limit: usize,
}

impl Default for AuditRouteConfig {
    fn default() -> Self {
        Self {
            resource: None,
            action: None,
            resource_id_param: None,
            body_capture_limit: DEFAULT_BODY_CAPTURE_LIMIT,
        }
    }
}

/// Audit layer: records one entry per qualifying request on the routes it
/// wraps.
///
/// Configuration is optional; unset fields are derived per request
/// (resource from the matched route, action from the method, resource id
/// from the `id` path parameter).
#[derive(Clone)]
pub struct AuditLayer {
    recorder: AuditRecorder,
    config: Arc<AuditRouteConfig>,
}

impl AuditLayer {
    /// Create a layer submitting to `recorder`.
    pub fn new(recorder: AuditRecorder) -> Self {
        Self {
            recorder,
            config: Arc::new(AuditRouteConfig::default()),
        }
    }

    fn config_mut(&mut self) -> &mut AuditRouteConfig {
        Arc::make_mut(&mut self.config)
    }

    /// Fix the resource label instead of deriving it from the route.
    pub fn resource(mut self, resource: impl Into<String>) -> Self {
        self.config_mut().resource = Some(resource.into());
        self
    }

    /// Fix the action instead of deriving it from the HTTP method.
    pub fn action(mut self, action: AuditAction) -> Self {
        self.config_mut().action = Some(action);
        self
    }

    /// Name the path parameter holding the resource identifier.
    pub fn resource_id_param(mut self, param: impl Into<String>) -> Self {
        self.config_mut().resource_id_param = Some(param.into());
        self
    }

    /// Cap the request body size the layer will capture.
    pub fn body_capture_limit(mut self, limit: usize) -> Self {
        self.config_mut().body_capture_limit = limit;
        self
    }
}

impl<S> Layer<S> for AuditLayer {
    type Service = AuditMiddleware<S>;

    fn layer(&self, inner: S) -> Self::Service {
        AuditMiddleware {
            inner,
            recorder: self.recorder.clone(),
            config: self.config.clone(),
        }
    }
}

/// Audit middleware service.
#[derive(Clone)]
pub struct AuditMiddleware<S> {
    inner: S,
    recorder: AuditRecorder,
    config: Arc<AuditRouteConfig>,
}

impl<S> Service<Request<Body>> for AuditMiddleware<S>
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
        let recorder = self.recorder.clone();
        let config = self.config.clone();
        let mut inner = self.inner.clone();

        Box::pin(async move {
            let (mut parts, body) = req.into_parts();

            let matched_path = parts
                .extensions
                .get::<MatchedPath>()
                .map(|m| m.as_str().to_string());
            let params = extract_params(&mut parts).await;
            let query = parts
                .uri
                .query()
                .map(parse_query)
                .unwrap_or_default();
            let user = parts.extensions.get::<AuthUser>().cloned();
            let user_agent = parts
                .headers
                .get(header::USER_AGENT)
                .and_then(|v| v.to_str().ok())
                .map(String::from);
            let ip_address = client_ip(&parts);
            let method = parts.method.as_str().to_string();
            let path = parts.uri.path().to_string();

            let (body, captured_body) =
                capture_body(&parts.headers, body, config.body_capture_limit).await;
            let req = Request::from_parts(parts, body);

            let resource = config
                .resource
                .clone()
                .unwrap_or_else(|| derive_resource(matched_path.as_deref(), &path));
            let resource_id = config
                .resource_id_param
                .as_deref()
                .and_then(|p| params.get(p))
                .or_else(|| params.get("id"))
                .cloned();
            let actor = match user {
                Some(u) => AuditActor::user(u.id, u.email),
                None => AuditActor::Anonymous,
            };

            let observer = AuditObserver::new(
                recorder,
                RequestAudit {
                    action: config.action,
                    resource,
                    resource_id,
                    actor,
                    ip_address,
                    method,
                    path,
                    params,
                    query,
                    body: captured_body,
                    user_agent,
                },
            );

            let response = inner.call(req).await?;

            // The status is final; record without delaying the response.
            observer.finish(response.status());

            Ok(response)
        })
    }
}

async fn extract_params(parts: &mut Parts) -> HashMap<String, String> {
    match RawPathParams::from_request_parts(parts, &()).await {
        Ok(params) => params
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect(),
        Err(_) => HashMap::new(),
    }
}

fn parse_query(query: &str) -> HashMap<String, String> {
    url::form_urlencoded::parse(query.as_bytes())
        .into_owned()
        .collect()
}

fn client_ip(parts: &Parts) -> Option<String> {
    parts
        .headers
        .get("x-forwarded-for")
        .or_else(|| parts.headers.get("x-real-ip"))
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(|s| s.trim().to_string())
        .or_else(|| {
            parts
                .extensions
                .get::<ConnectInfo<SocketAddr>>()
                .map(|ConnectInfo(addr)| addr.ip().to_string())
        })
}

/// Resource label fallback: last static segment of the matched route, else
/// last segment of the concrete path.
fn derive_resource(matched_path: Option<&str>, path: &str) -> String {
    if let Some(matched) = matched_path {
        if let Some(segment) = matched
            .split('/')
            .filter(|s| !s.is_empty() && !s.starts_with(':'))
            .last()
        {
            return segment.to_string();
        }
    }
    path.split('/')
        .filter(|s| !s.is_empty())
        .last()
        .unwrap_or("unknown")
        .to_string()
}

/// Buffer and sanitize a JSON request body, handing the bytes back for the
/// inner handler.
///
/// Only bodies with a declared content length within the cap are touched;
/// streaming or oversized bodies pass through unobserved.
async fn capture_body(
    headers: &HeaderMap,
    body: Body,
    limit: usize,
) -> (Body, Option<serde_json::Value>) {
    let declared = headers
        .get(header::CONTENT_LENGTH)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse::<usize>().ok());
    let is_json = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(|v| v.starts_with("application/json"))
        .unwrap_or(false);

    match declared {
        Some(n) if n > 0 && n <= limit && is_json => {
            match axum::body::to_bytes(body, limit).await {
                Ok(bytes) => {
                    let captured = serde_json::from_slice::<serde_json::Value>(&bytes)
                        .ok()
                        .map(|mut value| {
                            redact_json(&mut value);
                            value
                        });
                    (Body::from(bytes), captured)
                }
                Err(_) => (Body::empty(), None),
            }
        }
        _ => (body, None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn resource_from_matched_path_skips_params() {
        assert_eq!(
            derive_resource(Some("/api/v1/contacts/:id"), "/api/v1/contacts/42"),
            "contacts"
        );
        assert_eq!(
            derive_resource(Some("/api/v1/roles"), "/api/v1/roles"),
            "roles"
        );
    }

    #[test]
    fn resource_falls_back_to_request_path() {
        assert_eq!(derive_resource(None, "/api/v1/contacts"), "contacts");
        assert_eq!(derive_resource(None, "/"), "unknown");
    }

    #[test]
    fn query_parsing() {
        let parsed = parse_query("page=2&limit=10&search=ac%20me");
        assert_eq!(parsed.get("page").unwrap(), "2");
        assert_eq!(parsed.get("search").unwrap(), "ac me");
    }

    #[tokio::test]
    async fn body_capture_redacts_and_preserves_bytes() {
        let payload = json!({"name": "Acme", "password": "hunter2"});
        let bytes = serde_json::to_vec(&payload).unwrap();

        let mut headers = HeaderMap::new();
        headers.insert(header::CONTENT_TYPE, "application/json".parse().unwrap());
        headers.insert(header::CONTENT_LENGTH, bytes.len().to_string().parse().unwrap());

        let (body, captured) = capture_body(&headers, Body::from(bytes.clone()), 1024).await;

        let captured = captured.unwrap();
        assert_eq!(captured["name"], "Acme");
        assert_eq!(captured["password"], super::super::REDACTED_SENTINEL);

        // The handler still sees the original, unredacted bytes.
        let forwarded = axum::body::to_bytes(body, usize::MAX).await.unwrap();
        assert_eq!(forwarded.as_ref(), bytes.as_slice());
    }

    #[tokio::test]
    async fn oversized_bodies_are_not_captured() {
        let bytes = vec![b'x'; 2048];
        let mut headers = HeaderMap::new();
        headers.insert(header::CONTENT_TYPE, "application/json".parse().unwrap());
        headers.insert(header::CONTENT_LENGTH, bytes.len().to_string().parse().unwrap());

        let (_body, captured) = capture_body(&headers, Body::from(bytes), 1024).await;
        assert!(captured.is_none());
    }

    #[tokio::test]
    async fn non_json_bodies_are_not_captured() {
        let mut headers = HeaderMap::new();
        headers.insert(header::CONTENT_TYPE, "text/plain".parse().unwrap());
        headers.insert(header::CONTENT_LENGTH, "5".parse().unwrap());

        let (_body, captured) = capture_body(&headers, Body::from("hello"), 1024).await;
        assert!(captured.is_none());
    }
}
