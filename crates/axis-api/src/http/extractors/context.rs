//! Request context plumbing.
//!
//! [`request_context`] runs once per request: it assigns a request id,
//! arms a cancellation token that fires if the request future is dropped,
//! and logs the outcome. [`RequestScope`] hands the resulting
//! [`RequestContext`] to handlers.

use std::convert::Infallible;
use std::time::Instant;

use axum::extract::{FromRequestParts, Request};
use axum::http::HeaderValue;
use axum::http::request::Parts;
use axum::middleware::Next;
use axum::response::Response;
use axis_core::context::RequestContext;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};
use uuid::Uuid;

use super::auth::AuthenticatedUser;

pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Extractor yielding the request's [`RequestContext`], carrying the
/// authenticated user on gated routes.
#[derive(Debug, Clone)]
pub struct RequestScope(pub RequestContext);

impl<S: Send + Sync> FromRequestParts<S> for RequestScope {
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let ctx = parts
            .extensions
            .get::<RequestContext>()
            .cloned()
            .unwrap_or_else(RequestContext::detached);
        let ctx = match parts.extensions.get::<AuthenticatedUser>() {
            Some(AuthenticatedUser(user_id)) => ctx.with_user(*user_id),
            None => ctx,
        };
        Ok(Self(ctx))
    }
}

/// Per-request middleware: request id, cancellation on disconnect, and a
/// completion log line leveled by status.
pub async fn request_context(mut request: Request, next: Next) -> Response {
    let request_id = request
        .headers()
        .get(REQUEST_ID_HEADER)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| Uuid::parse_str(value).ok())
        .unwrap_or_else(Uuid::now_v7);

    let cancellation = CancellationToken::new();
    let guard = cancellation.clone().drop_guard();
    request
        .extensions_mut()
        .insert(RequestContext::new(request_id, cancellation));

    let method = request.method().clone();
    let uri = request.uri().path().to_owned();
    let start = Instant::now();

    let mut response = next.run(request).await;
    guard.disarm();

    let status = response.status().as_u16();
    let latency_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX);
    match status {
        500.. => error!(%request_id, %method, %uri, status, latency_ms, "request served"),
        400..=499 => warn!(%request_id, %method, %uri, status, latency_ms, "request served"),
        _ => info!(%request_id, %method, %uri, status, latency_ms, "request served"),
    }

    if let Ok(value) = HeaderValue::from_str(&request_id.to_string()) {
        response.headers_mut().insert(REQUEST_ID_HEADER, value);
    }
    response
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_scope_without_middleware_is_detached() {
        let (mut parts, _) = axum::http::Request::new(()).into_parts();
        let RequestScope(ctx) = RequestScope::from_request_parts(&mut parts, &())
            .await
            .unwrap();
        assert!(ctx.user_id.is_none());
        assert!(!ctx.is_cancelled());
    }

    #[tokio::test]
    async fn test_scope_picks_up_user() {
        let (mut parts, _) = axum::http::Request::new(()).into_parts();
        let ctx = RequestContext::detached();
        let request_id = ctx.request_id;
        let user_id = Uuid::now_v7();
        parts.extensions.insert(ctx);
        parts.extensions.insert(AuthenticatedUser(user_id));

        let RequestScope(ctx) = RequestScope::from_request_parts(&mut parts, &())
            .await
            .unwrap();
        assert_eq!(ctx.request_id, request_id);
        assert_eq!(ctx.require_user().unwrap(), user_id);
    }

    #[test]
    fn test_drop_guard_cancels() {
        let token = CancellationToken::new();
        let guard = token.clone().drop_guard();
        drop(guard);
        assert!(token.is_cancelled());
    }
}
