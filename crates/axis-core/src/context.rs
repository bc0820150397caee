//! Per-request context.
//!
//! `RequestContext` carries the request id, the authenticated identity (when
//! the route is gated), and a cancellation token that the HTTP layer cancels
//! when the client goes away. Services race every outbound call against that
//! token and a deadline via [`RequestContext::bounded`].

use std::future::Future;
use std::time::Duration;

use axis_types::error::HttpError;
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::error;
use uuid::Uuid;

/// Why a bounded call did not complete.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Interrupted {
    #[error("timed out after {0:?}")]
    TimedOut(Duration),

    #[error("request cancelled")]
    Cancelled,
}

/// Request-scoped state threaded explicitly through service calls.
#[derive(Debug, Clone)]
pub struct RequestContext {
    pub request_id: Uuid,
    /// Authenticated user, set by the auth gate.
    pub user_id: Option<Uuid>,
    pub cancellation: CancellationToken,
}

impl RequestContext {
    pub fn new(request_id: Uuid, cancellation: CancellationToken) -> Self {
        Self {
            request_id,
            user_id: None,
            cancellation,
        }
    }

    /// A context with a fresh id and its own token. Used outside HTTP.
    pub fn detached() -> Self {
        Self::new(Uuid::now_v7(), CancellationToken::new())
    }

    pub fn with_user(mut self, user_id: Uuid) -> Self {
        self.user_id = Some(user_id);
        self
    }

    /// The authenticated user.
    ///
    /// Gated routes always populate this, so a missing identity is a wiring
    /// bug and surfaces as an internal error.
    pub fn require_user(&self) -> Result<Uuid, HttpError> {
        self.user_id.ok_or_else(|| {
            error!(
                request_id = %self.request_id,
                "identity required but request context has no user"
            );
            HttpError::internal()
        })
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancellation.is_cancelled()
    }

    pub fn cancel(&self) {
        self.cancellation.cancel();
    }

    /// Run `fut` until it completes, `limit` elapses, or the request is cancelled.
    pub async fn bounded<F>(&self, limit: Duration, fut: F) -> Result<F::Output, Interrupted>
    where
        F: Future,
    {
        tokio::select! {
            biased;
            _ = self.cancellation.cancelled() => Err(Interrupted::Cancelled),
            result = tokio::time::timeout(limit, fut) => {
                result.map_err(|_| Interrupted::TimedOut(limit))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axis_types::error::ErrorKind;

    #[tokio::test]
    async fn test_bounded_completes() {
        let ctx = RequestContext::detached();
        let value = ctx.bounded(Duration::from_secs(1), async { 7 }).await;
        assert_eq!(value, Ok(7));
    }

    #[tokio::test(start_paused = true)]
    async fn test_bounded_times_out() {
        let ctx = RequestContext::detached();
        let result = ctx
            .bounded(Duration::from_millis(50), tokio::time::sleep(Duration::from_secs(5)))
            .await;
        assert_eq!(result, Err(Interrupted::TimedOut(Duration::from_millis(50))));
    }

    #[tokio::test]
    async fn test_bounded_observes_cancellation() {
        let ctx = RequestContext::detached();
        ctx.cancel();
        let result = ctx
            .bounded(Duration::from_secs(5), std::future::pending::<()>())
            .await;
        assert_eq!(result, Err(Interrupted::Cancelled));
        assert!(ctx.is_cancelled());
    }

    #[test]
    fn test_require_user() {
        let ctx = RequestContext::detached();
        let err = ctx.require_user().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Internal);

        let user_id = Uuid::now_v7();
        assert_eq!(ctx.with_user(user_id).require_user().unwrap(), user_id);
    }
}
