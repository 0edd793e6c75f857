//! The skill handler seam.
//!
//! The dispatcher does not know anything about what a skill does.  It is given
//! a [`SkillHandler`] and calls it once per request, in both production and
//! debug mode.  The handler decides the request and response types; the
//! dispatcher only needs to be able to deserialize the one and serialize the
//! other.
//!
//! Handlers that are plain synchronous functions can be adapted with
//! [`handler_fn`]:
//!
//! ```rust
//! use skill_relay::application::{handler_fn, HandlerContext, HandlerError};
//!
//! let handler = handler_fn(|_ctx: &HandlerContext, request: serde_json::Value| {
//!     Ok::<_, HandlerError>(request)
//! });
//! # let _ = handler;
//! ```

use std::marker::PhantomData;
use std::sync::Arc;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tokio_util::sync::CancellationToken;

/// Error returned by a handler.  The dispatcher logs it and otherwise treats
/// every handler error the same way.
pub type HandlerError = anyhow::Error;

/// Per-invocation context passed to the handler.
#[derive(Debug, Clone)]
pub struct HandlerContext {
    cancel: CancellationToken,
    request_id: String,
}

impl HandlerContext {
    /// Creates a context for the invocation identified by `request_id`.
    pub fn new(cancel: CancellationToken, request_id: impl Into<String>) -> Self {
        Self {
            cancel,
            request_id: request_id.into(),
        }
    }

    /// Correlation id of the request being handled.
    pub fn request_id(&self) -> &str {
        &self.request_id
    }

    /// The cancellation scope of the surrounding session.
    ///
    /// Cancellation is only observed at await points.  The session stops
    /// waiting for an async handler once the scope is cancelled, but a
    /// synchronous body such as a [`handler_fn`] closure runs to completion
    /// first.  Long-running handlers should check [`CancellationToken::is_cancelled`]
    /// or race their work against [`CancellationToken::cancelled`].
    pub fn cancellation(&self) -> &CancellationToken {
        &self.cancel
    }

    /// Returns `true` once the surrounding session has been cancelled.
    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }
}

/// Business logic invoked once per skill request.
#[async_trait]
pub trait SkillHandler: Send + Sync {
    /// The assistant request type, decoded from the request payload.
    type Request: DeserializeOwned + Send + 'static;

    /// The skill response type, encoded into the response payload.
    type Response: Serialize + Send + 'static;

    /// Handles one request.
    async fn handle(
        &self,
        ctx: &HandlerContext,
        request: Self::Request,
    ) -> Result<Self::Response, HandlerError>;
}

#[async_trait]
impl<H: SkillHandler + ?Sized> SkillHandler for Arc<H> {
    type Request = H::Request;
    type Response = H::Response;

    async fn handle(
        &self,
        ctx: &HandlerContext,
        request: Self::Request,
    ) -> Result<Self::Response, HandlerError> {
        (**self).handle(ctx, request).await
    }
}

/// A [`SkillHandler`] backed by a synchronous function.
///
/// Built with [`handler_fn`].
pub struct FnHandler<F, Req, Resp> {
    func: F,
    _types: PhantomData<fn(Req) -> Resp>,
}

/// Wraps a synchronous `(context, request) -> Result<response, error>`
/// function as a [`SkillHandler`].
pub fn handler_fn<F, Req, Resp>(func: F) -> FnHandler<F, Req, Resp>
where
    F: Fn(&HandlerContext, Req) -> Result<Resp, HandlerError> + Send + Sync,
{
    FnHandler {
        func,
        _types: PhantomData,
    }
}

#[async_trait]
impl<F, Req, Resp> SkillHandler for FnHandler<F, Req, Resp>
where
    F: Fn(&HandlerContext, Req) -> Result<Resp, HandlerError> + Send + Sync,
    Req: DeserializeOwned + Send + 'static,
    Resp: Serialize + Send + 'static,
{
    type Request = Req;
    type Response = Resp;

    async fn handle(&self, ctx: &HandlerContext, request: Req) -> Result<Resp, HandlerError> {
        (self.func)(ctx, request)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::anyhow;

    #[tokio::test]
    async fn test_handler_fn_passes_request_and_context_through() {
        // Arrange
        let handler = handler_fn(|ctx: &HandlerContext, n: u32| Ok(format!("{}:{n}", ctx.request_id())));
        let ctx = HandlerContext::new(CancellationToken::new(), "req-7");

        // Act
        let out = handler.handle(&ctx, 41).await.unwrap();

        // Assert
        assert_eq!(out, "req-7:41");
    }

    #[tokio::test]
    async fn test_handler_fn_propagates_errors() {
        let handler =
            handler_fn(|_ctx: &HandlerContext, _n: u32| -> Result<u32, HandlerError> { Err(anyhow!("no")) });
        let ctx = HandlerContext::new(CancellationToken::new(), "r");

        let err = handler.handle(&ctx, 1).await.unwrap_err();

        assert_eq!(err.to_string(), "no");
    }

    #[tokio::test]
    async fn test_arc_handler_delegates() {
        let handler = Arc::new(handler_fn(|_ctx: &HandlerContext, n: i64| Ok(n * 2)));
        let ctx = HandlerContext::new(CancellationToken::new(), "r");
        assert_eq!(handler.handle(&ctx, 21).await.unwrap(), 42);
    }

    #[test]
    fn test_context_reports_cancellation() {
        // Arrange
        let token = CancellationToken::new();
        let ctx = HandlerContext::new(token.clone(), "r");
        assert!(!ctx.is_cancelled());

        // Act
        token.cancel();

        // Assert
        assert!(ctx.is_cancelled());
        assert!(ctx.cancellation().is_cancelled());
    }
}
