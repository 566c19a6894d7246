//! Request-scoped context.

use std::future::Future;

use tokio_util::sync::CancellationToken;

use crate::error::Cancelled;

/// Carries the cancellation signal of one host request through every port
/// call.
#[derive(Debug, Clone, Default)]
pub struct Context {
    token: CancellationToken,
}

impl Context {
    /// A fresh context that is not cancelled.
    pub fn new() -> Self {
        Self::default()
    }

    /// A context driven by an existing token.
    pub fn with_token(token: CancellationToken) -> Self {
        Self { token }
    }

    /// A context cancelled together with this one.
    pub fn child(&self) -> Self {
        Self {
            token: self.token.child_token(),
        }
    }

    /// Cancel the request.
    pub fn cancel(&self) {
        self.token.cancel();
    }

    /// Whether the request was cancelled.
    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Fail fast when the request was already cancelled.
    pub fn check(&self) -> Result<(), Cancelled> {
        if self.is_cancelled() {
            return Err(Cancelled);
        }
        Ok(())
    }

    /// Resolves once the request is cancelled.
    pub async fn cancelled(&self) {
        self.token.cancelled().await
    }

    /// Drive `fut` to completion unless the request is cancelled first.
    pub async fn run<F: Future>(&self, fut: F) -> Result<F::Output, Cancelled> {
        tokio::select! {
            biased;
            _ = self.token.cancelled() => Err(Cancelled),
            out = fut => Ok(out),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_run_completes() {
        let ctx = Context::new();
        assert_eq!(ctx.run(async { 7 }).await, Ok(7));
    }

    #[tokio::test]
    async fn test_run_observes_cancellation() {
        let ctx = Context::new();
        ctx.cancel();
        let out = ctx.run(std::future::pending::<()>()).await;
        assert_eq!(out, Err(Cancelled));
        assert_eq!(ctx.check(), Err(Cancelled));
    }

    #[test]
    fn test_run_outside_runtime_helper() {
        let ctx = Context::new();
        tokio_test::assert_ok!(tokio_test::block_on(ctx.run(async {})));
        ctx.cancel();
        tokio_test::assert_err!(tokio_test::block_on(ctx.run(async {})));
    }

    #[test]
    fn test_child_follows_parent() {
        let parent = Context::new();
        let child = parent.child();
        assert!(!child.is_cancelled());
        parent.cancel();
        assert!(child.is_cancelled());
    }
}
