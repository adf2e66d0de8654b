//! Request-scoped cancellation context with an optional deadline.
//!
//! One [`RequestContext`] spans a whole pipeline invocation. Every stage and
//! every outbound lookup observes it; cancelling the context (or letting its
//! deadline pass) ends all of them together.

use std::future::Future;
use std::time::Duration;

use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use crate::error::{RefineError, Result};

/// Cancellable, deadline-bearing context shared by one request.
///
/// Cloning is cheap and clones observe the same cancellation state.
#[derive(Debug, Clone, Default)]
pub struct RequestContext {
    token: CancellationToken,
    deadline: Option<Instant>,
}

impl RequestContext {
    /// A context with no deadline. It ends only when cancelled.
    pub fn new() -> Self {
        Self::default()
    }

    /// A context that ends `timeout` from now.
    pub fn with_timeout(timeout: Duration) -> Self {
        Self::with_deadline(Instant::now() + timeout)
    }

    /// A context that ends at `deadline`.
    pub fn with_deadline(deadline: Instant) -> Self {
        Self {
            token: CancellationToken::new(),
            deadline: Some(deadline),
        }
    }

    /// A child context: cancelled together with `self`, but cancelling the
    /// child leaves `self` untouched. The deadline is inherited.
    pub fn child(&self) -> Self {
        Self {
            token: self.token.child_token(),
            deadline: self.deadline,
        }
    }

    /// Cancel this context and all of its children.
    pub fn cancel(&self) {
        self.token.cancel();
    }

    /// Returns `true` once [`cancel`](Self::cancel) has been called here or on a parent.
    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    /// The deadline, if any.
    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Returns `Ok(())` while the context is live.
    ///
    /// # Errors
    ///
    /// [`RefineError::Cancelled`] after cancellation, or
    /// [`RefineError::DeadlineExceeded`] once the deadline has passed.
    pub fn check(&self) -> Result<()> {
        if self.token.is_cancelled() {
            return Err(RefineError::Cancelled);
        }
        match self.deadline {
            Some(deadline) if Instant::now() >= deadline => Err(RefineError::DeadlineExceeded),
            _ => Ok(()),
        }
    }

    /// Returns `true` once the context is cancelled or past its deadline.
    pub fn is_done(&self) -> bool {
        self.check().is_err()
    }

    /// Resolves when the context ends, yielding the reason.
    pub async fn done(&self) -> RefineError {
        match self.deadline {
            Some(deadline) => tokio::select! {
                biased;
                () = self.token.cancelled() => RefineError::Cancelled,
                () = tokio::time::sleep_until(deadline) => RefineError::DeadlineExceeded,
            },
            None => {
                self.token.cancelled().await;
                RefineError::Cancelled
            }
        }
    }

    /// Drive `fut` to completion unless the context ends first.
    ///
    /// # Errors
    ///
    /// Returns the reason the context ended if that happens before `fut`
    /// completes. An already-ended context never polls `fut`.
    pub async fn run_until_done<F>(&self, fut: F) -> Result<F::Output>
    where
        F: Future,
    {
        self.check()?;
        tokio::select! {
            biased;
            reason = self.done() => Err(reason),
            out = fut => Ok(out),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_context_is_live() {
        let ctx = RequestContext::new();
        assert!(!ctx.is_done());
        assert!(ctx.deadline().is_none());
        assert!(ctx.check().is_ok());
    }

    #[test]
    fn cancel_reaches_children_but_not_parents() {
        let parent = RequestContext::new();
        let child = parent.child();
        child.cancel();
        assert!(child.is_cancelled());
        assert!(!parent.is_cancelled());

        let other = parent.child();
        parent.cancel();
        assert!(other.is_cancelled());
        assert!(matches!(other.check(), Err(RefineError::Cancelled)));
    }

    #[tokio::test]
    async fn zero_timeout_is_immediately_done() {
        let ctx = RequestContext::with_timeout(Duration::ZERO);
        assert!(matches!(ctx.check(), Err(RefineError::DeadlineExceeded)));
        assert!(matches!(ctx.done().await, RefineError::DeadlineExceeded));
    }

    #[tokio::test]
    async fn run_until_done_returns_output_when_live() {
        let ctx = RequestContext::with_timeout(Duration::from_secs(5));
        let out = ctx.run_until_done(async { 7 }).await;
        assert_eq!(out.expect("live context"), 7);
    }

    #[tokio::test]
    async fn run_until_done_stops_on_cancel() {
        let ctx = RequestContext::new();
        let canceller = ctx.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(10)).await;
            canceller.cancel();
        });
        let out = ctx.run_until_done(std::future::pending::<()>()).await;
        assert!(matches!(out, Err(RefineError::Cancelled)));
    }

    #[tokio::test(start_paused = true)]
    async fn run_until_done_stops_at_deadline() {
        let ctx = RequestContext::with_timeout(Duration::from_secs(10));
        let out = ctx.run_until_done(std::future::pending::<()>()).await;
        assert!(matches!(out, Err(RefineError::DeadlineExceeded)));
    }
}
