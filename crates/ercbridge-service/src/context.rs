//! Per-request context

use std::future::Future;
use std::time::Duration;

use tokio::time::{timeout_at, Instant};

use crate::error::{ServiceError, ServiceResult};

/// Deadline carried by one request
///
/// Without an explicit deadline every chain interaction gets its own
/// per-call timeout from the chain settings.
#[derive(Debug, Clone, Copy, Default)]
pub struct RequestContext {
    deadline: Option<Instant>,
}

impl RequestContext {
    /// Context with no deadline
    pub fn new() -> Self {
        Self::default()
    }

    /// Context that expires `timeout` from now
    pub fn with_timeout(timeout: Duration) -> Self {
        Self::with_deadline(Instant::now() + timeout)
    }

    /// Context that expires at `deadline`
    pub fn with_deadline(deadline: Instant) -> Self {
        Self {
            deadline: Some(deadline),
        }
    }

    /// Absolute deadline, if one was set
    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Run `fut` until the request deadline, or for `per_call` if there is none
    pub async fn run<F: Future>(&self, per_call: Duration, fut: F) -> ServiceResult<F::Output> {
        let deadline = self.deadline.unwrap_or_else(|| Instant::now() + per_call);
        timeout_at(deadline, fut)
            .await
            .map_err(|_| ServiceError::deadline_exceeded())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[tokio::test]
    async fn test_run_completes_before_deadline() {
        let ctx = RequestContext::with_timeout(Duration::from_secs(5));
        let value = ctx.run(Duration::from_secs(1), async { 7 }).await.unwrap();
        assert_eq!(value, 7);
    }

    #[tokio::test(start_paused = true)]
    async fn test_run_deadline_exceeded() {
        let ctx = RequestContext::with_timeout(Duration::from_millis(100));
        let err = ctx
            .run(Duration::from_secs(60), tokio::time::sleep(Duration::from_secs(1)))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Internal);
        assert_eq!(err.to_string(), "deadline exceeded");
    }

    #[tokio::test(start_paused = true)]
    async fn test_run_falls_back_to_per_call_timeout() {
        let ctx = RequestContext::new();
        assert!(ctx.deadline().is_none());
        let result = ctx
            .run(Duration::from_millis(10), tokio::time::sleep(Duration::from_secs(1)))
            .await;
        assert!(result.is_err());
    }
}
