//! Per-operation cancellation and deadline.

use std::future::Future;
use std::time::Duration;

use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use crate::error::{AppError, AppResult};

/// Cancellation token plus optional deadline carried by every store operation.
///
/// Contexts derived with [`OpContext::child`] are cancelled together with
/// their parent, which lets the server abort in-flight queries on shutdown.
#[derive(Debug, Clone, Default)]
pub struct OpContext {
    token: CancellationToken,
    deadline: Option<Instant>,
}

impl OpContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_timeout(timeout: Duration) -> Self {
        Self::new().deadline_in(timeout)
    }

    pub fn deadline_in(mut self, timeout: Duration) -> Self {
        self.deadline = Some(Instant::now() + timeout);
        self
    }

    /// Shares cancellation with `self`; the deadline is copied.
    pub fn child(&self) -> Self {
        Self {
            token: self.token.child_token(),
            deadline: self.deadline,
        }
    }

    pub fn token(&self) -> &CancellationToken {
        &self.token
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    pub fn cancel(&self) {
        self.token.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Drives `fut` until it completes, the token fires or the deadline passes.
    ///
    /// Dropping `fut` on cancellation releases any pooled connection it held;
    /// an open transaction is rolled back by the server when the connection
    /// is reset.
    pub async fn run<T, F>(&self, operation: &str, fut: F) -> AppResult<T>
    where
        F: Future<Output = AppResult<T>>,
    {
        if self.token.is_cancelled() {
            return Err(AppError::Cancelled {
                operation: operation.to_string(),
            });
        }

        let guarded = async {
            tokio::select! {
                biased;
                _ = self.token.cancelled() => Err(AppError::Cancelled {
                    operation: operation.to_string(),
                }),
                result = fut => result,
            }
        };

        match self.deadline {
            Some(deadline) => tokio::time::timeout_at(deadline, guarded)
                .await
                .unwrap_or_else(|_| {
                    Err(AppError::DeadlineExceeded {
                        operation: operation.to_string(),
                    })
                }),
            None => guarded.await,
        }
    }
}
