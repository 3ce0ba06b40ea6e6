//! Timer abstraction for the polling loop.

use std::time::Duration;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::auth::AuthError;

/// Waits between poll attempts.
///
/// Implementations must return [`AuthError::Cancelled`] as soon as `cancel`
/// fires, without waiting out the rest of the delay.
#[async_trait]
pub trait Scheduler: Send + Sync {
    async fn wait(&self, delay: Duration, cancel: &CancellationToken) -> Result<(), AuthError>;
}

/// Scheduler backed by `tokio::time::sleep`.
///
/// Honors tokio's paused clock, so tests can use `start_paused = true`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioScheduler;

#[async_trait]
impl Scheduler for TokioScheduler {
    async fn wait(&self, delay: Duration, cancel: &CancellationToken) -> Result<(), AuthError> {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => Err(AuthError::Cancelled),
            _ = tokio::time::sleep(delay) => Ok(()),
        }
    }
}
