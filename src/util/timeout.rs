//! Deadline and cancellation helpers.

use std::future::Future;
use std::time::Duration;

use tokio_util::sync::CancellationToken;

use crate::auth::AuthError;

/// Wrap a future with a hard deadline.
///
/// The polling loop never enforces the provider's `expires_in` itself;
/// callers that want an upper bound wrap it with this.
pub async fn with_deadline<T>(
    duration: Duration,
    future: impl Future<Output = Result<T, AuthError>>,
) -> Result<T, AuthError> {
    match tokio::time::timeout(duration, future).await {
        Ok(result) => result,
        Err(_) => Err(AuthError::Timeout(duration.as_millis() as u64)),
    }
}

/// Drive `future` until it finishes or `cancel` fires, whichever is first.
///
/// On cancellation the future is dropped, which aborts an in-flight
/// request.
pub async fn until_cancelled<T>(
    cancel: &CancellationToken,
    future: impl Future<Output = Result<T, AuthError>>,
) -> Result<T, AuthError> {
    tokio::select! {
        biased;
        _ = cancel.cancelled() => Err(AuthError::Cancelled),
        result = future => result,
    }
}
