//! Device-code → token polling loop.

use std::sync::Arc;

use serde_json::Value;
use tokio_util::sync::CancellationToken;

use crate::util::scheduler::{Scheduler, TokioScheduler};
use crate::util::timeout::until_cancelled;

use super::client::{classify_token_response, DeviceFlowClient};
use super::device_code::DeviceAuthorization;
use super::error::AuthError;
use super::token::TokenSet;

/// Callback receiving every raw token-endpoint body, before classification.
pub type ResponseObserver = Arc<dyn Fn(&Value) + Send + Sync>;

/// Progress of one exchange.
///
/// `Pending` loops on retryable provider errors; `Success` and `Error` are
/// absorbing.
#[derive(Debug)]
pub enum ExchangeState {
    Pending { attempts: u32 },
    Success(TokenSet),
    Error(AuthError),
}

impl ExchangeState {
    pub fn start() -> Self {
        Self::Pending { attempts: 0 }
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Pending { .. })
    }

    pub fn attempts(&self) -> Option<u32> {
        match self {
            Self::Pending { attempts } => Some(*attempts),
            _ => None,
        }
    }

    /// Fold the outcome of one attempt into the state.
    pub fn advance(self, outcome: Result<TokenSet, AuthError>) -> Self {
        match (self, outcome) {
            (Self::Pending { .. }, Ok(tokens)) => Self::Success(tokens),
            (Self::Pending { attempts }, Err(err)) if err.is_retryable() => Self::Pending {
                attempts: attempts + 1,
            },
            (Self::Pending { .. }, Err(err)) => Self::Error(err),
            (terminal, _) => terminal,
        }
    }
}

/// Converts a [`DeviceAuthorization`] into a [`TokenSet`].
///
/// One request in flight at a time; after a pending answer the next attempt
/// waits the authorization's `interval` on the scheduler. Cancellation
/// aborts both the wait and an in-flight request. There is no
/// attempt cap and `expires_in` is not checked; wrap [`exchange`] in
/// [`with_deadline`](crate::util::with_deadline) for an upper bound.
///
/// [`exchange`]: PollingExchanger::exchange
pub struct PollingExchanger {
    client: DeviceFlowClient,
    scheduler: Arc<dyn Scheduler>,
    observer: Option<ResponseObserver>,
}

impl PollingExchanger {
    pub fn new(client: DeviceFlowClient) -> Self {
        Self {
            client,
            scheduler: Arc::new(TokioScheduler),
            observer: None,
        }
    }

    pub fn with_scheduler(mut self, scheduler: Arc<dyn Scheduler>) -> Self {
        self.scheduler = scheduler;
        self
    }

    pub fn with_observer(mut self, observer: ResponseObserver) -> Self {
        self.observer = Some(observer);
        self
    }

    pub async fn exchange(
        &self,
        authorization: &DeviceAuthorization,
        cancel: &CancellationToken,
    ) -> Result<TokenSet, AuthError> {
        let mut state = ExchangeState::start();
        loop {
            if cancel.is_cancelled() {
                return Err(AuthError::Cancelled);
            }
            let attempt = state.attempts().unwrap_or_default() + 1;
            let outcome = match until_cancelled(cancel, self.client.request_token(authorization))
                .await
            {
                Ok(body) => {
                    if let Some(observer) = &self.observer {
                        observer(&body);
                    }
                    classify_token_response(body)
                }
                Err(AuthError::Cancelled) => return Err(AuthError::Cancelled),
                Err(err) => Err(err),
            };

            state = match state.advance(outcome) {
                ExchangeState::Success(tokens) => {
                    tracing::info!(attempt, "device authorized");
                    return Ok(tokens);
                }
                ExchangeState::Error(err) => {
                    tracing::warn!(attempt, error = %err, "token exchange failed");
                    return Err(err);
                }
                pending => pending,
            };

            tracing::debug!(
                attempt,
                interval_secs = authorization.interval,
                "authorization pending, polling again"
            );
            self.scheduler
                .wait(authorization.poll_interval(), cancel)
                .await?;
        }
    }
}
