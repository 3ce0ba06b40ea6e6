//! One end-to-end device-flow session.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;
use tokio_util::sync::CancellationToken;
use tracing::Instrument;
use uuid::Uuid;

use crate::auth::{
    AuthError, DeviceAuthorization, DeviceFlowClient, PollingExchanger, TokenSet, UserInfo,
};
use crate::config::PlaygroundConfig;
use crate::util::scheduler::{Scheduler, TokioScheduler};
use crate::util::timeout::{until_cancelled, with_deadline};
use crate::view::{Step, StepContext, ViewRenderer};

/// Records produced by a finished walkthrough.
#[derive(Debug, Clone)]
pub struct Completion {
    pub authorization: DeviceAuthorization,
    pub tokens: TokenSet,
    pub user_info: UserInfo,
}

/// Gate between the authorize screen and the device code request.
///
/// The walkthrough races `confirm` against its cancellation token, so
/// implementations may simply wait.
#[async_trait]
pub trait Confirmation: Send + Sync {
    async fn confirm(&self, cancel: &CancellationToken) -> Result<(), AuthError>;
}

/// Drives configure → authorize → exchange → complete, notifying a
/// [`ViewRenderer`] at each step.
///
/// Any terminal failure is rendered with [`ViewRenderer::render_error`]
/// before it is returned.
///
/// # Example
/// ```no_run
/// use std::sync::Arc;
/// use devflow::config::PlaygroundConfig;
/// use devflow::view::TerminalRenderer;
/// use devflow::walkthrough::Walkthrough;
/// use tokio_util::sync::CancellationToken;
///
/// # async fn example() -> Result<(), devflow::auth::AuthError> {
/// let config = PlaygroundConfig::builder()
///     .tenant("example.auth0.com")
///     .client_id("abc123")
///     .build();
/// let walkthrough = Walkthrough::new(config, Arc::new(TerminalRenderer::stdout()))?;
/// let done = walkthrough.run(&CancellationToken::new()).await?;
/// println!("signed in as {:?}", done.user_info.subject());
/// # Ok(())
/// # }
/// ```
pub struct Walkthrough {
    id: Uuid,
    client: DeviceFlowClient,
    renderer: Arc<dyn ViewRenderer>,
    scheduler: Arc<dyn Scheduler>,
    confirmation: Option<Arc<dyn Confirmation>>,
    deadline: Option<Duration>,
}

impl Walkthrough {
    pub fn new(
        config: PlaygroundConfig,
        renderer: Arc<dyn ViewRenderer>,
    ) -> Result<Self, AuthError> {
        Ok(Self {
            id: Uuid::new_v4(),
            client: DeviceFlowClient::new(config)?,
            renderer,
            scheduler: Arc::new(TokioScheduler),
            confirmation: None,
            deadline: None,
        })
    }

    pub fn with_scheduler(mut self, scheduler: Arc<dyn Scheduler>) -> Self {
        self.scheduler = scheduler;
        self
    }

    /// Wait on `confirmation` before requesting the device code.
    pub fn with_confirmation(mut self, confirmation: Arc<dyn Confirmation>) -> Self {
        self.confirmation = Some(confirmation);
        self
    }

    /// Give up on the token exchange after `deadline`.
    pub fn with_deadline(mut self, deadline: Duration) -> Self {
        self.deadline = Some(deadline);
        self
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn config(&self) -> &PlaygroundConfig {
        self.client.config()
    }

    /// Run every step in order.
    pub async fn run(&self, cancel: &CancellationToken) -> Result<Completion, AuthError> {
        let span = tracing::info_span!("walkthrough", session = %self.id);
        async {
            self.begin();
            self.confirm(cancel).await?;
            let authorization = self.authorize(cancel).await?;
            let tokens = self.exchange(&authorization, cancel).await?;
            let user_info = self.complete(&tokens, cancel).await?;
            Ok(Completion {
                authorization,
                tokens,
                user_info,
            })
        }
        .instrument(span)
        .await
    }

    /// Render the configure and authorize screens.
    pub fn begin(&self) {
        let context = StepContext::new(self.config());
        self.renderer.render_step(Step::Configure, &context);
        self.renderer.render_step(Step::Authorize, &context);
    }

    async fn confirm(&self, cancel: &CancellationToken) -> Result<(), AuthError> {
        let Some(confirmation) = &self.confirmation else {
            return Ok(());
        };
        until_cancelled(cancel, confirmation.confirm(cancel))
            .await
            .map_err(|err| self.fail(Step::Authorize, err))
    }

    /// Request a device code and show the exchange screen.
    pub async fn authorize(
        &self,
        cancel: &CancellationToken,
    ) -> Result<DeviceAuthorization, AuthError> {
        let authorization = until_cancelled(cancel, self.client.request_authorization())
            .await
            .map_err(|err| self.fail(Step::Authorize, err))?;
        tracing::info!(
            user_code = %authorization.user_code,
            interval_secs = authorization.interval,
            expires_in = authorization.expires_in,
            "device authorization issued"
        );
        self.renderer.render_step(
            Step::Exchange,
            &StepContext::new(self.config()).with_authorization(&authorization),
        );
        Ok(authorization)
    }

    /// Poll until the user approves, the provider refuses, or `cancel` fires.
    pub async fn exchange(
        &self,
        authorization: &DeviceAuthorization,
        cancel: &CancellationToken,
    ) -> Result<TokenSet, AuthError> {
        let renderer = self.renderer.clone();
        let exchanger = PollingExchanger::new(self.client.clone())
            .with_scheduler(self.scheduler.clone())
            .with_observer(Arc::new(move |body: &Value| {
                renderer.render_intermediate_exchange_response(body)
            }));
        let polling = exchanger.exchange(authorization, cancel);
        let result = match self.deadline {
            Some(deadline) => with_deadline(deadline, polling).await,
            None => polling.await,
        };
        result.map_err(|err| self.fail(Step::Exchange, err))
    }

    /// Fetch user info and show the final screen.
    pub async fn complete(
        &self,
        tokens: &TokenSet,
        cancel: &CancellationToken,
    ) -> Result<UserInfo, AuthError> {
        let user_info = until_cancelled(cancel, self.client.fetch_user_info(tokens))
            .await
            .map_err(|err| self.fail(Step::Complete, err))?;
        self.renderer.render_step(
            Step::Complete,
            &StepContext::new(self.config())
                .with_tokens(tokens)
                .with_user_info(&user_info),
        );
        Ok(user_info)
    }

    fn fail(&self, step: Step, error: AuthError) -> AuthError {
        tracing::warn!(step = %step, error = %error, "walkthrough step failed");
        self.renderer.render_error(step, &error);
        error
    }
}
