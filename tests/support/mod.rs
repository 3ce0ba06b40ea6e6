#![allow(dead_code)]

use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use devflow::auth::{AuthError, DeviceAuthorization};
use devflow::config::PlaygroundConfig;
use devflow::util::Scheduler;
use devflow::view::{Step, StepContext, ViewRenderer};
use serde_json::Value;
use tokio_util::sync::CancellationToken;
use wiremock::MockServer;

pub fn config_for(server: &MockServer) -> PlaygroundConfig {
    PlaygroundConfig::builder()
        .tenant(server.uri())
        .client_id("client-1")
        .build()
}

pub fn authorization(device_code: &str, interval: u64) -> DeviceAuthorization {
    DeviceAuthorization {
        device_code: device_code.to_string(),
        user_code: "QTZL-MCBW".to_string(),
        verification_uri: "https://tenant.example/activate".to_string(),
        verification_uri_complete: Some(
            "https://tenant.example/activate?user_code=QTZL-MCBW".to_string(),
        ),
        expires_in: 900,
        interval,
    }
}

/// Scheduler that records requested delays and returns immediately.
#[derive(Default)]
pub struct RecordingScheduler {
    delays: Mutex<Vec<Duration>>,
    cancel_after: Option<(usize, CancellationToken)>,
}

impl RecordingScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cancel `token` once `waits` delays have been requested.
    pub fn cancelling_after(waits: usize, token: CancellationToken) -> Self {
        Self {
            delays: Mutex::new(Vec::new()),
            cancel_after: Some((waits, token)),
        }
    }

    pub fn delays(&self) -> Vec<Duration> {
        self.delays.lock().expect("scheduler lock poisoned").clone()
    }
}

#[async_trait]
impl Scheduler for RecordingScheduler {
    async fn wait(&self, delay: Duration, cancel: &CancellationToken) -> Result<(), AuthError> {
        if cancel.is_cancelled() {
            return Err(AuthError::Cancelled);
        }
        let waits = {
            let mut delays = self.delays.lock().expect("scheduler lock poisoned");
            delays.push(delay);
            delays.len()
        };
        if let Some((limit, token)) = &self.cancel_after {
            if waits >= *limit {
                token.cancel();
            }
        }
        Ok(())
    }
}

/// One notification received by [`RecordingRenderer`].
#[derive(Debug, Clone, PartialEq)]
pub enum Rendered {
    Step {
        step: Step,
        has_authorization: bool,
        has_tokens: bool,
        has_user_info: bool,
    },
    Intermediate(Value),
    Error {
        step: Step,
        message: String,
    },
}

#[derive(Default)]
pub struct RecordingRenderer {
    events: Mutex<Vec<Rendered>>,
}

impl RecordingRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<Rendered> {
        self.events.lock().expect("renderer lock poisoned").clone()
    }

    pub fn steps(&self) -> Vec<Step> {
        self.events()
            .into_iter()
            .filter_map(|event| match event {
                Rendered::Step { step, .. } => Some(step),
                _ => None,
            })
            .collect()
    }

    pub fn intermediates(&self) -> Vec<Value> {
        self.events()
            .into_iter()
            .filter_map(|event| match event {
                Rendered::Intermediate(body) => Some(body),
                _ => None,
            })
            .collect()
    }

    pub fn errors(&self) -> Vec<(Step, String)> {
        self.events()
            .into_iter()
            .filter_map(|event| match event {
                Rendered::Error { step, message } => Some((step, message)),
                _ => None,
            })
            .collect()
    }

    fn push(&self, event: Rendered) {
        self.events
            .lock()
            .expect("renderer lock poisoned")
            .push(event);
    }
}

impl ViewRenderer for RecordingRenderer {
    fn render_step(&self, step: Step, context: &StepContext<'_>) {
        self.push(Rendered::Step {
            step,
            has_authorization: context.authorization.is_some(),
            has_tokens: context.tokens.is_some(),
            has_user_info: context.user_info.is_some(),
        });
    }

    fn render_intermediate_exchange_response(&self, response: &Value) {
        self.push(Rendered::Intermediate(response.clone()));
    }

    fn render_error(&self, step: Step, error: &AuthError) {
        self.push(Rendered::Error {
            step,
            message: error.to_string(),
        });
    }
}
