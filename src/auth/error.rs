use thiserror::Error;

use crate::error::DevflowError;

/// `error` values the token endpoint uses while the user has not finished.
pub const RETRYABLE_ERRORS: &[&str] = &["authorization_pending", "slow_down"];

/// Errors surfaced by the device-flow endpoints and the polling loop.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Structured `{error, error_description}` body from the provider.
    #[error("Provider error: {error}{}", description.as_deref().map(|d| format!(" ({d})")).unwrap_or_default())]
    Provider {
        error: String,
        description: Option<String>,
    },
    #[error("Transport error: {0}")]
    Transport(String),
    #[error("Request failed with status {status}")]
    Http { status: u16 },
    #[error("Invalid response: {0}")]
    InvalidResponse(String),
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),
    #[error("Cancelled")]
    Cancelled,
    #[error("Timed out after {0}ms")]
    Timeout(u64),
}

impl AuthError {
    pub fn provider(error: impl Into<String>, description: Option<String>) -> Self {
        Self::Provider {
            error: error.into(),
            description,
        }
    }

    /// The provider `error` code, if this is a provider error.
    pub fn provider_code(&self) -> Option<&str> {
        match self {
            Self::Provider { error, .. } => Some(error.as_str()),
            _ => None,
        }
    }

    /// Whether the polling loop should schedule another attempt.
    ///
    /// Only `authorization_pending` and `slow_down` qualify. Transport
    /// failures are terminal.
    pub fn is_retryable(&self) -> bool {
        self.provider_code()
            .is_some_and(|code| RETRYABLE_ERRORS.contains(&code))
    }
}

impl From<reqwest::Error> for AuthError {
    fn from(error: reqwest::Error) -> Self {
        Self::Transport(error.to_string())
    }
}

impl From<serde_json::Error> for AuthError {
    fn from(error: serde_json::Error) -> Self {
        Self::Transport(format!("response is not valid JSON: {error}"))
    }
}

impl From<AuthError> for DevflowError {
    fn from(error: AuthError) -> Self {
        match error {
            AuthError::InvalidConfiguration(message) => DevflowError::Configuration(message),
            other => DevflowError::Auth(other),
        }
    }
}
