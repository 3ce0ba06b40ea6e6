//! Error types for devflow.

pub mod unified;

pub use unified::{ErrorCategory, RecoverySuggestion};

use thiserror::Error;

use crate::auth::AuthError;

/// Top-level error for walkthrough sessions and the CLI.
#[derive(Error, Debug)]
pub enum DevflowError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error(transparent)]
    Auth(AuthError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl DevflowError {
    /// Classify this error into a category.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Configuration(_) => ErrorCategory::Configuration,
            Self::Io(_) => ErrorCategory::Unknown,
            Self::Auth(auth) => match auth {
                AuthError::Provider { .. } => ErrorCategory::Authorization,
                AuthError::Transport(_) => ErrorCategory::Network,
                AuthError::Http { status } => match status {
                    401 | 403 => ErrorCategory::Authorization,
                    _ => ErrorCategory::Api,
                },
                AuthError::InvalidResponse(_) => ErrorCategory::Api,
                AuthError::InvalidConfiguration(_) => ErrorCategory::Configuration,
                AuthError::Cancelled => ErrorCategory::Cancelled,
                AuthError::Timeout(_) => ErrorCategory::Timeout,
            },
        }
    }

    /// Suggest recovery actions.
    pub fn recovery_suggestion(&self) -> RecoverySuggestion {
        match self.category() {
            ErrorCategory::Authorization => RecoverySuggestion::RestartFlow,
            ErrorCategory::Network => RecoverySuggestion::CheckNetwork,
            ErrorCategory::Timeout => RecoverySuggestion::IncreaseTimeout,
            ErrorCategory::Configuration | ErrorCategory::Api => {
                RecoverySuggestion::CheckConfiguration
            }
            ErrorCategory::Cancelled | ErrorCategory::Unknown => RecoverySuggestion::None,
        }
    }
}

/// Convenience alias.
pub type Result<T> = std::result::Result<T, DevflowError>;
