//! Convenience re-exports for common use.

pub use crate::auth::{
    AuthError, DeviceAuthorization, DeviceFlowClient, PollingExchanger, TokenSet, UserInfo,
};
pub use crate::config::PlaygroundConfig;
pub use crate::error::{DevflowError, Result};
pub use crate::view::{Step, StepContext, TerminalRenderer, ViewRenderer};
pub use crate::walkthrough::{Completion, Confirmation, Walkthrough};
