//! OAuth device authorization grant: endpoints, polling and token types.

pub mod client;
pub mod device_code;
pub mod error;
pub mod exchanger;
pub mod token;

pub use client::{classify_token_response, DeviceFlowClient};
pub use device_code::DeviceAuthorization;
pub use error::AuthError;
pub use exchanger::{ExchangeState, PollingExchanger, ResponseObserver};
pub use token::{TokenSet, UserInfo};
