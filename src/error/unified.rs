//! Error classification and recovery hints.

/// Broad error category for routing recovery logic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// The user or provider refused the grant, or the device code expired.
    Authorization,
    Network,
    Timeout,
    Api,
    Configuration,
    Cancelled,
    Unknown,
}

/// Suggested recovery action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecoverySuggestion {
    /// Start a new device authorization and try again.
    RestartFlow,
    CheckNetwork,
    CheckConfiguration,
    IncreaseTimeout,
    None,
}
