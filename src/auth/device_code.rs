use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Poll spacing used when the provider omits `interval`.
pub const DEFAULT_INTERVAL_SECS: u64 = 5;

/// Response of the `/oauth/device/code` endpoint.
///
/// Issued once per walkthrough session and never mutated afterwards.
///
/// # Example
/// ```
/// use devflow::auth::DeviceAuthorization;
///
/// let auth: DeviceAuthorization = serde_json::from_str(r#"{
///     "device_code": "Ag_EEG_U-x5FGsQshfpzko1p",
///     "user_code": "QTZL-MCBW",
///     "verification_uri": "https://example.auth0.com/activate",
///     "expires_in": 900
/// }"#)?;
/// assert_eq!(auth.interval, 5);
/// # Ok::<(), serde_json::Error>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceAuthorization {
    pub device_code: String,
    pub user_code: String,
    #[serde(alias = "verification_url")]
    pub verification_uri: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub verification_uri_complete: Option<String>,
    /// Lifetime of the device code in seconds. Advisory only.
    pub expires_in: u64,
    #[serde(default = "default_interval")]
    pub interval: u64,
}

fn default_interval() -> u64 {
    DEFAULT_INTERVAL_SECS
}

impl DeviceAuthorization {
    /// Minimum spacing between token-exchange attempts.
    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.interval)
    }

    /// URL a second device should open: the complete URI when the provider
    /// sent one, otherwise the bare verification URI.
    pub fn activation_target(&self) -> &str {
        self.verification_uri_complete
            .as_deref()
            .unwrap_or(&self.verification_uri)
    }
}
