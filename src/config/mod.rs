//! Walkthrough configuration.
//!
//! Built once per session and passed explicitly into every operation.

use bon::Builder;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::auth::AuthError;

/// Device-code endpoint path.
pub const DEVICE_CODE_PATH: &str = "/oauth/device/code";
/// Token endpoint path.
pub const TOKEN_PATH: &str = "/oauth/token";
/// User-info endpoint path.
pub const USER_INFO_PATH: &str = "/userinfo";
/// Activation page path on the tenant.
pub const ACTIVATE_PATH: &str = "/activate";

/// Grant type sent to the token endpoint.
pub const DEVICE_CODE_GRANT_TYPE: &str = "urn:ietf:params:oauth:grant-type:device_code";

/// Tenant, client and requested access for one walkthrough session.
///
/// # Example
/// ```
/// use devflow::config::PlaygroundConfig;
///
/// let config = PlaygroundConfig::builder()
///     .tenant("example.auth0.com")
///     .client_id("abc123")
///     .scopes(vec!["openid".to_string(), "profile".to_string()])
///     .build();
/// assert_eq!(config.scope_param().as_deref(), Some("openid profile"));
/// assert_eq!(config.base_url()?.as_str(), "https://example.auth0.com/");
/// # Ok::<(), devflow::auth::AuthError>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Builder, Serialize, Deserialize)]
pub struct PlaygroundConfig {
    /// Tenant host, e.g. `example.auth0.com`. A scheme may be included.
    #[builder(into)]
    pub tenant: String,
    #[builder(into)]
    pub client_id: String,
    #[builder(into)]
    pub audience: Option<String>,
    #[builder(default)]
    #[serde(default)]
    pub scopes: Vec<String>,
}

impl PlaygroundConfig {
    /// Check that the session can talk to a tenant at all.
    pub fn validate(&self) -> Result<(), AuthError> {
        if self.client_id.trim().is_empty() {
            return Err(AuthError::InvalidConfiguration(
                "client id must not be empty".to_string(),
            ));
        }
        self.base_url().map(|_| ())
    }

    /// Tenant root URL. Bare hosts get `https://`.
    pub fn base_url(&self) -> Result<Url, AuthError> {
        let tenant = self.tenant.trim().trim_end_matches('/');
        if tenant.is_empty() {
            return Err(AuthError::InvalidConfiguration(
                "tenant must not be empty".to_string(),
            ));
        }
        let raw = if tenant.starts_with("https://") || tenant.starts_with("http://") {
            tenant.to_string()
        } else {
            format!("https://{tenant}")
        };
        let url = Url::parse(&raw).map_err(|e| {
            AuthError::InvalidConfiguration(format!("invalid tenant '{}': {e}", self.tenant))
        })?;
        if url.host_str().is_none() {
            return Err(AuthError::InvalidConfiguration(format!(
                "tenant '{}' has no host",
                self.tenant
            )));
        }
        Ok(url)
    }

    /// Absolute URL for an endpoint path on the tenant.
    pub fn endpoint(&self, path: &str) -> Result<Url, AuthError> {
        let base = self.base_url()?;
        base.join(path).map_err(|e| {
            AuthError::InvalidConfiguration(format!("invalid endpoint path '{path}': {e}"))
        })
    }

    /// Tenant as shown to users: host plus any explicit port, no scheme.
    pub fn display_host(&self) -> String {
        match self.base_url() {
            Ok(url) => {
                let host = url.host_str().unwrap_or_default();
                match url.port() {
                    Some(port) => format!("{host}:{port}"),
                    None => host.to_string(),
                }
            }
            Err(_) => self.tenant.trim().to_string(),
        }
    }

    pub fn audience_param(&self) -> Option<&str> {
        self.audience
            .as_deref()
            .map(str::trim)
            .filter(|audience| !audience.is_empty())
    }

    /// Space-joined scopes, or `None` when no scope was requested.
    pub fn scope_param(&self) -> Option<String> {
        let scopes: Vec<&str> = self
            .scopes
            .iter()
            .map(|scope| scope.trim())
            .filter(|scope| !scope.is_empty())
            .collect();
        if scopes.is_empty() {
            None
        } else {
            Some(scopes.join(" "))
        }
    }

    /// Form body for the device-code request.
    pub fn authorization_form(&self) -> Vec<(&'static str, String)> {
        let mut form = vec![("client_id", self.client_id.clone())];
        if let Some(audience) = self.audience_param() {
            form.push(("audience", audience.to_string()));
        }
        if let Some(scope) = self.scope_param() {
            form.push(("scope", scope));
        }
        form
    }

    /// Form body for one token-exchange attempt.
    pub fn token_form(&self, device_code: &str) -> Vec<(&'static str, String)> {
        vec![
            ("client_id", self.client_id.clone()),
            ("device_code", device_code.to_string()),
            ("grant_type", DEVICE_CODE_GRANT_TYPE.to_string()),
        ]
    }
}

/// Split a scope list given as one string, on spaces or commas.
pub fn parse_scopes(raw: &str) -> Vec<String> {
    raw.split(|c: char| c == ',' || c.is_whitespace())
        .filter(|scope| !scope.is_empty())
        .map(str::to_string)
        .collect()
}
