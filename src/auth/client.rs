use serde_json::Value;

use crate::config::{PlaygroundConfig, DEVICE_CODE_PATH, TOKEN_PATH, USER_INFO_PATH};

use super::device_code::DeviceAuthorization;
use super::error::AuthError;
use super::token::{TokenSet, UserInfo};

/// HTTP client for the three device-flow endpoints of one tenant.
///
/// Every method makes exactly one request; pacing and retries belong to
/// [`PollingExchanger`](super::PollingExchanger).
///
/// # Example
/// ```no_run
/// use devflow::auth::DeviceFlowClient;
/// use devflow::config::PlaygroundConfig;
///
/// # async fn example() -> Result<(), devflow::auth::AuthError> {
/// let config = PlaygroundConfig::builder()
///     .tenant("example.auth0.com")
///     .client_id("abc123")
///     .build();
/// let client = DeviceFlowClient::new(config)?;
/// let authorization = client.request_authorization().await?;
/// println!("enter {} at {}", authorization.user_code, authorization.verification_uri);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct DeviceFlowClient {
    client: reqwest::Client,
    config: PlaygroundConfig,
}

impl DeviceFlowClient {
    pub fn new(config: PlaygroundConfig) -> Result<Self, AuthError> {
        config.validate()?;
        Ok(Self {
            client: reqwest::Client::new(),
            config,
        })
    }

    pub fn with_http_client(mut self, client: reqwest::Client) -> Self {
        self.client = client;
        self
    }

    pub fn config(&self) -> &PlaygroundConfig {
        &self.config
    }

    /// Start a device authorization transaction.
    pub async fn request_authorization(&self) -> Result<DeviceAuthorization, AuthError> {
        let url = self.config.endpoint(DEVICE_CODE_PATH)?;
        let resp = self
            .client
            .post(url)
            .header("Accept", "application/json")
            .form(&self.config.authorization_form())
            .send()
            .await?;
        let status = resp.status();
        let body: Value = serde_json::from_str(&resp.text().await?)?;
        if let Some(err) = provider_error(&body) {
            return Err(err);
        }
        if !status.is_success() {
            return Err(AuthError::Http {
                status: status.as_u16(),
            });
        }
        serde_json::from_value(body).map_err(|e| {
            AuthError::InvalidResponse(format!("device authorization response: {e}"))
        })
    }

    /// One token-endpoint call for `authorization`.
    ///
    /// Returns the raw JSON body regardless of HTTP status, since providers
    /// answer pending and denied grants with 4xx and an `error` body. Only
    /// transport and JSON failures are errors here; use
    /// [`classify_token_response`] to interpret the body.
    pub async fn request_token(
        &self,
        authorization: &DeviceAuthorization,
    ) -> Result<Value, AuthError> {
        let url = self.config.endpoint(TOKEN_PATH)?;
        let resp = self
            .client
            .post(url)
            .header("Accept", "application/json")
            .form(&self.config.token_form(&authorization.device_code))
            .send()
            .await?;
        let text = resp.text().await?;
        Ok(serde_json::from_str(&text)?)
    }

    /// Fetch the user's claims with the granted access token.
    pub async fn fetch_user_info(&self, tokens: &TokenSet) -> Result<UserInfo, AuthError> {
        let url = self.config.endpoint(USER_INFO_PATH)?;
        let resp = self
            .client
            .get(url)
            .header("Accept", "application/json")
            .bearer_auth(&tokens.access_token)
            .send()
            .await?;
        if !resp.status().is_success() {
            return Err(AuthError::Http {
                status: resp.status().as_u16(),
            });
        }
        Ok(serde_json::from_str(&resp.text().await?)?)
    }
}

/// `{error, error_description}` from a provider body.
///
/// Only a string `error` counts. A description of any other type is
/// dropped rather than hiding the code.
fn provider_error(body: &Value) -> Option<AuthError> {
    let code = body.get("error").and_then(Value::as_str)?;
    let description = body
        .get("error_description")
        .and_then(Value::as_str)
        .map(str::to_string);
    Some(AuthError::provider(code, description))
}

/// Interpret one token-endpoint body.
///
/// An `error` field always wins. Otherwise the body must carry an
/// `access_token`.
pub fn classify_token_response(body: Value) -> Result<TokenSet, AuthError> {
    if let Some(err) = provider_error(&body) {
        return Err(err);
    }
    if body.get("access_token").and_then(Value::as_str).is_none() {
        return Err(AuthError::InvalidResponse(
            "token response missing access_token and error".to_string(),
        ));
    }
    serde_json::from_value(body)
        .map_err(|e| AuthError::InvalidResponse(format!("token response: {e}")))
}
