//! Presentation of the walkthrough steps.
//!
//! [`StepView::build`] turns a step and its context into plain content;
//! a [`ViewRenderer`] decides how to show it.

pub mod curl;
pub mod terminal;

pub use terminal::TerminalRenderer;

use chrono::{DateTime, TimeZone};
use serde_json::{json, Value};
use strum::{Display, EnumIter, EnumString, IntoEnumIterator};

use crate::auth::{AuthError, DeviceAuthorization, TokenSet, UserInfo};
use crate::config::{
    PlaygroundConfig, ACTIVATE_PATH, DEVICE_CODE_PATH, TOKEN_PATH, USER_INFO_PATH,
};

use curl::{CurlMethod, CurlRequest};

const FORM_CONTENT_TYPE: &str = "Content-Type: application/x-www-form-urlencoded";

/// The four screens of the walkthrough, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, EnumIter)]
#[strum(serialize_all = "snake_case")]
pub enum Step {
    Configure,
    Authorize,
    Exchange,
    Complete,
}

impl Step {
    /// Zero-based position in the walkthrough.
    pub fn index(self) -> usize {
        Step::iter().position(|s| s == self).unwrap_or_default()
    }

    pub fn count() -> usize {
        Step::iter().count()
    }

    pub fn title(self) -> &'static str {
        match self {
            Step::Configure => "Device Flow Playground",
            Step::Authorize => "Authorization Request",
            Step::Exchange => "Token Exchange",
            Step::Complete => "Activation Complete",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Step::Configure => {
                "Configure the playground with your device application, tenant, and scopes."
            }
            Step::Authorize => {
                "The user would like to start streaming content on their smart TV. They \
                 install the TV app and are presented with an activation screen. Once they \
                 choose Authorize, the TV starts a device authorization transaction via the \
                 `/oauth/device/code` endpoint on the tenant."
            }
            Step::Exchange => {
                "The user authorizes the device by navigating to the tenant's `/activate` \
                 page and entering the code shown on the TV, or by scanning the QR code, \
                 which fills in the code through `verification_uri_complete`. In the \
                 background the TV polls the tenant's `/oauth/token` endpoint to exchange \
                 the device code for an access token and, optionally, a refresh token."
            }
            Step::Complete => {
                "The user has authorized the device and can start streaming. A call to the \
                 `/userinfo` endpoint fetches details about the user to customize the UI."
            }
        }
    }
}

/// Data available to a step. Each step reads only what it needs.
#[derive(Debug, Clone, Copy)]
pub struct StepContext<'a> {
    pub config: &'a PlaygroundConfig,
    pub authorization: Option<&'a DeviceAuthorization>,
    pub tokens: Option<&'a TokenSet>,
    pub user_info: Option<&'a UserInfo>,
}

impl<'a> StepContext<'a> {
    pub fn new(config: &'a PlaygroundConfig) -> Self {
        Self {
            config,
            authorization: None,
            tokens: None,
            user_info: None,
        }
    }

    pub fn with_authorization(mut self, authorization: &'a DeviceAuthorization) -> Self {
        self.authorization = Some(authorization);
        self
    }

    pub fn with_tokens(mut self, tokens: &'a TokenSet) -> Self {
        self.tokens = Some(tokens);
        self
    }

    pub fn with_user_info(mut self, user_info: &'a UserInfo) -> Self {
        self.user_info = Some(user_info);
        self
    }
}

/// Receives walkthrough notifications.
///
/// The walkthrough never depends on what a renderer does with them.
pub trait ViewRenderer: Send + Sync {
    fn render_step(&self, step: Step, context: &StepContext<'_>);

    /// Called with every raw token-endpoint body while polling.
    fn render_intermediate_exchange_response(&self, response: &Value);

    /// Called once when `step` fails terminally.
    fn render_error(&self, step: Step, error: &AuthError);
}

/// Titled block of text, e.g. a request or a response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Panel {
    pub title: String,
    pub body: String,
}

impl Panel {
    pub fn new(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
        }
    }
}

/// What the "TV" shows during the exchange step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Activation {
    pub user_code: String,
    /// Link text, e.g. `example.auth0.com/activate`.
    pub link_text: String,
    pub link_href: String,
    /// Payload to encode as a QR code.
    pub qr_payload: String,
}

/// Renderer-independent content of one step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepView {
    pub step: Step,
    pub request: Option<Panel>,
    pub response: Option<Panel>,
    pub activation: Option<Activation>,
    pub token_set: Option<String>,
}

impl StepView {
    pub fn build(step: Step, context: &StepContext<'_>) -> Self {
        let config = context.config;
        let mut view = Self {
            step,
            request: None,
            response: None,
            activation: None,
            token_set: None,
        };
        match step {
            Step::Configure => {}
            Step::Authorize => {
                let curl = CurlRequest::new(
                    CurlMethod::Post,
                    endpoint_text(config, DEVICE_CODE_PATH),
                )
                .header(FORM_CONTENT_TYPE)
                .form(config.authorization_form());
                view.request = Some(Panel::new("Authorization Request", curl.to_string()));
                view.response = Some(Panel::new(
                    "Sample Authorization Response",
                    pretty(&sample_authorization_response(config)),
                ));
            }
            Step::Exchange => {
                if let Some(authorization) = context.authorization {
                    let curl =
                        CurlRequest::new(CurlMethod::Post, endpoint_text(config, TOKEN_PATH))
                            .header(FORM_CONTENT_TYPE)
                            .form(config.token_form(&authorization.device_code));
                    view.request = Some(Panel::new("Exchange Request", curl.to_string()));
                    view.response = Some(Panel::new("", ""));
                    view.activation = Some(Activation {
                        user_code: authorization.user_code.clone(),
                        link_text: format!("{}{ACTIVATE_PATH}", config.display_host()),
                        link_href: endpoint_text(config, ACTIVATE_PATH),
                        qr_payload: authorization.activation_target().to_string(),
                    });
                }
            }
            Step::Complete => {
                if let Some(tokens) = context.tokens {
                    let curl = CurlRequest::new(
                        CurlMethod::Get,
                        endpoint_text(config, USER_INFO_PATH),
                    )
                    .header(format!("Authorization: Bearer {}", tokens.access_token));
                    view.request = Some(Panel::new("/userinfo Request", curl.to_string()));
                    view.token_set = Some(pretty(tokens));
                }
                if let Some(user_info) = context.user_info {
                    view.response = Some(Panel::new("/userinfo Response", pretty(user_info)));
                }
            }
        }
        view
    }
}

/// Panel for one intermediate token-endpoint body.
pub fn exchange_response_panel<Tz>(response: &Value, received_at: &DateTime<Tz>) -> Panel
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    Panel::new(
        format!(
            "Exchange Response - Updated: {}",
            received_at.format("%H:%M:%S")
        ),
        pretty(response),
    )
}

/// Canned device-code response shown before the real request is made.
pub fn sample_authorization(config: &PlaygroundConfig) -> DeviceAuthorization {
    let activate = endpoint_text(config, ACTIVATE_PATH);
    DeviceAuthorization {
        device_code: "Ag_EEG_U-x5FGsQshfpzko1p".to_string(),
        user_code: "QTZL-MCBW".to_string(),
        verification_uri_complete: Some(format!("{activate}?user_code=QTZL-MCBW")),
        verification_uri: activate,
        expires_in: 900,
        interval: 5,
    }
}

fn sample_authorization_response(config: &PlaygroundConfig) -> Value {
    serde_json::to_value(sample_authorization(config)).unwrap_or_else(|_| json!({}))
}

fn endpoint_text(config: &PlaygroundConfig, path: &str) -> String {
    config
        .endpoint(path)
        .map(|url| url.to_string())
        .unwrap_or_else(|_| format!("https://{}{path}", config.tenant.trim()))
}

fn pretty<T: serde::Serialize + ?Sized>(value: &T) -> String {
    serde_json::to_string_pretty(value).unwrap_or_default()
}
