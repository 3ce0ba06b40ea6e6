use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Tokens granted by the `/oauth/token` endpoint.
///
/// Fields the provider sends beyond the standard set are kept in `extra`,
/// so serializing a `TokenSet` reproduces the response it was read from.
///
/// # Example
/// ```
/// use devflow::auth::TokenSet;
///
/// let tokens = TokenSet::bearer("tok1");
/// assert_eq!(tokens.token_type.as_deref(), Some("Bearer"));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenSet {
    pub access_token: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id_token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_in: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scope: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl TokenSet {
    pub fn bearer(access_token: impl Into<String>) -> Self {
        Self {
            access_token: access_token.into(),
            refresh_token: None,
            id_token: None,
            token_type: Some("Bearer".to_string()),
            expires_in: None,
            scope: None,
            extra: Map::new(),
        }
    }
}

/// Claims returned by the `/userinfo` endpoint, consumed as-is.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserInfo(pub Map<String, Value>);

impl UserInfo {
    pub fn claim(&self, name: &str) -> Option<&Value> {
        self.0.get(name)
    }

    pub fn subject(&self) -> Option<&str> {
        self.claim("sub").and_then(Value::as_str)
    }
}
