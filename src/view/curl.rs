//! Sample `curl` commands shown next to each step.

use std::fmt;

const LINE_BREAK: &str = " \\\n     ";

/// HTTP method of a rendered request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CurlMethod {
    Get,
    Post,
}

/// A request rendered as a copy-pasteable `curl` invocation.
///
/// # Example
/// ```
/// use devflow::view::curl::{CurlMethod, CurlRequest};
///
/// let curl = CurlRequest::new(CurlMethod::Get, "https://example.auth0.com/userinfo")
///     .header("Authorization: Bearer tok1");
/// assert_eq!(
///     curl.to_string(),
///     "curl https://example.auth0.com/userinfo \\\n     -H \"Authorization: Bearer tok1\""
/// );
/// ```
#[derive(Debug, Clone)]
pub struct CurlRequest {
    method: CurlMethod,
    url: String,
    headers: Vec<String>,
    form: Option<Vec<(String, String)>>,
}

impl CurlRequest {
    pub fn new(method: CurlMethod, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            headers: Vec::new(),
            form: None,
        }
    }

    pub fn header(mut self, header: impl Into<String>) -> Self {
        self.headers.push(header.into());
        self
    }

    pub fn form<K, V>(mut self, pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        self.form = Some(
            pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        );
        self
    }

    fn encoded_form(&self) -> Option<String> {
        let pairs = self.form.as_ref()?;
        let mut serializer = url::form_urlencoded::Serializer::new(String::new());
        for (key, value) in pairs {
            serializer.append_pair(key, value);
        }
        Some(serializer.finish())
    }
}

impl fmt::Display for CurlRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let method = match self.method {
            CurlMethod::Post => "-X POST ",
            CurlMethod::Get => "",
        };
        let headers = self
            .headers
            .iter()
            .map(|h| format!("-H \"{h}\""))
            .collect::<Vec<_>>()
            .join(" ");
        write!(f, "curl {method}{}{LINE_BREAK}{headers}", self.url)?;
        if let Some(data) = self.encoded_form() {
            write!(f, "{LINE_BREAK}-d \"{data}\"")?;
        }
        Ok(())
    }
}
