//! Outbound request shape handed to the transport.

use serde::{Deserialize, Serialize};
use std::fmt;

/// HTTP verbs the Taximail surface uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    Get,
    Post,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single form field value.
///
/// Serializes untagged so `Flag(true)` encodes as `true` in a form body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FormValue {
    Text(String),
    Flag(bool),
}

impl FormValue {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            Self::Flag(_) => None,
        }
    }

    pub fn as_flag(&self) -> Option<bool> {
        match self {
            Self::Flag(b) => Some(*b),
            Self::Text(_) => None,
        }
    }
}

impl From<&str> for FormValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for FormValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<bool> for FormValue {
    fn from(value: bool) -> Self {
        Self::Flag(value)
    }
}

/// Request body or query string. Field order is preserved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Payload {
    /// `application/x-www-form-urlencoded` body
    Form(Vec<(String, FormValue)>),
    /// URL query parameters
    Query(Vec<(String, String)>),
}

/// One fully-built request, consumed exactly once by the transport.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutboundMessage {
    pub method: HttpMethod,
    pub url: String,
    pub payload: Option<Payload>,
}

impl OutboundMessage {
    pub fn get(url: impl Into<String>) -> Self {
        Self {
            method: HttpMethod::Get,
            url: url.into(),
            payload: None,
        }
    }

    pub fn post_form(url: impl Into<String>, fields: Vec<(String, FormValue)>) -> Self {
        Self {
            method: HttpMethod::Post,
            url: url.into(),
            payload: Some(Payload::Form(fields)),
        }
    }

    /// Attach query parameters.
    pub fn with_query(mut self, params: Vec<(String, String)>) -> Self {
        self.payload = Some(Payload::Query(params));
        self
    }

    /// Form fields, empty when the message has no form body.
    pub fn form(&self) -> &[(String, FormValue)] {
        match &self.payload {
            Some(Payload::Form(fields)) => fields,
            _ => &[],
        }
    }

    /// Query parameters, empty when the message has none.
    pub fn query(&self) -> &[(String, String)] {
        match &self.payload {
            Some(Payload::Query(params)) => params,
            _ => &[],
        }
    }

    pub fn form_value(&self, key: &str) -> Option<&FormValue> {
        self.form().iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn form_text(&self, key: &str) -> Option<&str> {
        self.form_value(key).and_then(FormValue::as_text)
    }

    pub fn has_field(&self, key: &str) -> bool {
        self.form_value(key).is_some()
    }

    /// Path component of the URL, without scheme, host or query.
    pub fn path(&self) -> &str {
        let rest = self
            .url
            .split_once("://")
            .map(|(_, rest)| rest)
            .unwrap_or(&self.url);
        let path = rest.find('/').map(|idx| &rest[idx..]).unwrap_or("/");
        path.split('?').next().unwrap_or(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_path_strips_host() {
        let msg = OutboundMessage::get("https://api.taximail.com/v2/transactional/abc");
        assert_eq!(msg.path(), "/v2/transactional/abc");
    }

    #[test]
    fn test_form_lookup() {
        let msg = OutboundMessage::post_form(
            "https://api.taximail.com/v2/sms",
            vec![
                ("to".to_string(), FormValue::from("66812345678")),
                ("report_webhook".to_string(), FormValue::from(true)),
            ],
        );
        assert_eq!(msg.form_text("to"), Some("66812345678"));
        assert_eq!(msg.form_value("report_webhook").and_then(FormValue::as_flag), Some(true));
        assert!(!msg.has_field("text"));
        assert!(msg.query().is_empty());
    }

    #[test]
    fn test_form_value_serializes_untagged() {
        assert_eq!(serde_json::to_string(&FormValue::from(true)).unwrap(), "true");
        assert_eq!(serde_json::to_string(&FormValue::from("x")).unwrap(), "\"x\"");
    }

    #[test]
    fn test_get_with_query() {
        let msg = OutboundMessage::get("https://api.taximail.com/v2/otp/verify/m1")
            .with_query(vec![("otp_code".to_string(), "1234".to_string())]);
        assert_eq!(msg.method, HttpMethod::Get);
        assert_eq!(msg.query()[0].1, "1234");
        assert!(msg.form().is_empty());
    }
}
