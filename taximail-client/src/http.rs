//! reqwest-backed transport for the Taximail REST API.

use crate::config::ClientConfig;
use crate::error::ClientError;
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT};
use serde_json::Value;
use std::time::Duration;
use taximail_core::{
    ApiEndpoints, Credentials, HttpMethod, OutboundMessage, Payload, Transport, TransportError,
};

/// Authenticated HTTP transport. Cheap to clone; the connection pool is shared.
#[derive(Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    endpoints: ApiEndpoints,
}

impl HttpTransport {
    pub fn new(config: &ClientConfig) -> Result<Self, ClientError> {
        let mut default_headers = HeaderMap::new();
        default_headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let mut builder = reqwest::Client::builder()
            .timeout(Duration::from_millis(config.request_timeout_ms))
            .default_headers(default_headers);
        if let Some(agent) = &config.user_agent {
            builder = builder.user_agent(agent.clone());
        }

        Ok(Self {
            client: builder.build()?,
            endpoints: config.node.endpoints.clone(),
        })
    }

    pub fn endpoints(&self) -> &ApiEndpoints {
        &self.endpoints
    }

    /// Check credentials by listing transactional groups.
    pub async fn test_credentials(&self, credentials: &Credentials) -> Result<(), TransportError> {
        let message = OutboundMessage::get(self.endpoints.transactional());
        self.execute(&message, credentials).await.map(|_| ())
    }

    async fn parse_response(&self, response: reqwest::Response) -> Result<Value, TransportError> {
        let status = response.status();
        let text = response.text().await.map_err(request_error)?;
        if status.is_success() {
            Ok(decode_body(&text))
        } else {
            let body = error_message(&text)
                .or_else(|| status.canonical_reason().map(str::to_string))
                .unwrap_or_default();
            Err(TransportError::Status {
                status: status.as_u16(),
                body,
            })
        }
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn execute(
        &self,
        message: &OutboundMessage,
        credentials: &Credentials,
    ) -> Result<Value, TransportError> {
        let mut request = match message.method {
            HttpMethod::Get => self.client.get(&message.url),
            HttpMethod::Post => self.client.post(&message.url),
        };
        request = request.basic_auth(credentials.username(), Some(credentials.expose_password()));
        match &message.payload {
            Some(Payload::Form(fields)) => request = request.form(fields),
            Some(Payload::Query(params)) => request = request.query(params),
            None => {}
        }

        tracing::debug!(method = %message.method, url = %message.url, "sending Taximail request");
        let response = request.send().await.map_err(request_error)?;
        let result = self.parse_response(response).await;
        if let Err(err) = &result {
            tracing::debug!(url = %message.url, error = %err, "Taximail request failed");
        }
        result
    }
}

fn request_error(err: reqwest::Error) -> TransportError {
    if err.is_builder() {
        TransportError::InvalidRequest {
            reason: err.to_string(),
        }
    } else if err.is_decode() {
        TransportError::Decode {
            reason: err.to_string(),
        }
    } else {
        TransportError::Request {
            reason: err.to_string(),
        }
    }
}

/// Empty body is `null`; non-JSON text is kept as a JSON string.
pub(crate) fn decode_body(text: &str) -> Value {
    if text.trim().is_empty() {
        return Value::Null;
    }
    serde_json::from_str(text).unwrap_or_else(|_| Value::String(text.to_string()))
}

/// Prefer the API's own `message` field when an error body carries one.
pub(crate) fn error_message(text: &str) -> Option<String> {
    if text.trim().is_empty() {
        return None;
    }
    match serde_json::from_str::<Value>(text) {
        Ok(Value::Object(map)) => match map.get("message").and_then(Value::as_str) {
            Some(message) => Some(message.to_string()),
            None => Some(text.to_string()),
        },
        _ => Some(text.to_string()),
    }
}
