//! Operation dispatcher.
//!
//! Items run strictly in sequence, one upstream call each. The first
//! unrecovered error halts the batch and no partial results are returned.

use std::convert::Infallible;
use std::sync::Arc;
use std::time::Instant;

use taximail_core::{
    generate_message_id, now_timestamp, CheckStatusInput, CredentialResolver, Credentials,
    Envelope, NodeConfig, Operation, OperationRequest, OutboundMessage, SendEmailInput,
    SendSmsInput, SendSmsOtpInput, TaximailError, TaximailResult, Transport,
    VerificationOutcome, VerifyOtpInput,
};
use tracing::{debug, info, info_span, warn, Instrument};

use crate::adapter::{parse_item, ItemParameters};
use crate::builders::{
    build_check_status, build_email, build_sms, build_sms_otp, build_verify_otp,
    EMAIL_ID_PREFIX, SMS_ID_PREFIX,
};
use crate::normalize::{send_envelope, sms_otp_envelope, status_envelope, verification_envelope};

/// Generates a message id from a prefix.
pub type MessageIdSource = fn(&str) -> String;

/// Produces the verification timestamp.
pub type Clock = fn() -> String;

/// Routes typed requests to their builder, transport call and normalizer.
pub struct Dispatcher<T: Transport> {
    config: Arc<NodeConfig>,
    transport: T,
    message_ids: MessageIdSource,
    clock: Clock,
}

impl<T: Transport> Dispatcher<T> {
    pub fn new(config: Arc<NodeConfig>, transport: T) -> Self {
        Self {
            config,
            transport,
            message_ids: generate_message_id,
            clock: now_timestamp,
        }
    }

    /// Replace the message id generator.
    pub fn with_message_ids(mut self, message_ids: MessageIdSource) -> Self {
        self.message_ids = message_ids;
        self
    }

    /// Replace the timestamp source used by OTP verification.
    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    pub fn config(&self) -> &NodeConfig {
        &self.config
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Process a batch of host items.
    ///
    /// Credentials are resolved once and reused read-only for every item.
    pub async fn execute(
        &self,
        resolver: &dyn CredentialResolver,
        items: &[ItemParameters],
    ) -> TaximailResult<Vec<Envelope>> {
        let credentials = resolver.resolve().await?;
        let mut results = Vec::with_capacity(items.len());

        for (index, item) in items.iter().enumerate() {
            let request = parse_item(item)?;
            let span = info_span!(
                "taximail_item",
                index,
                operation = request.operation().as_str()
            );
            let envelope = self.dispatch(&request, &credentials).instrument(span).await?;
            results.push(envelope);
        }

        Ok(results)
    }

    /// Route one typed request.
    pub async fn dispatch(
        &self,
        request: &OperationRequest,
        credentials: &Credentials,
    ) -> TaximailResult<Envelope> {
        let start = Instant::now();
        let envelope = match request {
            OperationRequest::Email(input) => self.send_email(input, credentials).await?,
            OperationRequest::Sms(input) => self.send_sms(input, credentials).await?,
            OperationRequest::SmsOtp(input) => self.send_sms_otp(input, credentials).await?,
            OperationRequest::VerifyOtp(input) => self.verify_otp(input, credentials).await?,
            OperationRequest::CheckStatus(input) => self.check_status(input, credentials).await?,
        };
        info!(
            operation = request.operation().as_str(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Operation completed"
        );
        Ok(envelope)
    }

    // ========================================================================
    // OPERATIONS
    // ========================================================================

    pub async fn send_email(
        &self,
        input: &SendEmailInput,
        credentials: &Credentials,
    ) -> TaximailResult<Envelope> {
        let message_id = (self.message_ids)(EMAIL_ID_PREFIX);
        let message = build_email(input, &self.config, &message_id);
        let response = self.call(Operation::Email, &message, credentials).await?;
        Ok(send_envelope(
            Operation::Email,
            response,
            &message_id,
            &self.config.messages,
        ))
    }

    pub async fn send_sms(
        &self,
        input: &SendSmsInput,
        credentials: &Credentials,
    ) -> TaximailResult<Envelope> {
        let message_id = (self.message_ids)(SMS_ID_PREFIX);
        let message = build_sms(input, &self.config, &message_id);
        let response = self.call(Operation::Sms, &message, credentials).await?;
        Ok(send_envelope(
            Operation::Sms,
            response,
            &message_id,
            &self.config.messages,
        ))
    }

    pub async fn send_sms_otp(
        &self,
        input: &SendSmsOtpInput,
        credentials: &Credentials,
    ) -> TaximailResult<Envelope> {
        let message = build_sms_otp(input, &self.config)?;
        let response = self.call(Operation::SmsOtp, &message, credentials).await?;
        Ok(sms_otp_envelope(response, &self.config.messages))
    }

    /// Verify an OTP code. Blank inputs still fail; upstream failures do not.
    pub async fn verify_otp(
        &self,
        input: &VerifyOtpInput,
        credentials: &Credentials,
    ) -> TaximailResult<Envelope> {
        let message = build_verify_otp(input, &self.config)?;
        let outcome = match self.verification_outcome(&message, credentials).await {
            Ok(outcome) => outcome,
            Err(never) => match never {},
        };
        Ok(verification_envelope(
            outcome,
            &input.message_id,
            &input.otp_code,
            &self.config.messages,
            (self.clock)(),
        ))
    }

    pub async fn check_status(
        &self,
        input: &CheckStatusInput,
        credentials: &Credentials,
    ) -> TaximailResult<Envelope> {
        let message = build_check_status(input, &self.config);
        let response = self
            .call(Operation::CheckStatus, &message, credentials)
            .await?;
        Ok(status_envelope(response, &input.message_id))
    }

    // ========================================================================
    // TRANSPORT
    // ========================================================================

    async fn call(
        &self,
        operation: Operation,
        message: &OutboundMessage,
        credentials: &Credentials,
    ) -> TaximailResult<serde_json::Value> {
        debug!(
            method = message.method.as_str(),
            url = %message.url,
            message_id = message.form_text("message_id").unwrap_or_default(),
            "Sending request"
        );
        self.transport
            .execute(message, credentials)
            .await
            .map_err(|err| TaximailError::operation_failed(operation.as_str(), &err))
    }

    /// The one path where a transport error becomes data.
    async fn verification_outcome(
        &self,
        message: &OutboundMessage,
        credentials: &Credentials,
    ) -> Result<VerificationOutcome, Infallible> {
        debug!(method = message.method.as_str(), url = %message.url, "Sending request");
        match self.transport.execute(message, credentials).await {
            Ok(response) => Ok(VerificationOutcome::from_response(response)),
            Err(err) => {
                warn!(error = %err, "OTP verification request failed");
                Ok(VerificationOutcome::Error {
                    details: err.to_string(),
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use serde_json::{json, Value};
    use std::sync::Mutex;
    use taximail_core::{StaticResolver, TransportError, ValidationError};

    /// Minimal scripted transport; the shared mock lives in taximail-test-utils.
    struct Scripted {
        reply: Result<Value, TransportError>,
        seen: Mutex<Vec<OutboundMessage>>,
    }

    impl Scripted {
        fn new(reply: Result<Value, TransportError>) -> Self {
            Self {
                reply,
                seen: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl Transport for Scripted {
        async fn execute(
            &self,
            message: &OutboundMessage,
            _credentials: &Credentials,
        ) -> Result<Value, TransportError> {
            self.seen.lock().unwrap().push(message.clone());
            self.reply.clone()
        }
    }

    fn fixed_id(prefix: &str) -> String {
        format!("{}_1700000000000_abcdefghi", prefix)
    }

    fn fixed_clock() -> String {
        "2024-01-02T03:04:05.000Z".to_string()
    }

    fn dispatcher(reply: Result<Value, TransportError>) -> Dispatcher<Scripted> {
        Dispatcher::new(Arc::new(NodeConfig::default()), Scripted::new(reply))
            .with_message_ids(fixed_id)
            .with_clock(fixed_clock)
    }

    fn creds() -> Credentials {
        Credentials::new("user", "pass").unwrap()
    }

    fn items(values: Vec<Value>) -> Vec<ItemParameters> {
        values
            .into_iter()
            .map(|v| v.as_object().cloned().unwrap())
            .collect()
    }

    #[tokio::test]
    async fn test_sms_envelope_echoes_generated_id() {
        let d = dispatcher(Ok(json!({"status": "success"})));
        let input = SendSmsInput {
            to_phone: "66812345678".to_string(),
            template_key: String::new(),
            text: "hi".to_string(),
        };
        let env = d.send_sms(&input, &creds()).await.unwrap();
        assert_eq!(env.get_str("message_id"), Some("sms_1700000000000_abcdefghi"));
        let seen = d.transport().seen.lock().unwrap();
        assert_eq!(seen[0].form_text("message_id"), Some("sms_1700000000000_abcdefghi"));
    }

    #[tokio::test]
    async fn test_transport_error_wrapped_as_operation_failed() {
        let d = dispatcher(Err(TransportError::Status {
            status: 500,
            body: "boom".to_string(),
        }));
        let input = CheckStatusInput {
            message_id: "abc".to_string(),
        };
        let err = d.check_status(&input, &creds()).await.unwrap_err();
        assert_eq!(
            err,
            TaximailError::OperationFailed {
                operation: "check_status".to_string(),
                message: "HTTP 500: boom".to_string(),
            }
        );
        assert_eq!(err.to_string(), "Operation failed: HTTP 500: boom");
    }

    #[tokio::test]
    async fn test_verify_transport_error_is_data() {
        let d = dispatcher(Err(TransportError::Request {
            reason: "connection reset".to_string(),
        }));
        let input = VerifyOtpInput {
            message_id: "m-1".to_string(),
            otp_code: "1234".to_string(),
        };
        let env = d.verify_otp(&input, &creds()).await.unwrap();
        assert_eq!(env.get_str("verification_result"), Some("ERROR"));
        assert_eq!(
            env.get_str("error_details"),
            Some("Request failed: connection reset")
        );
        assert_eq!(env.get_str("timestamp"), Some("2024-01-02T03:04:05.000Z"));
    }

    #[tokio::test]
    async fn test_verify_blank_code_never_calls_transport() {
        let d = dispatcher(Ok(json!({})));
        let input = VerifyOtpInput {
            message_id: "m-1".to_string(),
            otp_code: "   ".to_string(),
        };
        let err = d.verify_otp(&input, &creds()).await.unwrap_err();
        assert_eq!(err, TaximailError::Validation(ValidationError::MissingOtpCode));
        assert!(d.transport().seen.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_execute_halts_on_first_error() {
        let d = dispatcher(Ok(json!({"status": "success"})));
        let resolver = StaticResolver::new(creds());
        let batch = items(vec![
            json!({"operation": "check_status", "status_message_id": "a"}),
            json!({"operation": "fax"}),
            json!({"operation": "check_status", "status_message_id": "b"}),
        ]);
        let err = d.execute(&resolver, &batch).await.unwrap_err();
        assert_eq!(err, TaximailError::UnknownOperation("fax".to_string()));
        assert_eq!(d.transport().seen.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_execute_empty_batch() {
        let d = dispatcher(Ok(json!({})));
        let resolver = StaticResolver::new(creds());
        let results = d.execute(&resolver, &[]).await.unwrap();
        assert!(results.is_empty());
    }
}
