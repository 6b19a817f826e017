//! Taximail Test Utilities
//!
//! Shared test infrastructure for the Taximail workspace:
//! - Mock transport with scripted replies and recorded calls
//! - Mock credential resolver
//! - Proptest generators for item parameters
//! - Fixtures for common items and upstream replies
//! - Custom assertions for envelopes

pub use taximail_core::{
    CredentialError, CredentialResolver, Credentials, Envelope, NodeConfig, Operation,
    OutboundMessage, StaticResolver, TaximailError, TaximailResult, Transport, TransportError,
    ValidationError,
};

use async_trait::async_trait;
use serde_json::{json, Map, Value};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard};

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

// ============================================================================
// MOCK TRANSPORT
// ============================================================================

/// One request seen by [`MockTransport`].
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedCall {
    pub message: OutboundMessage,
    pub username: String,
}

/// Transport that replays scripted replies in FIFO order.
///
/// When the script runs dry every further call gets the default response.
#[derive(Debug)]
pub struct MockTransport {
    script: Mutex<VecDeque<Result<Value, TransportError>>>,
    calls: Mutex<Vec<RecordedCall>>,
    default_response: Value,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::with_default(json!({"status": "success", "code": 200}))
    }

    pub fn with_default(default_response: Value) -> Self {
        Self {
            script: Mutex::new(VecDeque::new()),
            calls: Mutex::new(Vec::new()),
            default_response,
        }
    }

    /// Queue a successful reply.
    pub fn push_response(&self, response: Value) -> &Self {
        lock(&self.script).push_back(Ok(response));
        self
    }

    /// Queue a transport failure.
    pub fn push_error(&self, error: TransportError) -> &Self {
        lock(&self.script).push_back(Err(error));
        self
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        lock(&self.calls).clone()
    }

    pub fn call_count(&self) -> usize {
        lock(&self.calls).len()
    }

    /// Last request sent, if any.
    pub fn last_message(&self) -> Option<OutboundMessage> {
        lock(&self.calls).last().map(|call| call.message.clone())
    }
}

impl Default for MockTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn execute(
        &self,
        message: &OutboundMessage,
        credentials: &Credentials,
    ) -> Result<Value, TransportError> {
        lock(&self.calls).push(RecordedCall {
            message: message.clone(),
            username: credentials.username().to_string(),
        });
        lock(&self.script)
            .pop_front()
            .unwrap_or_else(|| Ok(self.default_response.clone()))
    }
}

// ============================================================================
// MOCK CREDENTIALS
// ============================================================================

/// Credentials used throughout the test suites.
pub fn mock_credentials() -> Credentials {
    match Credentials::new("test-api-key", "test-secret") {
        Ok(credentials) => credentials,
        Err(err) => panic!("fixture credentials rejected: {}", err),
    }
}

/// Resolver that counts lookups and can be told to fail.
#[derive(Debug)]
pub struct MockResolver {
    result: Result<Credentials, CredentialError>,
    resolves: AtomicUsize,
}

impl MockResolver {
    pub fn new() -> Self {
        Self {
            result: Ok(mock_credentials()),
            resolves: AtomicUsize::new(0),
        }
    }

    pub fn failing(error: CredentialError) -> Self {
        Self {
            result: Err(error),
            resolves: AtomicUsize::new(0),
        }
    }

    pub fn resolve_count(&self) -> usize {
        self.resolves.load(Ordering::SeqCst)
    }
}

impl Default for MockResolver {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CredentialResolver for MockResolver {
    async fn resolve(&self) -> Result<Credentials, CredentialError> {
        self.resolves.fetch_add(1, Ordering::SeqCst);
        self.result.clone()
    }
}

// ============================================================================
// PROPTEST GENERATORS
// ============================================================================

pub mod generators {
    //! Proptest strategies for item parameters.

    use super::*;
    use proptest::prelude::*;

    /// Any of the five operations.
    pub fn arb_operation() -> impl Strategy<Value = Operation> {
        prop_oneof![
            Just(Operation::Email),
            Just(Operation::Sms),
            Just(Operation::SmsOtp),
            Just(Operation::VerifyOtp),
            Just(Operation::CheckStatus),
        ]
    }

    /// Whitespace-only strings, including the empty string.
    pub fn arb_blank() -> impl Strategy<Value = String> {
        "[ \t\r\n]{0,6}"
    }

    /// Template keys with non-blank content, possibly padded.
    pub fn arb_template_key() -> impl Strategy<Value = String> {
        ("[ ]{0,2}", "[a-z][a-z0-9_-]{0,15}", "[ ]{0,2}")
            .prop_map(|(lead, key, trail)| format!("{}{}{}", lead, key, trail))
    }

    /// Upstream-style message ids, safe to embed in a URL path as-is.
    pub fn arb_message_id() -> impl Strategy<Value = String> {
        "[a-f0-9]{24}"
    }

    /// Numeric OTP codes.
    pub fn arb_otp_code() -> impl Strategy<Value = String> {
        "[0-9]{4,8}"
    }

    pub fn arb_phone() -> impl Strategy<Value = String> {
        "66[0-9]{9}"
    }

    pub fn arb_email() -> impl Strategy<Value = String> {
        ("[a-z]{1,10}", "[a-z]{1,10}").prop_map(|(user, domain)| format!("{}@{}.com", user, domain))
    }

    /// Free text, including text well past a single SMS segment.
    pub fn arb_sms_text() -> impl Strategy<Value = String> {
        "[a-zA-Z0-9 .,!]{1,400}"
    }

    /// Upstream `code` values other than 202.
    pub fn arb_non_accepted_code() -> impl Strategy<Value = i64> {
        prop_oneof![100i64..202, 203i64..600]
    }

    /// Non-object upstream bodies.
    pub fn arb_scalar_response() -> impl Strategy<Value = Value> {
        prop_oneof![
            Just(Value::Null),
            any::<bool>().prop_map(Value::Bool),
            any::<i64>().prop_map(|n| json!(n)),
            "[a-z ]{0,20}".prop_map(Value::String),
            prop::collection::vec(any::<i32>(), 0..4).prop_map(|v| json!(v)),
        ]
    }

    /// Transport failures of every kind.
    pub fn arb_transport_error() -> impl Strategy<Value = TransportError> {
        prop_oneof![
            "[a-z ]{1,20}".prop_map(|reason| TransportError::Request { reason }),
            (400u16..600, "[a-zA-Z ]{0,20}")
                .prop_map(|(status, body)| TransportError::Status { status, body }),
            "[a-z ]{1,20}".prop_map(|reason| TransportError::Decode { reason }),
        ]
    }
}

// ============================================================================
// TEST FIXTURES
// ============================================================================

pub mod fixtures {
    //! Pre-built host items and upstream replies.

    use super::*;

    fn object(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => Map::new(),
        }
    }

    pub fn email_item(template_key: &str) -> Map<String, Value> {
        object(json!({
            "operation": "email",
            "to_email": "customer@example.com",
            "from_email": "noreply@example.com",
            "from_name": "Example Shop",
            "email_template_key": template_key,
            "subject": "Your order",
            "html_content": "<p>Thanks for your order</p>",
        }))
    }

    pub fn sms_item(template_key: &str, text: &str) -> Map<String, Value> {
        object(json!({
            "operation": "sms",
            "to_phone": "66812345678",
            "sms_template_key": template_key,
            "sms_text": text,
        }))
    }

    pub fn sms_otp_item(template_key: &str) -> Map<String, Value> {
        object(json!({
            "operation": "sms_otp",
            "to_phone": "66812345678",
            "otp_template_key": template_key,
        }))
    }

    pub fn verify_item(message_id: &str, otp_code: &str) -> Map<String, Value> {
        object(json!({
            "operation": "verify_otp",
            "verify_message_id": message_id,
            "otp_code": otp_code,
        }))
    }

    pub fn status_item(message_id: &str) -> Map<String, Value> {
        object(json!({
            "operation": "check_status",
            "status_message_id": message_id,
        }))
    }

    /// Reply to a send call.
    pub fn accepted_response() -> Value {
        json!({"status": "success", "code": 201, "data": {"queued": true}})
    }

    /// Reply to an OTP send carrying the ids the verify step needs.
    pub fn otp_sent_response(message_id: &str, otp_ref_no: &str) -> Value {
        json!({
            "status": "success",
            "code": 201,
            "data": {"message_id": message_id, "otp_ref_no": otp_ref_no},
        })
    }

    /// Reply the API gives for a correct OTP.
    pub fn otp_valid_response() -> Value {
        json!({"status": "success", "code": 202})
    }

    pub fn status_response(message_id: &str) -> Value {
        json!({
            "status": "success",
            "code": 200,
            "data": {"message_id": message_id, "status": "delivered"},
        })
    }
}

// ============================================================================
// CUSTOM ASSERTIONS
// ============================================================================

pub mod assertions {
    //! Assertions for envelopes and dispatcher errors.

    use super::*;

    /// Assert that the envelope carries the given operation tag.
    #[track_caller]
    pub fn assert_operation(envelope: &Envelope, operation: Operation) {
        assert_eq!(
            envelope.get_str("operation"),
            Some(operation.as_str()),
            "wrong operation tag in {:?}",
            envelope
        );
    }

    /// Assert that a dispatcher result is a specific validation error.
    #[track_caller]
    pub fn assert_validation_error<T: std::fmt::Debug>(
        result: &TaximailResult<T>,
        expected: ValidationError,
    ) {
        match result {
            Err(TaximailError::Validation(err)) => assert_eq!(*err, expected),
            other => panic!("Expected {:?}, got: {:?}", expected, other),
        }
    }

    /// Assert that a dispatcher result is `OperationFailed` for `operation`.
    #[track_caller]
    pub fn assert_operation_failed<T: std::fmt::Debug>(
        result: &TaximailResult<T>,
        operation: Operation,
    ) {
        match result {
            Err(TaximailError::OperationFailed { operation: op, .. }) => {
                assert_eq!(op, operation.as_str())
            }
            other => panic!("Expected OperationFailed for {}, got: {:?}", operation, other),
        }
    }
}
