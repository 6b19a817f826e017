//! Response normalizer: upstream reply plus operation metadata.

use serde_json::{json, Map, Value};
use taximail_core::{Envelope, MessageCatalog, Operation, VerificationOutcome};

/// Email and SMS sends: echo the generated id and remind the caller to keep it.
pub fn send_envelope(
    operation: Operation,
    response: Value,
    message_id: &str,
    messages: &MessageCatalog,
) -> Envelope {
    Envelope::from_response(response)
        .with("operation", operation.as_str())
        .with("message_id", message_id)
        .with("note", messages.save_message_id.as_str())
}

/// OTP send: surface `data.message_id` and `data.otp_ref_no` for the verify step.
pub fn sms_otp_envelope(response: Value, messages: &MessageCatalog) -> Envelope {
    let mut info = Map::new();
    for key in ["message_id", "otp_ref_no"] {
        if let Some(value) = response.get("data").and_then(|data| data.get(key)) {
            if !value.is_null() {
                info.insert(key.to_string(), value.clone());
            }
        }
    }
    info.insert(
        "next_step".to_string(),
        Value::String(messages.otp_next_step.clone()),
    );

    Envelope::from_response(response)
        .with("operation", Operation::SmsOtp.as_str())
        .with("note", messages.save_for_verify.as_str())
        .with("verification_info", Value::Object(info))
}

/// OTP verification, for all three outcomes.
pub fn verification_envelope(
    outcome: VerificationOutcome,
    message_id: &str,
    otp_code: &str,
    messages: &MessageCatalog,
    timestamp: String,
) -> Envelope {
    let result = outcome.result();
    let valid = outcome.is_valid();
    let (base, message, details) = match outcome {
        VerificationOutcome::Valid { response } => {
            (Envelope::from_response(response), &messages.otp_valid, None)
        }
        VerificationOutcome::Invalid { response } => {
            (Envelope::from_response(response), &messages.otp_invalid, None)
        }
        VerificationOutcome::Error { details } => (
            Envelope::new().with("status", "error"),
            &messages.otp_verification_failed,
            Some(details),
        ),
    };

    let mut envelope = base
        .with("operation", Operation::VerifyOtp.as_str())
        .with("message_id", message_id)
        .with("otp_code", otp_code)
        .with("otp_valid", valid)
        .with("verification_result", result.as_str())
        .with("message", message.as_str());
    if let Some(details) = details {
        envelope.insert("error_details", details);
    }
    envelope.with("timestamp", timestamp)
}

/// Status lookup: pass-through with the queried id.
pub fn status_envelope(response: Value, message_id: &str) -> Envelope {
    Envelope::from_response(response)
        .with("operation", Operation::CheckStatus.as_str())
        .with("message_id", message_id)
}

#[cfg(test)]
mod tests {
    use super::*;

    const TS: &str = "2024-01-02T03:04:05.000Z";

    #[test]
    fn test_send_envelope_tags() {
        let env = send_envelope(
            Operation::Email,
            json!({"status": "success", "code": 201}),
            "email_1_abc",
            &MessageCatalog::default(),
        );
        assert_eq!(env.get_str("operation"), Some("email"));
        assert_eq!(env.get_str("message_id"), Some("email_1_abc"));
        assert_eq!(
            env.get_str("note"),
            Some("Save this message_id to check delivery status later")
        );
        assert_eq!(env.get("code"), Some(&json!(201)));
    }

    #[test]
    fn test_sms_otp_verification_info() {
        let env = sms_otp_envelope(
            json!({"status": "success", "data": {"message_id": "m-9", "otp_ref_no": "REF1"}}),
            &MessageCatalog::default(),
        );
        assert_eq!(env.get_str("operation"), Some("sms_otp"));
        let info = env.get("verification_info").unwrap();
        assert_eq!(info["message_id"], json!("m-9"));
        assert_eq!(info["otp_ref_no"], json!("REF1"));
        assert!(info["next_step"].as_str().unwrap().contains("verify"));
        assert!(env.get("message_id").is_none());
    }

    #[test]
    fn test_sms_otp_without_data_omits_ids() {
        let env = sms_otp_envelope(json!({"status": "error"}), &MessageCatalog::default());
        let info = env.get("verification_info").unwrap().as_object().unwrap();
        assert!(!info.contains_key("message_id"));
        assert!(!info.contains_key("otp_ref_no"));
        assert!(info.contains_key("next_step"));
    }

    #[test]
    fn test_verification_valid_envelope() {
        let outcome = VerificationOutcome::from_response(json!({"status": "success", "code": 202}));
        let env = verification_envelope(outcome, "m-1", "1234", &MessageCatalog::default(), TS.into());
        assert_eq!(env.get("otp_valid"), Some(&json!(true)));
        assert_eq!(env.get_str("verification_result"), Some("VALID"));
        assert_eq!(env.get_str("status"), Some("success"));
        assert_eq!(env.get_str("timestamp"), Some(TS));
        assert!(env.get("error_details").is_none());
    }

    #[test]
    fn test_verification_error_envelope() {
        let outcome = VerificationOutcome::Error {
            details: "HTTP 400: Invalid OTP".to_string(),
        };
        let env = verification_envelope(outcome, "m-1", "1234", &MessageCatalog::default(), TS.into());
        assert_eq!(env.get_str("status"), Some("error"));
        assert_eq!(env.get("otp_valid"), Some(&json!(false)));
        assert_eq!(env.get_str("verification_result"), Some("ERROR"));
        assert_eq!(env.get_str("error_details"), Some("HTTP 400: Invalid OTP"));
        assert_eq!(
            env.get_str("message"),
            Some("OTP verification failed - invalid code or expired")
        );
    }

    #[test]
    fn test_status_envelope_passthrough() {
        let env = status_envelope(
            json!({"status": "success", "code": 200, "data": {"state": "delivered"}}),
            "63bf89390fe2f00008a236c3",
        );
        assert_eq!(
            env.into_value(),
            json!({
                "status": "success",
                "code": 200,
                "data": {"state": "delivered"},
                "operation": "check_status",
                "message_id": "63bf89390fe2f00008a236c3",
            })
        );
    }
}
