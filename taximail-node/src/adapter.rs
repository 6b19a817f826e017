//! Host boundary: loosely-typed item parameters to a typed request.
//!
//! Parameters the host schema marks required must be present; optional ones
//! fall back to the empty string, as the host's own defaults do. Blank
//! checks are left to the builders.

use serde_json::{Map, Value};
use taximail_core::{
    CheckStatusInput, Operation, OperationRequest, SendEmailInput, SendSmsInput,
    SendSmsOtpInput, TaximailResult, ValidationError, VerifyOtpInput,
};

/// Parameters of one input item, keyed by parameter name.
pub type ItemParameters = Map<String, Value>;

/// Build the typed request for one item.
pub fn parse_item(item: &ItemParameters) -> TaximailResult<OperationRequest> {
    let operation: Operation = match item.get("operation") {
        Some(Value::String(tag)) => tag.parse()?,
        _ => return Err(missing("operation").into()),
    };

    let params = Params(item);
    let request = match operation {
        Operation::Email => OperationRequest::Email(SendEmailInput {
            to_email: params.required("to_email")?,
            from_email: params.required("from_email")?,
            from_name: params.required("from_name")?,
            template_key: params.optional("email_template_key"),
            subject: params.optional("subject"),
            html_content: params.optional("html_content"),
        }),
        Operation::Sms => OperationRequest::Sms(SendSmsInput {
            to_phone: params.required("to_phone")?,
            template_key: params.optional("sms_template_key"),
            text: params.optional("sms_text"),
        }),
        Operation::SmsOtp => OperationRequest::SmsOtp(SendSmsOtpInput {
            to_phone: params.required("to_phone")?,
            template_key: params.required("otp_template_key")?,
        }),
        Operation::VerifyOtp => OperationRequest::VerifyOtp(VerifyOtpInput {
            message_id: params.required("verify_message_id")?,
            otp_code: params.required("otp_code")?,
        }),
        Operation::CheckStatus => OperationRequest::CheckStatus(CheckStatusInput {
            message_id: params.required("status_message_id")?,
        }),
    };
    Ok(request)
}

struct Params<'a>(&'a ItemParameters);

impl Params<'_> {
    fn get(&self, name: &str) -> Option<String> {
        match self.0.get(name)? {
            Value::Null => None,
            Value::String(s) => Some(s.clone()),
            // Host expressions often yield numbers for phone numbers and codes.
            other => Some(other.to_string()),
        }
    }

    fn required(&self, name: &str) -> Result<String, ValidationError> {
        self.get(name).ok_or_else(|| missing(name))
    }

    fn optional(&self, name: &str) -> String {
        self.get(name).unwrap_or_default()
    }
}

fn missing(field: &str) -> ValidationError {
    ValidationError::RequiredFieldMissing {
        field: field.to_string(),
    }
}
