//! Operation tags and the typed per-operation inputs.
//!
//! The host adapter turns loosely-typed item parameters into one of these
//! structs; builders only ever see the typed form.

use crate::TaximailError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ============================================================================
// OPERATION TAG
// ============================================================================

/// The five actions a workflow item can request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Operation {
    /// Send a transactional email
    Email,
    /// Send a transactional SMS
    Sms,
    /// Send an OTP over SMS
    SmsOtp,
    /// Verify a previously sent OTP
    VerifyOtp,
    /// Query delivery status of a message
    CheckStatus,
}

impl Operation {
    /// All operations, in the order the host lists them.
    pub const ALL: [Operation; 5] = [
        Self::CheckStatus,
        Self::Email,
        Self::Sms,
        Self::SmsOtp,
        Self::VerifyOtp,
    ];

    /// Wire tag used in item parameters and envelopes.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Email => "email",
            Self::Sms => "sms",
            Self::SmsOtp => "sms_otp",
            Self::VerifyOtp => "verify_otp",
            Self::CheckStatus => "check_status",
        }
    }

    /// Human-readable label.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Email => "Send Email",
            Self::Sms => "Send SMS",
            Self::SmsOtp => "Send SMS OTP",
            Self::VerifyOtp => "Verify OTP",
            Self::CheckStatus => "Check Status",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error parsing an Operation from its tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperationParseError(pub String);

impl fmt::Display for OperationParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown operation: {}", self.0)
    }
}

impl std::error::Error for OperationParseError {}

impl From<OperationParseError> for TaximailError {
    fn from(err: OperationParseError) -> Self {
        TaximailError::UnknownOperation(err.0)
    }
}

impl FromStr for Operation {
    type Err = OperationParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "email" => Ok(Self::Email),
            "sms" => Ok(Self::Sms),
            "sms_otp" => Ok(Self::SmsOtp),
            "verify_otp" => Ok(Self::VerifyOtp),
            "check_status" => Ok(Self::CheckStatus),
            _ => Err(OperationParseError(s.to_string())),
        }
    }
}

// ============================================================================
// TYPED INPUTS
// ============================================================================

/// Parameters for sending an email.
///
/// `template_key`, `subject` and `html_content` are empty strings when the
/// caller left them unset.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SendEmailInput {
    pub to_email: String,
    pub from_email: String,
    pub from_name: String,
    pub template_key: String,
    pub subject: String,
    pub html_content: String,
}

/// Parameters for sending an SMS.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SendSmsInput {
    pub to_phone: String,
    pub template_key: String,
    pub text: String,
}

/// Parameters for sending an OTP over SMS.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SendSmsOtpInput {
    pub to_phone: String,
    pub template_key: String,
}

/// Parameters for verifying an OTP.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct VerifyOtpInput {
    pub message_id: String,
    pub otp_code: String,
}

/// Parameters for a delivery status lookup.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CheckStatusInput {
    pub message_id: String,
}

/// One item's request, built fresh per input item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OperationRequest {
    Email(SendEmailInput),
    Sms(SendSmsInput),
    SmsOtp(SendSmsOtpInput),
    VerifyOtp(VerifyOtpInput),
    CheckStatus(CheckStatusInput),
}

impl OperationRequest {
    /// Tag of the operation this request selects.
    pub fn operation(&self) -> Operation {
        match self {
            Self::Email(_) => Operation::Email,
            Self::Sms(_) => Operation::Sms,
            Self::SmsOtp(_) => Operation::SmsOtp,
            Self::VerifyOtp(_) => Operation::VerifyOtp,
            Self::CheckStatus(_) => Operation::CheckStatus,
        }
    }
}

/// Trimmed value, or `None` when blank.
pub fn non_blank(value: &str) -> Option<&str> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed)
    }
}
