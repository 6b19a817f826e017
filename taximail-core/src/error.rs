//! Error types for Taximail operations

use thiserror::Error;

/// Local validation failures, raised before any network call.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("OTP SMS Template Key is required for sending OTP")]
    OtpTemplateRequired,

    #[error("Message ID is required for OTP verification")]
    MissingMessageId,

    #[error("OTP code is required for verification")]
    MissingOtpCode,

    #[error("Required parameter missing: {field}")]
    RequiredFieldMissing { field: String },
}

/// Failures reported by the transport collaborator.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TransportError {
    #[error("Request failed: {reason}")]
    Request { reason: String },

    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Failed to decode response: {reason}")]
    Decode { reason: String },

    #[error("Invalid request: {reason}")]
    InvalidRequest { reason: String },
}

/// Credential lookup failures.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CredentialError {
    #[error("Missing credential field: {field}")]
    Missing { field: String },

    #[error("Credentials unavailable: {reason}")]
    Unavailable { reason: String },
}

/// Configuration errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid config value for {field}: {reason}")]
    InvalidValue { field: String, reason: String },
}

/// Master error type surfaced to the host.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TaximailError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Unknown operation: {0}")]
    UnknownOperation(String),

    #[error("Operation failed: {message}")]
    OperationFailed { operation: String, message: String },

    #[error(transparent)]
    Credentials(#[from] CredentialError),
}

impl TaximailError {
    /// Wrap a transport failure with the operation it interrupted.
    pub fn operation_failed(operation: impl Into<String>, err: &TransportError) -> Self {
        Self::OperationFailed {
            operation: operation.into(),
            message: err.to_string(),
        }
    }

    /// Operation name carried by the error, when it has one.
    pub fn operation(&self) -> Option<&str> {
        match self {
            Self::OperationFailed { operation, .. } => Some(operation),
            _ => None,
        }
    }
}

/// Result type alias for dispatcher operations.
pub type TaximailResult<T> = Result<T, TaximailError>;

// =============================================================================
// TESTS
// =============================================================================
