//! Taximail Core - Data Types
//!
//! Pure data structures shared by the dispatcher, the HTTP client and the
//! test utilities. No I/O happens in this crate.

pub mod config;
pub mod envelope;
pub mod error;
pub mod identity;
pub mod message;
pub mod operation;
pub mod transport;

pub use config::{ApiEndpoints, MessageCatalog, NodeConfig, SendDefaults};
pub use envelope::{Envelope, VerificationOutcome, VerificationResult};
pub use error::{
    ConfigError, CredentialError, TaximailError, TaximailResult, TransportError, ValidationError,
};
pub use identity::{format_timestamp, generate_message_id, now_timestamp, Timestamp};
pub use message::{FormValue, HttpMethod, OutboundMessage, Payload};
pub use operation::{
    non_blank, CheckStatusInput, Operation, OperationParseError, OperationRequest,
    SendEmailInput, SendSmsInput, SendSmsOtpInput, VerifyOtpInput,
};
pub use transport::{CredentialResolver, Credentials, StaticResolver, Transport};
