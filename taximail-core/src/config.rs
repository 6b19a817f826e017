//! Static configuration: endpoints, send defaults and the message catalog.
//!
//! Built once at startup and shared read-only by the dispatcher.
//! `NodeConfig::default()` carries the provider's published constants.

use crate::ConfigError;
use serde::{Deserialize, Serialize};

/// Default API host.
pub const DEFAULT_BASE_URL: &str = "https://api.taximail.com";

/// Default API version path segment.
pub const DEFAULT_API_VERSION: &str = "v2";

/// Default SMS sender name.
pub const DEFAULT_SMS_SENDER: &str = "TXSMS";

/// Default transactional group.
pub const DEFAULT_GROUP_NAME: &str = "Default";

// ============================================================================
// ENDPOINTS
// ============================================================================

/// Location of the Taximail REST surface.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ApiEndpoints {
    pub base_url: String,
    pub api_version: String,
}

impl Default for ApiEndpoints {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_version: DEFAULT_API_VERSION.to_string(),
        }
    }
}

impl ApiEndpoints {
    /// `{base}/{version}`
    pub fn root(&self) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            self.api_version.trim_matches('/')
        )
    }

    pub fn transactional(&self) -> String {
        format!("{}/transactional", self.root())
    }

    pub fn sms(&self) -> String {
        format!("{}/sms", self.root())
    }

    pub fn otp(&self) -> String {
        format!("{}/otp", self.root())
    }

    /// Status lookup for one message. The id is percent-encoded.
    pub fn transactional_status(&self, message_id: &str) -> String {
        format!("{}/{}", self.transactional(), urlencoding::encode(message_id))
    }

    /// OTP verification for one message. The id is percent-encoded.
    pub fn otp_verify(&self, message_id: &str) -> String {
        format!("{}/otp/verify/{}", self.root(), urlencoding::encode(message_id))
    }
}

// ============================================================================
// SEND DEFAULTS
// ============================================================================

/// Fixed values attached to outgoing sends.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SendDefaults {
    pub sms_sender: String,
    pub group_name: String,
    pub report_webhook: bool,
    pub generate_link: bool,
}

impl Default for SendDefaults {
    fn default() -> Self {
        Self {
            sms_sender: DEFAULT_SMS_SENDER.to_string(),
            group_name: DEFAULT_GROUP_NAME.to_string(),
            report_webhook: true,
            generate_link: true,
        }
    }
}

// ============================================================================
// MESSAGE CATALOG
// ============================================================================

/// Human-readable strings placed in result envelopes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MessageCatalog {
    pub save_message_id: String,
    pub save_for_verify: String,
    pub otp_next_step: String,
    pub otp_valid: String,
    pub otp_invalid: String,
    pub otp_verification_failed: String,
}

impl Default for MessageCatalog {
    fn default() -> Self {
        Self {
            save_message_id: "Save this message_id to check delivery status later".to_string(),
            save_for_verify: "Save the message_id and otp_ref_no to verify OTP later".to_string(),
            otp_next_step: "Use the message_id to verify the OTP code entered by user".to_string(),
            otp_valid: "OTP verification successful - code is valid".to_string(),
            otp_invalid: "OTP verification failed - code is invalid or expired".to_string(),
            otp_verification_failed: "OTP verification failed - invalid code or expired"
                .to_string(),
        }
    }
}

// ============================================================================
// NODE CONFIG
// ============================================================================

/// Everything the dispatcher needs besides a transport and credentials.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct NodeConfig {
    pub endpoints: ApiEndpoints,
    pub defaults: SendDefaults,
    pub messages: MessageCatalog,
}

impl NodeConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        let base = self.endpoints.base_url.trim();
        if base.is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "endpoints.base_url".to_string(),
                reason: "must not be empty".to_string(),
            });
        }
        if !(base.starts_with("https://") || base.starts_with("http://")) {
            return Err(ConfigError::InvalidValue {
                field: "endpoints.base_url".to_string(),
                reason: "must start with http:// or https://".to_string(),
            });
        }
        if self.endpoints.api_version.trim_matches('/').trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "endpoints.api_version".to_string(),
                reason: "must not be empty".to_string(),
            });
        }
        if self.defaults.sms_sender.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "defaults.sms_sender".to_string(),
                reason: "must not be empty".to_string(),
            });
        }
        if self.defaults.group_name.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "defaults.group_name".to_string(),
                reason: "must not be empty".to_string(),
            });
        }
        Ok(())
    }
}
