//! Collaborator seams: credentials and the HTTP transport.
//!
//! The dispatcher is written against these traits only. The reqwest-backed
//! implementations live in `taximail-client`; mocks live in
//! `taximail-test-utils`.

use crate::{CredentialError, OutboundMessage, TransportError};
use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde_json::Value;

// ============================================================================
// CREDENTIALS
// ============================================================================

/// HTTP Basic credentials: the Taximail API key and secret key.
///
/// The secret is never printed by `Debug`.
#[derive(Clone)]
pub struct Credentials {
    username: String,
    password: SecretString,
}

impl Credentials {
    /// Build credentials, rejecting blank fields.
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Result<Self, CredentialError> {
        let username = username.into();
        let password = password.into();
        if username.trim().is_empty() {
            return Err(CredentialError::Missing {
                field: "username".to_string(),
            });
        }
        if password.trim().is_empty() {
            return Err(CredentialError::Missing {
                field: "password".to_string(),
            });
        }
        Ok(Self {
            username,
            password: SecretString::new(password.into()),
        })
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    /// Expose the secret key (only for building the Authorization header).
    pub fn expose_password(&self) -> &str {
        self.password.expose_secret()
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

/// Source of credentials, queried once per batch.
#[async_trait]
pub trait CredentialResolver: Send + Sync {
    async fn resolve(&self) -> Result<Credentials, CredentialError>;
}

/// Resolver that hands out a fixed set of credentials.
#[derive(Debug, Clone)]
pub struct StaticResolver {
    credentials: Credentials,
}

impl StaticResolver {
    pub fn new(credentials: Credentials) -> Self {
        Self { credentials }
    }
}

#[async_trait]
impl CredentialResolver for StaticResolver {
    async fn resolve(&self) -> Result<Credentials, CredentialError> {
        Ok(self.credentials.clone())
    }
}

// ============================================================================
// TRANSPORT
// ============================================================================

/// Performs one authenticated HTTP call and returns the decoded body.
///
/// Implementations send form payloads as
/// `application/x-www-form-urlencoded` and map non-2xx replies to
/// [`TransportError::Status`].
#[async_trait]
pub trait Transport: Send + Sync {
    async fn execute(
        &self,
        message: &OutboundMessage,
        credentials: &Credentials,
    ) -> Result<Value, TransportError>;
}

#[async_trait]
impl<T: Transport + ?Sized> Transport for std::sync::Arc<T> {
    async fn execute(
        &self,
        message: &OutboundMessage,
        credentials: &Credentials,
    ) -> Result<Value, TransportError> {
        (**self).execute(message, credentials).await
    }
}
