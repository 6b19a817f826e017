//! Credential sources.

use crate::config::ClientConfig;
use async_trait::async_trait;
use std::sync::Arc;
use taximail_core::{CredentialError, CredentialResolver, Credentials, StaticResolver};

/// Environment variable holding the API key.
pub const USERNAME_ENV: &str = "TAXIMAIL_USERNAME";

/// Environment variable holding the secret key.
pub const PASSWORD_ENV: &str = "TAXIMAIL_PASSWORD";

/// Reads credentials from environment variables at resolve time.
#[derive(Debug, Clone)]
pub struct EnvResolver {
    username_var: String,
    password_var: String,
}

impl EnvResolver {
    pub fn new() -> Self {
        Self::with_vars(USERNAME_ENV, PASSWORD_ENV)
    }

    pub fn with_vars(username_var: impl Into<String>, password_var: impl Into<String>) -> Self {
        Self {
            username_var: username_var.into(),
            password_var: password_var.into(),
        }
    }

    fn read(var: &str) -> Result<String, CredentialError> {
        match std::env::var(var) {
            Ok(value) if !value.trim().is_empty() => Ok(value),
            Ok(_) | Err(std::env::VarError::NotPresent) => Err(CredentialError::Missing {
                field: var.to_string(),
            }),
            Err(err) => Err(CredentialError::Unavailable {
                reason: format!("{}: {}", var, err),
            }),
        }
    }
}

impl Default for EnvResolver {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CredentialResolver for EnvResolver {
    async fn resolve(&self) -> Result<Credentials, CredentialError> {
        let username = Self::read(&self.username_var)?;
        let password = Self::read(&self.password_var)?;
        Credentials::new(username, password)
    }
}

/// Inline `[credentials]` from the config file win; otherwise the environment.
pub fn resolver_from_config(
    config: &ClientConfig,
) -> Result<Arc<dyn CredentialResolver>, CredentialError> {
    match &config.credentials {
        Some(inline) => {
            let credentials = Credentials::new(&inline.username, &inline.password)?;
            Ok(Arc::new(StaticResolver::new(credentials)))
        }
        None => Ok(Arc::new(EnvResolver::new())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_env_resolver_reads_vars() {
        std::env::set_var("TAXIMAIL_TEST_USER_A", "api-key");
        std::env::set_var("TAXIMAIL_TEST_PASS_A", "secret");
        let resolver = EnvResolver::with_vars("TAXIMAIL_TEST_USER_A", "TAXIMAIL_TEST_PASS_A");
        let creds = resolver.resolve().await.unwrap();
        assert_eq!(creds.username(), "api-key");
        assert_eq!(creds.expose_password(), "secret");
    }

    #[tokio::test]
    async fn test_env_resolver_missing_var() {
        std::env::set_var("TAXIMAIL_TEST_USER_B", "api-key");
        std::env::remove_var("TAXIMAIL_TEST_PASS_B");
        let resolver = EnvResolver::with_vars("TAXIMAIL_TEST_USER_B", "TAXIMAIL_TEST_PASS_B");
        let err = resolver.resolve().await.unwrap_err();
        assert_eq!(
            err,
            CredentialError::Missing {
                field: "TAXIMAIL_TEST_PASS_B".to_string()
            }
        );
    }

    #[tokio::test]
    async fn test_env_resolver_blank_var_is_missing() {
        std::env::set_var("TAXIMAIL_TEST_USER_C", "   ");
        std::env::set_var("TAXIMAIL_TEST_PASS_C", "secret");
        let resolver = EnvResolver::with_vars("TAXIMAIL_TEST_USER_C", "TAXIMAIL_TEST_PASS_C");
        assert!(matches!(
            resolver.resolve().await,
            Err(CredentialError::Missing { .. })
        ));
    }

    #[tokio::test]
    async fn test_inline_credentials_take_precedence() {
        let config = ClientConfig::from_toml_str(
            r#"
            [credentials]
            username = "inline-key"
            password = "inline-secret"
            "#,
        )
        .unwrap();
        let resolver = resolver_from_config(&config).unwrap();
        let creds = resolver.resolve().await.unwrap();
        assert_eq!(creds.username(), "inline-key");
    }

    #[test]
    fn test_blank_inline_credentials_rejected() {
        let config = ClientConfig::from_toml_str(
            r#"
            [credentials]
            username = "inline-key"
            password = ""
            "#,
        )
        .unwrap();
        assert!(resolver_from_config(&config).is_err());
    }
}
