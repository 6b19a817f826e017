//! Taximail client: HTTP transport, configuration and credential sources.

pub mod config;
pub mod credentials;
pub mod error;
pub mod http;

pub use config::{ClientConfig, ClientConfigError, CredentialsConfig};
pub use credentials::{resolver_from_config, EnvResolver, PASSWORD_ENV, USERNAME_ENV};
pub use error::ClientError;
pub use http::HttpTransport;
