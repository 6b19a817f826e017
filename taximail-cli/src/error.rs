use taximail_client::{ClientConfigError, ClientError};
use taximail_core::{CredentialError, TaximailError, TransportError};
use thiserror::Error;

/// Everything that can stop a CLI run.
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Config(#[from] ClientConfigError),

    #[error(transparent)]
    Client(#[from] ClientError),

    #[error(transparent)]
    Credentials(#[from] CredentialError),

    #[error("Credential test failed: {0}")]
    CredentialTest(#[from] TransportError),

    #[error(transparent)]
    Dispatch(#[from] TaximailError),

    #[error("Failed to read input from {source_name}: {source}")]
    Io {
        source_name: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Failed to write output: {0}")]
    Output(#[from] serde_json::Error),

    #[error("{0}")]
    Telemetry(String),
}
