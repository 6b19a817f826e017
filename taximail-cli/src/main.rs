//! Taximail CLI entry point.
//!
//! Reads a JSON array of items, runs them through the dispatcher and writes
//! `[{"json": envelope}, ...]` to stdout.

mod error;
mod telemetry;

use clap::Parser;
use error::CliError;
use serde_json::{json, Value};
use std::io::Read;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use taximail_client::{resolver_from_config, ClientConfig, HttpTransport};
use taximail_core::{CredentialResolver, Envelope};
use taximail_node::{Dispatcher, ItemParameters};

#[derive(Parser, Debug)]
#[command(name = "taximail", version, about = "Send Taximail email, SMS and OTP requests")]
struct Args {
    /// TOML config file; defaults are used when omitted
    #[arg(long, env = "TAXIMAIL_CONFIG")]
    config: Option<PathBuf>,

    /// JSON array of items, or `-` for stdin
    #[arg(long, env = "TAXIMAIL_INPUT", default_value = "-")]
    input: String,

    /// Pretty-print the output
    #[arg(long)]
    pretty: bool,

    /// Emit logs as JSON
    #[arg(long)]
    log_json: bool,

    /// Check the credentials against the API and exit
    #[arg(long)]
    test_credentials: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();
    if let Err(err) = telemetry::init_tracing(args.log_json) {
        eprintln!("{}", err);
        return ExitCode::FAILURE;
    }

    match run(args).await {
        Ok(output) => {
            println!("{}", output);
            ExitCode::SUCCESS
        }
        Err(err) => {
            tracing::error!(error = %err, "Run failed");
            eprintln!("{}", err);
            ExitCode::FAILURE
        }
    }
}

async fn run(args: Args) -> Result<String, CliError> {
    let config = ClientConfig::load(args.config.as_deref())?;
    let resolver = resolver_from_config(&config)?;
    let transport = HttpTransport::new(&config)?;

    let output = if args.test_credentials {
        let credentials = resolver.resolve().await?;
        transport.test_credentials(&credentials).await?;
        tracing::info!("Credentials accepted");
        json!([{"json": {"status": "success", "message": "Connection successful"}}])
    } else {
        let items = parse_items(&read_input(&args.input)?)?;
        let dispatcher = Dispatcher::new(Arc::new(config.node.clone()), transport);
        let envelopes = dispatcher.execute(resolver.as_ref(), &items).await?;
        output_items(envelopes)
    };

    let rendered = if args.pretty {
        serde_json::to_string_pretty(&output)?
    } else {
        serde_json::to_string(&output)?
    };
    Ok(rendered)
}

fn read_input(source: &str) -> Result<String, CliError> {
    let result = if source == "-" {
        let mut buf = String::new();
        std::io::stdin().read_to_string(&mut buf).map(|_| buf)
    } else {
        std::fs::read_to_string(source)
    };
    result.map_err(|source_err| CliError::Io {
        source_name: if source == "-" { "stdin".to_string() } else { source.to_string() },
        source: source_err,
    })
}

/// Accepts bare parameter objects or host-style `{"json": {...}}` wrappers.
fn parse_items(raw: &str) -> Result<Vec<ItemParameters>, CliError> {
    let value: Value =
        serde_json::from_str(raw).map_err(|e| CliError::InvalidInput(e.to_string()))?;
    let Value::Array(entries) = value else {
        return Err(CliError::InvalidInput("expected a JSON array of items".to_string()));
    };

    entries
        .into_iter()
        .enumerate()
        .map(|(index, entry)| match entry {
            Value::Object(mut map) => {
                if map.len() == 1 && matches!(map.get("json"), Some(Value::Object(_))) {
                    if let Some(Value::Object(inner)) = map.remove("json") {
                        return Ok(inner);
                    }
                }
                Ok(map)
            }
            _ => Err(CliError::InvalidInput(format!(
                "item {} is not a JSON object",
                index
            ))),
        })
        .collect()
}

fn output_items(envelopes: Vec<Envelope>) -> Value {
    Value::Array(
        envelopes
            .into_iter()
            .map(|envelope| json!({"json": envelope.into_value()}))
            .collect(),
    )
}
