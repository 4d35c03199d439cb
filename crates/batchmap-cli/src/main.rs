//! batchmap - run one batch from stdin through a built-in transform.
//!
//! Stands in for the event runtime: the batch arrives as JSON on stdin and the
//! `BatchResult` JSON is written to stdout. Logs go to stderr.

mod config;
mod transforms;

use std::process::ExitCode;

use anyhow::Context;
use batchmap_core::Batch;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tracing::{debug, error, info};
use tracing_subscriber::EnvFilter;

use crate::config::CliConfig;

#[tokio::main]
async fn main() -> ExitCode {
    let config = match CliConfig::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            return ExitCode::FAILURE;
        }
    };

    init_tracing(&config.log_level);
    debug!("Configuration: {:?}", config);

    match run(config).await {
        Ok(code) => code,
        Err(e) => {
            error!(error = %format!("{e:#}"), "batch processing failed");
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(log_level: &str) {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();
}

async fn run(config: CliConfig) -> anyhow::Result<ExitCode> {
    let mut input = String::new();
    tokio::io::stdin()
        .read_to_string(&mut input)
        .await
        .context("failed to read batch from stdin")?;
    let batch: Batch = serde_json::from_str(&input).context("failed to parse batch")?;

    let adapter = transforms::build_adapter(config.transform, config.as_json)?;
    info!(
        transform = ?config.transform,
        mode = %adapter.mode(),
        messages = batch.len(),
        "processing batch"
    );

    let result = adapter.process(&batch).await;

    // No structured channel is left once the result itself cannot be
    // serialized: the error goes out as plain text instead.
    let (body, code) = match result.to_json() {
        Ok(json) => (json, ExitCode::SUCCESS),
        Err(e) => {
            error!(error = %e, "failed to serialize batch result");
            (e.to_string(), ExitCode::FAILURE)
        }
    };

    let mut stdout = tokio::io::stdout();
    stdout.write_all(body.as_bytes()).await?;
    stdout.write_all(b"\n").await?;
    stdout.flush().await?;
    Ok(code)
}
