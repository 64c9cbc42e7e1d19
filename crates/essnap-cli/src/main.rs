#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]

mod command;
mod config;
mod telemetry;

use std::io::Write;
use std::process;

use anyhow::Context;
use essnap_snapshot::SnapshotResponse;

use crate::config::Cli;

// Tracing target constants
pub const TRACING_TARGET_STARTUP: &str = "essnap_cli::startup";
pub const TRACING_TARGET_SHUTDOWN: &str = "essnap_cli::shutdown";
pub const TRACING_TARGET_CONFIG: &str = "essnap_cli::config";
pub const TRACING_TARGET_COMMAND: &str = "essnap_cli::command";

#[tokio::main]
async fn main() {
    let Err(error) = run().await else {
        tracing::debug!(
            target: TRACING_TARGET_SHUTDOWN,
            "application terminated successfully"
        );
        process::exit(0);
    };

    if tracing::enabled!(tracing::Level::ERROR) {
        tracing::error!(
            target: TRACING_TARGET_SHUTDOWN,
            error = %format!("{error:#}"),
            "application terminated with error"
        );
    } else {
        eprintln!("Error: {error:#}");
    }

    process::exit(1);
}

/// Main application entry point.
async fn run() -> anyhow::Result<()> {
    let cli = Cli::init();

    telemetry::init_tracing()?;
    cli.log();

    let client = cli
        .create_client()
        .context("failed to create snapshot client")?;
    let response = cli
        .command
        .execute(&client)
        .await
        .with_context(|| format!("failed to {}", cli.command.describe()))?;

    print_response(&response).context("failed to write response")?;

    Ok(())
}

/// Prints the status code and the body verbatim to stdout.
fn print_response(response: &SnapshotResponse) -> std::io::Result<()> {
    let mut stdout = std::io::stdout().lock();
    writeln!(stdout, "{}", response.status_code)?;
    writeln!(stdout, "{}", response.body)?;
    stdout.flush()
}
