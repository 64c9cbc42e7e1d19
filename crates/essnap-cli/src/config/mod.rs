//! CLI configuration management.
//!
//! This module defines the complete CLI configuration hierarchy:
//!
//! ```text
//! Cli
//! ├── command: Command             # register | snapshot <NAME> | status
//! ├── snapshot: SnapshotConfig     # Endpoint, repository, bucket, role
//! ├── credentials: CredentialsConfig # Explicit AWS keys (optional)
//! └── http: ReqwestConfig          # Timeout, user agent
//! ```
//!
//! All configuration can be provided via CLI arguments or environment variables.
//! Use `--help` to see all available options.
//!
//! # Example
//!
//! ```bash
//! essnap --es-host "https://search-logs.eu-west-1.es.amazonaws.com/" \
//!     --es-repository backups --es-region eu-west-1 status
//!
//! # Or via environment variables
//! ES_HOST="https://..." ES_SNAPSHOT_REPOSITORY=backups essnap status
//! ```

mod credentials;

use std::process;

use anyhow::Context;
use clap::Parser;
pub use credentials::{CliCredentials, CredentialsConfig};
use essnap_snapshot::reqwest::{ReqwestClient, ReqwestConfig};
use essnap_snapshot::{SnapshotClient, SnapshotConfig};

use crate::command::Command;
use crate::{TRACING_TARGET_CONFIG, TRACING_TARGET_STARTUP};

/// Complete CLI configuration.
///
/// Combines all configuration groups for the snapshot client:
/// - [`SnapshotConfig`]: Elasticsearch endpoint and repository definition
/// - [`CredentialsConfig`]: Explicit AWS credentials
/// - [`ReqwestConfig`]: HTTP transport settings
#[derive(Debug, Clone, Parser)]
#[command(name = "essnap")]
#[command(about = "Manage Elasticsearch snapshot repositories on AWS")]
#[command(version)]
pub struct Cli {
    /// Operation to run.
    #[command(subcommand)]
    pub command: Command,

    /// Elasticsearch endpoint and repository configuration.
    #[clap(flatten)]
    pub snapshot: SnapshotConfig,

    /// AWS credentials configuration.
    #[clap(flatten)]
    pub credentials: CredentialsConfig,

    /// HTTP client configuration.
    #[clap(flatten)]
    pub http: ReqwestConfig,
}

impl Cli {
    /// Loads environment variables from .env file (if enabled) and parses CLI arguments.
    ///
    /// The .env file is loaded before clap parses arguments, so variables
    /// from it are used as defaults.
    pub fn init() -> Self {
        Self::load_dotenv();
        Self::parse()
    }

    /// Loads environment variables from .env file if the dotenv feature is enabled.
    #[cfg(feature = "dotenv")]
    fn load_dotenv() {
        if let Err(err) = dotenvy::dotenv()
            && !err.not_found()
        {
            eprintln!("Warning: failed to load .env file: {err}");
        }
    }

    /// No-op when dotenv feature is disabled.
    #[cfg(not(feature = "dotenv"))]
    fn load_dotenv() {}

    /// Creates the snapshot client described by this configuration.
    pub fn create_client(&self) -> anyhow::Result<SnapshotClient> {
        let http = ReqwestClient::new(self.http.clone()).context("failed to create HTTP client")?;

        Ok(SnapshotClient::new(
            self.snapshot.clone(),
            self.credentials.provider(),
            http.into_service(),
        ))
    }

    /// Logs build information at debug level.
    fn log_build_info() {
        tracing::debug!(
            target: TRACING_TARGET_STARTUP,
            version = env!("CARGO_PKG_VERSION"),
            pid = process::id(),
            arch = std::env::consts::ARCH,
            os = std::env::consts::OS,
            features = ?Self::enabled_features(),
            "Build information"
        );
    }

    /// Logs configuration at debug level (no sensitive information).
    pub fn log(&self) {
        Self::log_build_info();

        tracing::debug!(
            target: TRACING_TARGET_CONFIG,
            es_host = %self.snapshot.es_host,
            es_repository = %self.snapshot.es_repository,
            es_region = %self.snapshot.es_region,
            s3_bucket = %self.snapshot.s3_bucket,
            s3_region = %self.snapshot.s3_region,
            role_arn = %self.snapshot.role_arn,
            "Snapshot configuration"
        );

        tracing::debug!(
            target: TRACING_TARGET_CONFIG,
            explicit_credentials = self.credentials.is_explicit(),
            http_timeout_secs = self.http.timeout().as_secs(),
            user_agent = %self.http.user_agent_header(),
            "Client configuration"
        );
    }

    /// Returns a list of enabled compile-time features.
    fn enabled_features() -> Vec<&'static str> {
        [cfg!(feature = "dotenv").then_some("dotenv")]
            .into_iter()
            .flatten()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_snapshot_command() {
        let cli = Cli::try_parse_from([
            "essnap",
            "--es-host",
            "https://es.example.com/",
            "--es-repository",
            "backups",
            "--es-region",
            "eu-west-1",
            "--http-timeout",
            "10",
            "snapshot",
            "daily-2024-01-01",
        ])
        .unwrap();

        assert_eq!(
            cli.command,
            Command::Snapshot {
                name: "daily-2024-01-01".to_owned()
            }
        );
        assert_eq!(
            cli.snapshot.snapshot_url("/daily-2024-01-01"),
            "https://es.example.com/_snapshot/backups/daily-2024-01-01"
        );
        assert_eq!(cli.http.http_timeout, 10);
    }

    #[test]
    fn test_parse_register_and_status() {
        let cli = Cli::try_parse_from(["essnap", "--s3-bucket", "b", "register"]).unwrap();
        assert_eq!(cli.command, Command::Register);
        assert_eq!(cli.snapshot.repository_payload().settings.bucket, "b");

        let cli = Cli::try_parse_from(["essnap", "status"]).unwrap();
        assert_eq!(cli.command, Command::Status);
    }

    #[test]
    fn test_snapshot_requires_name() {
        assert!(Cli::try_parse_from(["essnap", "snapshot"]).is_err());
    }
}
