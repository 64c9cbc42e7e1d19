//! Snapshot subcommands.

use clap::Subcommand;
use essnap_snapshot::{Result, SnapshotClient, SnapshotResponse};

use crate::TRACING_TARGET_COMMAND;

/// Operation to run against the snapshot repository.
#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum Command {
    /// Register (or overwrite) the S3 snapshot repository.
    Register,

    /// Start a snapshot with the given name.
    Snapshot {
        /// Snapshot name, used verbatim as the last path segment.
        name: String,
    },

    /// Show the status of every snapshot in the repository.
    Status,
}

impl Command {
    /// Runs the operation and returns the raw response.
    pub async fn execute(&self, client: &SnapshotClient) -> Result<SnapshotResponse> {
        tracing::debug!(
            target: TRACING_TARGET_COMMAND,
            command = ?self,
            "Executing command"
        );

        let response = match self {
            Self::Register => client.register().await?,
            Self::Snapshot { name } => client.take_snapshot(name).await?,
            Self::Status => client.get_snapshot_status().await?,
        };

        tracing::info!(
            target: TRACING_TARGET_COMMAND,
            status_code = response.status_code,
            success = response.is_success(),
            "Command completed"
        );

        Ok(response)
    }

    /// Returns a short description for error context.
    pub fn describe(&self) -> String {
        match self {
            Self::Register => "register snapshot repository".to_owned(),
            Self::Snapshot { name } => format!("take snapshot '{name}'"),
            Self::Status => "get snapshot status".to_owned(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_describe() {
        assert_eq!(Command::Register.describe(), "register snapshot repository");
        assert_eq!(
            Command::Snapshot {
                name: "nightly".to_owned()
            }
            .describe(),
            "take snapshot 'nightly'"
        );
        assert_eq!(Command::Status.describe(), "get snapshot status");
    }
}
