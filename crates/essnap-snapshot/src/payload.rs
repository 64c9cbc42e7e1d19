//! Snapshot repository registration payload.

use serde::{Deserialize, Serialize};

/// Repository type registered by [`SnapshotClient::register`](crate::SnapshotClient::register).
pub const REPOSITORY_TYPE: &str = "s3";

/// Body of the repository registration request.
///
/// Serializes to `{"type":"s3","settings":{"bucket":..,"region":..,"role_arn":..}}`.
/// Field order is fixed, so identical configuration always yields
/// byte-identical JSON.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepositoryPayload {
    /// Repository type.
    #[serde(rename = "type")]
    pub kind: String,
    /// Storage location of the repository.
    pub settings: RepositorySettings,
}

/// Storage settings of an S3-backed repository.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepositorySettings {
    /// Bucket the snapshots are written to.
    pub bucket: String,
    /// Region of the bucket.
    pub region: String,
    /// IAM role the cluster assumes to access the bucket.
    pub role_arn: String,
}

impl RepositoryPayload {
    /// Creates an S3 repository payload.
    pub fn s3(
        bucket: impl Into<String>,
        region: impl Into<String>,
        role_arn: impl Into<String>,
    ) -> Self {
        Self {
            kind: REPOSITORY_TYPE.to_owned(),
            settings: RepositorySettings {
                bucket: bucket.into(),
                region: region.into(),
                role_arn: role_arn.into(),
            },
        }
    }

    /// Serializes the payload to JSON bytes.
    pub fn to_vec(&self) -> crate::Result<Vec<u8>> {
        Ok(serde_json::to_vec(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payload_shape() {
        let payload = RepositoryPayload::s3("bucket", "eu-west-1", "arn:aws:iam::1:role/r");
        let json = String::from_utf8(payload.to_vec().unwrap()).unwrap();

        assert_eq!(
            json,
            r#"{"type":"s3","settings":{"bucket":"bucket","region":"eu-west-1","role_arn":"arn:aws:iam::1:role/r"}}"#
        );
    }

    #[test]
    fn test_payload_with_empty_settings() {
        let payload = RepositoryPayload::s3("", "", "");
        let value: serde_json::Value = serde_json::from_slice(&payload.to_vec().unwrap()).unwrap();

        assert_eq!(value["type"], "s3");
        assert_eq!(value["settings"]["bucket"], "");
        assert_eq!(value["settings"]["role_arn"], "");
    }
}
