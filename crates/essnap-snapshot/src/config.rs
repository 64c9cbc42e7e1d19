//! Snapshot client configuration.

#[cfg(feature = "config")]
use clap::Args;
use serde::{Deserialize, Serialize};

use crate::payload::RepositoryPayload;

/// Builds the snapshot API URL for a repository.
///
/// The result is exactly `<host>_snapshot/<repository><suffix>`. Nothing is
/// escaped or normalized, so `host` must already end with `/` when the
/// server expects one.
///
/// # Examples
///
/// ```rust
/// use essnap_snapshot::build_snapshot_url;
///
/// let url = build_snapshot_url("https://es.example.com/", "backups", "/_all?pretty");
/// assert_eq!(url, "https://es.example.com/_snapshot/backups/_all?pretty");
/// ```
pub fn build_snapshot_url(host: &str, repository: &str, suffix: &str) -> String {
    let mut url = String::with_capacity(host.len() + repository.len() + suffix.len() + 10);
    url.push_str(host);
    url.push_str("_snapshot/");
    url.push_str(repository);
    url.push_str(suffix);
    url
}

/// Configuration for the snapshot client.
///
/// Values are read once by the invoker and passed to
/// [`SnapshotClient::new`](crate::SnapshotClient::new). Missing settings are
/// empty strings: nothing is validated locally, and an incomplete
/// configuration surfaces as a rejection from the cluster.
///
/// # Environment Variables
///
/// - `ES_HOST` - Elasticsearch endpoint, including the trailing `/`
/// - `ES_SNAPSHOT_REPOSITORY` - Snapshot repository name
/// - `ES_REGION` - Region the Elasticsearch domain is signed for
/// - `S3_BUCKET` - Bucket backing the repository
/// - `S3_REGION` - Region of the bucket
/// - `ROLE_ARN` - IAM role the cluster assumes to write to the bucket
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "config", derive(Args))]
pub struct SnapshotConfig {
    /// Elasticsearch endpoint URL (must end with `/`)
    #[cfg_attr(
        feature = "config",
        arg(long = "es-host", env = "ES_HOST", default_value = "")
    )]
    #[serde(default)]
    pub es_host: String,

    /// Snapshot repository name
    #[cfg_attr(
        feature = "config",
        arg(
            long = "es-repository",
            env = "ES_SNAPSHOT_REPOSITORY",
            default_value = ""
        )
    )]
    #[serde(default)]
    pub es_repository: String,

    /// Region used to sign requests to the Elasticsearch domain
    #[cfg_attr(
        feature = "config",
        arg(long = "es-region", env = "ES_REGION", default_value = "")
    )]
    #[serde(default)]
    pub es_region: String,

    /// S3 bucket backing the snapshot repository
    #[cfg_attr(
        feature = "config",
        arg(long = "s3-bucket", env = "S3_BUCKET", default_value = "")
    )]
    #[serde(default)]
    pub s3_bucket: String,

    /// Region of the S3 bucket
    #[cfg_attr(
        feature = "config",
        arg(long = "s3-region", env = "S3_REGION", default_value = "")
    )]
    #[serde(default)]
    pub s3_region: String,

    /// IAM role ARN the cluster assumes to access the bucket
    #[cfg_attr(
        feature = "config",
        arg(long = "role-arn", env = "ROLE_ARN", default_value = "")
    )]
    #[serde(default)]
    pub role_arn: String,
}

impl SnapshotConfig {
    /// Creates a configuration for the given endpoint and repository.
    pub fn new(es_host: impl Into<String>, es_repository: impl Into<String>) -> Self {
        Self {
            es_host: es_host.into(),
            es_repository: es_repository.into(),
            ..Default::default()
        }
    }

    /// Sets the signing region of the Elasticsearch domain.
    #[must_use]
    pub fn with_es_region(mut self, region: impl Into<String>) -> Self {
        self.es_region = region.into();
        self
    }

    /// Sets the bucket, bucket region and role ARN of the repository.
    #[must_use]
    pub fn with_bucket(
        mut self,
        bucket: impl Into<String>,
        region: impl Into<String>,
        role_arn: impl Into<String>,
    ) -> Self {
        self.s3_bucket = bucket.into();
        self.s3_region = region.into();
        self.role_arn = role_arn.into();
        self
    }

    /// Returns the snapshot API URL of the configured repository.
    pub fn snapshot_url(&self, suffix: &str) -> String {
        build_snapshot_url(&self.es_host, &self.es_repository, suffix)
    }

    /// Returns the repository registration payload for this configuration.
    pub fn repository_payload(&self) -> RepositoryPayload {
        RepositoryPayload::s3(&self.s3_bucket, &self.s3_region, &self.role_arn)
    }

    /// Returns the names of settings that are empty.
    ///
    /// Used for diagnostics only; an incomplete configuration is still usable.
    pub fn missing_settings(&self) -> Vec<&'static str> {
        [
            ("es_host", &self.es_host),
            ("es_repository", &self.es_repository),
            ("es_region", &self.es_region),
            ("s3_bucket", &self.s3_bucket),
            ("s3_region", &self.s3_region),
            ("role_arn", &self.role_arn),
        ]
        .into_iter()
        .filter(|(_, value)| value.is_empty())
        .map(|(name, _)| name)
        .collect()
    }
}
