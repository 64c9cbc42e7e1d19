//! AWS credentials and their providers.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::Result;

/// Environment variable holding the access key id.
const ENV_ACCESS_KEY_ID: &str = "AWS_ACCESS_KEY_ID";
/// Environment variable holding the secret access key.
const ENV_SECRET_ACCESS_KEY: &str = "AWS_SECRET_ACCESS_KEY";
/// Environment variable holding the session token of temporary credentials.
const ENV_SESSION_TOKEN: &str = "AWS_SESSION_TOKEN";

/// AWS credentials used to sign requests.
///
/// The secret key is never serialized and is masked in debug output.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AwsCredentials {
    /// Access key id.
    pub access_key_id: String,

    /// Secret access key.
    #[serde(skip_serializing, default)]
    pub secret_access_key: String,

    /// Optional session token for temporary credentials.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_token: Option<String>,
}

impl AwsCredentials {
    /// Creates credentials from an access key id and secret access key.
    pub fn new(access_key_id: impl Into<String>, secret_access_key: impl Into<String>) -> Self {
        Self {
            access_key_id: access_key_id.into(),
            secret_access_key: secret_access_key.into(),
            session_token: None,
        }
    }

    /// Sets the session token.
    #[must_use]
    pub fn with_session_token(mut self, session_token: impl Into<String>) -> Self {
        self.session_token = Some(session_token.into());
        self
    }

    /// Returns a masked version of the access key for logging.
    ///
    /// This shows only the first 4 characters followed by asterisks.
    pub fn access_key_masked(&self) -> String {
        match self.access_key_id.get(..4) {
            Some(prefix) if self.access_key_id.len() > 4 => format!("{prefix}***"),
            _ => "*".repeat(self.access_key_id.len()),
        }
    }
}

impl fmt::Debug for AwsCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AwsCredentials")
            .field("access_key_id", &self.access_key_masked())
            .field("has_session_token", &self.session_token.is_some())
            .finish_non_exhaustive()
    }
}

/// Resolves credentials at the time a request is signed.
///
/// [`SnapshotClient`](crate::SnapshotClient) calls the provider once per
/// operation and never caches the result.
pub trait CredentialProvider: Send + Sync {
    /// Returns the credentials to sign the next request with.
    fn credentials(&self) -> Result<AwsCredentials>;
}

/// Fixed credentials supplied by the caller.
#[derive(Debug, Clone, Default)]
pub struct StaticCredentials(AwsCredentials);

impl StaticCredentials {
    /// Wraps the given credentials.
    pub fn new(credentials: AwsCredentials) -> Self {
        Self(credentials)
    }
}

impl From<AwsCredentials> for StaticCredentials {
    fn from(credentials: AwsCredentials) -> Self {
        Self(credentials)
    }
}

impl CredentialProvider for StaticCredentials {
    fn credentials(&self) -> Result<AwsCredentials> {
        Ok(self.0.clone())
    }
}

/// Reads `AWS_ACCESS_KEY_ID`, `AWS_SECRET_ACCESS_KEY` and `AWS_SESSION_TOKEN`
/// from the process environment on every call.
///
/// Unset or non-unicode variables resolve to empty strings (no session token),
/// so incomplete credentials surface as a rejection from the cluster.
#[derive(Debug, Clone, Copy, Default)]
pub struct EnvironmentCredentials;

impl CredentialProvider for EnvironmentCredentials {
    fn credentials(&self) -> Result<AwsCredentials> {
        let read = |name: &str| std::env::var(name).unwrap_or_default();

        let credentials = AwsCredentials::new(read(ENV_ACCESS_KEY_ID), read(ENV_SECRET_ACCESS_KEY));
        let credentials = match std::env::var(ENV_SESSION_TOKEN) {
            Ok(token) if !token.is_empty() => credentials.with_session_token(token),
            _ => credentials,
        };

        Ok(credentials)
    }
}
