//! Snapshot client operations.

use std::fmt;
use std::sync::Arc;

use jiff::Timestamp;

use crate::{
    CredentialProvider, Error, RequestSigner, Result, SnapshotConfig, SnapshotRequest,
    SnapshotResponse, SnapshotService, TRACING_TARGET,
};

/// Path suffix of the snapshot status request.
const STATUS_SUFFIX: &str = "/_all?pretty";

/// Inner client that holds the configuration, credentials and transport.
struct SnapshotClientInner {
    config: SnapshotConfig,
    credentials: Box<dyn CredentialProvider>,
    service: SnapshotService,
}

/// Client for the snapshot API of a single repository.
///
/// Every operation builds its URL from the [`SnapshotConfig`], resolves
/// credentials from the [`CredentialProvider`], signs the request for the
/// `es` service and sends it once. Credentials are resolved again on every
/// call, so rotated credentials are picked up by the next operation.
///
/// # Examples
///
/// ```rust,ignore
/// use essnap_snapshot::reqwest::ReqwestClient;
/// use essnap_snapshot::{EnvironmentCredentials, SnapshotClient, SnapshotConfig};
///
/// let config = SnapshotConfig::new("https://es.example.com/", "backups")
///     .with_es_region("eu-west-1");
/// let client = SnapshotClient::new(
///     config,
///     EnvironmentCredentials,
///     ReqwestClient::with_defaults()?.into_service(),
/// );
///
/// let (status, body) = client.get_snapshot_status().await?.into_parts();
/// ```
#[derive(Clone)]
pub struct SnapshotClient {
    inner: Arc<SnapshotClientInner>,
}

impl fmt::Debug for SnapshotClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SnapshotClient")
            .field("config", &self.inner.config)
            .field("service", &self.inner.service)
            .finish_non_exhaustive()
    }
}

impl SnapshotClient {
    /// Creates a new snapshot client.
    pub fn new<C>(config: SnapshotConfig, credentials: C, service: SnapshotService) -> Self
    where
        C: CredentialProvider + 'static,
    {
        let missing = config.missing_settings();
        if !missing.is_empty() {
            tracing::warn!(
                target: TRACING_TARGET,
                missing = ?missing,
                "Snapshot configuration is incomplete, requests will likely be rejected"
            );
        }

        let inner = SnapshotClientInner {
            config,
            credentials: Box::new(credentials),
            service,
        };

        Self {
            inner: Arc::new(inner),
        }
    }

    /// Gets the client configuration.
    pub fn config(&self) -> &SnapshotConfig {
        &self.inner.config
    }

    /// Registers (or overwrites) the S3 snapshot repository.
    ///
    /// Issues `PUT <host>_snapshot/<repository>` with the
    /// [`RepositoryPayload`](crate::RepositoryPayload) built from the
    /// configuration as JSON body.
    pub async fn register(&self) -> Result<SnapshotResponse> {
        let config = self.config();
        let body = config.repository_payload().to_vec()?;
        let request = SnapshotRequest::put(&config.snapshot_url(""))?.with_body(body);

        tracing::info!(
            target: TRACING_TARGET,
            repository = %config.es_repository,
            bucket = %config.s3_bucket,
            "Registering snapshot repository"
        );

        self.send(request).await
    }

    /// Starts a snapshot called `name`.
    ///
    /// Issues `PUT <host>_snapshot/<repository>/<name>` with an empty body.
    ///
    /// # Errors
    ///
    /// Returns an [`InvalidInput`](crate::ErrorKind::InvalidInput) error,
    /// without sending anything, if `name` is empty, is `.` or `..`, or
    /// contains characters that would change the request path or query
    /// (`/`, `\`, `?`, `#`, `%`, whitespace or control characters).
    pub async fn take_snapshot(&self, name: &str) -> Result<SnapshotResponse> {
        validate_snapshot_name(name)?;

        let request = SnapshotRequest::put(&self.config().snapshot_url(&format!("/{name}")))?;

        tracing::info!(
            target: TRACING_TARGET,
            repository = %self.config().es_repository,
            snapshot = %name,
            "Taking snapshot"
        );

        self.send(request).await
    }

    /// Fetches the status of every snapshot in the repository.
    ///
    /// Issues `GET <host>_snapshot/<repository>/_all?pretty`.
    pub async fn get_snapshot_status(&self) -> Result<SnapshotResponse> {
        let request = SnapshotRequest::get(&self.config().snapshot_url(STATUS_SUFFIX))?;

        tracing::info!(
            target: TRACING_TARGET,
            repository = %self.config().es_repository,
            "Fetching snapshot status"
        );

        self.send(request).await
    }

    /// Signs the request with freshly resolved credentials and sends it.
    async fn send(&self, mut request: SnapshotRequest) -> Result<SnapshotResponse> {
        let signer = self.signer()?;
        signer.sign(&mut request, Timestamp::now())?;

        self.inner.service.execute(&request).await
    }

    /// Builds a signer from the current credentials.
    fn signer(&self) -> Result<RequestSigner> {
        let credentials = self.inner.credentials.credentials()?;

        tracing::debug!(
            target: TRACING_TARGET,
            access_key = %credentials.access_key_masked(),
            region = %self.config().es_region,
            has_session_token = credentials.session_token.is_some(),
            "Resolved signing credentials"
        );

        Ok(RequestSigner::new(credentials, &self.config().es_region))
    }
}

/// Rejects snapshot names that cannot be used verbatim as a path segment.
fn validate_snapshot_name(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(Error::invalid_input().with_message("Snapshot name cannot be empty"));
    }

    if name == "." || name == ".." {
        return Err(Error::invalid_input().with_message(format!(
            "Snapshot name '{name}' is not a valid path segment"
        )));
    }

    let unsafe_char = name.chars().find(|&c| is_path_breaking(c));

    match unsafe_char {
        Some(c) => Err(Error::invalid_input().with_message(format!(
            "Snapshot name '{name}' contains unsupported character {c:?}"
        ))),
        None => Ok(()),
    }
}

/// Returns whether `c` would end the path segment or alter the request.
fn is_path_breaking(c: char) -> bool {
    matches!(c, '/' | '\\' | '?' | '#' | '%') || c.is_whitespace() || c.is_control()
}
