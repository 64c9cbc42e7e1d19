//! Reqwest-based HTTP client for snapshot requests.

use std::sync::Arc;

use jiff::Timestamp;
use reqwest::Client;
use reqwest::header::CONTENT_LENGTH;

use super::{Error, ReqwestConfig, Result, TRACING_TARGET};
use crate::{Method, SnapshotProvider, SnapshotRequest, SnapshotResponse, SnapshotService};

/// Inner client that holds the HTTP client and configuration.
struct ReqwestClientInner {
    http: Client,
    config: ReqwestConfig,
}

/// Reqwest-based HTTP client that sends prepared snapshot requests.
///
/// The request is sent as described: method, URL, every header (including
/// the signature headers) and body are copied verbatim.
#[derive(Clone)]
pub struct ReqwestClient {
    inner: Arc<ReqwestClientInner>,
}

impl std::fmt::Debug for ReqwestClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReqwestClient")
            .field("config", &self.inner.config)
            .finish_non_exhaustive()
    }
}

impl ReqwestClient {
    /// Creates a new reqwest client with the given configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be created.
    pub fn new(config: ReqwestConfig) -> Result<Self> {
        tracing::debug!(
            target: TRACING_TARGET,
            timeout_ms = config.timeout().as_millis(),
            user_agent = %config.user_agent_header(),
            "Creating reqwest client"
        );

        let http = config.client_builder().build()?;

        let inner = ReqwestClientInner { http, config };
        Ok(Self {
            inner: Arc::new(inner),
        })
    }

    /// Creates a new reqwest client with default configuration.
    pub fn with_defaults() -> Result<Self> {
        Self::new(ReqwestConfig::default())
    }

    /// Gets the client configuration.
    pub fn config(&self) -> &ReqwestConfig {
        &self.inner.config
    }

    /// Converts this client into a [`SnapshotService`] for use with dependency injection.
    pub fn into_service(self) -> SnapshotService {
        SnapshotService::new(self)
    }
}

#[async_trait::async_trait]
impl SnapshotProvider for ReqwestClient {
    async fn execute(&self, request: &SnapshotRequest) -> crate::Result<SnapshotResponse> {
        let started_at = Timestamp::now();

        let method = match request.method {
            Method::Get => reqwest::Method::GET,
            Method::Put => reqwest::Method::PUT,
        };

        let mut http_request = self.inner.http.request(method, request.url.clone());

        for (name, value) in &request.headers {
            http_request = http_request.header(name, value);
        }

        // Bodiless PUTs still carry `content-length: 0`.
        if request.method == Method::Put && request.body.is_empty() {
            http_request = http_request.header(CONTENT_LENGTH, "0");
        }

        let http_request = http_request.body(request.body.clone());

        let http_response = http_request.send().await.map_err(Error::from)?;
        let status_code = http_response.status().as_u16();
        let body = http_response.text().await.map_err(Error::from)?;

        tracing::debug!(
            target: TRACING_TARGET,
            request_id = %request.request_id,
            status_code,
            body_len = body.len(),
            "Snapshot response received"
        );

        Ok(SnapshotResponse::new(
            request.request_id,
            status_code,
            body,
            started_at,
        ))
    }
}
