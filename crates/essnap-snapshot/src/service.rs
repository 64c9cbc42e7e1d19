//! Snapshot service wrapper.

use std::fmt;
use std::sync::Arc;
use std::time::Instant;

use crate::{Result, SnapshotProvider, SnapshotRequest, SnapshotResponse};

/// Tracing target for snapshot transport operations.
const TRACING_TARGET: &str = "essnap_snapshot::service";

/// Cloneable handle over a [`SnapshotProvider`] with structured logging.
#[derive(Clone)]
pub struct SnapshotService {
    inner: Arc<dyn SnapshotProvider>,
}

impl fmt::Debug for SnapshotService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SnapshotService").finish_non_exhaustive()
    }
}

impl SnapshotService {
    /// Create a new snapshot service wrapper.
    pub fn new<P>(provider: P) -> Self
    where
        P: SnapshotProvider + 'static,
    {
        Self {
            inner: Arc::new(provider),
        }
    }

    /// Sends a prepared request through the underlying provider.
    pub async fn execute(&self, request: &SnapshotRequest) -> Result<SnapshotResponse> {
        let started_at = Instant::now();

        tracing::debug!(
            target: TRACING_TARGET,
            request_id = %request.request_id,
            method = %request.method,
            url = %request.url,
            body_len = request.body.len(),
            "Sending snapshot request"
        );

        let result = self.inner.execute(request).await;
        let elapsed = started_at.elapsed();

        match &result {
            Ok(response) if response.is_success() => {
                tracing::debug!(
                    target: TRACING_TARGET,
                    request_id = %request.request_id,
                    status_code = response.status_code,
                    elapsed_ms = elapsed.as_millis(),
                    "Snapshot request completed"
                );
            }
            Ok(response) => {
                tracing::warn!(
                    target: TRACING_TARGET,
                    request_id = %request.request_id,
                    status_code = response.status_code,
                    elapsed_ms = elapsed.as_millis(),
                    "Snapshot request rejected by cluster"
                );
            }
            Err(error) => {
                tracing::error!(
                    target: TRACING_TARGET,
                    request_id = %request.request_id,
                    error = %error,
                    elapsed_ms = elapsed.as_millis(),
                    "Snapshot request failed"
                );
            }
        }

        result
    }
}
