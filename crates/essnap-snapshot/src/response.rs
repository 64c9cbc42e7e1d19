//! Snapshot response types.

use jiff::Timestamp;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Raw response of a snapshot API call.
///
/// A non-2xx status is not an error: it is returned verbatim like any other
/// response, and interpreting it is left to the caller.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SnapshotResponse {
    /// Request ID this response corresponds to.
    pub request_id: Uuid,
    /// HTTP status code returned by the cluster.
    pub status_code: u16,
    /// Response body as text.
    pub body: String,
    /// Timestamp when the request was initiated.
    pub started_at: Timestamp,
    /// Timestamp when the response was received.
    pub finished_at: Timestamp,
}

impl SnapshotResponse {
    /// Creates a new snapshot response.
    pub fn new(
        request_id: Uuid,
        status_code: u16,
        body: impl Into<String>,
        started_at: Timestamp,
    ) -> Self {
        Self {
            request_id,
            status_code,
            body: body.into(),
            started_at,
            finished_at: Timestamp::now(),
        }
    }

    /// Returns whether the cluster answered with a 2xx status code.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status_code)
    }

    /// Returns the `(status_code, body)` pair.
    pub fn into_parts(self) -> (u16, String) {
        (self.status_code, self.body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_response() {
        let request_id = Uuid::now_v7();
        let response = SnapshotResponse::new(request_id, 200, "{}", Timestamp::now());

        assert!(response.is_success());
        assert_eq!(response.request_id, request_id);
        assert_eq!(response.into_parts(), (200, "{}".to_owned()));
    }

    #[test]
    fn test_remote_rejection_is_plain_data() {
        let body = r#"{"error":"repository_missing_exception"}"#;
        let response = SnapshotResponse::new(Uuid::now_v7(), 404, body, Timestamp::now());

        assert!(!response.is_success());
        assert_eq!(response.status_code, 404);
        assert_eq!(response.body, body);
    }
}
