#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]

mod client;
mod config;
mod credentials;
mod payload;
mod request;
mod response;
mod service;
mod signer;

#[cfg(feature = "reqwest")]
#[cfg_attr(docsrs, doc(cfg(feature = "reqwest")))]
pub mod reqwest;

pub use client::SnapshotClient;
pub use config::{SnapshotConfig, build_snapshot_url};
pub use credentials::{
    AwsCredentials, CredentialProvider, EnvironmentCredentials, StaticCredentials,
};
pub use essnap_core::{Error, ErrorKind, Result};
pub use payload::{REPOSITORY_TYPE, RepositoryPayload, RepositorySettings};
pub use request::{CONTENT_TYPE_JSON, Method, SnapshotRequest};
pub use response::SnapshotResponse;
pub use service::SnapshotService;
pub use signer::{RequestSigner, SERVICE_NAME};

/// Tracing target for snapshot client operations.
pub const TRACING_TARGET: &str = "essnap_snapshot::client";

/// Core trait for issuing prepared snapshot requests.
///
/// Implementations send the request exactly as described: method, URL,
/// headers and body. A received response is `Ok` whatever its status code;
/// only failures to complete the exchange are errors.
#[async_trait::async_trait]
pub trait SnapshotProvider: Send + Sync {
    /// Sends the request and returns the raw status code and body.
    async fn execute(&self, request: &SnapshotRequest) -> Result<SnapshotResponse>;
}
