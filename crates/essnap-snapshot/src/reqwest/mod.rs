//! Reqwest-based HTTP transport for snapshot requests.
//!
//! This module provides a reqwest-based implementation of the [`SnapshotProvider`] trait.
//!
//! # Example
//!
//! ```rust,ignore
//! use essnap_snapshot::reqwest::{ReqwestClient, ReqwestConfig};
//! use essnap_snapshot::SnapshotService;
//!
//! // Give each snapshot call up to 60 seconds
//! let config = ReqwestConfig {
//!     http_timeout: 60,
//!     ..Default::default()
//! };
//! let client = ReqwestClient::new(config)?;
//!
//! // Convert to a service for dependency injection
//! let service: SnapshotService = client.into_service();
//! ```
//!
//! [`SnapshotProvider`]: crate::SnapshotProvider

mod client;
mod config;
mod error;

pub use client::ReqwestClient;
pub use config::ReqwestConfig;
pub use error::{Error, Result};

/// Tracing target for reqwest client operations.
pub const TRACING_TARGET: &str = "essnap_snapshot::reqwest";
