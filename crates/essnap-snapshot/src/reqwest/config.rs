//! HTTP transport settings.

use std::time::Duration;

#[cfg(feature = "config")]
use clap::Args;
use reqwest::{Client, ClientBuilder};
use serde::{Deserialize, Serialize};

/// Seconds a snapshot call may take when no timeout is configured.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Settings of the HTTP client that talks to the Elasticsearch domain.
///
/// The timeout covers a whole snapshot call, from connecting to reading the
/// last byte of the response body. Zero selects [`DEFAULT_TIMEOUT_SECS`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "config", derive(Args))]
#[serde(default)]
pub struct ReqwestConfig {
    /// Seconds to wait for a snapshot call to complete
    #[cfg_attr(
        feature = "config",
        arg(long = "http-timeout", env = "HTTP_TIMEOUT", default_value = "30")
    )]
    pub http_timeout: u64,

    /// User-Agent sent to the cluster (defaults to essnap/<version>)
    #[cfg_attr(
        feature = "config",
        arg(long = "http-user-agent", env = "HTTP_USER_AGENT")
    )]
    pub user_agent: Option<String>,
}

impl Default for ReqwestConfig {
    fn default() -> Self {
        Self {
            http_timeout: DEFAULT_TIMEOUT_SECS,
            user_agent: None,
        }
    }
}

impl ReqwestConfig {
    /// Returns the timeout applied to every snapshot call.
    pub fn timeout(&self) -> Duration {
        match self.http_timeout {
            0 => Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            secs => Duration::from_secs(secs),
        }
    }

    /// Returns the `User-Agent` header value.
    pub fn user_agent_header(&self) -> String {
        match self.user_agent.as_deref() {
            Some(agent) if !agent.is_empty() => agent.to_owned(),
            _ => concat!("essnap/", env!("CARGO_PKG_VERSION")).to_owned(),
        }
    }

    /// Returns a client builder with these settings applied.
    pub(crate) fn client_builder(&self) -> ClientBuilder {
        Client::builder()
            .timeout(self.timeout())
            .user_agent(self.user_agent_header())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ReqwestConfig::default();

        assert_eq!(config.timeout(), Duration::from_secs(30));
        assert_eq!(
            config.user_agent_header(),
            format!("essnap/{}", env!("CARGO_PKG_VERSION"))
        );
    }

    #[test]
    fn test_zero_timeout_selects_default() {
        let config = ReqwestConfig {
            http_timeout: 0,
            user_agent: None,
        };

        assert_eq!(config.timeout(), Duration::from_secs(DEFAULT_TIMEOUT_SECS));
    }

    #[test]
    fn test_configured_values() {
        let config = ReqwestConfig {
            http_timeout: 5,
            user_agent: Some("snapshot-cron/2".to_owned()),
        };

        assert_eq!(config.timeout(), Duration::from_secs(5));
        assert_eq!(config.user_agent_header(), "snapshot-cron/2");
        assert!(config.client_builder().build().is_ok());
    }

    #[test]
    fn test_empty_user_agent_selects_default() {
        let config = ReqwestConfig {
            user_agent: Some(String::new()),
            ..Default::default()
        };

        assert!(config.user_agent_header().starts_with("essnap/"));
    }

    #[test]
    fn test_deserialize_fills_defaults() {
        let config: ReqwestConfig = serde_json::from_str(r#"{"http_timeout":10}"#).unwrap();

        assert_eq!(config.timeout(), Duration::from_secs(10));
        assert!(config.user_agent.is_none());
    }
}
