//! gRPC client channel configuration.

use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const DEFAULT_ENDPOINT: &str = "http://localhost:50051";

/// Configuration for the client channel.
///
/// The channel is always plaintext HTTP/2.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChannelConfig {
    /// Service endpoint URL.
    pub endpoint: String,
    /// Connection timeout in seconds.
    pub connect_timeout_secs: u64,
    /// Per-call timeout in seconds. Unset means a stalled peer stalls the call.
    pub timeout_secs: Option<u64>,
    /// TCP keepalive interval in seconds.
    pub tcp_keepalive_secs: Option<u64>,
    /// Enable TCP nodelay.
    pub tcp_nodelay: bool,
    /// HTTP/2 keep-alive interval in seconds.
    pub http2_keepalive_interval_secs: Option<u64>,
    /// HTTP/2 keep-alive timeout in seconds.
    pub http2_keepalive_timeout_secs: Option<u64>,
    /// Value sent in the `user-agent` header.
    pub user_agent: String,
}

impl Default for ChannelConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            connect_timeout_secs: 10,
            timeout_secs: None,
            tcp_keepalive_secs: Some(60),
            tcp_nodelay: true,
            http2_keepalive_interval_secs: Some(30),
            http2_keepalive_timeout_secs: Some(20),
            user_agent: concat!("user-client/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

impl ChannelConfig {
    /// Default settings pointed at `endpoint`.
    pub fn with_endpoint(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            ..Default::default()
        }
    }

    /// Get the connection timeout duration.
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    /// Get the per-call timeout, if any.
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }

    /// Get the TCP keepalive duration.
    pub fn tcp_keepalive(&self) -> Option<Duration> {
        self.tcp_keepalive_secs.map(Duration::from_secs)
    }

    /// Get the HTTP/2 keep-alive interval.
    pub fn http2_keepalive_interval(&self) -> Option<Duration> {
        self.http2_keepalive_interval_secs.map(Duration::from_secs)
    }

    /// Get the HTTP/2 keep-alive timeout.
    pub fn http2_keepalive_timeout(&self) -> Option<Duration> {
        self.http2_keepalive_timeout_secs.map(Duration::from_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn channel_config_defaults() {
        let config = ChannelConfig::default();
        assert_eq!(config.endpoint, "http://localhost:50051");
        assert_eq!(config.connect_timeout_secs, 10);
        assert_eq!(config.timeout(), None);
        assert!(config.tcp_nodelay);
        assert!(config.user_agent.starts_with("user-client/"));
    }

    #[test]
    fn channel_config_durations() {
        let config = ChannelConfig {
            timeout_secs: Some(60),
            connect_timeout_secs: 15,
            ..Default::default()
        };
        assert_eq!(config.timeout(), Some(Duration::from_secs(60)));
        assert_eq!(config.connect_timeout(), Duration::from_secs(15));
    }

    #[test]
    fn channel_config_keepalive() {
        let config = ChannelConfig::default();
        assert_eq!(config.tcp_keepalive(), Some(Duration::from_secs(60)));
        assert_eq!(config.http2_keepalive_interval(), Some(Duration::from_secs(30)));
        assert_eq!(config.http2_keepalive_timeout(), Some(Duration::from_secs(20)));

        let config = ChannelConfig {
            tcp_keepalive_secs: None,
            ..Default::default()
        };
        assert_eq!(config.tcp_keepalive(), None);
    }

    #[test]
    fn with_endpoint_keeps_other_defaults() {
        let config = ChannelConfig::with_endpoint("http://127.0.0.1:9000");
        assert_eq!(config.endpoint, "http://127.0.0.1:9000");
        assert_eq!(config.connect_timeout_secs, ChannelConfig::default().connect_timeout_secs);
    }
}
