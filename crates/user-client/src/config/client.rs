//! Top-level client configuration.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use super::channel::ChannelConfig;
use user_client_core::{ConfigBuilder, ConfigError};

/// Prefix for environment overrides, e.g. `USER_CLIENT__CALL_SHAPE=unary`.
pub const ENV_PREFIX: &str = "USER_CLIENT";

/// Which of the four service calls to demonstrate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CallShape {
    /// `AddUser`: one request, one response.
    Unary,
    /// `AddUserVerbose`: one request, a stream of responses.
    ServerStream,
    /// `AddUsers`: a stream of requests, one response.
    ClientStream,
    /// `AddUserStreamBoth`: both directions streaming.
    #[default]
    Bidi,
}

impl CallShape {
    pub const ALL: [CallShape; 4] = [
        Self::Unary,
        Self::ServerStream,
        Self::ClientStream,
        Self::Bidi,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Unary => "unary",
            Self::ServerStream => "server_stream",
            Self::ClientStream => "client_stream",
            Self::Bidi => "bidi",
        }
    }
}

impl fmt::Display for CallShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CallShape {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "unary" => Ok(Self::Unary),
            "server_stream" => Ok(Self::ServerStream),
            "client_stream" => Ok(Self::ClientStream),
            "bidi" | "bidirectional" => Ok(Self::Bidi),
            other => Err(ConfigError::Parse(format!("unknown call shape `{other}`"))),
        }
    }
}

/// Pacing for the request streams.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExchangeConfig {
    /// Delay between requests on the bidirectional stream.
    pub duplex_interval_ms: u64,
    /// Delay between requests on the client stream.
    pub upload_interval_ms: u64,
    /// Capacity of the outbound request channel.
    pub outbound_buffer: usize,
}

impl Default for ExchangeConfig {
    fn default() -> Self {
        Self {
            duplex_interval_ms: 2_000,
            upload_interval_ms: 3_000,
            outbound_buffer: 8,
        }
    }
}

impl ExchangeConfig {
    pub fn duplex_interval(&self) -> Duration {
        Duration::from_millis(self.duplex_interval_ms)
    }

    pub fn upload_interval(&self) -> Duration {
        Duration::from_millis(self.upload_interval_ms)
    }
}

/// Everything the `user-client` binary needs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    pub channel: ChannelConfig,
    pub call_shape: CallShape,
    pub exchange: ExchangeConfig,
}

impl ClientConfig {
    /// Create a new configuration builder.
    ///
    /// # Example
    ///
    /// ```ignore
    /// let config = ClientConfig::builder()
    ///     .with_dotenv()
    ///     .call_shape(CallShape::Unary)
    ///     .build()?;
    /// ```
    pub fn builder() -> ClientConfigBuilder {
        ClientConfigBuilder::new()
    }
}

/// Builder for [`ClientConfig`] with programmatic overrides.
///
/// Overrides are applied after file and environment sources.
pub struct ClientConfigBuilder {
    inner: ConfigBuilder,
    endpoint: Option<String>,
    call_shape: Option<CallShape>,
    duplex_interval_ms: Option<u64>,
    upload_interval_ms: Option<u64>,
}

impl Default for ClientConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ClientConfigBuilder {
    pub fn new() -> Self {
        Self {
            inner: ConfigBuilder::new().with_env_prefix(ENV_PREFIX),
            endpoint: None,
            call_shape: None,
            duplex_interval_ms: None,
            upload_interval_ms: None,
        }
    }

    /// Load environment variables from `.env` file.
    pub fn with_dotenv(mut self) -> Self {
        self.inner = self.inner.with_dotenv();
        self
    }

    /// Load a configuration file.
    pub fn with_config_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.inner = self.inner.with_config_file(path);
        self
    }

    /// Install the global subscriber from `LOG_FORMAT` and `RUST_LOG` while
    /// building, after `.env` files are loaded.
    #[cfg(feature = "tracing")]
    pub fn with_logging_from_env(mut self) -> Self {
        self.inner = self.inner.with_logging_from_env();
        self
    }

    /// Read environment overrides under a different prefix.
    pub fn with_env_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.inner = self.inner.with_env_prefix(prefix);
        self
    }

    /// Set the endpoint URL.
    pub fn endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    /// Set the call to demonstrate.
    pub fn call_shape(mut self, shape: CallShape) -> Self {
        self.call_shape = Some(shape);
        self
    }

    /// Set the delay between bidirectional requests.
    pub fn duplex_interval_ms(mut self, millis: u64) -> Self {
        self.duplex_interval_ms = Some(millis);
        self
    }

    /// Set the delay between client-stream requests.
    pub fn upload_interval_ms(mut self, millis: u64) -> Self {
        self.upload_interval_ms = Some(millis);
        self
    }

    /// Build the configuration.
    pub fn build(self) -> Result<ClientConfig, ConfigError> {
        let mut config: ClientConfig = self.inner.build()?;

        if let Some(endpoint) = self.endpoint {
            config.channel.endpoint = endpoint;
        }
        if let Some(shape) = self.call_shape {
            config.call_shape = shape;
        }
        if let Some(millis) = self.duplex_interval_ms {
            config.exchange.duplex_interval_ms = millis;
        }
        if let Some(millis) = self.upload_interval_ms {
            config.exchange.upload_interval_ms = millis;
        }

        if config.exchange.outbound_buffer == 0 {
            return Err(ConfigError::Parse(
                "exchange.outbound_buffer must be at least 1".to_string(),
            ));
        }

        Ok(config)
    }
}
