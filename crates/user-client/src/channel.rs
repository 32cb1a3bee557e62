//! Channel extension trait for the client.

use tonic::transport::{Channel, Endpoint};

use crate::config::ChannelConfig;
use crate::error::Error;

/// Build a plaintext endpoint from configuration.
fn build_endpoint(config: &ChannelConfig) -> Result<Endpoint, Error> {
    let mut endpoint = Endpoint::from_shared(config.endpoint.clone())
        .map_err(|e| Error::InvalidEndpoint(format!("{}: {}", config.endpoint, e)))?
        .connect_timeout(config.connect_timeout())
        .tcp_nodelay(config.tcp_nodelay)
        .tcp_keepalive(config.tcp_keepalive());

    if endpoint.uri().scheme_str() != Some("http") {
        return Err(Error::InvalidEndpoint(format!(
            "{}: only plaintext http:// endpoints are supported",
            config.endpoint
        )));
    }

    if let Some(timeout) = config.timeout() {
        endpoint = endpoint.timeout(timeout);
    }

    if let Some(interval) = config.http2_keepalive_interval() {
        endpoint = endpoint.http2_keep_alive_interval(interval);
    }

    if let Some(timeout) = config.http2_keepalive_timeout() {
        endpoint = endpoint.keep_alive_timeout(timeout);
    }

    if !config.user_agent.is_empty() {
        endpoint = endpoint
            .user_agent(config.user_agent.clone())
            .map_err(|e| Error::InvalidEndpoint(format!("user agent: {}", e)))?;
    }

    Ok(endpoint)
}

/// Extension trait for [`Channel`].
///
/// # Example
///
/// ```ignore
/// use user_client::{ChannelConfig, ChannelExt};
/// use tonic::transport::Channel;
///
/// let config = ChannelConfig::with_endpoint("http://localhost:50051");
/// let channel = Channel::connect(&config).await?;
/// ```
pub trait ChannelExt: Sized {
    /// Connect to the server now, failing if it is unreachable.
    fn connect(
        config: &ChannelConfig,
    ) -> impl std::future::Future<Output = Result<Channel, Error>> + Send;

    /// Create a channel that connects on its first request.
    fn connect_lazy(config: &ChannelConfig) -> Result<Channel, Error>;
}

impl ChannelExt for Channel {
    async fn connect(config: &ChannelConfig) -> Result<Channel, Error> {
        let endpoint = build_endpoint(config)?;
        tracing::debug!(endpoint = %config.endpoint, "Dialing user service");
        endpoint.connect().await.map_err(Error::from)
    }

    fn connect_lazy(config: &ChannelConfig) -> Result<Channel, Error> {
        let endpoint = build_endpoint(config)?;
        Ok(endpoint.connect_lazy())
    }
}
