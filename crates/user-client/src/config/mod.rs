//! Configuration types for the client.

mod channel;
mod client;

pub use channel::{ChannelConfig, DEFAULT_ENDPOINT};
pub use client::{CallShape, ClientConfig, ClientConfigBuilder, ExchangeConfig, ENV_PREFIX};

// Re-export from core
pub use user_client_core::{ConfigBuilder, ConfigError};
