//! # user-client
//!
//! A tonic client that demonstrates the four gRPC call shapes against a
//! `UserService`: unary, server streaming, client streaming and
//! bidirectional streaming.
//!
//! ## Quick Start
//!
//! ```ignore
//! use user_client::{init_logging_from_env, CallShape, ClientConfig, ConsoleReporter, UserClient};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     init_logging_from_env();
//!
//!     let config = ClientConfig::builder()
//!         .with_dotenv()
//!         .endpoint("http://localhost:50051")
//!         .build()?;
//!
//!     let mut client = UserClient::connect(&config).await?;
//!     let summary = client.run(CallShape::Bidi, ConsoleReporter).await?;
//!     println!("{} sent, {} received", summary.sent, summary.received);
//!     Ok(())
//! }
//! ```
//!
//! The bidirectional call is driven by [`DuplexDriver`], which can also be
//! pointed at any other [`Inbound`] source.
//!
//! ## Features
//!
//! - `tracing` - Enable logging initialization (default)

mod channel;
mod client;
pub mod config;
mod duplex;
mod error;
mod interceptor;
mod report;
mod samples;

/// Generated protobuf types and service stubs for package `pb`.
pub mod pb {
    tonic::include_proto!("pb");
}

pub use channel::ChannelExt;
pub use client::UserClient;
pub use config::{
    CallShape, ChannelConfig, ClientConfig, ClientConfigBuilder, ConfigError, ExchangeConfig,
};
pub use duplex::{DuplexDriver, ExchangeSummary, Inbound};
pub use error::Error;
pub use interceptor::{RequestIdInterceptor, REQUEST_ID_HEADER};
pub use report::{received_line, sending_line, ConsoleReporter, Event, RecordingReporter, Reporter};
pub use samples::{sample_user, sample_users};

pub use tonic::{Code, Status};
pub use user_client_core::LogFormat;

#[cfg(feature = "tracing")]
pub use user_client_core::{init_logging, init_logging_from_env};
