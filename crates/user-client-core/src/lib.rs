//! # user-client-core
//!
//! Shared plumbing for the user service client: layered configuration
//! loading and logging initialization.
//!
//! ## Features
//!
//! - `tracing` - Enable logging initialization with tracing-subscriber

mod config;
mod logging;

pub use config::{ConfigBuilder, ConfigError, ConfigFormat};
pub use logging::LogFormat;

#[cfg(feature = "tracing")]
pub use logging::{init_logging, init_logging_from_env};
