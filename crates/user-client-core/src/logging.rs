//! Logging initialization.
//!
//! Logs go to stderr: stdout carries the exchange transcript.

use std::{env, fmt, str::FromStr};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

impl FromStr for LogFormat {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.trim().to_lowercase().as_str() {
            "json" => Self::Json,
            _ => Self::Text,
        })
    }
}

impl fmt::Display for LogFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text => f.write_str("text"),
            Self::Json => f.write_str("json"),
        }
    }
}

impl LogFormat {
    /// Read `LOG_FORMAT`, falling back to text.
    pub fn from_env() -> Self {
        env::var("LOG_FORMAT")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or_default()
    }
}

/// Install the global subscriber. `RUST_LOG` wins over `filter` when set.
///
/// Returns `false` if a subscriber was already installed.
#[cfg(feature = "tracing")]
pub fn init_logging(format: LogFormat, filter: &str) -> bool {
    use tracing_subscriber::{fmt, EnvFilter};

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    let result = match format {
        LogFormat::Text => fmt()
            .with_writer(std::io::stderr)
            .with_env_filter(env_filter)
            .try_init(),
        LogFormat::Json => fmt()
            .json()
            .with_current_span(false)
            .with_writer(std::io::stderr)
            .with_env_filter(env_filter)
            .try_init(),
    };

    result.is_ok()
}

#[cfg(feature = "tracing")]
pub fn init_logging_from_env() -> bool {
    init_logging(LogFormat::from_env(), "info")
}
