//! Error type for the user service client.

use tonic::Status;

/// Crate-level error type.
///
/// Clean end-of-stream is never an error; everything here aborts the
/// operation that produced it.
#[derive(Debug)]
pub enum Error {
    Config(user_client_core::ConfigError),
    InvalidEndpoint(String),
    Connection(String),
    /// The server rejected the call before any response arrived.
    Rpc(Status),
    /// The inbound stream failed with something other than end-of-stream.
    Receive(Status),
    /// A sender or receiver task ended without reporting a result.
    Exchange(String),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Config(e) => write!(f, "Configuration error: {}", e),
            Self::InvalidEndpoint(e) => write!(f, "Invalid endpoint: {}", e),
            Self::Connection(e) => write!(f, "Could not connect to gRPC server: {}", e),
            Self::Rpc(status) => write!(
                f,
                "Could not make gRPC request: {} ({:?})",
                status.message(),
                status.code()
            ),
            Self::Receive(status) => write!(
                f,
                "Error receiving data: {} ({:?})",
                status.message(),
                status.code()
            ),
            Self::Exchange(e) => write!(f, "Exchange task failed: {}", e),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Config(e) => Some(e),
            Self::Rpc(status) | Self::Receive(status) => Some(status),
            _ => None,
        }
    }
}

impl From<user_client_core::ConfigError> for Error {
    fn from(err: user_client_core::ConfigError) -> Self {
        Self::Config(err)
    }
}

impl From<tonic::transport::Error> for Error {
    fn from(err: tonic::transport::Error) -> Self {
        Self::Connection(err.to_string())
    }
}

impl From<tokio::task::JoinError> for Error {
    fn from(err: tokio::task::JoinError) -> Self {
        Self::Exchange(err.to_string())
    }
}
