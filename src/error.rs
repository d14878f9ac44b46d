use std::fmt;

use crate::websocket::GraphqlError;

/// Result type for betwatch-rs operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for betwatch-rs
#[derive(Debug)]
pub enum Error {
    /// Invalid client configuration
    Config(String),

    /// Socket-level failure (I/O error, server close, failed dial)
    Transport(String),

    /// A frame that does not follow the graphql-transport-ws protocol
    Protocol(String),

    /// GraphQL errors reported by the server for a single operation
    Remote(Vec<GraphqlError>),

    /// A payload did not match the declared shape; `path` names the
    /// offending location
    Decode { path: String, message: String },

    /// The connection dropped and the automatic retry did not recover it
    ConnectionLost,

    /// The operation was cancelled by the caller or by client shutdown
    Cancelled,

    /// A configured deadline expired (which one is named)
    Timeout(&'static str),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Config(msg) => write!(f, "Configuration error: {}", msg),
            Error::Transport(msg) => write!(f, "Transport error: {}", msg),
            Error::Protocol(msg) => write!(f, "Protocol error: {}", msg),
            Error::Remote(errors) => {
                let messages: Vec<&str> = errors.iter().map(|e| e.message.as_str()).collect();
                write!(f, "Server error: {}", messages.join("; "))
            }
            Error::Decode { path, message } => {
                write!(f, "Decode error at `{}`: {}", path, message)
            }
            Error::ConnectionLost => write!(f, "Connection lost"),
            Error::Cancelled => write!(f, "Operation cancelled"),
            Error::Timeout(what) => write!(f, "Timed out waiting for {}", what),
        }
    }
}

impl std::error::Error for Error {}

impl From<tokio_tungstenite::tungstenite::Error> for Error {
    fn from(err: tokio_tungstenite::tungstenite::Error) -> Self {
        Error::Transport(err.to_string())
    }
}
