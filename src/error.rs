//! Error types for the prompt optimizer client

use thiserror::Error;

/// Main error type for the prompt optimizer client
#[derive(Error, Debug)]
pub enum OptimizerError {
    /// The request could not be issued or the body could not be read
    #[error("Transport error: {0}")]
    Transport(String),

    /// Underlying HTTP client error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The server answered with a non-success status
    #[error("HTTP status {status}: {body}")]
    HttpStatus {
        /// Numeric status code
        status: u16,
        /// Response body, possibly empty
        body: String,
    },

    /// A response body that is not the expected JSON document
    #[error("JSON decode error: {0}")]
    JsonDecode(#[from] serde_json::Error),

    /// A stream line that is not a valid event
    #[error("Protocol error: {message}")]
    Protocol {
        /// Error message
        message: String,
        /// The offending line
        line: String,
    },

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Result type alias for optimizer client operations
pub type Result<T> = std::result::Result<T, OptimizerError>;

impl OptimizerError {
    /// Create a transport error
    pub fn transport(msg: impl Into<String>) -> Self {
        Self::Transport(msg.into())
    }

    /// Create an HTTP status error
    pub fn http_status(status: u16, body: impl Into<String>) -> Self {
        Self::HttpStatus {
            status,
            body: body.into(),
        }
    }

    /// Create a protocol error for a malformed line
    pub fn protocol(msg: impl Into<String>, line: impl Into<String>) -> Self {
        Self::Protocol {
            message: msg.into(),
            line: line.into(),
        }
    }

    /// Create an invalid configuration error
    pub fn invalid_config(msg: impl Into<String>) -> Self {
        Self::InvalidConfig(msg.into())
    }

    /// Whether this error ends the current session
    ///
    /// Protocol and decode errors are recovered line by line; everything
    /// that comes out of the transport is fatal.
    #[must_use]
    pub const fn is_fatal(&self) -> bool {
        !matches!(self, Self::Protocol { .. } | Self::JsonDecode(_))
    }
}
