//! Error types for the Last.fm client and tool layer.

use thiserror::Error;

/// Main error type for all Last.fm operations.
#[derive(Debug, Error)]
pub enum LastFmError {
    /// Required configuration is missing or unusable (fatal at startup).
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// The upstream API answered with a failure status or an in-band error.
    #[error("Last.fm API error: {status} {message}")]
    Api { status: u16, message: String },

    /// A tool was called with missing or invalid parameters.
    #[error("{0}")]
    Validation(String),

    /// HTTP request failed before a response was received.
    #[error("Request error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Response body was not the JSON we expected.
    #[error("Parse error: {0}")]
    Decode(#[from] serde_json::Error),

    /// A lower-level failure annotated with the tool operation it aborted.
    #[error("{context}: {source}")]
    Operation {
        context: &'static str,
        #[source]
        source: Box<LastFmError>,
    },
}

impl LastFmError {
    /// Wrap this error with an operation-specific prefix.
    pub fn context(self, context: &'static str) -> Self {
        LastFmError::Operation {
            context,
            source: Box::new(self),
        }
    }

    /// HTTP status carried by an API error, looking through operation wrappers.
    pub fn status(&self) -> Option<u16> {
        match self {
            LastFmError::Api { status, .. } => Some(*status),
            LastFmError::Operation { source, .. } => source.status(),
            _ => None,
        }
    }
}

/// Result type alias for Last.fm operations.
pub type Result<T> = std::result::Result<T, LastFmError>;
