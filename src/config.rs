//! Process-wide configuration.
//!
//! Built once at startup and handed by value to the client and tool layer.

use crate::error::{LastFmError, Result};

/// Base URL for the Last.fm web service.
pub const DEFAULT_BASE_URL: &str = "https://ws.audioscrobbler.com/2.0/";

/// Immutable settings shared by [`LastFmApi`](crate::LastFmApi) and
/// [`LastFmTools`](crate::LastFmTools).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    api_key: String,
    default_username: Option<String>,
    base_url: String,
}

impl Config {
    /// Create a configuration from an API key.
    ///
    /// # Errors
    ///
    /// Returns `Configuration` if the key is empty.
    pub fn new<S: Into<String>>(api_key: S) -> Result<Self> {
        let api_key = api_key.into().trim().to_string();
        if api_key.is_empty() {
            return Err(LastFmError::Configuration(
                "LASTFM_API_KEY environment variable is required".to_string(),
            ));
        }

        Ok(Self {
            api_key,
            default_username: None,
            base_url: DEFAULT_BASE_URL.to_string(),
        })
    }

    /// Set the username used when a tool call omits one.
    ///
    /// Blank names count as unset.
    pub fn with_default_username(mut self, username: Option<String>) -> Self {
        self.default_username = username
            .map(|u| u.trim().to_string())
            .filter(|u| !u.is_empty());
        self
    }

    /// Point the client at a different endpoint.
    pub fn with_base_url<S: Into<String>>(mut self, base_url: S) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    pub fn default_username(&self) -> Option<&str> {
        self.default_username.as_deref()
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}
