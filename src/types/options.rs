//! Client options and configuration
//!
//! This module contains the configuration for the optimizer client,
//! including a builder pattern for easy configuration.

use std::time::Duration;

use crate::error::{OptimizerError, Result};

/// Default server address (local development backend)
pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8000";

/// Default path of the streaming optimize endpoint
pub const DEFAULT_OPTIMIZE_PATH: &str = "/api/optimize";

/// Default path of the model status probe
pub const DEFAULT_STATUS_PATH: &str = "/api/check_keys";

/// Default maximum length of a single stream line (1MB)
pub const DEFAULT_MAX_LINE_BYTES: usize = 1024 * 1024;

/// Default capacity of the session update broadcast channel
pub const DEFAULT_UPDATE_CAPACITY: usize = 256;

/// Environment variable overriding the base URL
pub const BASE_URL_ENV: &str = "PROMPT_OPTIMIZER_URL";

// ============================================================================
// Client Options
// ============================================================================

/// Main options for the optimizer client
#[derive(Debug, Clone)]
pub struct ClientOptions {
    /// Server base URL without trailing slash
    pub base_url: String,
    /// Path of the optimize endpoint
    pub optimize_path: String,
    /// Path of the status probe endpoint
    pub status_path: String,
    /// Maximum bytes buffered for one line before it is discarded
    pub max_line_bytes: usize,
    /// Connect timeout for HTTP requests; the stream itself never times out
    pub connect_timeout: Option<Duration>,
    /// Capacity of the session update broadcast channel
    pub update_capacity: usize,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            optimize_path: DEFAULT_OPTIMIZE_PATH.to_string(),
            status_path: DEFAULT_STATUS_PATH.to_string(),
            max_line_bytes: DEFAULT_MAX_LINE_BYTES,
            connect_timeout: None,
            update_capacity: DEFAULT_UPDATE_CAPACITY,
        }
    }
}

impl ClientOptions {
    /// Create a new builder for `ClientOptions`
    #[must_use]
    pub fn builder() -> ClientOptionsBuilder {
        ClientOptionsBuilder::default()
    }

    /// Defaults, with the base URL taken from `PROMPT_OPTIMIZER_URL` if set
    #[must_use]
    pub fn from_env() -> Self {
        let mut builder = Self::builder();
        if let Ok(url) = std::env::var(BASE_URL_ENV)
            && !url.trim().is_empty()
        {
            builder = builder.base_url(url);
        }
        builder.build()
    }

    /// Full URL of the optimize endpoint
    #[must_use]
    pub fn optimize_url(&self) -> String {
        join_url(&self.base_url, &self.optimize_path)
    }

    /// Full URL of the status endpoint
    #[must_use]
    pub fn status_url(&self) -> String {
        join_url(&self.base_url, &self.status_path)
    }

    /// Check option values
    ///
    /// # Errors
    /// Returns `OptimizerError::InvalidConfig` if the base URL is not an
    /// http(s) URL or a size limit is zero
    pub fn validate(&self) -> Result<()> {
        let url = reqwest::Url::parse(&self.base_url).map_err(|e| {
            OptimizerError::invalid_config(format!("invalid base URL '{}': {e}", self.base_url))
        })?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(OptimizerError::invalid_config(format!(
                "unsupported URL scheme '{}'",
                url.scheme()
            )));
        }
        if self.max_line_bytes == 0 {
            return Err(OptimizerError::invalid_config("max_line_bytes must be non-zero"));
        }
        if self.update_capacity == 0 {
            return Err(OptimizerError::invalid_config("update_capacity must be non-zero"));
        }
        Ok(())
    }
}

fn join_url(base: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

// ============================================================================
// Builder for ClientOptions
// ============================================================================

/// Builder for `ClientOptions`
#[derive(Debug, Default)]
pub struct ClientOptionsBuilder {
    options: ClientOptions,
}

impl ClientOptionsBuilder {
    /// Set the server base URL
    #[must_use]
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.options.base_url = url.into();
        self
    }

    /// Set the optimize endpoint path
    #[must_use]
    pub fn optimize_path(mut self, path: impl Into<String>) -> Self {
        self.options.optimize_path = path.into();
        self
    }

    /// Set the status endpoint path
    #[must_use]
    pub fn status_path(mut self, path: impl Into<String>) -> Self {
        self.options.status_path = path.into();
        self
    }

    /// Set the maximum line length
    #[must_use]
    pub const fn max_line_bytes(mut self, bytes: usize) -> Self {
        self.options.max_line_bytes = bytes;
        self
    }

    /// Set the connect timeout
    #[must_use]
    pub const fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.options.connect_timeout = Some(timeout);
        self
    }

    /// Set the update channel capacity
    #[must_use]
    pub const fn update_capacity(mut self, capacity: usize) -> Self {
        self.options.update_capacity = capacity;
        self
    }

    /// Build the options
    #[must_use]
    pub fn build(self) -> ClientOptions {
        self.options
    }
}

