//! Async HTTP access layer for the gilcat REST API.
//!
//! Translates resource-level intents (list cats, toggle a like, upload
//! photos…) into authenticated, timeout-bounded, retried HTTP calls and
//! decodes the `{success, data, …}` response envelope into typed values at
//! the boundary. Nothing past this crate sees raw server shapes.
//!
//! Transient failures (timeouts, transport errors, 5xx) are retried with
//! exponential backoff; validation and other 4xx failures surface
//! immediately. See [`Error::is_retryable`].

pub mod auth;
pub mod cats;
pub mod client;
pub mod community;
pub mod envelope;
pub mod error;
pub mod retry;
pub mod token;

use std::time::Duration;

pub use client::{ApiClient, FilePart};
pub use error::{Error, Result};
pub use retry::RetryPolicy;
pub use token::{FileTokenStore, MemoryTokenStore, TokenStore};

/// Local development origin used when no base URL is configured.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8080/api";

/// Connection settings for the gilcat API.
#[derive(Debug, Clone)]
pub struct ClientConfig {
  /// Origin plus path prefix for every request.
  pub base_url:       String,
  /// Per-request abort deadline. Uploads get twice this.
  pub timeout:        Duration,
  /// Maximum attempts per call, counting the first.
  pub retry_attempts: u32,
  /// Base backoff unit; attempt n sleeps `retry_delay × 2^(n−1)`.
  pub retry_delay:    Duration,
}

impl Default for ClientConfig {
  fn default() -> Self {
    Self {
      base_url:       DEFAULT_BASE_URL.to_string(),
      timeout:        Duration::from_secs(10),
      retry_attempts: 3,
      retry_delay:    Duration::from_secs(1),
    }
  }
}

impl ClientConfig {
  /// Default configuration with the base URL taken from `GILCAT_API_URL`
  /// when that variable is set and non-empty.
  pub fn from_env() -> Self {
    let mut config = Self::default();
    if let Ok(url) = std::env::var("GILCAT_API_URL")
      && !url.is_empty()
    {
      config.base_url = url;
    }
    config
  }
}
