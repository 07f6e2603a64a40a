//! Error taxonomy for the access layer.
//!
//! Every failure is classified once, at the transport boundary, into a
//! retryable or terminal kind; [`crate::retry::RetryPolicy`] consults the
//! classification instead of replaying blindly.

use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  /// The request exceeded its configured deadline. Always distinguishable
  /// from a server-returned failure.
  #[error("request timed out after {after:?}")]
  Timeout { after: Duration },

  /// A 4xx response carrying field-level validation messages.
  #[error("validation failed ({}): {}", .status, .messages.join("\n"))]
  Validation { status: u16, messages: Vec<String> },

  /// Any other non-2xx response, with a best-effort message from the
  /// body.
  #[error("server error ({status}): {message}")]
  Http { status: u16, message: String },

  /// Transport failure before any response (DNS, refused, offline).
  #[error("network error: {0}")]
  Network(#[source] reqwest::Error),

  /// A 2xx body that does not decode as the expected envelope.
  #[error("decoding response: {0}")]
  Decode(#[from] serde_json::Error),

  /// A 2xx envelope with `success: false`.
  #[error("api error: {message}")]
  Api { message: String },

  /// A draft rejected locally, before any request was made.
  #[error(transparent)]
  Draft(#[from] gilcat_core::Error),
}

impl Error {
  /// Whether replaying the request could plausibly succeed.
  ///
  /// Timeouts, transport failures, and 5xx responses are transient.
  /// Validation and other 4xx failures will never succeed on replay and
  /// are surfaced immediately, as are local and decode failures.
  pub fn is_retryable(&self) -> bool {
    match self {
      Error::Timeout { .. } | Error::Network(_) => true,
      Error::Http { status, .. } => *status >= 500,
      Error::Validation { .. }
      | Error::Decode(_)
      | Error::Api { .. }
      | Error::Draft(_) => false,
    }
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

// ─── Error-body decoding ─────────────────────────────────────────────────────

/// Best-effort shape of a non-2xx JSON body.
#[derive(Debug, Deserialize)]
struct ErrorBody {
  error:   Option<ErrorInfo>,
  message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorInfo {
  message: Option<String>,
  #[serde(default)]
  details: Vec<ErrorDetail>,
}

#[derive(Debug, Deserialize)]
struct ErrorDetail {
  message: String,
}

/// Turn a non-2xx status and raw body into the matching [`Error`].
///
/// Precedence: `error.details[]` on a 4xx becomes [`Error::Validation`];
/// otherwise `error.message`, then the top-level `message`, then the raw
/// text. The body is parsed as JSON at most once.
pub(crate) fn classify_failure(status: u16, body: &str) -> Error {
  if let Ok(parsed) = serde_json::from_str::<ErrorBody>(body) {
    if let Some(info) = parsed.error {
      if (400..500).contains(&status) && !info.details.is_empty() {
        return Error::Validation {
          status,
          messages: info.details.into_iter().map(|d| d.message).collect(),
        };
      }
      if !info.details.is_empty() {
        let message = info
          .details
          .into_iter()
          .map(|d| d.message)
          .collect::<Vec<_>>()
          .join("\n");
        return Error::Http { status, message };
      }
      if let Some(message) = info.message {
        return Error::Http { status, message };
      }
    }
    if let Some(message) = parsed.message {
      return Error::Http { status, message };
    }
  }
  let body = body.trim();
  let message = if body.is_empty() {
    "no response body".to_string()
  } else {
    body.to_string()
  };
  Error::Http { status, message }
}
