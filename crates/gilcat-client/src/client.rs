//! Transport core: authenticated, timeout-bounded, retried requests.
//!
//! Resource modules ([`crate::cats`], [`crate::auth`],
//! [`crate::community`]) stay thin — they build paths, query strings, and
//! bodies, then delegate to the generic verbs here. Each verb runs inside
//! the retry policy, and each attempt constructs fresh request state.

use std::{sync::Arc, time::Duration};

use reqwest::{Client, RequestBuilder};
use serde::{Serialize, de::DeserializeOwned};

use crate::{
  ClientConfig,
  envelope::Envelope,
  error::{Error, Result, classify_failure},
  retry::RetryPolicy,
  token::{MemoryTokenStore, TokenStore},
};

/// One file in a multipart upload.
#[derive(Debug, Clone)]
pub struct FilePart {
  pub file_name: String,
  pub mime_type: String,
  pub bytes:     Vec<u8>,
}

/// Async HTTP client for the gilcat REST API.
///
/// Cheap to clone — the inner [`reqwest::Client`] is `Arc`-based and the
/// token store is shared.
#[derive(Clone)]
pub struct ApiClient {
  http:   Client,
  config: ClientConfig,
  tokens: Arc<dyn TokenStore>,
  retry:  RetryPolicy,
}

impl ApiClient {
  /// Client with no token source; requests go out unauthenticated until
  /// [`ApiClient::with_token_store`] supplies one.
  pub fn new(config: ClientConfig) -> Result<Self> {
    Self::with_token_store(config, Arc::new(MemoryTokenStore::new()))
  }

  pub fn with_token_store(
    config: ClientConfig,
    tokens: Arc<dyn TokenStore>,
  ) -> Result<Self> {
    let http = Client::builder().build().map_err(Error::Network)?;
    let retry = RetryPolicy::new(config.retry_attempts, config.retry_delay);
    Ok(Self { http, config, tokens, retry })
  }

  pub fn config(&self) -> &ClientConfig {
    &self.config
  }

  fn url(&self, path: &str) -> String {
    format!("{}{}", self.config.base_url.trim_end_matches('/'), path)
  }

  // ── Generic verbs ─────────────────────────────────────────────────────────

  pub async fn get_json<T>(&self, path: &str, query: &[(&str, String)]) -> Result<T>
  where
    T: DeserializeOwned,
  {
    let url = self.url(path);
    self
      .execute(path, self.config.timeout, || {
        Ok(self.http.get(&url).query(query))
      })
      .await
  }

  pub async fn post_json<T, B>(&self, path: &str, body: &B) -> Result<T>
  where
    T: DeserializeOwned,
    B: Serialize + ?Sized,
  {
    let url = self.url(path);
    self
      .execute(path, self.config.timeout, || {
        Ok(self.http.post(&url).json(body))
      })
      .await
  }

  /// `POST` with no body, for toggle-style endpoints.
  pub async fn post_empty<T>(&self, path: &str) -> Result<T>
  where
    T: DeserializeOwned,
  {
    let url = self.url(path);
    self
      .execute(path, self.config.timeout, || Ok(self.http.post(&url)))
      .await
  }

  pub async fn put_json<T, B>(&self, path: &str, body: &B) -> Result<T>
  where
    T: DeserializeOwned,
    B: Serialize + ?Sized,
  {
    let url = self.url(path);
    self
      .execute(path, self.config.timeout, || {
        Ok(self.http.put(&url).json(body))
      })
      .await
  }

  pub async fn patch_json<T, B>(&self, path: &str, body: &B) -> Result<T>
  where
    T: DeserializeOwned,
    B: Serialize + ?Sized,
  {
    let url = self.url(path);
    self
      .execute(path, self.config.timeout, || {
        Ok(self.http.patch(&url).json(body))
      })
      .await
  }

  pub async fn delete_json<T>(&self, path: &str) -> Result<T>
  where
    T: DeserializeOwned,
  {
    let url = self.url(path);
    self
      .execute(path, self.config.timeout, || Ok(self.http.delete(&url)))
      .await
  }

  /// Multipart upload of `parts` under the given form field.
  ///
  /// No explicit `Content-Type` header — reqwest sets the multipart
  /// boundary. Uploads get twice the configured timeout to accommodate
  /// larger payloads.
  pub async fn upload_files<T>(
    &self,
    path: &str,
    field: &str,
    parts: &[FilePart],
  ) -> Result<T>
  where
    T: DeserializeOwned,
  {
    let url = self.url(path);
    let timeout = self.config.timeout * 2;
    self
      .execute(path, timeout, || {
        let mut form = reqwest::multipart::Form::new();
        for part in parts {
          let piece = reqwest::multipart::Part::bytes(part.bytes.clone())
            .file_name(part.file_name.clone())
            .mime_str(&part.mime_type)
            .map_err(Error::Network)?;
          form = form.part(field.to_string(), piece);
        }
        Ok(self.http.post(&url).multipart(form))
      })
      .await
  }

  // ── Dispatch ──────────────────────────────────────────────────────────────

  /// Run one logical call: retry loop around (build → authorise → send →
  /// classify → decode). `build` is invoked once per attempt so every
  /// retry starts from fresh request state.
  async fn execute<T>(
    &self,
    path: &str,
    timeout: Duration,
    build: impl Fn() -> Result<RequestBuilder>,
  ) -> Result<T>
  where
    T: DeserializeOwned,
  {
    self
      .retry
      .run(|| async {
        tracing::debug!(path, "dispatching request");

        let mut request = build()?.timeout(timeout);
        // The token is re-read every attempt; the store is the single
        // source of truth and this layer never writes it.
        if let Some(token) = self.tokens.token() {
          request = request.bearer_auth(token);
        }

        let response = request
          .send()
          .await
          .map_err(|e| classify_transport(e, timeout))?;
        let status = response.status();
        let body = response
          .text()
          .await
          .map_err(|e| classify_transport(e, timeout))?;

        if !status.is_success() {
          return Err(classify_failure(status.as_u16(), &body));
        }

        let envelope: Envelope<T> = serde_json::from_str(&body)?;
        if !envelope.success {
          return Err(Error::Api {
            message: envelope
              .message
              .unwrap_or_else(|| "request failed".to_string()),
          });
        }
        Ok(envelope.data)
      })
      .await
  }
}

/// Split transport failures into the timeout and network kinds.
fn classify_transport(e: reqwest::Error, timeout: Duration) -> Error {
  if e.is_timeout() {
    Error::Timeout { after: timeout }
  } else {
    Error::Network(e)
  }
}
