//! Auth endpoints.
//!
//! This layer only *consumes* the issued token (read through
//! [`crate::TokenStore`] on every request); persisting it after login and
//! clearing it after logout is the caller's job.

use serde::{Deserialize, Serialize};

use crate::{client::ApiClient, error::Result};

#[derive(Debug, Clone, Serialize)]
pub struct Credentials {
  pub email:    String,
  pub password: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct Registration {
  pub name:     String,
  pub email:    String,
  pub password: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct User {
  pub id:     String,
  pub name:   String,
  pub email:  String,
  #[serde(default)]
  pub avatar: Option<String>,
}

/// Payload of `POST /auth/login` and `POST /auth/register`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthSession {
  pub token:      String,
  /// Scheme for the `Authorization` header, normally `"Bearer"`.
  pub token_type: String,
  pub user:       User,
}

impl ApiClient {
  /// `POST /auth/login`
  pub async fn login(&self, credentials: &Credentials) -> Result<AuthSession> {
    self.post_json("/auth/login", credentials).await
  }

  /// `POST /auth/register`
  pub async fn register(&self, registration: &Registration) -> Result<AuthSession> {
    self.post_json("/auth/register", registration).await
  }

  /// `POST /auth/logout` — invalidates the server-side session for the
  /// current token.
  pub async fn logout(&self) -> Result<()> {
    self.post_empty("/auth/logout").await
  }

  /// `GET /auth/check` — the signed-in user for the current token.
  pub async fn check_auth(&self) -> Result<User> {
    self.get_json("/auth/check", &[]).await
  }
}
