//! Read-only bearer-token source for the access layer.
//!
//! The layer reads the token on every request and never writes it: the
//! auth flow (the CLI's `auth` commands, or whatever embeds the client)
//! owns writes and clears.

use std::{
  path::{Path, PathBuf},
  sync::Mutex,
};

pub trait TokenStore: Send + Sync {
  /// The current bearer token, if any.
  fn token(&self) -> Option<String>;
}

// ─── In-process store ────────────────────────────────────────────────────────

/// In-process store for tests and for callers that drive the auth flow
/// themselves.
#[derive(Debug, Default)]
pub struct MemoryTokenStore {
  token: Mutex<Option<String>>,
}

impl MemoryTokenStore {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn set(&self, token: impl Into<String>) {
    *self.lock() = Some(token.into());
  }

  pub fn clear(&self) {
    *self.lock() = None;
  }

  fn lock(&self) -> std::sync::MutexGuard<'_, Option<String>> {
    // A poisoned lock only means a panic elsewhere; the token itself is
    // still usable.
    self
      .token
      .lock()
      .unwrap_or_else(std::sync::PoisonError::into_inner)
  }
}

impl TokenStore for MemoryTokenStore {
  fn token(&self) -> Option<String> {
    self.lock().clone()
  }
}

// ─── File-backed store ───────────────────────────────────────────────────────

/// Reads the token from a file (the CLI keeps one under
/// `~/.config/gilcat/token`). A missing or empty file means "not signed
/// in". The file is read on every request, so an external login or logout
/// takes effect immediately.
#[derive(Debug, Clone)]
pub struct FileTokenStore {
  path: PathBuf,
}

impl FileTokenStore {
  pub fn new(path: impl Into<PathBuf>) -> Self {
    Self { path: path.into() }
  }

  pub fn path(&self) -> &Path {
    &self.path
  }
}

impl TokenStore for FileTokenStore {
  fn token(&self) -> Option<String> {
    let raw = std::fs::read_to_string(&self.path).ok()?;
    let trimmed = raw.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn memory_store_set_and_clear() {
    let store = MemoryTokenStore::new();
    assert!(store.token().is_none());

    store.set("tok-1");
    assert_eq!(store.token().as_deref(), Some("tok-1"));

    store.clear();
    assert!(store.token().is_none());
  }

  #[test]
  fn file_store_missing_file_is_signed_out() {
    let store = FileTokenStore::new("/nonexistent/gilcat/token");
    assert!(store.token().is_none());
  }

  #[test]
  fn file_store_trims_and_ignores_blank() {
    let dir = std::env::temp_dir().join("gilcat-token-test");
    std::fs::create_dir_all(&dir).unwrap();

    let path = dir.join("token");
    std::fs::write(&path, "  tok-2\n").unwrap();
    let store = FileTokenStore::new(&path);
    assert_eq!(store.token().as_deref(), Some("tok-2"));

    std::fs::write(&path, "\n").unwrap();
    assert!(store.token().is_none());
  }
}
