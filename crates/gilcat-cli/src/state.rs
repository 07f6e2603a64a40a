//! CLI-owned persistent state: the auth token and the recent-search ring.
//!
//! The access layer only ever reads the token (through
//! [`gilcat_client::FileTokenStore`]); these helpers are the one place
//! that writes it.

use std::path::PathBuf;

use anyhow::{Context, Result};
use gilcat_core::recent::RecentSearches;

const RECENT_CAPACITY: usize = 10;

/// Directory for gilcat state files: `$GILCAT_STATE_DIR` when set, else
/// `~/.config/gilcat`.
pub fn state_dir() -> Result<PathBuf> {
  if let Ok(dir) = std::env::var("GILCAT_STATE_DIR")
    && !dir.is_empty()
  {
    return Ok(PathBuf::from(dir));
  }
  let home = std::env::var("HOME").context("HOME is not set")?;
  Ok(PathBuf::from(home).join(".config").join("gilcat"))
}

pub fn token_path() -> Result<PathBuf> {
  Ok(state_dir()?.join("token"))
}

pub fn save_token(token: &str) -> Result<()> {
  let path = token_path()?;
  if let Some(parent) = path.parent() {
    std::fs::create_dir_all(parent)
      .with_context(|| format!("creating {}", parent.display()))?;
  }
  std::fs::write(&path, token)
    .with_context(|| format!("writing {}", path.display()))
}

pub fn clear_token() -> Result<()> {
  match std::fs::remove_file(token_path()?) {
    Ok(()) => Ok(()),
    Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
    Err(e) => Err(e).context("removing token file"),
  }
}

fn recent_path() -> Result<PathBuf> {
  Ok(state_dir()?.join("recent-searches.json"))
}

/// Load the persisted search history; unreadable state starts fresh.
pub fn load_recent() -> RecentSearches {
  let Ok(path) = recent_path() else {
    return RecentSearches::new(RECENT_CAPACITY);
  };
  std::fs::read_to_string(path)
    .ok()
    .and_then(|raw| serde_json::from_str(&raw).ok())
    .unwrap_or_else(|| RecentSearches::new(RECENT_CAPACITY))
}

pub fn save_recent(recent: &RecentSearches) -> Result<()> {
  let path = recent_path()?;
  if let Some(parent) = path.parent() {
    std::fs::create_dir_all(parent)
      .with_context(|| format!("creating {}", parent.display()))?;
  }
  let raw =
    serde_json::to_string(recent).context("serialising search history")?;
  std::fs::write(&path, raw)
    .with_context(|| format!("writing {}", path.display()))
}
