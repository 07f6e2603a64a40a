//! `gilcat` — command-line client for the gilcat stray-cat tracker.
//!
//! # Usage
//!
//! ```
//! gilcat cats list --location mapo
//! gilcat cats nearby --lat 37.5665 --lng 126.9780 --radius 800
//! gilcat auth login --email me@example.com
//! gilcat community post "Found a new feeding spot behind the market"
//! ```

mod commands;
mod state;

use std::{sync::Arc, time::Duration};

use anyhow::{Context, Result};
use clap::Parser;
use commands::Command;
use gilcat_client::{ApiClient, ClientConfig, FileTokenStore};
use serde::Deserialize;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

// ─── CLI args ─────────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(name = "gilcat", about = "Community stray-cat tracker client")]
struct Args {
  /// Path to a TOML config file (api_url, timeout_ms, retry settings).
  #[arg(short, long, value_name = "FILE")]
  config: Option<std::path::PathBuf>,

  /// Base URL of the gilcat API.
  #[arg(long, env = "GILCAT_API_URL")]
  api_url: Option<String>,

  #[command(subcommand)]
  command: Command,
}

// ─── Config file ──────────────────────────────────────────────────────────────

/// Shape of the optional TOML config file.
#[derive(Deserialize, Default)]
struct ConfigFile {
  #[serde(default)]
  api_url:        String,
  timeout_ms:     Option<u64>,
  retry_attempts: Option<u32>,
  retry_delay_ms: Option<u64>,
}

// ─── Entry point ──────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::WARN.into())
        .from_env_lossy(),
    )
    .init();

  let args = Args::parse();

  // Load the config file if provided.
  let file_cfg: ConfigFile = if let Some(path) = &args.config {
    let raw = std::fs::read_to_string(path)
      .with_context(|| format!("reading config file {}", path.display()))?;
    toml::from_str(&raw).context("parsing config file")?
  } else {
    ConfigFile::default()
  };

  // CLI flags override the config file, which overrides defaults.
  let mut config = ClientConfig::default();
  if !file_cfg.api_url.is_empty() {
    config.base_url = file_cfg.api_url;
  }
  if let Some(ms) = file_cfg.timeout_ms {
    config.timeout = Duration::from_millis(ms);
  }
  if let Some(attempts) = file_cfg.retry_attempts {
    config.retry_attempts = attempts;
  }
  if let Some(ms) = file_cfg.retry_delay_ms {
    config.retry_delay = Duration::from_millis(ms);
  }
  if let Some(url) = args.api_url {
    config.base_url = url;
  }
  tracing::debug!(base_url = %config.base_url, "resolved client configuration");

  let tokens = Arc::new(FileTokenStore::new(state::token_path()?));
  let client = ApiClient::with_token_store(config, tokens)?;

  commands::run(&client, args.command).await
}
