//! rostra server binary.
//!
//! Reads `rostra.toml` (or the path given with `--config`), layers `ROSTRA_*`
//! environment variables over it, opens the SQLite store and serves the JSON
//! API over HTTP.
//!
//! Nested keys use a double underscore in the environment, e.g.
//! `ROSTRA_MODEL__API_KEY` or `ROSTRA_LIMITS__API_CALL_LIMIT`.

use std::{
  path::{Path, PathBuf},
  sync::Arc,
};

use anyhow::Context as _;
use axum::http::HeaderValue;
use clap::Parser;
use rostra_api::{AppState, HostedIdentity, ServerConfig};
use rostra_engine::DebateEngine;
use rostra_llm::AnthropicClient;
use rostra_store_sqlite::SqliteStore;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "Rostra debate server")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "rostra.toml")]
  config: PathBuf,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  // Initialise tracing.
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();

  // Load configuration.
  let settings = config::Config::builder()
    .add_source(config::File::from(cli.config).required(false))
    .add_source(
      config::Environment::with_prefix("ROSTRA")
        .prefix_separator("_")
        .separator("__")
        .try_parsing(true),
    )
    .build()
    .context("failed to read configuration")?;

  let server_cfg: ServerConfig = settings
    .try_deserialize()
    .context("failed to deserialise ServerConfig")?;
  tracing::info!(
    model = ?server_cfg.model,
    identity = ?server_cfg.identity,
    limits = ?server_cfg.limits,
    "configuration loaded"
  );

  // Expand `~` in store path.
  let store_path = expand_tilde(&server_cfg.store_path);

  // Open SQLite store.
  let store = SqliteStore::open(&store_path)
    .await
    .with_context(|| format!("failed to open store at {store_path:?}"))?;

  let model =
    AnthropicClient::new(server_cfg.model.clone()).context("failed to build model client")?;
  let identity =
    HostedIdentity::new(server_cfg.identity.clone()).context("failed to build identity client")?;

  // Build application state.
  let state = AppState {
    engine:   DebateEngine::new(Arc::new(store), Arc::new(model)),
    identity: Arc::new(identity),
    limits:   server_cfg.limits,
  };

  let app = rostra_api::router(state).layer(cors_layer(&server_cfg.cors_origins)?);
  let address = format!("{}:{}", server_cfg.host, server_cfg.port);

  tracing::info!("Listening on http://{address}");
  let listener = TcpListener::bind(&address)
    .await
    .with_context(|| format!("failed to bind {address}"))?;

  axum::serve(listener, app).await.context("server error")?;

  Ok(())
}

/// Allow the configured origins with any method and header.
fn cors_layer(origins: &[String]) -> anyhow::Result<CorsLayer> {
  let origins = origins
    .iter()
    .map(|o| HeaderValue::from_str(o).with_context(|| format!("invalid CORS origin {o:?}")))
    .collect::<anyhow::Result<Vec<_>>>()?;
  Ok(
    CorsLayer::new()
      .allow_origin(origins)
      .allow_methods(Any)
      .allow_headers(Any),
  )
}

/// Expand a leading `~` to the user's home directory.
fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path.to_path_buf()
}
