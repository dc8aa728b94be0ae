//! JSON REST API for Rostra.
//!
//! Exposes an axum [`Router`] over a [`DebateEngine`], an identity provider
//! and the usage limits. TLS and process setup are the binary's concern.
//!
//! # Mounting
//!
//! ```rust,ignore
//! let app = rostra_api::router(state).layer(cors);
//! ```

#![allow(async_fn_in_trait)]

pub mod arguments;
pub mod auth;
pub mod engagement;
pub mod error;
pub mod quota;
pub mod topics;
pub mod users;

#[cfg(test)]
mod tests;

use std::{path::PathBuf, sync::Arc};

use axum::{
  Json, Router,
  routing::{delete, get, post, put},
};
use rostra_core::{argument::Argument, store::DebateStore, topic::Topic};
use rostra_engine::DebateEngine;
use rostra_llm::{AnthropicConfig, Complete};
use serde::Deserialize;
use serde_json::{Value, json};
use tower_http::trace::TraceLayer;
use uuid::Uuid;

pub use auth::{CurrentUser, HostedIdentity, Identity, IdentityConfig, IdentityProvider, MaybeUser};
pub use error::ApiError;
pub use quota::Limits;

// ─── Configuration ────────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `rostra.toml` and
/// `ROSTRA_*` environment variables.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
  #[serde(default = "default_host")]
  pub host:         String,
  #[serde(default = "default_port")]
  pub port:         u16,
  #[serde(default = "default_store_path")]
  pub store_path:   PathBuf,
  /// Allowed browser origins. Empty allows none.
  #[serde(default)]
  pub cors_origins: Vec<String>,
  #[serde(default)]
  pub model:        AnthropicConfig,
  #[serde(default)]
  pub identity:     IdentityConfig,
  #[serde(default)]
  pub limits:       Limits,
}

fn default_host() -> String { "127.0.0.1".to_owned() }
fn default_port() -> u16 { 8000 }
fn default_store_path() -> PathBuf { PathBuf::from("rostra.db") }

// ─── Application state ────────────────────────────────────────────────────────

/// Shared state threaded through all axum handlers.
pub struct AppState<S, M, I> {
  pub engine:   DebateEngine<S, M>,
  pub identity: Arc<I>,
  pub limits:   Limits,
}

impl<S, M, I> Clone for AppState<S, M, I> {
  fn clone(&self) -> Self {
    Self {
      engine:   self.engine.clone(),
      identity: Arc::clone(&self.identity),
      limits:   self.limits,
    }
  }
}

impl<S: DebateStore, M: Complete, I> AppState<S, M, I> {
  pub fn store(&self) -> &Arc<S> { self.engine.store() }
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build the service router: a banner at `/` and the JSON API under `/api`.
pub fn router<S, M, I>(state: AppState<S, M, I>) -> Router
where
  S: DebateStore + 'static,
  M: Complete + 'static,
  I: IdentityProvider + 'static,
{
  let api = Router::new()
    // Topics
    .route(
      "/topics/validate-proposition",
      post(topics::validate_proposition::<S, M, I>),
    )
    .route("/topics", get(topics::list::<S, M, I>).post(topics::create::<S, M, I>))
    .route("/topics/{id}", get(topics::get_one::<S, M, I>))
    .route("/topics/{id}/generate-summary", post(topics::generate_summary::<S, M, I>))
    .route("/topics/{id}/verify-all", post(topics::verify_all::<S, M, I>))
    .route("/topics/{id}/matches", get(topics::matches::<S, M, I>))
    // Arguments
    .route(
      "/topics/{id}/arguments",
      get(arguments::list::<S, M, I>).post(arguments::create::<S, M, I>),
    )
    .route("/topics/{id}/arguments/verified", get(arguments::list_verified::<S, M, I>))
    .route("/topics/{id}/arguments/{argument_id}", put(arguments::update::<S, M, I>))
    // Engagement
    .route("/arguments/{id}/upvote", post(engagement::upvote::<S, M, I>))
    .route("/arguments/{id}/downvote", post(engagement::downvote::<S, M, I>))
    .route("/arguments/{id}/verify", post(engagement::verify::<S, M, I>))
    .route("/arguments/{id}/comments", get(engagement::comments::<S, M, I>))
    .route("/arguments/{id}/comment", post(engagement::comment::<S, M, I>))
    // Accounts
    .route("/auth/sync-profile", post(users::sync_profile::<S, M, I>))
    .route("/auth/me", get(users::me))
    .route("/auth/logout", post(users::logout))
    .route("/auth/account", delete(users::delete_account::<S, M, I>));

  Router::new()
    .route("/", get(banner))
    .nest("/api", api)
    .layer(TraceLayer::new_for_http())
    .with_state(state)
}

/// `GET /`
async fn banner() -> Json<Value> {
  Json(json!({
    "service": "rostra",
    "version": env!("CARGO_PKG_VERSION"),
    "status":  "ok",
  }))
}

// ─── Lookups ──────────────────────────────────────────────────────────────────

pub(crate) async fn require_topic<S: DebateStore>(
  store: &S,
  id: Uuid,
) -> Result<Topic, ApiError> {
  store
    .get_topic(id)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| ApiError::NotFound(format!("topic {id} not found")))
}

pub(crate) async fn require_argument<S: DebateStore>(
  store: &S,
  id: i64,
) -> Result<Argument, ApiError> {
  store
    .get_argument(id)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| ApiError::NotFound(format!("argument {id} not found")))
}
