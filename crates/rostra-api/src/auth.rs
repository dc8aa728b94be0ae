//! Bearer-token authentication against an external identity provider.
//!
//! The provider issues and verifies tokens; Rostra only asks it who a token
//! belongs to and mirrors the answer into a local [`UserProfile`].

use std::{fmt, future::Future, time::Duration};

use axum::{
  extract::FromRequestParts,
  http::{HeaderMap, header, request::Parts},
};
use rostra_core::{
  store::DebateStore,
  user::{NewUserProfile, UserProfile},
};
use rostra_llm::{Complete, mask_secret};
use serde::Deserialize;
use thiserror::Error;
use uuid::Uuid;

use crate::{AppState, error::ApiError};

// ─── Identity ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, Deserialize)]
pub struct IdentityMetadata {
  pub full_name:  Option<String>,
  pub name:       Option<String>,
  pub avatar_url: Option<String>,
}

/// Who a verified token belongs to.
#[derive(Debug, Clone, Deserialize)]
pub struct Identity {
  #[serde(rename = "id")]
  pub user_id:  Uuid,
  pub email:    Option<String>,
  #[serde(default, rename = "user_metadata")]
  pub metadata: IdentityMetadata,
}

impl Identity {
  /// `full_name`, else `name`, else the local part of the email, else
  /// `"user"`.
  pub fn preferred_username(&self) -> String {
    let non_empty = |s: &Option<String>| {
      s.as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_owned)
    };
    non_empty(&self.metadata.full_name)
      .or_else(|| non_empty(&self.metadata.name))
      .or_else(|| {
        self
          .email
          .as_deref()
          .and_then(|e| e.split('@').next())
          .filter(|local| !local.is_empty())
          .map(str::to_owned)
      })
      .unwrap_or_else(|| "user".to_owned())
  }

  pub fn to_profile(&self) -> NewUserProfile {
    NewUserProfile {
      user_id:    self.user_id,
      username:   self.preferred_username(),
      email:      self.email.clone().unwrap_or_default(),
      avatar_url: self.metadata.avatar_url.clone(),
    }
  }
}

#[derive(Debug, Error)]
pub enum IdentityError {
  #[error("token rejected")]
  Rejected,

  #[error("identity provider unavailable: {0}")]
  Unavailable(String),

  #[error("identity provider misconfigured: {0}")]
  Misconfigured(String),
}

/// Resolves bearer tokens to identities.
pub trait IdentityProvider: Send + Sync {
  fn verify<'a>(
    &'a self,
    token: &'a str,
  ) -> impl Future<Output = Result<Identity, IdentityError>> + Send + 'a;
}

// ─── Hosted provider ─────────────────────────────────────────────────────────

#[derive(Clone, Default, Deserialize)]
pub struct IdentityConfig {
  /// Base URL of the provider, e.g. `https://project.example.co`.
  #[serde(default)]
  pub url:      String,
  /// Public API key sent alongside every verification request.
  #[serde(default)]
  pub anon_key: String,
}

impl fmt::Debug for IdentityConfig {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("IdentityConfig")
      .field("url", &self.url)
      .field("anon_key", &mask_secret(&self.anon_key))
      .finish()
  }
}

/// Verifies tokens with `GET {url}/auth/v1/user`.
pub struct HostedIdentity {
  config: IdentityConfig,
  http:   reqwest::Client,
}

impl HostedIdentity {
  pub fn new(config: IdentityConfig) -> Result<Self, IdentityError> {
    if config.url.trim().is_empty() {
      return Err(IdentityError::Misconfigured("identity.url is not set".into()));
    }
    let http = reqwest::Client::builder()
      .timeout(Duration::from_secs(10))
      .build()
      .map_err(|e| IdentityError::Misconfigured(e.to_string()))?;
    Ok(Self { config, http })
  }
}

impl IdentityProvider for HostedIdentity {
  async fn verify<'a>(&'a self, token: &'a str) -> Result<Identity, IdentityError> {
    let url = format!("{}/auth/v1/user", self.config.url.trim_end_matches('/'));
    let response = self
      .http
      .get(url)
      .header("apikey", &self.config.anon_key)
      .bearer_auth(token)
      .send()
      .await
      .map_err(|e| IdentityError::Unavailable(e.to_string()))?;

    let status = response.status();
    if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN {
      return Err(IdentityError::Rejected);
    }
    if !status.is_success() {
      return Err(IdentityError::Unavailable(format!("provider returned {status}")));
    }

    response
      .json::<Identity>()
      .await
      .map_err(|e| IdentityError::Unavailable(format!("unreadable user record: {e}")))
  }
}

// ─── Extractors ──────────────────────────────────────────────────────────────

/// The token from an `Authorization: Bearer …` header, if any.
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
  headers
    .get(header::AUTHORIZATION)?
    .to_str()
    .ok()?
    .strip_prefix("Bearer ")
    .map(str::trim)
    .filter(|t| !t.is_empty())
}

/// An authenticated caller with a local profile.
///
/// Extraction verifies the bearer token and creates the profile on first
/// sight. It rejects with 401 when the token is missing or not accepted, and
/// with 503 when the provider cannot be reached.
pub struct CurrentUser {
  pub identity: Identity,
  pub profile:  UserProfile,
}

/// Like [`CurrentUser`], but `None` instead of a rejection.
pub struct MaybeUser(pub Option<CurrentUser>);

async fn authenticate<S, M, I>(
  headers: &HeaderMap,
  state: &AppState<S, M, I>,
) -> Result<CurrentUser, ApiError>
where
  S: DebateStore,
  M: Complete,
  I: IdentityProvider,
{
  let token = bearer_token(headers).ok_or(ApiError::Unauthorized)?;
  let identity = state.identity.verify(token).await.map_err(|e| match &e {
    IdentityError::Rejected => {
      tracing::debug!("bearer token not accepted");
      ApiError::Unauthorized
    }
    IdentityError::Unavailable(_) | IdentityError::Misconfigured(_) => {
      tracing::warn!(error = %e, "could not verify bearer token");
      ApiError::Unavailable("identity provider unavailable".into())
    }
  })?;
  let profile = state
    .engine
    .store()
    .ensure_user_profile(identity.to_profile())
    .await
    .map_err(ApiError::store)?;
  Ok(CurrentUser { identity, profile })
}

impl<S, M, I> FromRequestParts<AppState<S, M, I>> for CurrentUser
where
  S: DebateStore + 'static,
  M: Complete + 'static,
  I: IdentityProvider + 'static,
{
  type Rejection = ApiError;

  async fn from_request_parts(
    parts: &mut Parts,
    state: &AppState<S, M, I>,
  ) -> Result<Self, Self::Rejection> {
    authenticate(&parts.headers, state).await
  }
}

impl<S, M, I> FromRequestParts<AppState<S, M, I>> for MaybeUser
where
  S: DebateStore + 'static,
  M: Complete + 'static,
  I: IdentityProvider + 'static,
{
  type Rejection = ApiError;

  async fn from_request_parts(
    parts: &mut Parts,
    state: &AppState<S, M, I>,
  ) -> Result<Self, Self::Rejection> {
    if bearer_token(&parts.headers).is_none() {
      return Ok(MaybeUser(None));
    }
    match authenticate(&parts.headers, state).await {
      Ok(user) => Ok(MaybeUser(Some(user))),
      Err(ApiError::Unauthorized) => Ok(MaybeUser(None)),
      Err(e) => Err(e),
    }
  }
}
