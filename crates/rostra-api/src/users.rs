//! Handlers for `/auth` endpoints.
//!
//! Sign-in happens at the identity provider; these only mirror its answer
//! into the local profile table.

use axum::{Json, extract::State};
use rostra_core::{store::DebateStore, user::UserProfile};
use rostra_llm::Complete;
use serde_json::{Value, json};

use crate::{
  AppState,
  auth::{CurrentUser, IdentityProvider, MaybeUser},
  error::ApiError,
};

/// `POST /auth/sync-profile`
pub async fn sync_profile<S, M, I>(
  State(state): State<AppState<S, M, I>>,
  user: CurrentUser,
) -> Result<Json<UserProfile>, ApiError>
where
  S: DebateStore,
  M: Complete,
  I: IdentityProvider,
{
  let profile = state
    .store()
    .sync_user_profile(user.identity.to_profile())
    .await
    .map_err(ApiError::store)?;
  Ok(Json(profile))
}

/// `GET /auth/me`
pub async fn me(user: CurrentUser) -> Json<UserProfile> {
  Json(user.profile)
}

/// `POST /auth/logout`
///
/// Tokens are revoked at the provider; this only acknowledges.
pub async fn logout(MaybeUser(user): MaybeUser) -> Json<Value> {
  if let Some(user) = user {
    tracing::debug!(user_id = %user.profile.user_id, "logout");
  }
  Json(json!({ "message": "Logged out" }))
}

/// `DELETE /auth/account`
pub async fn delete_account<S, M, I>(
  State(state): State<AppState<S, M, I>>,
  user: CurrentUser,
) -> Result<Json<Value>, ApiError>
where
  S: DebateStore,
  M: Complete,
  I: IdentityProvider,
{
  let user_id = user.profile.user_id;
  state.store().delete_user_profile(user_id).await.map_err(ApiError::store)?;
  tracing::info!(%user_id, "account deleted");
  Ok(Json(json!({ "message": "Account deleted" })))
}
