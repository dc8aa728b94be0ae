//! Handlers for `/arguments/{id}` endpoints: votes, comments and explicit
//! re-verification.

use axum::{
  Json,
  extract::{Path, State},
  http::StatusCode,
  response::IntoResponse,
};
use rostra_core::{
  argument::Argument,
  engagement::{Comment, NewComment, VoteDirection, VoteTally},
  store::DebateStore,
};
use rostra_llm::Complete;
use serde::Deserialize;

use crate::{
  AppState,
  auth::{CurrentUser, IdentityProvider},
  error::ApiError,
  quota, require_argument,
};

// ─── Votes ────────────────────────────────────────────────────────────────────

/// `POST /arguments/{id}/upvote`
pub async fn upvote<S, M, I>(
  State(state): State<AppState<S, M, I>>,
  Path(id): Path<i64>,
  user: CurrentUser,
) -> Result<Json<VoteTally>, ApiError>
where
  S: DebateStore,
  M: Complete,
  I: IdentityProvider,
{
  vote(&state, id, &user, VoteDirection::Up).await
}

/// `POST /arguments/{id}/downvote`
pub async fn downvote<S, M, I>(
  State(state): State<AppState<S, M, I>>,
  Path(id): Path<i64>,
  user: CurrentUser,
) -> Result<Json<VoteTally>, ApiError>
where
  S: DebateStore,
  M: Complete,
  I: IdentityProvider,
{
  vote(&state, id, &user, VoteDirection::Down).await
}

/// Repeating a vote withdraws it; the opposite vote replaces it.
async fn vote<S, M, I>(
  state: &AppState<S, M, I>,
  argument_id: i64,
  user: &CurrentUser,
  direction: VoteDirection,
) -> Result<Json<VoteTally>, ApiError>
where
  S: DebateStore,
  M: Complete,
  I: IdentityProvider,
{
  let store = state.store().as_ref();
  require_argument(store, argument_id).await?;
  let tally = store
    .cast_vote(argument_id, user.profile.user_id, direction)
    .await
    .map_err(ApiError::store)?;
  Ok(Json(tally))
}

// ─── Re-verification ──────────────────────────────────────────────────────────

/// `POST /arguments/{id}/verify`
pub async fn verify<S, M, I>(
  State(state): State<AppState<S, M, I>>,
  Path(id): Path<i64>,
) -> Result<Json<Argument>, ApiError>
where
  S: DebateStore,
  M: Complete,
  I: IdentityProvider,
{
  let store = state.store().as_ref();
  quota::ensure_model_budget(store, &state.limits).await?;

  let result = state.engine.reverify_argument(id).await;
  quota::record_model_calls(store, quota::calls_made(&result)).await;
  Ok(Json(result?))
}

// ─── Comments ─────────────────────────────────────────────────────────────────

/// `GET /arguments/{id}/comments`
pub async fn comments<S, M, I>(
  State(state): State<AppState<S, M, I>>,
  Path(id): Path<i64>,
) -> Result<Json<Vec<Comment>>, ApiError>
where
  S: DebateStore,
  M: Complete,
  I: IdentityProvider,
{
  let store = state.store().as_ref();
  require_argument(store, id).await?;
  let comments = store.get_comments(id).await.map_err(ApiError::store)?;
  Ok(Json(comments))
}

#[derive(Debug, Deserialize)]
pub struct CommentBody {
  pub comment: String,
}

/// `POST /arguments/{id}/comment`
pub async fn comment<S, M, I>(
  State(state): State<AppState<S, M, I>>,
  Path(id): Path<i64>,
  user: CurrentUser,
  Json(body): Json<CommentBody>,
) -> Result<impl IntoResponse, ApiError>
where
  S: DebateStore,
  M: Complete,
  I: IdentityProvider,
{
  let text = body.comment.trim();
  if text.is_empty() {
    return Err(ApiError::BadRequest("comment must not be empty".into()));
  }

  let store = state.store().as_ref();
  require_argument(store, id).await?;
  let comment = store
    .create_comment(NewComment {
      argument_id: id,
      comment:     text.to_owned(),
      user_id:     Some(user.profile.user_id),
    })
    .await
    .map_err(ApiError::store)?;
  Ok((StatusCode::CREATED, Json(comment)))
}
