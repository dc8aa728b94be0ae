//! Handlers for `/topics/{id}/arguments` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/topics/{id}/arguments` | Optional `?side=pro\|con\|both`, oldest first |
//! | `GET`  | `/topics/{id}/arguments/verified` | Verified only, highest score first |
//! | `POST` | `/topics/{id}/arguments` | Auth. Fact-checked before it is stored |
//! | `PUT`  | `/topics/{id}/arguments/{argument_id}` | Auth. Author only |

use axum::{
  Json,
  extract::{Path, Query, State},
  http::StatusCode,
  response::IntoResponse,
};
use rostra_core::{
  argument::{Argument, ArgumentEdit, ArgumentOrder, NewArgument, Side},
  store::DebateStore,
};
use rostra_llm::Complete;
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

use crate::{
  AppState,
  auth::{CurrentUser, IdentityProvider},
  error::ApiError,
  quota, require_argument, require_topic,
};

// ─── List ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ListParams {
  pub side: Option<String>,
}

impl ListParams {
  /// `None` means both sides.
  fn side(&self) -> Result<Option<Side>, ApiError> {
    match self.side.as_deref().map(str::trim) {
      None | Some("") | Some("both") => Ok(None),
      Some(s) => Side::parse(s)
        .map(Some)
        .map_err(|_| ApiError::BadRequest(format!("side must be pro, con or both, got {s:?}"))),
    }
  }
}

/// `GET /topics/{id}/arguments[?side=<side>]`
pub async fn list<S, M, I>(
  State(state): State<AppState<S, M, I>>,
  Path(id): Path<Uuid>,
  Query(params): Query<ListParams>,
) -> Result<Json<Vec<Argument>>, ApiError>
where
  S: DebateStore,
  M: Complete,
  I: IdentityProvider,
{
  let side = params.side()?;
  let store = state.store().as_ref();
  require_topic(store, id).await?;
  let arguments = store
    .get_arguments(id, side, ArgumentOrder::Chronological)
    .await
    .map_err(ApiError::store)?;
  Ok(Json(arguments))
}

/// `GET /topics/{id}/arguments/verified[?side=<side>]`
pub async fn list_verified<S, M, I>(
  State(state): State<AppState<S, M, I>>,
  Path(id): Path<Uuid>,
  Query(params): Query<ListParams>,
) -> Result<Json<Vec<Argument>>, ApiError>
where
  S: DebateStore,
  M: Complete,
  I: IdentityProvider,
{
  let side = params.side()?;
  let store = state.store().as_ref();
  require_topic(store, id).await?;
  let mut arguments = store
    .get_arguments(id, side, ArgumentOrder::Validity)
    .await
    .map_err(ApiError::store)?;
  arguments.retain(Argument::is_verified);
  Ok(Json(arguments))
}

// ─── Create ───────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct CreateBody {
  pub side:    String,
  pub title:   String,
  pub content: String,
  #[serde(default)]
  pub sources: Option<String>,
}

/// `POST /topics/{id}/arguments`
///
/// Order of refusals: malformed body (400), contribution quota (403), model
/// budget (429), unknown topic (404), then the fact-check itself (422/503).
pub async fn create<S, M, I>(
  State(state): State<AppState<S, M, I>>,
  Path(id): Path<Uuid>,
  user: CurrentUser,
  Json(body): Json<CreateBody>,
) -> Result<impl IntoResponse, ApiError>
where
  S: DebateStore,
  M: Complete,
  I: IdentityProvider,
{
  let side = Side::parse(body.side.trim())
    .map_err(|_| ApiError::BadRequest(format!("side must be pro or con, got {:?}", body.side)))?;
  let title = required(&body.title, "title")?;
  let content = required(&body.content, "content")?;

  let store = state.store().as_ref();
  quota::ensure_contribution_quota(store, &state.limits, user.profile.user_id).await?;
  quota::ensure_model_budget(store, &state.limits).await?;

  let result = state
    .engine
    .submit_argument(NewArgument {
      topic_id: id,
      side,
      title,
      content,
      sources: body.sources.filter(|s| !s.trim().is_empty()),
      author: user.profile.username,
      user_id: Some(user.profile.user_id),
    })
    .await;
  quota::record_model_calls(store, quota::calls_made(&result)).await;

  let argument = result?;
  Ok((StatusCode::CREATED, Json(json!({ "argument_id": argument.argument_id }))))
}

// ─── Update ───────────────────────────────────────────────────────────────────

/// `PUT /topics/{id}/arguments/{argument_id}`
///
/// The stored verdict is kept; the topic's matches are dropped.
pub async fn update<S, M, I>(
  State(state): State<AppState<S, M, I>>,
  Path((id, argument_id)): Path<(Uuid, i64)>,
  user: CurrentUser,
  Json(body): Json<ArgumentEdit>,
) -> Result<Json<Argument>, ApiError>
where
  S: DebateStore,
  M: Complete,
  I: IdentityProvider,
{
  let store = state.store().as_ref();
  let existing = require_argument(store, argument_id).await?;
  if existing.topic_id != id {
    return Err(ApiError::NotFound(format!("argument {argument_id} not found in topic {id}")));
  }
  if existing.user_id != Some(user.profile.user_id) {
    return Err(ApiError::Forbidden("only the author may edit this argument".into()));
  }

  let edit = ArgumentEdit {
    title:   required(&body.title, "title")?,
    content: required(&body.content, "content")?,
    sources: body.sources.filter(|s| !s.trim().is_empty()),
  };
  let argument = store.update_argument(argument_id, edit).await.map_err(ApiError::store)?;

  tracing::info!(topic_id = %id, argument_id, "argument edited");
  Ok(Json(argument))
}

fn required(value: &str, field: &str) -> Result<String, ApiError> {
  match value.trim() {
    "" => Err(ApiError::BadRequest(format!("{field} must not be empty"))),
    v => Ok(v.to_owned()),
  }
}
