//! Handlers for `/topics` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `POST` | `/topics/validate-proposition` | Body: `{"proposition":"…"}` |
//! | `POST` | `/topics` | Auth. Body: `{"proposition":"…"}` |
//! | `GET`  | `/topics` | Newest first |
//! | `GET`  | `/topics/{id}` | Fills in missing verdicts and analysis first |
//! | `POST` | `/topics/{id}/generate-summary` | Replaces the stored analysis |
//! | `POST` | `/topics/{id}/verify-all` | Checks every unverified argument |
//! | `GET`  | `/topics/{id}/matches` | |

use axum::{
  Json,
  extract::{Path, State},
  http::StatusCode,
  response::IntoResponse,
};
use rostra_core::{
  engagement::ArgumentMatch,
  store::DebateStore,
  topic::{NewTopic, TopicAnalysis, TopicSummary},
};
use rostra_engine::{EnrichedTopic, EnrichmentReport, ValidationResult};
use rostra_llm::Complete;
use serde::Deserialize;
use uuid::Uuid;

use crate::{
  AppState,
  auth::{CurrentUser, IdentityProvider},
  error::ApiError,
  quota, require_topic,
};

#[derive(Debug, Deserialize)]
pub struct PropositionBody {
  pub proposition: String,
}

impl PropositionBody {
  fn trimmed(&self) -> Result<&str, ApiError> {
    match self.proposition.trim() {
      "" => Err(ApiError::BadRequest("proposition must not be empty".into())),
      p => Ok(p),
    }
  }
}

// ─── Validate ─────────────────────────────────────────────────────────────────

/// `POST /topics/validate-proposition`
pub async fn validate_proposition<S, M, I>(
  State(state): State<AppState<S, M, I>>,
  Json(body): Json<PropositionBody>,
) -> Result<Json<ValidationResult>, ApiError>
where
  S: DebateStore,
  M: Complete,
  I: IdentityProvider,
{
  let input = body.trimmed()?;
  quota::ensure_model_budget(state.store().as_ref(), &state.limits).await?;

  let result = state.engine.validate_proposition(input).await;
  quota::record_model_calls(state.store().as_ref(), quota::calls_made(&result)).await;
  Ok(Json(result?))
}

// ─── Create ───────────────────────────────────────────────────────────────────

/// `POST /topics`
pub async fn create<S, M, I>(
  State(state): State<AppState<S, M, I>>,
  user: CurrentUser,
  Json(body): Json<PropositionBody>,
) -> Result<impl IntoResponse, ApiError>
where
  S: DebateStore,
  M: Complete,
  I: IdentityProvider,
{
  let proposition = body.trimmed()?.to_owned();
  let topic = state
    .store()
    .create_topic(NewTopic {
      proposition,
      created_by: user.profile.username,
      user_id: Some(user.profile.user_id),
    })
    .await
    .map_err(ApiError::store)?;

  tracing::info!(topic_id = %topic.topic_id, user_id = %user.profile.user_id, "topic created");
  Ok((StatusCode::CREATED, Json(topic)))
}

// ─── List ─────────────────────────────────────────────────────────────────────

/// `GET /topics`
pub async fn list<S, M, I>(
  State(state): State<AppState<S, M, I>>,
) -> Result<Json<Vec<TopicSummary>>, ApiError>
where
  S: DebateStore,
  M: Complete,
  I: IdentityProvider,
{
  let topics = state.store().list_topics().await.map_err(ApiError::store)?;
  Ok(Json(topics))
}

// ─── Get one ──────────────────────────────────────────────────────────────────

/// `GET /topics/{id}`
///
/// Once the model budget is spent the topic is served as stored.
pub async fn get_one<S, M, I>(
  State(state): State<AppState<S, M, I>>,
  Path(id): Path<Uuid>,
) -> Result<Json<EnrichedTopic>, ApiError>
where
  S: DebateStore,
  M: Complete,
  I: IdentityProvider,
{
  let store = state.store().as_ref();
  if !quota::model_budget_left(store, &state.limits).await? {
    tracing::debug!(topic_id = %id, "model budget spent; serving topic without enrichment");
    return Ok(Json(state.engine.fetch_topic(id).await?));
  }

  let topic = state.engine.enrich_and_fetch_topic(id).await?;
  quota::record_model_calls(store, topic.report.model_calls()).await;
  Ok(Json(topic))
}

// ─── Explicit model work ──────────────────────────────────────────────────────

/// `POST /topics/{id}/generate-summary`
pub async fn generate_summary<S, M, I>(
  State(state): State<AppState<S, M, I>>,
  Path(id): Path<Uuid>,
) -> Result<Json<TopicAnalysis>, ApiError>
where
  S: DebateStore,
  M: Complete,
  I: IdentityProvider,
{
  let store = state.store().as_ref();
  quota::ensure_model_budget(store, &state.limits).await?;

  let result = state.engine.regenerate_analysis(id).await;
  quota::record_model_calls(store, quota::calls_made(&result)).await;
  Ok(Json(result?))
}

/// `POST /topics/{id}/verify-all`
pub async fn verify_all<S, M, I>(
  State(state): State<AppState<S, M, I>>,
  Path(id): Path<Uuid>,
) -> Result<Json<EnrichmentReport>, ApiError>
where
  S: DebateStore,
  M: Complete,
  I: IdentityProvider,
{
  let store = state.store().as_ref();
  quota::ensure_model_budget(store, &state.limits).await?;

  let report = state.engine.verify_pending(id).await?;
  quota::record_model_calls(store, report.model_calls()).await;
  tracing::info!(
    topic_id = %id,
    verified = report.verified(),
    failed = report.failed(),
    "pending arguments checked"
  );
  Ok(Json(report))
}

// ─── Matches ──────────────────────────────────────────────────────────────────

/// `GET /topics/{id}/matches`
pub async fn matches<S, M, I>(
  State(state): State<AppState<S, M, I>>,
  Path(id): Path<Uuid>,
) -> Result<Json<Vec<ArgumentMatch>>, ApiError>
where
  S: DebateStore,
  M: Complete,
  I: IdentityProvider,
{
  let store = state.store().as_ref();
  require_topic(store, id).await?;
  let matches = store.get_argument_matches(id).await.map_err(ApiError::store)?;
  Ok(Json(matches))
}
