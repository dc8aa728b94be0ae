//! Usage limits: per-user contributions and the process-wide model budget.

use rostra_core::store::DebateStore;
use serde::Deserialize;
use uuid::Uuid;

use crate::error::ApiError;

/// Counter name under which model calls are recorded.
pub const MODEL_API: &str = "anthropic";

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct Limits {
  /// Total model calls the deployment may make.
  #[serde(default = "default_api_call_limit")]
  pub api_call_limit:     u64,
  /// Topics plus arguments a single user may create.
  #[serde(default = "default_contribution_limit")]
  pub contribution_limit: u32,
}

fn default_api_call_limit() -> u64 { 750 }
fn default_contribution_limit() -> u32 { 25 }

impl Default for Limits {
  fn default() -> Self {
    Self {
      api_call_limit:     default_api_call_limit(),
      contribution_limit: default_contribution_limit(),
    }
  }
}

/// `true` while the model budget has calls left.
pub async fn model_budget_left<S: DebateStore>(store: &S, limits: &Limits) -> Result<bool, ApiError> {
  let used = store.api_call_count(MODEL_API).await.map_err(ApiError::store)?;
  Ok(used < limits.api_call_limit)
}

/// Refuse a blocking model-backed request once the budget is spent.
pub async fn ensure_model_budget<S: DebateStore>(store: &S, limits: &Limits) -> Result<(), ApiError> {
  if model_budget_left(store, limits).await? {
    Ok(())
  } else {
    tracing::warn!(limit = limits.api_call_limit, "model call limit reached");
    Err(ApiError::ModelCeilingReached { limit: limits.api_call_limit })
  }
}

/// Add `calls` to the model counter. A failed write is logged, not returned:
/// the request it accounts for has already succeeded or failed on its own.
pub async fn record_model_calls<S: DebateStore>(store: &S, calls: u64) {
  if calls == 0 {
    return;
  }
  match store.record_api_calls(MODEL_API, calls).await {
    Ok(total) => tracing::debug!(calls, total, "model calls recorded"),
    Err(e) => tracing::warn!(calls, error = %e, "failed to record model calls"),
  }
}

/// Model calls attempted by a blocking engine operation that returned
/// `result`. Errors raised before the model is reached count zero; a store
/// failure after the model answered still counts.
pub fn calls_made<T>(result: &Result<T, rostra_engine::Error>) -> u64 {
  use rostra_engine::Error as E;
  match result {
    Ok(_) => 1,
    Err(
      E::ValidationUnavailable(_)
      | E::FactCheckUnavailable(_)
      | E::AnalysisUnavailable(_)
      | E::IrrelevantArgument { .. }
      | E::Persist(_),
    ) => 1,
    Err(_) => 0,
  }
}

/// Refuse new content from a user who has reached the contribution limit.
pub async fn ensure_contribution_quota<S: DebateStore>(
  store: &S,
  limits: &Limits,
  user_id: Uuid,
) -> Result<(), ApiError> {
  let count = store.contribution_count(user_id).await.map_err(ApiError::store)?;
  if count >= limits.contribution_limit {
    tracing::info!(%user_id, count, "contribution quota exceeded");
    return Err(ApiError::QuotaExceeded { count, limit: limits.contribution_limit });
  }
  Ok(())
}
