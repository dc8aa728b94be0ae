//! API error type and [`axum::response::IntoResponse`] implementation.

use axum::{
  Json,
  http::{HeaderValue, StatusCode, header},
  response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

/// An error returned by an API handler.
#[derive(Debug, Error)]
pub enum ApiError {
  #[error("not found: {0}")]
  NotFound(String),

  #[error("bad request: {0}")]
  BadRequest(String),

  #[error("unauthorized")]
  Unauthorized,

  #[error("forbidden: {0}")]
  Forbidden(String),

  #[error("contribution limit of {limit} reached")]
  QuotaExceeded { count: u32, limit: u32 },

  #[error("argument not relevant to {proposition:?}")]
  IrrelevantArgument { reasoning: String, proposition: String },

  #[error("model call limit of {limit} reached")]
  ModelCeilingReached { limit: u64 },

  /// An upstream service (the model or the identity provider) failed or
  /// answered with something unusable.
  #[error("service unavailable: {0}")]
  Unavailable(String),

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl ApiError {
  pub fn store<E>(e: E) -> Self
  where
    E: std::error::Error + Send + Sync + 'static,
  {
    ApiError::Store(Box::new(e))
  }
}

impl From<rostra_engine::Error> for ApiError {
  fn from(e: rostra_engine::Error) -> Self {
    use rostra_engine::Error as E;
    match e {
      E::ValidationUnavailable(_) | E::FactCheckUnavailable(_) | E::AnalysisUnavailable(_) => {
        tracing::warn!(error = %e, "model-backed step failed");
        ApiError::Unavailable(e.to_string())
      }
      E::IrrelevantArgument { reasoning, proposition } => {
        ApiError::IrrelevantArgument { reasoning, proposition }
      }
      E::TopicNotFound(id) => ApiError::NotFound(format!("topic {id} not found")),
      E::ArgumentNotFound(id) => ApiError::NotFound(format!("argument {id} not found")),
      E::InsufficientArguments => ApiError::BadRequest(e.to_string()),
      E::Store(inner) | E::Persist(inner) => ApiError::Store(inner),
    }
  }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let (status, body) = match &self {
      ApiError::NotFound(m) => (StatusCode::NOT_FOUND, json!({ "error": m })),
      ApiError::BadRequest(m) => (StatusCode::BAD_REQUEST, json!({ "error": m })),
      ApiError::Unauthorized => {
        let mut res = (
          StatusCode::UNAUTHORIZED,
          Json(json!({ "error": "invalid or missing bearer token" })),
        )
          .into_response();
        res
          .headers_mut()
          .insert(header::WWW_AUTHENTICATE, HeaderValue::from_static("Bearer"));
        return res;
      }
      ApiError::Forbidden(m) => (StatusCode::FORBIDDEN, json!({ "error": m })),
      ApiError::QuotaExceeded { count, limit } => (
        StatusCode::FORBIDDEN,
        json!({
          "error": "quota_exceeded",
          "message": format!(
            "You've reached the limit of {limit} contributions (topics + arguments)."
          ),
          "current_count": count,
          "limit": limit,
        }),
      ),
      ApiError::IrrelevantArgument { reasoning, proposition } => (
        StatusCode::UNPROCESSABLE_ENTITY,
        json!({
          "error": "Argument not relevant",
          "reasoning": reasoning,
          "message": format!(
            "This argument was rejected as not relevant to the debate proposition: \
             '{proposition}'. Please submit an argument with factual claims related \
             to the debate."
          ),
        }),
      ),
      ApiError::ModelCeilingReached { limit } => (
        StatusCode::TOO_MANY_REQUESTS,
        json!({
          "error": "model_call_limit_reached",
          "message": format!("The service has used its allowance of {limit} model calls."),
          "limit": limit,
        }),
      ),
      ApiError::Unavailable(m) => (StatusCode::SERVICE_UNAVAILABLE, json!({ "error": m })),
      ApiError::Store(e) => {
        tracing::error!(error = %e, "store failure");
        (StatusCode::INTERNAL_SERVER_ERROR, json!({ "error": "internal server error" }))
      }
    };
    (status, Json(body)).into_response()
  }
}
