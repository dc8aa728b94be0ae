//! Error type for `rostra-engine`.

use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum Error {
  #[error("proposition validation unavailable: {0}")]
  ValidationUnavailable(#[source] rostra_llm::Error),

  #[error("fact-check unavailable: {0}")]
  FactCheckUnavailable(#[source] rostra_llm::Error),

  #[error("topic analysis unavailable: {0}")]
  AnalysisUnavailable(#[source] rostra_llm::Error),

  /// The fact-checker judged a submitted argument off-topic.
  #[error("argument is not relevant to {proposition:?}: {reasoning}")]
  IrrelevantArgument { reasoning: String, proposition: String },

  #[error("topic not found: {0}")]
  TopicNotFound(Uuid),

  #[error("argument not found: {0}")]
  ArgumentNotFound(i64),

  #[error("analysis needs at least one pro and one con argument")]
  InsufficientArguments,

  #[error("store error: {0}")]
  Store(Box<dyn std::error::Error + Send + Sync>),

  /// A store write failed after the model had already answered.
  #[error("store error after model call: {0}")]
  Persist(Box<dyn std::error::Error + Send + Sync>),
}

impl Error {
  pub(crate) fn store<E>(e: E) -> Self
  where
    E: std::error::Error + Send + Sync + 'static,
  {
    Self::Store(Box::new(e))
  }

  pub(crate) fn persist<E>(e: E) -> Self
  where
    E: std::error::Error + Send + Sync + 'static,
  {
    Self::Persist(Box::new(e))
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
