//! Error types for `rostra-core`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("unknown argument side: {0:?}")]
  UnknownSide(String),

  #[error("unknown vote direction: {0}")]
  UnknownVoteDirection(i64),

  #[error("serialization error: {0}")]
  Serialization(#[from] serde_json::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
