//! Error type for `rostra-llm`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  /// The request never produced a response: connection failure, timeout,
  /// or an unreadable body.
  #[error("model transport error: {0}")]
  Transport(String),

  /// The model service answered with a non-success status.
  #[error("model service returned {status}: {body}")]
  Status { status: u16, body: String },

  /// The model answered, but not with the JSON shape that was asked for.
  #[error("malformed model response: {0}")]
  MalformedResponse(String),

  #[error("model client configuration error: {0}")]
  Config(String),
}

impl From<reqwest::Error> for Error {
  fn from(e: reqwest::Error) -> Self {
    if e.is_timeout() {
      Error::Transport(format!("request timed out: {e}"))
    } else {
      Error::Transport(e.to_string())
    }
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
