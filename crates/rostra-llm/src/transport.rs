//! The `Complete` trait: one prompt in, raw model text out.

use std::future::Future;

use serde::{Deserialize, Serialize};

use crate::Result;

/// Which configured model a request should run on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModelTier {
  /// Larger model for open-ended generation (proposition review, analysis).
  Standard,
  /// Cheaper model for high-volume judgements (fact-checking).
  Fast,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionRequest {
  pub prompt:     String,
  pub tier:       ModelTier,
  pub max_tokens: u32,
}

impl CompletionRequest {
  pub const DEFAULT_MAX_TOKENS: u32 = 4096;

  pub fn new(prompt: impl Into<String>, tier: ModelTier) -> Self {
    Self {
      prompt: prompt.into(),
      tier,
      max_tokens: Self::DEFAULT_MAX_TOKENS,
    }
  }

  pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
    self.max_tokens = max_tokens;
    self
  }
}

/// A text-generation backend.
///
/// Implementations perform exactly one outbound call per invocation and do
/// not retry. Retry policy, if any, belongs to the caller.
pub trait Complete: Send + Sync {
  fn complete(
    &self,
    request: CompletionRequest,
  ) -> impl Future<Output = Result<String>> + Send + '_;
}
