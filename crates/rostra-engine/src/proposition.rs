//! The proposition validator.

use std::sync::Arc;

use rostra_llm::{Complete, CompletionRequest, ModelTier, StructuredClient, StructuredOutput};
use serde::{Deserialize, Serialize};

use crate::{Error, Result, prompts};

/// Number of reformulations the model is asked for.
pub const SUGGESTION_COUNT: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PropositionType {
  #[serde(alias = "Policy")]
  Policy,
  #[serde(alias = "Value")]
  Value,
  #[serde(alias = "Fact")]
  Fact,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Suggestion {
  pub proposition: String,
  #[serde(rename = "type")]
  pub kind:        PropositionType,
}

/// The validator's answer for one raw input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationResult {
  pub original_input:   String,
  pub is_valid:         bool,
  pub rejection_reason: Option<String>,
  pub interpretation:   Option<String>,
  /// Most to least aligned with the user's intent.
  pub suggestions:      Vec<Suggestion>,
}

impl StructuredOutput for ValidationResult {
  const REQUIRED_FIELDS: &'static [&'static str] = &[
    "original_input",
    "is_valid",
    "rejection_reason",
    "interpretation",
    "suggestions",
  ];
  const LIST_FIELDS: &'static [&'static str] = &["suggestions"];
}

impl ValidationResult {
  /// Enforce the invariants the prompt asks for but the model may ignore.
  fn normalize(mut self) -> Self {
    if !self.is_valid {
      self.interpretation = None;
      self.suggestions.clear();
      return self;
    }
    if self.suggestions.len() > SUGGESTION_COUNT {
      self.suggestions.truncate(SUGGESTION_COUNT);
    } else if self.suggestions.len() < SUGGESTION_COUNT {
      tracing::warn!(
        count = self.suggestions.len(),
        "model returned fewer suggestions than requested"
      );
    }
    self
  }
}

/// Reviews raw propositions. Unlike the fact-checker there is no lazy path:
/// every failure surfaces as [`Error::ValidationUnavailable`].
pub struct PropositionValidator<M> {
  client: StructuredClient<M>,
}

impl<M> Clone for PropositionValidator<M> {
  fn clone(&self) -> Self { Self { client: self.client.clone() } }
}

impl<M: Complete> PropositionValidator<M> {
  pub fn new(model: Arc<M>) -> Self {
    Self { client: StructuredClient::new(model) }
  }

  pub async fn validate(&self, input: &str) -> Result<ValidationResult> {
    let request = CompletionRequest::new(prompts::proposition_review(input), ModelTier::Standard);
    let result: ValidationResult = self
      .client
      .request(request)
      .await
      .map_err(Error::ValidationUnavailable)?;
    Ok(result.normalize())
  }
}
