//! The argument fact-checker.

use std::sync::Arc;

use rostra_core::argument::Verdict;
use rostra_llm::{Complete, CompletionRequest, ModelTier, StructuredClient, StructuredOutput};
use serde::Deserialize;

use crate::{Error, Result, prompts};

/// Verdict as the model writes it. Scores arrive as arbitrary JSON numbers.
#[derive(Debug, Deserialize)]
struct VerdictReply {
  is_relevant:    bool,
  validity_score: f64,
  reasoning:      String,
  key_urls:       Vec<String>,
}

impl StructuredOutput for VerdictReply {
  const REQUIRED_FIELDS: &'static [&'static str] =
    &["is_relevant", "validity_score", "reasoning", "key_urls"];
  const LIST_FIELDS: &'static [&'static str] = &["key_urls"];
}

/// Round and clamp a model score into `0..=100`.
pub fn clamp_score(raw: f64) -> u8 {
  if raw.is_nan() {
    return 0;
  }
  // In range after the clamp, so the cast is exact.
  raw.round().clamp(0.0, 100.0) as u8
}

impl From<VerdictReply> for Verdict {
  fn from(reply: VerdictReply) -> Self {
    Verdict {
      is_relevant:    reply.is_relevant,
      validity_score: clamp_score(reply.validity_score),
      reasoning:      reply.reasoning,
      key_urls:       reply.key_urls,
    }
  }
}

pub struct FactChecker<M> {
  client: StructuredClient<M>,
}

impl<M> Clone for FactChecker<M> {
  fn clone(&self) -> Self { Self { client: self.client.clone() } }
}

impl<M: Complete> FactChecker<M> {
  pub fn new(model: Arc<M>) -> Self {
    Self { client: StructuredClient::new(model) }
  }

  /// Judge one argument against its topic's proposition.
  pub async fn verify(&self, title: &str, content: &str, proposition: &str) -> Result<Verdict> {
    let request =
      CompletionRequest::new(prompts::fact_check(title, content, proposition), ModelTier::Fast);
    let reply: VerdictReply = self
      .client
      .request(request)
      .await
      .map_err(Error::FactCheckUnavailable)?;
    Ok(reply.into())
  }
}
