//! The topic analysis generator.

use std::sync::Arc;

use rostra_core::{
  argument::Argument,
  topic::{TimelineEvent, TopicAnalysis},
};
use rostra_llm::{Complete, CompletionRequest, ModelTier, StructuredClient, StructuredOutput};
use serde::Deserialize;

use crate::{Error, Result, prompts};

#[derive(Debug, Deserialize)]
struct AnalysisReply {
  overall_summary: String,
  consensus_view:  String,
  timeline_view:   Vec<TimelineEvent>,
}

impl StructuredOutput for AnalysisReply {
  const REQUIRED_FIELDS: &'static [&'static str] =
    &["overall_summary", "consensus_view", "timeline_view"];
  const LIST_FIELDS: &'static [&'static str] = &["timeline_view"];
}

pub struct AnalysisGenerator<M> {
  client: StructuredClient<M>,
}

impl<M> Clone for AnalysisGenerator<M> {
  fn clone(&self) -> Self { Self { client: self.client.clone() } }
}

impl<M: Complete> AnalysisGenerator<M> {
  pub fn new(model: Arc<M>) -> Self {
    Self { client: StructuredClient::new(model) }
  }

  /// Summarise a debate. Both sides must be non-empty; otherwise the model
  /// is not called and [`Error::InsufficientArguments`] is returned.
  pub async fn summarize(
    &self,
    proposition: &str,
    pro: &[Argument],
    con: &[Argument],
  ) -> Result<TopicAnalysis> {
    if pro.is_empty() || con.is_empty() {
      return Err(Error::InsufficientArguments);
    }

    let request =
      CompletionRequest::new(prompts::topic_analysis(proposition, pro, con), ModelTier::Standard);
    let reply: AnalysisReply = self
      .client
      .request(request)
      .await
      .map_err(Error::AnalysisUnavailable)?;

    Ok(TopicAnalysis {
      overall_summary: reply.overall_summary,
      consensus_view:  reply.consensus_view,
      timeline_view:   reply.timeline_view,
    })
  }
}
