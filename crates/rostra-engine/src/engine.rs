//! [`DebateEngine`]: when to call the model, and what to persist.

use std::sync::Arc;

use rostra_core::{
  argument::{Argument, ArgumentOrder, NewArgument, Side, Verdict},
  store::DebateStore,
  topic::{Topic, TopicAnalysis},
};
use rostra_llm::Complete;
use serde::Serialize;
use uuid::Uuid;

use crate::{
  AnalysisGenerator, Error, FactChecker, PropositionValidator, Result, ValidationResult,
  enrich::{AnalysisOutcome, ArgumentCheck, CheckOutcome, EnrichmentReport},
};

/// A topic with its arguments split by side, each side in display order.
#[derive(Debug, Clone, Serialize)]
pub struct EnrichedTopic {
  #[serde(flatten)]
  pub topic:         Topic,
  pub pro_arguments: Vec<Argument>,
  pub con_arguments: Vec<Argument>,
  #[serde(skip)]
  pub report:        EnrichmentReport,
}

/// Orchestrates the three model-backed components over a store.
///
/// The store and model are shared behind `Arc`s, so clones are cheap.
pub struct DebateEngine<S, M> {
  store:     Arc<S>,
  validator: PropositionValidator<M>,
  checker:   FactChecker<M>,
  generator: AnalysisGenerator<M>,
}

impl<S, M> Clone for DebateEngine<S, M> {
  fn clone(&self) -> Self {
    Self {
      store:     Arc::clone(&self.store),
      validator: self.validator.clone(),
      checker:   self.checker.clone(),
      generator: self.generator.clone(),
    }
  }
}

impl<S, M> DebateEngine<S, M>
where
  S: DebateStore,
  M: Complete,
{
  pub fn new(store: Arc<S>, model: Arc<M>) -> Self {
    Self {
      store,
      validator: PropositionValidator::new(Arc::clone(&model)),
      checker: FactChecker::new(Arc::clone(&model)),
      generator: AnalysisGenerator::new(model),
    }
  }

  pub fn store(&self) -> &Arc<S> { &self.store }

  // ── Components ────────────────────────────────────────────────────────────

  pub async fn validate_proposition(&self, input: &str) -> Result<ValidationResult> {
    self.validator.validate(input).await
  }

  pub async fn verify_argument(
    &self,
    title: &str,
    content: &str,
    proposition: &str,
  ) -> Result<Verdict> {
    self.checker.verify(title, content, proposition).await
  }

  pub async fn summarize(
    &self,
    proposition: &str,
    pro: &[Argument],
    con: &[Argument],
  ) -> Result<TopicAnalysis> {
    self.generator.summarize(proposition, pro, con).await
  }

  // ── Blocking paths ────────────────────────────────────────────────────────

  /// Fact-check and persist a new argument.
  ///
  /// Nothing is written unless the checker answers and judges the argument
  /// relevant; the argument and its verdict are then stored in one write.
  pub async fn submit_argument(&self, input: NewArgument) -> Result<Argument> {
    let topic = self.require_topic(input.topic_id).await?;

    let verdict = self
      .checker
      .verify(&input.title, &input.content, &topic.proposition)
      .await?;

    if !verdict.is_relevant {
      tracing::info!(topic_id = %topic.topic_id, "rejected irrelevant argument");
      return Err(Error::IrrelevantArgument {
        reasoning:   verdict.reasoning,
        proposition: topic.proposition,
      });
    }

    let argument = self
      .store
      .create_verified_argument(input, verdict)
      .await
      .map_err(Error::persist)?;

    tracing::info!(
      topic_id = %argument.topic_id,
      argument_id = argument.argument_id,
      validity_score = argument.validity_score(),
      "argument submitted"
    );
    Ok(argument)
  }

  /// Check one argument again and overwrite its stored verdict.
  pub async fn reverify_argument(&self, argument_id: i64) -> Result<Argument> {
    let argument = self
      .store
      .get_argument(argument_id)
      .await
      .map_err(Error::store)?
      .ok_or(Error::ArgumentNotFound(argument_id))?;
    let topic = self.require_topic(argument.topic_id).await?;

    let verdict = self
      .checker
      .verify(&argument.title, &argument.content, &topic.proposition)
      .await?;
    self
      .store
      .update_argument_validity(argument_id, verdict)
      .await
      .map_err(Error::persist)?;

    self
      .store
      .get_argument(argument_id)
      .await
      .map_err(Error::persist)?
      .ok_or(Error::ArgumentNotFound(argument_id))
  }

  /// Generate a topic's analysis, replacing any stored one.
  pub async fn regenerate_analysis(&self, topic_id: Uuid) -> Result<TopicAnalysis> {
    let topic = self.require_topic(topic_id).await?;
    let (pro, con) = self.load_sides(topic_id).await?;

    let analysis = self.generator.summarize(&topic.proposition, &pro, &con).await?;
    self
      .store
      .update_topic_analysis(topic_id, analysis.clone())
      .await
      .map_err(Error::persist)?;

    tracing::info!(%topic_id, "topic analysis regenerated");
    Ok(analysis)
  }

  // ── Reads ─────────────────────────────────────────────────────────────────

  /// Load a topic without calling the model.
  pub async fn fetch_topic(&self, topic_id: Uuid) -> Result<EnrichedTopic> {
    let topic = self.require_topic(topic_id).await?;
    let (pro_arguments, con_arguments) = self.load_sides(topic_id).await?;
    Ok(EnrichedTopic {
      topic,
      pro_arguments,
      con_arguments,
      report: EnrichmentReport::default(),
    })
  }

  /// Load a topic, first filling in whatever the model has not yet produced.
  ///
  /// Unverified arguments are checked one at a time and each verdict is
  /// stored as soon as it arrives. If the analysis is unset and both sides
  /// have arguments, it is generated once. Individual failures are logged and
  /// recorded in the report; the read itself only fails on a missing topic
  /// or a store error while loading.
  pub async fn enrich_and_fetch_topic(&self, topic_id: Uuid) -> Result<EnrichedTopic> {
    let topic = self.require_topic(topic_id).await?;
    let (mut pro, mut con) = self.load_sides(topic_id).await?;

    let mut report = EnrichmentReport {
      checks:   self.check_unverified(&topic, pro.iter().chain(&con)).await,
      analysis: AnalysisOutcome::NotAttempted,
    };
    if !report.checks.is_empty() {
      (pro, con) = self.load_sides(topic_id).await?;
    }

    let mut topic = topic;
    report.analysis = if topic.analysis.is_some() {
      AnalysisOutcome::Present
    } else if pro.is_empty() || con.is_empty() {
      AnalysisOutcome::Skipped
    } else {
      match self.fill_analysis(&topic, &pro, &con).await {
        Ok(analysis) => {
          topic.analysis = Some(analysis);
          AnalysisOutcome::Generated
        }
        Err(e) => {
          tracing::warn!(%topic_id, error = %e, "analysis generation failed during read");
          AnalysisOutcome::Failed { error: e.to_string() }
        }
      }
    };

    if !report.is_noop() {
      tracing::info!(
        %topic_id,
        verified = report.verified(),
        failed = report.failed(),
        analysis = ?report.analysis,
        "enriched topic on read"
      );
    }

    Ok(EnrichedTopic { topic, pro_arguments: pro, con_arguments: con, report })
  }

  /// Fact-check every unverified argument of a topic, without touching the
  /// analysis.
  pub async fn verify_pending(&self, topic_id: Uuid) -> Result<EnrichmentReport> {
    let topic = self.require_topic(topic_id).await?;
    let arguments = self
      .store
      .get_arguments(topic_id, None, ArgumentOrder::Chronological)
      .await
      .map_err(Error::store)?;

    Ok(EnrichmentReport {
      checks:   self.check_unverified(&topic, arguments.iter()).await,
      analysis: AnalysisOutcome::NotAttempted,
    })
  }

  // ── Helpers ───────────────────────────────────────────────────────────────

  async fn require_topic(&self, topic_id: Uuid) -> Result<Topic> {
    self
      .store
      .get_topic(topic_id)
      .await
      .map_err(Error::store)?
      .ok_or(Error::TopicNotFound(topic_id))
  }

  async fn load_sides(&self, topic_id: Uuid) -> Result<(Vec<Argument>, Vec<Argument>)> {
    let pro = self
      .store
      .get_arguments(topic_id, Some(Side::Pro), ArgumentOrder::Validity)
      .await
      .map_err(Error::store)?;
    let con = self
      .store
      .get_arguments(topic_id, Some(Side::Con), ArgumentOrder::Validity)
      .await
      .map_err(Error::store)?;
    Ok((pro, con))
  }

  async fn check_unverified<'a>(
    &self,
    topic: &Topic,
    arguments: impl Iterator<Item = &'a Argument>,
  ) -> Vec<ArgumentCheck> {
    let mut checks = Vec::new();
    for argument in arguments.filter(|a| !a.is_verified()) {
      let outcome = match self.check_one(topic, argument).await {
        Ok(validity_score) => CheckOutcome::Verified { validity_score },
        Err(e) => {
          tracing::warn!(
            topic_id = %topic.topic_id,
            argument_id = argument.argument_id,
            error = %e,
            "lazy fact-check failed; argument stays unverified"
          );
          CheckOutcome::Failed { error: e.to_string() }
        }
      };
      checks.push(ArgumentCheck { argument_id: argument.argument_id, outcome });
    }
    checks
  }

  async fn check_one(&self, topic: &Topic, argument: &Argument) -> Result<u8> {
    let verdict = self
      .checker
      .verify(&argument.title, &argument.content, &topic.proposition)
      .await?;
    let score = verdict.validity_score;
    self
      .store
      .update_argument_validity(argument.argument_id, verdict)
      .await
      .map_err(Error::persist)?;
    Ok(score)
  }

  async fn fill_analysis(
    &self,
    topic: &Topic,
    pro: &[Argument],
    con: &[Argument],
  ) -> Result<TopicAnalysis> {
    let analysis = self.generator.summarize(&topic.proposition, pro, con).await?;
    self
      .store
      .update_topic_analysis(topic.topic_id, analysis.clone())
      .await
      .map_err(Error::persist)?;
    Ok(analysis)
  }
}
