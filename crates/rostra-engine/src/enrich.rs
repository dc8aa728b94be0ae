//! What a read-time enrichment pass did.
//!
//! Lazy fact-checks and analysis never fail the read; their outcomes are
//! collected here instead so callers can log or report them.

use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum CheckOutcome {
  Verified { validity_score: u8 },
  /// Left unverified; retried on the next read.
  Failed { error: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArgumentCheck {
  pub argument_id: i64,
  #[serde(flatten)]
  pub outcome:     CheckOutcome,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum AnalysisOutcome {
  /// The pass did not look at the analysis.
  #[default]
  NotAttempted,
  /// Already set; left alone.
  Present,
  Generated,
  /// One side has no arguments yet.
  Skipped,
  Failed { error: String },
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct EnrichmentReport {
  pub checks:   Vec<ArgumentCheck>,
  pub analysis: AnalysisOutcome,
}

impl EnrichmentReport {
  pub fn verified(&self) -> usize {
    self
      .checks
      .iter()
      .filter(|c| matches!(c.outcome, CheckOutcome::Verified { .. }))
      .count()
  }

  pub fn failed(&self) -> usize { self.checks.len() - self.verified() }

  /// Model calls made during the pass. A failed step counts: the call was
  /// attempted.
  pub fn model_calls(&self) -> u64 {
    let analysis = matches!(
      self.analysis,
      AnalysisOutcome::Generated | AnalysisOutcome::Failed { .. }
    );
    self.checks.len() as u64 + u64::from(analysis)
  }

  /// Nothing was missing, so nothing was attempted.
  pub fn is_noop(&self) -> bool { self.model_calls() == 0 }
}
