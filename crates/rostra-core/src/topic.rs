//! Topics: a debate proposition plus its lazily generated analysis.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ─── Analysis ────────────────────────────────────────────────────────────────

/// One step in the narrative timeline of a debate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimelineEvent {
  pub period:      String,
  pub description: String,
}

/// Cross-argument summary produced by the analysis generator.
///
/// Stored as three columns that are written together; a topic either has all
/// three or none.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopicAnalysis {
  pub overall_summary: String,
  pub consensus_view:  String,
  pub timeline_view:   Vec<TimelineEvent>,
}

// ─── Topic ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Topic {
  pub topic_id:    Uuid,
  pub proposition: String,
  /// Display name of the creator.
  pub created_by:  String,
  pub user_id:     Option<Uuid>,
  pub created_at:  DateTime<Utc>,
  #[serde(flatten)]
  pub analysis:    Option<TopicAnalysis>,
}

/// Input to [`crate::store::DebateStore::create_topic`].
#[derive(Debug, Clone)]
pub struct NewTopic {
  pub proposition: String,
  pub created_by:  String,
  pub user_id:     Option<Uuid>,
}

// ─── List view ───────────────────────────────────────────────────────────────

/// A display label derived from how evenly arguments split between sides.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ControversyLevel {
  #[serde(rename = "Highly Contested")]
  HighlyContested,
  #[serde(rename = "Moderately Contested")]
  ModeratelyContested,
  #[serde(rename = "Clear Consensus")]
  ClearConsensus,
}

impl ControversyLevel {
  /// Topics with six or fewer arguments have no label.
  pub const MIN_ARGUMENTS: u32 = 7;

  pub fn from_counts(pro: u32, con: u32) -> Option<Self> {
    let total = pro + con;
    if total < Self::MIN_ARGUMENTS {
      return None;
    }
    let minority = f64::from(pro.min(con)) / f64::from(total);
    Some(if minority >= 0.4 {
      Self::HighlyContested
    } else if minority >= 0.25 {
      Self::ModeratelyContested
    } else {
      Self::ClearConsensus
    })
  }
}

/// Row of the topic listing, computed on read.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TopicSummary {
  pub topic_id:          Uuid,
  pub proposition:       String,
  pub created_by:        String,
  pub created_at:        DateTime<Utc>,
  pub pro_count:         u32,
  pub con_count:         u32,
  /// Mean score of verified pro arguments, one decimal place.
  pub pro_avg_validity:  Option<f64>,
  pub con_avg_validity:  Option<f64>,
  pub controversy_level: Option<ControversyLevel>,
}

/// Round an average to one decimal place for display.
pub fn round_average(avg: f64) -> f64 { (avg * 10.0).round() / 10.0 }
