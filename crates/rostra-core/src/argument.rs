//! Arguments: the pro/con contributions attached to a topic.
//!
//! An argument carries an optional [`Validity`] block produced by the
//! fact-checker. The block is either entirely present or entirely absent;
//! there is no way to represent a half-checked argument.

use std::cmp::Ordering;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};
use uuid::Uuid;

use crate::{Error, Result};

// ─── Side ────────────────────────────────────────────────────────────────────

/// Which side of the proposition an argument supports.
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Hash,
  Serialize,
  Deserialize,
  Display,
  EnumString,
  AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Side {
  Pro,
  Con,
}

impl Side {
  /// Parse the `side` column / query value.
  pub fn parse(s: &str) -> Result<Self> {
    s.parse().map_err(|_| Error::UnknownSide(s.to_owned()))
  }
}

// ─── Verdict ─────────────────────────────────────────────────────────────────

/// The fact-checker's judgement of a single argument. Never persisted as its
/// own entity; its fields are copied into [`Validity`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Verdict {
  pub is_relevant:    bool,
  /// 0–100, independent of which side the argument takes.
  pub validity_score: u8,
  pub reasoning:      String,
  pub key_urls:       Vec<String>,
}

// ─── Validity ────────────────────────────────────────────────────────────────

/// Persisted fact-check result. Serialised flat onto the owning [`Argument`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Validity {
  #[serde(rename = "validity_score")]
  pub score:      u8,
  #[serde(rename = "validity_reasoning")]
  pub reasoning:  String,
  #[serde(rename = "validity_checked_at")]
  pub checked_at: DateTime<Utc>,
  pub key_urls:   Vec<String>,
}

// ─── Argument ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Argument {
  pub argument_id: i64,
  pub topic_id:    Uuid,
  pub side:        Side,
  pub title:       String,
  pub content:     String,
  pub sources:     Option<String>,
  /// Display name of the author at submission time.
  pub author:      String,
  pub user_id:     Option<Uuid>,
  pub created_at:  DateTime<Utc>,
  pub votes:       i64,
  #[serde(flatten)]
  pub validity:    Option<Validity>,
}

impl Argument {
  pub fn is_verified(&self) -> bool { self.validity.is_some() }

  pub fn validity_score(&self) -> Option<u8> {
    self.validity.as_ref().map(|v| v.score)
  }
}

/// Input to [`crate::store::DebateStore::create_argument`].
/// `argument_id`, `created_at` and `votes` are assigned by the store.
#[derive(Debug, Clone)]
pub struct NewArgument {
  pub topic_id: Uuid,
  pub side:     Side,
  pub title:    String,
  pub content:  String,
  pub sources:  Option<String>,
  pub author:   String,
  pub user_id:  Option<Uuid>,
}

/// The user-editable portion of an argument.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArgumentEdit {
  pub title:   String,
  pub content: String,
  pub sources: Option<String>,
}

// ─── Ordering ────────────────────────────────────────────────────────────────

/// Sort order for [`crate::store::DebateStore::get_arguments`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ArgumentOrder {
  /// Oldest first.
  #[default]
  Chronological,
  /// See [`display_order`].
  Validity,
}

/// Display ordering: verified before unverified, then score descending, then
/// newest first. Argument ids break any remaining tie (higher id first).
pub fn display_order(a: &Argument, b: &Argument) -> Ordering {
  match (a.validity_score(), b.validity_score()) {
    (Some(_), None) => Ordering::Less,
    (None, Some(_)) => Ordering::Greater,
    (Some(x), Some(y)) if x != y => y.cmp(&x),
    _ => b
      .created_at
      .cmp(&a.created_at)
      .then_with(|| b.argument_id.cmp(&a.argument_id)),
  }
}

pub fn sort_for_display(arguments: &mut [Argument]) {
  arguments.sort_by(display_order);
}
