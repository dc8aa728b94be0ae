//! Votes, comments and stored argument matches.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{Error, Result};

// ─── Votes ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VoteDirection {
  #[serde(rename = "upvote")]
  Up,
  #[serde(rename = "downvote")]
  Down,
}

impl VoteDirection {
  /// Contribution of one vote to an argument's total.
  pub fn weight(self) -> i64 {
    match self {
      Self::Up => 1,
      Self::Down => -1,
    }
  }

  pub fn from_weight(w: i64) -> Result<Self> {
    match w {
      1 => Ok(Self::Up),
      -1 => Ok(Self::Down),
      other => Err(Error::UnknownVoteDirection(other)),
    }
  }
}

/// Result of casting a vote: the new total and the caller's standing vote.
///
/// Casting the same direction twice withdraws the vote, so `user_vote` is
/// `None` after a repeat.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoteTally {
  pub argument_id: i64,
  pub votes:       i64,
  pub user_vote:   Option<VoteDirection>,
}

// ─── Comments ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Comment {
  pub comment_id:  i64,
  pub argument_id: i64,
  pub comment:     String,
  pub user_id:     Option<Uuid>,
  pub created_at:  DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewComment {
  pub argument_id: i64,
  pub comment:     String,
  pub user_id:     Option<Uuid>,
}

// ─── Argument matches ────────────────────────────────────────────────────────

/// A pairing of a pro and a con argument that address the same point.
///
/// Matches are only stored and cleared; nothing in the platform computes them
/// yet. Editing any argument of a topic clears that topic's matches.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArgumentMatch {
  pub pro_id: i64,
  pub con_id: i64,
  pub reason: Option<String>,
}
