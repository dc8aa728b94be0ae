//! Encoding and decoding helpers between Rust domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! Timestamps are RFC 3339 strings with fixed microsecond precision, so they
//! sort lexically. Lists are compact JSON. UUIDs are hyphenated lowercase.

use chrono::{DateTime, SecondsFormat, Utc};
use rostra_core::{
  argument::{Argument, Side, Validity},
  engagement::Comment,
  topic::{TimelineEvent, Topic, TopicAnalysis},
  user::UserProfile,
};
use uuid::Uuid;

use crate::{Error, Result};

// ─── Scalars ─────────────────────────────────────────────────────────────────

pub fn encode_uuid(id: Uuid) -> String { id.hyphenated().to_string() }

pub fn decode_uuid(s: &str) -> Result<Uuid> { Ok(Uuid::parse_str(s)?) }

pub fn encode_dt(dt: DateTime<Utc>) -> String {
  dt.to_rfc3339_opts(SecondsFormat::Micros, true)
}

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

fn decode_opt_uuid(s: Option<String>) -> Result<Option<Uuid>> {
  s.as_deref().map(decode_uuid).transpose()
}

// ─── JSON columns ────────────────────────────────────────────────────────────

pub fn encode_urls(urls: &[String]) -> Result<String> {
  Ok(serde_json::to_string(urls)?)
}

pub fn encode_timeline(events: &[TimelineEvent]) -> Result<String> {
  Ok(serde_json::to_string(events)?)
}

// ─── Row types ───────────────────────────────────────────────────────────────

/// Column list matching [`RawTopic`]'s field order.
pub const TOPIC_COLUMNS: &str = "topic_id, proposition, created_by, user_id, created_at,
   overall_summary, consensus_view, timeline_view";

/// Raw values read directly from a `topics` row.
pub struct RawTopic {
  pub topic_id:        String,
  pub proposition:     String,
  pub created_by:      String,
  pub user_id:         Option<String>,
  pub created_at:      String,
  pub overall_summary: Option<String>,
  pub consensus_view:  Option<String>,
  pub timeline_view:   Option<String>,
}

impl RawTopic {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      topic_id:        row.get(0)?,
      proposition:     row.get(1)?,
      created_by:      row.get(2)?,
      user_id:         row.get(3)?,
      created_at:      row.get(4)?,
      overall_summary: row.get(5)?,
      consensus_view:  row.get(6)?,
      timeline_view:   row.get(7)?,
    })
  }

  pub fn into_topic(self) -> Result<Topic> {
    let analysis = match (self.overall_summary, self.consensus_view, self.timeline_view)
    {
      (Some(overall_summary), Some(consensus_view), Some(timeline)) => {
        Some(TopicAnalysis {
          overall_summary,
          consensus_view,
          timeline_view: serde_json::from_str(&timeline)?,
        })
      }
      _ => None,
    };

    Ok(Topic {
      topic_id: decode_uuid(&self.topic_id)?,
      proposition: self.proposition,
      created_by: self.created_by,
      user_id: decode_opt_uuid(self.user_id)?,
      created_at: decode_dt(&self.created_at)?,
      analysis,
    })
  }
}

/// Column list matching [`RawArgument`]'s field order.
pub const ARGUMENT_COLUMNS: &str = "argument_id, topic_id, side, title, content, sources,
   author, user_id, created_at, votes,
   validity_score, validity_reasoning, validity_checked_at, key_urls";

/// Raw values read directly from an `arguments` row.
pub struct RawArgument {
  pub argument_id:         i64,
  pub topic_id:            String,
  pub side:                String,
  pub title:               String,
  pub content:             String,
  pub sources:             Option<String>,
  pub author:              String,
  pub user_id:             Option<String>,
  pub created_at:          String,
  pub votes:               i64,
  pub validity_score:      Option<u8>,
  pub validity_reasoning:  Option<String>,
  pub validity_checked_at: Option<String>,
  pub key_urls:            Option<String>,
}

impl RawArgument {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      argument_id:         row.get(0)?,
      topic_id:            row.get(1)?,
      side:                row.get(2)?,
      title:               row.get(3)?,
      content:             row.get(4)?,
      sources:             row.get(5)?,
      author:              row.get(6)?,
      user_id:             row.get(7)?,
      created_at:          row.get(8)?,
      votes:               row.get(9)?,
      validity_score:      row.get(10)?,
      validity_reasoning:  row.get(11)?,
      validity_checked_at: row.get(12)?,
      key_urls:            row.get(13)?,
    })
  }

  pub fn into_argument(self) -> Result<Argument> {
    let validity = match (
      self.validity_score,
      self.validity_reasoning,
      self.validity_checked_at,
      self.key_urls,
    ) {
      (Some(score), Some(reasoning), Some(checked_at), Some(urls)) => Some(Validity {
        score,
        reasoning,
        checked_at: decode_dt(&checked_at)?,
        key_urls: serde_json::from_str(&urls)?,
      }),
      _ => None,
    };

    Ok(Argument {
      argument_id: self.argument_id,
      topic_id: decode_uuid(&self.topic_id)?,
      side: Side::parse(&self.side)?,
      title: self.title,
      content: self.content,
      sources: self.sources,
      author: self.author,
      user_id: decode_opt_uuid(self.user_id)?,
      created_at: decode_dt(&self.created_at)?,
      votes: self.votes,
      validity,
    })
  }
}

pub const PROFILE_COLUMNS: &str =
  "user_id, username, email, avatar_url, created_at, updated_at";

/// Raw values read directly from a `user_profiles` row.
pub struct RawProfile {
  pub user_id:    String,
  pub username:   String,
  pub email:      String,
  pub avatar_url: Option<String>,
  pub created_at: String,
  pub updated_at: String,
}

impl RawProfile {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      user_id:    row.get(0)?,
      username:   row.get(1)?,
      email:      row.get(2)?,
      avatar_url: row.get(3)?,
      created_at: row.get(4)?,
      updated_at: row.get(5)?,
    })
  }

  pub fn into_profile(self) -> Result<UserProfile> {
    Ok(UserProfile {
      user_id:    decode_uuid(&self.user_id)?,
      username:   self.username,
      email:      self.email,
      avatar_url: self.avatar_url,
      created_at: decode_dt(&self.created_at)?,
      updated_at: decode_dt(&self.updated_at)?,
    })
  }
}

/// Raw values read directly from a `comments` row.
pub struct RawComment {
  pub comment_id:  i64,
  pub argument_id: i64,
  pub comment:     String,
  pub user_id:     Option<String>,
  pub created_at:  String,
}

impl RawComment {
  pub fn into_comment(self) -> Result<Comment> {
    Ok(Comment {
      comment_id:  self.comment_id,
      argument_id: self.argument_id,
      comment:     self.comment,
      user_id:     decode_opt_uuid(self.user_id)?,
      created_at:  decode_dt(&self.created_at)?,
    })
  }
}
