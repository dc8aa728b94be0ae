//! [`SqliteStore`], the SQLite implementation of [`DebateStore`].

use std::path::Path;

use chrono::Utc;
use rusqlite::OptionalExtension as _;
use uuid::Uuid;

use rostra_core::{
  argument::{Argument, ArgumentEdit, ArgumentOrder, NewArgument, Side, Verdict, sort_for_display},
  engagement::{ArgumentMatch, Comment, NewComment, VoteDirection, VoteTally},
  store::DebateStore,
  topic::{
    ControversyLevel, NewTopic, Topic, TopicAnalysis, TopicSummary, round_average,
  },
  user::{NewUserProfile, UserProfile},
};

use crate::{
  Error, Result,
  encode::{
    ARGUMENT_COLUMNS, PROFILE_COLUMNS, RawArgument, RawComment, RawProfile, RawTopic,
    TOPIC_COLUMNS, decode_dt, decode_uuid, encode_dt, encode_timeline, encode_urls,
    encode_uuid,
  },
  schema::SCHEMA,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A Rostra debate store backed by a single SQLite file.
///
/// Clones share the inner connection.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open a private in-memory store.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  /// Write a profile, creating or refreshing it.
  ///
  /// With `refresh == false` an existing row is returned untouched.
  async fn upsert_profile(&self, input: NewUserProfile, refresh: bool) -> Result<UserProfile> {
    let id_str = encode_uuid(input.user_id);
    let suffix = input.user_id.simple().to_string()[..8].to_owned();
    let now = encode_dt(Utc::now());

    let raw: RawProfile = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;

        let exists = tx
          .query_row(
            "SELECT 1 FROM user_profiles WHERE user_id = ?1",
            rusqlite::params![id_str],
            |_| Ok(()),
          )
          .optional()?
          .is_some();

        if !exists {
          let taken = tx
            .query_row(
              "SELECT 1 FROM user_profiles WHERE username = ?1",
              rusqlite::params![input.username],
              |_| Ok(()),
            )
            .optional()?
            .is_some();
          let username = if taken {
            format!("{}-{suffix}", input.username)
          } else {
            input.username
          };

          tx.execute(
            "INSERT INTO user_profiles
               (user_id, username, email, avatar_url, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?5)",
            rusqlite::params![id_str, username, input.email, input.avatar_url, now],
          )?;
        } else if refresh {
          tx.execute(
            "UPDATE user_profiles SET email = ?2, avatar_url = ?3, updated_at = ?4
             WHERE user_id = ?1",
            rusqlite::params![id_str, input.email, input.avatar_url, now],
          )?;
        }

        let raw = tx.query_row(
          &format!("SELECT {PROFILE_COLUMNS} FROM user_profiles WHERE user_id = ?1"),
          rusqlite::params![id_str],
          RawProfile::from_row,
        )?;
        tx.commit()?;
        Ok(raw)
      })
      .await?;

    raw.into_profile()
  }

  /// Insert an argument, with its validity block when `verdict` is given.
  async fn insert_argument(
    &self,
    input: NewArgument,
    verdict: Option<Verdict>,
  ) -> Result<Argument> {
    let topic_id = input.topic_id;
    let topic_str = encode_uuid(input.topic_id);
    let side = input.side.as_ref().to_owned();
    let user_str = input.user_id.map(encode_uuid);
    let now = encode_dt(Utc::now());
    let (score, reasoning, checked_at, urls) = match verdict {
      Some(v) => (
        Some(v.validity_score),
        Some(v.reasoning),
        Some(now.clone()),
        Some(encode_urls(&v.key_urls)?),
      ),
      None => (None, None, None, None),
    };

    let raw: Option<RawArgument> = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        if !topic_exists(&tx, &topic_str)? {
          return Ok(None);
        }

        tx.execute(
          "INSERT INTO arguments (
             topic_id, side, title, content, sources, author, user_id, created_at,
             validity_score, validity_reasoning, validity_checked_at, key_urls
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)",
          rusqlite::params![
            topic_str,
            side,
            input.title,
            input.content,
            input.sources,
            input.author,
            user_str,
            now,
            score,
            reasoning,
            checked_at,
            urls,
          ],
        )?;
        let raw = select_argument(&tx, tx.last_insert_rowid())?;
        tx.commit()?;
        Ok(raw)
      })
      .await?;

    raw
      .ok_or(Error::TopicNotFound(topic_id))?
      .into_argument()
  }
}

// ─── Row helpers ─────────────────────────────────────────────────────────────

fn topic_exists(conn: &rusqlite::Connection, topic_id: &str) -> rusqlite::Result<bool> {
  Ok(
    conn
      .query_row(
        "SELECT 1 FROM topics WHERE topic_id = ?1",
        rusqlite::params![topic_id],
        |_| Ok(()),
      )
      .optional()?
      .is_some(),
  )
}

fn select_argument(
  conn: &rusqlite::Connection,
  argument_id: i64,
) -> rusqlite::Result<Option<RawArgument>> {
  conn
    .query_row(
      &format!("SELECT {ARGUMENT_COLUMNS} FROM arguments WHERE argument_id = ?1"),
      rusqlite::params![argument_id],
      RawArgument::from_row,
    )
    .optional()
}

// ─── DebateStore impl ────────────────────────────────────────────────────────

impl DebateStore for SqliteStore {
  type Error = Error;

  // ── Users ─────────────────────────────────────────────────────────────────

  async fn ensure_user_profile(&self, input: NewUserProfile) -> Result<UserProfile> {
    self.upsert_profile(input, false).await
  }

  async fn sync_user_profile(&self, input: NewUserProfile) -> Result<UserProfile> {
    self.upsert_profile(input, true).await
  }

  async fn get_user_profile(&self, user_id: Uuid) -> Result<Option<UserProfile>> {
    let id_str = encode_uuid(user_id);

    let raw: Option<RawProfile> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!("SELECT {PROFILE_COLUMNS} FROM user_profiles WHERE user_id = ?1"),
              rusqlite::params![id_str],
              RawProfile::from_row,
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawProfile::into_profile).transpose()
  }

  async fn delete_user_profile(&self, user_id: Uuid) -> Result<bool> {
    let id_str = encode_uuid(user_id);

    let deleted = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        for table in ["topics", "arguments", "comments"] {
          tx.execute(
            &format!("UPDATE {table} SET user_id = NULL WHERE user_id = ?1"),
            rusqlite::params![id_str],
          )?;
        }
        let n = tx.execute(
          "DELETE FROM user_profiles WHERE user_id = ?1",
          rusqlite::params![id_str],
        )?;
        tx.commit()?;
        Ok(n > 0)
      })
      .await?;

    Ok(deleted)
  }

  async fn contribution_count(&self, user_id: Uuid) -> Result<u32> {
    let id_str = encode_uuid(user_id);

    let count: u32 = self
      .conn
      .call(move |conn| {
        Ok(conn.query_row(
          "SELECT (SELECT COUNT(*) FROM topics    WHERE user_id = ?1)
                + (SELECT COUNT(*) FROM arguments WHERE user_id = ?1)",
          rusqlite::params![id_str],
          |r| r.get(0),
        )?)
      })
      .await?;

    Ok(count)
  }

  // ── Topics ────────────────────────────────────────────────────────────────

  async fn create_topic(&self, input: NewTopic) -> Result<Topic> {
    let topic = Topic {
      topic_id:    Uuid::new_v4(),
      proposition: input.proposition,
      created_by:  input.created_by,
      user_id:     input.user_id,
      created_at:  Utc::now(),
      analysis:    None,
    };

    let id_str      = encode_uuid(topic.topic_id);
    let proposition = topic.proposition.clone();
    let created_by  = topic.created_by.clone();
    let user_str    = topic.user_id.map(encode_uuid);
    let at_str      = encode_dt(topic.created_at);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO topics (topic_id, proposition, created_by, user_id, created_at)
           VALUES (?1, ?2, ?3, ?4, ?5)",
          rusqlite::params![id_str, proposition, created_by, user_str, at_str],
        )?;
        Ok(())
      })
      .await?;

    // Re-read so the timestamp has the stored precision.
    self
      .get_topic(topic.topic_id)
      .await?
      .ok_or(Error::TopicNotFound(topic.topic_id))
  }

  async fn get_topic(&self, topic_id: Uuid) -> Result<Option<Topic>> {
    let id_str = encode_uuid(topic_id);

    let raw: Option<RawTopic> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!("SELECT {TOPIC_COLUMNS} FROM topics WHERE topic_id = ?1"),
              rusqlite::params![id_str],
              RawTopic::from_row,
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawTopic::into_topic).transpose()
  }

  async fn list_topics(&self) -> Result<Vec<TopicSummary>> {
    type Row = (String, String, String, String, u32, u32, Option<f64>, Option<f64>);

    let rows: Vec<Row> = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare(
          "SELECT
             t.topic_id, t.proposition, t.created_by, t.created_at,
             COUNT(CASE WHEN a.side = 'pro' THEN 1 END),
             COUNT(CASE WHEN a.side = 'con' THEN 1 END),
             AVG(CASE WHEN a.side = 'pro' THEN a.validity_score END),
             AVG(CASE WHEN a.side = 'con' THEN a.validity_score END)
           FROM topics t
           LEFT JOIN arguments a ON a.topic_id = t.topic_id
           GROUP BY t.topic_id
           ORDER BY t.created_at DESC, t.rowid DESC",
        )?;
        let rows = stmt
          .query_map([], |r| {
            Ok((
              r.get(0)?,
              r.get(1)?,
              r.get(2)?,
              r.get(3)?,
              r.get(4)?,
              r.get(5)?,
              r.get(6)?,
              r.get(7)?,
            ))
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    rows
      .into_iter()
      .map(|(id, proposition, created_by, created_at, pro, con, pro_avg, con_avg)| {
        Ok(TopicSummary {
          topic_id: decode_uuid(&id)?,
          proposition,
          created_by,
          created_at: decode_dt(&created_at)?,
          pro_count: pro,
          con_count: con,
          pro_avg_validity: pro_avg.map(round_average),
          con_avg_validity: con_avg.map(round_average),
          controversy_level: ControversyLevel::from_counts(pro, con),
        })
      })
      .collect()
  }

  async fn update_topic_analysis(
    &self,
    topic_id: Uuid,
    analysis: TopicAnalysis,
  ) -> Result<()> {
    let id_str   = encode_uuid(topic_id);
    let timeline = encode_timeline(&analysis.timeline_view)?;

    let updated = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "UPDATE topics
           SET overall_summary = ?2, consensus_view = ?3, timeline_view = ?4
           WHERE topic_id = ?1",
          rusqlite::params![
            id_str,
            analysis.overall_summary,
            analysis.consensus_view,
            timeline
          ],
        )?)
      })
      .await?;

    if updated == 0 {
      return Err(Error::TopicNotFound(topic_id));
    }
    Ok(())
  }

  // ── Arguments ─────────────────────────────────────────────────────────────

  async fn create_argument(&self, input: NewArgument) -> Result<Argument> {
    self.insert_argument(input, None).await
  }

  async fn create_verified_argument(
    &self,
    input: NewArgument,
    verdict: Verdict,
  ) -> Result<Argument> {
    self.insert_argument(input, Some(verdict)).await
  }

  async fn get_argument(&self, argument_id: i64) -> Result<Option<Argument>> {
    let raw = self
      .conn
      .call(move |conn| Ok(select_argument(conn, argument_id)?))
      .await?;

    raw.map(RawArgument::into_argument).transpose()
  }

  async fn get_arguments(
    &self,
    topic_id: Uuid,
    side: Option<Side>,
    order: ArgumentOrder,
  ) -> Result<Vec<Argument>> {
    let topic_str = encode_uuid(topic_id);
    let side_str = side.map(|s| s.as_ref().to_owned());

    let raws: Vec<RawArgument> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {ARGUMENT_COLUMNS} FROM arguments
           WHERE topic_id = ?1 AND (?2 IS NULL OR side = ?2)
           ORDER BY created_at ASC, argument_id ASC"
        ))?;
        let rows = stmt
          .query_map(rusqlite::params![topic_str, side_str], RawArgument::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    let mut arguments = raws
      .into_iter()
      .map(RawArgument::into_argument)
      .collect::<Result<Vec<_>>>()?;

    if order == ArgumentOrder::Validity {
      sort_for_display(&mut arguments);
    }
    Ok(arguments)
  }

  async fn update_argument(&self, argument_id: i64, edit: ArgumentEdit) -> Result<Argument> {
    let raw: Option<RawArgument> = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        let updated = tx.execute(
          "UPDATE arguments SET title = ?2, content = ?3, sources = ?4
           WHERE argument_id = ?1",
          rusqlite::params![argument_id, edit.title, edit.content, edit.sources],
        )?;
        if updated == 0 {
          return Ok(None);
        }
        tx.execute(
          "DELETE FROM argument_matches WHERE topic_id =
             (SELECT topic_id FROM arguments WHERE argument_id = ?1)",
          rusqlite::params![argument_id],
        )?;
        let raw = select_argument(&tx, argument_id)?;
        tx.commit()?;
        Ok(raw)
      })
      .await?;

    raw
      .ok_or(Error::ArgumentNotFound(argument_id))?
      .into_argument()
  }

  async fn update_argument_validity(&self, argument_id: i64, verdict: Verdict) -> Result<()> {
    let urls = encode_urls(&verdict.key_urls)?;
    let now  = encode_dt(Utc::now());

    let updated = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "UPDATE arguments
           SET validity_score = ?2, validity_reasoning = ?3,
               validity_checked_at = ?4, key_urls = ?5
           WHERE argument_id = ?1",
          rusqlite::params![
            argument_id,
            verdict.validity_score,
            verdict.reasoning,
            now,
            urls
          ],
        )?)
      })
      .await?;

    if updated == 0 {
      return Err(Error::ArgumentNotFound(argument_id));
    }
    Ok(())
  }

  // ── Argument matches ──────────────────────────────────────────────────────

  async fn get_argument_matches(&self, topic_id: Uuid) -> Result<Vec<ArgumentMatch>> {
    let topic_str = encode_uuid(topic_id);

    let matches = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(
          "SELECT pro_id, con_id, reason FROM argument_matches
           WHERE topic_id = ?1 ORDER BY pro_id, con_id",
        )?;
        let rows = stmt
          .query_map(rusqlite::params![topic_str], |r| {
            Ok(ArgumentMatch {
              pro_id: r.get(0)?,
              con_id: r.get(1)?,
              reason: r.get(2)?,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    Ok(matches)
  }

  async fn save_argument_matches(
    &self,
    topic_id: Uuid,
    matches: Vec<ArgumentMatch>,
  ) -> Result<()> {
    let topic_str = encode_uuid(topic_id);

    let found = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        if !topic_exists(&tx, &topic_str)? {
          return Ok(false);
        }
        tx.execute(
          "DELETE FROM argument_matches WHERE topic_id = ?1",
          rusqlite::params![topic_str],
        )?;
        for m in &matches {
          tx.execute(
            "INSERT INTO argument_matches (topic_id, pro_id, con_id, reason)
             VALUES (?1, ?2, ?3, ?4)",
            rusqlite::params![topic_str, m.pro_id, m.con_id, m.reason],
          )?;
        }
        tx.commit()?;
        Ok(true)
      })
      .await?;

    if !found {
      return Err(Error::TopicNotFound(topic_id));
    }
    Ok(())
  }

  async fn clear_argument_matches(&self, topic_id: Uuid) -> Result<()> {
    let topic_str = encode_uuid(topic_id);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "DELETE FROM argument_matches WHERE topic_id = ?1",
          rusqlite::params![topic_str],
        )?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  // ── Votes and comments ────────────────────────────────────────────────────

  async fn cast_vote(
    &self,
    argument_id: i64,
    user_id: Uuid,
    direction: VoteDirection,
  ) -> Result<VoteTally> {
    let user_str = encode_uuid(user_id);
    let weight   = direction.weight();
    let now      = encode_dt(Utc::now());

    let outcome: Option<(i64, Option<i64>)> = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        if select_argument(&tx, argument_id)?.is_none() {
          return Ok(None);
        }

        let standing: Option<i64> = tx
          .query_row(
            "SELECT weight FROM argument_votes WHERE argument_id = ?1 AND user_id = ?2",
            rusqlite::params![argument_id, user_str],
            |r| r.get(0),
          )
          .optional()?;

        let user_vote = if standing == Some(weight) {
          tx.execute(
            "DELETE FROM argument_votes WHERE argument_id = ?1 AND user_id = ?2",
            rusqlite::params![argument_id, user_str],
          )?;
          None
        } else {
          tx.execute(
            "INSERT INTO argument_votes (argument_id, user_id, weight, cast_at)
             VALUES (?1, ?2, ?3, ?4)
             ON CONFLICT (argument_id, user_id)
             DO UPDATE SET weight = excluded.weight, cast_at = excluded.cast_at",
            rusqlite::params![argument_id, user_str, weight, now],
          )?;
          Some(weight)
        };

        tx.execute(
          "UPDATE arguments SET votes =
             (SELECT COALESCE(SUM(weight), 0) FROM argument_votes WHERE argument_id = ?1)
           WHERE argument_id = ?1",
          rusqlite::params![argument_id],
        )?;
        let votes: i64 = tx.query_row(
          "SELECT votes FROM arguments WHERE argument_id = ?1",
          rusqlite::params![argument_id],
          |r| r.get(0),
        )?;
        tx.commit()?;
        Ok(Some((votes, user_vote)))
      })
      .await?;

    let (votes, user_vote) = outcome.ok_or(Error::ArgumentNotFound(argument_id))?;
    Ok(VoteTally {
      argument_id,
      votes,
      user_vote: user_vote.map(VoteDirection::from_weight).transpose()?,
    })
  }

  async fn create_comment(&self, input: NewComment) -> Result<Comment> {
    let argument_id = input.argument_id;
    let user_str    = input.user_id.map(encode_uuid);
    let now         = encode_dt(Utc::now());

    let raw: Option<RawComment> = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        if select_argument(&tx, argument_id)?.is_none() {
          return Ok(None);
        }
        tx.execute(
          "INSERT INTO comments (argument_id, comment, user_id, created_at)
           VALUES (?1, ?2, ?3, ?4)",
          rusqlite::params![argument_id, input.comment, user_str, now],
        )?;
        let raw = RawComment {
          comment_id: tx.last_insert_rowid(),
          argument_id,
          comment: input.comment,
          user_id: user_str,
          created_at: now,
        };
        tx.commit()?;
        Ok(Some(raw))
      })
      .await?;

    raw
      .ok_or(Error::ArgumentNotFound(argument_id))?
      .into_comment()
  }

  async fn get_comments(&self, argument_id: i64) -> Result<Vec<Comment>> {
    let raws: Vec<RawComment> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(
          "SELECT comment_id, argument_id, comment, user_id, created_at
           FROM comments WHERE argument_id = ?1
           ORDER BY created_at ASC, comment_id ASC",
        )?;
        let rows = stmt
          .query_map(rusqlite::params![argument_id], |r| {
            Ok(RawComment {
              comment_id:  r.get(0)?,
              argument_id: r.get(1)?,
              comment:     r.get(2)?,
              user_id:     r.get(3)?,
              created_at:  r.get(4)?,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawComment::into_comment).collect()
  }

  // ── External API usage ────────────────────────────────────────────────────

  async fn api_call_count<'a>(&'a self, api_name: &'a str) -> Result<u64> {
    let name = api_name.to_owned();

    let count: Option<i64> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              "SELECT call_count FROM api_usage WHERE api_name = ?1",
              rusqlite::params![name],
              |r| r.get(0),
            )
            .optional()?,
        )
      })
      .await?;

    Ok(count.map_or(0, |n| n.max(0).unsigned_abs()))
  }

  async fn record_api_calls<'a>(&'a self, api_name: &'a str, calls: u64) -> Result<u64> {
    let name  = api_name.to_owned();
    let calls = i64::try_from(calls).unwrap_or(i64::MAX);
    let now   = encode_dt(Utc::now());

    let total: i64 = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        tx.execute(
          "INSERT INTO api_usage (api_name, call_count, last_reset) VALUES (?1, ?2, ?3)
           ON CONFLICT (api_name) DO UPDATE SET call_count = call_count + excluded.call_count",
          rusqlite::params![name, calls, now],
        )?;
        let total = tx.query_row(
          "SELECT call_count FROM api_usage WHERE api_name = ?1",
          rusqlite::params![name],
          |r| r.get(0),
        )?;
        tx.commit()?;
        Ok(total)
      })
      .await?;

    tracing::debug!(api = api_name, calls, total, "recorded external API calls");
    Ok(total.max(0).unsigned_abs())
  }
}
