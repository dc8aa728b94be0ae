//! The `DebateStore` trait.
//!
//! The trait is implemented by storage backends (e.g. `rostra-store-sqlite`).
//! The orchestration engine and the HTTP layer depend on this abstraction,
//! not on any concrete backend.

use std::future::Future;

use uuid::Uuid;

use crate::{
  argument::{Argument, ArgumentEdit, ArgumentOrder, NewArgument, Side, Verdict},
  engagement::{ArgumentMatch, Comment, NewComment, VoteDirection, VoteTally},
  topic::{NewTopic, Topic, TopicAnalysis, TopicSummary},
  user::{NewUserProfile, UserProfile},
};

/// Abstraction over a Rostra storage backend.
///
/// Every method is a single atomic operation from the caller's perspective.
/// All methods return `Send` futures so the trait can be used in
/// multi-threaded async runtimes (e.g. tokio with `axum`).
pub trait DebateStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  // ── Users ─────────────────────────────────────────────────────────────

  /// Return the profile for `input.user_id`, creating it if absent.
  ///
  /// An existing profile is returned unchanged. A new profile whose preferred
  /// username is taken gets a short suffix derived from its UUID.
  fn ensure_user_profile(
    &self,
    input: NewUserProfile,
  ) -> impl Future<Output = Result<UserProfile, Self::Error>> + Send + '_;

  /// Create or refresh a profile from the identity provider's current claims.
  fn sync_user_profile(
    &self,
    input: NewUserProfile,
  ) -> impl Future<Output = Result<UserProfile, Self::Error>> + Send + '_;

  fn get_user_profile(
    &self,
    user_id: Uuid,
  ) -> impl Future<Output = Result<Option<UserProfile>, Self::Error>> + Send + '_;

  /// Delete a profile. Authored topics, arguments and comments survive with
  /// their `user_id` cleared. Returns `false` if no profile existed.
  fn delete_user_profile(
    &self,
    user_id: Uuid,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  /// Number of topics plus arguments created by `user_id`.
  fn contribution_count(
    &self,
    user_id: Uuid,
  ) -> impl Future<Output = Result<u32, Self::Error>> + Send + '_;

  // ── Topics ────────────────────────────────────────────────────────────

  fn create_topic(
    &self,
    input: NewTopic,
  ) -> impl Future<Output = Result<Topic, Self::Error>> + Send + '_;

  /// Retrieve a topic by UUID. Returns `None` if not found.
  fn get_topic(
    &self,
    topic_id: Uuid,
  ) -> impl Future<Output = Result<Option<Topic>, Self::Error>> + Send + '_;

  /// All topics with argument counts and validity averages, newest first.
  fn list_topics(
    &self,
  ) -> impl Future<Output = Result<Vec<TopicSummary>, Self::Error>> + Send + '_;

  /// Write all three analysis fields at once, replacing any previous value.
  fn update_topic_analysis(
    &self,
    topic_id: Uuid,
    analysis: TopicAnalysis,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  // ── Arguments ─────────────────────────────────────────────────────────

  /// Persist a new, unverified argument.
  fn create_argument(
    &self,
    input: NewArgument,
  ) -> impl Future<Output = Result<Argument, Self::Error>> + Send + '_;

  /// Persist a new argument together with its verdict in one write.
  fn create_verified_argument(
    &self,
    input: NewArgument,
    verdict: Verdict,
  ) -> impl Future<Output = Result<Argument, Self::Error>> + Send + '_;

  fn get_argument(
    &self,
    argument_id: i64,
  ) -> impl Future<Output = Result<Option<Argument>, Self::Error>> + Send + '_;

  /// Arguments of a topic, optionally restricted to one side.
  fn get_arguments(
    &self,
    topic_id: Uuid,
    side: Option<Side>,
    order: ArgumentOrder,
  ) -> impl Future<Output = Result<Vec<Argument>, Self::Error>> + Send + '_;

  /// Replace an argument's title, content and sources.
  ///
  /// Validity is left untouched; the owning topic's stored argument matches
  /// are cleared in the same write.
  fn update_argument(
    &self,
    argument_id: i64,
    edit: ArgumentEdit,
  ) -> impl Future<Output = Result<Argument, Self::Error>> + Send + '_;

  /// Record a verdict on an argument; `validity_checked_at` is set by the
  /// store.
  fn update_argument_validity(
    &self,
    argument_id: i64,
    verdict: Verdict,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  // ── Argument matches ──────────────────────────────────────────────────

  fn get_argument_matches(
    &self,
    topic_id: Uuid,
  ) -> impl Future<Output = Result<Vec<ArgumentMatch>, Self::Error>> + Send + '_;

  /// Replace the stored matches of a topic.
  fn save_argument_matches(
    &self,
    topic_id: Uuid,
    matches: Vec<ArgumentMatch>,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  fn clear_argument_matches(
    &self,
    topic_id: Uuid,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  // ── Votes and comments ────────────────────────────────────────────────

  /// Cast, switch or withdraw `user_id`'s vote on an argument.
  fn cast_vote(
    &self,
    argument_id: i64,
    user_id: Uuid,
    direction: VoteDirection,
  ) -> impl Future<Output = Result<VoteTally, Self::Error>> + Send + '_;

  fn create_comment(
    &self,
    input: NewComment,
  ) -> impl Future<Output = Result<Comment, Self::Error>> + Send + '_;

  /// Comments on an argument, oldest first.
  fn get_comments(
    &self,
    argument_id: i64,
  ) -> impl Future<Output = Result<Vec<Comment>, Self::Error>> + Send + '_;

  // ── External API usage ────────────────────────────────────────────────

  /// Calls recorded so far against the named external service.
  fn api_call_count<'a>(
    &'a self,
    api_name: &'a str,
  ) -> impl Future<Output = Result<u64, Self::Error>> + Send + 'a;

  /// Add `calls` to the named service's counter; returns the new total.
  fn record_api_calls<'a>(
    &'a self,
    api_name: &'a str,
    calls: u64,
  ) -> impl Future<Output = Result<u64, Self::Error>> + Send + 'a;
}
