//! Integration tests for `SqliteStore` against an in-memory database.

use rostra_core::{
  argument::{ArgumentEdit, ArgumentOrder, NewArgument, Side, Verdict},
  engagement::{ArgumentMatch, NewComment, VoteDirection},
  store::DebateStore,
  topic::{ControversyLevel, NewTopic, TimelineEvent, TopicAnalysis},
  user::NewUserProfile,
};
use uuid::Uuid;

use crate::{Error, SqliteStore};

async fn store() -> SqliteStore {
  SqliteStore::open_in_memory()
    .await
    .expect("in-memory store")
}

async fn topic(s: &SqliteStore, user_id: Option<Uuid>) -> Uuid {
  s.create_topic(NewTopic {
    proposition: "Public transit should be free at the point of use.".into(),
    created_by:  "ana".into(),
    user_id,
  })
  .await
  .unwrap()
  .topic_id
}

fn new_argument(topic_id: Uuid, side: Side, title: &str) -> NewArgument {
  NewArgument {
    topic_id,
    side,
    title: title.into(),
    content: format!("{title}, argued at length."),
    sources: None,
    author: "ben".into(),
    user_id: None,
  }
}

fn verdict(score: u8) -> Verdict {
  Verdict {
    is_relevant:    true,
    validity_score: score,
    reasoning:      format!("scored {score}"),
    key_urls:       vec!["https://example.org/study".into()],
  }
}

fn profile(user_id: Uuid, username: &str) -> NewUserProfile {
  NewUserProfile {
    user_id,
    username: username.into(),
    email: format!("{username}@example.org"),
    avatar_url: None,
  }
}

// ─── Topics ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn create_and_get_topic() {
  let s = store().await;
  let id = topic(&s, None).await;

  let fetched = s.get_topic(id).await.unwrap().unwrap();
  assert_eq!(fetched.topic_id, id);
  assert_eq!(fetched.created_by, "ana");
  assert!(fetched.analysis.is_none());
}

#[tokio::test]
async fn get_topic_missing_returns_none() {
  let s = store().await;
  assert!(s.get_topic(Uuid::new_v4()).await.unwrap().is_none());
}

#[tokio::test]
async fn analysis_is_written_whole_and_decoded() {
  let s = store().await;
  let id = topic(&s, None).await;

  let analysis = TopicAnalysis {
    overall_summary: "Both sides cite cost.".into(),
    consensus_view:  "Fares matter less than frequency.".into(),
    timeline_view:   vec![
      TimelineEvent { period: "Opening".into(), description: "Cost framing".into() },
      TimelineEvent { period: "Rebuttal".into(), description: "Equity framing".into() },
    ],
  };
  s.update_topic_analysis(id, analysis.clone()).await.unwrap();

  let fetched = s.get_topic(id).await.unwrap().unwrap();
  assert_eq!(fetched.analysis, Some(analysis));
}

#[tokio::test]
async fn empty_timeline_is_still_a_set_analysis() {
  let s = store().await;
  let id = topic(&s, None).await;

  s.update_topic_analysis(id, TopicAnalysis {
    overall_summary: "s".into(),
    consensus_view:  "c".into(),
    timeline_view:   vec![],
  })
  .await
  .unwrap();

  let analysis = s.get_topic(id).await.unwrap().unwrap().analysis.unwrap();
  assert!(analysis.timeline_view.is_empty());
}

#[tokio::test]
async fn analysis_for_missing_topic_errors() {
  let s = store().await;
  let err = s
    .update_topic_analysis(Uuid::new_v4(), TopicAnalysis {
      overall_summary: "s".into(),
      consensus_view:  "c".into(),
      timeline_view:   vec![],
    })
    .await
    .unwrap_err();
  assert!(matches!(err, Error::TopicNotFound(_)));
}

#[tokio::test]
async fn list_topics_aggregates_sides() {
  let s = store().await;
  let id = topic(&s, None).await;

  for (i, score) in [Some(80), Some(71), None, None].into_iter().enumerate() {
    let input = new_argument(id, Side::Pro, &format!("pro {i}"));
    match score {
      Some(score) => s.create_verified_argument(input, verdict(score)).await.unwrap(),
      None => s.create_argument(input).await.unwrap(),
    };
  }
  for i in 0..3 {
    s.create_argument(new_argument(id, Side::Con, &format!("con {i}")))
      .await
      .unwrap();
  }

  let listed = s.list_topics().await.unwrap();
  assert_eq!(listed.len(), 1);
  let summary = &listed[0];
  assert_eq!(summary.pro_count, 4);
  assert_eq!(summary.con_count, 3);
  assert_eq!(summary.pro_avg_validity, Some(75.5));
  assert_eq!(summary.con_avg_validity, None);
  assert_eq!(summary.controversy_level, Some(ControversyLevel::HighlyContested));
}

#[tokio::test]
async fn list_topics_newest_first() {
  let s = store().await;
  let first = topic(&s, None).await;
  let second = topic(&s, None).await;

  let ids: Vec<_> = s.list_topics().await.unwrap().into_iter().map(|t| t.topic_id).collect();
  assert_eq!(ids, vec![second, first]);
}

// ─── Arguments ───────────────────────────────────────────────────────────────

#[tokio::test]
async fn create_argument_starts_unverified() {
  let s = store().await;
  let id = topic(&s, None).await;

  let arg = s.create_argument(new_argument(id, Side::Con, "Costs")).await.unwrap();
  assert_eq!(arg.votes, 0);
  assert!(!arg.is_verified());
  assert_eq!(arg.side, Side::Con);
}

#[tokio::test]
async fn create_verified_argument_stores_validity() {
  let s = store().await;
  let id = topic(&s, None).await;

  let arg = s
    .create_verified_argument(new_argument(id, Side::Pro, "Access"), verdict(64))
    .await
    .unwrap();
  let validity = arg.validity.unwrap();
  assert_eq!(validity.score, 64);
  assert_eq!(validity.key_urls, vec!["https://example.org/study"]);
}

#[tokio::test]
async fn argument_on_missing_topic_errors() {
  let s = store().await;
  let err = s
    .create_argument(new_argument(Uuid::new_v4(), Side::Pro, "Orphan"))
    .await
    .unwrap_err();
  assert!(matches!(err, Error::TopicNotFound(_)));
}

#[tokio::test]
async fn get_arguments_filters_by_side() {
  let s = store().await;
  let id = topic(&s, None).await;
  s.create_argument(new_argument(id, Side::Pro, "a")).await.unwrap();
  s.create_argument(new_argument(id, Side::Con, "b")).await.unwrap();
  s.create_argument(new_argument(id, Side::Pro, "c")).await.unwrap();

  let pros = s.get_arguments(id, Some(Side::Pro), ArgumentOrder::Chronological).await.unwrap();
  assert_eq!(pros.iter().map(|a| a.title.as_str()).collect::<Vec<_>>(), vec!["a", "c"]);

  let all = s.get_arguments(id, None, ArgumentOrder::Chronological).await.unwrap();
  assert_eq!(all.len(), 3);
}

#[tokio::test]
async fn validity_order_puts_verified_first() {
  let s = store().await;
  let id = topic(&s, None).await;
  let low = s
    .create_verified_argument(new_argument(id, Side::Pro, "low"), verdict(20))
    .await
    .unwrap();
  let none = s.create_argument(new_argument(id, Side::Pro, "none")).await.unwrap();
  let high = s
    .create_verified_argument(new_argument(id, Side::Pro, "high"), verdict(90))
    .await
    .unwrap();

  let ordered = s.get_arguments(id, None, ArgumentOrder::Validity).await.unwrap();
  let ids: Vec<_> = ordered.iter().map(|a| a.argument_id).collect();
  assert_eq!(ids, vec![high.argument_id, low.argument_id, none.argument_id]);
}

#[tokio::test]
async fn update_validity_sets_all_fields() {
  let s = store().await;
  let id = topic(&s, None).await;
  let arg = s.create_argument(new_argument(id, Side::Con, "x")).await.unwrap();

  s.update_argument_validity(arg.argument_id, verdict(33)).await.unwrap();
  let fetched = s.get_argument(arg.argument_id).await.unwrap().unwrap();
  let validity = fetched.validity.unwrap();
  assert_eq!(validity.score, 33);
  assert_eq!(validity.reasoning, "scored 33");
}

#[tokio::test]
async fn update_validity_missing_argument_errors() {
  let s = store().await;
  let err = s.update_argument_validity(404, verdict(1)).await.unwrap_err();
  assert!(matches!(err, Error::ArgumentNotFound(404)));
}

#[tokio::test]
async fn edit_keeps_validity_and_clears_matches() {
  let s = store().await;
  let id = topic(&s, None).await;
  let pro = s
    .create_verified_argument(new_argument(id, Side::Pro, "p"), verdict(70))
    .await
    .unwrap();
  let con = s.create_argument(new_argument(id, Side::Con, "c")).await.unwrap();
  s.save_argument_matches(id, vec![ArgumentMatch {
    pro_id: pro.argument_id,
    con_id: con.argument_id,
    reason: Some("both about cost".into()),
  }])
  .await
  .unwrap();
  assert_eq!(s.get_argument_matches(id).await.unwrap().len(), 1);

  let edited = s
    .update_argument(pro.argument_id, ArgumentEdit {
      title:   "p, revised".into(),
      content: "new content".into(),
      sources: Some("https://example.org".into()),
    })
    .await
    .unwrap();

  assert_eq!(edited.title, "p, revised");
  assert_eq!(edited.validity_score(), Some(70));
  assert!(s.get_argument_matches(id).await.unwrap().is_empty());
}

#[tokio::test]
async fn save_matches_replaces_previous_set() {
  let s = store().await;
  let id = topic(&s, None).await;
  let p1 = s.create_argument(new_argument(id, Side::Pro, "p1")).await.unwrap();
  let p2 = s.create_argument(new_argument(id, Side::Pro, "p2")).await.unwrap();
  let c = s.create_argument(new_argument(id, Side::Con, "c")).await.unwrap();

  let pair = |pro: i64| ArgumentMatch { pro_id: pro, con_id: c.argument_id, reason: None };
  s.save_argument_matches(id, vec![pair(p1.argument_id)]).await.unwrap();
  s.save_argument_matches(id, vec![pair(p2.argument_id)]).await.unwrap();

  assert_eq!(s.get_argument_matches(id).await.unwrap(), vec![pair(p2.argument_id)]);

  s.clear_argument_matches(id).await.unwrap();
  assert!(s.get_argument_matches(id).await.unwrap().is_empty());
}

// ─── Votes and comments ──────────────────────────────────────────────────────

#[tokio::test]
async fn votes_toggle_and_switch() {
  let s = store().await;
  let id = topic(&s, None).await;
  let arg = s.create_argument(new_argument(id, Side::Pro, "v")).await.unwrap();
  let (alice, bob) = (Uuid::new_v4(), Uuid::new_v4());

  let t = s.cast_vote(arg.argument_id, alice, VoteDirection::Up).await.unwrap();
  assert_eq!((t.votes, t.user_vote), (1, Some(VoteDirection::Up)));

  let t = s.cast_vote(arg.argument_id, bob, VoteDirection::Up).await.unwrap();
  assert_eq!(t.votes, 2);

  // Switching replaces the standing vote.
  let t = s.cast_vote(arg.argument_id, alice, VoteDirection::Down).await.unwrap();
  assert_eq!((t.votes, t.user_vote), (0, Some(VoteDirection::Down)));

  // Repeating withdraws it.
  let t = s.cast_vote(arg.argument_id, alice, VoteDirection::Down).await.unwrap();
  assert_eq!((t.votes, t.user_vote), (1, None));

  let stored = s.get_argument(arg.argument_id).await.unwrap().unwrap();
  assert_eq!(stored.votes, 1);
}

#[tokio::test]
async fn vote_on_missing_argument_errors() {
  let s = store().await;
  let err = s.cast_vote(9, Uuid::new_v4(), VoteDirection::Up).await.unwrap_err();
  assert!(matches!(err, Error::ArgumentNotFound(9)));
}

#[tokio::test]
async fn comments_are_listed_oldest_first() {
  let s = store().await;
  let id = topic(&s, None).await;
  let arg = s.create_argument(new_argument(id, Side::Con, "c")).await.unwrap();

  for text in ["first", "second"] {
    s.create_comment(NewComment {
      argument_id: arg.argument_id,
      comment:     text.into(),
      user_id:     None,
    })
    .await
    .unwrap();
  }

  let comments = s.get_comments(arg.argument_id).await.unwrap();
  let texts: Vec<_> = comments.iter().map(|c| c.comment.as_str()).collect();
  assert_eq!(texts, vec!["first", "second"]);
}

// ─── Users ───────────────────────────────────────────────────────────────────

#[tokio::test]
async fn ensure_profile_is_idempotent() {
  let s = store().await;
  let id = Uuid::new_v4();

  let first = s.ensure_user_profile(profile(id, "carla")).await.unwrap();
  let mut changed = profile(id, "someone-else");
  changed.email = "new@example.org".into();
  let second = s.ensure_user_profile(changed).await.unwrap();

  assert_eq!(first.username, "carla");
  assert_eq!(second.username, "carla");
  assert_eq!(second.email, "carla@example.org");
}

#[tokio::test]
async fn sync_profile_refreshes_claims() {
  let s = store().await;
  let id = Uuid::new_v4();
  s.ensure_user_profile(profile(id, "dee")).await.unwrap();

  let mut claims = profile(id, "dee");
  claims.email = "dee@new.example.org".into();
  claims.avatar_url = Some("https://example.org/dee.png".into());
  let synced = s.sync_user_profile(claims).await.unwrap();

  assert_eq!(synced.email, "dee@new.example.org");
  assert_eq!(synced.avatar_url.as_deref(), Some("https://example.org/dee.png"));
}

#[tokio::test]
async fn colliding_username_gets_suffix() {
  let s = store().await;
  let (a, b) = (Uuid::new_v4(), Uuid::new_v4());
  s.ensure_user_profile(profile(a, "eve")).await.unwrap();

  let second = s.ensure_user_profile(profile(b, "eve")).await.unwrap();
  let expected = format!("eve-{}", &b.simple().to_string()[..8]);
  assert_eq!(second.username, expected);
}

#[tokio::test]
async fn contributions_count_topics_and_arguments() {
  let s = store().await;
  let user = Uuid::new_v4();
  s.ensure_user_profile(profile(user, "finn")).await.unwrap();

  let id = topic(&s, Some(user)).await;
  let mut input = new_argument(id, Side::Pro, "mine");
  input.user_id = Some(user);
  s.create_argument(input).await.unwrap();
  s.create_argument(new_argument(id, Side::Con, "not mine")).await.unwrap();

  assert_eq!(s.contribution_count(user).await.unwrap(), 2);
  assert_eq!(s.contribution_count(Uuid::new_v4()).await.unwrap(), 0);
}

#[tokio::test]
async fn deleting_profile_orphans_content() {
  let s = store().await;
  let user = Uuid::new_v4();
  s.ensure_user_profile(profile(user, "gus")).await.unwrap();
  let id = topic(&s, Some(user)).await;

  assert!(s.delete_user_profile(user).await.unwrap());
  assert!(!s.delete_user_profile(user).await.unwrap());

  assert!(s.get_user_profile(user).await.unwrap().is_none());
  let t = s.get_topic(id).await.unwrap().unwrap();
  assert!(t.user_id.is_none());
  assert_eq!(t.created_by, "ana");
}

// ─── API usage ───────────────────────────────────────────────────────────────

#[tokio::test]
async fn api_usage_accumulates_per_service() {
  let s = store().await;
  assert_eq!(s.api_call_count("anthropic").await.unwrap(), 0);

  assert_eq!(s.record_api_calls("anthropic", 2).await.unwrap(), 2);
  assert_eq!(s.record_api_calls("anthropic", 3).await.unwrap(), 5);
  assert_eq!(s.record_api_calls("search", 1).await.unwrap(), 1);

  assert_eq!(s.api_call_count("anthropic").await.unwrap(), 5);
}
