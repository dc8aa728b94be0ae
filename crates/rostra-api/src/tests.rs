//! Router tests: an in-memory store, a scripted model and a fixed set of
//! bearer tokens, driven through `tower::ServiceExt::oneshot`.

use std::sync::Arc;

use axum::{
  body::Body,
  http::{Request, StatusCode, header},
};
use rostra_core::{
  argument::{NewArgument, Side},
  engagement::ArgumentMatch,
  store::DebateStore,
  topic::NewTopic,
};
use rostra_engine::DebateEngine;
use rostra_llm::{CompletionRequest, ModelTier, scripted::ScriptedModel};
use rostra_store_sqlite::SqliteStore;
use serde_json::{Value, json};
use tower::ServiceExt as _;
use uuid::Uuid;

use crate::{
  AppState, Limits,
  auth::{Identity, IdentityError, IdentityMetadata, IdentityProvider},
  quota::MODEL_API,
  router,
};

// ─── Fixtures ────────────────────────────────────────────────────────────────

const ANA: &str = "ana-token";
const BEN: &str = "ben-token";
/// Verifying this token fails as if the provider were down.
const OUTAGE: &str = "outage-token";

/// Accepts exactly the tokens it was built with. [`OUTAGE`] reports the
/// provider as unreachable.
struct StaticIdentity {
  users: Vec<(&'static str, Identity)>,
}

impl StaticIdentity {
  fn new() -> Self {
    let user = |n: u128, full_name: &str, email: &str| Identity {
      user_id:  Uuid::from_u128(n),
      email:    Some(email.to_owned()),
      metadata: IdentityMetadata {
        full_name:  Some(full_name.to_owned()),
        name:       None,
        avatar_url: None,
      },
    };
    Self {
      users: vec![
        (ANA, user(1, "Ana", "ana@example.org")),
        (BEN, user(2, "Ben", "ben@example.org")),
      ],
    }
  }
}

impl IdentityProvider for StaticIdentity {
  async fn verify<'a>(&'a self, token: &'a str) -> Result<Identity, IdentityError> {
    if token == OUTAGE {
      return Err(IdentityError::Unavailable("provider returned 502 Bad Gateway".into()));
    }
    self
      .users
      .iter()
      .find(|(t, _)| *t == token)
      .map(|(_, identity)| identity.clone())
      .ok_or(IdentityError::Rejected)
  }
}

type TestState = AppState<SqliteStore, ScriptedModel, StaticIdentity>;

struct Harness {
  state:    TestState,
  store:    Arc<SqliteStore>,
  model:    Arc<ScriptedModel>,
  topic_id: Uuid,
}

/// Fact-checks score from a `score=NN` marker in the title and reject titles
/// marked `[irrelevant]`; proposition reviews accept anything; analyses are
/// fixed.
fn respond(req: &CompletionRequest) -> rostra_llm::Result<String> {
  match req.tier {
    ModelTier::Fast => {
      let score = req
        .prompt
        .split("score=")
        .nth(1)
        .and_then(|rest| rest.split(|c: char| !c.is_ascii_digit()).next())
        .and_then(|digits| digits.parse::<u8>().ok())
        .unwrap_or(60);
      let relevant = !req.prompt.contains("[irrelevant]");
      Ok(format!(
        r#"{{"is_relevant": {relevant}, "validity_score": {score},
            "reasoning": "Weighed against the proposition.", "key_urls": []}}"#
      ))
    }
    ModelTier::Standard if req.prompt.contains("<user_proposition>") => Ok(
      r#"{"original_input": "pineapple pizza",
          "is_valid": true,
          "rejection_reason": null,
          "interpretation": "Whether pineapple belongs on pizza.",
          "suggestions": [
            {"proposition": "Pineapple is a good pizza topping.", "type": "value"},
            {"proposition": "Pizzerias should offer pineapple.", "type": "policy"},
            {"proposition": "Most diners enjoy pineapple on pizza.", "type": "fact"},
            {"proposition": "Pineapple improves pizza.", "type": "value"},
            {"proposition": "Italy should accept pineapple pizza.", "type": "policy"}
          ]}"#
        .into(),
    ),
    ModelTier::Standard => Ok(
      r#"{"overall_summary": "Both sides argue from cost.",
          "consensus_view": "Evidence leans pro.",
          "timeline_view": []}"#
        .into(),
    ),
  }
}

async fn harness_with(model: ScriptedModel, limits: Limits) -> Harness {
  let store = Arc::new(SqliteStore::open_in_memory().await.unwrap());
  let model = Arc::new(model);
  let topic = store
    .create_topic(NewTopic {
      proposition: "Cities should make public transit free.".into(),
      created_by:  "founder".into(),
      user_id:     None,
    })
    .await
    .unwrap();
  let state = AppState {
    engine: DebateEngine::new(Arc::clone(&store), Arc::clone(&model)),
    identity: Arc::new(StaticIdentity::new()),
    limits,
  };
  Harness { state, store, model, topic_id: topic.topic_id }
}

async fn harness() -> Harness {
  harness_with(ScriptedModel::from_fn(respond), Limits::default()).await
}

async fn send(
  state: &TestState,
  method: &str,
  uri: &str,
  token: Option<&str>,
  body: Option<Value>,
) -> (StatusCode, Value) {
  let mut builder = Request::builder().method(method).uri(uri);
  if let Some(token) = token {
    builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
  }
  let body = match body {
    Some(v) => {
      builder = builder.header(header::CONTENT_TYPE, "application/json");
      Body::from(serde_json::to_vec(&v).unwrap())
    }
    None => Body::empty(),
  };
  let resp = router(state.clone()).oneshot(builder.body(body).unwrap()).await.unwrap();
  let status = resp.status();
  let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
  let json = if bytes.is_empty() { Value::Null } else { serde_json::from_slice(&bytes).unwrap() };
  (status, json)
}

async fn model_calls_recorded(store: &SqliteStore) -> u64 {
  store.api_call_count(MODEL_API).await.unwrap()
}

fn unverified(topic_id: Uuid, side: Side, title: &str) -> NewArgument {
  NewArgument {
    topic_id,
    side,
    title: title.into(),
    content: format!("{title}, in detail."),
    sources: None,
    author: "guest".into(),
    user_id: None,
  }
}

fn argument_body(side: &str, title: &str) -> Value {
  json!({ "side": side, "title": title, "content": "Ridership rose where fares were dropped." })
}

// ─── Banner ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn banner_names_the_service() {
  let h = harness().await;
  let (status, body) = send(&h.state, "GET", "/", None, None).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body["service"], "rostra");
}

// ─── Proposition validation ──────────────────────────────────────────────────

#[tokio::test]
async fn validate_proposition_returns_suggestions_and_counts_the_call() {
  let h = harness().await;
  let (status, body) = send(
    &h.state,
    "POST",
    "/api/topics/validate-proposition",
    None,
    Some(json!({ "proposition": "pineapple pizza" })),
  )
  .await;

  assert_eq!(status, StatusCode::OK);
  assert_eq!(body["is_valid"], true);
  assert_eq!(body["suggestions"].as_array().unwrap().len(), 5);
  assert_eq!(body["suggestions"][1]["type"], "policy");
  assert_eq!(model_calls_recorded(&h.store).await, 1);
}

#[tokio::test]
async fn blank_proposition_is_rejected_without_a_model_call() {
  let h = harness().await;
  let (status, _) = send(
    &h.state,
    "POST",
    "/api/topics/validate-proposition",
    None,
    Some(json!({ "proposition": "   " })),
  )
  .await;

  assert_eq!(status, StatusCode::BAD_REQUEST);
  assert_eq!(h.model.call_count(), 0);
}

#[tokio::test]
async fn validation_past_the_model_ceiling_is_refused() {
  let limits = Limits { api_call_limit: 2, ..Limits::default() };
  let h = harness_with(ScriptedModel::from_fn(respond), limits).await;
  h.store.record_api_calls(MODEL_API, 2).await.unwrap();

  let (status, body) = send(
    &h.state,
    "POST",
    "/api/topics/validate-proposition",
    None,
    Some(json!({ "proposition": "pineapple pizza" })),
  )
  .await;

  assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);
  assert_eq!(body["error"], "model_call_limit_reached");
  assert_eq!(body["limit"], 2);
  assert_eq!(h.model.call_count(), 0);
}

#[tokio::test]
async fn validation_outage_is_503_and_still_counted() {
  let model = ScriptedModel::new();
  model.push_failure("connection reset");
  let h = harness_with(model, Limits::default()).await;

  let (status, body) = send(
    &h.state,
    "POST",
    "/api/topics/validate-proposition",
    None,
    Some(json!({ "proposition": "pineapple pizza" })),
  )
  .await;

  assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
  assert!(body["error"].is_string());
  assert_eq!(model_calls_recorded(&h.store).await, 1);
}

// ─── Topics ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn creating_a_topic_requires_a_valid_token() {
  let h = harness().await;
  let body = json!({ "proposition": "Homework should be optional." });

  let router_resp = router(h.state.clone())
    .oneshot(
      Request::builder()
        .method("POST")
        .uri("/api/topics")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap(),
    )
    .await
    .unwrap();
  assert_eq!(router_resp.status(), StatusCode::UNAUTHORIZED);
  assert_eq!(router_resp.headers().get(header::WWW_AUTHENTICATE).unwrap(), "Bearer");

  let (status, _) = send(&h.state, "POST", "/api/topics", Some("forged"), Some(body)).await;
  assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn created_topic_carries_the_profile_username() {
  let h = harness().await;
  let (status, topic) = send(
    &h.state,
    "POST",
    "/api/topics",
    Some(ANA),
    Some(json!({ "proposition": "  Homework should be optional.  " })),
  )
  .await;

  assert_eq!(status, StatusCode::CREATED);
  assert_eq!(topic["proposition"], "Homework should be optional.");
  assert_eq!(topic["created_by"], "Ana");
  assert!(topic.get("overall_summary").is_none());

  let (_, topics) = send(&h.state, "GET", "/api/topics", None, None).await;
  let topics = topics.as_array().unwrap();
  assert_eq!(topics.len(), 2);
  assert_eq!(topics[0]["topic_id"], topic["topic_id"]);
}

#[tokio::test]
async fn unknown_topic_is_404() {
  let h = harness().await;
  let uri = format!("/api/topics/{}", Uuid::new_v4());
  let (status, _) = send(&h.state, "GET", &uri, None, None).await;
  assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn topic_read_fills_in_verdicts_and_analysis() {
  let h = harness().await;
  h.store.create_argument(unverified(h.topic_id, Side::Pro, "Less traffic score=80")).await.unwrap();
  h.store.create_argument(unverified(h.topic_id, Side::Con, "Budget gap score=40")).await.unwrap();

  let uri = format!("/api/topics/{}", h.topic_id);
  let (status, topic) = send(&h.state, "GET", &uri, None, None).await;

  assert_eq!(status, StatusCode::OK);
  assert_eq!(topic["pro_arguments"][0]["validity_score"], 80);
  assert_eq!(topic["con_arguments"][0]["validity_score"], 40);
  assert_eq!(topic["overall_summary"], "Both sides argue from cost.");
  assert_eq!(model_calls_recorded(&h.store).await, 3);

  // A second read has nothing left to do.
  let (_, _) = send(&h.state, "GET", &uri, None, None).await;
  assert_eq!(h.model.call_count(), 3);
  assert_eq!(model_calls_recorded(&h.store).await, 3);
}

#[tokio::test]
async fn topic_read_past_the_ceiling_serves_stored_state() {
  let limits = Limits { api_call_limit: 0, ..Limits::default() };
  let h = harness_with(ScriptedModel::from_fn(respond), limits).await;
  h.store.create_argument(unverified(h.topic_id, Side::Pro, "Less traffic")).await.unwrap();

  let uri = format!("/api/topics/{}", h.topic_id);
  let (status, topic) = send(&h.state, "GET", &uri, None, None).await;

  assert_eq!(status, StatusCode::OK);
  assert!(topic["pro_arguments"][0].get("validity_score").is_none());
  assert_eq!(h.model.call_count(), 0);
}

#[tokio::test]
async fn summary_needs_both_sides() {
  let h = harness().await;
  h.store.create_argument(unverified(h.topic_id, Side::Pro, "Less traffic")).await.unwrap();

  let uri = format!("/api/topics/{}/generate-summary", h.topic_id);
  let (status, _) = send(&h.state, "POST", &uri, None, None).await;

  assert_eq!(status, StatusCode::BAD_REQUEST);
  assert_eq!(h.model.call_count(), 0);
  assert_eq!(model_calls_recorded(&h.store).await, 0);
}

#[tokio::test]
async fn verify_all_reports_each_check() {
  let model = ScriptedModel::new();
  model.push_reply(r#"{"is_relevant": true, "validity_score": 70, "reasoning": "ok", "key_urls": []}"#);
  model.push_failure("timeout");
  let h = harness_with(model, Limits::default()).await;
  let first = h.store.create_argument(unverified(h.topic_id, Side::Pro, "A")).await.unwrap();
  let second = h.store.create_argument(unverified(h.topic_id, Side::Con, "B")).await.unwrap();

  let uri = format!("/api/topics/{}/verify-all", h.topic_id);
  let (status, report) = send(&h.state, "POST", &uri, None, None).await;

  assert_eq!(status, StatusCode::OK);
  let checks = report["checks"].as_array().unwrap();
  assert_eq!(checks.len(), 2);
  assert_eq!(checks[0]["argument_id"], first.argument_id);
  assert_eq!(checks[0]["status"], "verified");
  assert_eq!(checks[1]["argument_id"], second.argument_id);
  assert_eq!(checks[1]["status"], "failed");
  assert_eq!(model_calls_recorded(&h.store).await, 2);
}

// ─── Arguments ───────────────────────────────────────────────────────────────

#[tokio::test]
async fn submitted_argument_is_created_verified() {
  let h = harness().await;
  let uri = format!("/api/topics/{}/arguments", h.topic_id);
  let (status, body) =
    send(&h.state, "POST", &uri, Some(ANA), Some(argument_body("pro", "Fewer cars score=77"))).await;

  assert_eq!(status, StatusCode::CREATED);
  let id = body["argument_id"].as_i64().unwrap();
  let stored = h.store.get_argument(id).await.unwrap().unwrap();
  assert_eq!(stored.validity_score(), Some(77));
  assert_eq!(stored.author, "Ana");
  assert_eq!(model_calls_recorded(&h.store).await, 1);
}

#[tokio::test]
async fn irrelevant_argument_is_422_and_not_stored() {
  let h = harness().await;
  let uri = format!("/api/topics/{}/arguments", h.topic_id);
  let (status, body) =
    send(&h.state, "POST", &uri, Some(ANA), Some(argument_body("con", "My cat [irrelevant]"))).await;

  assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
  assert_eq!(body["error"], "Argument not relevant");
  assert_eq!(body["reasoning"], "Weighed against the proposition.");
  assert!(body["message"].as_str().unwrap().contains("Cities should make public transit free."));

  let (_, listed) = send(&h.state, "GET", &uri, None, None).await;
  assert!(listed.as_array().unwrap().is_empty());
  assert_eq!(model_calls_recorded(&h.store).await, 1);
}

#[tokio::test]
async fn fact_check_outage_is_503_and_not_stored() {
  let model = ScriptedModel::new();
  model.push_failure("upstream 529");
  let h = harness_with(model, Limits::default()).await;
  let uri = format!("/api/topics/{}/arguments", h.topic_id);

  let (status, _) = send(&h.state, "POST", &uri, Some(ANA), Some(argument_body("pro", "A"))).await;

  assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
  let (_, listed) = send(&h.state, "GET", &uri, None, None).await;
  assert!(listed.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn contribution_quota_is_checked_before_the_fact_check() {
  let limits = Limits { contribution_limit: 1, ..Limits::default() };
  let h = harness_with(ScriptedModel::from_fn(respond), limits).await;
  let (status, _) = send(
    &h.state,
    "POST",
    "/api/topics",
    Some(ANA),
    Some(json!({ "proposition": "Homework should be optional." })),
  )
  .await;
  assert_eq!(status, StatusCode::CREATED);

  let uri = format!("/api/topics/{}/arguments", h.topic_id);
  let (status, body) = send(&h.state, "POST", &uri, Some(ANA), Some(argument_body("pro", "A"))).await;

  assert_eq!(status, StatusCode::FORBIDDEN);
  assert_eq!(body["error"], "quota_exceeded");
  assert_eq!(body["current_count"], 1);
  assert_eq!(body["limit"], 1);
  assert_eq!(h.model.call_count(), 0);
}

#[tokio::test]
async fn malformed_submissions_are_400_or_404() {
  let h = harness().await;
  let uri = format!("/api/topics/{}/arguments", h.topic_id);

  let (status, _) = send(&h.state, "POST", &uri, Some(ANA), Some(argument_body("neutral", "A"))).await;
  assert_eq!(status, StatusCode::BAD_REQUEST);

  let (status, _) = send(&h.state, "POST", &uri, Some(ANA), Some(argument_body("pro", "  "))).await;
  assert_eq!(status, StatusCode::BAD_REQUEST);

  let missing = format!("/api/topics/{}/arguments", Uuid::new_v4());
  let (status, _) = send(&h.state, "POST", &missing, Some(ANA), Some(argument_body("pro", "A"))).await;
  assert_eq!(status, StatusCode::NOT_FOUND);

  assert_eq!(h.model.call_count(), 0);
}

#[tokio::test]
async fn listings_filter_by_side_and_order_verified_by_score() {
  let h = harness().await;
  let low = h.store.create_argument(unverified(h.topic_id, Side::Pro, "Low score=30")).await.unwrap();
  let high = h.store.create_argument(unverified(h.topic_id, Side::Pro, "High score=90")).await.unwrap();
  h.store.create_argument(unverified(h.topic_id, Side::Con, "Pending")).await.unwrap();
  for id in [low.argument_id, high.argument_id] {
    let (status, _) = send(&h.state, "POST", &format!("/api/arguments/{id}/verify"), None, None).await;
    assert_eq!(status, StatusCode::OK);
  }

  let base = format!("/api/topics/{}/arguments", h.topic_id);
  let (_, pro) = send(&h.state, "GET", &format!("{base}?side=pro"), None, None).await;
  let titles: Vec<&str> = pro.as_array().unwrap().iter().map(|a| a["title"].as_str().unwrap()).collect();
  assert_eq!(titles, ["Low score=30", "High score=90"]);

  let (_, both) = send(&h.state, "GET", &format!("{base}?side=both"), None, None).await;
  assert_eq!(both.as_array().unwrap().len(), 3);

  let (_, verified) = send(&h.state, "GET", &format!("{base}/verified"), None, None).await;
  let ids: Vec<i64> =
    verified.as_array().unwrap().iter().map(|a| a["argument_id"].as_i64().unwrap()).collect();
  assert_eq!(ids, [high.argument_id, low.argument_id]);

  let (status, _) = send(&h.state, "GET", &format!("{base}?side=maybe"), None, None).await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn only_the_author_may_edit_and_edits_clear_matches() {
  let h = harness().await;
  let uri = format!("/api/topics/{}/arguments", h.topic_id);
  let (_, created) = send(&h.state, "POST", &uri, Some(ANA), Some(argument_body("pro", "A"))).await;
  let id = created["argument_id"].as_i64().unwrap();
  let con = h.store.create_argument(unverified(h.topic_id, Side::Con, "B")).await.unwrap();
  h.store
    .save_argument_matches(h.topic_id, vec![ArgumentMatch {
      pro_id: id,
      con_id: con.argument_id,
      reason: None,
    }])
    .await
    .unwrap();

  let edit = json!({ "title": "A, revised", "content": "Sharper point.", "sources": null });
  let (status, _) = send(&h.state, "PUT", &format!("{uri}/{id}"), Some(BEN), Some(edit.clone())).await;
  assert_eq!(status, StatusCode::FORBIDDEN);

  let (status, edited) = send(&h.state, "PUT", &format!("{uri}/{id}"), Some(ANA), Some(edit)).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(edited["title"], "A, revised");
  assert_eq!(edited["validity_score"], 60);

  let (_, matches) =
    send(&h.state, "GET", &format!("/api/topics/{}/matches", h.topic_id), None, None).await;
  assert!(matches.as_array().unwrap().is_empty());
}

// ─── Votes and comments ──────────────────────────────────────────────────────

#[tokio::test]
async fn votes_toggle_and_switch() {
  let h = harness().await;
  let arg = h.store.create_argument(unverified(h.topic_id, Side::Pro, "A")).await.unwrap();
  let up = format!("/api/arguments/{}/upvote", arg.argument_id);
  let down = format!("/api/arguments/{}/downvote", arg.argument_id);

  let (status, tally) = send(&h.state, "POST", &up, Some(ANA), None).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(tally["votes"], 1);
  assert_eq!(tally["user_vote"], "upvote");

  let (_, tally) = send(&h.state, "POST", &up, Some(BEN), None).await;
  assert_eq!(tally["votes"], 2);

  let (_, tally) = send(&h.state, "POST", &up, Some(ANA), None).await;
  assert_eq!(tally["votes"], 1);
  assert!(tally["user_vote"].is_null());

  let (_, tally) = send(&h.state, "POST", &down, Some(BEN), None).await;
  assert_eq!(tally["votes"], -1);
  assert_eq!(tally["user_vote"], "downvote");

  let (status, _) = send(&h.state, "POST", &up, None, None).await;
  assert_eq!(status, StatusCode::UNAUTHORIZED);
  let (status, _) = send(&h.state, "POST", "/api/arguments/999/upvote", Some(ANA), None).await;
  assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn comments_are_listed_oldest_first() {
  let h = harness().await;
  let arg = h.store.create_argument(unverified(h.topic_id, Side::Con, "A")).await.unwrap();
  let post = format!("/api/arguments/{}/comment", arg.argument_id);

  let (status, first) = send(&h.state, "POST", &post, Some(ANA), Some(json!({ "comment": "Source?" }))).await;
  assert_eq!(status, StatusCode::CREATED);
  assert_eq!(first["comment"], "Source?");
  send(&h.state, "POST", &post, Some(BEN), Some(json!({ "comment": "Added one." }))).await;

  let (status, _) = send(&h.state, "POST", &post, Some(BEN), Some(json!({ "comment": " " }))).await;
  assert_eq!(status, StatusCode::BAD_REQUEST);

  let list = format!("/api/arguments/{}/comments", arg.argument_id);
  let (_, comments) = send(&h.state, "GET", &list, None, None).await;
  let texts: Vec<&str> =
    comments.as_array().unwrap().iter().map(|c| c["comment"].as_str().unwrap()).collect();
  assert_eq!(texts, ["Source?", "Added one."]);
}

// ─── Accounts ────────────────────────────────────────────────────────────────

#[tokio::test]
async fn me_and_sync_return_the_local_profile() {
  let h = harness().await;
  let (status, me) = send(&h.state, "GET", "/api/auth/me", Some(BEN), None).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(me["username"], "Ben");
  assert_eq!(me["email"], "ben@example.org");

  let (status, synced) = send(&h.state, "POST", "/api/auth/sync-profile", Some(BEN), None).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(synced["user_id"], me["user_id"]);
}

#[tokio::test]
async fn identity_outage_is_503_not_401() {
  let h = harness().await;

  let (status, body) = send(&h.state, "GET", "/api/auth/me", Some(OUTAGE), None).await;
  assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
  assert_eq!(body["error"], "identity provider unavailable");

  let body = json!({ "proposition": "Homework should be optional." });
  let (status, _) = send(&h.state, "POST", "/api/topics", Some(OUTAGE), Some(body)).await;
  assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);

  let (status, _) = send(&h.state, "GET", "/api/auth/me", Some("forged"), None).await;
  assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn logout_needs_no_token() {
  let h = harness().await;
  let (status, body) = send(&h.state, "POST", "/api/auth/logout", None, None).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body["message"], "Logged out");
}

#[tokio::test]
async fn deleting_an_account_keeps_its_content() {
  let h = harness().await;
  let (_, topic) = send(
    &h.state,
    "POST",
    "/api/topics",
    Some(ANA),
    Some(json!({ "proposition": "Homework should be optional." })),
  )
  .await;
  let topic_id: Uuid = serde_json::from_value(topic["topic_id"].clone()).unwrap();

  let (status, _) = send(&h.state, "DELETE", "/api/auth/account", Some(ANA), None).await;
  assert_eq!(status, StatusCode::OK);

  assert!(h.store.get_user_profile(Uuid::from_u128(1)).await.unwrap().is_none());
  let kept = h.store.get_topic(topic_id).await.unwrap().unwrap();
  assert_eq!(kept.created_by, "Ana");
  assert!(kept.user_id.is_none());
}
