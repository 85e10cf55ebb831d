//! `RedditClient` against a throwaway axum server speaking the Reddit API.

use std::{
  collections::HashMap,
  sync::{
    Arc, Mutex,
    atomic::{AtomicUsize, Ordering},
  },
  time::Duration,
};

use axum::{
  Form, Json, Router,
  extract::{Path, Query, State},
  http::{HeaderMap, StatusCode, header},
  response::{IntoResponse, Response},
  routing::{get, post},
};
use persona_core::{model::Username, source::ContentSource};
use serde_json::json;
use tokio::net::TcpListener;

use super::{RedditClient, RedditConfig};
use crate::Error;

/// `base64("id:secret")`
const EXPECTED_BASIC: &str = "Basic aWQ6c2VjcmV0";
const TOTAL_POSTS: usize = 250;

#[derive(Clone, Default)]
struct Mock {
  token_calls: Arc<AtomicUsize>,
  queries:     Arc<Mutex<Vec<HashMap<String, String>>>>,
}

fn bearer_ok(headers: &HeaderMap) -> bool {
  headers
    .get(header::AUTHORIZATION)
    .and_then(|v| v.to_str().ok())
    == Some("Bearer tok")
}

async fn token(
  State(mock): State<Mock>,
  headers: HeaderMap,
  Form(form): Form<HashMap<String, String>>,
) -> Response {
  mock.token_calls.fetch_add(1, Ordering::SeqCst);
  let basic = headers
    .get(header::AUTHORIZATION)
    .and_then(|v| v.to_str().ok());
  if basic != Some(EXPECTED_BASIC)
    || form.get("grant_type").map(String::as_str) != Some("client_credentials")
  {
    return StatusCode::UNAUTHORIZED.into_response();
  }
  Json(json!({ "access_token": "tok", "token_type": "bearer", "expires_in": 3600 }))
    .into_response()
}

async fn about(headers: HeaderMap, Path(name): Path<String>) -> Response {
  if !bearer_ok(&headers) {
    return StatusCode::UNAUTHORIZED.into_response();
  }
  match name.as_str() {
    "alice" => Json(json!({ "kind": "t2", "data": { "name": "alice", "id": "abc" } })).into_response(),
    "banned" => Json(json!({ "kind": "t2", "data": { "name": "banned", "is_suspended": true } }))
      .into_response(),
    "private" => StatusCode::FORBIDDEN.into_response(),
    "odd" => Json(json!({ "kind": "Listing", "data": { "after": null, "children": [] } }))
      .into_response(),
    _ => StatusCode::NOT_FOUND.into_response(),
  }
}

async fn submitted(
  State(mock): State<Mock>,
  headers: HeaderMap,
  Query(query): Query<HashMap<String, String>>,
) -> Response {
  if !bearer_ok(&headers) {
    return StatusCode::UNAUTHORIZED.into_response();
  }
  mock.queries.lock().unwrap().push(query.clone());

  let start: usize = query.get("after").and_then(|a| a.parse().ok()).unwrap_or(0);
  let limit: usize = query.get("limit").and_then(|l| l.parse().ok()).unwrap_or(25);
  let end = (start + limit).min(TOTAL_POSTS);
  let children: Vec<_> = (start..end)
    .map(|i| {
      json!({ "kind": "t3", "data": {
        "id": format!("p{i}"), "title": format!("Post {i}"), "selftext": "",
        "subreddit": "rust", "score": i, "created_utc": 1_700_000_000.0 - i as f64,
        "permalink": format!("/r/rust/comments/p{i}/post/")
      }})
    })
    .collect();
  let after = (end < TOTAL_POSTS).then(|| end.to_string());
  Json(json!({ "kind": "Listing", "data": { "after": after, "children": children } }))
    .into_response()
}

async fn comments(headers: HeaderMap) -> Response {
  if !bearer_ok(&headers) {
    return StatusCode::UNAUTHORIZED.into_response();
  }
  let children: Vec<_> = (0..3)
    .map(|i| {
      json!({ "kind": "t1", "data": {
        "id": format!("c{i}"), "body": format!("comment number {i} &amp; more"),
        "subreddit": "learnrust", "score": 1, "created_utc": 1_700_000_000,
        "permalink": format!("/r/learnrust/comments/x/y/c{i}/")
      }})
    })
    .collect();
  Json(json!({ "kind": "Listing", "data": { "after": null, "children": children } }))
    .into_response()
}

/// `GET /user/<name>`: the overview listing, which exists for any name.
async fn overview(headers: HeaderMap) -> Response {
  if !bearer_ok(&headers) {
    return StatusCode::UNAUTHORIZED.into_response();
  }
  Json(json!({ "kind": "Listing", "data": { "after": null, "children": [] } })).into_response()
}

async fn spawn(mock: Mock) -> String {
  let app = Router::new()
    .route("/api/v1/access_token", post(token))
    .route("/user/{name}", get(overview))
    .route("/user/{name}/about", get(about))
    .route("/user/{name}/submitted", get(submitted))
    .route("/user/{name}/comments", get(comments))
    .with_state(mock);

  let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
  let addr = listener.local_addr().unwrap();
  tokio::spawn(async move { axum::serve(listener, app).await.unwrap() });
  format!("http://{addr}")
}

fn client(base: &str, secret: &str) -> RedditClient {
  RedditClient::new(RedditConfig {
    client_id:     "id".into(),
    client_secret: secret.into(),
    user_agent:    "PersonaGenerator/test".into(),
    auth_url:      base.into(),
    api_url:       format!("{base}/"),
    timeout:       Duration::from_secs(5),
  })
  .unwrap()
}

// ─── Lookup ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn lookup_existing_user() {
  let base = spawn(Mock::default()).await;
  client(&base, "secret")
    .lookup_user(&Username::new("alice"))
    .await
    .unwrap();
}

#[tokio::test]
async fn lookup_unknown_user_is_not_found() {
  let base = spawn(Mock::default()).await;
  let c = client(&base, "secret");

  let err = c.lookup_user(&Username::new("nobody")).await.unwrap_err();
  assert!(matches!(err, Error::NotFound(ref u) if u == "nobody"));

  let err = c.lookup_user(&Username::new("private")).await.unwrap_err();
  assert!(matches!(err, Error::NotFound(_)));
}

#[tokio::test]
async fn lookup_encodes_username_as_one_segment() {
  let base = spawn(Mock::default()).await;
  let user = persona_core::resolve::resolve("https://www.reddit.com/user/ghost?utm_source=share")
    .unwrap();
  assert_eq!(user.as_str(), "ghost?utm_source=share");

  let err = client(&base, "secret").lookup_user(&user).await.unwrap_err();
  assert!(matches!(err, Error::NotFound(ref u) if u == "ghost?utm_source=share"), "{err}");
}

#[tokio::test]
async fn lookup_rejects_non_account_payload() {
  let base = spawn(Mock::default()).await;
  let err = client(&base, "secret")
    .lookup_user(&Username::new("odd"))
    .await
    .unwrap_err();
  assert!(matches!(err, Error::NotFound(_)), "{err}");
}

#[tokio::test]
async fn lookup_suspended_user() {
  let base = spawn(Mock::default()).await;
  let err = client(&base, "secret")
    .lookup_user(&Username::new("banned"))
    .await
    .unwrap_err();
  assert!(matches!(err, Error::Suspended(_)));
}

#[tokio::test]
async fn bad_credentials_are_auth_errors() {
  let base = spawn(Mock::default()).await;
  let err = client(&base, "wrong")
    .lookup_user(&Username::new("alice"))
    .await
    .unwrap_err();
  assert!(matches!(err, Error::Auth(_)), "{err}");
}

// ─── Listings ────────────────────────────────────────────────────────────────

#[tokio::test]
async fn submissions_follow_cursor_across_pages() {
  let mock = Mock::default();
  let base = spawn(mock.clone()).await;
  let c = client(&base, "secret");
  let user = Username::new("alice");

  c.lookup_user(&user).await.unwrap();
  let posts = c.submissions(&user, 230).await.unwrap();

  assert_eq!(posts.len(), 230);
  assert_eq!(posts[0].id, "p0");
  assert_eq!(posts[229].id, "p229");
  assert_eq!(posts[7].url, "https://reddit.com/r/rust/comments/p7/post/");

  let queries = mock.queries.lock().unwrap().clone();
  let limits: Vec<_> = queries.iter().map(|q| q["limit"].as_str()).collect();
  assert_eq!(limits, ["100", "100", "30"]);
  assert!(queries.iter().all(|q| q["sort"] == "new" && q["raw_json"] == "1"));
  assert!(!queries[0].contains_key("after"));
  assert_eq!(queries[1]["after"], "100");

  // One token for the lookup and every page.
  assert_eq!(mock.token_calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn submissions_stop_at_end_of_listing() {
  let base = spawn(Mock::default()).await;
  let posts = client(&base, "secret")
    .submissions(&Username::new("alice"), 500)
    .await
    .unwrap();
  assert_eq!(posts.len(), TOTAL_POSTS);
}

#[tokio::test]
async fn zero_limit_makes_no_listing_request() {
  let mock = Mock::default();
  let base = spawn(mock.clone()).await;
  let posts = client(&base, "secret")
    .submissions(&Username::new("alice"), 0)
    .await
    .unwrap();
  assert!(posts.is_empty());
  assert!(mock.queries.lock().unwrap().is_empty());
}

#[tokio::test]
async fn comments_are_mapped() {
  let base = spawn(Mock::default()).await;
  let comments = client(&base, "secret")
    .comments(&Username::new("alice"), 100)
    .await
    .unwrap();

  assert_eq!(comments.len(), 3);
  assert_eq!(comments[1].id, "c1");
  assert_eq!(comments[1].subreddit, "learnrust");
  assert_eq!(comments[1].url, "https://reddit.com/r/learnrust/comments/x/y/c1/");
  assert_eq!(comments[1].created_utc, 1_700_000_000.0);
}
