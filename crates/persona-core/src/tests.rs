//! Pipeline tests against in-memory collaborators.

use std::sync::{
  Mutex,
  atomic::{AtomicUsize, Ordering},
};

use regex::Regex;
use tempfile::TempDir;

use crate::{
  CompletionError, Error,
  collect::ContentCollector,
  completion::{CompletionClient, CompletionRequest, Role},
  model::{Comment, Model, Post, Username},
  output::OutputWriter,
  service::{PersonaService, Stage},
  source::ContentSource,
  synth::{MAX_TOKENS, SYSTEM_PROMPT, TEMPERATURE},
};

// ─── Stubs ───────────────────────────────────────────────────────────────────

#[derive(Debug, thiserror::Error)]
#[error("{0}")]
struct StubError(String);

struct StubSource {
  exists:   bool,
  posts:    Result<Vec<Post>, String>,
  comments: Result<Vec<Comment>, String>,
  calls:    AtomicUsize,
}

impl StubSource {
  fn new(posts: Vec<Post>, comments: Vec<Comment>) -> Self {
    Self { exists: true, posts: Ok(posts), comments: Ok(comments), calls: AtomicUsize::new(0) }
  }

  fn calls(&self) -> usize { self.calls.load(Ordering::SeqCst) }
}

impl ContentSource for StubSource {
  type Error = StubError;

  async fn lookup_user(&self, username: &Username) -> Result<(), StubError> {
    self.calls.fetch_add(1, Ordering::SeqCst);
    if self.exists { Ok(()) } else { Err(StubError(format!("{username}: 404 Not Found"))) }
  }

  async fn submissions(&self, _: &Username, _: usize) -> Result<Vec<Post>, StubError> {
    self.calls.fetch_add(1, Ordering::SeqCst);
    self.posts.clone().map_err(StubError)
  }

  async fn comments(&self, _: &Username, _: usize) -> Result<Vec<Comment>, StubError> {
    self.calls.fetch_add(1, Ordering::SeqCst);
    self.comments.clone().map_err(StubError)
  }
}

struct StubCompletion {
  reply:    Result<String, CompletionError>,
  requests: Mutex<Vec<CompletionRequest>>,
}

impl StubCompletion {
  fn replying(reply: Result<String, CompletionError>) -> Self {
    Self { reply, requests: Mutex::new(Vec::new()) }
  }

  fn requests(&self) -> Vec<CompletionRequest> { self.requests.lock().unwrap().clone() }
}

impl CompletionClient for StubCompletion {
  async fn complete(&self, request: &CompletionRequest) -> Result<String, CompletionError> {
    self.requests.lock().unwrap().push(request.clone());
    self.reply.clone()
  }
}

impl<T: CompletionClient> CompletionClient for &T {
  async fn complete(&self, request: &CompletionRequest) -> Result<String, CompletionError> {
    (**self).complete(request).await
  }
}

impl<T: ContentSource> ContentSource for &T {
  type Error = T::Error;

  async fn lookup_user(&self, username: &Username) -> Result<(), T::Error> {
    (**self).lookup_user(username).await
  }

  async fn submissions(&self, username: &Username, limit: usize) -> Result<Vec<Post>, T::Error> {
    (**self).submissions(username, limit).await
  }

  async fn comments(&self, username: &Username, limit: usize) -> Result<Vec<Comment>, T::Error> {
    (**self).comments(username, limit).await
  }
}

fn post(id: &str, title: &str) -> Post {
  Post {
    id:          id.into(),
    title:       title.into(),
    selftext:    Some(format!("body of {id}")),
    subreddit:   "rust".into(),
    score:       42,
    created_utc: 1_700_000_000.0,
    url:         format!("https://reddit.com/r/rust/comments/{id}/"),
  }
}

fn comment(id: &str, body: &str) -> Comment {
  Comment {
    id:          id.into(),
    body:        body.into(),
    subreddit:   "rust".into(),
    score:       7,
    created_utc: 1_700_000_100.0,
    url:         format!("https://reddit.com/r/rust/comments/x/y/{id}/"),
  }
}

fn three_comments() -> Vec<Comment> {
  vec![
    comment("c1", "I really enjoy writing Rust"),
    comment("c2", "Borrow checker saved me again"),
    comment("c3", "Cargo is a great build tool"),
  ]
}

// ─── Collector ───────────────────────────────────────────────────────────────

#[tokio::test]
async fn collect_tolerates_post_failure() {
  let source = StubSource {
    posts: Err("500 Internal Server Error".into()),
    ..StubSource::new(vec![], three_comments())
  };
  let dataset = ContentCollector::new(source)
    .collect(&Username::new("alice"), 100)
    .await
    .unwrap();

  assert_eq!(dataset.total_posts(), 0);
  assert_eq!(dataset.total_comments(), 3);
}

#[tokio::test]
async fn collect_tolerates_comment_failure() {
  let source = StubSource {
    comments: Err("timed out".into()),
    ..StubSource::new(vec![post("p1", "Hello")], vec![])
  };
  let dataset = ContentCollector::new(source)
    .collect(&Username::new("alice"), 100)
    .await
    .unwrap();

  assert_eq!(dataset.total_posts(), 1);
  assert_eq!(dataset.total_comments(), 0);
}

#[tokio::test]
async fn collect_missing_user_is_fatal() {
  let source = StubSource { exists: false, ..StubSource::new(vec![], three_comments()) };
  let collector = ContentCollector::new(source);
  let err = collector.collect(&Username::new("ghost"), 100).await.unwrap_err();

  assert!(matches!(err, Error::UserNotFound { ref username, .. } if username == "ghost"));
  // Only the lookup was attempted.
  assert_eq!(collector.source().calls(), 1);
}

#[tokio::test]
async fn collect_caps_at_limit() {
  let posts = (0..5).map(|i| post(&format!("p{i}"), "t")).collect();
  let dataset = ContentCollector::new(StubSource::new(posts, three_comments()))
    .collect(&Username::new("alice"), 2)
    .await
    .unwrap();

  assert_eq!(dataset.total_posts(), 2);
  assert_eq!(dataset.posts[0].id, "p0");
  assert_eq!(dataset.total_comments(), 2);
}

// ─── Service ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn end_to_end_writes_persona_file() {
  let tmp = TempDir::new().unwrap();
  let source = StubSource::new(
    vec![post("p1", "First post"), post("p2", "Second post")],
    vec![comment("c1", "A comment that is long enough")],
  );
  let llm = StubCompletion::replying(Ok("PERSONA".into()));
  let service = PersonaService::new(&source, &llm, OutputWriter::new(tmp.path().join("output")));

  let mut stages = Vec::new();
  let report = service
    .run("https://www.reddit.com/user/alice/", 100, Model::default(), |s| stages.push(s))
    .await
    .unwrap();

  assert_eq!(report.username.as_str(), "alice");
  assert_eq!(report.total_posts, 2);
  assert_eq!(report.total_comments, 1);
  assert_eq!(report.path, tmp.path().join("output").join("alice_persona.txt"));

  let percents: Vec<_> = stages.iter().map(Stage::percent).collect();
  assert_eq!(percents, [20, 40, 60, 80, 100]);
  assert_eq!(stages[2], Stage::Generating { posts: 2, comments: 1 });

  let content = std::fs::read_to_string(&report.path).unwrap();
  assert_eq!(content.lines().next(), Some("PERSONA"));
  let last = content.lines().rev().find(|l| !l.trim().is_empty()).unwrap();
  assert!(Regex::new(r"\d{4}-\d{2}-\d{2} \d{2}:\d{2}:\d{2}$").unwrap().is_match(last));

  // Probe first, then the persona request.
  let requests = llm.requests();
  assert_eq!(requests.len(), 2);
  assert_eq!(requests[0].max_tokens, 1);
  let main = &requests[1];
  assert_eq!(main.model, "llama3-70b-8192");
  assert_eq!(main.max_tokens, MAX_TOKENS);
  assert_eq!(main.temperature, Some(TEMPERATURE));
  assert_eq!(main.messages[0].role, Role::System);
  assert_eq!(main.messages[0].content, SYSTEM_PROMPT);
  assert_eq!(main.messages[1].role, Role::User);
  assert!(main.messages[1].content.contains("POST [p1]: First post - body of p1"));
  assert!(main.messages[1].content.contains("COMMENT [c1]: A comment that is long enough"));
}

#[tokio::test]
async fn invalid_url_fails_before_any_network_call() {
  let tmp = TempDir::new().unwrap();
  let source = StubSource::new(vec![], three_comments());
  let llm = StubCompletion::replying(Ok("PERSONA".into()));
  let service = PersonaService::new(&source, &llm, OutputWriter::new(tmp.path()));

  let mut stages = Vec::new();
  let err = service
    .run("https://example.com/notreddit", 100, Model::default(), |s| stages.push(s))
    .await
    .unwrap_err();

  assert!(matches!(err, Error::InvalidProfileUrl(_)));
  assert_eq!(stages, [Stage::Resolving]);
  assert_eq!(source.calls(), 0);
  assert!(llm.requests().is_empty());
}

#[tokio::test]
async fn generation_failure_stops_before_saving() {
  let tmp = TempDir::new().unwrap();
  let source = StubSource::new(vec![post("p1", "Hello")], three_comments());
  let llm = StubCompletion::replying(Err(CompletionError::RateLimited("429".into())));
  let service = PersonaService::new(&source, &llm, OutputWriter::new(tmp.path()));

  let mut last = None;
  let err = service
    .run("https://reddit.com/u/alice", 100, Model::Llama3_8b, |s| last = Some(s))
    .await
    .unwrap_err();

  assert!(matches!(
    err,
    Error::PersonaGenerationFailed(CompletionError::RateLimited(_))
  ));
  assert!(err.hint().is_some());
  assert_eq!(last.map(|s| s.percent()), Some(60));
  assert!(!tmp.path().join("alice_persona.txt").exists());
  // The probe failed, so the persona request was never sent.
  assert_eq!(llm.requests().len(), 1);
}

#[tokio::test]
async fn missing_user_aborts_run() {
  let tmp = TempDir::new().unwrap();
  let source = StubSource { exists: false, ..StubSource::new(vec![], vec![]) };
  let llm = StubCompletion::replying(Ok("PERSONA".into()));
  let service = PersonaService::new(&source, &llm, OutputWriter::new(tmp.path()));

  let err = service
    .run("https://reddit.com/users/ghost", 10, Model::default(), |_| {})
    .await
    .unwrap_err();

  assert!(matches!(err, Error::UserNotFound { .. }));
  assert!(llm.requests().is_empty());
}
