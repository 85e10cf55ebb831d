//! Async HTTP client for the Reddit OAuth API.

use std::time::{Duration, Instant};

use persona_core::{
  Settings,
  model::{Comment, Post, Username},
  source::ContentSource,
};
use reqwest::{Client, StatusCode, Url};
use serde::de::DeserializeOwned;
use tokio::sync::Mutex;
use tracing::debug;

use crate::{
  Error, Result,
  wire::{ACCOUNT_KIND, About, AccessToken, Listing, Submission, UserComment},
};

/// Reddit never returns more than this many items per listing page.
const PAGE_SIZE: usize = 100;

/// Tokens are refreshed this long before Reddit says they expire.
const TOKEN_SLACK: Duration = Duration::from_secs(60);

/// Connection settings for the Reddit API.
#[derive(Debug, Clone)]
pub struct RedditConfig {
  pub client_id:     String,
  pub client_secret: String,
  pub user_agent:    String,
  pub auth_url:      String,
  pub api_url:       String,
  pub timeout:       Duration,
}

impl From<&Settings> for RedditConfig {
  fn from(s: &Settings) -> Self {
    Self {
      client_id:     s.reddit_client_id.clone(),
      client_secret: s.reddit_client_secret.clone(),
      user_agent:    s.reddit_user_agent.clone(),
      auth_url:      s.reddit_auth_url.clone(),
      api_url:       s.reddit_api_url.clone(),
      timeout:       Duration::from_secs(s.request_timeout_secs),
    }
  }
}

struct CachedToken {
  value:      String,
  expires_at: Option<Instant>,
}

impl CachedToken {
  fn is_fresh(&self) -> bool { self.expires_at.is_none_or(|at| Instant::now() < at) }
}

/// Reddit client holding one app-only bearer token.
pub struct RedditClient {
  client: Client,
  config: RedditConfig,
  token:  Mutex<Option<CachedToken>>,
}

impl RedditClient {
  pub fn new(config: RedditConfig) -> Result<Self> {
    let client = Client::builder()
      .user_agent(config.user_agent.clone())
      .timeout(config.timeout)
      .build()?;
    Ok(Self { client, config, token: Mutex::new(None) })
  }

  /// `<api_url>/user/<username>/<endpoint>`, the username as one encoded
  /// path segment.
  fn user_url(&self, username: &Username, endpoint: &str) -> Result<Url> {
    let base_err = || Error::BaseUrl { url: self.config.api_url.clone() };
    let mut url = Url::parse(&self.config.api_url).map_err(|_| base_err())?;
    url
      .path_segments_mut()
      .map_err(|_| base_err())?
      .pop_if_empty()
      .extend(["user", username.as_str(), endpoint]);
    Ok(url)
  }

  // ── Auth ──────────────────────────────────────────────────────────────────

  /// `POST /api/v1/access_token` (client credentials), cached until expiry.
  async fn bearer(&self) -> Result<String> {
    let mut guard = self.token.lock().await;
    if let Some(token) = guard.as_ref().filter(|t| t.is_fresh()) {
      return Ok(token.value.clone());
    }

    let url = format!(
      "{}/api/v1/access_token",
      self.config.auth_url.trim_end_matches('/')
    );
    debug!(%url, "requesting access token");
    let resp = self
      .client
      .post(&url)
      .basic_auth(&self.config.client_id, Some(&self.config.client_secret))
      .form(&[("grant_type", "client_credentials")])
      .send()
      .await?;

    if !resp.status().is_success() {
      return Err(Error::Auth(format!("POST /api/v1/access_token → {}", resp.status())));
    }
    let token: AccessToken = resp.json().await?;
    if token.access_token.is_empty() {
      return Err(Error::Auth("empty access token".into()));
    }

    let expires_at = token
      .expires_in
      .map(|secs| Instant::now() + Duration::from_secs(secs).saturating_sub(TOKEN_SLACK));
    let value = token.access_token.clone();
    *guard = Some(CachedToken { value: token.access_token, expires_at });
    Ok(value)
  }

  // ── Requests ──────────────────────────────────────────────────────────────

  async fn get_json<T: DeserializeOwned>(&self, url: Url, query: &[(&str, String)]) -> Result<T> {
    let bearer = self.bearer().await?;
    let path = url.path().to_string();
    debug!(%path, ?query, "GET");
    let resp = self
      .client
      .get(url)
      .bearer_auth(bearer)
      .query(query)
      .send()
      .await?;

    match resp.status() {
      status if status.is_success() => Ok(resp.json().await?),
      StatusCode::UNAUTHORIZED => Err(Error::Auth(format!("GET {path} → 401"))),
      status => Err(Error::Status { path, status }),
    }
  }

  /// Walk a user listing newest-first until `limit` items or the end.
  async fn listing<T: DeserializeOwned>(&self, url: Url, limit: usize) -> Result<Vec<T>> {
    let mut items = Vec::with_capacity(limit.min(PAGE_SIZE));
    let mut after: Option<String> = None;

    while items.len() < limit {
      let page_size = (limit - items.len()).min(PAGE_SIZE);
      let mut query = vec![
        ("sort", "new".to_string()),
        ("limit", page_size.to_string()),
        ("raw_json", "1".to_string()),
      ];
      if let Some(cursor) = &after {
        query.push(("after", cursor.clone()));
      }

      let page: Listing<T> = self.get_json(url.clone(), &query).await?;
      let fetched = page.data.children.len();
      items.extend(page.data.children.into_iter().map(|thing| thing.data));

      match page.data.after {
        Some(cursor) if fetched > 0 => after = Some(cursor),
        _ => break,
      }
    }

    items.truncate(limit);
    Ok(items)
  }
}

impl ContentSource for RedditClient {
  type Error = Error;

  /// `GET /user/<name>/about`
  async fn lookup_user(&self, username: &Username) -> Result<()> {
    let url = self.user_url(username, "about")?;
    let about: About = match self.get_json(url, &[]).await {
      Ok(about) => about,
      Err(Error::Status { status, .. })
        if status == StatusCode::NOT_FOUND || status == StatusCode::FORBIDDEN =>
      {
        return Err(Error::NotFound(username.to_string()));
      }
      Err(e) => return Err(e),
    };
    if about.kind != ACCOUNT_KIND {
      return Err(Error::NotFound(username.to_string()));
    }
    if about.data.is_suspended {
      return Err(Error::Suspended(username.to_string()));
    }
    Ok(())
  }

  /// `GET /user/<name>/submitted?sort=new`
  async fn submissions(&self, username: &Username, limit: usize) -> Result<Vec<Post>> {
    let items: Vec<Submission> = self
      .listing(self.user_url(username, "submitted")?, limit)
      .await?;
    Ok(items.into_iter().map(Post::from).collect())
  }

  /// `GET /user/<name>/comments?sort=new`
  async fn comments(&self, username: &Username, limit: usize) -> Result<Vec<Comment>> {
    let items: Vec<UserComment> = self
      .listing(self.user_url(username, "comments")?, limit)
      .await?;
    Ok(items.into_iter().map(Comment::from).collect())
  }
}

#[cfg(test)]
mod tests;
