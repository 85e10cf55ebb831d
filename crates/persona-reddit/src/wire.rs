//! JSON shapes returned by the Reddit API.

use persona_core::model::{Comment, Post};
use serde::Deserialize;

/// Permalinks are site-relative; this is prepended to make them absolute.
const PERMALINK_BASE: &str = "https://reddit.com";

#[derive(Debug, Deserialize)]
pub struct AccessToken {
  pub access_token: String,
  #[serde(default)]
  pub expires_in:   Option<u64>,
}

/// Thing kind of a user account.
pub const ACCOUNT_KIND: &str = "t2";

/// `GET /user/<name>/about`; anything but a `t2` is not an account.
#[derive(Debug, Deserialize)]
pub struct About {
  pub kind: String,
  pub data: AboutData,
}

#[derive(Debug, Deserialize)]
pub struct AboutData {
  #[serde(default)]
  pub is_suspended: bool,
}

/// A page of a `Listing`; `after` is the cursor for the next page.
#[derive(Debug, Deserialize)]
pub struct Listing<T> {
  pub data: ListingData<T>,
}

#[derive(Debug, Deserialize)]
pub struct ListingData<T> {
  pub after:    Option<String>,
  pub children: Vec<Thing<T>>,
}

#[derive(Debug, Deserialize)]
pub struct Thing<T> {
  pub data: T,
}

/// A `t3` (link/self post).
#[derive(Debug, Deserialize)]
pub struct Submission {
  pub id:          String,
  pub title:       String,
  #[serde(default)]
  pub selftext:    Option<String>,
  pub subreddit:   String,
  pub score:       i64,
  pub created_utc: f64,
  pub permalink:   String,
}

/// A `t1` (comment).
#[derive(Debug, Deserialize)]
pub struct UserComment {
  pub id:          String,
  #[serde(default)]
  pub body:        String,
  pub subreddit:   String,
  pub score:       i64,
  pub created_utc: f64,
  pub permalink:   String,
}

impl From<Submission> for Post {
  fn from(s: Submission) -> Self {
    Post {
      id:          s.id,
      title:       s.title,
      selftext:    s.selftext,
      subreddit:   s.subreddit,
      score:       s.score,
      created_utc: s.created_utc,
      url:         format!("{PERMALINK_BASE}{}", s.permalink),
    }
  }
}

impl From<UserComment> for Comment {
  fn from(c: UserComment) -> Self {
    Comment {
      id:          c.id,
      body:        c.body,
      subreddit:   c.subreddit,
      score:       c.score,
      created_utc: c.created_utc,
      url:         format!("{PERMALINK_BASE}{}", c.permalink),
    }
  }
}
