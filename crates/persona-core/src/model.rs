//! Data collected from Reddit and the persona produced from it.
//!
//! Everything here is immutable once built: the collector creates the
//! dataset, the synthesizer reads it, and the writer persists the document.

use std::{fmt, str::FromStr};

use chrono::{DateTime, Local};

use crate::Error;

// ─── Identity ────────────────────────────────────────────────────────────────

/// A Reddit username as extracted from a profile URL.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Username(String);

impl Username {
  pub fn new(name: impl Into<String>) -> Self { Self(name.into()) }

  pub fn as_str(&self) -> &str { &self.0 }
}

impl fmt::Display for Username {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(&self.0) }
}

// ─── Content items ───────────────────────────────────────────────────────────

/// Which kind of item an excerpt entry was taken from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentKind {
  Post,
  Comment,
}

impl fmt::Display for ContentKind {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(match self {
      ContentKind::Post => "POST",
      ContentKind::Comment => "COMMENT",
    })
  }
}

/// A submission authored by the user.
#[derive(Debug, Clone, PartialEq)]
pub struct Post {
  pub id:          String,
  pub title:       String,
  /// Self-text body. Link posts have none; Reddit reports them as empty.
  pub selftext:    Option<String>,
  pub subreddit:   String,
  pub score:       i64,
  /// Seconds since the Unix epoch.
  pub created_utc: f64,
  /// Absolute permalink, e.g. `https://reddit.com/r/rust/comments/abc/...`.
  pub url:         String,
}

/// A comment authored by the user.
#[derive(Debug, Clone, PartialEq)]
pub struct Comment {
  pub id:          String,
  pub body:        String,
  pub subreddit:   String,
  pub score:       i64,
  pub created_utc: f64,
  pub url:         String,
}

// ─── Dataset ─────────────────────────────────────────────────────────────────

/// Everything collected for one user in one run. Both sequences are
/// newest-first, in the order the data API returned them.
#[derive(Debug, Clone)]
pub struct UserDataset {
  pub username: Username,
  pub posts:    Vec<Post>,
  pub comments: Vec<Comment>,
}

impl UserDataset {
  pub fn total_posts(&self) -> usize { self.posts.len() }

  pub fn total_comments(&self) -> usize { self.comments.len() }
}

// ─── Persona ─────────────────────────────────────────────────────────────────

/// Raw completion text plus the moment it was produced. The text is never
/// parsed; it is persisted and displayed as-is.
#[derive(Debug, Clone, PartialEq)]
pub struct PersonaDocument {
  pub text:         String,
  pub generated_at: DateTime<Local>,
}

impl PersonaDocument {
  pub fn new(text: impl Into<String>) -> Self {
    Self { text: text.into(), generated_at: Local::now() }
  }
}

// ─── Model ───────────────────────────────────────────────────────────────────

/// Completion models the front-ends offer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Model {
  #[default]
  Llama3_70b,
  Llama3_8b,
  Mixtral8x7b,
}

impl Model {
  pub const ALL: [Model; 3] = [Model::Llama3_70b, Model::Llama3_8b, Model::Mixtral8x7b];

  /// Wire identifiers, in the same order as [`Model::ALL`].
  pub const IDS: [&'static str; 3] = ["llama3-70b-8192", "llama3-8b-8192", "mixtral-8x7b-32768"];

  pub fn id(self) -> &'static str {
    match self {
      Model::Llama3_70b => Self::IDS[0],
      Model::Llama3_8b => Self::IDS[1],
      Model::Mixtral8x7b => Self::IDS[2],
    }
  }

  pub fn description(self) -> &'static str {
    match self {
      Model::Llama3_70b => "Best quality",
      Model::Llama3_8b => "Fastest",
      Model::Mixtral8x7b => "Balanced",
    }
  }

  /// The next model in [`Model::ALL`], wrapping around.
  pub fn next(self) -> Self {
    let i = Self::ALL.iter().position(|m| *m == self).unwrap_or(0);
    Self::ALL[(i + 1) % Self::ALL.len()]
  }

  /// The previous model in [`Model::ALL`], wrapping around.
  pub fn prev(self) -> Self {
    let i = Self::ALL.iter().position(|m| *m == self).unwrap_or(0);
    Self::ALL[(i + Self::ALL.len() - 1) % Self::ALL.len()]
  }
}

impl fmt::Display for Model {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.id()) }
}

impl FromStr for Model {
  type Err = Error;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    Self::ALL
      .into_iter()
      .find(|m| m.id() == s)
      .ok_or_else(|| Error::UnknownModel(s.to_string()))
  }
}
