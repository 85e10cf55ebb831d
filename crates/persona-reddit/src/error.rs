//! Error type for `persona-reddit`.

use reqwest::StatusCode;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("user not found: {0}")]
  NotFound(String),

  #[error("user {0} is suspended")]
  Suspended(String),

  #[error("authentication failed: {0}")]
  Auth(String),

  #[error("invalid API base URL {url}")]
  BaseUrl { url: String },

  #[error("{path} → {status}")]
  Status { path: String, status: StatusCode },

  #[error("http error: {0}")]
  Http(#[from] reqwest::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
