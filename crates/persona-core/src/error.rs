//! Error types for `persona-core`.

use std::path::PathBuf;

use thiserror::Error;

/// Hint shown when the completion API rejects the configured key.
pub const AUTH_HINT: &str = "Invalid Groq API key. Please check the configuration.";
/// Hint shown when the completion API is throttling requests.
pub const RATE_LIMIT_HINT: &str = "Rate limit exceeded. Please wait and try again.";

#[derive(Debug, Error)]
pub enum Error {
  #[error("invalid Reddit URL format: {0}")]
  InvalidProfileUrl(String),

  #[error("user '{username}' not found or suspended: {source}")]
  UserNotFound {
    username: String,
    source:   Box<dyn std::error::Error + Send + Sync>,
  },

  #[error("error generating persona: {0}")]
  PersonaGenerationFailed(#[source] CompletionError),

  #[error("failed to write {}: {source}", path.display())]
  WriteFailure {
    path:   PathBuf,
    source: std::io::Error,
  },

  #[error("unknown model: {0:?}")]
  UnknownModel(String),

  #[error("configuration error: {0}")]
  Config(#[from] config::ConfigError),
}

impl Error {
  /// A more specific, user-facing hint for the failure, if there is one.
  pub fn hint(&self) -> Option<&'static str> {
    match self {
      Error::PersonaGenerationFailed(CompletionError::Authentication(_)) => Some(AUTH_HINT),
      Error::PersonaGenerationFailed(CompletionError::RateLimited(_)) => Some(RATE_LIMIT_HINT),
      _ => None,
    }
  }
}

/// Failure reported by a [`CompletionClient`](crate::completion::CompletionClient).
///
/// Clients classify failures at the source (HTTP status, API error code) so
/// callers never have to inspect message text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CompletionError {
  #[error("authentication failed: {0}")]
  Authentication(String),

  #[error("rate limited: {0}")]
  RateLimited(String),

  #[error("{0}")]
  Other(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
