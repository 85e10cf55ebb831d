//! The `CompletionClient` trait and the chat request it accepts.

use std::future::Future;

use serde::Serialize;

use crate::CompletionError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
  System,
  User,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatMessage {
  pub role:    Role,
  pub content: String,
}

impl ChatMessage {
  pub fn system(content: impl Into<String>) -> Self {
    Self { role: Role::System, content: content.into() }
  }

  pub fn user(content: impl Into<String>) -> Self {
    Self { role: Role::User, content: content.into() }
  }
}

/// A chat-style completion request.
///
/// Serialises to the OpenAI-compatible request body, so clients can send it
/// as-is.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompletionRequest {
  pub model:       String,
  pub messages:    Vec<ChatMessage>,
  pub max_tokens:  u32,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub temperature: Option<f32>,
}

/// The completion-API collaborator.
pub trait CompletionClient: Send + Sync {
  /// Submit `request` and return the first choice's text verbatim.
  fn complete(
    &self,
    request: &CompletionRequest,
  ) -> impl Future<Output = Result<String, CompletionError>> + Send;
}
