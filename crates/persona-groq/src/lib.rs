//! Groq chat-completions client implementing
//! [`persona_core::completion::CompletionClient`].
//!
//! Groq serves the OpenAI-compatible `/chat/completions` endpoint, so the
//! request body is [`CompletionRequest`] serialised as-is. Failures are
//! classified into [`CompletionError`] from the HTTP status and the API's
//! error code.

use std::time::Duration;

use persona_core::{
  CompletionError, Settings,
  completion::{CompletionClient, CompletionRequest},
};
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use tracing::debug;

/// Connection settings for the completion API.
#[derive(Debug, Clone)]
pub struct GroqConfig {
  pub api_key:  String,
  pub base_url: String,
  pub timeout:  Duration,
}

impl From<&Settings> for GroqConfig {
  fn from(s: &Settings) -> Self {
    Self {
      api_key:  s.groq_api_key.clone(),
      base_url: s.groq_api_url.clone(),
      timeout:  Duration::from_secs(s.completion_timeout_secs),
    }
  }
}

// ─── Wire types ───────────────────────────────────────────────────────────────

#[derive(Deserialize)]
struct ChatResponse {
  #[serde(default)]
  choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
  message: ResponseMessage,
}

#[derive(Deserialize)]
struct ResponseMessage {
  content: Option<String>,
}

#[derive(Deserialize)]
struct ErrorEnvelope {
  error: ApiError,
}

#[derive(Deserialize)]
struct ApiError {
  #[serde(default)]
  message: String,
  #[serde(default, rename = "type")]
  kind:    Option<String>,
  #[serde(default)]
  code:    Option<String>,
}

/// Map a non-success response to the structured error kind.
fn classify(status: StatusCode, body: &str) -> CompletionError {
  let parsed = serde_json::from_str::<ErrorEnvelope>(body).ok().map(|e| e.error);
  let message = match &parsed {
    Some(err) if !err.message.is_empty() => format!("{status}: {}", err.message),
    _ => format!("{status}: {body}"),
  };
  let code_is = |needle: &str| {
    parsed.as_ref().is_some_and(|e| {
      [e.code.as_deref(), e.kind.as_deref()]
        .into_iter()
        .flatten()
        .any(|c| c.contains(needle))
    })
  };

  if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN || code_is("api_key") {
    CompletionError::Authentication(message)
  } else if status == StatusCode::TOO_MANY_REQUESTS || code_is("rate_limit") {
    CompletionError::RateLimited(message)
  } else {
    CompletionError::Other(message)
  }
}

// ─── Client ───────────────────────────────────────────────────────────────────

/// Groq client. Cheap to clone; the inner [`reqwest::Client`] is `Arc`-based.
#[derive(Clone)]
pub struct GroqClient {
  client: Client,
  config: GroqConfig,
}

impl GroqClient {
  pub fn new(config: GroqConfig) -> Result<Self, reqwest::Error> {
    let client = Client::builder().timeout(config.timeout).build()?;
    Ok(Self { client, config })
  }

  fn url(&self) -> String {
    format!("{}/chat/completions", self.config.base_url.trim_end_matches('/'))
  }
}

impl CompletionClient for GroqClient {
  async fn complete(&self, request: &CompletionRequest) -> Result<String, CompletionError> {
    debug!(model = %request.model, max_tokens = request.max_tokens, "POST /chat/completions");
    let resp = self
      .client
      .post(self.url())
      .bearer_auth(&self.config.api_key)
      .json(request)
      .send()
      .await
      .map_err(|e| CompletionError::Other(format!("request failed: {e}")))?;

    let status = resp.status();
    if !status.is_success() {
      let body = resp.text().await.unwrap_or_default();
      return Err(classify(status, &body));
    }

    let body: ChatResponse = resp
      .json()
      .await
      .map_err(|e| CompletionError::Other(format!("invalid response: {e}")))?;

    body
      .choices
      .into_iter()
      .next()
      .and_then(|choice| choice.message.content)
      .ok_or_else(|| CompletionError::Other("no content in response".into()))
  }
}
