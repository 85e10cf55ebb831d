//! Persona synthesis: excerpt → prompt → completion.
//!
//! The excerpt is the bounded slice of the dataset that is actually sent to
//! the model. Its shape (caps, truncation, tagging) is fixed so the model can
//! cite items by id.

use tracing::{debug, info};

use crate::{
  Error, Result,
  completion::{ChatMessage, CompletionClient, CompletionRequest},
  model::{ContentKind, Model, PersonaDocument, UserDataset},
};

/// Most posts taken into the excerpt.
pub const MAX_EXCERPT_POSTS: usize = 50;
/// Most comments taken into the excerpt.
pub const MAX_EXCERPT_COMMENTS: usize = 50;
/// Self-text and comment bodies are cut to this many characters.
pub const MAX_BODY_CHARS: usize = 500;
/// Comments must be strictly longer than this to be included.
pub const MIN_COMMENT_CHARS: usize = 10;

pub const MAX_TOKENS: u32 = 4000;
pub const TEMPERATURE: f32 = 0.3;

pub const SYSTEM_PROMPT: &str = "You are an expert digital analyst specializing in creating detailed \
user personas from social media data. You analyze text patterns, communication styles, and \
behavioral indicators to build comprehensive profiles.";

// ─── Excerpt ─────────────────────────────────────────────────────────────────

/// First `max` characters of `s` (characters, not bytes).
fn truncate_chars(s: &str, max: usize) -> &str {
  match s.char_indices().nth(max) {
    Some((idx, _)) => &s[..idx],
    None => s,
  }
}

fn entry(kind: ContentKind, id: &str, text: &str) -> String { format!("{kind} [{id}]: {text}") }

/// Build the excerpt sent to the model: qualifying posts first, then
/// qualifying comments, separated by blank lines.
pub fn build_excerpt(dataset: &UserDataset) -> String {
  let posts = dataset.posts.iter().take(MAX_EXCERPT_POSTS).filter_map(|post| {
    if post.title.is_empty() {
      return None;
    }
    let text = match post.selftext.as_deref() {
      Some(body) if !body.is_empty() => {
        format!("{} - {}", post.title, truncate_chars(body, MAX_BODY_CHARS))
      }
      _ => post.title.clone(),
    };
    Some(entry(ContentKind::Post, &post.id, &text))
  });

  let comments = dataset
    .comments
    .iter()
    .take(MAX_EXCERPT_COMMENTS)
    .filter(|c| c.body.chars().count() > MIN_COMMENT_CHARS)
    .map(|c| entry(ContentKind::Comment, &c.id, truncate_chars(&c.body, MAX_BODY_CHARS)));

  posts.chain(comments).collect::<Vec<_>>().join("\n\n")
}

// ─── Prompt ──────────────────────────────────────────────────────────────────

/// Embed the dataset summary and excerpt into the persona instructions.
pub fn build_prompt(dataset: &UserDataset, excerpt: &str) -> String {
  let username = &dataset.username;
  let total_posts = dataset.total_posts();
  let total_comments = dataset.total_comments();

  format!(
    "Analyze the following Reddit user data and create a comprehensive persona profile.

User: {username}
Total Posts: {total_posts}
Total Comments: {total_comments}

Content to analyze:
{excerpt}

Please create a persona with the following structure:

Reddit Username: {username}
--------------------------------------

1️⃣ Interests / Hobbies:
- List specific interests with citations
- Format: Interest (Cited from: \"exact quote\" - Post/Comment ID)

2️⃣ Personality Traits:
- List personality traits with evidence
- Format: Trait (Cited from: \"exact quote\" - Post/Comment ID)

3️⃣ Writing Style / Tone:
- Describe communication style
- Format: Style element (Cited from: \"exact quote\" - Post/Comment ID)

4️⃣ Values / Beliefs:
- Identify core values and beliefs
- Format: Value/Belief (Cited from: \"exact quote\" - Post/Comment ID)

5️⃣ Behavior on Reddit:
- Analyze Reddit usage patterns
- Format: Behavior (Cited from: \"exact quote\" - Post/Comment ID)

Rules:
- Use exact quotes from the content
- Include specific post/comment IDs
- Keep quotes concise but meaningful
- Provide specific evidence for each point
- Be objective and professional
"
  )
}

// ─── Synthesizer ─────────────────────────────────────────────────────────────

/// Turns a [`UserDataset`] into a [`PersonaDocument`] via a [`CompletionClient`].
pub struct PersonaSynthesizer<C> {
  client: C,
}

impl<C: CompletionClient> PersonaSynthesizer<C> {
  pub fn new(client: C) -> Self { Self { client } }

  /// One-token probe against `model`, so bad credentials or an unavailable
  /// model fail before the full prompt is sent.
  pub async fn check_connection(&self, model: Model) -> Result<()> {
    let request = CompletionRequest {
      model:       model.id().to_string(),
      messages:    vec![ChatMessage::user("test")],
      max_tokens:  1,
      temperature: None,
    };
    self
      .client
      .complete(&request)
      .await
      .map_err(Error::PersonaGenerationFailed)?;
    debug!(%model, "completion API reachable");
    Ok(())
  }

  pub async fn synthesize(&self, dataset: &UserDataset, model: Model) -> Result<PersonaDocument> {
    let excerpt = build_excerpt(dataset);
    let prompt = build_prompt(dataset, &excerpt);
    info!(
      username = %dataset.username,
      %model,
      excerpt_chars = excerpt.chars().count(),
      "requesting persona"
    );

    let request = CompletionRequest {
      model:       model.id().to_string(),
      messages:    vec![ChatMessage::system(SYSTEM_PROMPT), ChatMessage::user(prompt)],
      max_tokens:  MAX_TOKENS,
      temperature: Some(TEMPERATURE),
    };

    let text = self
      .client
      .complete(&request)
      .await
      .map_err(Error::PersonaGenerationFailed)?;

    Ok(PersonaDocument::new(text))
  }
}
