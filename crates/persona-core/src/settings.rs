//! Runtime settings, built once at start-up and passed to the clients.

use std::{fmt, path::{Path, PathBuf}};

use config::{Config, Environment, File};
use serde::Deserialize;

use crate::Result;

/// Default config file looked up when `--config` is not given.
pub const DEFAULT_CONFIG_FILE: &str = "persona.toml";

/// Credentials and endpoints for both collaborators plus the output location.
///
/// Missing credentials are not an error here; they surface as an
/// authentication failure from the first request that needs them.
#[derive(Clone, Deserialize)]
#[serde(default)]
pub struct Settings {
  pub reddit_client_id:        String,
  pub reddit_client_secret:    String,
  pub reddit_user_agent:       String,
  /// Host issuing OAuth tokens.
  pub reddit_auth_url:         String,
  /// Host serving authenticated API requests.
  pub reddit_api_url:          String,
  pub groq_api_key:            String,
  pub groq_api_url:            String,
  pub output_dir:              PathBuf,
  pub request_timeout_secs:    u64,
  pub completion_timeout_secs: u64,
}

impl Default for Settings {
  fn default() -> Self {
    Self {
      reddit_client_id:        String::new(),
      reddit_client_secret:    String::new(),
      reddit_user_agent:       "PersonaGenerator/1.0".into(),
      reddit_auth_url:         "https://www.reddit.com".into(),
      reddit_api_url:          "https://oauth.reddit.com".into(),
      groq_api_key:            String::new(),
      groq_api_url:            "https://api.groq.com/openai/v1".into(),
      output_dir:              PathBuf::from("output"),
      request_timeout_secs:    30,
      completion_timeout_secs: 120,
    }
  }
}

impl fmt::Debug for Settings {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    fn redact(s: &str) -> &'static str { if s.is_empty() { "<unset>" } else { "<redacted>" } }

    f.debug_struct("Settings")
      .field("reddit_client_id", &redact(&self.reddit_client_id))
      .field("reddit_client_secret", &redact(&self.reddit_client_secret))
      .field("reddit_user_agent", &self.reddit_user_agent)
      .field("reddit_auth_url", &self.reddit_auth_url)
      .field("reddit_api_url", &self.reddit_api_url)
      .field("groq_api_key", &redact(&self.groq_api_key))
      .field("groq_api_url", &self.groq_api_url)
      .field("output_dir", &self.output_dir)
      .field("request_timeout_secs", &self.request_timeout_secs)
      .field("completion_timeout_secs", &self.completion_timeout_secs)
      .finish()
  }
}

impl Settings {
  /// Load from an optional TOML file, then the process environment
  /// (`REDDIT_CLIENT_ID`, `GROQ_API_KEY`, `OUTPUT_DIR`, ...).
  ///
  /// An explicitly given file must exist; the default one is optional.
  pub fn load(config_file: Option<&Path>) -> Result<Self> {
    Self::load_with(config_file, Environment::default().try_parsing(true))
  }

  /// Like [`Settings::load`] with a caller-supplied environment source.
  pub fn load_with(config_file: Option<&Path>, env: Environment) -> Result<Self> {
    let file = match config_file {
      Some(path) => File::from(path).required(true),
      None => File::from(Path::new(DEFAULT_CONFIG_FILE)).required(false),
    };

    let settings = Config::builder()
      .add_source(file)
      .add_source(env)
      .build()?
      .try_deserialize()?;
    Ok(settings)
  }
}
