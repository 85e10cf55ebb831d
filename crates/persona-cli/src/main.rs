//! `persona`: generate a persona for one Reddit profile.
//!
//! # Usage
//!
//! ```text
//! persona --url https://www.reddit.com/user/spez/
//! persona --url https://www.reddit.com/u/spez --limit 50 --model llama3-8b-8192
//! ```
//!
//! Credentials come from the environment (`REDDIT_CLIENT_ID`,
//! `REDDIT_CLIENT_SECRET`, `GROQ_API_KEY`), a `.env` file, or `persona.toml`.

use std::process::ExitCode;

use anyhow::Context as _;
use clap::Parser;
use persona_cli::{Cli, execute, exit_status};
use persona_core::{PersonaService, Settings, output::OutputWriter};
use persona_groq::{GroqClient, GroqConfig};
use persona_reddit::{RedditClient, RedditConfig};
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
  dotenvy::dotenv().ok();

  // Diagnostics go to stderr; stdout carries the progress lines.
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::WARN.into())
        .from_env_lossy(),
    )
    .with_writer(std::io::stderr)
    .init();

  let cli = Cli::parse();

  let mut settings = Settings::load(cli.config.as_deref()).context("failed to load settings")?;
  if let Some(dir) = &cli.output_dir {
    settings.output_dir = dir.clone();
  }
  tracing::debug!(?settings, "loaded settings");

  println!("🔄 Initializing Reddit scraper...");
  let reddit = RedditClient::new(RedditConfig::from(&settings))
    .context("failed to build Reddit client")?;
  let groq = GroqClient::new(GroqConfig::from(&settings))
    .context("failed to build Groq client")?;
  let service = PersonaService::new(reddit, groq, OutputWriter::new(&settings.output_dir));

  let result = execute(&cli, &service, &mut std::io::stdout()).await;
  Ok(ExitCode::from(exit_status(&result)))
}
