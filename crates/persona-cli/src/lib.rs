//! Command-line front-end over [`PersonaService`].
//!
//! `main.rs` wires the real clients; everything that decides what the user
//! sees lives here so it can run against stub collaborators.

use std::{io::Write, path::PathBuf};

use clap::{
  Parser,
  builder::{PossibleValuesParser, TypedValueParser as _},
};
use persona_core::{
  Error, Model, PersonaReport, PersonaService, Stage,
  completion::CompletionClient,
  source::ContentSource,
};

/// Characters of the persona echoed to stdout after a successful run.
pub const PREVIEW_CHARS: usize = 500;

#[derive(Parser, Debug)]
#[command(
  name = "persona",
  author,
  version,
  about = "Generate Reddit user personas using Groq Llama3 analysis"
)]
pub struct Cli {
  /// Reddit profile URL (e.g., https://www.reddit.com/user/username/)
  #[arg(long)]
  pub url: String,

  /// Maximum number of posts/comments to scrape
  #[arg(long, default_value_t = 100)]
  pub limit: usize,

  /// Groq model to use
  #[arg(
    long,
    default_value = "llama3-70b-8192",
    value_parser = PossibleValuesParser::new(Model::IDS).try_map(|s| s.parse::<Model>())
  )]
  pub model: Model,

  /// Path to a TOML configuration file [default: persona.toml, if present]
  #[arg(short, long, value_name = "FILE")]
  pub config: Option<PathBuf>,

  /// Directory persona files are written to (overrides the configuration)
  #[arg(long, value_name = "DIR")]
  pub output_dir: Option<PathBuf>,
}

/// Run the pipeline for `cli`, reporting progress and the outcome to `out`.
///
/// Write errors on `out` are ignored; the returned result is the pipeline's.
pub async fn execute<S, C, W>(
  cli: &Cli,
  service: &PersonaService<S, C>,
  out: &mut W,
) -> Result<PersonaReport, Error>
where
  S: ContentSource,
  C: CompletionClient,
  W: Write + Send,
{
  let model = cli.model;
  let result = service
    .run(&cli.url, cli.limit, model, |stage| {
      let _ = print_stage(out, &stage, model);
    })
    .await;

  let _ = match &result {
    Ok(report) => print_report(out, report),
    Err(e) => print_error(out, e),
  };
  result
}

/// Process exit status for a finished run.
pub fn exit_status<T>(result: &Result<T, Error>) -> u8 {
  if result.is_ok() { 0 } else { 1 }
}

fn print_stage(out: &mut impl Write, stage: &Stage, model: Model) -> std::io::Result<()> {
  match stage {
    Stage::Resolving => writeln!(out, "👤 Extracting username..."),
    Stage::Collecting { username } => {
      writeln!(out, "Found username: {username}")?;
      writeln!(out, "📥 Scraping Reddit data...")
    }
    Stage::Generating { posts, comments } => {
      writeln!(out, "Found {posts} posts and {comments} comments")?;
      writeln!(out, "🤖 Generating persona with Groq {model}...")
    }
    Stage::Saving => writeln!(out, "💾 Saving persona file..."),
    Stage::Done { .. } => Ok(()),
  }
}

fn print_report(out: &mut impl Write, report: &PersonaReport) -> std::io::Result<()> {
  writeln!(out, "✅ Persona generated successfully!")?;
  writeln!(out, "📁 Saved to: {}", report.path.display())?;
  writeln!(out)?;
  writeln!(out, "{}", "=".repeat(50))?;
  writeln!(out, "PERSONA PREVIEW")?;
  writeln!(out, "{}", "=".repeat(50))?;
  writeln!(out, "{}", preview(&report.document.text))
}

fn print_error(out: &mut impl Write, error: &Error) -> std::io::Result<()> {
  writeln!(out, "❌ Error: {error}")?;
  if let Some(hint) = error.hint() {
    writeln!(out, "{hint}")?;
  }
  Ok(())
}

/// First [`PREVIEW_CHARS`] characters, with `...` appended if cut.
pub fn preview(text: &str) -> String {
  match text.char_indices().nth(PREVIEW_CHARS) {
    Some((idx, _)) => format!("{}...", &text[..idx]),
    None => text.to_string(),
  }
}
