//! `persona-tui`: interactive terminal front end for the persona generator.
//!
//! # Usage
//!
//! ```text
//! persona-tui
//! persona-tui --config persona.toml --output-dir personas
//! ```
//!
//! Set `RUST_LOG` to write diagnostics to `persona-tui.log`; the terminal
//! itself is owned by the UI.

mod app;
mod ui;

use std::{fs::File, io, path::PathBuf, sync::Mutex, time::Duration};

use anyhow::{Context, Result};
use app::App;
use clap::Parser;
use crossterm::{
  event::{self, Event, KeyEventKind},
  execute,
  terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use persona_core::{
  PersonaService, Settings,
  completion::CompletionClient,
  output::OutputWriter,
  source::ContentSource,
};
use persona_groq::{GroqClient, GroqConfig};
use persona_reddit::{RedditClient, RedditConfig};
use ratatui::{Terminal, backend::CrosstermBackend};
use tracing_subscriber::EnvFilter;

const LOG_FILE: &str = "persona-tui.log";

// ─── CLI args ─────────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(name = "persona-tui", about = "Terminal UI for the Reddit persona generator")]
struct Args {
  /// Path to a TOML settings file (default: ./persona.toml if present).
  #[arg(short, long, value_name = "FILE")]
  config: Option<PathBuf>,

  /// Directory persona files are written to.
  #[arg(long, value_name = "DIR")]
  output_dir: Option<PathBuf>,
}

// ─── Entry point ──────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
  let args = Args::parse();
  dotenvy::dotenv().ok();

  if std::env::var_os("RUST_LOG").is_some() {
    let file = File::create(LOG_FILE).with_context(|| format!("creating {LOG_FILE}"))?;
    tracing_subscriber::fmt()
      .with_env_filter(EnvFilter::from_default_env())
      .with_writer(Mutex::new(file))
      .with_ansi(false)
      .init();
  }

  let mut settings = Settings::load(args.config.as_deref()).context("loading settings")?;
  if let Some(dir) = args.output_dir {
    settings.output_dir = dir;
  }
  tracing::debug!(?settings, "loaded settings");

  let reddit =
    RedditClient::new(RedditConfig::from(&settings)).context("building Reddit client")?;
  let groq = GroqClient::new(GroqConfig::from(&settings)).context("building Groq client")?;
  let mut app = App::new(PersonaService::new(
    reddit,
    groq,
    OutputWriter::new(&settings.output_dir),
  ));

  // Set up the terminal.
  enable_raw_mode().context("enabling raw mode")?;
  let mut stdout = io::stdout();
  execute!(stdout, EnterAlternateScreen).context("entering alternate screen")?;
  let backend = CrosstermBackend::new(stdout);
  let mut terminal = Terminal::new(backend).context("creating terminal")?;

  let run_result = run_event_loop(&mut terminal, &mut app).await;

  // Restore terminal regardless of result.
  disable_raw_mode().ok();
  execute!(terminal.backend_mut(), LeaveAlternateScreen).ok();
  terminal.show_cursor().ok();

  run_result
}

// ─── Event loop ───────────────────────────────────────────────────────────────

async fn run_event_loop<S, C>(
  terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
  app: &mut App<S, C>,
) -> Result<()>
where
  S: ContentSource + 'static,
  C: CompletionClient + 'static,
{
  loop {
    app.poll_events();
    terminal.draw(|f| ui::draw(f, app)).context("drawing frame")?;

    // Poll for an event, yielding control to tokio while waiting.
    let maybe_event = tokio::task::block_in_place(|| {
      if event::poll(Duration::from_millis(50))? {
        Ok::<_, io::Error>(Some(event::read()?))
      } else {
        Ok(None)
      }
    })?;

    if let Some(Event::Key(key)) = maybe_event {
      if key.kind == KeyEventKind::Press && !app.handle_key(key) {
        break;
      }
    }
  }

  Ok(())
}
