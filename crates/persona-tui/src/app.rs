//! Application state and key dispatch.
//!
//! A generation run is the shared [`PersonaService`] pipeline on a spawned
//! task; it reports back over a channel so the screen keeps redrawing.

use std::sync::Arc;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use persona_core::{
  Error, Model, PersonaReport, PersonaService, Stage,
  completion::CompletionClient,
  source::ContentSource,
};
use tokio::{
  sync::mpsc::{UnboundedReceiver, UnboundedSender, unbounded_channel},
  task::JoinHandle,
};

pub const MIN_LIMIT: usize = 10;
pub const MAX_LIMIT: usize = 500;
pub const LIMIT_STEP: usize = 10;
pub const DEFAULT_LIMIT: usize = 100;

// ─── Focus ────────────────────────────────────────────────────────────────────

/// Which widget receives keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
  Url,
  Limit,
  Model,
  Persona,
}

impl Focus {
  const ORDER: [Focus; 4] = [Focus::Url, Focus::Limit, Focus::Model, Focus::Persona];

  fn index(self) -> usize { Self::ORDER.iter().position(|f| *f == self).unwrap_or(0) }

  fn next(self) -> Self { Self::ORDER[(self.index() + 1) % Self::ORDER.len()] }

  fn prev(self) -> Self { Self::ORDER[(self.index() + Self::ORDER.len() - 1) % Self::ORDER.len()] }
}

// ─── Run events ───────────────────────────────────────────────────────────────

/// Messages from the pipeline task.
#[derive(Debug)]
pub enum RunEvent {
  Stage(Stage),
  Finished(Box<Result<PersonaReport, Error>>),
}

// ─── App ──────────────────────────────────────────────────────────────────────

/// Top-level application state.
pub struct App<S, C> {
  pub focus: Focus,

  /// Profile URL being typed.
  pub url: String,

  /// Posts/comments to fetch, `MIN_LIMIT..=MAX_LIMIT`.
  pub limit: usize,

  pub model: Model,

  /// A pipeline task is in flight.
  pub running: bool,

  /// Gauge position; left where it was when a run fails.
  pub progress: u16,

  /// Description of the current (or last) stage.
  pub stage_label: String,

  /// Error from the last run or from input validation.
  pub error: Option<String>,

  /// Extra guidance accompanying `error`.
  pub hint: Option<&'static str>,

  /// Result of the last successful run.
  pub report: Option<PersonaReport>,

  /// Scroll offset within the persona pane, in rendered rows.
  pub persona_scroll: u16,

  /// Largest useful `persona_scroll`, set by the persona pane on each draw.
  persona_max_scroll: u16,

  service:   Arc<PersonaService<S, C>>,
  task:      Option<JoinHandle<()>>,
  events_tx: UnboundedSender<RunEvent>,
  events_rx: UnboundedReceiver<RunEvent>,
}

impl<S, C> App<S, C>
where
  S: ContentSource + 'static,
  C: CompletionClient + 'static,
{
  pub fn new(service: PersonaService<S, C>) -> Self {
    let (events_tx, events_rx) = unbounded_channel();
    Self {
      focus: Focus::Url,
      url: String::new(),
      limit: DEFAULT_LIMIT,
      model: Model::default(),
      running: false,
      progress: 0,
      stage_label: String::new(),
      error: None,
      hint: None,
      report: None,
      persona_scroll: 0,
      persona_max_scroll: 0,
      service: Arc::new(service),
      task: None,
      events_tx,
      events_rx,
    }
  }

  // ── Runs ──────────────────────────────────────────────────────────────────

  /// Start the pipeline for the current form values.
  pub fn start_run(&mut self) {
    if self.running {
      return;
    }
    let url = self.url.trim().to_string();
    if url.is_empty() {
      self.error = Some("Please provide a Reddit profile URL.".into());
      self.hint = None;
      return;
    }

    self.running = true;
    self.progress = 0;
    self.stage_label.clear();
    self.error = None;
    self.hint = None;
    self.report = None;
    self.persona_scroll = 0;
    self.persona_max_scroll = 0;

    let service = Arc::clone(&self.service);
    let tx = self.events_tx.clone();
    let (limit, model) = (self.limit, self.model);
    self.task = Some(tokio::spawn(async move {
      let stage_tx = tx.clone();
      let result = service
        .run(&url, limit, model, move |stage| {
          let _ = stage_tx.send(RunEvent::Stage(stage));
        })
        .await;
      let _ = tx.send(RunEvent::Finished(Box::new(result)));
    }));
  }

  /// Apply every pipeline event received since the last call.
  pub fn poll_events(&mut self) {
    self.drain_events();

    // A task that ended without reporting has panicked.
    if self.task.as_ref().is_some_and(JoinHandle::is_finished) {
      self.task = None;
      self.drain_events();
      if self.running {
        tracing::error!("persona task ended without a result");
        self.running = false;
        self.hint = None;
        self.error = Some("Error: persona generation stopped unexpectedly".into());
      }
    }
  }

  fn drain_events(&mut self) {
    while let Ok(event) = self.events_rx.try_recv() {
      self.apply(event);
    }
  }

  /// Record how far the persona pane can scroll at its current size.
  pub fn fit_persona(&mut self, max_scroll: u16) {
    self.persona_max_scroll = max_scroll;
    self.persona_scroll = self.persona_scroll.min(max_scroll);
  }

  fn apply(&mut self, event: RunEvent) {
    match event {
      RunEvent::Stage(stage) => {
        self.progress = stage.percent();
        self.stage_label = stage_label(&stage, self.model);
      }
      RunEvent::Finished(result) => {
        self.running = false;
        match *result {
          Ok(report) => {
            self.stage_label = "✅ Persona generation complete!".into();
            self.focus = Focus::Persona;
            self.report = Some(report);
          }
          Err(e) => {
            tracing::warn!(error = %e, "persona run failed");
            self.hint = e.hint();
            self.error = Some(format!("Error: {e}"));
          }
        }
      }
    }
  }

  // ── Key handling ──────────────────────────────────────────────────────────

  /// Process a key event. Returns `true` to continue, `false` to quit.
  pub fn handle_key(&mut self, key: KeyEvent) -> bool {
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
      return false;
    }

    match key.code {
      KeyCode::Esc => return false,
      KeyCode::Tab => self.focus = self.focus.next(),
      KeyCode::BackTab => self.focus = self.focus.prev(),
      KeyCode::Enter => self.start_run(),
      _ => match self.focus {
        Focus::Url => self.handle_url_key(key),
        Focus::Limit => self.handle_limit_key(key),
        Focus::Model => self.handle_model_key(key),
        Focus::Persona => self.handle_persona_key(key),
      },
    }
    true
  }

  fn handle_url_key(&mut self, key: KeyEvent) {
    match key.code {
      KeyCode::Char(c) => self.url.push(c),
      KeyCode::Backspace => {
        self.url.pop();
      }
      _ => {}
    }
  }

  fn handle_limit_key(&mut self, key: KeyEvent) {
    match key.code {
      KeyCode::Left | KeyCode::Char('-') | KeyCode::Char('h') => {
        self.limit = self.limit.saturating_sub(LIMIT_STEP).max(MIN_LIMIT);
      }
      KeyCode::Right | KeyCode::Char('+') | KeyCode::Char('l') => {
        self.limit = (self.limit + LIMIT_STEP).min(MAX_LIMIT);
      }
      _ => {}
    }
  }

  fn handle_model_key(&mut self, key: KeyEvent) {
    match key.code {
      KeyCode::Left | KeyCode::Char('h') => self.model = self.model.prev(),
      KeyCode::Right | KeyCode::Char('l') | KeyCode::Char(' ') => self.model = self.model.next(),
      _ => {}
    }
  }

  fn handle_persona_key(&mut self, key: KeyEvent) {
    match key.code {
      KeyCode::Down | KeyCode::Char('j') => {
        self.persona_scroll = self.persona_scroll.saturating_add(1).min(self.persona_max_scroll);
      }
      KeyCode::Up | KeyCode::Char('k') => self.persona_scroll = self.persona_scroll.saturating_sub(1),
      KeyCode::PageDown => {
        self.persona_scroll = self.persona_scroll.saturating_add(10).min(self.persona_max_scroll);
      }
      KeyCode::PageUp => self.persona_scroll = self.persona_scroll.saturating_sub(10),
      KeyCode::Home | KeyCode::Char('g') => self.persona_scroll = 0,
      KeyCode::End | KeyCode::Char('G') => self.persona_scroll = self.persona_max_scroll,
      _ => {}
    }
  }
}

/// Status text for a stage.
fn stage_label(stage: &Stage, model: Model) -> String {
  match stage {
    Stage::Resolving => "🔄 Extracting username...".into(),
    Stage::Collecting { username } => format!("📥 Found u/{username}, scraping Reddit data..."),
    Stage::Generating { .. } => format!("🤖 Generating persona with Groq {model}..."),
    Stage::Saving => "💾 Saving persona file...".into(),
    Stage::Done { .. } => "✅ Persona generation complete!".into(),
  }
}
