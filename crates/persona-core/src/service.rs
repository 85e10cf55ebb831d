//! The pipeline both front-ends drive: resolve → collect → synthesize → save.

use std::path::PathBuf;

use tracing::info;

use crate::{
  Result,
  collect::ContentCollector,
  completion::CompletionClient,
  model::{Model, PersonaDocument, Username},
  output::OutputWriter,
  resolve::resolve,
  source::ContentSource,
  synth::PersonaSynthesizer,
};

// ─── Progress ────────────────────────────────────────────────────────────────

/// Pipeline progress, reported as each step starts.
#[derive(Debug, Clone, PartialEq)]
pub enum Stage {
  Resolving,
  Collecting { username: Username },
  Generating { posts: usize, comments: usize },
  Saving,
  Done { path: PathBuf },
}

impl Stage {
  /// Completion percentage shown by progress indicators.
  pub fn percent(&self) -> u16 {
    match self {
      Stage::Resolving => 20,
      Stage::Collecting { .. } => 40,
      Stage::Generating { .. } => 60,
      Stage::Saving => 80,
      Stage::Done { .. } => 100,
    }
  }
}

/// Outcome of a successful run.
#[derive(Debug, Clone)]
pub struct PersonaReport {
  pub username:       Username,
  pub total_posts:    usize,
  pub total_comments: usize,
  pub document:       PersonaDocument,
  pub path:           PathBuf,
}

// ─── Service ─────────────────────────────────────────────────────────────────

/// One profile, start to finish, strictly in sequence. Nothing is retried.
pub struct PersonaService<S, C> {
  collector:   ContentCollector<S>,
  synthesizer: PersonaSynthesizer<C>,
  writer:      OutputWriter,
}

impl<S, C> PersonaService<S, C>
where
  S: ContentSource,
  C: CompletionClient,
{
  pub fn new(source: S, client: C, writer: OutputWriter) -> Self {
    Self {
      collector: ContentCollector::new(source),
      synthesizer: PersonaSynthesizer::new(client),
      writer,
    }
  }

  /// Run the full pipeline for the profile at `url`.
  ///
  /// `on_stage` is called as each step begins; on failure the last reported
  /// stage is where the run stopped.
  pub async fn run(
    &self,
    url: &str,
    limit: usize,
    model: Model,
    mut on_stage: impl FnMut(Stage) + Send,
  ) -> Result<PersonaReport> {
    on_stage(Stage::Resolving);
    let username = resolve(url)?;
    info!(%username, "resolved profile");

    on_stage(Stage::Collecting { username: username.clone() });
    let dataset = self.collector.collect(&username, limit).await?;
    info!(
      %username,
      posts = dataset.total_posts(),
      comments = dataset.total_comments(),
      "collected content"
    );

    on_stage(Stage::Generating {
      posts:    dataset.total_posts(),
      comments: dataset.total_comments(),
    });
    self.synthesizer.check_connection(model).await?;
    let document = self.synthesizer.synthesize(&dataset, model).await?;

    on_stage(Stage::Saving);
    let path = self.writer.save(&document, &username).await?;

    on_stage(Stage::Done { path: path.clone() });
    Ok(PersonaReport {
      total_posts: dataset.total_posts(),
      total_comments: dataset.total_comments(),
      username,
      document,
      path,
    })
  }
}
