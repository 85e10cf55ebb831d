//! Persona files on disk: one `<username>_persona.txt` per user.

use std::path::PathBuf;

use tracing::info;

use crate::{
  Error, Result,
  model::{PersonaDocument, Username},
};

/// Format of the generation timestamp appended to every persona file.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Writes persona documents under a fixed directory. Last write wins.
#[derive(Debug, Clone)]
pub struct OutputWriter {
  dir: PathBuf,
}

impl OutputWriter {
  pub fn new(dir: impl Into<PathBuf>) -> Self { Self { dir: dir.into() } }

  pub fn path_for(&self, username: &Username) -> PathBuf {
    self.dir.join(format!("{username}_persona.txt"))
  }

  /// File contents for `document`: the text, a blank line, the timestamp.
  pub fn render(document: &PersonaDocument) -> String {
    format!(
      "{}\n\nGenerated on: {}",
      document.text,
      document.generated_at.format(TIMESTAMP_FORMAT)
    )
  }

  /// Create the output directory if needed and (over)write the persona file.
  pub async fn save(&self, document: &PersonaDocument, username: &Username) -> Result<PathBuf> {
    tokio::fs::create_dir_all(&self.dir)
      .await
      .map_err(|source| Error::WriteFailure { path: self.dir.clone(), source })?;

    let path = self.path_for(username);
    tokio::fs::write(&path, Self::render(document))
      .await
      .map_err(|source| Error::WriteFailure { path: path.clone(), source })?;

    info!(path = %path.display(), "saved persona");
    Ok(path)
  }
}
