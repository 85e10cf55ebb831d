//! Content collection: one fatal lookup, two tolerant fetches.

use tracing::{debug, warn};

use crate::{
  Error, Result,
  model::{UserDataset, Username},
  source::ContentSource,
};

/// Builds a [`UserDataset`] from a [`ContentSource`].
pub struct ContentCollector<S> {
  source: S,
}

impl<S: ContentSource> ContentCollector<S> {
  pub fn new(source: S) -> Self { Self { source } }

  pub fn source(&self) -> &S { &self.source }

  /// Collect up to `limit` newest posts and up to `limit` newest comments.
  ///
  /// Only the user lookup is fatal ([`Error::UserNotFound`]). A failure
  /// fetching posts or comments is logged and leaves that sequence empty.
  pub async fn collect(&self, username: &Username, limit: usize) -> Result<UserDataset> {
    self
      .source
      .lookup_user(username)
      .await
      .map_err(|e| Error::UserNotFound {
        username: username.to_string(),
        source:   Box::new(e),
      })?;

    let mut posts = match self.source.submissions(username, limit).await {
      Ok(posts) => posts,
      Err(e) => {
        warn!(%username, error = %e, "error fetching posts");
        Vec::new()
      }
    };
    posts.truncate(limit);

    let mut comments = match self.source.comments(username, limit).await {
      Ok(comments) => comments,
      Err(e) => {
        warn!(%username, error = %e, "error fetching comments");
        Vec::new()
      }
    };
    comments.truncate(limit);

    debug!(%username, posts = posts.len(), comments = comments.len(), "collected content");

    Ok(UserDataset { username: username.clone(), posts, comments })
  }
}
