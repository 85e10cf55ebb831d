//! The `ContentSource` trait: the data-API collaborator.
//!
//! Implemented by `persona-reddit` against Reddit's OAuth API. The collector
//! depends only on this abstraction.

use std::future::Future;

use crate::model::{Comment, Post, Username};

/// Read access to a user's public history.
///
/// Authentication, pagination, and rate limiting are the implementation's
/// business. Each method is a single request/response from the caller's
/// point of view.
pub trait ContentSource: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Succeeds only if the account exists and is accessible.
  fn lookup_user(
    &self,
    username: &Username,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send;

  /// Up to `limit` of the user's submissions, newest first.
  fn submissions(
    &self,
    username: &Username,
    limit: usize,
  ) -> impl Future<Output = Result<Vec<Post>, Self::Error>> + Send;

  /// Up to `limit` of the user's comments, newest first.
  fn comments(
    &self,
    username: &Username,
    limit: usize,
  ) -> impl Future<Output = Result<Vec<Comment>, Self::Error>> + Send;
}
