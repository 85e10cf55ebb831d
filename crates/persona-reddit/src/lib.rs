//! Reddit data-API client implementing [`persona_core::source::ContentSource`].
//!
//! Uses application-only OAuth (`client_credentials`): a bearer token is
//! fetched from the auth host on first use and reused until it expires.

mod client;
mod wire;

pub mod error;

pub use client::{RedditClient, RedditConfig};
pub use error::{Error, Result};
