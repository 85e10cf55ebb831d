//! Core types, collaborator traits, and the persona pipeline.
//!
//! The pipeline is four sequential steps: resolve a profile URL, collect the
//! user's content, synthesize a persona through a completion API, and write
//! the result to disk. The remote collaborators are abstracted behind
//! [`source::ContentSource`] and [`completion::CompletionClient`] so that the
//! HTTP clients (`persona-reddit`, `persona-groq`) live in their own crates.

pub mod collect;
pub mod completion;
pub mod error;
pub mod model;
pub mod output;
pub mod resolve;
pub mod service;
pub mod settings;
pub mod source;
pub mod synth;

pub use error::{CompletionError, Error, Result};
pub use model::{Comment, Model, PersonaDocument, Post, UserDataset, Username};
pub use service::{PersonaReport, PersonaService, Stage};
pub use settings::Settings;

#[cfg(test)]
mod tests;
