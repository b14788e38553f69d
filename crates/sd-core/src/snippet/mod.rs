//! Snippet domain model.

mod error;
mod model;

pub use error::SnippetError;
pub use model::Snippet;
