//! ID type wrappers for type safety.

mod id_macro;
pub mod snippet_id;

pub use snippet_id::SnippetId;
