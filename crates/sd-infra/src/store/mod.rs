mod file_store;
pub mod search;

pub use file_store::FileSnippetStore;
pub use search::SearchOptions;
