pub mod codec;
pub mod config;
pub mod fs;
pub mod store;
pub mod time;

pub use store::{FileSnippetStore, SearchOptions};
pub use time::SystemClock;
