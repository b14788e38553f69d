pub mod snippet_files;

pub use snippet_files::{file_name_for, list_markdown_files, remove_file_if_exists, write_atomic};
