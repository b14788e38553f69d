//! Port interfaces for the application layer
//!
//! Ports define the contract between the session use cases and the
//! infrastructure or platform adapters that implement them. Use cases hold
//! them as `Arc<dyn Port>`; tests substitute fakes or `mockall` mocks.

pub mod app_dirs;
pub mod clipboard;
mod clock;
pub mod confirm;
pub mod errors;
pub mod notice;
pub mod snippet_store;

pub use app_dirs::AppDirsPort;
pub use clipboard::ClipboardPort;
pub use clock::*;
pub use confirm::{ConfirmPrompt, ConfirmationPort};
pub use errors::{AppDirsError, StoreError};
pub use notice::{Notice, NoticeLevel, NoticePort};
pub use snippet_store::SnippetStorePort;
