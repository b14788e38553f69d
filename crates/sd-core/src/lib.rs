//! # sd-core
//!
//! Core domain models and port contracts for SnipDesk.
//!
//! This crate contains the snippet model, the editing draft and its dirty rules,
//! the navigation guard transition table and the list query types. It performs
//! no I/O; everything that talks to the outside world is a trait in [`ports`].

pub mod app_dirs;
pub mod config;
pub mod ids;
pub mod language;
pub mod list;
pub mod ports;
pub mod session;
pub mod snippet;

// Re-export commonly used types at the crate root
pub use config::{AppConfig, ImmediateFailurePolicy};
pub use ids::SnippetId;
pub use language::LanguageMode;
pub use list::{ListRequest, ListStatus, RefreshToken};
pub use session::{Draft, GuardAction, GuardEvent, GuardState, NavigationGuardMachine};
pub use snippet::{Snippet, SnippetError};
