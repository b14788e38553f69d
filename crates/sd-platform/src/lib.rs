//! # sd-platform
//!
//! Adapters that touch the host: the system clipboard, the terminal the user
//! answers prompts in, and the per-user application directories.

pub mod adapters;
pub mod app_dirs;

pub use adapters::{ArboardClipboard, TerminalPrompt};
pub use app_dirs::DirsAppDirsAdapter;
