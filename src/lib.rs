//! # snipdesk
//!
//! Binary-side crate: bootstrap (config, tracing, wiring), the command-line
//! interface and the interactive editing shell.

pub mod bootstrap;
pub mod cli;
pub mod render;
pub mod shell;
