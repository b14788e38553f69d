use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// What the editing session does with the local draft when an immediate-path
/// write (tag add/remove, favorite toggle) fails.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImmediateFailurePolicy {
    /// Revert the attempted mutation so the draft matches what the store holds.
    #[default]
    Rollback,
    /// Keep the attempted mutation in the draft even though it was not saved.
    Keep,
}

impl ImmediateFailurePolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            ImmediateFailurePolicy::Rollback => "rollback",
            ImmediateFailurePolicy::Keep => "keep",
        }
    }
}

/// Application configuration DTO (pure data, no logic)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// Directory holding one Markdown file per snippet
    pub data_dir: PathBuf,

    pub immediate_failure: ImmediateFailurePolicy,

    /// Log directory override; `None` means `<app data root>/logs`
    pub log_dir: Option<PathBuf>,
}
