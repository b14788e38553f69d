//! Blocking confirmation capability.

use async_trait::async_trait;

/// Questions the session may put to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfirmPrompt {
    DiscardUnsavedChanges {
        current_title: String,
        target_title: String,
    },
    DeleteSnippet {
        title: String,
    },
    QuitWithUnsavedChanges {
        title: String,
    },
}

impl ConfirmPrompt {
    pub fn message(&self) -> String {
        match self {
            ConfirmPrompt::DiscardUnsavedChanges {
                current_title,
                target_title,
            } => format!(
                "\"{current_title}\" has unsaved changes. Discard them and switch to \"{target_title}\"?"
            ),
            ConfirmPrompt::DeleteSnippet { title } => {
                format!("Permanently delete \"{title}\"? This cannot be undone.")
            }
            ConfirmPrompt::QuitWithUnsavedChanges { title } => {
                format!("\"{title}\" has unsaved changes. Quit anyway?")
            }
        }
    }
}

/// Asks the user a yes/no question and waits for the answer.
///
/// Implementations return `false` when no answer can be obtained.
#[async_trait]
pub trait ConfirmationPort: Send + Sync {
    async fn confirm(&self, prompt: &ConfirmPrompt) -> bool;
}
