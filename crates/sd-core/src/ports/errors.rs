use thiserror::Error;

use crate::ids::SnippetId;
use crate::snippet::SnippetError;

#[derive(Debug, Error)]
pub enum AppDirsError {
    #[error("system data-local directory is not available")]
    DataLocalDirUnavailable,

    #[error("system config directory is not available")]
    ConfigDirUnavailable,
}

/// Failures reported by the snippet store bridge.
///
/// 存储桥返回的错误。
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("snippet not found: {0}")]
    NotFound(SnippetId),

    #[error(transparent)]
    InvalidSnippet(#[from] SnippetError),

    #[error("failed to decode {path}: {message}")]
    Codec { path: String, message: String },

    #[error("{context}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },
}

impl StoreError {
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        StoreError::Io {
            context: context.into(),
            source,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::NotFound(_))
    }
}
