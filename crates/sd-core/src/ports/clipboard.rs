//! Clipboard port - abstracts the system clipboard sink

use anyhow::Result;
use async_trait::async_trait;

/// Write-only clipboard access. The session only ever copies snippet bodies out.
#[async_trait]
pub trait ClipboardPort: Send + Sync {
    async fn write_text(&self, text: &str) -> Result<()>;
}
