//! System clipboard adapter
//! 系统剪贴板适配器

use std::sync::{Arc, Mutex};

use anyhow::Result;
use async_trait::async_trait;
use tokio::task::spawn_blocking;
use tracing::debug;

use sd_core::ports::ClipboardPort;

/// Clipboard sink backed by `arboard`.
///
/// The handle is opened on first use and kept for the process lifetime, since
/// some X11 setups drop clipboard contents when the owning handle goes away.
pub struct ArboardClipboard {
    inner: Arc<Mutex<Option<arboard::Clipboard>>>,
}

impl ArboardClipboard {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(None)),
        }
    }
}

impl Default for ArboardClipboard {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ClipboardPort for ArboardClipboard {
    async fn write_text(&self, text: &str) -> Result<()> {
        let inner = self.inner.clone();
        let text = text.to_string();
        let len = text.len();

        spawn_blocking(move || {
            let mut guard = inner
                .lock()
                .map_err(|e| anyhow::anyhow!("Failed to lock clipboard: {}", e))?;
            if guard.is_none() {
                let clipboard = arboard::Clipboard::new()
                    .map_err(|e| anyhow::anyhow!("Failed to open clipboard: {}", e))?;
                *guard = Some(clipboard);
            }
            match guard.as_mut() {
                Some(clipboard) => clipboard
                    .set_text(text)
                    .map_err(|e| anyhow::anyhow!("Failed to write text: {}", e)),
                None => Err(anyhow::anyhow!("Clipboard unavailable")),
            }
        })
        .await
        .map_err(|e| anyhow::anyhow!("Task join error: {}", e))??;

        debug!(bytes = len, "text copied to clipboard");
        Ok(())
    }
}
