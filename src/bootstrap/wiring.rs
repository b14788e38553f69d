//! # Dependency Injection / 依赖注入模块
//!
//! The only place that depends on sd-infra, sd-platform and sd-app at once.
//! It assembles adapters behind their ports and makes no decisions.
//! 这是唯一同时依赖 sd-infra、sd-platform 和 sd-app 的地方，只负责组装。

use std::sync::Arc;

use sd_app::SessionController;
use sd_core::ports::{ClipboardPort, ClockPort, ConfirmationPort, NoticePort, SnippetStorePort};
use sd_core::{AppConfig, ImmediateFailurePolicy};
use sd_infra::{FileSnippetStore, SystemClock};
use sd_platform::{ArboardClipboard, TerminalPrompt};

/// Errors during dependency injection
/// 依赖注入错误（基础设施初始化失败）
#[derive(Debug, thiserror::Error)]
pub enum WiringError {
    #[error("Snippet store initialization failed: {0}")]
    StoreInit(String),
}

pub type WiringResult<T> = Result<T, WiringError>;

/// Concrete adapters for one process.
pub struct AppDeps {
    pub store: Arc<FileSnippetStore>,
    pub clipboard: Arc<dyn ClipboardPort>,
    pub prompt: Arc<TerminalPrompt>,
    pub clock: Arc<dyn ClockPort>,
    pub policy: ImmediateFailurePolicy,
}

impl AppDeps {
    pub fn session_controller(&self) -> SessionController {
        let store: Arc<dyn SnippetStorePort> = self.store.clone();
        let confirm: Arc<dyn ConfirmationPort> = self.prompt.clone();
        let notices: Arc<dyn NoticePort> = self.prompt.clone();
        SessionController::new(
            store,
            self.clipboard.clone(),
            confirm,
            notices,
            self.clock.clone(),
            self.policy,
        )
    }
}

/// Opens the store over the configured directory and pairs it with the
/// terminal and system clipboard adapters.
pub async fn wire_dependencies(config: &AppConfig) -> WiringResult<AppDeps> {
    let clock: Arc<dyn ClockPort> = Arc::new(SystemClock);
    let store = FileSnippetStore::open(&config.data_dir, clock.clone())
        .await
        .map_err(|e| WiringError::StoreInit(e.to_string()))?;

    tracing::info!(data_dir = %config.data_dir.display(), policy = ?config.immediate_failure, "dependencies wired");

    Ok(AppDeps {
        store: Arc::new(store),
        clipboard: Arc::new(ArboardClipboard::new()),
        prompt: Arc::new(TerminalPrompt::stdio()),
        clock,
        policy: config.immediate_failure,
    })
}
