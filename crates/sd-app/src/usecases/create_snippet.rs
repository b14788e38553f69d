use std::sync::Arc;

use tracing::{info, warn};

use sd_core::ports::{ClockPort, Notice, NoticePort, SnippetStorePort, StoreError};
use sd_core::Snippet;

use super::error::{MutationOp, SessionError};

/// Use case for creating a new snippet.
/// 创建新片段的用例。
pub struct CreateSnippet {
    store: Arc<dyn SnippetStorePort>,
    clock: Arc<dyn ClockPort>,
    notices: Arc<dyn NoticePort>,
}

impl CreateSnippet {
    pub fn new(
        store: Arc<dyn SnippetStorePort>,
        clock: Arc<dyn ClockPort>,
        notices: Arc<dyn NoticePort>,
    ) -> Self {
        Self {
            store,
            clock,
            notices,
        }
    }

    /// Builds, validates and persists a new snippet, returning the stored copy.
    ///
    /// The new snippet has a fresh id, `created_at == updated_at == now`, no
    /// tags, no language and is not a favorite.
    #[tracing::instrument(name = "usecase.create_snippet.execute", skip(self, body))]
    pub async fn execute(&self, title: &str, body: &str) -> Result<Snippet, SessionError> {
        let mut snippet = Snippet::new(title, self.clock.now());
        snippet.body = body.to_string();
        snippet.validate()?;

        if let Err(err) = self.store.save(&snippet).await {
            return Err(self.fail(MutationOp::Create, err).await);
        }
        if let Err(err) = self.store.reload().await {
            return Err(self.fail(MutationOp::Reload, err).await);
        }

        let stored = match self.store.get(&snippet.id).await {
            Ok(stored) => stored,
            Err(err) => {
                warn!(snippet_id = %snippet.id, error = %err, "using built record after create");
                snippet
            }
        };

        info!(snippet_id = %stored.id, "snippet created");
        Ok(stored)
    }

    async fn fail(&self, op: MutationOp, err: StoreError) -> SessionError {
        warn!(%op, error = %err, "create failed");
        let err = SessionError::mutation(op, err);
        self.notices.notify(&Notice::failure(err.to_string())).await;
        err
    }
}
