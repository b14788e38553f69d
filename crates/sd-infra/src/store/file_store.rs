//! File-backed snippet store.
//!
//! One Markdown file per snippet under a root directory, mirrored in an
//! in-memory index. `reload` rebuilds the index from disk; every other call
//! answers from the index. Writes and reloads hold the index write lock for
//! their whole duration so they never interleave.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use sd_core::ports::{ClockPort, SnippetStorePort, StoreError};
use sd_core::{Snippet, SnippetId};

use crate::codec::{self, FrontmatterError};
use crate::fs::{file_name_for, list_markdown_files, remove_file_if_exists, write_atomic};
use crate::store::search::{self, SearchOptions};

struct Entry {
    snippet: Snippet,
    path: PathBuf,
}

pub struct FileSnippetStore {
    root: PathBuf,
    clock: Arc<dyn ClockPort>,
    index: RwLock<HashMap<SnippetId, Entry>>,
}

impl FileSnippetStore {
    /// Creates the root directory if needed and loads every snippet in it.
    pub async fn open(root: impl Into<PathBuf>, clock: Arc<dyn ClockPort>) -> Result<Self, StoreError> {
        let root = root.into();
        tokio::fs::create_dir_all(&root).await.map_err(|e| {
            StoreError::io(format!("failed to create snippet directory {}", root.display()), e)
        })?;

        let store = Self {
            root,
            clock,
            index: RwLock::new(HashMap::new()),
        };
        store.reload().await?;
        Ok(store)
    }

    /// Search plus tag and language filters.
    pub async fn query(&self, options: &SearchOptions) -> Vec<Snippet> {
        let ordered = self.ordered().await;
        search::rank(&ordered, &options.query)
            .into_iter()
            .filter(|s| options.matches(s))
            .collect()
    }

    async fn ordered(&self) -> Vec<Snippet> {
        let index = self.index.read().await;
        let mut snippets: Vec<Snippet> = index.values().map(|e| e.snippet.clone()).collect();
        snippets.sort_by(|a, b| {
            b.updated_at
                .cmp(&a.updated_at)
                .then_with(|| a.id.cmp(&b.id))
        });
        snippets
    }

    async fn load_file(path: &Path) -> Result<Snippet, String> {
        let text = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| format!("read failed: {e}"))?;
        let snippet = codec::decode(&text).map_err(|e| e.to_string())?;
        snippet.validate().map_err(|e| e.to_string())?;
        Ok(snippet)
    }

    fn target_path(&self, index: &HashMap<SnippetId, Entry>, snippet: &Snippet) -> PathBuf {
        let path = self.root.join(file_name_for(snippet));
        let taken = index
            .iter()
            .any(|(id, entry)| id != &snippet.id && entry.path == path);
        if !taken {
            return path;
        }
        // Same title saved within the same second as another snippet.
        let stem = file_name_for(snippet);
        let stem = stem.trim_end_matches(".md");
        self.root
            .join(format!("{}_{}.md", stem, snippet.id.short(8)))
    }
}

fn codec_error(path: &Path, err: FrontmatterError) -> StoreError {
    match err {
        FrontmatterError::Invalid(invalid) => StoreError::InvalidSnippet(invalid),
        other => StoreError::Codec {
            path: path.display().to_string(),
            message: other.to_string(),
        },
    }
}

#[async_trait]
impl SnippetStorePort for FileSnippetStore {
    async fn list_all(&self) -> Result<Vec<Snippet>, StoreError> {
        Ok(self.ordered().await)
    }

    async fn get(&self, id: &SnippetId) -> Result<Snippet, StoreError> {
        self.index
            .read()
            .await
            .get(id)
            .map(|e| e.snippet.clone())
            .ok_or_else(|| StoreError::NotFound(id.clone()))
    }

    async fn search(&self, query: &str) -> Result<Vec<Snippet>, StoreError> {
        let ordered = self.ordered().await;
        Ok(search::rank(&ordered, query))
    }

    async fn save(&self, snippet: &Snippet) -> Result<(), StoreError> {
        snippet.validate()?;
        let mut record = snippet.clone();
        record.updated_at = self.clock.now();

        let mut index = self.index.write().await;
        let path = self.target_path(&index, &record);
        let text = codec::encode(&record).map_err(|e| codec_error(&path, e))?;

        write_atomic(&path, &text)
            .await
            .map_err(|e| StoreError::io(format!("failed to write {}", path.display()), e))?;

        if let Some(previous) = index.get(&record.id).map(|e| e.path.clone()) {
            if previous != path {
                if let Err(err) = remove_file_if_exists(&previous).await {
                    warn!(path = %previous.display(), error = %err, "failed to remove previous snippet file");
                }
            }
        }

        debug!(snippet_id = %record.id, path = %path.display(), "snippet written");
        index.insert(
            record.id.clone(),
            Entry {
                snippet: record,
                path,
            },
        );
        Ok(())
    }

    async fn delete(&self, id: &SnippetId) -> Result<(), StoreError> {
        let mut index = self.index.write().await;
        let path = index
            .get(id)
            .map(|e| e.path.clone())
            .ok_or_else(|| StoreError::NotFound(id.clone()))?;

        remove_file_if_exists(&path)
            .await
            .map_err(|e| StoreError::io(format!("failed to delete {}", path.display()), e))?;
        index.remove(id);
        debug!(snippet_id = %id, "snippet deleted");
        Ok(())
    }

    async fn reload(&self) -> Result<(), StoreError> {
        let mut index = self.index.write().await;
        let files = list_markdown_files(&self.root).await.map_err(|e| {
            StoreError::io(format!("failed to list {}", self.root.display()), e)
        })?;

        let mut fresh: HashMap<SnippetId, Entry> = HashMap::with_capacity(files.len());
        let mut skipped = 0usize;
        for path in files {
            let snippet = match Self::load_file(&path).await {
                Ok(snippet) => snippet,
                Err(reason) => {
                    warn!(path = %path.display(), %reason, "skipping snippet file");
                    skipped += 1;
                    continue;
                }
            };

            if let Some(existing) = fresh.get(&snippet.id) {
                warn!(
                    snippet_id = %snippet.id,
                    kept = %existing.path.display(),
                    other = %path.display(),
                    "duplicate snippet id on disk"
                );
                if existing.snippet.updated_at >= snippet.updated_at {
                    continue;
                }
            }
            fresh.insert(snippet.id.clone(), Entry { snippet, path });
        }

        info!(root = %self.root.display(), loaded = fresh.len(), skipped, "snippets reloaded");
        *index = fresh;
        Ok(())
    }
}
