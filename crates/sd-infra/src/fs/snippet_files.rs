//! Filesystem helpers for the snippet directory.

use std::io;
use std::path::{Path, PathBuf};

use tokio::fs;

use sd_core::Snippet;

const RESERVED: &[char] = &[' ', '/', '\\', ':', '*', '?', '"', '<', '>', '|'];

/// `{title}_{YYYYMMDD_HHMMSS}.md`, with path-hostile characters in the title
/// replaced by `_`.
pub fn file_name_for(snippet: &Snippet) -> String {
    let title: String = snippet
        .title
        .chars()
        .map(|c| if RESERVED.contains(&c) { '_' } else { c })
        .collect();
    format!(
        "{}_{}.md",
        title,
        snippet.updated_at.format("%Y%m%d_%H%M%S")
    )
}

/// Every `.md` file (case-insensitive) below `root`, recursively, sorted.
pub async fn list_markdown_files(root: &Path) -> io::Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    let mut pending = vec![root.to_path_buf()];

    while let Some(dir) = pending.pop() {
        let mut entries = fs::read_dir(&dir).await?;
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            let file_type = entry.file_type().await?;
            if file_type.is_dir() {
                pending.push(path);
            } else if is_markdown(&path) {
                files.push(path);
            }
        }
    }

    files.sort();
    Ok(files)
}

fn is_markdown(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("md"))
}

/// Writes through a sibling temp file and renames it into place.
pub async fn write_atomic(path: &Path, contents: &str) -> io::Result<()> {
    let tmp = path.with_extension("md.tmp");
    fs::write(&tmp, contents).await?;
    fs::rename(&tmp, path).await
}

pub async fn remove_file_if_exists(path: &Path) -> io::Result<()> {
    match fs::remove_file(path).await {
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
        other => other,
    }
}
