//! Plain-text rendering for the CLI and the shell.

use sd_core::list::ListRow;
use sd_core::{Draft, Snippet};

const ID_WIDTH: usize = 8;
const TITLE_WIDTH: usize = 36;

fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        return text.to_string();
    }
    let mut out: String = text.chars().take(width.saturating_sub(1)).collect();
    out.push('…');
    out
}

fn summary_line(snippet: &Snippet) -> String {
    format!(
        "{:<id$}  {:<title$}  {}{}{}",
        snippet.id.short(ID_WIDTH),
        truncate(&snippet.title, TITLE_WIDTH),
        if snippet.is_favorite { "★ " } else { "" },
        snippet.tags.iter().map(|t| format!("#{t}")).collect::<Vec<_>>().join(" "),
        if snippet.language.is_empty() {
            String::new()
        } else {
            format!("  [{}]", snippet.language)
        },
        id = ID_WIDTH,
        title = TITLE_WIDTH,
    )
    .trim_end()
    .to_string()
}

/// One line per snippet: id prefix, title, favorite, tags, language.
pub fn snippet_table(snippets: &[Snippet]) -> String {
    if snippets.is_empty() {
        return "(no snippets)\n".to_string();
    }
    snippets
        .iter()
        .map(|s| format!("{}\n", summary_line(s)))
        .collect()
}

/// Numbered list rows with the selection marked.
pub fn list_rows(rows: &[ListRow]) -> String {
    if rows.is_empty() {
        return "(no snippets)\n".to_string();
    }
    rows.iter()
        .enumerate()
        .map(|(i, row)| {
            let marker = if row.is_selected { '>' } else { ' ' };
            format!("{marker}{:>3}. {}\n", i + 1, summary_line(&row.snippet))
        })
        .collect()
}

pub fn draft_details(draft: &Draft) -> String {
    if let Some(raw) = draft.raw_text() {
        return format!("{raw}\n");
    }

    let mut out = format!(
        "{}{}\n",
        draft.title(),
        if draft.is_dirty() { "  (modified)" } else { "" }
    );
    out.push_str(&format!("id:       {}\n", draft.id()));
    out.push_str(&format!(
        "language: {} ({})\n",
        if draft.language().is_empty() { "-" } else { draft.language() },
        draft.language_mode()
    ));
    out.push_str(&format!("tags:     {}\n", draft.tags().join(", ")));
    out.push_str(&format!(
        "favorite: {}\n",
        if draft.is_favorite() { "yes" } else { "no" }
    ));
    out.push('\n');
    out.push_str(draft.body());
    if !draft.body().ends_with('\n') {
        out.push('\n');
    }
    out
}
