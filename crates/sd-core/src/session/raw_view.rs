//! Read-only frontmatter + body projection of a draft.
//!
//! This is a display-only view. Nothing parses it back into a draft.

use chrono::SecondsFormat;

use crate::snippet::Snippet;

fn quoted(value: &str) -> String {
    serde_json::to_string(value).unwrap_or_else(|_| format!("\"{value}\""))
}

pub fn render_raw(record: &Snippet) -> String {
    let tags = record
        .tags
        .iter()
        .map(|t| quoted(t))
        .collect::<Vec<_>>()
        .join(", ");

    format!(
        "---\nid: {id}\ntitle: {title}\ntags: [{tags}]\nlanguage: {language}\nis_favorite: {fav}\ncreated_at: {created}\nupdated_at: {updated}\n---\n\n{body}",
        id = quoted(record.id.as_str()),
        title = quoted(&record.title),
        language = quoted(&record.language),
        fav = record.is_favorite,
        created = quoted(&record.created_at.to_rfc3339_opts(SecondsFormat::Secs, true)),
        updated = quoted(&record.updated_at.to_rfc3339_opts(SecondsFormat::Secs, true)),
        body = record.body,
    )
}
