use crate::ids::SnippetId;
use crate::language::LanguageMode;
use crate::snippet::Snippet;

use super::raw_view::render_raw;

/// The fields that only persist on an explicit save.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeferredFields {
    pub title: String,
    pub body: String,
    pub language: String,
}

impl DeferredFields {
    pub fn of(snippet: &Snippet) -> Self {
        Self {
            title: snippet.title.clone(),
            body: snippet.body.clone(),
            language: snippet.language.clone(),
        }
    }
}

/// Whether `current` differs from the last persisted `previous` values.
pub fn compute_dirty(previous: &DeferredFields, current: &DeferredFields) -> bool {
    previous != current
}

/// Session-local working copy of one snippet.
///
/// Exactly one `Draft` exists per selected snippet. It is created by
/// [`Draft::load`] and replaced wholesale on every selection change; fields are
/// never merged from a previous draft.
///
/// Dirtiness is sticky: any title/body/language edit marks the draft dirty and
/// only a fresh load or a successful save (see [`Draft::rebaseline`]) clears it.
/// Tag and favorite edits never touch it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Draft {
    record: Snippet,
    baseline: DeferredFields,
    tag_input: String,
    dirty: bool,
    raw_mode: bool,
}

impl Draft {
    pub fn load(snippet: Snippet) -> Self {
        Self {
            baseline: DeferredFields::of(&snippet),
            record: snippet,
            tag_input: String::new(),
            dirty: false,
            raw_mode: false,
        }
    }

    pub fn id(&self) -> &SnippetId {
        &self.record.id
    }

    pub fn record(&self) -> &Snippet {
        &self.record
    }

    /// Full record as it would be sent to the store right now.
    pub fn to_record(&self) -> Snippet {
        self.record.clone()
    }

    pub fn title(&self) -> &str {
        &self.record.title
    }

    pub fn body(&self) -> &str {
        &self.record.body
    }

    pub fn language(&self) -> &str {
        &self.record.language
    }

    pub fn language_mode(&self) -> LanguageMode {
        LanguageMode::resolve(&self.record.language)
    }

    pub fn tags(&self) -> &[String] {
        &self.record.tags
    }

    pub fn is_favorite(&self) -> bool {
        self.record.is_favorite
    }

    pub fn tag_input(&self) -> &str {
        &self.tag_input
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn baseline(&self) -> &DeferredFields {
        &self.baseline
    }

    pub fn current_fields(&self) -> DeferredFields {
        DeferredFields::of(&self.record)
    }

    pub fn edit_title(&mut self, text: impl Into<String>) {
        self.record.title = text.into();
        self.dirty = true;
    }

    pub fn edit_body(&mut self, text: impl Into<String>) {
        self.record.body = text.into();
        self.dirty = true;
    }

    pub fn edit_language(&mut self, text: impl Into<String>) {
        self.record.language = text.into();
        self.dirty = true;
    }

    pub fn set_tag_input(&mut self, text: impl Into<String>) {
        self.tag_input = text.into();
    }

    /// Appends the trimmed tag. Returns the tag that was added, or `None` when
    /// the text is blank or already present (case-sensitive).
    pub fn add_tag(&mut self, text: &str) -> Option<String> {
        let tag = text.trim();
        if tag.is_empty() || self.record.has_tag(tag) {
            return None;
        }
        self.record.tags.push(tag.to_string());
        self.tag_input.clear();
        Some(tag.to_string())
    }

    /// Removes the first tag equal to `tag`, returning its former position.
    pub fn remove_tag(&mut self, tag: &str) -> Option<usize> {
        let index = self.record.tags.iter().position(|t| t == tag)?;
        self.record.tags.remove(index);
        Some(index)
    }

    /// Puts a removed tag back at (at most) its former position.
    pub fn restore_tag(&mut self, tag: &str, index: usize) {
        if self.record.has_tag(tag) {
            return;
        }
        let index = index.min(self.record.tags.len());
        self.record.tags.insert(index, tag.to_string());
    }

    /// Returns the new favorite value.
    pub fn toggle_favorite(&mut self) -> bool {
        self.record.is_favorite = !self.record.is_favorite;
        self.record.is_favorite
    }

    pub fn set_favorite(&mut self, value: bool) {
        self.record.is_favorite = value;
    }

    /// Adopts `saved` as the new persisted baseline.
    ///
    /// Store-owned timestamps are taken from `saved`. Local fields stay as they
    /// are, so edits made while the save was in flight remain dirty.
    pub fn rebaseline(&mut self, saved: &Snippet) {
        self.baseline = DeferredFields::of(saved);
        self.record.created_at = saved.created_at;
        self.record.updated_at = saved.updated_at;
        self.dirty = compute_dirty(&self.baseline, &self.current_fields());
    }

    pub fn raw_mode(&self) -> bool {
        self.raw_mode
    }

    pub fn toggle_raw_mode(&mut self) -> bool {
        self.raw_mode = !self.raw_mode;
        self.raw_mode
    }

    /// The read-only raw projection, present only while raw mode is active.
    pub fn raw_text(&self) -> Option<String> {
        self.raw_mode.then(|| render_raw(&self.record))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn snippet(tags: &[&str]) -> Snippet {
        let mut s = Snippet::new("A", Utc.timestamp_opt(100, 0).unwrap());
        s.tags = tags.iter().map(|t| t.to_string()).collect();
        s.body = "echo a".to_string();
        s.language = "bash".to_string();
        s
    }

    #[test]
    fn deferred_edits_mark_dirty_until_rebaseline() {
        let mut draft = Draft::load(snippet(&[]));
        assert!(!draft.is_dirty());

        draft.edit_title("Z");
        assert!(draft.is_dirty());
        draft.edit_body("echo z");
        draft.edit_language("sh");
        assert!(draft.is_dirty());

        let saved = draft.to_record();
        draft.rebaseline(&saved);
        assert!(!draft.is_dirty());
    }

    #[test]
    fn editing_back_to_the_baseline_still_counts_as_dirty() {
        let mut draft = Draft::load(snippet(&[]));
        draft.edit_title("A");
        assert!(draft.is_dirty());
    }

    #[test]
    fn tag_and_favorite_edits_do_not_touch_dirty() {
        let mut draft = Draft::load(snippet(&["x"]));
        assert_eq!(draft.add_tag(" y "), Some("y".to_string()));
        assert_eq!(draft.remove_tag("x"), Some(0));
        draft.toggle_favorite();
        assert!(!draft.is_dirty());

        draft.edit_title("B");
        draft.add_tag("z");
        draft.toggle_favorite();
        assert!(draft.is_dirty());
    }

    #[test]
    fn add_tag_rejects_blank_and_duplicates() {
        let mut draft = Draft::load(snippet(&["x"]));
        draft.set_tag_input("x");
        assert_eq!(draft.add_tag(""), None);
        assert_eq!(draft.add_tag("   "), None);
        assert_eq!(draft.add_tag("x"), None);
        assert_eq!(draft.tags(), &["x".to_string()]);
        assert_eq!(draft.tag_input(), "x");

        // Case-sensitive.
        assert_eq!(draft.add_tag("X"), Some("X".to_string()));
        assert_eq!(draft.tag_input(), "");
    }

    #[test]
    fn restore_tag_puts_it_back_in_place() {
        let mut draft = Draft::load(snippet(&["a", "b", "c"]));
        let idx = draft.remove_tag("b").unwrap();
        draft.restore_tag("b", idx);
        assert_eq!(draft.tags(), &["a", "b", "c"]);
    }

    #[test]
    fn load_resets_tag_input_and_dirty() {
        let mut draft = Draft::load(snippet(&[]));
        draft.set_tag_input("pending");
        draft.edit_body("changed");
        draft.toggle_raw_mode();

        let draft = Draft::load(snippet(&[]));
        assert_eq!(draft.tag_input(), "");
        assert!(!draft.is_dirty());
        assert!(!draft.raw_mode());
    }

    #[test]
    fn rebaseline_keeps_edits_made_after_the_saved_copy() {
        let mut draft = Draft::load(snippet(&[]));
        draft.edit_title("first");
        let mut saved = draft.to_record();
        saved.updated_at = Utc.timestamp_opt(200, 0).unwrap();

        draft.edit_title("second");
        draft.rebaseline(&saved);

        assert!(draft.is_dirty());
        assert_eq!(draft.title(), "second");
        assert_eq!(draft.baseline().title, "first");
        assert_eq!(draft.record().updated_at, saved.updated_at);
    }

    #[test]
    fn raw_text_only_while_raw_mode_is_active() {
        let mut draft = Draft::load(snippet(&[]));
        assert_eq!(draft.raw_text(), None);
        assert!(draft.toggle_raw_mode());
        let raw = draft.raw_text().unwrap();
        assert!(raw.contains("title: \"A\""));
        draft.edit_title("B");
        assert!(draft.raw_text().unwrap().contains("title: \"B\""));
    }

    #[test]
    fn compute_dirty_compares_all_deferred_fields() {
        let base = DeferredFields {
            title: "t".into(),
            body: "b".into(),
            language: "l".into(),
        };
        assert!(!compute_dirty(&base, &base.clone()));
        let mut other = base.clone();
        other.language = "m".into();
        assert!(compute_dirty(&base, &other));
    }
}
