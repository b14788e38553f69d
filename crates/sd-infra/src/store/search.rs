//! Snippet search scoring.
//!
//! Titles are matched fuzzily (ordered subsequence plus a similarity ratio).
//! Snippets whose title does not match fall back to case-insensitive substring
//! matching on tags (+10) and body (+5). Title matches always outrank those.

use sd_core::Snippet;

const TAG_SCORE: i64 = 10;
const BODY_SCORE: i64 = 5;

/// Extra filters the CLI applies on top of a search.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchOptions {
    pub query: String,
    /// Every listed tag must be present (case-insensitive).
    pub tags: Vec<String>,
    /// Exact language, case-insensitive.
    pub language: Option<String>,
}

impl SearchOptions {
    pub fn query(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            ..Self::default()
        }
    }

    pub fn matches(&self, snippet: &Snippet) -> bool {
        let tags_ok = self.tags.iter().all(|wanted| {
            let wanted = wanted.to_lowercase();
            snippet.tags.iter().any(|tag| tag.to_lowercase() == wanted)
        });
        let language_ok = self
            .language
            .as_deref()
            .map_or(true, |lang| snippet.language.to_lowercase() == lang.to_lowercase());
        tags_ok && language_ok
    }
}

/// Ranks `snippets` (given in store order) against `query`.
///
/// A blank query returns everything unchanged. Ties keep store order.
pub fn rank(snippets: &[Snippet], query: &str) -> Vec<Snippet> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return snippets.to_vec();
    }

    let mut scored: Vec<(i64, &Snippet)> = snippets
        .iter()
        .filter_map(|snippet| score(&needle, snippet).map(|s| (s, snippet)))
        .collect();
    scored.sort_by(|(a, _), (b, _)| b.cmp(a));
    scored.into_iter().map(|(_, s)| s.clone()).collect()
}

fn score(needle: &str, snippet: &Snippet) -> Option<i64> {
    if let Some(score) = title_score(needle, &snippet.title.to_lowercase()) {
        return Some(score);
    }

    let mut score = 0;
    if snippet.tags.iter().any(|t| t.to_lowercase().contains(needle)) {
        score += TAG_SCORE;
    }
    if snippet.body.to_lowercase().contains(needle) {
        score += BODY_SCORE;
    }
    (score > 0).then_some(score)
}

/// Fuzzy title score; `None` unless every needle char appears in order.
fn title_score(needle: &str, title: &str) -> Option<i64> {
    let stats = subsequence_stats(needle, title)?;
    let ratio = rapidfuzz::fuzz::ratio(needle.chars(), title.chars());

    let mut score = (ratio * 1000.0).round() as i64;
    score -= stats.span as i64;
    score -= (stats.first as i64) / 4;
    score += (stats.consecutive as i64) * 40;
    if stats.start_boundary {
        score += 150;
    }
    score += if title.contains(needle) { 2000 } else { 500 };

    // Keep every title match above the tag/body range.
    Some(score.max(0) + TAG_SCORE + BODY_SCORE + 1)
}

struct SubsequenceStats {
    first: usize,
    span: usize,
    consecutive: usize,
    start_boundary: bool,
}

fn subsequence_stats(needle: &str, haystack: &str) -> Option<SubsequenceStats> {
    let mut wanted = needle.chars().peekable();
    let mut first = None;
    let mut last = 0;
    let mut prev_match: Option<usize> = None;
    let mut consecutive = 0;
    let mut start_boundary = false;
    let mut prev_char: Option<char> = None;

    for (idx, ch) in haystack.chars().enumerate() {
        let Some(&want) = wanted.peek() else {
            break;
        };
        if ch == want {
            wanted.next();
            if first.is_none() {
                first = Some(idx);
                start_boundary = prev_char.map_or(true, is_boundary_char);
            }
            if prev_match.is_some_and(|prev| idx == prev + 1) {
                consecutive += 1;
            }
            prev_match = Some(idx);
            last = idx;
        }
        prev_char = Some(ch);
    }

    if wanted.peek().is_some() {
        return None;
    }
    let first = first?;
    Some(SubsequenceStats {
        first,
        span: last.saturating_sub(first) + 1,
        consecutive,
        start_boundary,
    })
}

fn is_boundary_char(ch: char) -> bool {
    matches!(ch, '/' | ':' | '-' | '_' | ' ' | '.')
}
