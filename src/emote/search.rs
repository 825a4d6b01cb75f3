//! Scored fuzzy search over emote names

use crate::emote::Emote;

const SCORE_EXACT: u32 = 100;
const SCORE_PREFIX: u32 = 50;
const SCORE_SUBSTRING: u32 = 10;

/// Score a single emote name against a lowercased query.
///
/// Exact match beats prefix match beats any other substring match; names
/// that do not contain the query at all score `None`.
fn score(name: &str, query_lower: &str) -> Option<u32> {
    let name_lower = name.to_lowercase();
    if !name_lower.contains(query_lower) {
        return None;
    }
    if name_lower == query_lower {
        Some(SCORE_EXACT)
    } else if name_lower.starts_with(query_lower) {
        Some(SCORE_PREFIX)
    } else {
        Some(SCORE_SUBSTRING)
    }
}

/// Filter, score and rank `candidates` against `query`.
///
/// Results are sorted by descending score with alphabetical name as the
/// tie-break, then truncated to `limit`. An empty query matches everything
/// as a substring.
pub fn search(candidates: impl IntoIterator<Item = Emote>, query: &str, limit: usize) -> Vec<Emote> {
    let query_lower = query.to_lowercase();

    let mut scored: Vec<(u32, Emote)> = candidates
        .into_iter()
        .filter_map(|emote| score(&emote.name, &query_lower).map(|s| (s, emote)))
        .collect();

    scored.sort_by(|(score_a, a), (score_b, b)| {
        score_b.cmp(score_a).then_with(|| a.name.cmp(&b.name))
    });

    scored.into_iter().take(limit).map(|(_, e)| e).collect()
}
