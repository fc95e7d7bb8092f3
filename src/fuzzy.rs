//! Fuzzy name matching
//!
//! Scores are normalized Levenshtein similarity on lightly normalized
//! strings, scaled to 0..=100.

use std::cmp::Ordering;

/// Default similarity cutoff for search
pub const DEFAULT_CUTOFF: f64 = 50.0;

/// Cutoff used by the legacy unranked search
pub const LEGACY_CUTOFF: f64 = 70.0;

/// A candidate name that scored at or above the cutoff
#[derive(Debug, Clone, PartialEq)]
pub struct Match<'a> {
    pub name: &'a str,
    pub score: f64,
    /// Position of the name in the candidate list
    pub index: usize,
}

/// Lowercase, replace anything non-alphanumeric with a space, trim
pub fn normalize(s: &str) -> String {
    let mapped: String = s
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { ' ' })
        .flat_map(char::to_lowercase)
        .collect();
    mapped.trim().to_string()
}

/// Similarity of two strings in 0..=100
///
/// Either side normalizing to an empty string scores 0.
pub fn ratio(a: &str, b: &str) -> f64 {
    score_normalized(&normalize(a), &normalize(b))
}

fn score_normalized(a: &str, b: &str) -> f64 {
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }
    strsim::normalized_levenshtein(a, b) * 100.0
}

/// Matches in candidate order
pub fn extract_iter<'a, I, S>(query: &str, choices: I, cutoff: f64) -> Vec<Match<'a>>
where
    I: IntoIterator<Item = &'a S>,
    S: AsRef<str> + 'a + ?Sized,
{
    let query = normalize(query);
    choices
        .into_iter()
        .enumerate()
        .filter_map(|(index, choice)| {
            let name = <S as AsRef<str>>::as_ref(choice);
            let score = score_normalized(&query, &normalize(name));
            (score >= cutoff).then_some(Match { name, score, index })
        })
        .collect()
}

/// Matches ranked by descending score, at most `limit` of them
///
/// Ties keep candidate order, so feeding names shortest-first makes the
/// shorter name win a tie.
pub fn extract<'a, I, S>(query: &str, choices: I, cutoff: f64, limit: Option<usize>) -> Vec<Match<'a>>
where
    I: IntoIterator<Item = &'a S>,
    S: AsRef<str> + 'a + ?Sized,
{
    let mut matches = extract_iter(query, choices, cutoff);
    matches.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));
    if let Some(limit) = limit {
        matches.truncate(limit);
    }
    matches
}
