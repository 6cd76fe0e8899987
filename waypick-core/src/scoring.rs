/// Scoring phase helpers: parse a typed score and choose which way to ask about next.
///
/// Scores arrive one at a time as free text. Anything that is not an integer
/// becomes `UNSCORED`, so the way is simply asked about again later instead of
/// failing the session.
use rand::Rng;

use crate::constants::UNSCORED;
use crate::types::Item;

/// Parse a user-typed score. Surrounding whitespace and a leading `+` are
/// accepted; everything else that is not an integer maps to `UNSCORED`.
pub fn parse_score(text: &str) -> i64 {
    text.trim().parse::<i64>().unwrap_or(UNSCORED)
}

/// Indices of ways still waiting for a score.
pub fn unscored_indices(items: &[Item]) -> Vec<usize> {
    items
        .iter()
        .enumerate()
        .filter(|(_, item)| !item.is_scored())
        .map(|(k, _)| k)
        .collect()
}

/// Pick a random unscored way to ask about next, or `None` when all are done.
pub fn next_unscored(items: &[Item], rng: &mut impl Rng) -> Option<usize> {
    let pending = unscored_indices(items);
    if pending.is_empty() {
        return None;
    }
    Some(pending[rng.random_range(0..pending.len())])
}

pub fn all_scored(items: &[Item]) -> bool {
    items.iter().all(Item::is_scored)
}
