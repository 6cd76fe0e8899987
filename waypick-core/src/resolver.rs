/// Weighted random resolution: the final "give me the answer" draw.
///
/// Every way holds as many tickets as its score (at least one), and one
/// ticket is drawn uniformly. The pool is built explicitly, so the chance of
/// way `k` is exactly `tickets_k / total_tickets`.
use rand::Rng;
use tracing::debug;

use crate::error::{DecisionError, Result};
use crate::types::Item;

/// The ticket pool: item index `k` appears `items[k].tickets()` times.
pub fn tickets(items: &[Item]) -> Vec<usize> {
    let total = items.iter().map(Item::tickets).sum();
    let mut pool = Vec::with_capacity(total);
    for (k, item) in items.iter().enumerate() {
        pool.extend(std::iter::repeat(k).take(item.tickets()));
    }
    pool
}

/// Exact probability of each way winning a draw, in input order.
pub fn win_probabilities(items: &[Item]) -> Vec<f64> {
    let total: usize = items.iter().map(Item::tickets).sum();
    items
        .iter()
        .map(|item| item.tickets() as f64 / total as f64)
        .collect()
}

/// Draw the index of the winning way.
pub fn pick_index(items: &[Item], rng: &mut impl Rng) -> Result<usize> {
    if items.is_empty() {
        return Err(DecisionError::NoItems);
    }
    let pool = tickets(items);
    let winner = pool[rng.random_range(0..pool.len())];
    debug!(winner, pool = pool.len(), "drew ticket");
    Ok(winner)
}

/// Draw one way, weighted by score.
pub fn pick<'a>(items: &'a [Item], rng: &mut impl Rng) -> Result<&'a Item> {
    pick_index(items, rng).map(|k| &items[k])
}
