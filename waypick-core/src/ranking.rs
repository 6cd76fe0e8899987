/// Ranking driver: pick the next pair to ask about, record the answer, and
/// turn a fully resolved matrix into an ordered list.
///
/// Pure computation. The caller owns the matrix and the item list and passes
/// a random source in, so sessions stay independent and tests stay seeded.
use rand::Rng;
use tracing::debug;

use crate::closure::propagate;
use crate::types::{Item, Judgment, Pair, RelationMatrix};

/// Choose one unresolved pair uniformly at random.
///
/// Each unordered pair is counted once, then a coin flip decides which side
/// is shown first. Returns `None` once every relation is known, which is
/// immediate for zero or one item.
pub fn next_pair(matrix: &RelationMatrix, rng: &mut impl Rng) -> Option<Pair> {
    let unresolved = matrix.unresolved_pairs();
    if unresolved.is_empty() {
        return None;
    }

    let (i, j) = unresolved[rng.random_range(0..unresolved.len())];
    if rng.random::<f64>() < 0.5 {
        Some((i, j))
    } else {
        Some((j, i))
    }
}

/// Record the user's answer for the pair `(i, j)`.
///
/// Returns how many matrix cells the answer settled, including those
/// inferred by transitivity.
pub fn record_judgment(matrix: &mut RelationMatrix, i: usize, j: usize, prefers_i: bool) -> usize {
    let seed = if prefers_i {
        Judgment::prefer(i, j)
    } else {
        Judgment::prefer(j, i)
    };
    let written = propagate(matrix, seed);
    debug!(
        winner = seed.a,
        loser = seed.b,
        written,
        remaining = matrix.unresolved_pairs().len(),
        "recorded judgment"
    );
    written
}

/// Rank position for every row: the number of items this one is known to
/// rank below.
///
/// The best item is below nothing and gets 0; the worst is below all the
/// others and gets `n - 1`. On a complete, consistent matrix these values are
/// exactly the positions `0..n`, so no comparison sort is needed.
pub fn rank_positions(matrix: &RelationMatrix) -> Vec<usize> {
    (0..matrix.len())
        .map(|k| matrix.row(k).iter().filter(|&&cell| cell < 0).count())
        .collect()
}

/// Build the ordered item list from a resolved matrix and stamp each item's
/// `order`.
///
/// Items are placed by `rank_positions`. If the matrix is incomplete, or
/// contradictory answers left two items with the same count, the tie goes to
/// the item entered first so the result is always a permutation of `items`.
///
/// Panics if `items` and `matrix` disagree in size.
pub fn derive_order(matrix: &RelationMatrix, items: &[Item]) -> Vec<Item> {
    assert_eq!(
        matrix.len(),
        items.len(),
        "matrix size {} does not match {} items",
        matrix.len(),
        items.len()
    );

    let ranks = rank_positions(matrix);
    let mut by_rank: Vec<usize> = (0..items.len()).collect();
    by_rank.sort_by_key(|&k| (ranks[k], k));

    if by_rank.iter().enumerate().any(|(pos, &k)| ranks[k] != pos) {
        debug!(?ranks, "rank counts collide, breaking ties by entry order");
    }

    by_rank
        .into_iter()
        .enumerate()
        .map(|(position, k)| Item {
            order: Some(position),
            ..items[k].clone()
        })
        .collect()
}

/// Upper bound on the number of answers needed to rank `n` items.
pub fn comparisons_upper_bound(n: usize) -> usize {
    n * n.saturating_sub(1) / 2
}
