/// Transitive closure over the relation matrix.
///
/// One user judgment usually settles more than one pair: if A beats B and B
/// already beats C, then A beats C without asking. `propagate` records a
/// judgment and every consequence it implies, using an explicit work list so
/// large item counts cannot grow the call stack.
///
/// Cells only move from unknown to known, never back and never flipped, so
/// the fixed point does not depend on processing order. A judgment that
/// contradicts something already known is dropped (first write wins).
use tracing::trace;

use crate::types::{Judgment, RelationMatrix};

/// Record `seed` and all of its transitive consequences in `matrix`.
///
/// Returns the number of cells newly written, mirrors included. Zero means the
/// judgment was already known or contradicted an earlier one.
///
/// Panics if `seed.a == seed.b` or either index is out of range.
pub fn propagate(matrix: &mut RelationMatrix, seed: Judgment) -> usize {
    assert!(seed.a != seed.b, "cannot compare item {} with itself", seed.a);
    assert!(
        seed.a < matrix.len() && seed.b < matrix.len(),
        "judgment ({}, {}) out of range (size = {})",
        seed.a,
        seed.b,
        matrix.len()
    );

    let size = matrix.len();
    let mut pending = vec![seed];
    let mut written = 0;

    while let Some(judgment) = pending.pop() {
        let Judgment { a, relation, b } = judgment;
        if matrix.is_resolved(a, b) {
            continue;
        }

        let cell = relation.as_cell();
        matrix.set(a, b, cell);
        written += 1;

        if !matrix.is_resolved(b, a) {
            pending.push(judgment.mirror());
        }

        // a R b and b R c gives a R c.
        for c in 0..size {
            if c != a && c != b && matrix.get(b, c) == cell {
                pending.push(Judgment::new(a, relation, c));
            }
        }
    }

    trace!(a = seed.a, b = seed.b, written, "propagated judgment");
    written
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Relation;

    fn assert_closed(m: &RelationMatrix) {
        let n = m.len();
        for i in 0..n {
            assert_eq!(m.get(i, i), 0, "diagonal ({i}, {i}) written");
            for j in 0..n {
                if m.get(i, j) != 0 {
                    assert_eq!(m.get(j, i), -m.get(i, j), "({i}, {j}) not antisymmetric");
                }
                for k in 0..n {
                    if i != k && m.get(i, j) == 1 && m.get(j, k) == 1 {
                        assert_eq!(m.get(i, k), 1, "{i} > {j} > {k} but not {i} > {k}");
                    }
                }
            }
        }
    }

    #[test]
    fn test_single_judgment_sets_pair_and_mirror() {
        let mut m = RelationMatrix::new(3);
        let written = propagate(&mut m, Judgment::prefer(0, 1));

        assert_eq!(written, 2);
        assert_eq!(m.get(0, 1), 1);
        assert_eq!(m.get(1, 0), -1);
        assert_eq!(m.get(0, 2), 0);
        assert_eq!(m.get(2, 0), 0);
        assert_eq!(m.get(1, 2), 0);
        assert_eq!(m.get(2, 1), 0);
    }

    #[test]
    fn test_chain_closes_transitively() {
        let mut m = RelationMatrix::new(3);
        propagate(&mut m, Judgment::prefer(0, 1));
        propagate(&mut m, Judgment::prefer(1, 2));

        assert_eq!(m.get(0, 2), 1);
        assert_eq!(m.get(2, 0), -1);
        assert!(m.is_complete());
        assert_closed(&m);
    }

    #[test]
    fn test_below_relation_closes_the_other_way() {
        // 2 < 1, then 1 < 0: 2 must also be below 0.
        let mut m = RelationMatrix::new(3);
        propagate(&mut m, Judgment::new(2, Relation::Below, 1));
        propagate(&mut m, Judgment::new(1, Relation::Below, 0));

        assert_eq!(m.get(2, 0), -1);
        assert_eq!(m.get(0, 2), 1);
        assert_closed(&m);
    }

    #[test]
    fn test_joining_two_chains() {
        // 0 > 1 and 2 > 3 known separately; 1 > 2 links them into 0 > 1 > 2 > 3.
        let mut m = RelationMatrix::new(4);
        propagate(&mut m, Judgment::prefer(0, 1));
        propagate(&mut m, Judgment::prefer(2, 3));
        assert_eq!(m.unresolved_pairs().len(), 4);

        propagate(&mut m, Judgment::prefer(1, 2));
        assert!(m.is_complete());
        assert_eq!(m.get(0, 3), 1);
        assert_eq!(m.get(3, 0), -1);
        assert_closed(&m);
    }

    #[test]
    fn test_contradiction_is_dropped() {
        let mut m = RelationMatrix::new(3);
        propagate(&mut m, Judgment::prefer(0, 1));
        propagate(&mut m, Judgment::prefer(1, 2));
        let before = m.clone();

        // 2 > 0 contradicts the closed 0 > 2.
        let written = propagate(&mut m, Judgment::prefer(2, 0));
        assert_eq!(written, 0);
        assert_eq!(m, before);
    }

    #[test]
    fn test_repeated_judgment_is_noop() {
        let mut m = RelationMatrix::new(2);
        assert_eq!(propagate(&mut m, Judgment::prefer(0, 1)), 2);
        assert_eq!(propagate(&mut m, Judgment::prefer(0, 1)), 0);
        assert_eq!(propagate(&mut m, Judgment::new(1, Relation::Below, 0)), 0);
    }

    #[test]
    fn test_long_chain_does_not_recurse() {
        // Feed a descending chain in reverse so every judgment triggers a wide closure.
        let n = 300;
        let mut m = RelationMatrix::new(n);
        for i in (0..n - 1).rev() {
            propagate(&mut m, Judgment::prefer(i, i + 1));
        }
        assert!(m.is_complete());
        assert_eq!(m.get(0, n - 1), 1);
        assert_eq!(m.get(n - 1, 0), -1);
    }

    #[test]
    #[should_panic(expected = "with itself")]
    fn test_self_comparison_panics() {
        let mut m = RelationMatrix::new(2);
        propagate(&mut m, Judgment::prefer(1, 1));
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn test_out_of_range_panics() {
        let mut m = RelationMatrix::new(2);
        propagate(&mut m, Judgment::prefer(0, 5));
    }
}
