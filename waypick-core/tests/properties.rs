//! Closure and ranking properties checked over many random transitive users.

use rand::rngs::SmallRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use waypick_core::{
    comparisons_upper_bound, derive_order, next_pair, propagate, record_judgment, Item, Judgment,
    RelationMatrix,
};

/// A hidden preference order: `rank[k]` is item k's true position.
fn random_ranking(n: usize, rng: &mut SmallRng) -> Vec<usize> {
    let mut rank: Vec<usize> = (0..n).collect();
    rank.shuffle(rng);
    rank
}

fn assert_invariants(m: &RelationMatrix) {
    let n = m.len();
    for i in 0..n {
        assert_eq!(m.get(i, i), 0);
        for j in 0..n {
            let v = m.get(i, j);
            assert!((-1..=1).contains(&v));
            if v != 0 {
                assert_eq!(m.get(j, i), -v, "antisymmetry broken at ({i}, {j})");
            }
            for k in 0..n {
                if i != k && v == 1 && m.get(j, k) == 1 {
                    assert_eq!(m.get(i, k), 1, "transitivity broken: {i} > {j} > {k}");
                }
            }
        }
    }
}

#[test]
fn transitive_users_are_ranked_exactly() {
    let mut rng = SmallRng::seed_from_u64(0xC0FFEE);

    for trial in 0..200 {
        let n = rng.random_range(0..9);
        let rank = random_ranking(n, &mut rng);
        let items: Vec<Item> = (0..n).map(|k| Item::new(format!("way {k}"))).collect();
        let mut m = RelationMatrix::new(n);

        let mut asked = 0;
        while let Some((a, b)) = next_pair(&m, &mut rng) {
            assert_ne!(a, b);
            assert_eq!(m.get(a, b), 0);
            let written = record_judgment(&mut m, a, b, rank[a] < rank[b]);
            assert!(written >= 2, "a fresh pair must settle at least itself");
            asked += 1;
            assert_invariants(&m);
        }
        assert!(asked <= comparisons_upper_bound(n), "trial {trial}: {asked} questions for {n} ways");
        assert!(m.is_complete());

        let ordered = derive_order(&m, &items);
        assert_eq!(ordered.len(), n);
        for (pos, item) in ordered.iter().enumerate() {
            assert_eq!(item.order, Some(pos));
            let k: usize = item.text["way ".len()..].parse().unwrap();
            assert_eq!(rank[k], pos, "trial {trial}: way {k} misplaced");
        }
    }
}

#[test]
fn propagate_never_rewrites_a_known_cell() {
    let mut rng = SmallRng::seed_from_u64(99);

    for _ in 0..100 {
        let n = rng.random_range(2..8);
        let mut m = RelationMatrix::new(n);

        // Arbitrary, possibly contradictory answers.
        for _ in 0..(n * n) {
            let a = rng.random_range(0..n);
            let mut b = rng.random_range(0..n);
            if a == b {
                b = (b + 1) % n;
            }
            let before = m.clone();
            propagate(&mut m, Judgment::prefer(a, b));

            for i in 0..n {
                for j in 0..n {
                    if before.get(i, j) != 0 {
                        assert_eq!(m.get(i, j), before.get(i, j));
                    }
                }
            }
            assert_invariants(&m);
        }

        let items: Vec<Item> = (0..n).map(|k| Item::new(k.to_string())).collect();
        let ordered = derive_order(&m, &items);
        let mut texts: Vec<String> = ordered.into_iter().map(|i| i.text).collect();
        texts.sort();
        let mut expected: Vec<String> = (0..n).map(|k| k.to_string()).collect();
        expected.sort();
        assert_eq!(texts, expected, "output must be a permutation of the input");
    }
}

#[test]
fn already_sorted_answers_need_few_questions() {
    // When closure kicks in, far fewer than n(n-1)/2 questions are asked on average.
    let mut rng = SmallRng::seed_from_u64(5);
    let n = 8;
    let trials = 100;
    let mut total = 0;
    for _ in 0..trials {
        let mut m = RelationMatrix::new(n);
        while let Some((a, b)) = next_pair(&m, &mut rng) {
            record_judgment(&mut m, a, b, a < b);
            total += 1;
        }
    }
    assert!(total < trials * comparisons_upper_bound(n));
}

#[cfg(feature = "serde")]
#[test]
fn session_survives_json_round_trip_mid_sort() {
    use waypick_core::{DecisionSession, SortStep};

    let mut rng = SmallRng::seed_from_u64(12);
    let mut s = DecisionSession::new();
    s.start_adding().unwrap();
    for w in ["tea", "coffee", "water"] {
        s.add_way(w).unwrap();
    }
    s.finish_adding().unwrap();
    let SortStep::Compare(_) = s.start_sorting(&mut rng).unwrap() else {
        panic!("three ways need at least one question");
    };
    s.judge(true, &mut rng).unwrap();

    let json = serde_json::to_string(&s).unwrap();
    let restored: DecisionSession = serde_json::from_str(&json).unwrap();
    assert_eq!(restored, s);
    assert_eq!(restored.pending_pair(), s.pending_pair());
}
