/// Data types shared by the closure engine, the ranking driver and the resolver.
///
/// Ways are identified by their index in the session's item list. That index is
/// stable for the duration of one ranking pass; `derive_order` produces a new,
/// reordered list once the pass completes.
use crate::constants::{MIN_TICKETS, UNSCORED};

/// One option the user is choosing between.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Item {
    /// The option text exactly as the user typed it.
    pub text: String,
    /// Final rank position (0 = best). `None` until a ranking pass finishes.
    pub order: Option<usize>,
    /// User-assigned weight. Starts at `UNSCORED`.
    pub score: i64,
}

impl Item {
    pub fn new(text: impl Into<String>) -> Self {
        Item {
            text: text.into(),
            order: None,
            score: UNSCORED,
        }
    }

    pub fn with_score(text: impl Into<String>, score: i64) -> Self {
        Item {
            score,
            ..Item::new(text)
        }
    }

    /// True once the user has given a non-negative score.
    pub fn is_scored(&self) -> bool {
        self.score >= 0
    }

    /// Number of tickets this way holds in a weighted draw.
    pub fn tickets(&self) -> usize {
        usize::try_from(self.score).unwrap_or(0).max(MIN_TICKETS)
    }
}

/// Direction of a known relation between two ways.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Relation {
    /// The first way ranks above (is preferred to) the second.
    Above,
    /// The first way ranks below the second.
    Below,
}

impl Relation {
    pub fn flip(self) -> Relation {
        match self {
            Relation::Above => Relation::Below,
            Relation::Below => Relation::Above,
        }
    }

    /// Matrix cell value: `1` for above, `-1` for below.
    pub fn as_cell(self) -> i8 {
        match self {
            Relation::Above => 1,
            Relation::Below => -1,
        }
    }
}

/// A single statement "`a` stands in `relation` to `b`".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Judgment {
    pub a: usize,
    pub relation: Relation,
    pub b: usize,
}

impl Judgment {
    pub fn new(a: usize, relation: Relation, b: usize) -> Self {
        Judgment { a, relation, b }
    }

    /// "`winner` is preferred to `loser`".
    pub fn prefer(winner: usize, loser: usize) -> Self {
        Judgment::new(winner, Relation::Above, loser)
    }

    /// The same fact seen from the other side.
    pub fn mirror(self) -> Self {
        Judgment::new(self.b, self.relation.flip(), self.a)
    }
}

/// Two item indices, in the order they should be shown to the user.
pub type Pair = (usize, usize);

/// Square matrix of known pairwise relations.
///
/// `get(i, j)` is `0` while unknown, `1` when `i` ranks above `j` and `-1`
/// when `i` ranks below `j`. The diagonal stays zero. Cells are only ever
/// written by the closure engine, and only from zero to non-zero.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RelationMatrix {
    size: usize,
    cells: Vec<i8>,
}

impl RelationMatrix {
    /// A fresh all-unknown matrix for `size` ways.
    pub fn new(size: usize) -> Self {
        RelationMatrix {
            size,
            cells: vec![0; size * size],
        }
    }

    pub fn len(&self) -> usize {
        self.size
    }

    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    pub fn get(&self, i: usize, j: usize) -> i8 {
        self.cells[self.index(i, j)]
    }

    pub fn is_resolved(&self, i: usize, j: usize) -> bool {
        self.get(i, j) != 0
    }

    /// Row `i` as a slice: `row(i)[j] == get(i, j)`.
    pub fn row(&self, i: usize) -> &[i8] {
        assert!(i < self.size, "row {} out of range (size = {})", i, self.size);
        &self.cells[i * self.size..(i + 1) * self.size]
    }

    /// Every unordered pair `(i, j)`, `i < j`, whose relation is still unknown.
    pub fn unresolved_pairs(&self) -> Vec<Pair> {
        let mut pairs = Vec::new();
        for i in 0..self.size {
            for j in (i + 1)..self.size {
                if self.get(i, j) == 0 {
                    pairs.push((i, j));
                }
            }
        }
        pairs
    }

    /// True when every off-diagonal cell is known.
    pub fn is_complete(&self) -> bool {
        (0..self.size).all(|i| (0..self.size).all(|j| i == j || self.get(i, j) != 0))
    }

    pub(crate) fn set(&mut self, i: usize, j: usize, value: i8) {
        let idx = self.index(i, j);
        self.cells[idx] = value;
    }

    fn index(&self, i: usize, j: usize) -> usize {
        assert!(
            i < self.size && j < self.size,
            "cell ({}, {}) out of range (size = {})",
            i,
            j,
            self.size
        );
        i * self.size + j
    }
}
