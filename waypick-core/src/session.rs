/// Per-user decision session.
///
/// Holds everything one user's decision needs between messages: the ways
/// entered so far, the current phase, the relation matrix while sorting, the
/// pair awaiting an answer and the way awaiting a score. No IO happens here.
/// A collaborator feeds user input in, renders what comes back, and persists
/// the session however it likes (every field is serde-serializable with the
/// `serde` feature).
///
/// One session belongs to one user. Calls take `&mut self`, so the borrow
/// checker already rules out two judgments landing at once.
use std::fmt;

use rand::Rng;
use tracing::debug;

use crate::constants::MIN_WAYS;
use crate::error::{DecisionError, Result};
use crate::ranking::{derive_order, next_pair, record_judgment};
use crate::resolver::pick_index;
use crate::scoring::{next_unscored, parse_score};
use crate::types::{Item, Pair, RelationMatrix};

/// Where the session is in its conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Phase {
    /// Nothing started yet, or the last decision was cancelled.
    #[default]
    Idle,
    /// Collecting ways one message at a time.
    AddingWays,
    /// Ways are in; waiting for the user to pick sort, score or answer.
    Choosing,
    /// A pairwise comparison is pending.
    Sorting,
    /// A score for one way is pending.
    Scoring,
    /// A way has been drawn. The user may draw again.
    Decided,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Phase::Idle => "idle",
            Phase::AddingWays => "adding ways",
            Phase::Choosing => "choosing what to do next",
            Phase::Sorting => "sorting",
            Phase::Scoring => "scoring",
            Phase::Decided => "decided",
        };
        f.write_str(name)
    }
}

/// What the sorting stage wants next.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SortStep {
    /// Ask the user which of these two ways they prefer.
    Compare(Pair),
    /// Sorting finished; the ways in their new order.
    Sorted(Vec<String>),
}

/// What the scoring stage wants next.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoreStep {
    /// Ask the user for a score for this way.
    Score(usize),
    AllScored,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DecisionSession {
    items: Vec<Item>,
    phase: Phase,
    matrix: Option<RelationMatrix>,
    pending: Option<Pair>,
    score_item: Option<usize>,
    last_pick: Option<String>,
}

impl DecisionSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    /// The pair currently waiting for an answer, in display order.
    pub fn pending_pair(&self) -> Option<Pair> {
        self.pending
    }

    /// The way currently waiting for a score.
    pub fn score_target(&self) -> Option<usize> {
        self.score_item
    }

    pub fn last_pick(&self) -> Option<&str> {
        self.last_pick.as_deref()
    }

    /// True once a sorting pass has stamped every way with its position.
    pub fn is_sorted(&self) -> bool {
        !self.items.is_empty() && self.items.iter().all(|item| item.order.is_some())
    }

    /// Enough ways have been entered to move on.
    pub fn can_finish_adding(&self) -> bool {
        self.items.len() >= MIN_WAYS
    }

    pub fn start_adding(&mut self) -> Result<()> {
        self.expect(&[Phase::Idle], "idle")?;
        self.items.clear();
        self.last_pick = None;
        self.transition(Phase::AddingWays);
        Ok(())
    }

    /// Append a way. Returns how many ways the session now holds.
    pub fn add_way(&mut self, text: &str) -> Result<usize> {
        self.expect(&[Phase::AddingWays], "adding ways")?;
        let text = text.trim();
        if text.is_empty() {
            return Err(DecisionError::BlankWay);
        }
        self.items.push(Item::new(text));
        debug!(count = self.items.len(), "added way");
        Ok(self.items.len())
    }

    pub fn finish_adding(&mut self) -> Result<()> {
        self.expect(&[Phase::AddingWays], "adding ways")?;
        if !self.can_finish_adding() {
            return Err(DecisionError::TooFewWays {
                have: self.items.len(),
                need: MIN_WAYS,
            });
        }
        self.transition(Phase::Choosing);
        Ok(())
    }

    /// Begin a fresh sorting pass with an all-unknown matrix.
    pub fn start_sorting(&mut self, rng: &mut impl Rng) -> Result<SortStep> {
        self.expect_menu()?;
        self.matrix = Some(RelationMatrix::new(self.items.len()));
        self.pending = None;
        self.transition(Phase::Sorting);
        Ok(self.advance_sort(rng))
    }

    /// Answer the pending comparison. `prefers_first` refers to the first way
    /// of `pending_pair()`.
    pub fn judge(&mut self, prefers_first: bool, rng: &mut impl Rng) -> Result<SortStep> {
        self.expect(&[Phase::Sorting], "sorting")?;
        let (a, b) = self.pending.ok_or(DecisionError::NoPendingPair)?;
        let matrix = self.matrix.as_mut().ok_or(DecisionError::NoPendingPair)?;
        record_judgment(matrix, a, b, prefers_first);
        Ok(self.advance_sort(rng))
    }

    pub fn start_scoring(&mut self, rng: &mut impl Rng) -> Result<ScoreStep> {
        self.expect_menu()?;
        self.transition(Phase::Scoring);
        Ok(self.advance_score(rng))
    }

    /// Record the user's reply for the way returned by the last `ScoreStep::Score`.
    /// Unparseable text leaves the way unscored, so it comes up again.
    pub fn submit_score(&mut self, text: &str, rng: &mut impl Rng) -> Result<ScoreStep> {
        self.expect(&[Phase::Scoring], "scoring")?;
        let k = self.score_item.ok_or(DecisionError::NoScoreTarget)?;
        let len = self.items.len();
        let item = self
            .items
            .get_mut(k)
            .ok_or(DecisionError::IndexOutOfRange { index: k, len })?;
        item.score = parse_score(text);
        debug!(way = k, score = item.score, "scored way");
        Ok(self.advance_score(rng))
    }

    /// Draw the answer. May be repeated to draw again, and may cut a scoring
    /// pass short: ways not rated yet keep a single ticket.
    pub fn decide(&mut self, rng: &mut impl Rng) -> Result<&str> {
        self.expect(
            &[Phase::Choosing, Phase::Scoring, Phase::Decided],
            "choosing what to do next",
        )?;
        let k = pick_index(&self.items, rng)?;
        self.score_item = None;
        self.last_pick = Some(self.items[k].text.clone());
        self.transition(Phase::Decided);
        Ok(self.items[k].text.as_str())
    }

    /// Abandon the current decision and return to idle. The ways and the
    /// last pick stay for the history; `start_adding` clears them.
    pub fn cancel(&mut self) {
        self.matrix = None;
        self.pending = None;
        self.score_item = None;
        self.transition(Phase::Idle);
        debug!(ways = self.items.len(), "session cancelled");
    }

    fn advance_sort(&mut self, rng: &mut impl Rng) -> SortStep {
        let Some(matrix) = self.matrix.as_ref() else {
            return SortStep::Sorted(self.texts());
        };
        match next_pair(matrix, rng) {
            Some(pair) => {
                self.pending = Some(pair);
                SortStep::Compare(pair)
            }
            None => {
                self.items = derive_order(matrix, &self.items);
                self.matrix = None;
                self.pending = None;
                self.transition(Phase::Choosing);
                SortStep::Sorted(self.texts())
            }
        }
    }

    fn advance_score(&mut self, rng: &mut impl Rng) -> ScoreStep {
        match next_unscored(&self.items, rng) {
            Some(k) => {
                self.score_item = Some(k);
                ScoreStep::Score(k)
            }
            None => {
                self.score_item = None;
                self.transition(Phase::Choosing);
                ScoreStep::AllScored
            }
        }
    }

    fn texts(&self) -> Vec<String> {
        self.items.iter().map(|item| item.text.clone()).collect()
    }

    fn expect(&self, allowed: &[Phase], expected: &'static str) -> Result<()> {
        if allowed.contains(&self.phase) {
            Ok(())
        } else {
            Err(DecisionError::WrongPhase {
                expected,
                actual: self.phase,
            })
        }
    }

    fn expect_menu(&self) -> Result<()> {
        self.expect(&[Phase::Choosing, Phase::Decided], "choosing what to do next")
    }

    fn transition(&mut self, next: Phase) {
        if self.phase != next {
            debug!(from = %self.phase, to = %next, "phase change");
            self.phase = next;
        }
    }
}
