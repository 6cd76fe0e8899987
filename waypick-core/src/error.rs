/// Errors raised by session-level operations.
///
/// The free functions in `closure` and `ranking` treat bad indices as
/// caller bugs and assert instead; only stateful session calls, which are
/// driven by user input, report recoverable errors.
use thiserror::Error;

use crate::session::Phase;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecisionError {
    /// A draw was requested over an empty list of ways.
    #[error("no ways to choose from")]
    NoItems,

    /// Tried to leave the adding stage with too few ways.
    #[error("need at least {need} ways, have {have}")]
    TooFewWays { have: usize, need: usize },

    /// A way with no visible text.
    #[error("a way cannot be blank")]
    BlankWay,

    /// The operation does not apply to the current phase.
    #[error("cannot do that while {actual}; expected {expected}")]
    WrongPhase { expected: &'static str, actual: Phase },

    /// A judgment arrived but no pair is waiting for one.
    #[error("no comparison is pending")]
    NoPendingPair,

    /// A score arrived but no way is waiting for one.
    #[error("no way is waiting for a score")]
    NoScoreTarget,

    #[error("index {index} out of range for {len} ways")]
    IndexOutOfRange { index: usize, len: usize },
}

pub type Result<T> = std::result::Result<T, DecisionError>;
