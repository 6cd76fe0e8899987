//! waypick-core: pure-computation decision engine.
//!
//! Pairwise judgments → transitive closure → ranked list → weighted random pick.
//! No IO, no storage, no terminal. The caller owns each user's session state,
//! talks to the user, and passes a random source into every call that needs one.
//!
//! Ways are identified by their index in the caller's item list.
//!
//! # Quick start
//!
//! ```rust
//! use rand::rngs::SmallRng;
//! use rand::SeedableRng;
//! use waypick_core::{derive_order, next_pair, pick, record_judgment, Item, RelationMatrix};
//!
//! let mut rng = SmallRng::seed_from_u64(7);
//! let items = vec![Item::new("Sea"), Item::new("Mountains"), Item::new("Stay home")];
//! let mut matrix = RelationMatrix::new(items.len());
//!
//! // Ask the user until every pair is settled. Here the user always prefers
//! // the way that was entered first.
//! while let Some((a, b)) = next_pair(&matrix, &mut rng) {
//!     record_judgment(&mut matrix, a, b, a < b);
//! }
//!
//! let mut ranked = derive_order(&matrix, &items);
//! assert_eq!(ranked[0].text, "Sea");
//!
//! ranked[0].score = 9;
//! ranked[1].score = 1;
//! let choice = pick(&ranked, &mut rng).unwrap();
//! println!("Go with: {}", choice.text);
//! ```

pub mod closure;
pub mod constants;
pub mod error;
pub mod ranking;
pub mod resolver;
pub mod scoring;
pub mod session;
pub mod types;

// Re-export primary public API at crate root.
pub use closure::propagate;
pub use error::DecisionError;
pub use ranking::{comparisons_upper_bound, derive_order, next_pair, rank_positions, record_judgment};
pub use resolver::{pick, pick_index, tickets, win_probabilities};
pub use scoring::{all_scored, next_unscored, parse_score};
pub use session::{DecisionSession, Phase, ScoreStep, SortStep};
pub use types::{Item, Judgment, Pair, Relation, RelationMatrix};
