//! MTG Tactician - action-selection core for a card game agent
//!
//! Given a game state snapshot and the legal actions supplied by an
//! external rules engine, this library picks the single best action using
//! heuristic evaluation, a pruned lookahead planner, and Monte-Carlo tree
//! search for critical decisions.

pub mod ai;
pub mod core;
pub mod error;
pub mod game;

pub use ai::{ActionEvaluator, DecisionEngine, MctsEngine, PositionEvaluator, SequencePlanner, StrategyProfile};
pub use error::{DecisionError, Result};
pub use game::{Action, StateSnapshot};
