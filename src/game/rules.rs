//! Interfaces to the external rules engine
//!
//! The decision core treats move generation, action application, combat
//! resolution and ability resolution as opaque services. Implementations
//! must be deterministic given state + action, and `apply_action` must
//! only ever touch the snapshot it is handed (each search branch owns its
//! own clone).

use crate::core::{CardId, PlayerId};
use crate::game::{Action, StateSnapshot};

/// Result of a finished game
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameOutcome {
    Winner(PlayerId),
    Draw,
}

/// Legal-move generation and action application
pub trait RulesEngine {
    /// Enumerate the legal actions for the snapshot's active player
    fn legal_actions(&self, state: &StateSnapshot) -> Vec<Action>;

    /// Apply an action in place. The action must come from
    /// `legal_actions` on the same state.
    fn apply_action(&self, state: &mut StateSnapshot, action: &Action);

    /// Whether the game is over
    fn is_terminal(&self, state: &StateSnapshot) -> Option<GameOutcome>;
}

/// Outcome of a simulated combat exchange
#[derive(Debug, Clone, Copy, Default)]
pub struct CombatOutcome {
    pub damage_to_opponent: i32,
    pub attackers_lost: u32,
    pub blockers_lost: u32,
    pub life_gained: i32,
}

/// Optional combat-damage resolver. When absent, the ActionEvaluator and
/// MCTS fall back to closed-form estimates.
pub trait CombatResolver {
    /// Simulate the exchange for the given attackers (and blocker
    /// assignments, if already declared). `None` means the resolver
    /// cannot judge this combat and the caller should estimate.
    fn simulate_combat(
        &self,
        state: &StateSnapshot,
        attackers: &[CardId],
        blocks: Option<&[(CardId, CardId)]>,
    ) -> Option<CombatOutcome>;
}

/// Resolved ability text, as produced by the card-text subsystem
#[derive(Debug, Clone)]
pub struct AbilityText {
    pub cost_text: String,
    pub effect_text: String,
}

/// Optional ability resolver for activation scoring. When absent, the
/// evaluator reads the ability text embedded on the card, if any.
pub trait AbilityOracle {
    fn resolve_ability(&self, state: &StateSnapshot, card_id: CardId, ability_index: usize) -> Option<AbilityText>;
}
