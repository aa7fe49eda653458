//! Candidate actions as handed over by the external move generator

use crate::core::CardId;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

/// One legal action. Immutable once constructed; the move generator owns
/// the list, the decision core only picks from it. Equality is action
/// identity for MCTS edges and planner bookkeeping.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Action {
    /// Play a card from hand (land drop or spell cast)
    PlayCard { card_id: CardId },

    /// Attack with the given set of creatures
    DeclareAttackers { attackers: SmallVec<[CardId; 8]> },

    /// Block one attacker with the given creatures
    DeclareBlockers {
        attacker: CardId,
        blockers: SmallVec<[CardId; 4]>,
    },

    /// Activate an ability of a permanent
    ActivateAbility { card_id: CardId, ability_index: usize },

    /// End the turn
    EndTurn,

    /// Pass priority without acting
    PassPriority,
}

impl Action {
    /// "Do nothing" actions, used as the last fallback
    pub fn is_turn_ending(&self) -> bool {
        matches!(self, Action::EndTurn | Action::PassPriority)
    }

    /// The card this action is primarily about, if any
    pub fn card(&self) -> Option<CardId> {
        match self {
            Action::PlayCard { card_id } => Some(*card_id),
            Action::ActivateAbility { card_id, .. } => Some(*card_id),
            Action::DeclareAttackers { attackers } => attackers.first().copied(),
            Action::DeclareBlockers { attacker, .. } => Some(*attacker),
            Action::EndTurn | Action::PassPriority => None,
        }
    }

    /// Short tag for log lines
    pub fn kind(&self) -> &'static str {
        match self {
            Action::PlayCard { .. } => "play",
            Action::DeclareAttackers { .. } => "attack",
            Action::DeclareBlockers { .. } => "block",
            Action::ActivateAbility { .. } => "ability",
            Action::EndTurn => "end-turn",
            Action::PassPriority => "pass",
        }
    }
}
