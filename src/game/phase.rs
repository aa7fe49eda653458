//! Turn phases and steps

use crate::core::PlayerId;
use serde::{Deserialize, Serialize};

/// Major phases of a turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    Beginning,
    PreCombatMain,
    Combat,
    PostCombatMain,
    Ending,
}

/// Specific steps within phases
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Step {
    // Beginning Phase
    Untap,
    Upkeep,
    Draw,

    // Pre-Combat Main Phase
    Main1,

    // Combat Phase
    BeginCombat,
    DeclareAttackers,
    DeclareBlockers,
    CombatDamage,
    EndCombat,

    // Post-Combat Main Phase
    Main2,

    // Ending Phase
    End,
    Cleanup,
}

impl Step {
    /// Get the phase this step belongs to
    pub fn phase(&self) -> Phase {
        match self {
            Step::Untap | Step::Upkeep | Step::Draw => Phase::Beginning,
            Step::Main1 => Phase::PreCombatMain,
            Step::BeginCombat
            | Step::DeclareAttackers
            | Step::DeclareBlockers
            | Step::CombatDamage
            | Step::EndCombat => Phase::Combat,
            Step::Main2 => Phase::PostCombatMain,
            Step::End | Step::Cleanup => Phase::Ending,
        }
    }

    /// Can a player play a sorcery in this step?
    pub fn is_sorcery_speed(&self) -> bool {
        matches!(self, Step::Main1 | Step::Main2)
    }

    /// Can a player play lands in this step?
    pub fn can_play_lands(&self) -> bool {
        matches!(self, Step::Main1 | Step::Main2)
    }

    /// Attacker or blocker declaration step (the expensive decisions)
    pub fn is_combat_declaration(&self) -> bool {
        matches!(self, Step::DeclareAttackers | Step::DeclareBlockers)
    }
}

/// Where in the turn a snapshot sits
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TurnStructure {
    /// Current turn number (starts at 1)
    pub turn_number: u32,

    /// Current step
    pub current_step: Step,

    /// Active player (whose turn it is)
    pub active_player: PlayerId,
}

impl TurnStructure {
    pub fn new(starting_player: PlayerId) -> Self {
        TurnStructure {
            turn_number: 1,
            current_step: Step::Main1,
            active_player: starting_player,
        }
    }

    pub fn current_phase(&self) -> Phase {
        self.current_step.phase()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_step_phases() {
        assert_eq!(Step::Untap.phase(), Phase::Beginning);
        assert_eq!(Step::Main1.phase(), Phase::PreCombatMain);
        assert_eq!(Step::DeclareAttackers.phase(), Phase::Combat);
        assert_eq!(Step::Main2.phase(), Phase::PostCombatMain);
        assert_eq!(Step::Cleanup.phase(), Phase::Ending);
    }

    #[test]
    fn test_sorcery_speed() {
        assert!(Step::Main1.is_sorcery_speed());
        assert!(Step::Main2.is_sorcery_speed());
        assert!(!Step::Upkeep.is_sorcery_speed());
        assert!(!Step::DeclareAttackers.is_sorcery_speed());
    }

    #[test]
    fn test_combat_declaration() {
        assert!(Step::DeclareAttackers.is_combat_declaration());
        assert!(Step::DeclareBlockers.is_combat_declaration());
        assert!(!Step::CombatDamage.is_combat_declaration());
        assert!(!Step::Main1.is_combat_declaration());
    }

    #[test]
    fn test_land_drop_steps() {
        assert!(Step::Main1.can_play_lands());
        assert!(Step::Main2.can_play_lands());
        assert!(!Step::Draw.can_play_lands());
        assert!(!Step::End.can_play_lands());
    }
}
