//! Combat assignments active in a snapshot
//!
//! Uses BTreeMap for deterministic iteration order.

use crate::core::{CardId, PlayerId};
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::collections::BTreeMap;

/// Attackers and blockers declared this combat
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct CombatState {
    /// Maps attacker ID to the player being attacked
    pub attackers: BTreeMap<CardId, PlayerId>,

    /// Reverse mapping: attacker -> blockers assigned to it
    pub attacker_blockers: BTreeMap<CardId, SmallVec<[CardId; 4]>>,

    /// Whether combat has started this turn
    pub combat_active: bool,
}

impl CombatState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn declare_attacker(&mut self, attacker: CardId, defending_player: PlayerId) {
        self.attackers.insert(attacker, defending_player);
        self.combat_active = true;
    }

    pub fn declare_blocker(&mut self, blocker: CardId, attacker: CardId) {
        self.attacker_blockers.entry(attacker).or_default().push(blocker);
    }

    pub fn is_attacking(&self, card_id: CardId) -> bool {
        self.attackers.contains_key(&card_id)
    }

    pub fn is_blocked(&self, attacker: CardId) -> bool {
        self.attacker_blockers
            .get(&attacker)
            .is_some_and(|blockers| !blockers.is_empty())
    }

    pub fn get_blockers(&self, attacker: CardId) -> SmallVec<[CardId; 4]> {
        self.attacker_blockers.get(&attacker).cloned().unwrap_or_default()
    }

    pub fn get_attackers(&self) -> Vec<CardId> {
        self.attackers.keys().copied().collect()
    }

    /// Clear all combat state (called at end of combat)
    pub fn clear(&mut self) {
        self.attackers.clear();
        self.attacker_blockers.clear();
        self.combat_active = false;
    }
}
