//! Threat summaries and closed-form combat math
//!
//! Rebuilt from a snapshot every analysis cycle; never mutated in place.

use crate::core::{Card, CardId, PlayerId};
use crate::game::StateSnapshot;

/// Read-only combat picture for one side
#[derive(Debug, Clone, Default)]
pub struct ThreatAssessment {
    /// Power of enemy creatures that could attack us next combat
    pub incoming_power: i32,

    /// The single most dangerous enemy permanent
    pub biggest_threat: Option<CardId>,

    /// Power we could attack with right now
    pub ready_power: i32,

    /// Portion of `ready_power` no enemy creature can block
    pub unblocked_power: i32,

    /// Attacking with everything would be lethal
    pub lethal_on_board: bool,

    /// The enemy's ready attackers could kill us
    pub under_lethal_threat: bool,
}

impl ThreatAssessment {
    pub fn analyze(state: &StateSnapshot, perspective: PlayerId) -> Self {
        let Some(opponent) = state.opponent_of(perspective) else {
            return ThreatAssessment::default();
        };
        let turn = state.turn.turn_number;

        let my_life = state.life_of(perspective);
        let opp_life = state.life_of(opponent);

        let enemy_creatures: Vec<&Card> = state.creatures_of(opponent).collect();
        let my_attackers: Vec<&Card> = state
            .creatures_of(perspective)
            .filter(|c| c.can_attack(turn) && c.current_power() > 0)
            .collect();

        // Enemy power able to swing back. Tapped or freshly played
        // creatures can't, but sickness is opponent-turn-relative, so only
        // tapped is a safe exclusion here.
        let incoming_power: i32 = enemy_creatures
            .iter()
            .filter(|c| !c.tapped && !c.has_defender() && c.current_power() > 0)
            .map(|c| c.current_power() as i32)
            .sum();

        let biggest_threat = enemy_creatures
            .iter()
            .max_by_key(|c| (c.current_power() as i32) * 2 + c.current_toughness() as i32)
            .map(|c| c.id);

        let ready_power: i32 = my_attackers.iter().map(|c| c.current_power() as i32).sum();

        let potential_blockers: Vec<&&Card> = enemy_creatures.iter().filter(|c| !c.tapped).collect();
        let unblocked_power: i32 = my_attackers
            .iter()
            .filter(|attacker| !potential_blockers.iter().any(|blocker| can_block(attacker, blocker)))
            .map(|c| c.current_power() as i32)
            .sum();

        ThreatAssessment {
            incoming_power,
            biggest_threat,
            ready_power,
            unblocked_power,
            lethal_on_board: opp_life > 0 && unblocked_power >= opp_life,
            under_lethal_threat: my_life > 0 && incoming_power >= my_life,
        }
    }
}

/// Check if a blocker can legally block an attacker
pub fn can_block(attacker: &Card, blocker: &Card) -> bool {
    if !blocker.is_creature() || blocker.tapped {
        return false;
    }

    // Flying can only be blocked by flying or reach
    if attacker.has_flying() && !(blocker.has_flying() || blocker.has_reach()) {
        return false;
    }

    true
}

/// Check if attacker can destroy blocker in combat
pub fn can_destroy_blocker(attacker: &Card, blocker: &Card) -> bool {
    let attacker_power = attacker.current_power() as i32;
    let blocker_toughness = blocker.current_toughness() as i32;

    // Deathtouch kills any creature with toughness > 0
    if attacker.has_deathtouch() && attacker_power > 0 && blocker_toughness > 0 {
        return true;
    }

    if blocker.has_indestructible() {
        return false;
    }

    attacker_power >= blocker_toughness
}

/// Check if blocker can destroy attacker in combat
pub fn can_destroy_attacker(attacker: &Card, blocker: &Card) -> bool {
    let blocker_power = blocker.current_power() as i32;
    let attacker_toughness = attacker.current_toughness() as i32;

    if blocker.has_deathtouch() && blocker_power > 0 && attacker_toughness > 0 {
        return true;
    }

    if attacker.has_indestructible() {
        return false;
    }

    // First strike kills before taking damage back
    let attacker_first = attacker.has_first_strike() || attacker.has_double_strike();
    let blocker_first = blocker.has_first_strike() || blocker.has_double_strike();
    if attacker_first && !blocker_first && attacker.current_power() as i32 >= blocker.current_toughness() as i32 {
        return false;
    }

    blocker_power >= attacker_toughness
}
