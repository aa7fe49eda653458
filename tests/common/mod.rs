//! Shared fixtures: a miniature rules engine standing in for the real
//! one, plus card builders for scenario setups.
//!
//! MiniRules implements just enough of a turn loop for the decision core
//! to search against: land drops, casting from hand by tapping lands,
//! one all-in attack per turn with no blocking, burn spells that hit the
//! opponent's face, and turn passing.

#![allow(dead_code)]

use mtg_tactician::core::{Card, CardId, CardType, ManaCost, PlayerId};
use mtg_tactician::game::{Action, GameOutcome, RulesEngine, StateSnapshot};
use smallvec::SmallVec;

pub struct MiniRules;

fn burn_damage(text: &str) -> Option<i32> {
    let lower = text.to_lowercase();
    let idx = lower.find("deals ")?;
    let rest = &lower[idx + "deals ".len()..];
    let digits: String = rest.chars().take_while(|c| c.is_ascii_digit()).collect();
    if digits.is_empty() || !rest[digits.len()..].trim_start().starts_with("damage") {
        return None;
    }
    digits.parse().ok()
}

impl RulesEngine for MiniRules {
    fn legal_actions(&self, state: &StateSnapshot) -> Vec<Action> {
        if self.is_terminal(state).is_some() {
            return Vec::new();
        }

        let player = state.turn.active_player;
        let available = state.available_mana(player);
        let mut actions = Vec::new();

        for &card_id in state.hand(player) {
            let Some(card) = state.card(card_id) else { continue };
            if card.is_land() {
                if state.player(player).map(|p| p.can_play_land()).unwrap_or(false) {
                    actions.push(Action::PlayCard { card_id });
                }
            } else if card.mana_cost.cmc() as u32 <= available {
                actions.push(Action::PlayCard { card_id });
            }
        }

        if !state.combat.combat_active {
            let turn = state.turn.turn_number;
            let ready: SmallVec<[CardId; 8]> = state
                .creatures_of(player)
                .filter(|c| c.can_attack(turn) && c.current_power() > 0)
                .map(|c| c.id)
                .collect();
            if !ready.is_empty() {
                actions.push(Action::DeclareAttackers { attackers: ready });
            }
        }

        actions.push(Action::EndTurn);
        actions
    }

    fn apply_action(&self, state: &mut StateSnapshot, action: &Action) {
        let player = state.turn.active_player;
        match action {
            Action::PlayCard { card_id } => {
                let Some(card) = state.card(*card_id) else { return };
                if card.is_land() {
                    state.move_to_battlefield(player, *card_id);
                    if let Some(p) = state.player_mut(player) {
                        p.play_land();
                    }
                    return;
                }

                let cost = card.mana_cost.cmc() as usize;
                let is_creature = card.is_creature();
                let damage = burn_damage(&card.text);

                let to_tap: Vec<CardId> = state
                    .lands_of(player)
                    .filter(|c| !c.tapped)
                    .map(|c| c.id)
                    .take(cost)
                    .collect();
                for id in to_tap {
                    if let Some(land) = state.card_mut(id) {
                        land.tap();
                    }
                }

                if is_creature {
                    state.move_to_battlefield(player, *card_id);
                } else {
                    if let Some(zones) = state.zones_mut(player) {
                        zones.hand.remove(*card_id);
                    }
                    if let Some(amount) = damage {
                        if let Some(opponent) = state.opponent_of(player) {
                            if let Some(p) = state.player_mut(opponent) {
                                p.lose_life(amount);
                            }
                        }
                    }
                    if let Some(zones) = state.zones_mut(player) {
                        zones.graveyard.add(*card_id);
                    }
                }
            }
            Action::DeclareAttackers { attackers } => {
                let Some(opponent) = state.opponent_of(player) else { return };
                let total: i32 = attackers
                    .iter()
                    .filter_map(|&id| state.card(id))
                    .map(|c| c.current_power().max(0) as i32)
                    .sum();
                for &id in attackers.iter() {
                    state.combat.declare_attacker(id, opponent);
                    if let Some(card) = state.card_mut(id) {
                        if !card.has_vigilance() {
                            card.tap();
                        }
                    }
                }
                if let Some(p) = state.player_mut(opponent) {
                    p.lose_life(total);
                }
            }
            Action::EndTurn => {
                let next = state.opponent_of(player).unwrap_or(player);
                let battlefield: Vec<CardId> = state.battlefield.cards.clone();
                for id in battlefield {
                    if let Some(card) = state.card_mut(id) {
                        if card.controller == next {
                            card.untap();
                        }
                    }
                }
                if let Some(p) = state.player_mut(next) {
                    p.reset_lands_played();
                }
                state.combat.clear();
                state.turn.active_player = next;
                state.turn.turn_number += 1;
            }
            Action::DeclareBlockers { .. } | Action::ActivateAbility { .. } | Action::PassPriority => {}
        }
    }

    fn is_terminal(&self, state: &StateSnapshot) -> Option<GameOutcome> {
        for player in &state.players {
            if player.life <= 0 {
                let winner = state.opponent_of(player.id)?;
                return Some(GameOutcome::Winner(winner));
            }
        }
        if state.turn.turn_number > 40 {
            return Some(GameOutcome::Draw);
        }
        None
    }
}

// ---- Card builders --------------------------------------------------

pub fn creature(name: &str, cost: &str, power: i8, toughness: i8, owner: PlayerId) -> Card {
    let mut card = Card::new(CardId::new(0), name, owner);
    card.types.push(CardType::Creature);
    card.mana_cost = ManaCost::from_string(cost);
    card.power = Some(power);
    card.toughness = Some(toughness);
    card
}

pub fn basic_land(name: &str, owner: PlayerId) -> Card {
    let mut card = Card::new(CardId::new(0), name, owner);
    card.types.push(CardType::Land);
    card
}

pub fn burn_spell(name: &str, cost: &str, damage: i32, owner: PlayerId) -> Card {
    let mut card = Card::new(CardId::new(0), name, owner);
    card.types.push(CardType::Instant);
    card.mana_cost = ManaCost::from_string(cost);
    card.text = format!("{name} deals {damage} damage to any target.");
    card
}

/// Put a card into a player's hand, returning its id
pub fn into_hand(state: &mut StateSnapshot, player: PlayerId, card: Card) -> CardId {
    let id = state.add_card(card);
    state.zones_mut(player).unwrap().hand.add(id);
    id
}

/// Put a card straight onto the battlefield, entered on a past turn so
/// creatures are not summoning sick
pub fn onto_battlefield(state: &mut StateSnapshot, _player: PlayerId, card: Card) -> CardId {
    let id = state.add_card(card);
    state.battlefield.add(id);
    let entered = state.turn.turn_number.saturating_sub(1).max(1);
    if let Some(c) = state.card_mut(id) {
        c.turn_entered_battlefield = Some(entered);
    }
    id
}
