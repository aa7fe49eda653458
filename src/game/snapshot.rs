//! The cloneable world state
//!
//! A StateSnapshot is a value: cards live in an arena keyed by CardId,
//! zones hold handles, and `Clone` copies everything. Search branches
//! clone before mutating, so no two branches ever share mutable state.

use crate::core::{Card, CardId, EntityStore, Player, PlayerId};
use crate::game::{CardZone, CombatState, PlayerZones, TurnStructure, Zone};
use serde::{Deserialize, Serialize};

/// Complete game state at one instant
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StateSnapshot {
    /// All cards in the game
    pub cards: EntityStore<Card>,

    /// All players (Vec for stable ordering, small count)
    pub players: Vec<Player>,

    /// Zones for each player
    pub player_zones: Vec<(PlayerId, PlayerZones)>,

    /// Shared battlefield (all players)
    pub battlefield: CardZone,

    /// The stack (for spells and abilities)
    pub stack: CardZone,

    /// Turn structure
    pub turn: TurnStructure,

    /// Combat state (active during combat phase)
    pub combat: CombatState,
}

impl StateSnapshot {
    /// Create a new game with two players
    pub fn new_two_player(
        player1_name: impl Into<String>,
        player2_name: impl Into<String>,
        starting_life: i32,
    ) -> Self {
        let p1_id = PlayerId::new(0);
        let p2_id = PlayerId::new(1);
        // Shared zones need an owner id that is no player's
        let shared_id = PlayerId::new(u32::MAX);

        let players = vec![
            Player::new(p1_id, player1_name, starting_life),
            Player::new(p2_id, player2_name, starting_life),
        ];
        let player_zones = vec![(p1_id, PlayerZones::new(p1_id)), (p2_id, PlayerZones::new(p2_id))];

        StateSnapshot {
            cards: EntityStore::new(),
            players,
            player_zones,
            battlefield: CardZone::new(Zone::Battlefield, shared_id),
            stack: CardZone::new(Zone::Stack, shared_id),
            turn: TurnStructure::new(p1_id),
            combat: CombatState::new(),
        }
    }

    /// Register a card instance and return its handle
    pub fn add_card(&mut self, mut card: Card) -> CardId {
        let id = self.cards.next_id();
        card.id = id;
        self.cards.insert(id, card);
        id
    }

    pub fn card(&self, id: CardId) -> Option<&Card> {
        self.cards.get(id)
    }

    pub fn card_mut(&mut self, id: CardId) -> Option<&mut Card> {
        self.cards.get_mut(id)
    }

    pub fn player(&self, id: PlayerId) -> Option<&Player> {
        self.players.iter().find(|p| p.id == id)
    }

    pub fn player_mut(&mut self, id: PlayerId) -> Option<&mut Player> {
        self.players.iter_mut().find(|p| p.id == id)
    }

    /// Life total, defaulting to 0 for unknown players
    pub fn life_of(&self, id: PlayerId) -> i32 {
        self.player(id).map(|p| p.life).unwrap_or(0)
    }

    /// The other player in a two-player game
    pub fn opponent_of(&self, id: PlayerId) -> Option<PlayerId> {
        self.players.iter().find(|p| p.id != id).map(|p| p.id)
    }

    pub fn zones(&self, player_id: PlayerId) -> Option<&PlayerZones> {
        self.player_zones
            .iter()
            .find(|(id, _)| *id == player_id)
            .map(|(_, zones)| zones)
    }

    pub fn zones_mut(&mut self, player_id: PlayerId) -> Option<&mut PlayerZones> {
        self.player_zones
            .iter_mut()
            .find(|(id, _)| *id == player_id)
            .map(|(_, zones)| zones)
    }

    /// Cards in a player's hand (empty for unknown players)
    pub fn hand(&self, player_id: PlayerId) -> &[CardId] {
        self.zones(player_id).map(|z| z.hand.cards.as_slice()).unwrap_or(&[])
    }

    /// Battlefield permanents controlled by a player
    pub fn battlefield_of(&self, player_id: PlayerId) -> impl Iterator<Item = &Card> {
        self.battlefield
            .cards
            .iter()
            .filter_map(|&id| self.cards.get(id))
            .filter(move |c| c.controller == player_id)
    }

    pub fn creatures_of(&self, player_id: PlayerId) -> impl Iterator<Item = &Card> {
        self.battlefield_of(player_id).filter(|c| c.is_creature())
    }

    pub fn lands_of(&self, player_id: PlayerId) -> impl Iterator<Item = &Card> {
        self.battlefield_of(player_id).filter(|c| c.is_land())
    }

    pub fn untapped_lands_of(&self, player_id: PlayerId) -> usize {
        self.lands_of(player_id).filter(|c| !c.tapped).count()
    }

    /// Rough castable-mana estimate: untapped lands plus floating mana
    pub fn available_mana(&self, player_id: PlayerId) -> u32 {
        let floating = self.player(player_id).map(|p| p.mana_pool.total() as u32).unwrap_or(0);
        self.untapped_lands_of(player_id) as u32 + floating
    }

    /// Total power of a player's creatures
    pub fn board_power(&self, player_id: PlayerId) -> i32 {
        self.creatures_of(player_id).map(|c| c.current_power() as i32).sum()
    }

    /// Total toughness of a player's creatures
    pub fn board_toughness(&self, player_id: PlayerId) -> i32 {
        self.creatures_of(player_id)
            .map(|c| c.current_toughness() as i32)
            .sum()
    }

    /// Permanents on both sides, the board-size measure the search
    /// budgets key on
    pub fn permanent_count(&self) -> usize {
        self.battlefield.len()
    }

    /// Move a card between a player's hand and the shared battlefield.
    /// Convenience for test fixtures and rules-engine implementations.
    pub fn move_to_battlefield(&mut self, player_id: PlayerId, card_id: CardId) {
        if let Some(zones) = self.zones_mut(player_id) {
            zones.hand.remove(card_id);
        }
        let turn = self.turn.turn_number;
        if let Some(card) = self.cards.get_mut(card_id) {
            card.turn_entered_battlefield = Some(turn);
        }
        self.battlefield.add(card_id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::CardType;

    fn snapshot_with_bears() -> (StateSnapshot, CardId) {
        let mut state = StateSnapshot::new_two_player("Alice", "Bob", 20);
        let p1 = state.players[0].id;
        let mut bears = Card::new(CardId::new(0), "Grizzly Bears", p1);
        bears.types.push(CardType::Creature);
        bears.power = Some(2);
        bears.toughness = Some(2);
        let id = state.add_card(bears);
        state.zones_mut(p1).unwrap().hand.add(id);
        (state, id)
    }

    #[test]
    fn test_two_player_setup() {
        let state = StateSnapshot::new_two_player("Alice", "Bob", 20);
        assert_eq!(state.players.len(), 2);
        assert_eq!(state.life_of(state.players[0].id), 20);
        assert_eq!(state.opponent_of(state.players[0].id), Some(state.players[1].id));
        assert_eq!(state.permanent_count(), 0);
    }

    #[test]
    fn test_move_to_battlefield() {
        let (mut state, id) = snapshot_with_bears();
        let p1 = state.players[0].id;

        assert_eq!(state.hand(p1).len(), 1);
        state.move_to_battlefield(p1, id);

        assert_eq!(state.hand(p1).len(), 0);
        assert_eq!(state.creatures_of(p1).count(), 1);
        assert_eq!(state.board_power(p1), 2);
        assert_eq!(state.card(id).unwrap().turn_entered_battlefield, Some(1));
    }

    #[test]
    fn test_clone_decouples_branches() {
        let (mut state, id) = snapshot_with_bears();
        let p1 = state.players[0].id;
        state.move_to_battlefield(p1, id);

        let mut branch = state.clone();
        branch.card_mut(id).unwrap().add_counter("+1/+1", 3);
        branch.player_mut(p1).unwrap().lose_life(7);

        // The original is untouched by branch mutation
        assert_eq!(state.card(id).unwrap().current_power(), 2);
        assert_eq!(state.life_of(p1), 20);
        assert_eq!(branch.card(id).unwrap().current_power(), 5);
        assert_eq!(branch.life_of(p1), 13);
    }
}
