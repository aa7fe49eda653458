//! Card zones as the decision core sees them
//!
//! Public zones hold ordered card handles. The library is hidden
//! information: the core only ever learns how many cards remain in it,
//! so it is tracked as a bare count rather than a card list.

use crate::core::{CardId, PlayerId};
use serde::{Deserialize, Serialize};

/// Zones the core can hold card handles for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Zone {
    Hand,
    Battlefield,
    Graveyard,
    Exile,
    Stack,
}

/// A zone containing cards (order preserved for deterministic iteration)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CardZone {
    /// Zone type
    pub zone_type: Zone,

    /// Owner of this zone (each player has their own zones)
    pub owner: PlayerId,

    /// Cards in this zone
    pub cards: Vec<CardId>,
}

impl CardZone {
    pub fn new(zone_type: Zone, owner: PlayerId) -> Self {
        CardZone {
            zone_type,
            owner,
            cards: Vec::new(),
        }
    }

    pub fn add(&mut self, card_id: CardId) {
        self.cards.push(card_id);
    }

    /// Remove a card, keeping the relative order of the rest so
    /// evaluators always iterate a zone in a consistent order
    pub fn remove(&mut self, card_id: CardId) -> bool {
        let before = self.cards.len();
        self.cards.retain(|&id| id != card_id);
        self.cards.len() != before
    }

    pub fn contains(&self, card_id: CardId) -> bool {
        self.cards.contains(&card_id)
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn clear(&mut self) {
        self.cards.clear();
    }
}

/// Per-player zones. The library appears only as a count; its contents
/// belong to the external engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerZones {
    pub hand: CardZone,
    pub graveyard: CardZone,
    pub exile: CardZone,

    /// Cards left in the library
    pub library_count: u32,
}

impl PlayerZones {
    pub fn new(player_id: PlayerId) -> Self {
        PlayerZones {
            hand: CardZone::new(Zone::Hand, player_id),
            graveyard: CardZone::new(Zone::Graveyard, player_id),
            exile: CardZone::new(Zone::Exile, player_id),
            library_count: 0,
        }
    }

    pub fn get_zone(&self, zone: Zone) -> Option<&CardZone> {
        match zone {
            Zone::Hand => Some(&self.hand),
            Zone::Graveyard => Some(&self.graveyard),
            Zone::Exile => Some(&self.exile),
            Zone::Battlefield | Zone::Stack => None,
        }
    }

    pub fn get_zone_mut(&mut self, zone: Zone) -> Option<&mut CardZone> {
        match zone {
            Zone::Hand => Some(&mut self.hand),
            Zone::Graveyard => Some(&mut self.graveyard),
            Zone::Exile => Some(&mut self.exile),
            Zone::Battlefield | Zone::Stack => None,
        }
    }
}
