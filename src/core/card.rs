//! Card instances as seen by the evaluators
//!
//! Optional attributes are explicit `Option` fields and card types an
//! explicit enum set, so evaluation code pattern-matches instead of
//! probing for attribute presence.

use crate::core::{CardId, Color, ManaCost, PlayerId};
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

/// Card types in MTG
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CardType {
    Creature,
    Instant,
    Sorcery,
    Enchantment,
    Artifact,
    Land,
    Planeswalker,
}

/// Evergreen keywords the evaluators price explicitly; everything else
/// rides along as `Other` and is matched by name when needed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Keyword {
    Flying,
    FirstStrike,
    DoubleStrike,
    Deathtouch,
    Haste,
    Hexproof,
    Indestructible,
    Lifelink,
    Menace,
    Reach,
    Trample,
    Vigilance,
    Defender,
    Shroud,
    Other(String),
}

/// An activated ability on a permanent, carried as the raw cost/effect
/// text the external engine resolved it from. The ActionEvaluator parses
/// these into priced categories; it never executes them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivatedAbility {
    pub cost_text: String,
    pub effect_text: String,
    pub is_mana_ability: bool,
}

impl ActivatedAbility {
    pub fn new(cost_text: impl Into<String>, effect_text: impl Into<String>, is_mana_ability: bool) -> Self {
        ActivatedAbility {
            cost_text: cost_text.into(),
            effect_text: effect_text.into(),
            is_mana_ability,
        }
    }
}

/// The instance of a card during gameplay
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Card {
    /// Unique ID for this card instance
    pub id: CardId,

    /// Card name (e.g., "Lightning Bolt")
    pub name: String,

    /// Mana cost
    pub mana_cost: ManaCost,

    /// Card types (a card can be multiple types)
    pub types: SmallVec<[CardType; 2]>,

    /// Card subtypes (e.g., "Goblin", "Warrior")
    pub subtypes: SmallVec<[String; 2]>,

    /// Colors of the card
    pub colors: SmallVec<[Color; 2]>,

    /// Power (for creatures)
    pub power: Option<i8>,

    /// Toughness (for creatures)
    pub toughness: Option<i8>,

    /// Starting loyalty (for planeswalkers)
    pub loyalty: Option<u8>,

    /// Oracle text
    pub text: String,

    /// Keywords granted by the card itself
    pub keywords: SmallVec<[Keyword; 2]>,

    /// Activated abilities (as resolved text)
    pub abilities: SmallVec<[ActivatedAbility; 1]>,

    /// Player who owns this card
    pub owner: PlayerId,

    /// Current controller (can differ from owner)
    pub controller: PlayerId,

    /// Is the card tapped?
    pub tapped: bool,

    /// Turn this card entered the battlefield (None while off-battlefield)
    pub turn_entered_battlefield: Option<u32>,

    /// Counters on this card (+1/+1, -1/-1, charge, loyalty)
    pub counters: SmallVec<[(String, u8); 2]>,
}

impl Card {
    pub fn new(id: CardId, name: impl Into<String>, owner: PlayerId) -> Self {
        Card {
            id,
            name: name.into(),
            mana_cost: ManaCost::new(),
            types: SmallVec::new(),
            subtypes: SmallVec::new(),
            colors: SmallVec::new(),
            power: None,
            toughness: None,
            loyalty: None,
            text: String::new(),
            keywords: SmallVec::new(),
            abilities: SmallVec::new(),
            owner,
            controller: owner,
            tapped: false,
            turn_entered_battlefield: None,
            counters: SmallVec::new(),
        }
    }

    pub fn is_type(&self, card_type: CardType) -> bool {
        self.types.contains(&card_type)
    }

    pub fn is_creature(&self) -> bool {
        self.is_type(CardType::Creature)
    }

    pub fn is_land(&self) -> bool {
        self.is_type(CardType::Land)
    }

    pub fn is_instant(&self) -> bool {
        self.is_type(CardType::Instant)
    }

    pub fn is_sorcery(&self) -> bool {
        self.is_type(CardType::Sorcery)
    }

    pub fn is_planeswalker(&self) -> bool {
        self.is_type(CardType::Planeswalker)
    }

    pub fn has_keyword(&self, keyword: &Keyword) -> bool {
        self.keywords.contains(keyword)
    }

    pub fn has_flying(&self) -> bool {
        self.has_keyword(&Keyword::Flying)
    }

    pub fn has_first_strike(&self) -> bool {
        self.has_keyword(&Keyword::FirstStrike)
    }

    pub fn has_double_strike(&self) -> bool {
        self.has_keyword(&Keyword::DoubleStrike)
    }

    pub fn has_deathtouch(&self) -> bool {
        self.has_keyword(&Keyword::Deathtouch)
    }

    pub fn has_haste(&self) -> bool {
        self.has_keyword(&Keyword::Haste)
    }

    pub fn has_lifelink(&self) -> bool {
        self.has_keyword(&Keyword::Lifelink)
    }

    pub fn has_menace(&self) -> bool {
        self.has_keyword(&Keyword::Menace)
    }

    pub fn has_reach(&self) -> bool {
        self.has_keyword(&Keyword::Reach)
    }

    pub fn has_trample(&self) -> bool {
        self.has_keyword(&Keyword::Trample)
    }

    pub fn has_vigilance(&self) -> bool {
        self.has_keyword(&Keyword::Vigilance)
    }

    pub fn has_indestructible(&self) -> bool {
        self.has_keyword(&Keyword::Indestructible)
    }

    pub fn has_defender(&self) -> bool {
        self.has_keyword(&Keyword::Defender)
    }

    pub fn tap(&mut self) {
        self.tapped = true;
    }

    pub fn untap(&mut self) {
        self.tapped = false;
    }

    pub fn add_counter(&mut self, counter_type: impl Into<String>, amount: u8) {
        let counter_type = counter_type.into();
        if let Some((_, count)) = self.counters.iter_mut().find(|(t, _)| t == &counter_type) {
            *count += amount;
        } else {
            self.counters.push((counter_type, amount));
        }
    }

    pub fn get_counter(&self, counter_type: &str) -> u8 {
        self.counters
            .iter()
            .find(|(t, _)| t == counter_type)
            .map(|(_, count)| *count)
            .unwrap_or(0)
    }

    /// Get current power (including counters)
    pub fn current_power(&self) -> i8 {
        let base = self.power.unwrap_or(0);
        let plus_counters = self.get_counter("+1/+1") as i8;
        let minus_counters = self.get_counter("-1/-1") as i8;
        base + plus_counters - minus_counters
    }

    /// Get current toughness (including counters)
    pub fn current_toughness(&self) -> i8 {
        let base = self.toughness.unwrap_or(0);
        let plus_counters = self.get_counter("+1/+1") as i8;
        let minus_counters = self.get_counter("-1/-1") as i8;
        base + plus_counters - minus_counters
    }

    /// A creature that entered this turn cannot attack without haste
    pub fn is_summoning_sick(&self, current_turn: u32) -> bool {
        if !self.is_creature() || self.has_haste() {
            return false;
        }
        self.turn_entered_battlefield == Some(current_turn)
    }

    /// Ready to be declared as an attacker
    pub fn can_attack(&self, current_turn: u32) -> bool {
        self.is_creature() && !self.tapped && !self.has_defender() && !self.is_summoning_sick(current_turn)
    }
}
