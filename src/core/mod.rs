//! Core game types and entities

pub mod card;
pub mod entity;
pub mod mana;
pub mod player;

pub use card::{ActivatedAbility, Card, CardType, Keyword};
pub use entity::{CardId, EntityStore, PlayerId};
pub use mana::{Color, ManaCost, ManaPool};
pub use player::Player;
