//! Typed entity IDs and the card arena
//!
//! IDs are plain integers so snapshots clone as flat value copies: search
//! branches never share a pointer graph, only handles into their own arena.

use crate::error::{DecisionError, Result};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Stable handle for a card instance within one game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CardId(u32);

impl CardId {
    pub fn new(id: u32) -> Self {
        CardId(id)
    }

    pub fn as_u32(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for CardId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Stable handle for a player.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PlayerId(u32);

impl PlayerId {
    pub fn new(id: u32) -> Self {
        PlayerId(id)
    }

    pub fn as_u32(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Central storage for card instances.
///
/// Provides fast lookup by CardId and id generation. Cloning copies the
/// whole map of values, which is what makes StateSnapshot branch-safe.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntityStore<T> {
    entities: FxHashMap<CardId, T>,
    next_id: u32,
}

impl<T> EntityStore<T> {
    pub fn new() -> Self {
        EntityStore {
            entities: FxHashMap::default(),
            next_id: 0,
        }
    }

    /// Generate a new unique CardId
    pub fn next_id(&mut self) -> CardId {
        let id = CardId::new(self.next_id);
        self.next_id += 1;
        id
    }

    pub fn insert(&mut self, id: CardId, entity: T) {
        self.entities.insert(id, entity);
    }

    /// Get an entity by ID. Missing entities are a normal condition for
    /// evaluators, which degrade to neutral scores.
    pub fn get(&self, id: CardId) -> Option<&T> {
        self.entities.get(&id)
    }

    pub fn get_mut(&mut self, id: CardId) -> Option<&mut T> {
        self.entities.get_mut(&id)
    }

    /// Get an entity by ID, failing loudly for callers that require it
    pub fn require(&self, id: CardId) -> Result<&T> {
        self.entities
            .get(&id)
            .ok_or(DecisionError::EntityNotFound(id.as_u32()))
    }

    pub fn contains(&self, id: CardId) -> bool {
        self.entities.contains_key(&id)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&CardId, &T)> {
        self.entities.iter()
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }
}

impl<T> Default for EntityStore<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entity_store() {
        let mut store: EntityStore<String> = EntityStore::new();
        let id1 = store.next_id();
        let id2 = store.next_id();

        assert_eq!(id1.as_u32(), 0);
        assert_eq!(id2.as_u32(), 1);

        store.insert(id1, "Grizzly Bears".to_string());
        store.insert(id2, "Forest".to_string());

        assert_eq!(store.len(), 2);
        assert_eq!(store.get(id1).unwrap(), "Grizzly Bears");
        assert!(store.get(CardId::new(999)).is_none());
        assert!(store.require(CardId::new(999)).is_err());
    }

    #[test]
    fn test_clone_is_independent() {
        let mut store: EntityStore<String> = EntityStore::new();
        let id = store.next_id();
        store.insert(id, "Original".to_string());

        let mut copy = store.clone();
        *copy.get_mut(id).unwrap() = "Changed".to_string();

        assert_eq!(store.get(id).unwrap(), "Original");
        assert_eq!(copy.get(id).unwrap(), "Changed");
    }
}
