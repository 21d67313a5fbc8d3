use bevy::prelude::*;
use std::collections::BTreeMap;

use super::types::FireId;

/// Maps stable [`FireId`]s to fire entities.
///
/// Kept in sync by `register_fires` / `unregister_fires`. Ordered so that
/// iteration (status text, test membership) is deterministic.
#[derive(Resource, Default, Debug)]
pub struct FireRegistry {
    by_id: BTreeMap<FireId, Entity>,
    next_id: u32,
}

impl FireRegistry {
    /// Reserve a fresh id for a fire about to be spawned.
    ///
    /// Counts up past every inserted id. Once a host has taken `u32::MAX`
    /// the lowest free id is handed out instead.
    pub fn allocate(&mut self) -> FireId {
        if self.by_id.contains_key(&FireId(self.next_id)) {
            if let Some(free) = (0..=u32::MAX).find(|n| !self.by_id.contains_key(&FireId(*n))) {
                self.next_id = free;
            }
        }
        let id = FireId(self.next_id);
        self.next_id = self.next_id.saturating_add(1);
        id
    }

    /// Returns `false` (and keeps the existing mapping) if `id` is taken by a
    /// different entity.
    pub fn insert(&mut self, id: FireId, entity: Entity) -> bool {
        if let Some(existing) = self.by_id.get(&id) {
            if *existing != entity {
                return false;
            }
        }
        self.by_id.insert(id, entity);
        self.next_id = self.next_id.max(id.0.saturating_add(1));
        true
    }

    pub fn get(&self, id: FireId) -> Option<Entity> {
        self.by_id.get(&id).copied()
    }

    pub fn contains(&self, id: FireId) -> bool {
        self.by_id.contains_key(&id)
    }

    pub fn remove_entity(&mut self, entity: Entity) -> Option<FireId> {
        let id = self
            .by_id
            .iter()
            .find_map(|(id, e)| (*e == entity).then_some(*id))?;
        self.by_id.remove(&id);
        Some(id)
    }

    pub fn ids(&self) -> impl Iterator<Item = FireId> + '_ {
        self.by_id.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }
}
