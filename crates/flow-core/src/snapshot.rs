//! Opaque content snapshots of an entity store.
//!
//! A snapshot is the MessagePack encoding of every entity in store order.
//! Selection, highlight, and computed curves are not part of the content,
//! so two stores that differ only in those produce identical bytes.

use crate::model::{Entity, EntityStore};

/// Encoded document content.
#[derive(Clone, PartialEq, Eq)]
pub struct Snapshot(Vec<u8>);

impl Snapshot {
    /// Encode the content of `store`.
    pub fn capture(store: &EntityStore) -> Result<Self, String> {
        rmp_serde::to_vec(store.entities())
            .map(Snapshot)
            .map_err(|e| format!("snapshot encode failed: {e}"))
    }

    /// Decode into a fresh store. Transient flags come back cleared.
    pub fn restore(&self) -> Result<EntityStore, String> {
        let entities: Vec<Entity> = rmp_serde::from_slice(&self.0)
            .map_err(|e| format!("snapshot decode failed: {e}"))?;
        Ok(EntityStore::from_entities(entities))
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl std::fmt::Debug for Snapshot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Snapshot({} bytes)", self.0.len())
    }
}
