//! The multi-keyspace façade: a thin `String -> IOL` mapping.
//!
//! Deliberately outside the core (spec.md §1, §6): the hard problem is the
//! indexed ordered list itself, not the map that hands callers one. Grounded
//! on the teacher's `production/shared_state.rs` (an `Arc<RwLock<T>>` guarding
//! shared mutable state reachable from multiple connections) — here each
//! named set gets its *own* `Arc<RwLock<IndexedOrderedList>>` so operations
//! against different keys never contend on the same lock.

use std::sync::Arc;

use ahash::AHashMap;
use parking_lot::RwLock;
use tracing::trace;

use crate::config::IolConfig;
use crate::iol::IndexedOrderedList;

/// A handle to one named sorted set, independently lockable.
pub type SetHandle = Arc<RwLock<IndexedOrderedList>>;

/// Maps string keys to independent [`IndexedOrderedList`] instances.
///
/// The keyspace's own lock only ever guards the *map*; a given set's
/// contents are guarded by that set's own lock, matching spec.md §5 ("a
/// single readers-writer lock guards the entire IOL instance" — one per
/// instance, not one for the whole keyspace).
pub struct Keyspace {
    config: IolConfig,
    sets: RwLock<AHashMap<String, SetHandle>>,
}

impl Keyspace {
    /// A new, empty keyspace; every set it creates uses `config`.
    pub fn new(config: IolConfig) -> Self {
        Keyspace {
            config,
            sets: RwLock::new(AHashMap::new()),
        }
    }

    /// The set named `key`, creating an empty one if absent.
    ///
    /// Double-checked locking: a shared-lock lookup first, falling back to
    /// an exclusive-lock insert only on miss, so the common case (the key
    /// already exists) never takes the write lock.
    pub fn get_or_create(&self, key: &str) -> SetHandle {
        if let Some(handle) = self.sets.read().get(key) {
            return handle.clone();
        }
        let mut sets = self.sets.write();
        sets.entry(key.to_string())
            .or_insert_with(|| {
                trace!(key, "keyspace: creating new set");
                Arc::new(RwLock::new(IndexedOrderedList::with_config(self.config)))
            })
            .clone()
    }

    /// The set named `key`, without creating one.
    pub fn get(&self, key: &str) -> Option<SetHandle> {
        self.sets.read().get(key).cloned()
    }

    /// Drop the set named `key` entirely. Returns whether one existed.
    pub fn remove(&self, key: &str) -> bool {
        self.sets.write().remove(key).is_some()
    }

    /// Number of named sets currently tracked (including empty ones).
    pub fn len(&self) -> usize {
        self.sets.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.sets.read().is_empty()
    }

    /// All keys currently tracked, in arbitrary order.
    pub fn keys(&self) -> Vec<String> {
        self.sets.read().keys().cloned().collect()
    }
}

impl Default for Keyspace {
    fn default() -> Self {
        Self::new(IolConfig::default())
    }
}
