use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};
use tokio::sync::OnceCell;

use super::ClusterKey;

/// What a cluster resolved to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlaceEntry {
    /// The geocoder returned a usable address.
    Named(String),
    /// The geocoder answered but the address had nothing usable.
    Unnamed,
    /// The lookup failed; the label is derived from the first caller's coordinates.
    Fallback(String),
}

impl PlaceEntry {
    pub fn name(&self) -> Option<&str> {
        match self {
            PlaceEntry::Named(name) | PlaceEntry::Fallback(name) => Some(name),
            PlaceEntry::Unnamed => None,
        }
    }

    pub fn into_name(self) -> Option<String> {
        match self {
            PlaceEntry::Named(name) | PlaceEntry::Fallback(name) => Some(name),
            PlaceEntry::Unnamed => None,
        }
    }
}

/// In-memory place-name cache keyed by cluster.
///
/// Each key owns a write-once slot, so the first stored entry wins and
/// concurrent resolvers for the same key can wait on the same slot. Entries
/// never expire and the map is unbounded for the lifetime of the service.
#[derive(Debug, Default)]
pub struct ReverseGeocodeCache {
    slots: Mutex<HashMap<ClusterKey, Arc<OnceCell<PlaceEntry>>>>,
}

impl ReverseGeocodeCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &ClusterKey) -> Option<PlaceEntry> {
        let slots = self.slots.lock().unwrap_or_else(PoisonError::into_inner);
        slots.get(key).and_then(|slot| slot.get().cloned())
    }

    pub fn has(&self, key: &ClusterKey) -> bool {
        let slots = self.slots.lock().unwrap_or_else(PoisonError::into_inner);
        slots.get(key).is_some_and(|slot| slot.initialized())
    }

    /// Store `entry` unless the key already holds one. Returns whether it was stored.
    pub fn set(&self, key: ClusterKey, entry: PlaceEntry) -> bool {
        self.slot(key).set(entry).is_ok()
    }

    /// Number of resolved entries.
    pub fn len(&self) -> usize {
        let slots = self.slots.lock().unwrap_or_else(PoisonError::into_inner);
        slots.values().filter(|slot| slot.initialized()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The write-once slot for `key`, created empty on first use.
    pub(crate) fn slot(&self, key: ClusterKey) -> Arc<OnceCell<PlaceEntry>> {
        let mut slots = self.slots.lock().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(slots.entry(key).or_default())
    }
}
