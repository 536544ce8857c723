//! Bounded cache of derived per-family keys.

use std::collections::HashMap;

use parking_lot::RwLock;

use crate::error::HearthResult;

use super::{DerivedKey, KeyDerivation};

/// Default number of owner ids kept in the cache
pub const DEFAULT_KEY_CACHE_CAPACITY: usize = 256;

/// Memoizes `owner id -> DerivedKey`.
///
/// A derived key never changes for a given owner id, so entries are never
/// stale. The only policy is sizing: once `capacity` entries are held, an
/// arbitrary entry is evicted before a new one is inserted. A capacity of
/// zero disables caching.
pub struct KeyCache {
    capacity: usize,
    entries: RwLock<HashMap<String, DerivedKey>>,
}

impl Default for KeyCache {
    fn default() -> Self {
        Self::new(DEFAULT_KEY_CACHE_CAPACITY)
    }
}

impl KeyCache {
    /// Create a cache holding at most `capacity` keys
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// Maximum number of cached keys
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Return the cached key for `owner_id`, deriving and caching it on a miss
    pub fn get_or_derive(&self, owner_id: &str, kdf: &KeyDerivation) -> HearthResult<DerivedKey> {
        if let Some(key) = self.entries.read().get(owner_id) {
            return Ok(key.clone());
        }

        let key = kdf.derive(owner_id)?;
        if self.capacity == 0 {
            return Ok(key);
        }

        let mut entries = self.entries.write();
        if !entries.contains_key(owner_id) && entries.len() >= self.capacity {
            if let Some(victim) = entries.keys().next().cloned() {
                entries.remove(&victim);
            }
        }
        entries.insert(owner_id.to_string(), key.clone());

        Ok(key)
    }

    /// Number of cached keys
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    /// Check if the cache is empty
    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    /// Drop every cached key
    pub fn clear(&self) {
        self.entries.write().clear();
    }
}

impl std::fmt::Debug for KeyCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeyCache")
            .field("capacity", &self.capacity)
            .field("len", &self.len())
            .finish()
    }
}
