//! In-memory fingerprint store
//!
//! Reference implementation of [`FingerprintStore`] backed by a
//! `RwLock<HashMap>`. Operations complete without I/O, so the trait's
//! timeout contract is trivially met. Used by the tests, benches and the
//! demo binary; production deployments inject their own store.

use std::collections::HashMap;
use std::sync::RwLock;

use crate::store::{FingerprintStore, StoreError, StoredRecord};

/// Process-local hash → records multimap
#[derive(Debug, Default)]
pub struct MemoryStore {
    records: RwLock<HashMap<String, Vec<StoredRecord>>>,
}

impl MemoryStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Total number of stored records
    pub fn len(&self) -> usize {
        self.records
            .read()
            .map(|map| map.values().map(Vec::len).sum())
            .unwrap_or(0)
    }

    /// Whether the store holds no records
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl FingerprintStore for MemoryStore {
    fn insert(&self, hash: &str, song_id: &str, offset: i64) -> Result<(), StoreError> {
        let mut map = self
            .records
            .write()
            .map_err(|_| StoreError::Unavailable("lock poisoned".to_string()))?;
        map.entry(hash.to_string()).or_default().push(StoredRecord {
            song_id: song_id.to_string(),
            offset,
        });
        Ok(())
    }

    fn lookup(&self, hash: &str) -> Result<Vec<StoredRecord>, StoreError> {
        let map = self
            .records
            .read()
            .map_err(|_| StoreError::Unavailable("lock poisoned".to_string()))?;
        Ok(map.get(hash).cloned().unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_unknown_hash_is_empty_not_error() {
        let store = MemoryStore::new();
        let records = store.lookup("deadbeefdeadbeefdead").unwrap();
        assert!(records.is_empty());
    }

    #[test]
    fn test_duplicate_hashes_are_retained() {
        let store = MemoryStore::new();
        store.insert("aa00", "song-a", 10).unwrap();
        store.insert("aa00", "song-b", 99).unwrap();
        store.insert("aa00", "song-a", 10).unwrap();

        let records = store.lookup("aa00").unwrap();
        assert_eq!(records.len(), 3);
        assert_eq!(store.len(), 3);
    }
}
