//! In-memory storage backend.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};

use parking_lot::Mutex;

use super::{ConsoleSource, ConsoleStorage};
use crate::error::{ConsoleError, ConsoleResult};

#[derive(Debug, Default)]
struct MemoryState {
    /// set key -> member -> score
    sets: HashMap<String, HashMap<String, f64>>,
    /// hash key -> field -> value
    hashes: HashMap<String, HashMap<String, String>>,
}

/// Ordered sets and hashes kept in process memory.
///
/// Members of a set are unique; adding an existing member again updates its
/// score. Writes can be made to fail on demand to exercise error paths.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    state: Mutex<MemoryState>,
    fail_writes: AtomicBool,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent write return a storage error (or stop doing so).
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Number of members in the ordered set at `key`.
    pub fn set_len(&self, key: &str) -> usize {
        self.state.lock().sets.get(key).map_or(0, |set| set.len())
    }

    /// Number of fields in the hash at `key`.
    pub fn hash_len(&self, key: &str) -> usize {
        self.state.lock().hashes.get(key).map_or(0, |hash| hash.len())
    }

    fn check_writable(&self) -> ConsoleResult<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(ConsoleError::Storage("memory storage is failing writes".into()));
        }
        Ok(())
    }
}

impl ConsoleStorage for MemoryStorage {
    fn add_to_set(&self, key: &str, value: &str, score: f64) -> ConsoleResult<()> {
        self.check_writable()?;
        self.state
            .lock()
            .sets
            .entry(key.to_string())
            .or_default()
            .insert(value.to_string(), score);
        Ok(())
    }

    fn set_range_in_hash(&self, key: &str, fields: &[(String, String)]) -> ConsoleResult<()> {
        self.check_writable()?;
        let mut state = self.state.lock();
        let hash = state.hashes.entry(key.to_string()).or_default();
        for (field, value) in fields {
            hash.insert(field.clone(), value.clone());
        }
        Ok(())
    }
}

impl ConsoleSource for MemoryStorage {
    fn range_from_set(&self, key: &str) -> ConsoleResult<Vec<(String, f64)>> {
        let state = self.state.lock();
        let mut members: Vec<(String, f64)> = state
            .sets
            .get(key)
            .map(|set| set.iter().map(|(m, s)| (m.clone(), *s)).collect())
            .unwrap_or_default();

        // Equal scores fall back to member order, like a Redis sorted set
        members.sort_by(|a, b| a.1.total_cmp(&b.1).then_with(|| a.0.cmp(&b.0)));
        Ok(members)
    }

    fn get_value_from_hash(&self, key: &str, field: &str) -> ConsoleResult<Option<String>> {
        let state = self.state.lock();
        Ok(state
            .hashes
            .get(key)
            .and_then(|hash| hash.get(field))
            .cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_range_is_sorted_by_score() {
        let storage = MemoryStorage::new();
        storage.add_to_set("lines", "b", 2.0).unwrap();
        storage.add_to_set("lines", "a", 1.0).unwrap();
        storage.add_to_set("lines", "c", 1.5).unwrap();

        let members = storage.range_from_set("lines").unwrap();
        let values: Vec<_> = members.iter().map(|(m, _)| m.as_str()).collect();
        assert_eq!(values, vec!["a", "c", "b"]);
    }

    #[test]
    fn test_readding_member_updates_score() {
        let storage = MemoryStorage::new();
        storage.add_to_set("lines", "a", 1.0).unwrap();
        storage.add_to_set("lines", "a", 3.0).unwrap();

        assert_eq!(storage.set_len("lines"), 1);
        assert_eq!(
            storage.range_from_set("lines").unwrap(),
            vec![("a".to_string(), 3.0)]
        );
    }

    #[test]
    fn test_hash_fields() {
        let storage = MemoryStorage::new();
        storage
            .set_range_in_hash("refs", &[("k".to_string(), "v".to_string())])
            .unwrap();

        assert_eq!(storage.hash_len("refs"), 1);
        assert_eq!(
            storage.get_value_from_hash("refs", "k").unwrap().as_deref(),
            Some("v")
        );
        assert!(storage.get_value_from_hash("refs", "missing").unwrap().is_none());
        assert!(storage.get_value_from_hash("other", "k").unwrap().is_none());
    }

    #[test]
    fn test_failing_writes() {
        let storage = MemoryStorage::new();
        storage.set_fail_writes(true);

        assert!(matches!(
            storage.add_to_set("lines", "a", 1.0),
            Err(ConsoleError::Storage(_))
        ));
        assert!(storage.set_range_in_hash("refs", &[]).is_err());

        storage.set_fail_writes(false);
        assert!(storage.add_to_set("lines", "a", 1.0).is_ok());
    }

    #[test]
    fn test_empty_set_reads_empty() {
        let storage = MemoryStorage::new();
        assert!(storage.range_from_set("nothing").unwrap().is_empty());
        assert_eq!(storage.set_len("nothing"), 0);
    }
}
