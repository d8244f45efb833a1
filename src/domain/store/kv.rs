//! Generic key/value store

use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::infrastructure::storage::DocumentStore;
use crate::shared::errors::StoreError;

use super::StoreValue;

/// String-keyed store of tagged values over one on-disk document collection.
///
/// A thin wrapper: value coercion on the way in, nothing on the way out. Each
/// instance owns its backing file exclusively; separate instances never share
/// a namespace.
#[derive(Debug)]
pub struct KvStore {
    docs: DocumentStore,
}

impl KvStore {
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        Ok(Self {
            docs: DocumentStore::open(path)?,
        })
    }

    pub fn path(&self) -> &Path {
        self.docs.path()
    }

    /// Store `value` under `key`, overwriting any existing entry. Persisted
    /// before returning.
    pub fn set(&mut self, key: &str, value: impl Into<StoreValue>) -> Result<(), StoreError> {
        self.docs.upsert(key, value.into())
    }

    /// Store `value` under `key` only when the key is absent (first write
    /// wins). Check-then-act: each store has a single owning worker.
    pub fn set_if_not_exists(
        &mut self,
        key: &str,
        value: impl Into<StoreValue>,
    ) -> Result<(), StoreError> {
        if !self.exists(key) {
            self.set(key, value)?;
        }
        Ok(())
    }

    /// Store a typed record under `key` through the tagged representation.
    pub fn set_json<T: Serialize>(&mut self, key: &str, value: &T) -> Result<(), StoreError> {
        let json = serde_json::to_value(value)?;
        self.docs.upsert(key, StoreValue::try_from(json)?)
    }

    pub fn get(&self, key: &str) -> Option<StoreValue> {
        self.docs.get(key).cloned()
    }

    /// Decode the value under `key` as a typed record.
    pub fn get_json<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, StoreError> {
        match self.docs.get(key) {
            Some(value) => Ok(Some(serde_json::from_value(value.to_json_value())?)),
            None => Ok(None),
        }
    }

    /// Remove the entry for `key`; no-op when absent.
    pub fn delete(&mut self, key: &str) -> Result<(), StoreError> {
        self.docs.remove(key)
    }

    pub fn exists(&self, key: &str) -> bool {
        self.docs.contains(key)
    }

    /// Remove every entry in this store instance.
    pub fn clear(&mut self) -> Result<(), StoreError> {
        self.docs.truncate()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::{BTreeMap, BTreeSet};

    use super::*;
    use tempfile::TempDir;

    fn open_store(dir: &TempDir, name: &str) -> KvStore {
        KvStore::open(dir.path().join(name)).unwrap()
    }

    #[test]
    fn test_round_trip_all_shapes() {
        let dir = TempDir::new().unwrap();
        let mut store = open_store(&dir, "kv.json");

        store.set("s", "hello").unwrap();
        store.set("n", 4.5).unwrap();
        store.set("b", true).unwrap();
        store.set("seq", vec!["a", "b"]).unwrap();

        let mut map = BTreeMap::new();
        map.insert("k".to_string(), "v");
        store.set("map", map.clone()).unwrap();

        let mut set = BTreeSet::new();
        set.insert("y");
        set.insert("x");
        store.set("set", set).unwrap();

        assert_eq!(store.get("s"), Some(StoreValue::from("hello")));
        assert_eq!(store.get("n"), Some(StoreValue::Number(4.5)));
        assert_eq!(store.get("b"), Some(StoreValue::Bool(true)));
        assert_eq!(store.get("seq"), Some(StoreValue::from(vec!["a", "b"])));
        assert_eq!(store.get("map"), Some(StoreValue::from(map)));
        // Sets come back as sequences.
        assert_eq!(store.get("set"), Some(StoreValue::from(vec!["x", "y"])));
    }

    #[test]
    fn test_exists_tracks_set_and_delete() {
        let dir = TempDir::new().unwrap();
        let mut store = open_store(&dir, "kv.json");

        assert!(!store.exists("k"));
        store.set("k", "v").unwrap();
        assert!(store.exists("k"));
        store.delete("k").unwrap();
        assert!(!store.exists("k"));
    }

    #[test]
    fn test_set_if_not_exists_first_write_wins() {
        let dir = TempDir::new().unwrap();
        let mut store = open_store(&dir, "kv.json");

        store.set_if_not_exists("k", "A").unwrap();
        store.set_if_not_exists("k", "B").unwrap();

        assert_eq!(store.get("k"), Some(StoreValue::from("A")));
    }

    #[test]
    fn test_get_absent_key_is_none() {
        let dir = TempDir::new().unwrap();
        let store = open_store(&dir, "kv.json");
        assert_eq!(store.get("missing"), None);
    }

    #[test]
    fn test_clear_forgets_all_prior_keys() {
        let dir = TempDir::new().unwrap();
        let mut store = open_store(&dir, "kv.json");

        store.set("a", 1.0).unwrap();
        store.set("b", 2.0).unwrap();
        store.clear().unwrap();

        assert!(!store.exists("a"));
        assert!(!store.exists("b"));
    }

    #[test]
    fn test_instances_are_isolated() {
        let dir = TempDir::new().unwrap();
        let mut first = open_store(&dir, "first.json");
        let second = open_store(&dir, "second.json");

        first.set("k", "v").unwrap();
        assert!(!second.exists("k"));
    }

    #[test]
    fn test_values_survive_reopen() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("kv.json");

        {
            let mut store = KvStore::open(&path).unwrap();
            store.set("k", vec![1.0, 2.0]).unwrap();
        }

        let store = KvStore::open(&path).unwrap();
        assert_eq!(
            store.get("k"),
            Some(StoreValue::Sequence(vec![
                StoreValue::Number(1.0),
                StoreValue::Number(2.0),
            ]))
        );
    }
}
