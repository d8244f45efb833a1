//! On-disk JSON document collection

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::domain::store::StoreValue;
use crate::shared::errors::StoreError;

/// One key/value row in a collection file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entry {
    pub key: String,
    pub value: StoreValue,
}

/// Raw row as it appears on disk. The value is kept untyped here so a single
/// unrecognized entry does not poison the rest of the file.
#[derive(Debug, Deserialize)]
struct RawEntry {
    key: String,
    value: serde_json::Value,
}

/// A persistent collection of key/value entries backed by a single JSON file.
///
/// At most one entry exists per key (upsert-by-key). Every mutation rewrites
/// the file synchronously before returning. The parent directory is created
/// on open; the file itself appears on first write.
#[derive(Debug)]
pub struct DocumentStore {
    path: PathBuf,
    entries: BTreeMap<String, StoreValue>,
}

impl DocumentStore {
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let entries = if path.exists() {
            Self::load(&path)?
        } else {
            BTreeMap::new()
        };

        Ok(Self { path, entries })
    }

    fn load(path: &Path) -> Result<BTreeMap<String, StoreValue>, StoreError> {
        let raw = fs::read_to_string(path)?;
        if raw.trim().is_empty() {
            return Ok(BTreeMap::new());
        }

        let rows: Vec<RawEntry> = serde_json::from_str(&raw)
            .map_err(|e| StoreError::Corrupt(format!("{}: {e}", path.display())))?;

        let mut entries = BTreeMap::new();
        for row in rows {
            let value = decode_value(row.value);
            entries.insert(row.key, value);
        }
        Ok(entries)
    }

    fn persist(&self) -> Result<(), StoreError> {
        let rows: Vec<Entry> = self
            .entries
            .iter()
            .map(|(key, value)| Entry {
                key: key.clone(),
                value: value.clone(),
            })
            .collect();
        let body = serde_json::to_string_pretty(&rows)?;
        fs::write(&self.path, body)?;
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Insert or replace the entry for `key`.
    pub fn upsert(&mut self, key: &str, value: StoreValue) -> Result<(), StoreError> {
        self.entries.insert(key.to_string(), value);
        self.persist()
    }

    pub fn get(&self, key: &str) -> Option<&StoreValue> {
        self.entries.get(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Remove the entry for `key`. No-op when absent.
    pub fn remove(&mut self, key: &str) -> Result<(), StoreError> {
        if self.entries.remove(key).is_some() {
            self.persist()?;
        }
        Ok(())
    }

    /// Drop every entry in the collection.
    pub fn truncate(&mut self) -> Result<(), StoreError> {
        self.entries.clear();
        self.persist()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Decode a raw on-disk value. Values written by this crate carry the tagged
/// shape; anything else (legacy rows, hand-edited files) is masked to `Str`
/// with the raw text rather than surfaced as an error.
fn decode_value(raw: serde_json::Value) -> StoreValue {
    match serde_json::from_value::<StoreValue>(raw.clone()) {
        Ok(value) => value,
        Err(_) => match raw {
            serde_json::Value::String(s) => StoreValue::Str(s),
            other => StoreValue::Str(other.to_string()),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn store_in(dir: &TempDir) -> DocumentStore {
        DocumentStore::open(dir.path().join("store.json")).unwrap()
    }

    #[test]
    fn test_upsert_replaces_by_key() {
        let dir = TempDir::new().unwrap();
        let mut store = store_in(&dir);

        store.upsert("k", StoreValue::from("first")).unwrap();
        store.upsert("k", StoreValue::from("second")).unwrap();

        assert_eq!(store.len(), 1);
        assert_eq!(store.get("k"), Some(&StoreValue::from("second")));
    }

    #[test]
    fn test_entries_survive_reopen() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("store.json");

        {
            let mut store = DocumentStore::open(&path).unwrap();
            store.upsert("a", StoreValue::Number(1.0)).unwrap();
            store.upsert("b", StoreValue::Bool(true)).unwrap();
        }

        let reopened = DocumentStore::open(&path).unwrap();
        assert_eq!(reopened.len(), 2);
        assert_eq!(reopened.get("a"), Some(&StoreValue::Number(1.0)));
        assert_eq!(reopened.get("b"), Some(&StoreValue::Bool(true)));
    }

    #[test]
    fn test_remove_is_noop_when_absent() {
        let dir = TempDir::new().unwrap();
        let mut store = store_in(&dir);

        store.remove("missing").unwrap();
        store.upsert("k", StoreValue::Bool(false)).unwrap();
        store.remove("k").unwrap();

        assert!(!store.contains("k"));
    }

    #[test]
    fn test_truncate_empties_collection() {
        let dir = TempDir::new().unwrap();
        let mut store = store_in(&dir);

        store.upsert("a", StoreValue::from("x")).unwrap();
        store.upsert("b", StoreValue::from("y")).unwrap();
        store.truncate().unwrap();

        assert!(store.is_empty());
    }

    #[test]
    fn test_legacy_value_masked_to_str() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("store.json");
        fs::write(&path, r#"[{"key": "old", "value": "plain text"}]"#).unwrap();

        let store = DocumentStore::open(&path).unwrap();
        assert_eq!(store.get("old"), Some(&StoreValue::from("plain text")));
    }

    #[test]
    fn test_corrupt_file_surfaces_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("store.json");
        fs::write(&path, "not json at all").unwrap();

        let result = DocumentStore::open(&path);
        assert!(matches!(result, Err(StoreError::Corrupt(_))));
    }

    #[test]
    fn test_parent_directory_created_on_open() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("deep").join("store.json");

        let mut store = DocumentStore::open(&path).unwrap();
        store.upsert("k", StoreValue::from("v")).unwrap();
        assert!(path.exists());
    }
}
