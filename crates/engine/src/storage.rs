//! Durable key-value capability backing the record store.
//!
//! The engine only ever needs `get`/`set` of a whole string value by key.

use std::{
    collections::HashMap,
    fs,
    path::{Path, PathBuf},
};

use crate::ResultEngine;

pub trait KeyValueStore {
    /// Returns the value stored under `key`, `None` if nothing was stored yet.
    fn get(&self, key: &str) -> ResultEngine<Option<String>>;

    /// Replaces the value stored under `key`.
    fn set(&mut self, key: &str, value: &str) -> ResultEngine<()>;
}

/// In-process store, lost when dropped.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    values: HashMap<String, String>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> ResultEngine<Option<String>> {
        Ok(self.values.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> ResultEngine<()> {
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// One `<key>.json` file per key inside a directory.
///
/// Writes go to a temporary sibling and are renamed over the target, so a
/// reader sees either the previous value or the new one.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> ResultEngine<Option<String>> {
        match fs::read_to_string(self.path_for(key)) {
            Ok(content) => Ok(Some(content)),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> ResultEngine<()> {
        fs::create_dir_all(&self.dir)?;
        let target = self.path_for(key);
        let staging = self.dir.join(format!(".{key}.json.tmp"));
        fs::write(&staging, value)?;
        fs::rename(&staging, &target)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use uuid::Uuid;

    use super::*;

    fn scratch_dir() -> PathBuf {
        PathBuf::from(env!("CARGO_MANIFEST_DIR"))
            .join("../../target/test_stores")
            .join(Uuid::new_v4().to_string())
    }

    #[test]
    fn memory_store_get_set() {
        let mut store = MemoryStore::new();
        assert_eq!(store.get("k").unwrap(), None);
        store.set("k", "v1").unwrap();
        store.set("k", "v2").unwrap();
        assert_eq!(store.get("k").unwrap().as_deref(), Some("v2"));
    }

    #[test]
    fn file_store_missing_key_is_none() {
        let store = FileStore::new(scratch_dir());
        assert_eq!(store.get("mera.expenses.v1").unwrap(), None);
    }

    #[test]
    fn file_store_overwrites_and_leaves_no_staging_file() {
        let dir = scratch_dir();
        let mut store = FileStore::new(&dir);
        store.set("mera.expenses.v1", "[1]").unwrap();
        store.set("mera.expenses.v1", "[2]").unwrap();

        assert_eq!(store.get("mera.expenses.v1").unwrap().as_deref(), Some("[2]"));
        let names: Vec<_> = fs::read_dir(&dir)
            .unwrap()
            .map(|entry| entry.unwrap().file_name())
            .collect();
        assert_eq!(names, vec![std::ffi::OsString::from("mera.expenses.v1.json")]);

        fs::remove_dir_all(dir).unwrap();
    }
}
