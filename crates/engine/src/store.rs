//! Record store: the durable list of expenses.
//!
//! The list is kept newest-first (creation/edit order) and is persisted as one
//! JSON array under [`STORAGE_KEY`] after every mutation. Each mutation builds
//! the next list, writes it, and only then swaps it in, so a failed write never
//! leaves the in-memory list out of sync with the stored one.

use uuid::Uuid;

use crate::{Expense, KeyValueStore, ResultEngine};

/// Fixed storage key. The suffix is the schema version.
pub const STORAGE_KEY: &str = "mera.expenses.v1";

/// Where an unreadable blob is copied before the store starts over.
pub const CORRUPT_KEY: &str = "mera.expenses.v1.corrupt";

enum Blob {
    Records(Vec<Expense>),
    /// Present but not a valid collection; holds the raw text.
    Corrupt(String),
}

fn read<S: KeyValueStore>(backend: &S) -> Blob {
    let raw = match backend.get(STORAGE_KEY) {
        Ok(Some(raw)) => raw,
        Ok(None) => return Blob::Records(Vec::new()),
        Err(err) => {
            tracing::warn!("failed to read {STORAGE_KEY}: {err}");
            return Blob::Records(Vec::new());
        }
    };

    match serde_json::from_str::<Option<Vec<Expense>>>(&raw) {
        Ok(records) => Blob::Records(records.unwrap_or_default()),
        Err(err) => {
            tracing::warn!("failed to parse {STORAGE_KEY}, starting empty: {err}");
            Blob::Corrupt(raw)
        }
    }
}

/// Reads the persisted collection, failing soft.
///
/// A missing key, an unreadable backend or a malformed blob all produce an
/// empty list; the latter two are logged.
pub fn load<S: KeyValueStore>(backend: &S) -> Vec<Expense> {
    match read(backend) {
        Blob::Records(records) => records,
        Blob::Corrupt(_) => Vec::new(),
    }
}

/// Serializes the full collection and overwrites the stored blob.
pub fn save<S: KeyValueStore>(backend: &mut S, records: &[Expense]) -> ResultEngine<()> {
    let payload = serde_json::to_string(records)?;
    backend.set(STORAGE_KEY, &payload)?;
    tracing::debug!("saved {} expenses", records.len());
    Ok(())
}

#[derive(Debug)]
pub struct RecordStore<S> {
    backend: S,
    records: Vec<Expense>,
}

impl<S: KeyValueStore> RecordStore<S> {
    /// Opens the store, loading whatever the backend holds.
    ///
    /// A malformed blob is copied to [`CORRUPT_KEY`] first, since the next
    /// save replaces it.
    pub fn open(mut backend: S) -> Self {
        let records = match read(&backend) {
            Blob::Records(records) => records,
            Blob::Corrupt(raw) => {
                match backend.set(CORRUPT_KEY, &raw) {
                    Ok(()) => tracing::warn!("kept the unreadable blob under {CORRUPT_KEY}"),
                    Err(err) => tracing::warn!("failed to keep the unreadable blob: {err}"),
                }
                Vec::new()
            }
        };
        tracing::debug!("loaded {} expenses", records.len());
        Self { backend, records }
    }

    #[must_use]
    pub fn records(&self) -> &[Expense] {
        &self.records
    }

    #[must_use]
    pub fn get(&self, id: Uuid) -> Option<&Expense> {
        self.records.iter().find(|record| record.id == id)
    }

    #[must_use]
    pub fn backend(&self) -> &S {
        &self.backend
    }

    pub fn save(&mut self) -> ResultEngine<()> {
        save(&mut self.backend, &self.records)
    }

    /// Replaces the record with the same id in place, or prepends it.
    pub fn upsert(&mut self, record: Expense) -> ResultEngine<()> {
        let mut next = self.records.clone();
        match next.iter_mut().find(|existing| existing.id == record.id) {
            Some(existing) => *existing = record,
            None => next.insert(0, record),
        }
        self.commit(next)
    }

    /// Deletes the record with `id`. Returns `false`, without writing, when
    /// no such record exists.
    pub fn remove(&mut self, id: Uuid) -> ResultEngine<bool> {
        if self.get(id).is_none() {
            return Ok(false);
        }
        let next: Vec<Expense> = self
            .records
            .iter()
            .filter(|record| record.id != id)
            .cloned()
            .collect();
        self.commit(next)?;
        Ok(true)
    }

    fn commit(&mut self, next: Vec<Expense>) -> ResultEngine<()> {
        save(&mut self.backend, &next)?;
        self.records = next;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use chrono::{NaiveDate, TimeZone, Utc};

    use super::*;
    use crate::{EngineError, MemoryStore, Money};

    fn expense(n: u128, minor: i64) -> Expense {
        Expense {
            id: Uuid::from_u128(n),
            amount: Money::new(minor),
            category: "Food".to_string(),
            note: format!("note {n}"),
            date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            time: Utc.with_ymd_and_hms(2024, 1, 1, 8, 0, 0).unwrap(),
        }
    }

    /// Backend whose writes always fail.
    struct ReadOnly(MemoryStore);

    impl KeyValueStore for ReadOnly {
        fn get(&self, key: &str) -> ResultEngine<Option<String>> {
            self.0.get(key)
        }

        fn set(&mut self, _key: &str, _value: &str) -> ResultEngine<()> {
            Err(EngineError::Storage(std::io::Error::other("read-only")))
        }
    }

    #[test]
    fn missing_blob_loads_empty() {
        let store = RecordStore::open(MemoryStore::new());
        assert!(store.records().is_empty());
    }

    #[test]
    fn corrupt_blob_loads_empty() {
        for raw in ["{not json", "42", r#"[{"id":"nope"}]"#] {
            let mut backend = MemoryStore::new();
            backend.set(STORAGE_KEY, raw).unwrap();
            assert!(load(&backend).is_empty(), "blob {raw:?}");
        }
    }

    #[test]
    fn corrupt_blob_is_kept_aside_on_open() {
        let raw = r#"[{"id":"00000000-0000-0000-0000-000000000001","date":"yesterday"}]"#;
        let mut backend = MemoryStore::new();
        backend.set(STORAGE_KEY, raw).unwrap();

        let mut store = RecordStore::open(backend);
        assert!(store.records().is_empty());
        store.upsert(expense(2, 200)).unwrap();

        assert_eq!(store.backend().get(CORRUPT_KEY).unwrap().as_deref(), Some(raw));
        assert_eq!(load(store.backend()), vec![expense(2, 200)]);
    }

    #[test]
    fn valid_blob_is_not_copied() {
        let mut backend = MemoryStore::new();
        save(&mut backend, &[expense(1, 100)]).unwrap();
        let store = RecordStore::open(backend);
        assert_eq!(store.backend().get(CORRUPT_KEY).unwrap(), None);
    }

    #[test]
    fn null_blob_loads_empty() {
        let mut backend = MemoryStore::new();
        backend.set(STORAGE_KEY, "null").unwrap();
        assert!(load(&backend).is_empty());
    }

    #[test]
    fn save_then_load_round_trips() {
        let records = vec![expense(1, 10_000), expense(2, 1), expense(3, 123_456)];
        let mut backend = MemoryStore::new();
        save(&mut backend, &records).unwrap();
        assert_eq!(load(&backend), records);
    }

    #[test]
    fn upsert_new_id_prepends() {
        let mut store = RecordStore::open(MemoryStore::new());
        store.upsert(expense(1, 100)).unwrap();
        store.upsert(expense(2, 200)).unwrap();

        assert_eq!(store.records().len(), 2);
        assert_eq!(store.records()[0].id, Uuid::from_u128(2));
        assert_eq!(load(store.backend()), store.records());
    }

    #[test]
    fn upsert_existing_id_replaces_in_place() {
        let mut store = RecordStore::open(MemoryStore::new());
        store.upsert(expense(1, 100)).unwrap();
        store.upsert(expense(2, 200)).unwrap();

        store.upsert(expense(1, 999)).unwrap();

        assert_eq!(store.records().len(), 2);
        assert_eq!(store.records()[1].id, Uuid::from_u128(1));
        assert_eq!(store.records()[1].amount, Money::new(999));
    }

    #[test]
    fn remove_absent_id_is_noop() {
        let mut store = RecordStore::open(MemoryStore::new());
        store.upsert(expense(1, 100)).unwrap();
        let before = store.records().to_vec();

        assert!(!store.remove(Uuid::from_u128(9)).unwrap());
        assert_eq!(store.records(), before.as_slice());
    }

    #[test]
    fn remove_existing_id_persists() {
        let mut store = RecordStore::open(MemoryStore::new());
        store.upsert(expense(1, 100)).unwrap();
        store.upsert(expense(2, 200)).unwrap();

        assert!(store.remove(Uuid::from_u128(1)).unwrap());
        assert_eq!(store.records().len(), 1);
        assert_eq!(load(store.backend()).len(), 1);
    }

    #[test]
    fn failed_write_keeps_previous_state() {
        let mut seeded = MemoryStore::new();
        save(&mut seeded, &[expense(1, 100)]).unwrap();
        let mut store = RecordStore::open(ReadOnly(seeded));

        assert!(store.upsert(expense(2, 200)).is_err());
        assert!(store.remove(Uuid::from_u128(1)).is_err());
        assert_eq!(store.records(), &[expense(1, 100)]);
    }
}
