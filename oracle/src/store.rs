//! Require record persistence.
//!
//! The oracle writes records through [`RequireStore`] and nodes read them
//! back through the same trait, so tests can run against a plain in-memory
//! map while deployments point both roles at a shared redb database.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use parking_lot::RwLock;
use redb::{Database, TableDefinition};
use thiserror::Error;

use crate::record::RequireRecord;
use shroud_registry::Handle;

/// Handle bytes -> bincode-encoded [`RequireRecord`].
const REQUIRE_RECORDS: TableDefinition<&[u8], &[u8]> = TableDefinition::new("require_records");

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] redb::DatabaseError),

    #[error("Transaction error: {0}")]
    Transaction(#[from] redb::TransactionError),

    #[error("Table error: {0}")]
    Table(#[from] redb::TableError),

    #[error("Storage error: {0}")]
    Storage(#[from] redb::StorageError),

    #[error("Commit error: {0}")]
    Commit(#[from] redb::CommitError),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<bincode::Error> for StoreError {
    fn from(e: bincode::Error) -> Self {
        StoreError::Serialization(e.to_string())
    }
}

/// Storage seam shared by the oracle (writer) and nodes (readers).
///
/// Errors are stringly typed at this boundary so implementations over
/// different backends can plug in without a shared error enum. The
/// protocol layer decides what a failure means for its role.
pub trait RequireStore: Send + Sync {
    /// Persists a record, replacing any previous record for the same handle.
    fn put(&self, record: &RequireRecord) -> Result<(), String>;

    /// Looks up the record for a condition handle, if one was published.
    fn get(&self, handle: &Handle) -> Result<Option<RequireRecord>, String>;
}

/// In-memory store for tests and single-process setups.
#[derive(Default)]
pub struct MemoryRequireStore {
    records: RwLock<HashMap<Handle, RequireRecord>>,
}

impl MemoryRequireStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of records currently held.
    pub fn len(&self) -> usize {
        self.records.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.read().is_empty()
    }
}

impl RequireStore for MemoryRequireStore {
    fn put(&self, record: &RequireRecord) -> Result<(), String> {
        self.records.write().insert(record.handle, record.clone());
        Ok(())
    }

    fn get(&self, handle: &Handle) -> Result<Option<RequireRecord>, String> {
        Ok(self.records.read().get(handle).cloned())
    }
}

/// Durable require store backed by redb.
///
/// One write transaction per record keeps the oracle's publish path
/// simple; records are tiny and publish volume is bounded by branch
/// density, not transaction throughput.
pub struct RedbRequireStore {
    db: Arc<Database>,
}

impl RedbRequireStore {
    /// Opens (or creates) the store at the given path and ensures the
    /// records table exists.
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        let db = Database::create(path)?;

        let write_txn = db.begin_write()?;
        {
            write_txn.open_table(REQUIRE_RECORDS)?;
        }
        write_txn.commit()?;

        Ok(Self { db: Arc::new(db) })
    }

    pub fn put_record(&self, record: &RequireRecord) -> Result<(), StoreError> {
        let encoded = bincode::serialize(record)?;

        let write_txn = self.db.begin_write()?;
        {
            let mut table = write_txn.open_table(REQUIRE_RECORDS)?;
            table.insert(&record.handle.as_bytes()[..], encoded.as_slice())?;
        }
        write_txn.commit()?;

        Ok(())
    }

    pub fn get_record(&self, handle: &Handle) -> Result<Option<RequireRecord>, StoreError> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(REQUIRE_RECORDS)?;

        match table.get(&handle.as_bytes()[..])? {
            Some(guard) => {
                let record = bincode::deserialize(guard.value())?;
                Ok(Some(record))
            }
            None => Ok(None),
        }
    }
}

impl RequireStore for RedbRequireStore {
    fn put(&self, record: &RequireRecord) -> Result<(), String> {
        self.put_record(record).map_err(|e| e.to_string())
    }

    fn get(&self, handle: &Handle) -> Result<Option<RequireRecord>, String> {
        self.get_record(handle).map_err(|e| e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ed25519_dalek::SigningKey;
    use rand::rngs::OsRng;

    fn signed_record(fill: u8, value: bool) -> RequireRecord {
        let signing_key = SigningKey::generate(&mut OsRng);
        RequireRecord::sign(Handle::from_bytes([fill; 32]), value, &signing_key)
    }

    #[test]
    fn test_memory_store_roundtrip() {
        let store = MemoryRequireStore::new();
        let record = signed_record(1, true);

        store.put(&record).unwrap();
        let fetched = store.get(&record.handle).unwrap();

        assert_eq!(fetched, Some(record));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_memory_store_missing_handle() {
        let store = MemoryRequireStore::new();
        let missing = Handle::from_bytes([9; 32]);

        assert_eq!(store.get(&missing).unwrap(), None);
    }

    #[test]
    fn test_memory_store_replaces_existing() {
        let store = MemoryRequireStore::new();
        let signing_key = SigningKey::generate(&mut OsRng);
        let handle = Handle::from_bytes([2; 32]);

        store
            .put(&RequireRecord::sign(handle, true, &signing_key))
            .unwrap();
        store
            .put(&RequireRecord::sign(handle, false, &signing_key))
            .unwrap();

        let fetched = store.get(&handle).unwrap().unwrap();
        assert!(!fetched.value);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_redb_store_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let store = RedbRequireStore::open(&dir.path().join("require.redb")).unwrap();
        let record = signed_record(3, true);

        store.put_record(&record).unwrap();
        let fetched = store.get_record(&record.handle).unwrap();

        assert_eq!(fetched, Some(record));
    }

    #[test]
    fn test_redb_store_missing_handle() {
        let dir = tempfile::tempdir().unwrap();
        let store = RedbRequireStore::open(&dir.path().join("require.redb")).unwrap();

        let missing = Handle::from_bytes([7; 32]);
        assert_eq!(store.get_record(&missing).unwrap(), None);
    }

    #[test]
    fn test_redb_store_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("require.redb");
        let record = signed_record(4, false);

        {
            let store = RedbRequireStore::open(&path).unwrap();
            store.put_record(&record).unwrap();
        }

        let reopened = RedbRequireStore::open(&path).unwrap();
        assert_eq!(reopened.get_record(&record.handle).unwrap(), Some(record));
    }

    #[test]
    fn test_redb_store_through_trait() {
        let dir = tempfile::tempdir().unwrap();
        let store: Arc<dyn RequireStore> =
            Arc::new(RedbRequireStore::open(&dir.path().join("require.redb")).unwrap());
        let record = signed_record(5, true);

        store.put(&record).unwrap();
        assert_eq!(store.get(&record.handle).unwrap(), Some(record));
    }
}
