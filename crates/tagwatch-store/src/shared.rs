//! Connection shared between the poller task and request handlers

use crate::{SqliteStore, StoreError};
use std::sync::{Arc, Mutex, MutexGuard};
use tagwatch_domain::{EntryStore, Record, StoredEntry};

/// Cloneable handle to one [`SqliteStore`]
///
/// Each call locks for exactly one store operation, so a read never sees a
/// half-written entry and no lock is held across an `.await`.
#[derive(Clone)]
pub struct SharedStore {
    inner: Arc<Mutex<SqliteStore>>,
}

impl SharedStore {
    /// Wrap a store for sharing
    pub fn new(store: SqliteStore) -> Self {
        Self {
            inner: Arc::new(Mutex::new(store)),
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, SqliteStore>, StoreError> {
        self.inner.lock().map_err(|_| StoreError::Poisoned)
    }
}

impl EntryStore for SharedStore {
    type Error = StoreError;

    fn exists_by_tag(&self, tag_id: &str) -> Result<bool, Self::Error> {
        self.lock()?.exists_by_tag(tag_id)
    }

    fn append(&mut self, record: &Record) -> Result<StoredEntry, Self::Error> {
        self.lock()?.append(record)
    }

    fn list_all(&self) -> Result<Vec<StoredEntry>, Self::Error> {
        self.lock()?.list_all()
    }

    fn count(&self) -> Result<usize, Self::Error> {
        self.lock()?.count()
    }
}
