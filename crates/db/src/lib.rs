//! In-memory document collections.
//!
//! A [`MemoryCollection`] owns an ordered set of records keyed by an integer
//! and offers the five primitives the API layer consumes: `find`, `find_one`,
//! `insert_one`, `update_one` and `delete_one`. Records keep insertion order.

use thiserror::Error;
use tokio::sync::RwLock;

/// A record that can live in a [`MemoryCollection`].
pub trait Record: Clone + Send + Sync + 'static {
    /// Unique key of the record within its collection.
    fn key(&self) -> i64;
}

/// Failures reported by collection operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("No matching item found")]
    NoMatchingItem,

    #[error("an item with key {0} already exists")]
    DuplicateKey(i64),

    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Outcome of an insert; `ops` holds the records as stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InsertResult<R> {
    pub ops: Vec<R>,
}

impl<R: Record> InsertResult<R> {
    /// Key of the first inserted record.
    pub fn inserted_key(&self) -> Option<i64> {
        self.ops.first().map(Record::key)
    }
}

/// Outcome of an update or delete.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct WriteResult {
    pub matched_count: u64,
    pub modified_count: u64,
}

/// Ordered, lock-protected record set.
pub struct MemoryCollection<R> {
    name: &'static str,
    records: RwLock<Vec<R>>,
}

impl<R: Record> MemoryCollection<R> {
    /// Create an empty collection
    pub fn new(name: &'static str) -> Self {
        Self::with_records(name, Vec::new())
    }

    /// Create a collection pre-populated with `records`
    pub fn with_records(name: &'static str, records: Vec<R>) -> Self {
        tracing::debug!(
            target: "inout-db",
            collection = name,
            count = records.len(),
            "collection created"
        );
        Self {
            name,
            records: RwLock::new(records),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// All records in insertion order
    pub async fn find(&self) -> StoreResult<Vec<R>> {
        Ok(self.records.read().await.clone())
    }

    /// The record with `key`, if any
    pub async fn find_one(&self, key: i64) -> StoreResult<Option<R>> {
        let records = self.records.read().await;
        Ok(records.iter().find(|record| record.key() == key).cloned())
    }

    /// Append a record; keys are unique
    pub async fn insert_one(&self, record: R) -> StoreResult<InsertResult<R>> {
        let mut records = self.records.write().await;
        let key = record.key();
        if records.iter().any(|existing| existing.key() == key) {
            return Err(StoreError::DuplicateKey(key));
        }

        records.push(record.clone());
        tracing::debug!(target: "inout-db", collection = self.name, key, "record inserted");
        Ok(InsertResult { ops: vec![record] })
    }

    /// Apply `patch` to the record with `key`; the patch reports whether it
    /// changed anything.
    pub async fn update_one<F>(&self, key: i64, patch: F) -> StoreResult<WriteResult>
    where
        F: FnOnce(&mut R) -> bool + Send,
    {
        let mut records = self.records.write().await;
        let record = records
            .iter_mut()
            .find(|record| record.key() == key)
            .ok_or(StoreError::NoMatchingItem)?;

        let modified = patch(record);
        tracing::debug!(target: "inout-db", collection = self.name, key, modified, "record updated");
        Ok(WriteResult {
            matched_count: 1,
            modified_count: u64::from(modified),
        })
    }

    /// Remove the record with `key`
    pub async fn delete_one(&self, key: i64) -> StoreResult<WriteResult> {
        let mut records = self.records.write().await;
        let position = records
            .iter()
            .position(|record| record.key() == key)
            .ok_or(StoreError::NoMatchingItem)?;

        records.remove(position);
        tracing::debug!(target: "inout-db", collection = self.name, key, "record deleted");
        Ok(WriteResult {
            matched_count: 1,
            modified_count: 1,
        })
    }
}
