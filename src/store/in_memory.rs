//! InMemoryRecordStore - HashMap-backed record store.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use tracing::{debug, trace};

use super::{RecordStore, Records};
use crate::record::{assigned_id, IdGenerator, UuidIdGenerator};
use crate::{Record, StoreError};

/// How many times `save` asks the id generator for an unused id.
const MAX_ID_ATTEMPTS: u32 = 8;

/// Internal stored representation of a record.
struct StoredRecord {
    bytes: Vec<u8>,
    version: u64,
}

/// Records of one collection, keyed by id.
type Collection = HashMap<String, StoredRecord>;

type Storage = HashMap<&'static str, Collection>;

/// In-memory record store backed by a HashMap.
///
/// One inner map per collection, keyed by `Record::COLLECTION`, so no
/// collection name can reach into another. Clone-friendly via Arc; clones
/// share the same map.
///
/// Writers hold the write lock across the whole check-and-commit sequence
/// of `save`, so the uniqueness scan, the version check and the insert are
/// one atomic step. Readers share the read lock.
#[derive(Clone)]
pub struct InMemoryRecordStore {
    storage: Arc<RwLock<Storage>>,
    ids: Arc<dyn IdGenerator>,
}

impl Default for InMemoryRecordStore {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryRecordStore {
    /// Create a new empty store that assigns UUID ids.
    pub fn new() -> Self {
        Self::with_id_generator(UuidIdGenerator)
    }

    /// Create a new empty store that assigns ids from `ids`.
    pub fn with_id_generator(ids: impl IdGenerator + 'static) -> Self {
        Self {
            storage: Arc::new(RwLock::new(HashMap::new())),
            ids: Arc::new(ids),
        }
    }

    fn decode<R: Record>(stored: &StoredRecord) -> Result<R, StoreError> {
        let mut record: R = serde_json::from_slice(&stored.bytes)?;
        record.set_version(stored.version);
        Ok(record)
    }

    /// Fails if any record other than `own_id` shares a unique field value
    /// with `candidate`.
    fn ensure_unique<R: Record>(
        records: &Collection,
        candidate: &R,
        own_id: Option<&str>,
    ) -> Result<(), StoreError> {
        let fields = candidate.unique_fields();
        if fields.is_empty() {
            return Ok(());
        }

        for (id, stored) in records {
            if own_id == Some(id.as_str()) {
                continue;
            }

            let other: R = Self::decode(stored)?;
            let taken = other.unique_fields();
            if let Some(clash) = fields.iter().find(|field| taken.contains(field)) {
                return Err(StoreError::DuplicateKey {
                    collection: R::COLLECTION,
                    field: clash.name,
                    value: clash.value.to_string(),
                });
            }
        }

        Ok(())
    }

    fn fresh_id<R: Record>(&self, records: &Collection) -> Result<String, StoreError> {
        for _ in 0..MAX_ID_ATTEMPTS {
            let id = self.ids.next_id();
            if !id.is_empty() && !records.contains_key(&id) {
                return Ok(id);
            }
        }

        Err(StoreError::IdExhausted {
            collection: R::COLLECTION,
            attempts: MAX_ID_ATTEMPTS,
        })
    }

    fn create<R: Record>(&self, records: &mut Collection, mut candidate: R) -> Result<R, StoreError> {
        Self::ensure_unique(records, &candidate, None)?;

        let id = self.fresh_id::<R>(records)?;
        candidate.set_id(id.clone());
        candidate.set_version(0);
        let bytes = serde_json::to_vec(&candidate)?;

        records.insert(id.clone(), StoredRecord { bytes, version: 0 });

        debug!(collection = R::COLLECTION, id = %id, "record created");
        Ok(candidate)
    }

    fn update<R: Record>(
        records: &mut Collection,
        id: String,
        current_version: u64,
        mut candidate: R,
    ) -> Result<R, StoreError> {
        if candidate.version() != current_version {
            return Err(StoreError::OptimisticLock {
                collection: R::COLLECTION,
                id,
                expected: candidate.version(),
                actual: current_version,
            });
        }

        Self::ensure_unique(records, &candidate, Some(&id))?;

        let version = current_version + 1;
        candidate.set_version(version);
        let bytes = serde_json::to_vec(&candidate)?;

        records.insert(id.clone(), StoredRecord { bytes, version });

        debug!(collection = R::COLLECTION, id = %id, version, "record updated");
        Ok(candidate)
    }
}

impl RecordStore for InMemoryRecordStore {
    fn find_by_id<R: Record>(&self, id: &str) -> Result<Option<R>, StoreError> {
        let storage = self
            .storage
            .read()
            .map_err(|_| StoreError::LockPoisoned("read"))?;

        trace!(collection = R::COLLECTION, id, "find by id");
        storage
            .get(R::COLLECTION)
            .and_then(|records| records.get(id))
            .map(Self::decode::<R>)
            .transpose()
    }

    fn find_one<R: Record>(
        &self,
        predicate: &dyn Fn(&R) -> bool,
    ) -> Result<Option<R>, StoreError> {
        let storage = self
            .storage
            .read()
            .map_err(|_| StoreError::LockPoisoned("read"))?;

        let mut found = None;
        let mut matches = 0;
        for stored in storage.get(R::COLLECTION).into_iter().flat_map(|records| records.values()) {
            let record: R = Self::decode(stored)?;
            if predicate(&record) {
                matches += 1;
                found.get_or_insert(record);
            }
        }

        trace!(collection = R::COLLECTION, matches, "find one");
        if matches > 1 {
            return Err(StoreError::NonUnique {
                collection: R::COLLECTION,
                matches,
            });
        }
        Ok(found)
    }

    fn find_all<R: Record>(&self) -> Result<Records<R>, StoreError> {
        let storage = self
            .storage
            .read()
            .map_err(|_| StoreError::LockPoisoned("read"))?;

        let snapshot = storage
            .get(R::COLLECTION)
            .into_iter()
            .flat_map(|records| records.values())
            .map(|stored| (stored.bytes.clone(), stored.version))
            .collect();
        Ok(Records::new(snapshot))
    }

    fn exists_by_id<R: Record>(&self, id: &str) -> Result<bool, StoreError> {
        let storage = self
            .storage
            .read()
            .map_err(|_| StoreError::LockPoisoned("read"))?;

        Ok(storage
            .get(R::COLLECTION)
            .is_some_and(|records| records.contains_key(id)))
    }

    fn save<R: Record>(&self, candidate: R) -> Result<R, StoreError> {
        candidate
            .validate()
            .map_err(|source| StoreError::Validation {
                collection: R::COLLECTION,
                source,
            })?;

        let mut storage = self
            .storage
            .write()
            .map_err(|_| StoreError::LockPoisoned("save"))?;
        let records = storage.entry(R::COLLECTION).or_default();

        let existing = assigned_id(&candidate)
            .and_then(|id| Some((id.to_string(), records.get(id)?.version)));

        match existing {
            Some((id, version)) => Self::update(records, id, version, candidate),
            None => {
                if let Some(id) = assigned_id(&candidate) {
                    debug!(collection = R::COLLECTION, id, "unknown id, saving as new record");
                }
                self.create(records, candidate)
            }
        }
    }

    fn delete_by_id<R: Record>(&self, id: &str) -> Result<(), StoreError> {
        let mut storage = self
            .storage
            .write()
            .map_err(|_| StoreError::LockPoisoned("delete"))?;

        let removed = storage
            .get_mut(R::COLLECTION)
            .and_then(|records| records.remove(id));
        if removed.is_some() {
            debug!(collection = R::COLLECTION, id, "record deleted");
        }
        Ok(())
    }

    fn delete_all<R: Record>(&self) -> Result<(), StoreError> {
        let mut storage = self
            .storage
            .write()
            .map_err(|_| StoreError::LockPoisoned("delete all"))?;

        let removed = storage.remove(R::COLLECTION).map_or(0, |records| records.len());
        debug!(collection = R::COLLECTION, removed, "collection cleared");
        Ok(())
    }

    fn count<R: Record>(&self) -> Result<u64, StoreError> {
        let storage = self
            .storage
            .read()
            .map_err(|_| StoreError::LockPoisoned("read"))?;

        let count = storage.get(R::COLLECTION).map_or(0, |records| records.len());
        Ok(count as u64)
    }
}
