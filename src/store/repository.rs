//! RecordRepository - Typed accessor for record CRUD operations.

use std::marker::PhantomData;

use super::{RecordStore, Records};
use crate::record::{assigned_id, UniqueField};
use crate::{Record, StoreError};

/// Typed repository wrapper for accessing records of a specific type.
pub struct RecordRepository<'a, S, R> {
    store: &'a S,
    _marker: PhantomData<R>,
}

impl<'a, S: RecordStore, R: Record> RecordRepository<'a, S, R> {
    pub fn new(store: &'a S) -> Self {
        Self {
            store,
            _marker: PhantomData,
        }
    }

    /// Get a record by id.
    pub fn find_by_id(&self, id: &str) -> Result<Option<R>, StoreError> {
        self.store.find_by_id(id)
    }

    /// Get a record by id, failing with `NotFound` when absent.
    pub fn get(&self, id: &str) -> Result<R, StoreError> {
        self.store
            .find_by_id::<R>(id)?
            .ok_or_else(|| StoreError::NotFound {
                collection: R::COLLECTION,
                id: id.to_string(),
            })
    }

    /// Find the record whose unique field `field` equals `value`.
    pub fn find_by_unique(&self, field: &str, value: &str) -> Result<Option<R>, StoreError> {
        self.store.find_one::<R>(&|record: &R| {
            record
                .unique_fields()
                .iter()
                .any(|UniqueField { name, value: v }| *name == field && *v == value)
        })
    }

    pub fn exists_by_id(&self, id: &str) -> Result<bool, StoreError> {
        self.store.exists_by_id::<R>(id)
    }

    pub fn exists_by_unique(&self, field: &str, value: &str) -> Result<bool, StoreError> {
        Ok(self.find_by_unique(field, value)?.is_some())
    }

    /// Find the single record matching a predicate.
    pub fn find_one(&self, predicate: &dyn Fn(&R) -> bool) -> Result<Option<R>, StoreError> {
        self.store.find_one::<R>(predicate)
    }

    pub fn find_all(&self) -> Result<Records<R>, StoreError> {
        self.store.find_all()
    }

    /// Create or update a record.
    pub fn save(&self, record: R) -> Result<R, StoreError> {
        self.store.save(record)
    }

    /// Delete a record by id. Succeeds whether or not it existed.
    pub fn delete_by_id(&self, id: &str) -> Result<(), StoreError> {
        self.store.delete_by_id::<R>(id)
    }

    /// Delete the stored counterpart of `record`. A record without an id
    /// was never stored, so there is nothing to delete.
    pub fn delete(&self, record: &R) -> Result<(), StoreError> {
        match assigned_id(record) {
            Some(id) => self.store.delete_by_id::<R>(id),
            None => Ok(()),
        }
    }

    pub fn delete_all(&self) -> Result<(), StoreError> {
        self.store.delete_all::<R>()
    }

    pub fn count(&self) -> Result<u64, StoreError> {
        self.store.count::<R>()
    }
}

/// Extension trait for typed record access on any RecordStore.
pub trait RecordsExt: RecordStore + Sized {
    /// Get a typed record repository.
    fn records<R: Record>(&self) -> RecordRepository<'_, Self, R> {
        RecordRepository::new(self)
    }
}

impl<S: RecordStore> RecordsExt for S {}
