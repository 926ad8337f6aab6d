//! RecordStore - the operation contract every backend implements.

use super::Records;
use crate::{Record, StoreError};

/// CRUD storage for records with unique fields and optimistic concurrency.
///
/// Each operation is atomic from the caller's point of view. Records go in
/// and come out by value; callers never hold a reference into the store.
pub trait RecordStore: Send + Sync {
    /// Get a record by id. Returns `None` if not found.
    fn find_by_id<R: Record>(&self, id: &str) -> Result<Option<R>, StoreError>;

    /// Find the single record matching a predicate.
    ///
    /// Fails with `NonUnique` when more than one record matches.
    fn find_one<R: Record>(&self, predicate: &dyn Fn(&R) -> bool)
        -> Result<Option<R>, StoreError>;

    /// All records of the collection, in no particular order. Each item
    /// is decoded lazily and fails on its own if decoding fails.
    fn find_all<R: Record>(&self) -> Result<Records<R>, StoreError>;

    fn exists_by_id<R: Record>(&self, id: &str) -> Result<bool, StoreError>;

    /// Create or update a record.
    ///
    /// A candidate without an id (or whose id the store does not know) is
    /// created with a fresh id and version 0. A candidate whose id is known
    /// must carry the stored version; it is then written with the version
    /// incremented by one. Unique fields are checked against every other
    /// record of the collection before anything is written.
    fn save<R: Record>(&self, candidate: R) -> Result<R, StoreError>;

    /// Delete a record by id. Deleting an absent id is a no-op.
    fn delete_by_id<R: Record>(&self, id: &str) -> Result<(), StoreError>;

    /// Delete every record of the collection.
    fn delete_all<R: Record>(&self) -> Result<(), StoreError>;

    /// Number of records in the collection.
    fn count<R: Record>(&self) -> Result<u64, StoreError>;
}
