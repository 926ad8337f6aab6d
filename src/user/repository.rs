use crate::store::{InMemoryRecordStore, RecordRepository, RecordStore, Records, RecordsExt};
use crate::StoreError;

use super::User;

/// User-facing operations over a record store.
///
/// Owns its store; clone the store before handing it over if other
/// collections need the same backing map.
pub struct UserRepository<S = InMemoryRecordStore> {
    store: S,
}

impl UserRepository<InMemoryRecordStore> {
    /// A repository over a fresh in-memory store with UUID ids.
    pub fn in_memory() -> Self {
        UserRepository::new(InMemoryRecordStore::new())
    }
}

impl<S: RecordStore> UserRepository<S> {
    pub fn new(store: S) -> Self {
        UserRepository { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    fn users(&self) -> RecordRepository<'_, S, User> {
        self.store.records::<User>()
    }

    /// Create a user (no id) or update one (id + current version).
    ///
    /// Fails with `Validation` when username or email is empty,
    /// `DuplicateKey` when another user already has the username or email,
    /// and `OptimisticLock` when `user.version` is stale.
    pub fn save(&self, user: User) -> Result<User, StoreError> {
        self.users().save(user)
    }

    pub fn find_by_id(&self, id: &str) -> Result<Option<User>, StoreError> {
        self.users().find_by_id(id)
    }

    /// Like `find_by_id`, but absence is a `NotFound` error.
    pub fn get_by_id(&self, id: &str) -> Result<User, StoreError> {
        self.users().get(id)
    }

    pub fn find_by_username(&self, username: &str) -> Result<Option<User>, StoreError> {
        self.users().find_by_unique("username", username)
    }

    pub fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        self.users().find_by_unique("email", email)
    }

    pub fn exists_by_id(&self, id: &str) -> Result<bool, StoreError> {
        self.users().exists_by_id(id)
    }

    pub fn exists_by_username(&self, username: &str) -> Result<bool, StoreError> {
        self.users().exists_by_unique("username", username)
    }

    pub fn exists_by_email(&self, email: &str) -> Result<bool, StoreError> {
        self.users().exists_by_unique("email", email)
    }

    pub fn find_all(&self) -> Result<Records<User>, StoreError> {
        self.users().find_all()
    }

    pub fn count(&self) -> Result<u64, StoreError> {
        self.users().count()
    }

    pub fn delete_by_id(&self, id: &str) -> Result<(), StoreError> {
        self.users().delete_by_id(id)
    }

    pub fn delete(&self, user: &User) -> Result<(), StoreError> {
        self.users().delete(user)
    }

    pub fn delete_all(&self) -> Result<(), StoreError> {
        self.users().delete_all()
    }
}

impl Default for UserRepository<InMemoryRecordStore> {
    fn default() -> Self {
        Self::in_memory()
    }
}
