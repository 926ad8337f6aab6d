//! Record stores - keyed storage with unique fields and optimistic locking.
//!
//! A store owns the authoritative mapping from id to record. Saving a record
//! decides between create and update, checks the record's unique fields
//! against the rest of its collection, validates the version token and
//! commits, all as one atomic step.
//!
//! ## Example
//!
//! ```ignore
//! use record_store::{InMemoryRecordStore, RecordsExt, User};
//!
//! let store = InMemoryRecordStore::new();
//! let users = store.records::<User>();
//!
//! let mut alice = users.save(User::new("alice", "alice@example.com", "Alice"))?;
//! alice.name = "Alice Liddell".into();
//! let alice = users.save(alice)?; // version 0 -> 1
//! ```

mod in_memory;
mod record_store;
mod records;
mod repository;

pub use in_memory::InMemoryRecordStore;
pub use record_store::RecordStore;
pub use records::Records;
pub use repository::{RecordRepository, RecordsExt};
