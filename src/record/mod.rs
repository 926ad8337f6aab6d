//! Records - the unit of storage.
//!
//! A record type declares where it lives (its collection), how its id and
//! version token are read and written, which of its fields must be unique
//! within the collection, and what makes a candidate valid.
//!
//! ## Example
//!
//! ```ignore
//! use record_store::{Record, UniqueField, ValidationError};
//!
//! #[derive(Serialize, Deserialize, Clone)]
//! struct Team {
//!     id: Option<String>,
//!     version: u64,
//!     slug: String,
//! }
//!
//! impl Record for Team {
//!     const COLLECTION: &'static str = "teams";
//!     fn id(&self) -> Option<&str> { self.id.as_deref() }
//!     fn set_id(&mut self, id: String) { self.id = Some(id); }
//!     fn version(&self) -> u64 { self.version }
//!     fn set_version(&mut self, version: u64) { self.version = version; }
//!     fn unique_fields(&self) -> Vec<UniqueField<'_>> {
//!         vec![UniqueField::new("slug", &self.slug)]
//!     }
//! }
//! ```

mod id;

use serde::{de::DeserializeOwned, Serialize};
use thiserror::Error;

pub use id::{IdGenerator, SequentialIdGenerator, UuidIdGenerator};

/// Trait for types that can be stored in a record store.
pub trait Record: Serialize + DeserializeOwned + Clone + Send + Sync {
    /// The collection name for this record type (e.g., "users").
    /// Each collection has its own map in the store.
    const COLLECTION: &'static str;

    /// The assigned identifier, or `None` for a record not yet created.
    fn id(&self) -> Option<&str>;

    fn set_id(&mut self, id: String);

    /// The optimistic-lock token as last read by the caller.
    fn version(&self) -> u64;

    fn set_version(&mut self, version: u64);

    /// Fields whose values must not repeat across records of the collection.
    fn unique_fields(&self) -> Vec<UniqueField<'_>> {
        Vec::new()
    }

    /// Checks the candidate before it reaches the store.
    fn validate(&self) -> Result<(), ValidationError> {
        Ok(())
    }
}

/// A named field value that must be unique within its collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UniqueField<'a> {
    pub name: &'static str,
    pub value: &'a str,
}

impl<'a> UniqueField<'a> {
    pub fn new(name: &'static str, value: &'a str) -> Self {
        Self { name, value }
    }
}

/// Outcome of a failed `Record::validate`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{reason}")]
pub struct ValidationError {
    /// Fields that failed validation.
    pub fields: Vec<&'static str>,
    pub reason: String,
}

impl ValidationError {
    pub fn new(fields: Vec<&'static str>, reason: impl Into<String>) -> Self {
        Self {
            fields,
            reason: reason.into(),
        }
    }

    /// Validation failure for fields that must be non-empty.
    pub fn required(fields: Vec<&'static str>) -> Self {
        let reason = match fields.as_slice() {
            [field] => format!("{} is required", field),
            _ => format!("{} are required", fields.join(" and ")),
        };
        Self { fields, reason }
    }
}

/// The record's id, treating an empty string as unassigned.
pub(crate) fn assigned_id<R: Record>(record: &R) -> Option<&str> {
    record.id().filter(|id| !id.is_empty())
}
