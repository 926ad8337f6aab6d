use thiserror::Error;

use crate::record::ValidationError;

/// Error type for record store operations.
///
/// Every failure leaves the store exactly as it was before the call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// The candidate record failed its own validation rule.
    #[error("cannot save {collection} record: {source}")]
    Validation {
        collection: &'static str,
        #[source]
        source: ValidationError,
    },
    /// A unique field collides with another record in the collection.
    #[error("duplicate key in {collection}: {field} '{value}' already exists")]
    DuplicateKey {
        collection: &'static str,
        field: &'static str,
        value: String,
    },
    /// The candidate carried a stale version token.
    #[error(
        "record {collection}:{id} has already been updated by another writer \
         (expected version {expected}, actual {actual})"
    )]
    OptimisticLock {
        collection: &'static str,
        id: String,
        expected: u64,
        actual: u64,
    },
    /// Record not found.
    #[error("record not found: {collection}:{id}")]
    NotFound { collection: &'static str, id: String },
    /// A single-match lookup matched more than one record.
    #[error("expected at most one {collection} record, found {matches}")]
    NonUnique {
        collection: &'static str,
        matches: usize,
    },
    /// Serialization/deserialization error.
    #[error("record serialization error: {0}")]
    Serde(String),
    /// The backing map lock was poisoned by a panicking writer.
    #[error("record store lock poisoned during {0}")]
    LockPoisoned(&'static str),
    /// The id generator kept returning ids that are already taken.
    #[error("no fresh id for {collection} after {attempts} attempts")]
    IdExhausted {
        collection: &'static str,
        attempts: u32,
    },
}

impl StoreError {
    /// Stable, machine-readable tag for the error variant.
    pub fn kind(&self) -> &'static str {
        match self {
            StoreError::Validation { .. } => "validation",
            StoreError::DuplicateKey { .. } => "duplicate_key",
            StoreError::OptimisticLock { .. } => "optimistic_lock",
            StoreError::NotFound { .. } => "not_found",
            StoreError::NonUnique { .. } => "non_unique",
            StoreError::Serde(_) | StoreError::LockPoisoned(_) | StoreError::IdExhausted { .. } => {
                "storage"
            }
        }
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(err: serde_json::Error) -> Self {
        StoreError::Serde(err.to_string())
    }
}
