mod error;
mod record;
mod store;
mod user;

#[cfg(feature = "http")]
pub mod http;

pub use error::StoreError;
pub use record::{
    IdGenerator, Record, SequentialIdGenerator, UniqueField, UuidIdGenerator, ValidationError,
};
pub use store::{InMemoryRecordStore, RecordRepository, RecordStore, Records, RecordsExt};
pub use user::{User, UserRepository};
