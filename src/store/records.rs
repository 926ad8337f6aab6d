use std::marker::PhantomData;
use std::vec;

use crate::{Record, StoreError};

/// Lazy sequence of records returned by `RecordStore::find_all`.
///
/// Holds a snapshot of the encoded records taken under the store's read
/// lock; each item is decoded only when the iterator reaches it. Later
/// writes to the store are not reflected. A record that fails to decode is
/// yielded as an error, so the sequence always has `count` items.
pub struct Records<R> {
    entries: vec::IntoIter<(Vec<u8>, u64)>,
    _marker: PhantomData<R>,
}

impl<R: Record> Records<R> {
    pub(crate) fn new(entries: Vec<(Vec<u8>, u64)>) -> Self {
        Self {
            entries: entries.into_iter(),
            _marker: PhantomData,
        }
    }
}

impl<R: Record> Iterator for Records<R> {
    type Item = Result<R, StoreError>;

    fn next(&mut self) -> Option<Self::Item> {
        let (bytes, version) = self.entries.next()?;
        let decoded = serde_json::from_slice::<R>(&bytes).map(|mut record| {
            record.set_version(version);
            record
        });
        Some(decoded.map_err(StoreError::from))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.entries.size_hint()
    }
}

impl<R: Record> ExactSizeIterator for Records<R> {}
