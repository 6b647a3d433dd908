use crate::error::Result;
use crate::model::{LinkRecord, UserScope};

/// Raw persistence for one user's record list.
///
/// Backends know how to load and save the whole list; `RecordStore` owns
/// everything else (ids, timestamps, lookups, change notification).
pub trait StorageBackend {
    /// Records in insertion order. A user with nothing saved yet has an empty list.
    fn load_records(&self, user: &UserScope) -> Result<Vec<LinkRecord>>;

    /// Replaces the stored list. MUST be atomic: readers see the old list or the new one.
    fn save_records(&self, user: &UserScope, records: &[LinkRecord]) -> Result<()>;
}
