//! # Storage Layer
//!
//! The [`LinkStore`] trait is the record collection the rest of linkdeck talks
//! to: create, update, delete, list, and a live subscription per user.
//!
//! ## Scoping
//!
//! Every call names a [`UserScope`]. A store never returns records from a scope
//! other than the one asked for.
//!
//! ## Subscriptions
//!
//! [`LinkStore::subscribe`] hands back a `crossbeam_channel::Receiver` of full
//! snapshots. The current list is sent right away, then one fresh snapshot
//! after every successful mutation in that scope, in the subscription's order.
//! Snapshots are never merged or diffed; a consumer that falls behind simply
//! drains to the newest one. Dropping the receiver unsubscribes: dead senders
//! are pruned on the next notification.
//!
//! ## Layout
//!
//! [`RecordStore`] holds the logic (ids, timestamps, lookups, notification) on
//! top of a [`StorageBackend`] that only loads and saves a whole list:
//!
//! - [`memory::MemStore`]: `RecordStore<MemBackend>`, for tests.
//! - [`fs::FileStore`]: `RecordStore<FsBackend>`, one JSON file per user:
//!
//! ```text
//! <data_dir>/
//! ├── linkdeck.toml
//! └── users/
//!     └── <user>/
//!         └── links.json
//! ```

use crossbeam_channel::Receiver;

use crate::error::Result;
use crate::model::{LinkFields, LinkRecord, OrderBy, RecordId, UserScope};

pub mod backend;
pub mod fs;
pub mod fs_backend;
pub mod mem_backend;
pub mod memory;
pub mod record_store;

pub use backend::StorageBackend;
pub use record_store::RecordStore;

pub trait LinkStore {
    /// Saves a new record and returns the id the store assigned to it.
    fn create_record(&mut self, user: &UserScope, fields: LinkFields) -> Result<RecordId>;

    /// Replaces name, language and url. `created_at` never changes.
    fn update_record(&mut self, user: &UserScope, id: RecordId, fields: LinkFields) -> Result<()>;

    fn delete_record(&mut self, user: &UserScope, id: RecordId) -> Result<()>;

    fn list_records(&self, user: &UserScope, order: OrderBy) -> Result<Vec<LinkRecord>>;

    fn subscribe(&mut self, user: &UserScope, order: OrderBy) -> Result<Receiver<Vec<LinkRecord>>>;
}
