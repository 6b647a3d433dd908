use super::backend::StorageBackend;
use crate::error::{LinkDeckError, Result};
use crate::model::{LinkRecord, UserScope};
use std::cell::{Cell, RefCell};
use std::collections::HashMap;

/// In-memory storage backend for testing.
///
/// Uses `RefCell` for interior mutability since linkdeck is single-threaded.
#[derive(Default)]
pub struct MemBackend {
    records: RefCell<HashMap<UserScope, Vec<LinkRecord>>>,
    simulate_write_error: Cell<bool>,
    writes_before_error: Cell<Option<usize>>,
    reads_before_error: Cell<Option<usize>>,
}

impl MemBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable write error simulation for testing error handling.
    pub fn set_simulate_write_error(&self, simulate: bool) {
        self.simulate_write_error.set(simulate);
    }

    /// Let `count` more writes succeed, then fail every write after them.
    pub fn fail_writes_after(&self, count: usize) {
        self.writes_before_error.set(Some(count));
    }

    /// Let `count` more reads succeed, then fail the one after them only.
    pub fn fail_read_after(&self, count: usize) {
        self.reads_before_error.set(Some(count));
    }

    fn check_read(&self) -> Result<()> {
        match self.reads_before_error.get() {
            Some(0) => {
                self.reads_before_error.set(None);
                Err(LinkDeckError::Store("Simulated read error".to_string()))
            }
            Some(n) => {
                self.reads_before_error.set(Some(n - 1));
                Ok(())
            }
            None => Ok(()),
        }
    }

    fn check_write(&self) -> Result<()> {
        if self.simulate_write_error.get() {
            return Err(LinkDeckError::Store("Simulated write error".to_string()));
        }
        match self.writes_before_error.get() {
            Some(0) => Err(LinkDeckError::Store("Simulated write error".to_string())),
            Some(n) => {
                self.writes_before_error.set(Some(n - 1));
                Ok(())
            }
            None => Ok(()),
        }
    }
}

impl StorageBackend for MemBackend {
    fn load_records(&self, user: &UserScope) -> Result<Vec<LinkRecord>> {
        self.check_read()?;
        Ok(self
            .records
            .borrow()
            .get(user)
            .cloned()
            .unwrap_or_default())
    }

    fn save_records(&self, user: &UserScope, records: &[LinkRecord]) -> Result<()> {
        self.check_write()?;
        self.records
            .borrow_mut()
            .insert(user.clone(), records.to_vec());
        Ok(())
    }
}
