use super::backend::StorageBackend;
use super::LinkStore;
use crate::error::{LinkDeckError, Result};
use crate::model::{LinkFields, LinkRecord, OrderBy, RecordId, UserScope};
use crossbeam_channel::{unbounded, Receiver, Sender};
use std::collections::HashMap;
use tracing::{debug, warn};

struct Subscriber {
    order: OrderBy,
    sender: Sender<Vec<LinkRecord>>,
}

pub struct RecordStore<B: StorageBackend> {
    pub(crate) backend: B,
    subscribers: HashMap<UserScope, Vec<Subscriber>>,
}

impl<B: StorageBackend> RecordStore<B> {
    pub fn with_backend(backend: B) -> Self {
        Self {
            backend,
            subscribers: HashMap::new(),
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Live subscriptions for `user`, counting only receivers still alive at the last notification.
    pub fn subscriber_count(&self, user: &UserScope) -> usize {
        self.subscribers.get(user).map_or(0, Vec::len)
    }

    /// Runs after a write has landed, so a failure here only costs subscribers a snapshot.
    fn notify(&mut self, user: &UserScope) {
        let Some(subscribers) = self.subscribers.get_mut(user) else {
            return;
        };
        let records = match self.backend.load_records(user) {
            Ok(records) => records,
            Err(e) => {
                warn!(user = %user, error = %e, "could not reload records for subscribers");
                return;
            }
        };
        subscribers.retain(|sub| sub.sender.send(sub.order.sort(records.clone())).is_ok());
        debug!(user = %user, live = subscribers.len(), "sent record snapshot");
    }
}

impl<B: StorageBackend> LinkStore for RecordStore<B> {
    fn create_record(&mut self, user: &UserScope, fields: LinkFields) -> Result<RecordId> {
        let mut records = self.backend.load_records(user)?;
        let record = LinkRecord::from_fields(fields);
        let id = record.id;
        records.push(record);
        self.backend.save_records(user, &records)?;
        debug!(user = %user, %id, "created record");
        self.notify(user);
        Ok(id)
    }

    fn update_record(&mut self, user: &UserScope, id: RecordId, fields: LinkFields) -> Result<()> {
        let mut records = self.backend.load_records(user)?;
        let record = records
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or(LinkDeckError::RecordNotFound(id))?;
        record.apply(fields);
        self.backend.save_records(user, &records)?;
        debug!(user = %user, %id, "updated record");
        self.notify(user);
        Ok(())
    }

    fn delete_record(&mut self, user: &UserScope, id: RecordId) -> Result<()> {
        let mut records = self.backend.load_records(user)?;
        let before = records.len();
        records.retain(|r| r.id != id);
        if records.len() == before {
            return Err(LinkDeckError::RecordNotFound(id));
        }
        self.backend.save_records(user, &records)?;
        debug!(user = %user, %id, "deleted record");
        self.notify(user);
        Ok(())
    }

    fn list_records(&self, user: &UserScope, order: OrderBy) -> Result<Vec<LinkRecord>> {
        Ok(order.sort(self.backend.load_records(user)?))
    }

    fn subscribe(&mut self, user: &UserScope, order: OrderBy) -> Result<Receiver<Vec<LinkRecord>>> {
        let (sender, receiver) = unbounded();
        let snapshot = self.list_records(user, order)?;
        // The receiver is alive in this scope, so the first send cannot fail.
        let _ = sender.send(snapshot);
        self.subscribers
            .entry(user.clone())
            .or_default()
            .push(Subscriber { order, sender });
        Ok(receiver)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::memory::MemStore;

    #[test]
    fn test_write_succeeds_when_snapshot_reload_fails() {
        let mut store = MemStore::new();
        let user = UserScope::new("alice").unwrap();
        let snapshots = store.subscribe(&user, OrderBy::CreatedDesc).unwrap();
        assert!(snapshots.recv().unwrap().is_empty());

        // The create's own load passes, the reload for subscribers fails.
        store.backend().fail_read_after(1);
        let id = store
            .create_record(&user, LinkFields::new("One", "", "https://one.test/"))
            .unwrap();

        assert!(snapshots.try_recv().is_err());
        let records = store.list_records(&user, OrderBy::CreatedDesc).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].id, id);
        assert_eq!(store.subscriber_count(&user), 1);

        store
            .update_record(&user, id, LinkFields::new("Uno", "", "https://one.test/"))
            .unwrap();
        assert_eq!(snapshots.recv().unwrap()[0].name, "Uno");
    }
}
