use super::mem_backend::MemBackend;
use super::record_store::RecordStore;

pub type MemStore = RecordStore<MemBackend>;

impl Default for MemStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemStore {
    pub fn new() -> Self {
        RecordStore::with_backend(MemBackend::new())
    }
}

// --- Test Fixtures ---

#[cfg(any(test, feature = "test_utils"))]
pub mod fixtures {
    use super::*;
    use crate::model::{LinkFields, RecordId, UserScope};
    use crate::store::LinkStore;

    pub struct StoreFixture {
        pub store: MemStore,
        pub user: UserScope,
        pub ids: Vec<RecordId>,
    }

    impl Default for StoreFixture {
        fn default() -> Self {
            Self::new()
        }
    }

    impl StoreFixture {
        pub fn new() -> Self {
            Self {
                store: MemStore::new(),
                user: UserScope::new("alice").unwrap(),
                ids: Vec::new(),
            }
        }

        pub fn with_link(mut self, name: &str, language: &str, url: &str) -> Self {
            let id = self
                .store
                .create_record(&self.user, LinkFields::new(name, language, url))
                .unwrap();
            self.ids.push(id);
            self
        }

        /// Adds `count` links named "Link 1".."Link N", alternating English and Thai.
        pub fn with_links(mut self, count: usize) -> Self {
            for i in 1..=count {
                let language = if i % 2 == 0 { "Thai" } else { "English" };
                let url = format!("https://example.com/{}", i);
                self = self.with_link(&format!("Link {}", i), language, &url);
            }
            self
        }
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::StoreFixture;
    use super::*;
    use crate::error::LinkDeckError;
    use crate::model::{LinkFields, OrderBy, UserScope};
    use crate::store::LinkStore;
    use uuid::Uuid;

    #[test]
    fn test_create_assigns_id_and_timestamp() {
        let mut store = MemStore::new();
        let user = UserScope::new("alice").unwrap();
        let id = store
            .create_record(&user, LinkFields::new("A", "Thai", "https://a.test/"))
            .unwrap();
        let records = store.list_records(&user, OrderBy::default()).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].id, id);
        assert_eq!(records[0].name, "A");
    }

    #[test]
    fn test_scopes_are_isolated() {
        let mut fixture = StoreFixture::new().with_links(2);
        let bob = UserScope::new("bob").unwrap();
        assert!(fixture
            .store
            .list_records(&bob, OrderBy::default())
            .unwrap()
            .is_empty());
        let id = fixture.ids[0];
        assert!(matches!(
            fixture.store.delete_record(&bob, id),
            Err(LinkDeckError::RecordNotFound(_))
        ));
    }

    #[test]
    fn test_update_keeps_created_at() {
        let mut fixture = StoreFixture::new().with_link("Old", "Thai", "https://old.test/");
        let id = fixture.ids[0];
        let before = fixture.store.list_records(&fixture.user, OrderBy::default()).unwrap();
        fixture
            .store
            .update_record(&fixture.user, id, LinkFields::new("New", "English", "https://new.test/"))
            .unwrap();
        let after = fixture.store.list_records(&fixture.user, OrderBy::default()).unwrap();
        assert_eq!(after[0].name, "New");
        assert_eq!(after[0].url, "https://new.test/");
        assert_eq!(after[0].created_at, before[0].created_at);
    }

    #[test]
    fn test_unknown_ids_are_not_found() {
        let mut fixture = StoreFixture::new();
        let id = Uuid::new_v4();
        assert!(matches!(
            fixture.store.update_record(&fixture.user, id, LinkFields::new("", "", "")),
            Err(LinkDeckError::RecordNotFound(missing)) if missing == id
        ));
        assert!(matches!(
            fixture.store.delete_record(&fixture.user, id),
            Err(LinkDeckError::RecordNotFound(_))
        ));
    }

    #[test]
    fn test_subscribe_sends_current_then_every_change() {
        let mut fixture = StoreFixture::new().with_links(1);
        let rx = fixture
            .store
            .subscribe(&fixture.user, OrderBy::CreatedAsc)
            .unwrap();
        assert_eq!(rx.try_recv().unwrap().len(), 1);

        fixture = fixture.with_links(1);
        assert_eq!(rx.try_recv().unwrap().len(), 2);

        let id = fixture.ids[0];
        fixture.store.delete_record(&fixture.user, id).unwrap();
        let snapshot = rx.try_recv().unwrap();
        assert_eq!(snapshot.len(), 1);
        assert_ne!(snapshot[0].id, id);
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_dropped_receivers_are_pruned() {
        let mut fixture = StoreFixture::new();
        let rx = fixture.store.subscribe(&fixture.user, OrderBy::default()).unwrap();
        let _kept = fixture.store.subscribe(&fixture.user, OrderBy::default()).unwrap();
        drop(rx);
        fixture = fixture.with_links(1);
        assert_eq!(fixture.store.subscriber_count(&fixture.user), 1);
    }

    #[test]
    fn test_failed_write_changes_nothing() {
        let mut fixture = StoreFixture::new().with_links(1);
        let rx = fixture.store.subscribe(&fixture.user, OrderBy::default()).unwrap();
        rx.try_recv().unwrap();

        fixture.store.backend().set_simulate_write_error(true);
        let result = fixture
            .store
            .create_record(&fixture.user, LinkFields::new("B", "", "https://b.test/"));
        assert!(matches!(result, Err(LinkDeckError::Store(_))));
        assert!(rx.try_recv().is_err());

        fixture.store.backend().set_simulate_write_error(false);
        let records = fixture.store.list_records(&fixture.user, OrderBy::default()).unwrap();
        assert_eq!(records.len(), 1);
    }

    #[test]
    fn test_fail_writes_after_counts_successes() {
        let mut fixture = StoreFixture::new();
        fixture.store.backend().fail_writes_after(2);
        let user = fixture.user.clone();
        for name in ["a", "b"] {
            fixture
                .store
                .create_record(&user, LinkFields::new(name, "", "https://x.test/"))
                .unwrap();
        }
        assert!(fixture
            .store
            .create_record(&user, LinkFields::new("c", "", "https://x.test/"))
            .is_err());
    }
}
