use linkdeckapp::api::{LinkDeckApi, LinkFilter, LinkUpdate};
use linkdeckapp::events::EventBus;
use linkdeckapp::i18n::Lang;
use linkdeckapp::model::{OrderBy, UserScope};
use linkdeckapp::store::fs::FileStore;
use linkdeckapp::store::LinkStore;
use tempfile::TempDir;

fn open(dir: &TempDir, user: &str) -> LinkDeckApi<FileStore> {
    LinkDeckApi::new(
        Some(FileStore::new(dir.path().to_path_buf())),
        UserScope::new(user).unwrap(),
        Lang::En,
        EventBus::new(),
    )
    .unwrap()
}

fn names(api: &LinkDeckApi<FileStore>) -> Vec<String> {
    api.list_links(OrderBy::CreatedAsc, &LinkFilter::default())
        .unwrap()
        .listed_links
        .into_iter()
        .map(|l| l.record.name)
        .collect()
}

#[test]
fn test_links_survive_reopening() {
    let dir = TempDir::new().unwrap();
    {
        let mut api = open(&dir, "alice");
        api.add_link("One", "Thai", "one.test").unwrap();
        api.add_link("Two", "English", "two.test").unwrap();
        api.edit_links(
            &["2"],
            &LinkUpdate {
                language: Some("ไทย".to_string()),
                ..Default::default()
            },
        )
        .unwrap();
    }

    let api = open(&dir, "alice");
    assert_eq!(names(&api), vec!["One", "Two"]);
    let listed = api
        .list_links(OrderBy::CreatedAsc, &LinkFilter::default())
        .unwrap()
        .listed_links;
    assert_eq!(listed[0].record.language, "ไทย");
    assert_eq!(listed[0].record.url, "https://one.test/");
}

#[test]
fn test_users_do_not_see_each_other() {
    let dir = TempDir::new().unwrap();
    open(&dir, "alice").add_link("Mine", "", "a.test").unwrap();
    open(&dir, "bob").add_link("His", "", "b.test").unwrap();

    assert_eq!(names(&open(&dir, "alice")), vec!["Mine"]);
    assert_eq!(names(&open(&dir, "bob")), vec!["His"]);
}

#[test]
fn test_subscription_sees_writes_from_the_same_store() {
    let dir = TempDir::new().unwrap();
    let user = UserScope::new("alice").unwrap();
    let mut store = FileStore::new(dir.path().to_path_buf());
    let snapshots = store.subscribe(&user, OrderBy::Name).unwrap();
    assert!(snapshots.recv().unwrap().is_empty());

    store
        .create_record(
            &user,
            linkdeckapp::model::LinkFields::new("b", "", "https://b.test/"),
        )
        .unwrap();
    store
        .create_record(
            &user,
            linkdeckapp::model::LinkFields::new("a", "", "https://a.test/"),
        )
        .unwrap();

    let latest = snapshots.try_iter().last().unwrap();
    let names: Vec<&str> = latest.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names, vec!["a", "b"]);
}
