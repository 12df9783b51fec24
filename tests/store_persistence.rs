use start_page::store::{self, JsonDirStore, StoreRead, TASKS_KEY};
use start_page::widgets::{LinkItem, LinkList, TaskItem, TaskList};
use start_page::{KeyValueStore, LoadOrigin, StoreHandle, WidgetState};
use std::sync::Arc;
use tempfile::tempdir;

#[test]
fn json_dir_store_round_trips_values() {
    let dir = tempdir().unwrap();
    let store = JsonDirStore::new(dir.path());
    let tasks = vec![TaskItem::new("write report"), TaskItem::new("call bob")];

    store::set(&store, TASKS_KEY, &tasks).unwrap();
    assert!(dir.path().join("tasks.json").exists());

    let loaded: StoreRead<Vec<TaskItem>> = store::get(&store, TASKS_KEY);
    assert_eq!(loaded, StoreRead::Present(tasks));
}

#[test]
fn missing_file_reads_as_absent() {
    let dir = tempdir().unwrap();
    let store = JsonDirStore::new(dir.path().join("not-created-yet"));
    let loaded: StoreRead<Vec<TaskItem>> = store::get(&store, TASKS_KEY);
    assert_eq!(loaded, StoreRead::Absent);
}

#[test]
fn corrupt_file_falls_back_to_default() {
    let dir = tempdir().unwrap();
    std::fs::write(dir.path().join("tasks.json"), "{ not json").unwrap();
    let store: StoreHandle = Arc::new(JsonDirStore::new(dir.path()));

    let state = WidgetState::<Vec<TaskItem>>::load(store.clone(), TASKS_KEY, Vec::new);
    assert_eq!(state.origin(), LoadOrigin::Corrupt);
    assert!(state.get().is_empty());

    // the next write replaces the damaged file
    let mut tasks = TaskList::load_tasks(store.clone());
    tasks.add(TaskItem::new("recovered")).unwrap();
    let reloaded = TaskList::load_tasks(store);
    assert_eq!(reloaded.len(), 1);
    assert_eq!(reloaded.items()[0].text, "recovered");
}

#[test]
fn invalid_key_is_rejected() {
    let dir = tempdir().unwrap();
    let store = JsonDirStore::new(dir.path());
    assert!(store.write_raw("../escape", "1").is_err());
    assert!(store.read_raw("").is_err());
}

#[test]
fn widgets_survive_reopening_the_directory() {
    let dir = tempdir().unwrap();
    {
        let store: StoreHandle = Arc::new(JsonDirStore::new(dir.path()));
        let mut links = LinkList::load_links(store);
        links
            .add(LinkItem::new("Docs", "https://docs.rs"))
            .unwrap();
    }
    let store: StoreHandle = Arc::new(JsonDirStore::new(dir.path()));
    let links = LinkList::load_links(store);
    assert_eq!(links.len(), 1);
    assert_eq!(links.items()[0].url, "https://docs.rs");
    assert_eq!(links.items()[0].id, 1);
}

#[test]
fn legacy_entries_without_ids_get_fresh_ones() {
    let dir = tempdir().unwrap();
    std::fs::write(
        dir.path().join("tasks.json"),
        r#"[{"text":"a","completed":false},{"text":"b","completed":true}]"#,
    )
    .unwrap();
    let store: StoreHandle = Arc::new(JsonDirStore::new(dir.path()));
    let tasks = TaskList::load_tasks(store);
    let ids: Vec<u64> = tasks.items().iter().map(|t| t.id).collect();
    assert_eq!(ids.len(), 2);
    assert!(ids.iter().all(|id| *id != 0));
    assert_ne!(ids[0], ids[1]);
}
