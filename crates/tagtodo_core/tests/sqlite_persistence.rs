use std::sync::Arc;
use tagtodo_core::{
    KeyValueStorage, LoadOutcome, SqliteStorage, TaskStore, ThemeMode, ThemeStore, TASKS_KEY,
};
use tokio::runtime::Handle;

#[tokio::test]
async fn tasks_and_theme_survive_reopening_the_database() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("tagtodo.sqlite3");

    {
        let storage = Arc::new(SqliteStorage::open(&path).unwrap());
        let mut store = TaskStore::new(Arc::clone(&storage), Handle::current());
        store.load().await;
        let task = store.create("Drink #banana shake");
        store.create("Call mom");
        store.toggle_completed(task.id());
        assert_eq!(store.settle().await.failed, 0);

        let mut theme = ThemeStore::new(storage, Handle::current());
        theme.load().await;
        theme.set_mode(ThemeMode::Dark);
        theme.settle().await;
    }

    let storage = Arc::new(SqliteStorage::open(&path).unwrap());
    let mut store = TaskStore::new(Arc::clone(&storage), Handle::current());
    assert_eq!(store.load().await, LoadOutcome::Loaded(2));
    assert!(store.tasks()[0].is_completed());
    assert_eq!(store.tasks()[1].text(), "Call mom");

    let mut theme = ThemeStore::new(storage, Handle::current());
    assert_eq!(theme.load().await, ThemeMode::Dark);
}

#[test]
fn remove_item_deletes_the_key() {
    let storage = SqliteStorage::open_in_memory().unwrap();
    storage.set_item(TASKS_KEY, "[]").unwrap();

    storage.remove_item(TASKS_KEY).unwrap();
    storage.remove_item(TASKS_KEY).unwrap();

    assert_eq!(storage.get_item(TASKS_KEY).unwrap(), None);
}
