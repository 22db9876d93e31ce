use std::sync::Arc;
use tagtodo_core::{KeyValueStorage, MemoryStorage, ThemeMode, ThemeStore, THEME_KEY};
use tokio::runtime::Handle;

#[tokio::test]
async fn missing_preference_defaults_to_light() {
    let storage = Arc::new(MemoryStorage::new());
    let mut theme = ThemeStore::new(Arc::clone(&storage), Handle::current());

    assert_eq!(theme.load().await, ThemeMode::Light);
    assert!(!theme.is_dark());
    assert_eq!(storage.write_count(), 0);
}

#[tokio::test]
async fn stored_preference_is_restored() {
    let storage = Arc::new(MemoryStorage::with_item(THEME_KEY, "dark"));
    let mut theme = ThemeStore::new(storage, Handle::current());

    assert_eq!(theme.load().await, ThemeMode::Dark);
    assert!(theme.is_dark());
}

#[tokio::test]
async fn unknown_stored_value_falls_back_to_light() {
    let storage = Arc::new(MemoryStorage::with_item(THEME_KEY, "sepia"));
    let mut theme = ThemeStore::new(storage, Handle::current());

    assert_eq!(theme.load().await, ThemeMode::Light);
}

#[tokio::test]
async fn toggle_persists_the_new_mode() {
    let storage = Arc::new(MemoryStorage::new());
    let mut theme = ThemeStore::new(Arc::clone(&storage), Handle::current());
    theme.load().await;

    assert_eq!(theme.toggle(), ThemeMode::Dark);
    theme.settle().await;
    assert_eq!(storage.get_item(THEME_KEY).unwrap().as_deref(), Some("dark"));

    theme.set_mode(ThemeMode::Dark);
    theme.settle().await;
    assert_eq!(storage.write_count(), 1);
}

#[tokio::test]
async fn mode_set_while_loading_wins_and_is_written_after_load() {
    let storage = Arc::new(MemoryStorage::with_item(THEME_KEY, "light"));
    let mut theme = ThemeStore::new(Arc::clone(&storage), Handle::current());

    theme.set_mode(ThemeMode::Dark);
    assert!(theme.is_loading());
    assert_eq!(storage.write_count(), 0);

    assert_eq!(theme.load().await, ThemeMode::Dark);
    let report = theme.settle().await;
    assert_eq!(report.written, 1);
    assert_eq!(storage.get_item(THEME_KEY).unwrap().as_deref(), Some("dark"));
}

#[tokio::test]
async fn read_failure_falls_back_to_light() {
    let storage = Arc::new(MemoryStorage::with_item(THEME_KEY, "dark"));
    storage.set_fail_reads(true);
    let mut theme = ThemeStore::new(storage, Handle::current());

    assert_eq!(theme.load().await, ThemeMode::Light);
    assert!(!theme.is_loading());
}
