use std::sync::Arc;
use tagtodo_core::{EditError, EditSession, MemoryStorage, TaskId, TaskStore};
use tokio::runtime::Handle;

async fn store_with(texts: &[&str]) -> TaskStore<MemoryStorage> {
    let mut store = TaskStore::new(Arc::new(MemoryStorage::new()), Handle::current());
    store.load().await;
    for text in texts {
        store.create(*text);
    }
    store
}

#[tokio::test]
async fn begin_seeds_draft_and_save_updates_trimmed_text() {
    let mut store = store_with(&["Buy #banana"]).await;
    let id = store.tasks()[0].id().clone();
    let mut session = EditSession::new();

    session.begin(&store, &id).unwrap();
    assert_eq!(session.draft(), Some("Buy #banana"));
    assert_eq!(session.task_id(), Some(&id));

    session.set_draft("  Buy #apples  ").unwrap();
    assert_eq!(session.save(&mut store).unwrap(), id);

    assert!(!session.is_editing());
    assert_eq!(store.get(&id).unwrap().text(), "Buy #apples");
}

#[tokio::test]
async fn blank_draft_is_rejected_and_session_stays_open() {
    let mut store = store_with(&["keep me"]).await;
    let id = store.tasks()[0].id().clone();
    let mut session = EditSession::new();
    session.begin(&store, &id).unwrap();

    session.set_draft("   ").unwrap();
    assert_eq!(session.save(&mut store), Err(EditError::EmptyText));

    assert!(session.is_editing());
    assert_eq!(store.get(&id).unwrap().text(), "keep me");
}

#[tokio::test]
async fn cancel_discards_draft() {
    let store = store_with(&["original"]).await;
    let id = store.tasks()[0].id().clone();
    let mut session = EditSession::new();
    session.begin(&store, &id).unwrap();
    session.set_draft("changed").unwrap();

    session.cancel();

    assert_eq!(session, EditSession::Closed);
    assert_eq!(store.get(&id).unwrap().text(), "original");
}

#[tokio::test]
async fn begin_rejects_unknown_task_and_second_edit() {
    let store = store_with(&["a", "b"]).await;
    let a = store.tasks()[0].id().clone();
    let b = store.tasks()[1].id().clone();
    let mut session = EditSession::new();

    let ghost = TaskId::from("ghost");
    assert_eq!(
        session.begin(&store, &ghost),
        Err(EditError::UnknownTask(ghost.clone()))
    );

    session.begin(&store, &a).unwrap();
    assert_eq!(session.begin(&store, &b), Err(EditError::AlreadyEditing(a)));
}

#[tokio::test]
async fn closed_session_rejects_draft_and_save() {
    let mut store = store_with(&[]).await;
    let mut session = EditSession::new();

    assert_eq!(session.set_draft("x"), Err(EditError::NotEditing));
    assert_eq!(session.save(&mut store), Err(EditError::NotEditing));
}

#[tokio::test]
async fn saving_a_deleted_task_closes_without_writing() {
    let mut store = store_with(&["gone soon"]).await;
    let id = store.tasks()[0].id().clone();
    let mut session = EditSession::new();
    session.begin(&store, &id).unwrap();

    store.delete(&id);
    session.set_draft("too late").unwrap();

    assert_eq!(session.save(&mut store), Ok(id));
    assert!(!session.is_editing());
    assert!(store.is_empty());
}
