use std::sync::Arc;

use topfive::{
    backend::ListBackend,
    store::{Affordance, RecordingAffordances},
};

use crate::helpers::{FlakyBackend, fill, store_for};

#[tokio::test]
async fn set_current_snapshots_a_draft() {
    let backend = FlakyBackend::new();
    let mut store = store_for(backend.clone(), "ana");
    let created = store.create_new_list().await.unwrap();
    store.close_current();

    let affordances = Arc::new(RecordingAffordances::new());
    let mut store = store_for(backend.clone(), "ana").with_affordances(affordances.clone());
    let opened = store.set_current(created.id).await.unwrap();
    assert_eq!(opened, created);

    let state = store.state();
    assert_eq!(state.current_list.as_ref(), Some(&created));
    let draft = state.draft.as_ref().unwrap();
    assert_eq!(draft.id, created.id);
    assert_eq!(draft.fields(), ["Untitled0", "?", "?", "?", "?", "?"]);
    assert_eq!(
        affordances.events(),
        [Affordance::DisableEditing, Affordance::PublishEnabled(false)]
    );
}

#[tokio::test]
async fn set_current_refuses_other_owners() {
    let backend = FlakyBackend::new();
    let mut ana = store_for(backend.clone(), "ana");
    let list = ana.create_new_list().await.unwrap();

    let affordances = Arc::new(RecordingAffordances::new());
    let mut bo = store_for(backend.clone(), "bo").with_affordances(affordances.clone());
    let before = bo.state();
    let err = bo.set_current(list.id).await.unwrap_err();

    assert!(err.is_permission_denied());
    assert_eq!(bo.state(), before);
    assert!(affordances.events().is_empty());
}

#[tokio::test]
async fn commit_writes_only_changed_fields_once() {
    let backend = FlakyBackend::new();
    let mut store = store_for(backend.clone(), "ana");
    let list = store.create_new_list().await.unwrap();
    store.update_item(1, "Brazil").unwrap();

    // The owner renames the list from another session while it is being edited.
    let mut other = store_for(backend.clone(), "ana");
    other.change_list_name(list.id, "Films").await.unwrap();

    let writes = backend.writes();
    let stored = store.commit_edits().await.unwrap();
    assert_eq!(backend.writes(), writes + 1);

    assert_eq!(stored.items, ["?", "Brazil", "?", "?", "?"]);
    assert_eq!(stored.name, "Films");
    assert_eq!(backend.get_list(list.id).await.unwrap(), stored);
    assert_eq!(store.state().current_list.as_ref(), Some(&stored));
}

#[tokio::test]
async fn close_discards_the_draft() {
    let backend = FlakyBackend::new();
    let affordances = Arc::new(RecordingAffordances::new());
    let mut store = store_for(backend.clone(), "ana").with_affordances(affordances.clone());
    let list = store.create_new_list().await.unwrap();
    fill(&mut store, "Movies", ["A", "B", "C", "D", "E"]).await;

    let writes = backend.writes();
    store.close_current();
    assert_eq!(backend.writes(), writes);
    assert!(store.state().current_list.is_none());
    assert!(store.state().draft.is_none());
    assert!(!affordances.editing_disabled());
    assert_eq!(backend.get_list(list.id).await.unwrap().name, "Untitled0");
}

#[tokio::test]
async fn change_list_name_persists_immediately() {
    let backend = FlakyBackend::new();
    let mut store = store_for(backend.clone(), "ana");
    let list = store.create_new_list().await.unwrap();
    store.close_current();
    store.load_summaries(topfive::ViewMode::Mine).await.unwrap();

    let renamed = store.change_list_name(list.id, "Books").await.unwrap();
    assert_eq!(renamed.name, "Books");
    assert_eq!(backend.get_list(list.id).await.unwrap().name, "Books");
    assert_eq!(store.state().summaries[0].name, "Books");

    let mut bo = store_for(backend.clone(), "bo");
    let err = bo.change_list_name(list.id, "Stolen").await.unwrap_err();
    assert!(err.is_permission_denied());
    assert_eq!(backend.get_list(list.id).await.unwrap().name, "Books");
}
