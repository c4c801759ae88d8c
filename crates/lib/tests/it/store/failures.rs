//! Every operation must leave the store untouched when the backend does not acknowledge.

use topfive::{ViewMode, backend::ListBackend};

use crate::helpers::{FlakyBackend, draft_list, fill, publish_list, store_for};

#[tokio::test]
async fn failed_create_changes_nothing() {
    let backend = FlakyBackend::new();
    let mut store = store_for(backend.clone(), "ana");
    backend.fail_writes(true);

    let before = store.state();
    let err = store.create_new_list().await.unwrap_err();
    assert!(err.is_persistence_error());
    assert_eq!(store.state(), before);
    assert_eq!(store.state().new_list_counter, 0);
    assert!(backend.inner.is_empty().await);
}

#[tokio::test]
async fn failed_commit_keeps_the_draft() {
    let backend = FlakyBackend::new();
    let mut store = store_for(backend.clone(), "ana");
    let list = store.create_new_list().await.unwrap();
    fill(&mut store, "Movies", ["A", "B", "C", "D", "E"]).await;

    backend.fail_writes(true);
    let before = store.state();
    assert!(store.commit_edits().await.unwrap_err().is_persistence_error());
    assert!(store.publish().await.unwrap_err().is_persistence_error());
    assert_eq!(store.state(), before);
    assert_eq!(backend.get_list(list.id).await.unwrap(), list);

    backend.fail_writes(false);
    assert_eq!(store.commit_edits().await.unwrap().name, "Movies");
}

#[tokio::test]
async fn failed_reads_change_nothing() {
    let backend = FlakyBackend::new();
    let list = draft_list(backend.clone(), "ana", "Movies", ["A", "B", "C", "D", "E"]).await;
    let mut store = store_for(backend.clone(), "ana");
    store.load_summaries(ViewMode::Mine).await.unwrap();

    backend.fail_reads(true);
    let before = store.state();
    assert!(store.change_mode(ViewMode::Community).await.is_err());
    assert!(store.search("Mo").await.is_err());
    assert!(store.refresh().await.is_err());
    assert!(store.set_current(list.id).await.is_err());
    assert!(store.mark_for_deletion(list.id).await.is_err());
    assert!(store.refresh_community().await.is_err());
    assert_eq!(store.state(), before);
}

#[tokio::test]
async fn failed_engagement_changes_nothing() {
    let backend = FlakyBackend::new();
    let list = publish_list(backend.clone(), "ana", "Movies", ["A", "B", "C", "D", "E"]).await;
    let mut bo = store_for(backend.clone(), "bo");
    bo.change_mode(ViewMode::Published).await.unwrap();

    backend.fail_writes(true);
    let before = bo.state();
    assert!(bo.like(list.id).await.unwrap_err().is_persistence_error());
    assert!(bo.dislike(list.id).await.is_err());
    assert!(bo.add_comment(list.id, "hi").await.is_err());
    assert!(bo.add_view(list.id).await.is_err());
    assert_eq!(bo.state(), before);
    assert_eq!(backend.get_list(list.id).await.unwrap(), list);
}

#[tokio::test]
async fn failed_delete_keeps_the_mark() {
    let backend = FlakyBackend::new();
    let list = draft_list(backend.clone(), "ana", "Movies", ["A", "B", "C", "D", "E"]).await;
    let mut store = store_for(backend.clone(), "ana");
    store.mark_for_deletion(list.id).await.unwrap();

    backend.fail_writes(true);
    let before = store.state();
    assert!(store.delete_marked().await.unwrap_err().is_persistence_error());
    assert_eq!(store.state(), before);
    assert!(backend.get_list(list.id).await.is_ok());
}

#[tokio::test]
async fn missing_lists_are_not_found() {
    let backend = FlakyBackend::new();
    let mut store = store_for(backend.clone(), "ana");
    let id = topfive::ListId::generate();

    let err = store.set_current(id).await.unwrap_err();
    assert!(err.is_not_found());
    assert!(!err.is_persistence_error());
    assert!(store.like(id).await.unwrap_err().is_not_found());
}

#[tokio::test]
async fn acknowledged_publish_completes_when_reload_fails() {
    let backend = FlakyBackend::new();
    let mut store = store_for(backend.clone(), "ana");
    let list = store.create_new_list().await.unwrap();
    fill(&mut store, "Movies", ["Alien", "Brazil", "Casablanca", "Dune", "Eraserhead"]).await;

    backend.fail_reads_after_next_write();
    let published = store.publish().await.unwrap();
    assert!(published.published);

    let state = store.state();
    assert!(state.current_list.is_none());
    assert!(state.draft.is_none());
    assert!(state.summary(list.id).unwrap().published);

    backend.fail_reads(false);
    assert!(backend.get_list(list.id).await.unwrap().published);
}

#[tokio::test]
async fn acknowledged_delete_clears_the_mark_when_reload_fails() {
    let backend = FlakyBackend::new();
    let mut store = store_for(backend.clone(), "ana");
    let list = store.create_new_list().await.unwrap();
    store.mark_for_deletion(list.id).await.unwrap();

    backend.fail_reads_after_next_write();
    store.delete_marked().await.unwrap();

    let state = store.state();
    assert!(state.list_marked_for_deletion.is_none());
    assert!(state.current_list.is_none());
    assert!(state.summary(list.id).is_none());
}

#[tokio::test]
async fn acknowledged_rename_and_vote_complete_when_reload_fails() {
    let backend = FlakyBackend::new();
    let draft = draft_list(backend.clone(), "ana", "Movies", ["A", "B", "C", "D", "E"]).await;
    let mut ana = store_for(backend.clone(), "ana");
    ana.load_summaries(ViewMode::Mine).await.unwrap();

    backend.fail_reads_after_next_write();
    let renamed = ana.change_list_name(draft.id, "Films").await.unwrap();
    assert_eq!(renamed.name, "Films");
    assert_eq!(ana.state().summary(draft.id).unwrap().name, "Films");
    backend.fail_reads(false);

    let list = publish_list(backend.clone(), "ana", "Books", ["A", "B", "C", "D", "E"]).await;
    let mut bo = store_for(backend.clone(), "bo");
    bo.change_mode(ViewMode::Published).await.unwrap();

    backend.fail_reads_after_next_write();
    let liked = bo.like(list.id).await.unwrap();
    assert_eq!(liked.likes, ["bo"]);
    assert_eq!(bo.state().summary(list.id).unwrap().likes, ["bo"]);
}
