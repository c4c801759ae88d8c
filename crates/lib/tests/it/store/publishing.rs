use topfive::{ViewMode, backend::ListBackend, validation::PublishBlocker};

use crate::helpers::{FlakyBackend, draft_list, fill, publish_list, store_for};

#[tokio::test]
async fn publish_sets_flags_and_clears_comments() {
    let backend = FlakyBackend::new();
    let mut store = store_for(backend.clone(), "ana");
    let list = store.create_new_list().await.unwrap();
    fill(&mut store, "Movies", ["Alien", "Brazil", "Casablanca", "Dune", "Eraserhead"]).await;
    store.commit_edits().await.unwrap();

    // Drafts take no comments, so the published list starts with none.
    let mut bo = store_for(backend.clone(), "bo");
    let err = bo.add_comment(list.id, "early bird").await.unwrap_err();
    assert!(err.is_validation_error());

    let published = store.publish().await.unwrap();
    assert!(published.published);
    assert!(published.published_date.unwrap() > published.created_date);
    assert!(published.comments.is_empty());
    assert_eq!(backend.get_list(list.id).await.unwrap(), published);

    let state = store.state();
    assert!(state.current_list.is_none());
    assert!(state.draft.is_none());
}

#[tokio::test]
async fn publish_includes_uncommitted_edits() {
    let backend = FlakyBackend::new();
    let mut store = store_for(backend.clone(), "ana");
    store.create_new_list().await.unwrap();
    fill(&mut store, "Games", ["Doom", "Myst", "Tetris", "Zork", "Portal"]).await;

    let published = store.publish().await.unwrap();
    assert_eq!(published.name, "Games");
    assert_eq!(published.items, ["Doom", "Myst", "Tetris", "Zork", "Portal"]);
}

#[tokio::test]
async fn publish_refuses_invalid_drafts() {
    let backend = FlakyBackend::new();
    let mut store = store_for(backend.clone(), "ana");
    let list = store.create_new_list().await.unwrap();
    fill(&mut store, "Movies", ["Alien", "alien", "", "Dune", "#1"]).await;

    let before = store.state();
    let writes = backend.writes();
    let err = store.publish().await.unwrap_err();
    assert!(err.is_validation_error());
    match err {
        topfive::Error::Store(store_err) => assert_eq!(
            store_err.blockers(),
            [
                PublishBlocker::InvalidField { index: 3 },
                PublishBlocker::InvalidField { index: 5 },
                PublishBlocker::DuplicateFields { first: 1, second: 2 },
            ]
        ),
        other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(store.state(), before);
    assert_eq!(backend.writes(), writes);
    assert!(!backend.get_list(list.id).await.unwrap().published);
}

#[tokio::test]
async fn publish_rechecks_names_against_fresh_lists() {
    let backend = FlakyBackend::new();
    let mut store = store_for(backend.clone(), "ana");
    store.create_new_list().await.unwrap();
    fill(&mut store, "Movies", ["A", "B", "C", "D", "E"]).await;

    // Another user publishes the same name after the draft was opened.
    let theirs = publish_list(backend.clone(), "bo", "MOVIES", ["V", "W", "X", "Y", "Z"]).await;

    let err = store.publish().await.unwrap_err();
    assert!(err.is_validation_error());
    match err {
        topfive::Error::Store(store_err) => {
            assert_eq!(store_err.blockers(), [PublishBlocker::NameTaken { id: theirs.id }])
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert!(store.state().is_editing());
}

#[tokio::test]
async fn unpublished_names_do_not_block() {
    let backend = FlakyBackend::new();
    draft_list(backend.clone(), "bo", "Movies", ["V", "W", "X", "Y", "Z"]).await;
    let published = publish_list(backend.clone(), "ana", "movies", ["A", "B", "C", "D", "E"]).await;
    assert!(published.published);
}

#[tokio::test]
async fn published_lists_are_frozen() {
    let backend = FlakyBackend::new();
    let list = publish_list(backend.clone(), "ana", "Movies", ["A", "B", "C", "D", "E"]).await;

    let mut store = store_for(backend.clone(), "ana");
    store.set_current(list.id).await.unwrap();
    store.update_item(0, "Z").unwrap();
    assert!(store.commit_edits().await.unwrap_err().is_validation_error());
    assert!(store.publish().await.unwrap_err().is_validation_error());
    assert!(
        store
            .change_list_name(list.id, "Films")
            .await
            .unwrap_err()
            .is_validation_error()
    );
    assert_eq!(backend.get_list(list.id).await.unwrap(), list);
}

#[tokio::test]
async fn publish_reloads_the_visible_collection() {
    let backend = FlakyBackend::new();
    let mut store = store_for(backend.clone(), "ana");
    store.change_mode(ViewMode::Published).await.unwrap();
    assert!(store.state().summaries.is_empty());

    store.create_new_list().await.unwrap();
    fill(&mut store, "Movies", ["A", "B", "C", "D", "E"]).await;
    store.publish().await.unwrap();

    let state = store.state();
    assert_eq!(state.summaries.len(), 1);
    assert_eq!(state.summaries[0].name, "Movies");
}
