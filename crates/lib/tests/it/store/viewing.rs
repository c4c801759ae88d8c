use topfive::{SortKey, ViewMode};

use crate::helpers::{FlakyBackend, draft_list, publish_list, store_for};

fn names(lists: &[topfive::Top5List]) -> Vec<&str> {
    lists.iter().map(|l| l.name.as_str()).collect()
}

#[tokio::test]
async fn modes_scope_the_collection() {
    let backend = FlakyBackend::new();
    draft_list(backend.clone(), "ana", "Ana draft", ["A", "B", "C", "D", "E"]).await;
    publish_list(backend.clone(), "ana", "Ana public", ["A", "B", "C", "D", "E"]).await;
    publish_list(backend.clone(), "bo", "Bo public", ["A", "B", "C", "D", "E"]).await;
    draft_list(backend.clone(), "bo", "Bo draft", ["A", "B", "C", "D", "E"]).await;

    let mut store = store_for(backend.clone(), "ana");
    store.change_mode(ViewMode::Mine).await.unwrap();
    assert_eq!(names(&store.state().summaries), ["Ana draft", "Ana public"]);

    store.change_mode(ViewMode::Published).await.unwrap();
    assert_eq!(names(&store.state().summaries), ["Ana public", "Bo public"]);

    store.change_mode(ViewMode::ByUser).await.unwrap();
    assert_eq!(names(&store.state().summaries), ["Ana public", "Bo public"]);

    store.change_mode(ViewMode::Community).await.unwrap();
    let state = store.state();
    assert_eq!(state.mode, ViewMode::Community);
    assert!(state.summaries.is_empty());
    assert_eq!(state.community_entries.len(), 2);
}

#[tokio::test]
async fn search_follows_the_mode() {
    let backend = FlakyBackend::new();
    publish_list(backend.clone(), "ana", "Movies", ["A", "B", "C", "D", "E"]).await;
    publish_list(backend.clone(), "bo", "Music", ["A", "B", "C", "D", "E"]).await;
    publish_list(backend.clone(), "bo", "Books", ["A", "B", "C", "D", "E"]).await;

    let mut store = store_for(backend.clone(), "ana");
    store.change_mode(ViewMode::Published).await.unwrap();
    store.search("mu").await.unwrap();
    assert_eq!(names(&store.state().summaries), ["Music"]);
    assert_eq!(store.state().query, "mu");

    store.change_mode(ViewMode::ByUser).await.unwrap();
    assert!(store.state().query.is_empty());
    store.search("BO").await.unwrap();
    assert_eq!(names(&store.state().summaries), ["Music", "Books"]);

    store.change_mode(ViewMode::Community).await.unwrap();
    store.search("m").await.unwrap();
    let entries: Vec<_> = store
        .state()
        .community_entries
        .iter()
        .map(|e| e.name.clone())
        .collect();
    assert_eq!(entries, ["Movies", "Music"]);

    store.search("").await.unwrap();
    assert_eq!(store.state().community_entries.len(), 3);
}

#[tokio::test]
async fn refresh_keeps_the_search() {
    let backend = FlakyBackend::new();
    publish_list(backend.clone(), "ana", "Movies", ["A", "B", "C", "D", "E"]).await;

    let mut store = store_for(backend.clone(), "ana");
    store.change_mode(ViewMode::Published).await.unwrap();
    store.search("mo").await.unwrap();

    publish_list(backend.clone(), "bo", "Mountains", ["A", "B", "C", "D", "E"]).await;
    publish_list(backend.clone(), "bo", "Rivers", ["A", "B", "C", "D", "E"]).await;
    store.refresh().await.unwrap();
    assert_eq!(names(&store.state().summaries), ["Movies", "Mountains"]);
}

#[tokio::test]
async fn sort_by_views() {
    let backend = FlakyBackend::new();
    for (name, views) in [("Three", 3), ("Ten", 10), ("Two", 2)] {
        let list = publish_list(backend.clone(), "ana", name, ["A", "B", "C", "D", "E"]).await;
        let mut viewer = store_for(backend.clone(), "bo");
        for _ in 0..views {
            viewer.add_view(list.id).await.unwrap();
        }
    }

    let mut store = store_for(backend.clone(), "ana");
    store.change_mode(ViewMode::Published).await.unwrap();
    store.sort(SortKey::Views);
    let views: Vec<u64> = store.state().summaries.iter().map(|l| l.views).collect();
    assert_eq!(views, [10, 3, 2]);

    store.sort(SortKey::Likes);
    assert_eq!(names(&store.state().summaries), ["Ten", "Three", "Two"]);
}
