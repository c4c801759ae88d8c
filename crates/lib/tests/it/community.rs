//! Community aggregation through the store.

use std::sync::Arc;

use topfive::{
    FixedClock, ViewMode,
    backend::ListBackend,
    community::{self, ScoredItem},
};

use crate::helpers::{FlakyBackend, draft_list, publish_list, store_for};

#[tokio::test]
async fn movies_scenario() {
    let backend = FlakyBackend::new();
    let x = publish_list(backend.clone(), "ana", "Movies", ["A", "B", "C", "D", "E"]).await;

    // Y is drafted while X holds the name, so it is published under another
    // name and then renamed through the backend, as older data allowed.
    let mut y = publish_list(backend.clone(), "bo", "Films", ["B", "A", "F", "D", "E"]).await;
    y.name = "movies".into();
    backend.update_list(y.id, y.clone()).await.unwrap();

    let mut store = store_for(backend.clone(), "cy");
    store.change_mode(ViewMode::Community).await.unwrap();
    let state = store.state();
    assert_eq!(state.community_entries.len(), 1);

    let entry = &state.community_entries[0];
    assert_eq!(entry.name, "Movies");
    assert_eq!(
        entry.items,
        [
            ScoredItem::new(9, "A"),
            ScoredItem::new(9, "B"),
            ScoredItem::new(3, "C"),
            ScoredItem::new(4, "D"),
            ScoredItem::new(2, "E"),
            ScoredItem::new(3, "F"),
        ]
    );
    assert_eq!(entry.sources, [x.id, y.id]);
    assert!(entry.likes.is_empty());
    assert!(entry.comments.is_empty());
}

#[tokio::test]
async fn drafts_never_reach_the_community() {
    let backend = FlakyBackend::new();
    draft_list(backend.clone(), "ana", "Books", ["A", "B", "C", "D", "E"]).await;

    let mut store = store_for(backend.clone(), "ana");
    let entries = store.refresh_community().await.unwrap();
    assert!(entries.is_empty());
}

#[tokio::test]
async fn aggregation_is_idempotent_for_a_fixed_snapshot() {
    let backend = FlakyBackend::new();
    publish_list(backend.clone(), "ana", "Books", ["A", "B", "C", "D", "E"]).await;
    publish_list(backend.clone(), "bo", "Games", ["Q", "R", "S", "T", "U"]).await;

    let lists = backend.all_lists().await.unwrap();
    let clock = FixedClock::default();
    let _hold = clock.hold();
    let now = topfive::Clock::now(&clock);
    assert_eq!(community::aggregate(&lists, now), community::aggregate(&lists, now));
}

#[tokio::test]
async fn community_views_are_local() {
    let backend = FlakyBackend::new();
    let list = publish_list(backend.clone(), "ana", "Books", ["A", "B", "C", "D", "E"]).await;

    let mut store = store_for(backend.clone(), "bo");
    store.change_mode(ViewMode::Community).await.unwrap();
    assert!(store.add_community_view("Books"));
    assert!(store.add_community_view("Books"));
    assert!(!store.add_community_view("books"));
    assert_eq!(store.state().community_entries[0].views, 2);
    assert_eq!(backend.get_list(list.id).await.unwrap().views, 0);

    let entries = store.refresh_community().await.unwrap();
    assert_eq!(entries[0].views, 0);
    assert_eq!(store.state().community_entries[0].views, 0);
}

#[tokio::test]
async fn each_pass_stamps_updated_date() {
    let backend = FlakyBackend::new();
    publish_list(backend.clone(), "ana", "Books", ["A", "B", "C", "D", "E"]).await;

    let clock = Arc::new(FixedClock::new(1_000));
    let mut store = store_for(backend.clone(), "bo").with_clock(clock.clone());
    let first = store.refresh_community().await.unwrap();
    clock.advance(60_000);
    let second = store.refresh_community().await.unwrap();
    assert!(second[0].updated_date > first[0].updated_date);
    assert_eq!(first[0].items, second[0].items);
}

#[tokio::test]
async fn engagement_targets_source_lists() {
    let backend = FlakyBackend::new();
    publish_list(backend.clone(), "ana", "Books", ["A", "B", "C", "D", "E"]).await;

    let mut store = store_for(backend.clone(), "bo");
    let entries = store.refresh_community().await.unwrap();
    for id in &entries[0].sources {
        store.like(*id).await.unwrap();
    }
    let stored = backend.get_list(entries[0].sources[0]).await.unwrap();
    assert_eq!(stored.likes, ["bo"]);
}
