use topfive::{ViewMode, backend::ListBackend};

use crate::helpers::{FlakyBackend, draft_list, publish_list, store_for};

#[tokio::test]
async fn like_then_dislike_moves_the_vote() {
    let backend = FlakyBackend::new();
    let list = publish_list(backend.clone(), "ana", "Movies", ["A", "B", "C", "D", "E"]).await;
    let mut bo = store_for(backend.clone(), "bo");

    let liked = bo.like(list.id).await.unwrap();
    assert_eq!(liked.likes, ["bo"]);

    let writes = backend.writes();
    let again = bo.like(list.id).await.unwrap();
    assert_eq!(again.likes, ["bo"]);
    assert_eq!(backend.writes(), writes, "repeat like must not persist");

    let disliked = bo.dislike(list.id).await.unwrap();
    assert!(disliked.likes.is_empty());
    assert_eq!(disliked.dislikes, ["bo"]);
    assert_eq!(backend.get_list(list.id).await.unwrap(), disliked);
}

#[tokio::test]
async fn votes_from_many_users() {
    let backend = FlakyBackend::new();
    let list = publish_list(backend.clone(), "ana", "Movies", ["A", "B", "C", "D", "E"]).await;

    for user in ["bo", "cy", "di"] {
        store_for(backend.clone(), user).like(list.id).await.unwrap();
    }
    store_for(backend.clone(), "cy").dislike(list.id).await.unwrap();

    let stored = backend.get_list(list.id).await.unwrap();
    assert_eq!(stored.likes, ["bo", "di"]);
    assert_eq!(stored.dislikes, ["cy"]);
}

#[tokio::test]
async fn comments_are_attributed() {
    let backend = FlakyBackend::new();
    let list = publish_list(backend.clone(), "ana", "Movies", ["A", "B", "C", "D", "E"]).await;
    let mut bo = store_for(backend.clone(), "bo");

    bo.add_comment(list.id, "solid picks").await.unwrap();
    let stored = bo.add_comment(list.id, "but no Heat?").await.unwrap();
    assert_eq!(stored.comments, ["bo solid picks", "bo but no Heat?"]);
}

#[tokio::test]
async fn views_count_every_call() {
    let backend = FlakyBackend::new();
    let list = publish_list(backend.clone(), "ana", "Movies", ["A", "B", "C", "D", "E"]).await;
    assert_eq!(list.views, 0);

    let mut bo = store_for(backend.clone(), "bo");
    for _ in 0..3 {
        bo.add_view(list.id).await.unwrap();
    }
    assert_eq!(backend.get_list(list.id).await.unwrap().views, 3);
}

#[tokio::test]
async fn engagement_reloads_the_visible_collection() {
    let backend = FlakyBackend::new();
    let list = publish_list(backend.clone(), "ana", "Movies", ["A", "B", "C", "D", "E"]).await;
    let mut bo = store_for(backend.clone(), "bo");
    bo.change_mode(ViewMode::Published).await.unwrap();

    bo.like(list.id).await.unwrap();
    assert_eq!(bo.state().summaries[0].likes, ["bo"]);
}

#[tokio::test]
async fn drafts_take_no_engagement() {
    let backend = FlakyBackend::new();
    let draft = draft_list(backend.clone(), "ana", "Movies", ["A", "B", "C", "D", "E"]).await;
    let mut bo = store_for(backend.clone(), "bo");
    bo.change_mode(ViewMode::Published).await.unwrap();

    let writes = backend.writes();
    let before = bo.state();
    assert!(bo.like(draft.id).await.unwrap_err().is_validation_error());
    assert!(bo.dislike(draft.id).await.unwrap_err().is_validation_error());
    assert!(bo.add_comment(draft.id, "too soon").await.unwrap_err().is_validation_error());
    assert!(bo.add_view(draft.id).await.unwrap_err().is_validation_error());

    // The owner cannot engage with their own draft either.
    let mut ana = store_for(backend.clone(), "ana");
    assert!(ana.like(draft.id).await.is_err());

    assert_eq!(backend.writes(), writes);
    assert_eq!(bo.state(), before);
    assert_eq!(backend.get_list(draft.id).await.unwrap(), draft);
}
