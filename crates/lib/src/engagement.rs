//! Likes, dislikes, comments and views.
//!
//! These functions only change the record in hand and report whether anything
//! changed. Persisting the result is the store's job.

use crate::list::Top5List;

/// Record a like by `user_name`, withdrawing any dislike they had given.
///
/// Liking twice is a no-op.
pub fn like(list: &mut Top5List, user_name: &str) -> bool {
    vote(&mut list.likes, &mut list.dislikes, user_name)
}

/// Record a dislike by `user_name`, withdrawing any like they had given.
pub fn dislike(list: &mut Top5List, user_name: &str) -> bool {
    vote(&mut list.dislikes, &mut list.likes, user_name)
}

fn vote(chosen: &mut Vec<String>, opposite: &mut Vec<String>, user_name: &str) -> bool {
    let before = opposite.len();
    opposite.retain(|u| u != user_name);
    let withdrew = opposite.len() != before;

    if chosen.iter().any(|u| u == user_name) {
        return withdrew;
    }
    chosen.push(user_name.to_string());
    true
}

/// Append a comment attributed to `user_name`.
pub fn add_comment(list: &mut Top5List, user_name: &str, text: &str) {
    list.comments.push(format!("{user_name} {text}"));
}

/// Count one more view. Every call counts, including repeat views by the same user.
pub fn add_view(list: &mut Top5List) {
    list.views = list.views.saturating_add(1);
}
