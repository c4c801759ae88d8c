//! Viewing modes, sorting and searching over list collections.

use std::cmp::Reverse;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{community::CommunityEntry, list::Top5List, user::UserIdentity};

/// Which collection the store is showing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ViewMode {
    /// The caller's own lists, published or not.
    #[default]
    Mine,
    /// Every published list.
    Published,
    /// Published lists, searched by owner user name.
    ByUser,
    /// Aggregated community lists.
    Community,
}

impl ViewMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ViewMode::Mine => "mine",
            ViewMode::Published => "published",
            ViewMode::ByUser => "byUser",
            ViewMode::Community => "community",
        }
    }

    /// Whether a list belongs in this mode's collection before any search.
    pub fn includes(&self, list: &Top5List, caller: &UserIdentity) -> bool {
        match self {
            ViewMode::Mine => list.is_owned_by(caller),
            ViewMode::Published | ViewMode::ByUser | ViewMode::Community => list.published,
        }
    }
}

impl fmt::Display for ViewMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {kind} {value:?}")]
pub struct ParseQueryError {
    kind: &'static str,
    value: String,
}

impl FromStr for ViewMode {
    type Err = ParseQueryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "mine" | "home" => Ok(ViewMode::Mine),
            "published" | "all" => Ok(ViewMode::Published),
            "byuser" | "user" => Ok(ViewMode::ByUser),
            "community" => Ok(ViewMode::Community),
            _ => Err(ParseQueryError {
                kind: "view mode",
                value: s.to_string(),
            }),
        }
    }
}

/// Sort orders offered by the list views.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SortKey {
    /// Most recently published first.
    Newest,
    /// Least recently published first.
    Oldest,
    /// Most viewed first.
    Views,
    /// Most liked first.
    Likes,
    /// Most disliked first.
    Dislikes,
}

impl FromStr for SortKey {
    type Err = ParseQueryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "newest" => Ok(SortKey::Newest),
            "oldest" => Ok(SortKey::Oldest),
            "views" => Ok(SortKey::Views),
            "likes" => Ok(SortKey::Likes),
            "dislikes" => Ok(SortKey::Dislikes),
            _ => Err(ParseQueryError {
                kind: "sort key",
                value: s.to_string(),
            }),
        }
    }
}

/// Anything the list views can order.
pub trait Sortable {
    /// The date `Newest`/`Oldest` compare.
    fn sort_date(&self) -> Option<DateTime<Utc>>;
    fn view_count(&self) -> u64;
    fn like_count(&self) -> usize;
    fn dislike_count(&self) -> usize;
}

impl Sortable for Top5List {
    fn sort_date(&self) -> Option<DateTime<Utc>> {
        self.published_date
    }

    fn view_count(&self) -> u64 {
        self.views
    }

    fn like_count(&self) -> usize {
        self.likes.len()
    }

    fn dislike_count(&self) -> usize {
        self.dislikes.len()
    }
}

impl Sortable for CommunityEntry {
    fn sort_date(&self) -> Option<DateTime<Utc>> {
        Some(self.updated_date)
    }

    fn view_count(&self) -> u64 {
        self.views
    }

    fn like_count(&self) -> usize {
        self.likes.len()
    }

    fn dislike_count(&self) -> usize {
        self.dislikes.len()
    }
}

/// Stable in-place sort. Ties keep their current relative order.
pub fn sort<T: Sortable>(items: &mut [T], key: SortKey) {
    match key {
        SortKey::Newest => items.sort_by_key(|i| Reverse(i.sort_date())),
        SortKey::Oldest => items.sort_by_key(|i| i.sort_date()),
        SortKey::Views => items.sort_by_key(|i| Reverse(i.view_count())),
        SortKey::Likes => items.sort_by_key(|i| Reverse(i.like_count())),
        SortKey::Dislikes => items.sort_by_key(|i| Reverse(i.dislike_count())),
    }
}

fn has_prefix_ignoring_case(value: &str, prefix: &str) -> bool {
    value.to_lowercase().starts_with(&prefix.to_lowercase())
}

/// The lists `mode` shows for `caller`, narrowed by `text`.
///
/// `Mine` and `Published` match a name prefix, `ByUser` matches the whole
/// owner user name; all comparisons ignore case. Empty `text` keeps the
/// whole mode-scoped collection. `Community` searches entries, not lists,
/// so it scopes to published lists here; see [`search_entries`].
pub fn search_lists(
    mode: ViewMode,
    lists: &[Top5List],
    caller: &UserIdentity,
    text: &str,
) -> Vec<Top5List> {
    lists
        .iter()
        .filter(|l| mode.includes(l, caller))
        .filter(|l| {
            text.is_empty()
                || match mode {
                    ViewMode::ByUser => l.owner_user_name.to_lowercase() == text.to_lowercase(),
                    _ => has_prefix_ignoring_case(&l.name, text),
                }
        })
        .cloned()
        .collect()
}

/// Community entries whose name starts with `text`, ignoring case.
pub fn search_entries(entries: &[CommunityEntry], text: &str) -> Vec<CommunityEntry> {
    entries
        .iter()
        .filter(|e| text.is_empty() || has_prefix_ignoring_case(&e.name, text))
        .cloned()
        .collect()
}
