//! Community aggregation.
//!
//! Published lists that share a name (ignoring case) are merged into one
//! community list. An item ranked k-th (0-indexed) on a source list earns
//! `5 - k` points, and points for the same item (ignoring case) are summed
//! across sources.
//!
//! Entries are derived data. They are rebuilt from a fresh snapshot on every
//! community fetch and never persisted.

mod scored_item;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub use scored_item::{ParseScoredItemError, ScoredItem};

use crate::{
    constants::LIST_LENGTH,
    list::{ListId, Top5List},
};

/// A merged, point-weighted list for one name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommunityEntry {
    /// Display name: the casing of the first list seen with this name.
    pub name: String,
    /// Items in first-appearance order.
    pub items: Vec<ScoredItem>,
    /// Lists that contributed to this entry.
    pub sources: Vec<ListId>,
    pub likes: Vec<String>,
    pub dislikes: Vec<String>,
    /// Local view counter, reset on every aggregation pass.
    pub views: u64,
    pub comments: Vec<String>,
    pub updated_date: DateTime<Utc>,
    pub published_date: Option<DateTime<Utc>>,
}

impl CommunityEntry {
    fn seed(list: &Top5List, now: DateTime<Utc>) -> Self {
        Self {
            name: list.name.clone(),
            items: Vec::with_capacity(LIST_LENGTH),
            sources: Vec::new(),
            likes: Vec::new(),
            dislikes: Vec::new(),
            views: 0,
            comments: Vec::new(),
            updated_date: now,
            published_date: None,
        }
    }

    /// Whether this entry collects lists named `name`, ignoring case.
    pub fn matches(&self, name: &str) -> bool {
        self.name.to_lowercase() == name.to_lowercase()
    }

    /// Add a source list's ranked items to this entry.
    fn merge(&mut self, list: &Top5List) {
        for (rank, item) in list.items.iter().enumerate() {
            let points = rank_points(rank);
            match self.items.iter_mut().find(|existing| existing.matches(item)) {
                Some(existing) => existing.points += points,
                None => self.items.push(ScoredItem::new(points, item.clone())),
            }
        }
        self.sources.push(list.id);
    }

    /// Points held by `item`, ignoring case. Zero when absent.
    pub fn points_for(&self, item: &str) -> u32 {
        self.items
            .iter()
            .find(|i| i.matches(item))
            .map_or(0, |i| i.points)
    }
}

/// Points earned by the item at 0-indexed `rank`.
pub fn rank_points(rank: usize) -> u32 {
    LIST_LENGTH.saturating_sub(rank) as u32
}

/// Merge every published list in `lists` into community entries.
///
/// Unpublished lists are skipped. Output order is the order in which each
/// name was first seen, and within an entry items keep first-appearance order.
/// The result is a pure function of `lists` and `now`.
pub fn aggregate(lists: &[Top5List], now: DateTime<Utc>) -> Vec<CommunityEntry> {
    let mut entries: Vec<CommunityEntry> = Vec::new();
    for list in lists.iter().filter(|l| l.published) {
        let idx = match entries.iter().position(|e| e.matches(&list.name)) {
            Some(idx) => idx,
            None => {
                entries.push(CommunityEntry::seed(list, now));
                entries.len() - 1
            }
        };
        entries[idx].merge(list);
    }
    entries
}
