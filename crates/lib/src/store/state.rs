//! Store state and its transitions.
//!
//! [`StoreState`] is an immutable snapshot. Every store operation ends in a
//! single [`Action`], and [`reduce`] turns the previous snapshot plus that
//! action into the next snapshot without side effects.

use serde::Serialize;

use crate::{
    community::CommunityEntry,
    list::{Draft, ListId, Top5List},
    query::{self, SortKey, ViewMode},
};

/// Everything a UI needs to render the list views.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreState {
    /// Visible lists for the current mode and query. Empty in community mode.
    pub summaries: Vec<Top5List>,
    /// The list open for editing, at most one.
    pub current_list: Option<Top5List>,
    /// Unsaved edits to `current_list`.
    pub draft: Option<Draft>,
    pub mode: ViewMode,
    pub community_entries: Vec<CommunityEntry>,
    pub list_marked_for_deletion: Option<Top5List>,
    /// Suffix for the next `Untitled` list name.
    pub new_list_counter: u32,
    /// Active search text, empty when not searching.
    pub query: String,
}

impl StoreState {
    pub fn is_editing(&self) -> bool {
        self.current_list.is_some()
    }

    pub fn summary(&self, id: ListId) -> Option<&Top5List> {
        self.summaries.iter().find(|l| l.id == id)
    }

    pub fn community_entry(&self, name: &str) -> Option<&CommunityEntry> {
        self.community_entries.iter().find(|e| e.name == name)
    }
}

/// A freshly fetched visible collection.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Collection {
    pub summaries: Vec<Top5List>,
    pub community_entries: Vec<CommunityEntry>,
}

/// Every state transition the store can make.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// A mode switch, refresh or search replaced the visible collection.
    Loaded {
        mode: ViewMode,
        query: String,
        collection: Collection,
    },
    /// A new list was created and opened.
    ListCreated { list: Top5List },
    /// An existing list was opened for editing.
    CurrentListSet { list: Top5List },
    /// The draft changed.
    DraftEdited { draft: Draft },
    /// The draft was persisted into the open list.
    EditsCommitted { list: Top5List },
    /// The open list was published and closed.
    Published { collection: Collection },
    CurrentClosed,
    MarkedForDeletion { list: Top5List },
    Unmarked,
    /// The marked list was deleted.
    Deleted { id: ListId, collection: Collection },
    /// A list was changed outside the draft (rename, votes, comments, views).
    ListChanged {
        list: Top5List,
        collection: Collection,
    },
    /// Community entries were rebuilt without touching the rest of the view.
    CommunityRefreshed { entries: Vec<CommunityEntry> },
    CommunityViewAdded { name: String },
    Sorted { key: SortKey },
}

impl Action {
    /// Short name for logging.
    pub fn name(&self) -> &'static str {
        match self {
            Action::Loaded { .. } => "loaded",
            Action::ListCreated { .. } => "list_created",
            Action::CurrentListSet { .. } => "current_list_set",
            Action::DraftEdited { .. } => "draft_edited",
            Action::EditsCommitted { .. } => "edits_committed",
            Action::Published { .. } => "published",
            Action::CurrentClosed => "current_closed",
            Action::MarkedForDeletion { .. } => "marked_for_deletion",
            Action::Unmarked => "unmarked",
            Action::Deleted { .. } => "deleted",
            Action::ListChanged { .. } => "list_changed",
            Action::CommunityRefreshed { .. } => "community_refreshed",
            Action::CommunityViewAdded { .. } => "community_view_added",
            Action::Sorted { .. } => "sorted",
        }
    }
}

fn replace_collection(state: &mut StoreState, collection: Collection) {
    state.summaries = collection.summaries;
    state.community_entries = collection.community_entries;
}

fn close(state: &mut StoreState) {
    state.current_list = None;
    state.draft = None;
}

/// Compute the next snapshot.
pub fn reduce(state: &StoreState, action: Action) -> StoreState {
    let mut next = state.clone();
    match action {
        Action::Loaded {
            mode,
            query,
            collection,
        } => {
            next.mode = mode;
            next.query = query;
            replace_collection(&mut next, collection);
        }
        Action::ListCreated { list } => {
            next.new_list_counter = state.new_list_counter.saturating_add(1);
            if next.mode == ViewMode::Mine {
                next.summaries.push(list.clone());
            }
            next.draft = Some(list.draft());
            next.current_list = Some(list);
        }
        Action::CurrentListSet { list } => {
            next.draft = Some(list.draft());
            next.current_list = Some(list);
        }
        Action::DraftEdited { draft } => {
            next.draft = Some(draft);
        }
        Action::EditsCommitted { list } => {
            if let Some(slot) = next.summaries.iter_mut().find(|l| l.id == list.id) {
                *slot = list.clone();
            }
            next.draft = Some(list.draft());
            next.current_list = Some(list);
        }
        Action::Published { collection } => {
            replace_collection(&mut next, collection);
            close(&mut next);
        }
        Action::CurrentClosed => close(&mut next),
        Action::MarkedForDeletion { list } => {
            next.list_marked_for_deletion = Some(list);
        }
        Action::Unmarked => {
            next.list_marked_for_deletion = None;
        }
        Action::Deleted { id, collection } => {
            next.list_marked_for_deletion = None;
            if next.current_list.as_ref().is_some_and(|l| l.id == id) {
                close(&mut next);
            }
            replace_collection(&mut next, collection);
        }
        Action::ListChanged { list, collection } => {
            if let Some(current) = next.current_list.as_mut().filter(|c| c.id == list.id) {
                *current = list;
            }
            replace_collection(&mut next, collection);
        }
        Action::CommunityRefreshed { entries } => {
            next.community_entries = entries;
        }
        Action::CommunityViewAdded { name } => {
            if let Some(entry) = next.community_entries.iter_mut().find(|e| e.name == name) {
                entry.views = entry.views.saturating_add(1);
            }
        }
        Action::Sorted { key } => {
            query::sort(&mut next.summaries, key);
            query::sort(&mut next.community_entries, key);
        }
    }
    next
}
