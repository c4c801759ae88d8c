//! The list store.
//!
//! A [`ListStore`] is one user's session over the list backend. Operations
//! take `&mut self`, wait on the backend where they must, and finish with one
//! reducer transition that replaces the published [`StoreState`] snapshot.
//!
//! Any operation that returns `Err` has left the snapshot untouched. Backend
//! writes happen before the transition, so a write the backend did not
//! acknowledge never shows up locally. Once a write is acknowledged the
//! operation completes, even if the follow-up reload fails.

mod affordances;
mod errors;
mod state;

use std::sync::Arc;

use tokio::sync::watch;
use tracing::{debug, info, warn};

#[cfg(any(test, feature = "testing"))]
pub use affordances::{Affordance, RecordingAffordances};
pub use affordances::{Affordances, NoopAffordances};
pub use errors::StoreError;
pub use state::{Action, Collection, StoreState, reduce};

use crate::{
    Clock, Result, SystemClock,
    backend::ListBackend,
    community::{self, CommunityEntry},
    engagement,
    list::{Draft, ListId, NewList, Top5List},
    query::{self, SortKey, ViewMode},
    user::UserIdentity,
    validation,
};

/// What an acknowledged write did, for patching a stale collection.
enum Written<'a> {
    Updated(&'a Top5List),
    Deleted(ListId),
}

/// Per-session state container over a shared [`ListBackend`].
pub struct ListStore {
    backend: Arc<dyn ListBackend>,
    identity: UserIdentity,
    clock: Arc<dyn Clock>,
    affordances: Arc<dyn Affordances>,
    state: watch::Sender<Arc<StoreState>>,
    /// Every list as of the moment the current list was opened. Used to
    /// evaluate the publish gate after each edit without a round-trip.
    publish_context: Vec<Top5List>,
}

impl std::fmt::Debug for ListStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ListStore")
            .field("identity", &self.identity)
            .field("state", &self.state())
            .finish_non_exhaustive()
    }
}

impl ListStore {
    /// Create a store for `identity` with the system clock and no UI attached.
    pub fn new(backend: Arc<dyn ListBackend>, identity: UserIdentity) -> Self {
        let (state, _) = watch::channel(Arc::new(StoreState::default()));
        Self {
            backend,
            identity,
            clock: Arc::new(SystemClock),
            affordances: Arc::new(NoopAffordances),
            state,
            publish_context: Vec::new(),
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn with_affordances(mut self, affordances: Arc<dyn Affordances>) -> Self {
        self.affordances = affordances;
        self
    }

    pub fn identity(&self) -> &UserIdentity {
        &self.identity
    }

    pub fn backend(&self) -> &Arc<dyn ListBackend> {
        &self.backend
    }

    /// The current snapshot.
    pub fn state(&self) -> Arc<StoreState> {
        self.state.borrow().clone()
    }

    /// Watch for new snapshots. Each transition publishes exactly one.
    pub fn subscribe(&self) -> watch::Receiver<Arc<StoreState>> {
        self.state.subscribe()
    }

    fn dispatch(&mut self, action: Action) {
        debug!(action = action.name(), "Store transition");
        let next = reduce(&self.state.borrow(), action);
        self.state.send_replace(Arc::new(next));
    }

    /// Fetch the collection `mode` shows, narrowed by `text`.
    async fn fetch_collection(&self, mode: ViewMode, text: &str) -> Result<Collection> {
        let lists = self.backend.all_lists().await?;
        Ok(match mode {
            ViewMode::Community => Collection {
                summaries: Vec::new(),
                community_entries: self.community_from(&lists, text),
            },
            _ => Collection {
                summaries: query::search_lists(mode, &lists, &self.identity, text),
                community_entries: Vec::new(),
            },
        })
    }

    fn community_from(&self, lists: &[Top5List], text: &str) -> Vec<CommunityEntry> {
        let entries = community::aggregate(lists, self.clock.now());
        query::search_entries(&entries, text)
    }

    /// Reload whatever the store is showing, keeping the active search.
    async fn reload(&self) -> Result<Collection> {
        let state = self.state();
        self.fetch_collection(state.mode, &state.query).await
    }

    /// Reload after an acknowledged write.
    ///
    /// If the reload fails, the visible collection is kept with `written`
    /// patched in, so the local view still reflects the write.
    async fn reload_after_write(&self, written: Written<'_>) -> Collection {
        match self.reload().await {
            Ok(collection) => collection,
            Err(err) => {
                warn!(error = %err, "Reload after write failed, keeping the visible collection");
                let state = self.state();
                let mut summaries = state.summaries.clone();
                match written {
                    Written::Updated(list) => {
                        if let Some(slot) = summaries.iter_mut().find(|l| l.id == list.id) {
                            *slot = list.clone();
                        }
                    }
                    Written::Deleted(id) => summaries.retain(|l| l.id != id),
                }
                Collection {
                    summaries,
                    community_entries: state.community_entries.clone(),
                }
            }
        }
    }

    fn emit_publish_gate(&self, draft: &Draft) -> bool {
        let publishable = validation::is_publishable(draft, &self.publish_context, draft.id);
        self.affordances.set_publish_enabled(publishable);
        publishable
    }

    fn require_owner(&self, list: &Top5List) -> Result<()> {
        if list.is_owned_by(&self.identity) {
            return Ok(());
        }
        warn!(id = %list.id, user = %self.identity.user_name, "Refused: not the owner");
        Err(StoreError::NotOwner { id: list.id }.into())
    }

    fn open(&self) -> Result<(Top5List, Draft)> {
        let state = self.state();
        match (&state.current_list, &state.draft) {
            (Some(list), Some(draft)) => Ok((list.clone(), draft.clone())),
            _ => Err(StoreError::NoCurrentList.into()),
        }
    }

    // === Viewing ===

    /// Show `mode`'s collection, clearing any search.
    ///
    /// `Mine` shows the caller's lists, `Published` and `ByUser` show published
    /// lists, and `Community` shows aggregated entries with no summaries.
    pub async fn load_summaries(&mut self, mode: ViewMode) -> Result<()> {
        let collection = self.fetch_collection(mode, "").await?;
        self.dispatch(Action::Loaded {
            mode,
            query: String::new(),
            collection,
        });
        Ok(())
    }

    /// Switch viewing mode and load it.
    pub async fn change_mode(&mut self, mode: ViewMode) -> Result<()> {
        debug!(%mode, "Changing mode");
        self.load_summaries(mode).await
    }

    /// Reload the current mode, honoring the active search.
    pub async fn refresh(&mut self) -> Result<()> {
        let state = self.state();
        let collection = self.reload().await?;
        self.dispatch(Action::Loaded {
            mode: state.mode,
            query: state.query.clone(),
            collection,
        });
        Ok(())
    }

    /// Search the current mode. Empty `text` clears the search.
    pub async fn search(&mut self, text: &str) -> Result<()> {
        let mode = self.state().mode;
        let collection = self.fetch_collection(mode, text).await?;
        self.dispatch(Action::Loaded {
            mode,
            query: text.to_string(),
            collection,
        });
        Ok(())
    }

    /// Reorder the visible lists and community entries.
    pub fn sort(&mut self, key: SortKey) {
        self.dispatch(Action::Sorted { key });
    }

    // === Editing ===

    /// Create `Untitled<N>` with placeholder items and open it.
    pub async fn create_new_list(&mut self) -> Result<Top5List> {
        let counter = self.state().new_list_counter;
        let context = self.backend.all_lists().await?;
        let list = self
            .backend
            .create_list(NewList::untitled(counter, &self.identity, self.clock.now()))
            .await?;

        info!(id = %list.id, name = %list.name, "Created list");
        self.publish_context = context;
        self.dispatch(Action::ListCreated { list: list.clone() });
        self.affordances.disable_editing();
        self.affordances.set_publish_enabled(false);
        Ok(list)
    }

    /// Open one of the caller's lists for editing.
    ///
    /// Refused with [`StoreError::NotOwner`] when the caller does not own it.
    pub async fn set_current(&mut self, id: ListId) -> Result<Top5List> {
        let list = self.backend.get_list(id).await?;
        self.require_owner(&list)?;
        let context = self.backend.all_lists().await?;

        self.publish_context = context;
        self.dispatch(Action::CurrentListSet { list: list.clone() });
        self.affordances.disable_editing();
        self.emit_publish_gate(&list.draft());
        Ok(list)
    }

    /// Change one item of the draft. Returns whether the draft is now publishable.
    pub fn update_item(&mut self, index: usize, value: &str) -> Result<bool> {
        let (_, mut draft) = self.open()?;
        if !draft.set_item(index, value) {
            return Err(StoreError::ItemIndexOutOfRange { index }.into());
        }
        let publishable = self.emit_publish_gate(&draft);
        self.dispatch(Action::DraftEdited { draft });
        Ok(publishable)
    }

    /// Change the draft name. Returns whether the draft is now publishable.
    pub fn rename_draft(&mut self, name: &str) -> Result<bool> {
        let (_, mut draft) = self.open()?;
        draft.name = name.to_string();
        let publishable = self.emit_publish_gate(&draft);
        self.dispatch(Action::DraftEdited { draft });
        Ok(publishable)
    }

    /// Persist the draft's changed fields into the open list.
    ///
    /// Only changed fields are written over the latest stored record, so votes
    /// and views recorded meanwhile are kept. The record is persisted once.
    pub async fn commit_edits(&mut self) -> Result<Top5List> {
        let (current, draft) = self.open()?;
        let mut list = self.backend.get_list(current.id).await?;
        self.require_owner(&list)?;
        if list.published {
            return Err(StoreError::AlreadyPublished { id: list.id }.into());
        }

        let changes = draft.apply_to(&mut list);
        let stored = self.backend.update_list(list.id, list).await?;
        debug!(
            id = %stored.id,
            items = ?changes.items,
            renamed = changes.renamed,
            "Committed edits"
        );
        self.dispatch(Action::EditsCommitted {
            list: stored.clone(),
        });
        Ok(stored)
    }

    /// Publish the open list and close it.
    ///
    /// The gate is re-checked against a fresh snapshot of every list. The
    /// draft's edits and the publish flags are written in one update.
    pub async fn publish(&mut self) -> Result<Top5List> {
        let (current, draft) = self.open()?;
        let lists = self.backend.all_lists().await?;
        let blockers = validation::publish_blockers(&draft, &lists, current.id);
        if !blockers.is_empty() {
            warn!(id = %current.id, ?blockers, "Refused: list not publishable");
            return Err(StoreError::NotPublishable { blockers }.into());
        }

        let mut list = self.backend.get_list(current.id).await?;
        self.require_owner(&list)?;
        if list.published {
            return Err(StoreError::AlreadyPublished { id: list.id }.into());
        }
        draft.apply_to(&mut list);
        list.published = true;
        list.published_date = Some(self.clock.now());
        list.comments.clear();

        let stored = self.backend.update_list(list.id, list).await?;
        let collection = self.reload_after_write(Written::Updated(&stored)).await;

        info!(id = %stored.id, name = %stored.name, "Published list");
        self.dispatch(Action::Published { collection });
        self.affordances.enable_editing();
        Ok(stored)
    }

    /// Close the open list without saving.
    pub fn close_current(&mut self) {
        self.dispatch(Action::CurrentClosed);
        self.affordances.enable_editing();
    }

    /// Rename a list outside the draft flow and persist immediately.
    pub async fn change_list_name(&mut self, id: ListId, name: &str) -> Result<Top5List> {
        let mut list = self.backend.get_list(id).await?;
        self.require_owner(&list)?;
        if list.published {
            return Err(StoreError::AlreadyPublished { id }.into());
        }
        list.name = name.to_string();

        let stored = self.backend.update_list(id, list).await?;
        let collection = self.reload_after_write(Written::Updated(&stored)).await;
        self.dispatch(Action::ListChanged {
            list: stored.clone(),
            collection,
        });
        Ok(stored)
    }

    // === Deletion ===

    /// First phase of deletion: remember which list to delete.
    pub async fn mark_for_deletion(&mut self, id: ListId) -> Result<Top5List> {
        let list = self.backend.get_list(id).await?;
        self.dispatch(Action::MarkedForDeletion { list: list.clone() });
        Ok(list)
    }

    pub fn unmark(&mut self) {
        self.dispatch(Action::Unmarked);
    }

    /// Second phase of deletion. Ownership is checked against the stored record.
    pub async fn delete_marked(&mut self) -> Result<()> {
        let marked = self
            .state()
            .list_marked_for_deletion
            .clone()
            .ok_or(StoreError::NothingMarked)?;
        let list = self.backend.get_list(marked.id).await?;
        self.require_owner(&list)?;

        self.backend.delete_list(list.id).await?;
        let collection = self.reload_after_write(Written::Deleted(list.id)).await;

        info!(id = %list.id, name = %list.name, "Deleted list");
        self.dispatch(Action::Deleted {
            id: list.id,
            collection,
        });
        Ok(())
    }

    // === Engagement ===

    /// Apply `change` to the stored list, persist it if anything changed, and reload.
    ///
    /// Only published lists take votes, comments and views.
    async fn engage<F>(&mut self, id: ListId, change: F) -> Result<Top5List>
    where
        F: FnOnce(&mut Top5List, &str) -> bool + Send,
    {
        let mut list = self.backend.get_list(id).await?;
        if !list.published {
            warn!(id = %id, user = %self.identity.user_name, "Refused: list not published");
            return Err(StoreError::NotPublished { id }.into());
        }
        if !change(&mut list, &self.identity.user_name) {
            return Ok(list);
        }

        let stored = self.backend.update_list(id, list).await?;
        let collection = self.reload_after_write(Written::Updated(&stored)).await;
        self.dispatch(Action::ListChanged {
            list: stored.clone(),
            collection,
        });
        Ok(stored)
    }

    pub async fn like(&mut self, id: ListId) -> Result<Top5List> {
        self.engage(id, engagement::like).await
    }

    pub async fn dislike(&mut self, id: ListId) -> Result<Top5List> {
        self.engage(id, engagement::dislike).await
    }

    /// Append `"<user name> <text>"` to the list's comments.
    pub async fn add_comment(&mut self, id: ListId, text: &str) -> Result<Top5List> {
        let text = text.to_string();
        self.engage(id, move |list, user_name| {
            engagement::add_comment(list, user_name, &text);
            true
        })
        .await
    }

    /// Count a view. Not deduplicated per viewer.
    pub async fn add_view(&mut self, id: ListId) -> Result<Top5List> {
        self.engage(id, |list, _| {
            engagement::add_view(list);
            true
        })
        .await
    }

    // === Community ===

    /// Rebuild community entries from a fresh snapshot.
    ///
    /// In community mode the active search still applies.
    pub async fn refresh_community(&mut self) -> Result<Vec<CommunityEntry>> {
        let state = self.state();
        let text = match state.mode {
            ViewMode::Community => state.query.as_str(),
            _ => "",
        };
        let lists = self.backend.all_lists().await?;
        let entries = self.community_from(&lists, text);
        self.dispatch(Action::CommunityRefreshed {
            entries: entries.clone(),
        });
        Ok(entries)
    }

    /// Count a local view of the community entry named exactly `name`.
    ///
    /// Never persisted; the count resets on the next aggregation. Returns
    /// whether an entry matched.
    pub fn add_community_view(&mut self, name: &str) -> bool {
        if self.state().community_entry(name).is_none() {
            return false;
        }
        self.dispatch(Action::CommunityViewAdded {
            name: name.to_string(),
        });
        true
    }
}
