//! In-memory list backend
//!
//! Suitable for tests, development, and the single-process server, which
//! saves the whole table to a JSON file on shutdown and loads it on start.

mod persistence;

use std::{any::Any, path::Path};

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::debug;

use super::{BackendError, ListBackend};
use crate::{
    Result,
    list::{ListId, NewList, Top5List},
};

/// A simple in-memory backend.
///
/// Lists are kept in creation order, which is the order `all_lists` returns
/// and therefore the order community aggregation sees them in.
#[derive(Debug, Default)]
pub struct InMemory {
    pub(crate) lists: RwLock<Vec<Top5List>>,
}

impl InMemory {
    /// Creates a new, empty `InMemory` backend.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a backend pre-populated with the given lists.
    pub fn with_lists(lists: Vec<Top5List>) -> Self {
        Self {
            lists: RwLock::new(lists),
        }
    }

    /// Number of stored lists.
    pub async fn len(&self) -> usize {
        self.lists.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.lists.read().await.is_empty()
    }

    /// Saves every stored list to a specified file as JSON.
    ///
    /// # Returns
    /// A `Result` indicating success or an I/O or serialization error.
    pub async fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        persistence::save_to_file(self, path).await
    }

    /// Loads the backend state from a specified JSON file.
    ///
    /// If the file does not exist, a new, empty `InMemory` backend is returned.
    pub async fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        persistence::load_from_file(path).await
    }
}

#[async_trait]
impl ListBackend for InMemory {
    async fn get_list(&self, id: ListId) -> Result<Top5List> {
        self.lists
            .read()
            .await
            .iter()
            .find(|l| l.id == id)
            .cloned()
            .ok_or_else(|| BackendError::ListNotFound { id }.into())
    }

    async fn all_lists(&self) -> Result<Vec<Top5List>> {
        Ok(self.lists.read().await.clone())
    }

    async fn create_list(&self, list: NewList) -> Result<Top5List> {
        let list = list.into_list(ListId::generate());
        debug!(id = %list.id, name = %list.name, "Created list");
        self.lists.write().await.push(list.clone());
        Ok(list)
    }

    async fn update_list(&self, id: ListId, mut list: Top5List) -> Result<Top5List> {
        let mut lists = self.lists.write().await;
        let slot = lists
            .iter_mut()
            .find(|l| l.id == id)
            .ok_or(BackendError::ListNotFound { id })?;
        list.id = id;
        *slot = list.clone();
        Ok(list)
    }

    async fn delete_list(&self, id: ListId) -> Result<()> {
        let mut lists = self.lists.write().await;
        let before = lists.len();
        lists.retain(|l| l.id != id);
        if lists.len() == before {
            return Err(BackendError::ListNotFound { id }.into());
        }
        debug!(%id, "Deleted list");
        Ok(())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
