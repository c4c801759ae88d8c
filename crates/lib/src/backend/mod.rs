//! Backend implementations for list storage
//!
//! The `ListBackend` trait defines the persistence collaborator the list store
//! talks to. This keeps the store logic independent of the storage mechanism.

use std::any::Any;

use async_trait::async_trait;

use crate::{
    Result,
    list::{ListId, NewList, Top5List},
};

pub mod errors;
mod in_memory;

pub use errors::BackendError;
pub use in_memory::InMemory;

/// Persistence collaborator for top-5 lists.
///
/// Every method is a single round-trip. An `Ok` is the backend's explicit
/// acknowledgement; callers must not change their own state on `Err`.
///
/// All implementations must be `Send` and `Sync` to allow sharing across
/// sessions, and implement `Any` to allow for downcasting if needed.
#[async_trait]
pub trait ListBackend: Send + Sync + Any {
    /// Retrieves a list by id.
    ///
    /// # Returns
    /// The list, or `BackendError::ListNotFound`.
    async fn get_list(&self, id: ListId) -> Result<Top5List>;

    /// Retrieves every stored list. These are the summaries the store filters by mode.
    async fn all_lists(&self) -> Result<Vec<Top5List>>;

    /// Stores a new list under a freshly generated id and returns it.
    async fn create_list(&self, list: NewList) -> Result<Top5List>;

    /// Replaces the stored record for `id` and returns what was stored.
    async fn update_list(&self, id: ListId, list: Top5List) -> Result<Top5List>;

    /// Removes a list.
    async fn delete_list(&self, id: ListId) -> Result<()>;

    /// Returns a reference to the backend instance as `Any`, for downcasting.
    fn as_any(&self) -> &dyn Any;
}
