//! Error types for list store operations.
//!
//! Every variant is a refusal: the store rejected the operation before any
//! persistence or state change happened.

use thiserror::Error;

use crate::{list::ListId, validation::PublishBlocker};

#[non_exhaustive]
#[derive(Debug, Error)]
pub enum StoreError {
    /// The caller tried to change a list owned by someone else
    #[error("List {id} is owned by another user")]
    NotOwner { id: ListId },

    /// The draft failed the publish gate
    #[error("List cannot be published: {} rule(s) violated", blockers.len())]
    NotPublishable { blockers: Vec<PublishBlocker> },

    /// Published lists are frozen
    #[error("List {id} is already published")]
    AlreadyPublished { id: ListId },

    /// Votes, comments and views need a published list
    #[error("List {id} is not published")]
    NotPublished { id: ListId },

    /// The operation needs an open list
    #[error("No list is currently open for editing")]
    NoCurrentList,

    /// `delete_marked` was called with nothing marked
    #[error("No list is marked for deletion")]
    NothingMarked,

    /// Draft field index outside the five items
    #[error("Item index {index} is out of range")]
    ItemIndexOutOfRange { index: usize },
}

impl StoreError {
    /// Check if this error indicates the caller does not own the target list
    pub fn is_permission_denied(&self) -> bool {
        matches!(self, StoreError::NotOwner { .. })
    }

    /// Check if this error is validation-related
    pub fn is_validation_error(&self) -> bool {
        matches!(
            self,
            StoreError::NotPublishable { .. }
                | StoreError::AlreadyPublished { .. }
                | StoreError::NotPublished { .. }
                | StoreError::ItemIndexOutOfRange { .. }
        )
    }

    /// Check if this error means the store was not in the state the operation needs
    pub fn is_invalid_state(&self) -> bool {
        matches!(self, StoreError::NoCurrentList | StoreError::NothingMarked)
    }

    /// The publish rules violated, if this is a publish refusal
    pub fn blockers(&self) -> &[PublishBlocker] {
        match self {
            StoreError::NotPublishable { blockers } => blockers,
            _ => &[],
        }
    }
}

impl From<StoreError> for crate::Error {
    fn from(err: StoreError) -> Self {
        crate::Error::Store(err)
    }
}
