//! Persistence error types for the list backend.
//!
//! This module defines structured error types for backend operations,
//! providing error context and type safety compared to string-based errors.

use thiserror::Error;

use crate::list::ListId;

/// Errors that can occur during backend operations.
///
/// # Stability
///
/// - New variants may be added in minor versions (enum is `#[non_exhaustive]`)
/// - Existing variants will not be removed in minor versions
/// - Helper methods like `is_*()` provide stable APIs
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum BackendError {
    /// List not found by ID.
    #[error("List not found: {id}")]
    ListNotFound {
        /// The ID of the list that was not found
        id: ListId,
    },

    /// Serialization failed.
    #[error("Serialization failed")]
    SerializationFailed {
        #[source]
        source: serde_json::Error,
    },

    /// Deserialization failed.
    #[error("Deserialization failed")]
    DeserializationFailed {
        #[source]
        source: serde_json::Error,
    },

    /// File I/O error.
    #[error("File I/O error")]
    FileIo {
        #[source]
        source: std::io::Error,
    },

    /// The backend refused or could not complete the request.
    #[error("Backend unavailable: {reason}")]
    Unavailable { reason: String },
}

impl BackendError {
    /// Check if this error indicates a resource was not found.
    pub fn is_not_found(&self) -> bool {
        matches!(self, BackendError::ListNotFound { .. })
    }

    /// Check if this error is related to I/O operations.
    pub fn is_io_error(&self) -> bool {
        matches!(
            self,
            BackendError::FileIo { .. }
                | BackendError::SerializationFailed { .. }
                | BackendError::DeserializationFailed { .. }
        )
    }

    /// Get the list ID if this error is about a specific list.
    pub fn list_id(&self) -> Option<ListId> {
        match self {
            BackendError::ListNotFound { id } => Some(*id),
            _ => None,
        }
    }
}

impl From<BackendError> for crate::Error {
    fn from(err: BackendError) -> Self {
        crate::Error::Backend(err)
    }
}
