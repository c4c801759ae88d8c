//!
//! Top-5 lists: ranked lists of five items, published to a community feed and
//! merged into community rankings.
//! This library provides the core components for building and driving a top-5 lists application.
//!
//! ## Core Concepts
//!
//! * **Lists (`list::Top5List`)**: A named, ranked list of exactly five items owned by one user.
//! * **Backends (`backend::ListBackend`)**: The pluggable persistence collaborator that stores lists.
//! * **List Store (`store::ListStore`)**: The per-session state container. Every operation ends in a
//!   single reducer transition that replaces the published [`store::StoreState`] snapshot wholesale.
//! * **Validation Gate (`validation`)**: Decides whether an in-edit draft may be published.
//! * **Community Aggregator (`community`)**: Merges all published lists sharing a name into a single
//!   point-weighted community list.
//! * **Sort/Search (`query`)**: Ordering and mode-scoped filtering of list collections.
//! * **Engagement (`engagement`)**: Likes, dislikes, views and comments.
//! * **Users (`user`)**: Account registration and login with Argon2id password hashing.

pub mod backend;
pub mod clock;
pub mod community;
pub mod constants;
pub mod engagement;
pub mod list;
pub mod query;
pub mod store;
pub mod user;
pub mod validation;

pub use clock::{Clock, SystemClock};
#[cfg(any(test, feature = "testing"))]
pub use clock::{ClockHold, FixedClock};
pub use community::CommunityEntry;
pub use list::{Draft, ListId, Top5List};
pub use query::{SortKey, ViewMode};
pub use store::{ListStore, StoreState};
pub use user::UserIdentity;

/// Result type used throughout the library.
pub type Result<T> = std::result::Result<T, Error>;

/// Common error type for the library.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),

    /// Structured persistence errors from the backend module
    #[error(transparent)]
    Backend(backend::BackendError),

    /// Structured account errors from the user module
    #[error(transparent)]
    User(user::UserError),

    /// Structured list store errors from the store module
    #[error(transparent)]
    Store(store::StoreError),
}

impl Error {
    /// Get the originating module for this error.
    pub fn module(&self) -> &'static str {
        match self {
            Error::Backend(_) => "backend",
            Error::User(_) => "user",
            Error::Store(_) => "store",
            Error::Io(_) => "io",
            Error::Serialize(_) => "serialize",
        }
    }

    /// Check if this error indicates a resource was not found.
    pub fn is_not_found(&self) -> bool {
        match self {
            Error::Backend(backend_err) => backend_err.is_not_found(),
            Error::User(user_err) => user_err.is_not_found(),
            _ => false,
        }
    }

    /// Check if this error indicates the caller does not own the target list.
    pub fn is_permission_denied(&self) -> bool {
        match self {
            Error::Store(store_err) => store_err.is_permission_denied(),
            _ => false,
        }
    }

    /// Check if this error is validation-related.
    pub fn is_validation_error(&self) -> bool {
        match self {
            Error::Store(store_err) => store_err.is_validation_error(),
            Error::User(user_err) => user_err.is_validation_error(),
            _ => false,
        }
    }

    /// Check if this error means the persistence collaborator did not acknowledge an operation.
    pub fn is_persistence_error(&self) -> bool {
        match self {
            Error::Backend(backend_err) => !backend_err.is_not_found(),
            Error::Io(_) | Error::Serialize(_) => true,
            _ => false,
        }
    }

    /// Check if this error is authentication-related.
    pub fn is_authentication_error(&self) -> bool {
        match self {
            Error::User(user_err) => user_err.is_authentication_error(),
            _ => false,
        }
    }

    /// Check if this error is a conflict with existing data.
    pub fn is_conflict(&self) -> bool {
        match self {
            Error::User(user_err) => user_err.is_conflict(),
            _ => false,
        }
    }
}
