//! User system
//!
//! Account registration and login with Argon2id password hashing, and the
//! session identity that list ownership and engagement are attributed to.

pub mod crypto;
pub mod directory;
pub mod errors;
pub mod types;
pub mod user_session;

pub use directory::{AccountService, UserDirectory};
pub use errors::UserError;
pub use types::*;
pub use user_session::UserSession;
