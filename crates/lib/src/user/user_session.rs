//! User session management
//!
//! Represents an authenticated user for the lifetime of a login.

use super::types::{UserIdentity, UserProfile};

/// User session object, returned after successful login or registration
#[derive(Debug, Clone)]
pub struct UserSession {
    profile: UserProfile,
}

impl UserSession {
    pub fn new(profile: UserProfile) -> Self {
        Self { profile }
    }

    /// The identity lists and votes are attributed to.
    pub fn current_user(&self) -> UserIdentity {
        self.profile.identity()
    }

    pub fn profile(&self) -> &UserProfile {
        &self.profile
    }

    /// End the session, returning the profile that was logged in.
    pub fn logout(self) -> UserProfile {
        tracing::debug!(user_name = %self.profile.user_name, "Logged out");
        self.profile
    }
}
