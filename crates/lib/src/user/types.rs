//! Core data types for the user system

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The authenticated caller, as seen by the list store.
///
/// Lists are owned by email; votes and comments are attributed by user name.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserIdentity {
    pub email: String,
    pub user_name: String,
}

impl UserIdentity {
    pub fn new(email: impl Into<String>, user_name: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            user_name: user_name.into(),
        }
    }
}

/// Account record stored in the user directory.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserInfo {
    pub first_name: String,
    pub last_name: String,
    /// Unique login name
    pub user_name: String,
    /// Unique email, also the list ownership key
    pub email: String,
    /// Argon2id hash in PHC format
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

impl UserInfo {
    pub fn identity(&self) -> UserIdentity {
        UserIdentity::new(&self.email, &self.user_name)
    }
}

/// Public profile returned to clients after login or registration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub first_name: String,
    pub last_name: String,
    pub user_name: String,
    pub email: String,
}

impl From<&UserInfo> for UserProfile {
    fn from(info: &UserInfo) -> Self {
        Self {
            first_name: info.first_name.clone(),
            last_name: info.last_name.clone(),
            user_name: info.user_name.clone(),
            email: info.email.clone(),
        }
    }
}

impl UserProfile {
    pub fn identity(&self) -> UserIdentity {
        UserIdentity::new(&self.email, &self.user_name)
    }
}

/// Registration form fields.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Registration {
    pub first_name: String,
    pub last_name: String,
    pub user_name: String,
    pub email: String,
    pub password: String,
    pub password_verify: String,
}
