//! Account directory
//!
//! Registration and login against an in-memory account table that can be
//! saved to and loaded from a JSON file.

use std::{collections::BTreeMap, path::Path, sync::Arc};

use async_trait::async_trait;
use serde::{Deserialize, Deserializer, Serialize};
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use super::{
    crypto::{hash_password, verify_password},
    errors::UserError,
    types::{Registration, UserInfo, UserProfile},
};
use crate::{Clock, Error, Result, SystemClock, backend::BackendError, constants::MIN_PASSWORD_LENGTH};

/// Authentication collaborator.
#[async_trait]
pub trait AccountService: Send + Sync {
    /// Create an account and return its public profile.
    ///
    /// # Errors
    /// `ValidationFailed` for missing fields, a short password or mismatched
    /// confirmation; `DuplicateUserName` / `DuplicateEmail` on collisions.
    async fn register(&self, registration: Registration) -> Result<UserProfile>;

    /// Check credentials and return the account's public profile.
    async fn login(&self, user_name: &str, password: &str) -> Result<UserProfile>;
}

/// In-memory account table keyed by user name.
#[derive(Debug)]
pub struct UserDirectory {
    users: RwLock<BTreeMap<String, UserInfo>>,
    clock: Arc<dyn Clock>,
}

impl Default for UserDirectory {
    fn default() -> Self {
        Self::new()
    }
}

impl UserDirectory {
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    /// Create an empty directory that stamps accounts with the given clock.
    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self {
            users: RwLock::new(BTreeMap::new()),
            clock,
        }
    }

    /// Number of registered accounts.
    pub async fn len(&self) -> usize {
        self.users.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.users.read().await.is_empty()
    }

    /// Look up an account by user name.
    pub async fn get(&self, user_name: &str) -> Result<UserInfo> {
        self.users
            .read()
            .await
            .get(user_name)
            .cloned()
            .ok_or_else(|| {
                UserError::UserNotFound {
                    user_name: user_name.to_string(),
                }
                .into()
            })
    }

    /// Saves all accounts to a JSON file.
    pub async fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let users = self.users.read().await.values().cloned().collect();
        let file = DirectoryFile {
            version: PERSISTENCE_VERSION,
            users,
        };
        let json = serde_json::to_string_pretty(&file)
            .map_err(|e| -> Error { BackendError::SerializationFailed { source: e }.into() })?;
        tokio::fs::write(path, json)
            .await
            .map_err(|e| -> Error { BackendError::FileIo { source: e }.into() })
    }

    /// Loads accounts from a JSON file. A missing file yields an empty directory.
    pub async fn load_from_file<P: AsRef<Path>>(path: P, clock: Arc<dyn Clock>) -> Result<Self> {
        match tokio::fs::read_to_string(path).await {
            Ok(json) => {
                let file: DirectoryFile = serde_json::from_str(&json).map_err(|e| -> Error {
                    BackendError::DeserializationFailed { source: e }.into()
                })?;
                let users = file
                    .users
                    .into_iter()
                    .map(|u| (u.user_name.clone(), u))
                    .collect();
                Ok(Self {
                    users: RwLock::new(users),
                    clock,
                })
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Self::with_clock(clock)),
            Err(e) => Err(BackendError::FileIo { source: e }.into()),
        }
    }
}

#[async_trait]
impl AccountService for UserDirectory {
    async fn register(&self, registration: Registration) -> Result<UserProfile> {
        validate_registration(&registration)?;

        let mut users = self.users.write().await;
        if users.contains_key(&registration.user_name) {
            warn!(user_name = %registration.user_name, "Registration refused: user name taken");
            return Err(UserError::DuplicateUserName {
                user_name: registration.user_name,
            }
            .into());
        }
        if users.values().any(|u| u.email == registration.email) {
            warn!(email = %registration.email, "Registration refused: email taken");
            return Err(UserError::DuplicateEmail {
                email: registration.email,
            }
            .into());
        }

        let info = UserInfo {
            first_name: registration.first_name,
            last_name: registration.last_name,
            user_name: registration.user_name,
            email: registration.email,
            password_hash: hash_password(&registration.password)?,
            created_at: self.clock.now(),
        };
        let profile = UserProfile::from(&info);
        info!(user_name = %info.user_name, "Registered account");
        users.insert(info.user_name.clone(), info);
        Ok(profile)
    }

    async fn login(&self, user_name: &str, password: &str) -> Result<UserProfile> {
        if user_name.is_empty() || password.is_empty() {
            return Err(validation_failed("Please enter all required fields."));
        }

        let info = self.get(user_name).await?;
        if let Err(e) = verify_password(password, &info.password_hash) {
            warn!(user_name, "Login refused");
            return Err(e);
        }
        debug!(user_name, "Logged in");
        Ok(UserProfile::from(&info))
    }
}

fn validation_failed(reason: &str) -> Error {
    UserError::ValidationFailed {
        reason: reason.to_string(),
    }
    .into()
}

fn validate_registration(r: &Registration) -> Result<()> {
    let fields = [
        &r.first_name,
        &r.last_name,
        &r.user_name,
        &r.email,
        &r.password,
        &r.password_verify,
    ];
    if fields.iter().any(|f| f.is_empty()) {
        return Err(validation_failed("Please enter all required fields."));
    }
    if r.password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(validation_failed(&format!(
            "Please enter a password of at least {MIN_PASSWORD_LENGTH} characters."
        )));
    }
    if r.password != r.password_verify {
        return Err(validation_failed("Please enter the same password twice."));
    }
    Ok(())
}

const PERSISTENCE_VERSION: u8 = 0;

fn is_v0(v: &u8) -> bool {
    *v == 0
}

fn validate_persistence_version<'de, D>(deserializer: D) -> std::result::Result<u8, D::Error>
where
    D: Deserializer<'de>,
{
    let version = u8::deserialize(deserializer)?;
    if version != PERSISTENCE_VERSION {
        return Err(serde::de::Error::custom(format!(
            "unsupported persistence version {version}; only version {PERSISTENCE_VERSION} is supported"
        )));
    }
    Ok(version)
}

#[derive(Serialize, Deserialize)]
struct DirectoryFile {
    #[serde(
        rename = "_v",
        default,
        skip_serializing_if = "is_v0",
        deserialize_with = "validate_persistence_version"
    )]
    version: u8,
    users: Vec<UserInfo>,
}
