//! Error types for the user system
use thiserror::Error;

#[non_exhaustive]
#[derive(Error, Debug)]
pub enum UserError {
    #[error("User not found: {user_name}")]
    UserNotFound { user_name: String },

    #[error("An account with user name '{user_name}' already exists")]
    DuplicateUserName { user_name: String },

    #[error("An account with email '{email}' already exists")]
    DuplicateEmail { email: String },

    #[error("Validation failed: {reason}")]
    ValidationFailed { reason: String },

    #[error("Incorrect password")]
    BadCredentials,

    #[error("Password hashing failed: {reason}")]
    HashingFailed { reason: String },
}

impl UserError {
    /// Check if this error indicates a resource was not found.
    pub fn is_not_found(&self) -> bool {
        matches!(self, UserError::UserNotFound { .. })
    }

    /// Check if this error is a rejected form submission.
    pub fn is_validation_error(&self) -> bool {
        matches!(self, UserError::ValidationFailed { .. })
    }

    /// Check if this error collides with an existing account.
    pub fn is_conflict(&self) -> bool {
        matches!(
            self,
            UserError::DuplicateUserName { .. } | UserError::DuplicateEmail { .. }
        )
    }

    /// Check if this error is a failed login.
    pub fn is_authentication_error(&self) -> bool {
        matches!(
            self,
            UserError::BadCredentials | UserError::UserNotFound { .. }
        )
    }
}

impl From<UserError> for crate::Error {
    fn from(err: UserError) -> Self {
        crate::Error::User(err)
    }
}
