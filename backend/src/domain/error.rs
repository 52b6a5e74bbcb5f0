//! Errors surfaced by the operations service.
//!
//! This is the whole vocabulary the presentation layer sees. Every variant
//! is recoverable by the user (retry, correct the input, or wait for the
//! running action); nothing here terminates the process. Advisor failures
//! never appear because they are absorbed inside search resolution.

use crate::domain::user::Role;

/// User-facing failure of a service operation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum OperationError {
    /// The single in-flight action token is already held.
    #[error("another action is still in progress; wait for it to finish")]
    ActionInProgress,
    /// A gated operation was attempted with no session identity.
    #[error("sign in to perform this action")]
    NotSignedIn,
    /// The session identity's role lacks the required capability.
    ///
    /// Raised before any store call is issued.
    #[error("{role} accounts may not {action}")]
    NotAuthorized {
        role: Role,
        action: &'static str,
    },
    /// A store call failed; the in-memory snapshot is unchanged.
    #[error("could not reach the booking store, please try again: {message}")]
    StoreUnavailable { message: String },
    /// Account creation hit the store's uniqueness check.
    #[error("the username \"{username}\" is already taken")]
    UsernameTaken { username: String },
    /// Sign-in did not match any stored account.
    #[error("username or password is incorrect")]
    InvalidCredentials,
}

impl OperationError {
    /// Helper for store connectivity failures.
    pub fn store_unavailable(message: impl Into<String>) -> Self {
        Self::StoreUnavailable {
            message: message.into(),
        }
    }

    /// Helper for duplicate-identity rejections.
    pub fn username_taken(username: impl Into<String>) -> Self {
        Self::UsernameTaken {
            username: username.into(),
        }
    }
}
