//! Sign-in credentials.
//!
//! Credential collection happens in the presentation layer; this type only
//! normalises and validates what arrives before the session service compares
//! it against the snapshot. No hashing or credential storage lives here.

use zeroize::Zeroizing;

/// Validation errors for [`LoginCredentials`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CredentialsError {
    /// Username was missing or blank once trimmed.
    #[error("enter a username")]
    EmptyUsername,
    /// Password was blank.
    #[error("enter a password")]
    EmptyPassword,
}

/// Validated sign-in input.
///
/// ## Invariants
/// - `username` is trimmed and non-empty.
/// - `password` is non-empty and kept verbatim (surrounding whitespace is
///   significant), wrapped so it is wiped from memory on drop.
#[derive(Debug, Clone)]
pub struct LoginCredentials {
    username: String,
    password: Zeroizing<String>,
}

impl LoginCredentials {
    /// Construct credentials from raw form input.
    pub fn new(username: &str, password: &str) -> Result<Self, CredentialsError> {
        let username = username.trim();
        if username.is_empty() {
            return Err(CredentialsError::EmptyUsername);
        }
        if password.is_empty() {
            return Err(CredentialsError::EmptyPassword);
        }
        Ok(Self {
            username: username.to_owned(),
            password: Zeroizing::new(password.to_owned()),
        })
    }

    /// Username to look up.
    pub fn username(&self) -> &str {
        self.username.as_str()
    }

    /// Password as entered.
    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}
