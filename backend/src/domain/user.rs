//! Account records, roles, and the capability gate.
//!
//! Roles are deliberately thin: behaviour differences are expressed as
//! capability checks ([`Role::allows`]) in front of each state transition,
//! not as branches scattered through the services.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::domain::catalog::Category;

/// Validation errors returned by the account constructors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UserValidationError {
    /// Username was blank once trimmed.
    #[error("username must not be empty")]
    EmptyUsername,
    /// Username carried leading or trailing whitespace.
    #[error("username must not contain surrounding whitespace")]
    PaddedUsername,
    /// Password was empty.
    #[error("password must not be empty")]
    EmptyPassword,
}

/// Unique account identifier.
///
/// The store enforces uniqueness; this type enforces shape (non-empty,
/// trimmed) so lookups and equality checks never depend on normalisation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Username(String);

impl Username {
    /// Validate and construct a username.
    pub fn new(raw: impl Into<String>) -> Result<Self, UserValidationError> {
        let raw = raw.into();
        if raw.trim().is_empty() {
            return Err(UserValidationError::EmptyUsername);
        }
        if raw.trim() != raw {
            return Err(UserValidationError::PaddedUsername);
        }
        Ok(Self(raw))
    }

    /// Borrow the username as a string slice.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for Username {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl AsRef<str> for Username {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl From<Username> for String {
    fn from(value: Username) -> Self {
        value.0
    }
}

impl TryFrom<String> for Username {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Account role as stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    Admin,
    Provider,
}

impl Role {
    /// Whether this role may exercise `capability`.
    pub fn allows(self, capability: Capability) -> bool {
        match capability {
            Capability::AcceptBooking => self == Self::Provider,
            Capability::AssignBooking | Capability::ManageUsers => self == Self::Admin,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Admin => "admin",
            Self::Provider => "provider",
        })
    }
}

/// A privileged action gated on the acting identity's role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Capability {
    /// Self-assign an unclaimed booking.
    AcceptBooking,
    /// Assign or unassign any booking.
    AssignBooking,
    /// Create and delete accounts.
    ManageUsers,
}

impl Capability {
    /// Short action phrase used in authorization failures.
    pub fn action(self) -> &'static str {
        match self {
            Self::AcceptBooking => "accept bookings",
            Self::AssignBooking => "assign bookings",
            Self::ManageUsers => "manage accounts",
        }
    }
}

/// Stored account.
///
/// ## Invariants
/// - `username` is non-empty and trimmed.
/// - `password` is non-empty and compared verbatim; this system performs no
///   hashing (credential handling beyond collection is out of scope).
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[serde(deny_unknown_fields)]
pub struct User {
    username: Username,
    password: String,
    role: Role,
    #[serde(default)]
    categories: Vec<Category>,
}

impl User {
    /// Validate and construct an account record.
    pub fn new(
        username: impl Into<String>,
        password: impl Into<String>,
        role: Role,
        categories: Vec<Category>,
    ) -> Result<Self, UserValidationError> {
        let username = Username::new(username)?;
        let password = password.into();
        if password.is_empty() {
            return Err(UserValidationError::EmptyPassword);
        }
        Ok(Self {
            username,
            password,
            role,
            categories,
        })
    }

    pub fn username(&self) -> &Username {
        &self.username
    }

    /// Stored password, compared verbatim at sign-in.
    pub fn password(&self) -> &str {
        self.password.as_str()
    }

    pub fn role(&self) -> Role {
        self.role
    }

    /// Categories this account serves (providers only; empty for admins).
    pub fn categories(&self) -> &[Category] {
        self.categories.as_slice()
    }
}

impl fmt::Debug for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("User")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("role", &self.role)
            .field("categories", &self.categories)
            .finish()
    }
}
