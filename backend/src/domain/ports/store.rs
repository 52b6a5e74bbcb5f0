//! Port for the hosted marketplace data store.
//!
//! The store is the sole authority for users, bookings, and registrations.
//! The contract is deliberately coarse: mutations return nothing (the caller
//! resynchronizes instead of merging a response), no operation is assumed
//! idempotent, and [`MarketplaceStore::fetch_all`] reads the three
//! collections as one unordered batch without cross-collection guarantees.

use async_trait::async_trait;

use crate::domain::booking::{BookingDraft, BookingId, BookingUpdate};
use crate::domain::registration::RegistrationDraft;
use crate::domain::snapshot::Snapshot;
use crate::domain::user::{User, Username};

use super::macros::define_port_error;

define_port_error! {
    /// Failures raised by store adapters.
    pub enum StoreError {
        /// The store could not be reached (transport, timeout, TLS).
        Connection { message: String } => "store connection failed: {message}",
        /// The store answered but the operation failed or decoded badly.
        Query { message: String } => "store query failed: {message}",
        /// Account creation collided with an existing username.
        DuplicateUsername { username: String } => "username already exists: {username}",
    }
}

/// Asynchronous CRUD surface of the data store.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MarketplaceStore: Send + Sync {
    /// Read users, bookings, and registrations as one batch.
    async fn fetch_all(&self) -> Result<Snapshot, StoreError>;

    /// Insert a booking; the store assigns id, timestamp, and entry status.
    async fn create_booking(&self, draft: &BookingDraft) -> Result<(), StoreError>;

    /// Insert an onboarding submission.
    async fn create_registration(&self, draft: &RegistrationDraft) -> Result<(), StoreError>;

    /// Insert an account.
    ///
    /// Fails with [`StoreError::DuplicateUsername`] when the username is
    /// already present.
    async fn create_user(&self, user: &User) -> Result<(), StoreError>;

    /// Delete an account by username.
    async fn delete_user(&self, username: &Username) -> Result<(), StoreError>;

    /// Apply a lifecycle transition to one booking.
    ///
    /// No compare-and-swap is performed: concurrent writers resolve to
    /// whichever update the store applies last.
    async fn update_booking(&self, id: &BookingId, update: &BookingUpdate)
        -> Result<(), StoreError>;
}
