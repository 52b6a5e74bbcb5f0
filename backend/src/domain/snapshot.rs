//! The wholesale-replaced view of store state.

use serde::Serialize;

use crate::domain::booking::Booking;
use crate::domain::registration::RegistrationForm;
use crate::domain::user::User;

/// One authoritative read of the three store collections.
///
/// The snapshot is a value: resynchronization replaces it in full, and no
/// code path patches it in place. The three collections are fetched as an
/// unordered batch with no cross-collection guarantee, so a booking may
/// reference a user deleted moments earlier; consumers must not assume
/// referential integrity inside one snapshot.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub users: Vec<User>,
    pub bookings: Vec<Booking>,
    pub registrations: Vec<RegistrationForm>,
}

impl Snapshot {
    /// Look up a user by username.
    pub fn user(&self, username: &str) -> Option<&User> {
        self.users
            .iter()
            .find(|user| user.username().as_str() == username)
    }

    /// Look up a booking by id.
    pub fn booking(&self, id: &str) -> Option<&Booking> {
        self.bookings.iter().find(|b| b.id().as_str() == id)
    }
}
