//! Row types for the hosted Postgres tables, as PostgREST serves them.
//!
//! Columns are snake_case on the wire; conversion into domain aggregates
//! revalidates every row so an inconsistent record (for example an assigned
//! booking without a provider) is reported instead of smuggled in.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::booking::{Booking, BookingDraft, BookingId, BookingStatus, BookingUpdate};
use crate::domain::catalog::{Category, ServiceId};
use crate::domain::registration::{RegistrationDraft, RegistrationForm};
use crate::domain::user::{Role, User, Username};

#[derive(Debug, Deserialize)]
pub(super) struct UserRow {
    username: String,
    password: String,
    role: Role,
    #[serde(default)]
    categories: Vec<Category>,
}

impl UserRow {
    pub(super) fn into_domain(self) -> Result<User, String> {
        let username = self.username.clone();
        User::new(self.username, self.password, self.role, self.categories)
            .map_err(|error| format!("user row \"{username}\": {error}"))
    }
}

#[derive(Debug, Deserialize)]
pub(super) struct BookingRow {
    id: String,
    service_id: String,
    customer_name: String,
    customer_phone: String,
    address: String,
    #[serde(default)]
    notes: Option<String>,
    status: BookingStatus,
    #[serde(default)]
    provider: Option<String>,
    created_at: DateTime<Utc>,
}

impl BookingRow {
    pub(super) fn into_domain(self) -> Result<Booking, String> {
        let id = self.id.clone();
        let provider = self
            .provider
            .map(Username::new)
            .transpose()
            .map_err(|error| format!("booking row \"{id}\": {error}"))?;
        Booking::new(
            BookingId::new(self.id),
            ServiceId::new(self.service_id),
            self.customer_name,
            self.customer_phone,
            self.address,
            self.notes,
            self.status,
            provider,
            self.created_at,
        )
        .map_err(|error| format!("booking row \"{id}\": {error}"))
    }
}

#[derive(Debug, Deserialize)]
pub(super) struct RegistrationRow {
    id: String,
    submitted_at: DateTime<Utc>,
    full_name: String,
    phone: String,
    city: String,
    experience_years: u8,
    #[serde(default)]
    categories: Vec<Category>,
}

impl RegistrationRow {
    pub(super) fn into_domain(self) -> RegistrationForm {
        RegistrationForm::new(
            self.id,
            self.submitted_at,
            RegistrationDraft {
                full_name: self.full_name,
                phone: self.phone,
                city: self.city,
                experience_years: self.experience_years,
                categories: self.categories,
            },
        )
    }
}

/// Insert payload for `bookings`; the database defaults id, timestamp, and
/// the pending status.
#[derive(Debug, Serialize)]
pub(super) struct NewBookingRow<'a> {
    service_id: &'a str,
    customer_name: &'a str,
    customer_phone: &'a str,
    address: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    notes: Option<&'a str>,
}

impl<'a> From<&'a BookingDraft> for NewBookingRow<'a> {
    fn from(draft: &'a BookingDraft) -> Self {
        Self {
            service_id: draft.service_id.as_str(),
            customer_name: draft.customer_name.as_str(),
            customer_phone: draft.customer_phone.as_str(),
            address: draft.address.as_str(),
            notes: draft.notes.as_deref(),
        }
    }
}

/// Insert payload for `registrations`.
#[derive(Debug, Serialize)]
pub(super) struct NewRegistrationRow<'a> {
    full_name: &'a str,
    phone: &'a str,
    city: &'a str,
    experience_years: u8,
    categories: &'a [Category],
}

impl<'a> From<&'a RegistrationDraft> for NewRegistrationRow<'a> {
    fn from(draft: &'a RegistrationDraft) -> Self {
        Self {
            full_name: draft.full_name.as_str(),
            phone: draft.phone.as_str(),
            city: draft.city.as_str(),
            experience_years: draft.experience_years,
            categories: draft.categories.as_slice(),
        }
    }
}

/// Insert payload for `users`.
#[derive(Debug, Serialize)]
pub(super) struct NewUserRow<'a> {
    username: &'a str,
    password: &'a str,
    role: Role,
    categories: &'a [Category],
}

impl<'a> From<&'a User> for NewUserRow<'a> {
    fn from(user: &'a User) -> Self {
        Self {
            username: user.username().as_str(),
            password: user.password(),
            role: user.role(),
            categories: user.categories(),
        }
    }
}

/// Patch payload for a lifecycle transition.
///
/// `provider` serializes even when absent: unassigning must write an
/// explicit SQL NULL, not omit the column.
#[derive(Debug, Serialize)]
pub(super) struct BookingPatchRow<'a> {
    status: BookingStatus,
    provider: Option<&'a str>,
}

impl<'a> From<&'a BookingUpdate> for BookingPatchRow<'a> {
    fn from(update: &'a BookingUpdate) -> Self {
        Self {
            status: update.status(),
            provider: update.provider().map(Username::as_str),
        }
    }
}
