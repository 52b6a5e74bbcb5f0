//! Booking aggregate and its two-state lifecycle.
//!
//! A booking is created `Pending` with no provider and moves to `Assigned`
//! when a provider claims it or an administrator assigns one. Assignment and
//! status travel together: a booking is `Assigned` exactly when it carries a
//! provider, and [`BookingUpdate`] is the only vocabulary the services use to
//! describe a transition.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::catalog::ServiceId;
use crate::domain::user::Username;

/// Validation errors returned by [`Booking::new`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BookingValidationError {
    /// Booking id was blank.
    #[error("booking id must not be empty")]
    EmptyId,
    /// Status and provider disagree.
    #[error("a booking is assigned exactly when it has a provider")]
    StatusWithoutProvider,
}

/// Store-assigned booking identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BookingId(String);

impl BookingId {
    /// Wrap a raw identifier.
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// Borrow the identifier as a string slice.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl std::fmt::Display for BookingId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lifecycle state of a booking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BookingStatus {
    /// Entry state: created by a customer, no provider yet.
    Pending,
    /// A provider has been attached, by self-claim or administrator action.
    Assigned,
}

/// Customer-supplied fields for a new booking.
///
/// The store assigns id, creation time, and the entry status; none of those
/// appear here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingDraft {
    pub service_id: ServiceId,
    pub customer_name: String,
    pub customer_phone: String,
    pub address: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// The two fields a lifecycle transition is allowed to touch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingUpdate {
    status: BookingStatus,
    provider: Option<Username>,
}

impl BookingUpdate {
    /// A provider claiming an unclaimed booking for themselves.
    pub fn accepted_by(provider: Username) -> Self {
        Self {
            status: BookingStatus::Assigned,
            provider: Some(provider),
        }
    }

    /// An administrator attaching a provider, or detaching one.
    ///
    /// `None` is an explicit unassign: the booking returns to `Pending`
    /// with no provider rather than lingering assigned-to-nobody.
    pub fn assigned_to(provider: Option<Username>) -> Self {
        match provider {
            Some(provider) => Self {
                status: BookingStatus::Assigned,
                provider: Some(provider),
            },
            None => Self {
                status: BookingStatus::Pending,
                provider: None,
            },
        }
    }

    pub fn status(&self) -> BookingStatus {
        self.status
    }

    pub fn provider(&self) -> Option<&Username> {
        self.provider.as_ref()
    }
}

/// A customer's request for one catalog service.
///
/// ## Invariants
/// - `status` is `Assigned` if and only if `provider` is set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    id: BookingId,
    service_id: ServiceId,
    customer_name: String,
    customer_phone: String,
    address: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    notes: Option<String>,
    status: BookingStatus,
    provider: Option<Username>,
    created_at: DateTime<Utc>,
}

impl Booking {
    /// Validate and construct a booking as read back from the store.
    #[expect(clippy::too_many_arguments, reason = "store row constructor")]
    pub fn new(
        id: BookingId,
        service_id: ServiceId,
        customer_name: impl Into<String>,
        customer_phone: impl Into<String>,
        address: impl Into<String>,
        notes: Option<String>,
        status: BookingStatus,
        provider: Option<Username>,
        created_at: DateTime<Utc>,
    ) -> Result<Self, BookingValidationError> {
        if id.as_str().is_empty() {
            return Err(BookingValidationError::EmptyId);
        }
        if (status == BookingStatus::Assigned) != provider.is_some() {
            return Err(BookingValidationError::StatusWithoutProvider);
        }
        Ok(Self {
            id,
            service_id,
            customer_name: customer_name.into(),
            customer_phone: customer_phone.into(),
            address: address.into(),
            notes,
            status,
            provider,
            created_at,
        })
    }

    pub fn id(&self) -> &BookingId {
        &self.id
    }
    pub fn service_id(&self) -> &ServiceId {
        &self.service_id
    }
    pub fn customer_name(&self) -> &str {
        self.customer_name.as_str()
    }
    pub fn customer_phone(&self) -> &str {
        self.customer_phone.as_str()
    }
    pub fn address(&self) -> &str {
        self.address.as_str()
    }
    pub fn notes(&self) -> Option<&str> {
        self.notes.as_deref()
    }
    pub fn status(&self) -> BookingStatus {
        self.status
    }
    pub fn provider(&self) -> Option<&Username> {
        self.provider.as_ref()
    }
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}
