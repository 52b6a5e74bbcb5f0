//! Domain entities, ports, and application services.
//!
//! Everything in this module is I/O free. The two application services,
//! [`RecommendationService`] for search resolution and [`OperationsService`]
//! for serialized mutations, talk to the outside world exclusively through
//! the traits in [`ports`], so adapters stay swappable and tests run against
//! mocks or in-memory stand-ins.

pub mod auth;
pub mod booking;
pub mod catalog;
pub mod error;
pub mod operations;
pub mod ports;
pub mod recommendation;
pub mod registration;
pub mod snapshot;
pub mod user;

pub use self::auth::{CredentialsError, LoginCredentials};
pub use self::booking::{
    Booking, BookingDraft, BookingId, BookingStatus, BookingUpdate, BookingValidationError,
};
pub use self::catalog::{Catalog, Category, Service, ServiceId};
pub use self::error::OperationError;
pub use self::operations::OperationsService;
pub use self::recommendation::{
    PLAIN_MATCH_EXPLANATION, RecommendationService, SearchOutcome, SearchQuery, SearchQueryError,
};
pub use self::registration::{RegistrationDraft, RegistrationForm};
pub use self::snapshot::Snapshot;
pub use self::user::{Capability, Role, User, UserValidationError, Username};
