//! Serialized state-changing operations over the marketplace store.
//!
//! Every mutation follows the same discipline: acquire the single in-flight
//! token, check the acting identity's capability before any store call,
//! perform the store operation, then resynchronize so the snapshot is
//! rebuilt wholesale from one authoritative read. The token is advisory
//! mutual exclusion for this process only: it does not stop another
//! session from mutating the same entities, and the accept/assign race
//! resolves to last-write-wins at the store.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use tracing::{debug, warn};

use crate::domain::auth::LoginCredentials;
use crate::domain::booking::{BookingDraft, BookingId, BookingUpdate};
use crate::domain::catalog::Catalog;
use crate::domain::error::OperationError;
use crate::domain::ports::{MarketplaceStore, RecommendationSource, StoreError};
use crate::domain::recommendation::{RecommendationService, SearchOutcome, SearchQuery};
use crate::domain::registration::RegistrationDraft;
use crate::domain::snapshot::Snapshot;
use crate::domain::user::{Capability, User, Username};

/// Snapshot plus session identity, guarded by one synchronous lock.
///
/// The lock is held only to read or swap values, never across an await.
#[derive(Debug, Default)]
struct AppState {
    snapshot: Snapshot,
    session: Option<User>,
}

/// Exclusive-access token for the one in-flight mutation.
///
/// Dropping the token releases the flag, so every exit path (success,
/// store failure, or panic while the future is polled) gives it back.
struct ActionToken<'a> {
    flag: &'a AtomicBool,
}

impl Drop for ActionToken<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}

/// The application core the presentation layer talks to.
///
/// Owns the catalog, the search resolver, the current snapshot, and the
/// session identity. All state-changing methods serialize behind the
/// in-flight token and finish with a full resynchronization.
pub struct OperationsService<S, A> {
    store: Arc<S>,
    resolver: RecommendationService<A>,
    catalog: Catalog,
    state: RwLock<AppState>,
    in_flight: AtomicBool,
}

impl<S, A> OperationsService<S, A>
where
    S: MarketplaceStore,
    A: RecommendationSource,
{
    /// Wire the core to its two collaborators and a catalog.
    pub fn new(store: Arc<S>, advisor: Arc<A>, catalog: Catalog) -> Self {
        Self {
            store,
            resolver: RecommendationService::new(advisor),
            catalog,
            state: RwLock::new(AppState::default()),
            in_flight: AtomicBool::new(false),
        }
    }

    /// The static catalog.
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Current snapshot of users, bookings, and registrations.
    pub fn snapshot(&self) -> Snapshot {
        self.read_state().snapshot.clone()
    }

    /// Currently signed-in account, if any.
    pub fn current_user(&self) -> Option<User> {
        self.read_state().session.clone()
    }

    /// Whether a mutation currently holds the in-flight token. Drives the
    /// blocking "please wait" indicator.
    pub fn action_in_progress(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    /// Resolve a search query against the catalog.
    ///
    /// Reads only; never takes the token and never fails.
    pub async fn search(&self, query: &SearchQuery) -> SearchOutcome {
        self.resolver.resolve(query, &self.catalog).await
    }

    /// Re-fetch all three collections and replace the snapshot.
    ///
    /// Used for the initial load; every mutation also ends with this.
    pub async fn refresh(&self) -> Result<(), OperationError> {
        self.resynchronize().await
    }

    /// Customer places a booking. The store assigns id, timestamp, and the
    /// pending entry state.
    pub async fn create_booking(&self, draft: BookingDraft) -> Result<(), OperationError> {
        let _token = self.begin_action()?;
        self.store
            .create_booking(&draft)
            .await
            .map_err(Self::surface)?;
        debug!(service = %draft.service_id, "booking created");
        self.resynchronize().await
    }

    /// Prospective provider files an onboarding submission.
    pub async fn submit_registration(
        &self,
        draft: RegistrationDraft,
    ) -> Result<(), OperationError> {
        let _token = self.begin_action()?;
        self.store
            .create_registration(&draft)
            .await
            .map_err(Self::surface)?;
        self.resynchronize().await
    }

    /// Administrator creates an account.
    ///
    /// A duplicate username surfaces as [`OperationError::UsernameTaken`],
    /// distinct from generic store failure.
    pub async fn add_user(&self, user: User) -> Result<(), OperationError> {
        let _token = self.begin_action()?;
        self.require(Capability::ManageUsers)?;
        self.store.create_user(&user).await.map_err(Self::surface)?;
        debug!(username = %user.username(), role = %user.role(), "account created");
        self.resynchronize().await
    }

    /// Administrator deletes an account.
    ///
    /// Deleting the signed-in account also clears the session, within the
    /// same operation.
    pub async fn remove_user(&self, username: &Username) -> Result<(), OperationError> {
        let _token = self.begin_action()?;
        self.require(Capability::ManageUsers)?;
        self.store
            .delete_user(username)
            .await
            .map_err(Self::surface)?;
        {
            let mut state = self.write_state();
            let deleted_self = state
                .session
                .as_ref()
                .is_some_and(|user| user.username() == username);
            if deleted_self {
                debug!(username = %username, "session account deleted, signing out");
                state.session = None;
            }
        }
        self.resynchronize().await
    }

    /// Provider claims an unclaimed booking for themselves.
    ///
    /// Deliberately no pending-state check: if two providers race, the
    /// store keeps whichever write lands last and both resyncs show it.
    pub async fn accept_booking(&self, booking: &BookingId) -> Result<(), OperationError> {
        let _token = self.begin_action()?;
        let actor = self.require(Capability::AcceptBooking)?;
        let update = BookingUpdate::accepted_by(actor.username().clone());
        self.store
            .update_booking(booking, &update)
            .await
            .map_err(Self::surface)?;
        self.resynchronize().await
    }

    /// Administrator attaches a provider to a booking, or detaches one with
    /// `None` (explicit unassign back to pending).
    pub async fn assign_booking(
        &self,
        booking: &BookingId,
        provider: Option<Username>,
    ) -> Result<(), OperationError> {
        let _token = self.begin_action()?;
        self.require(Capability::AssignBooking)?;
        let update = BookingUpdate::assigned_to(provider);
        self.store
            .update_booking(booking, &update)
            .await
            .map_err(Self::surface)?;
        self.resynchronize().await
    }

    /// Match credentials against the snapshot and install the session.
    ///
    /// Unknown username and wrong password are indistinguishable on
    /// purpose.
    pub fn sign_in(&self, credentials: &LoginCredentials) -> Result<User, OperationError> {
        let mut state = self.write_state();
        let matched = state
            .snapshot
            .users
            .iter()
            .find(|user| {
                user.username().as_str() == credentials.username()
                    && user.password() == credentials.password()
            })
            .cloned();
        match matched {
            Some(user) => {
                state.session = Some(user.clone());
                Ok(user)
            }
            None => Err(OperationError::InvalidCredentials),
        }
    }

    /// Clear the session identity.
    pub fn sign_out(&self) {
        self.write_state().session = None;
    }

    /// Acquire the in-flight token or report the running action.
    fn begin_action(&self) -> Result<ActionToken<'_>, OperationError> {
        if self
            .in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return Err(OperationError::ActionInProgress);
        }
        Ok(ActionToken {
            flag: &self.in_flight,
        })
    }

    /// Capability gate, evaluated before any store call.
    fn require(&self, capability: Capability) -> Result<User, OperationError> {
        let state = self.read_state();
        let user = state.session.as_ref().ok_or(OperationError::NotSignedIn)?;
        if !user.role().allows(capability) {
            return Err(OperationError::NotAuthorized {
                role: user.role(),
                action: capability.action(),
            });
        }
        Ok(user.clone())
    }

    /// Replace the snapshot from one authoritative batch read.
    ///
    /// On failure the previous snapshot stays in place; the caller sees a
    /// retryable error even though the preceding mutation may have
    /// committed.
    async fn resynchronize(&self) -> Result<(), OperationError> {
        let snapshot = self.store.fetch_all().await.map_err(|error| {
            warn!(error = %error, "resynchronization failed, keeping the previous snapshot");
            Self::surface(error)
        })?;
        self.write_state().snapshot = snapshot;
        Ok(())
    }

    fn surface(error: StoreError) -> OperationError {
        match error {
            StoreError::DuplicateUsername { username } => {
                OperationError::UsernameTaken { username }
            }
            StoreError::Connection { message } | StoreError::Query { message } => {
                OperationError::StoreUnavailable { message }
            }
        }
    }

    fn read_state(&self) -> RwLockReadGuard<'_, AppState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_state(&self) -> RwLockWriteGuard<'_, AppState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use chrono::Utc;
    use mockall::Sequence;

    use super::*;
    use crate::domain::booking::{Booking, BookingStatus};
    use crate::domain::catalog::{Category, ServiceId};
    use crate::domain::ports::{MockMarketplaceStore, MockRecommendationSource};
    use crate::domain::user::Role;

    type Service = OperationsService<MockMarketplaceStore, MockRecommendationSource>;

    fn make_service(store: MockMarketplaceStore) -> Service {
        OperationsService::new(
            Arc::new(store),
            Arc::new(MockRecommendationSource::new()),
            Catalog::builtin(),
        )
    }

    fn admin() -> User {
        User::new("meera", "pw-admin", Role::Admin, Vec::new()).expect("valid admin")
    }

    fn provider(name: &str) -> User {
        User::new(name, "pw-provider", Role::Provider, vec![Category::Plumbing])
            .expect("valid provider")
    }

    fn install_session(service: &Service, user: User) {
        service.write_state().session = Some(user);
    }

    fn install_users(service: &Service, users: Vec<User>) {
        service.write_state().snapshot.users = users;
    }

    fn draft() -> BookingDraft {
        BookingDraft {
            service_id: ServiceId::new("plumb-03"),
            customer_name: "Nisha".to_owned(),
            customer_phone: "9876500001".to_owned(),
            address: "14 Lake Road".to_owned(),
            notes: None,
        }
    }

    fn stored_booking(id: &str, provider: Option<&str>) -> Booking {
        let provider = provider.map(|name| Username::new(name).expect("valid username"));
        let status = if provider.is_some() {
            BookingStatus::Assigned
        } else {
            BookingStatus::Pending
        };
        Booking::new(
            BookingId::new(id),
            ServiceId::new("plumb-03"),
            "Nisha",
            "9876500001",
            "14 Lake Road",
            None,
            status,
            provider,
            Utc::now(),
        )
        .expect("valid booking")
    }

    #[tokio::test]
    async fn create_booking_resynchronizes_on_success() {
        let mut store = MockMarketplaceStore::new();
        store
            .expect_create_booking()
            .times(1)
            .returning(|_| Ok(()));
        store.expect_fetch_all().times(1).returning(|| {
            Ok(Snapshot {
                bookings: vec![stored_booking("b1", None)],
                ..Snapshot::default()
            })
        });

        let service = make_service(store);
        service.create_booking(draft()).await.expect("booking succeeds");

        let snapshot = service.snapshot();
        assert_eq!(snapshot.bookings.len(), 1);
        assert_eq!(snapshot.bookings[0].status(), BookingStatus::Pending);
        assert!(!service.action_in_progress(), "token released");
    }

    #[tokio::test]
    async fn create_booking_failure_leaves_the_snapshot_untouched() {
        let mut store = MockMarketplaceStore::new();
        store
            .expect_create_booking()
            .times(1)
            .returning(|_| Err(StoreError::connection("socket closed")));
        store.expect_fetch_all().times(0);

        let service = make_service(store);
        let err = service.create_booking(draft()).await.expect_err("must fail");

        assert!(matches!(err, OperationError::StoreUnavailable { .. }));
        assert_eq!(service.snapshot(), Snapshot::default());
        assert!(!service.action_in_progress(), "token released on failure");
    }

    #[tokio::test]
    async fn accept_is_rejected_before_the_store_for_non_providers() {
        let mut store = MockMarketplaceStore::new();
        store.expect_update_booking().times(0);
        store.expect_fetch_all().times(0);

        let service = make_service(store);
        install_session(&service, admin());

        let err = service
            .accept_booking(&BookingId::new("b1"))
            .await
            .expect_err("admins cannot self-assign");
        assert_eq!(
            err,
            OperationError::NotAuthorized {
                role: Role::Admin,
                action: Capability::AcceptBooking.action(),
            }
        );
    }

    #[tokio::test]
    async fn accept_requires_a_session() {
        let mut store = MockMarketplaceStore::new();
        store.expect_update_booking().times(0);

        let service = make_service(store);
        let err = service
            .accept_booking(&BookingId::new("b1"))
            .await
            .expect_err("anonymous accept must fail");
        assert_eq!(err, OperationError::NotSignedIn);
    }

    #[tokio::test]
    async fn accept_writes_a_self_assignment() {
        let mut store = MockMarketplaceStore::new();
        store
            .expect_update_booking()
            .times(1)
            .withf(|id, update| {
                id.as_str() == "b1"
                    && update.status() == BookingStatus::Assigned
                    && update.provider().map(Username::as_str) == Some("ravi")
            })
            .returning(|_, _| Ok(()));
        store.expect_fetch_all().times(1).returning(|| {
            Ok(Snapshot {
                bookings: vec![stored_booking("b1", Some("ravi"))],
                ..Snapshot::default()
            })
        });

        let service = make_service(store);
        install_session(&service, provider("ravi"));

        service
            .accept_booking(&BookingId::new("b1"))
            .await
            .expect("accept succeeds");
        let snapshot = service.snapshot();
        assert_eq!(
            snapshot.bookings[0].provider().map(Username::as_str),
            Some("ravi")
        );
    }

    #[tokio::test]
    async fn assign_is_rejected_before_the_store_for_non_admins() {
        let mut store = MockMarketplaceStore::new();
        store.expect_update_booking().times(0);

        let service = make_service(store);
        install_session(&service, provider("ravi"));

        let err = service
            .assign_booking(&BookingId::new("b1"), None)
            .await
            .expect_err("providers cannot assign");
        assert_eq!(
            err,
            OperationError::NotAuthorized {
                role: Role::Provider,
                action: Capability::AssignBooking.action(),
            }
        );
    }

    #[tokio::test]
    async fn assign_without_a_provider_unassigns_the_booking() {
        let mut store = MockMarketplaceStore::new();
        store
            .expect_update_booking()
            .times(1)
            .withf(|id, update| {
                id.as_str() == "b1"
                    && update.status() == BookingStatus::Pending
                    && update.provider().is_none()
            })
            .returning(|_, _| Ok(()));
        store.expect_fetch_all().times(1).returning(|| {
            Ok(Snapshot {
                bookings: vec![stored_booking("b1", None)],
                ..Snapshot::default()
            })
        });

        let service = make_service(store);
        install_session(&service, admin());

        service
            .assign_booking(&BookingId::new("b1"), None)
            .await
            .expect("unassign succeeds");
        let snapshot = service.snapshot();
        assert_eq!(snapshot.bookings[0].status(), BookingStatus::Pending);
        assert_eq!(snapshot.bookings[0].provider(), None);
    }

    #[tokio::test]
    async fn duplicate_accounts_surface_a_distinct_error() {
        let mut store = MockMarketplaceStore::new();
        store
            .expect_create_user()
            .times(1)
            .returning(|_| Err(StoreError::duplicate_username("ravi")));
        store.expect_fetch_all().times(0);

        let service = make_service(store);
        install_session(&service, admin());

        let err = service
            .add_user(provider("ravi"))
            .await
            .expect_err("duplicate must fail");
        assert_eq!(err, OperationError::username_taken("ravi"));
    }

    #[tokio::test]
    async fn removing_the_signed_in_account_clears_the_session() {
        let mut store = MockMarketplaceStore::new();
        store.expect_delete_user().times(1).returning(|_| Ok(()));
        store
            .expect_fetch_all()
            .times(1)
            .returning(|| Ok(Snapshot::default()));

        let service = make_service(store);
        install_session(&service, admin());

        let username = Username::new("meera").expect("valid username");
        service.remove_user(&username).await.expect("delete succeeds");
        assert_eq!(service.current_user(), None);
    }

    #[tokio::test]
    async fn removing_another_account_keeps_the_session() {
        let mut store = MockMarketplaceStore::new();
        store.expect_delete_user().times(1).returning(|_| Ok(()));
        store
            .expect_fetch_all()
            .times(1)
            .returning(|| Ok(Snapshot::default()));

        let service = make_service(store);
        install_session(&service, admin());

        let username = Username::new("ravi").expect("valid username");
        service.remove_user(&username).await.expect("delete succeeds");
        assert_eq!(
            service.current_user().map(|u| u.username().clone()),
            Some(Username::new("meera").expect("valid username"))
        );
    }

    #[tokio::test]
    async fn a_held_token_rejects_further_mutations() {
        let mut store = MockMarketplaceStore::new();
        store.expect_create_booking().times(0);

        let service = make_service(store);
        let _held = service.begin_action().expect("token available");

        let err = service.create_booking(draft()).await.expect_err("busy");
        assert_eq!(err, OperationError::ActionInProgress);
        assert!(service.action_in_progress());
    }

    #[tokio::test]
    async fn the_token_is_released_after_a_failed_mutation() {
        let mut seq = Sequence::new();
        let mut store = MockMarketplaceStore::new();
        store
            .expect_create_booking()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Err(StoreError::connection("flaky network")));
        store
            .expect_create_booking()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(()));
        store
            .expect_fetch_all()
            .times(1)
            .returning(|| Ok(Snapshot::default()));

        let service = make_service(store);
        service
            .create_booking(draft())
            .await
            .expect_err("first attempt fails");
        service
            .create_booking(draft())
            .await
            .expect("retry succeeds once the token is free");
    }

    #[tokio::test]
    async fn resynchronization_failure_keeps_the_stale_snapshot() {
        let mut store = MockMarketplaceStore::new();
        store
            .expect_create_booking()
            .times(1)
            .returning(|_| Ok(()));
        store
            .expect_fetch_all()
            .times(1)
            .returning(|| Err(StoreError::connection("read replica down")));

        let service = make_service(store);
        let err = service.create_booking(draft()).await.expect_err("resync fails");

        assert!(matches!(err, OperationError::StoreUnavailable { .. }));
        assert_eq!(service.snapshot(), Snapshot::default());
        assert!(!service.action_in_progress());
    }

    #[test]
    fn sign_in_matches_username_and_password() {
        let service = make_service(MockMarketplaceStore::new());
        install_users(&service, vec![admin(), provider("ravi")]);

        let creds = LoginCredentials::new("ravi", "pw-provider").expect("valid credentials");
        let user = service.sign_in(&creds).expect("sign-in succeeds");
        assert_eq!(user.username().as_str(), "ravi");
        assert_eq!(
            service.current_user().map(|u| u.role()),
            Some(Role::Provider)
        );
    }

    #[test]
    fn sign_in_rejects_wrong_passwords_and_unknown_users_alike() {
        let service = make_service(MockMarketplaceStore::new());
        install_users(&service, vec![admin()]);

        let wrong_password =
            LoginCredentials::new("meera", "nope").expect("valid credentials");
        let unknown_user =
            LoginCredentials::new("ghost", "nope").expect("valid credentials");

        assert_eq!(
            service.sign_in(&wrong_password),
            Err(OperationError::InvalidCredentials)
        );
        assert_eq!(
            service.sign_in(&unknown_user),
            Err(OperationError::InvalidCredentials)
        );
        assert_eq!(service.current_user(), None);
    }

    #[test]
    fn sign_out_clears_the_session() {
        let service = make_service(MockMarketplaceStore::new());
        install_session(&service, admin());

        service.sign_out();
        assert_eq!(service.current_user(), None);
    }
}
