//! PostgREST adapter for the hosted marketplace store.
//!
//! Talks to a Supabase project's `/rest/v1` surface: plain GETs for the
//! three collections, POST inserts, PATCH updates and DELETEs filtered by
//! column equality. The adapter owns transport and row decoding only; what
//! gets written and when is decided upstream.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use crate::domain::booking::{BookingDraft, BookingId, BookingUpdate};
use crate::domain::ports::{MarketplaceStore, StoreError};
use crate::domain::registration::RegistrationDraft;
use crate::domain::snapshot::Snapshot;
use crate::domain::user::{User, Username};
use crate::outbound::body_preview;

use self::dto::{
    BookingPatchRow, BookingRow, NewBookingRow, NewRegistrationRow, NewUserRow, RegistrationRow,
    UserRow,
};

mod dto;

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(15);

/// Connection settings for one Supabase project.
pub struct SupabaseConfig {
    /// Project root, e.g. `https://abc123.supabase.co`.
    pub project_url: Url,
    /// Anonymous or service key, sent as both `apikey` and bearer token.
    pub api_key: String,
    /// Whole-request timeout applied to the HTTP client.
    pub timeout: Duration,
}

impl SupabaseConfig {
    /// Default timeout with the given project and key.
    pub fn new(project_url: Url, api_key: impl Into<String>) -> Self {
        Self {
            project_url,
            api_key: api_key.into(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

/// Store adapter speaking PostgREST against one project.
pub struct SupabaseStore {
    client: Client,
    rest_base: String,
    api_key: String,
}

impl SupabaseStore {
    /// Build the adapter and its HTTP client.
    ///
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(config: SupabaseConfig) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(config.timeout).build()?;
        Ok(Self {
            client,
            rest_base: format!(
                "{}/rest/v1",
                config.project_url.as_str().trim_end_matches('/')
            ),
            api_key: config.api_key,
        })
    }

    fn request(&self, method: Method, table: &str) -> RequestBuilder {
        self.client
            .request(method, format!("{}/{table}", self.rest_base))
            .header("apikey", self.api_key.as_str())
            .bearer_auth(self.api_key.as_str())
    }

    async fn rows<T>(&self, table: &str, query: &[(&str, &str)]) -> Result<Vec<T>, StoreError>
    where
        T: DeserializeOwned,
    {
        let response = self
            .request(Method::GET, table)
            .query(query)
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        let body = response.bytes().await.map_err(map_transport_error)?;
        if !status.is_success() {
            return Err(map_status_error(table, status, body.as_ref()));
        }
        serde_json::from_slice(body.as_ref())
            .map_err(|error| StoreError::query(format!("{table} rows did not decode: {error}")))
    }

    async fn execute(&self, builder: RequestBuilder, table: &str) -> Result<(), StoreError> {
        let response = builder.send().await.map_err(map_transport_error)?;
        finish_write(response, table).await
    }
}

#[async_trait]
impl MarketplaceStore for SupabaseStore {
    async fn fetch_all(&self) -> Result<Snapshot, StoreError> {
        let (users, bookings, registrations) = tokio::try_join!(
            self.rows::<UserRow>("users", &[("select", "*")]),
            self.rows::<BookingRow>(
                "bookings",
                &[("select", "*"), ("order", "created_at.desc")],
            ),
            self.rows::<RegistrationRow>(
                "registrations",
                &[("select", "*"), ("order", "submitted_at.desc")],
            ),
        )?;

        let snapshot = Snapshot {
            users: convert_rows(users, UserRow::into_domain)?,
            bookings: convert_rows(bookings, BookingRow::into_domain)?,
            registrations: registrations
                .into_iter()
                .map(RegistrationRow::into_domain)
                .collect(),
        };
        debug!(
            users = snapshot.users.len(),
            bookings = snapshot.bookings.len(),
            registrations = snapshot.registrations.len(),
            "snapshot fetched"
        );
        Ok(snapshot)
    }

    async fn create_booking(&self, draft: &BookingDraft) -> Result<(), StoreError> {
        let row = NewBookingRow::from(draft);
        self.execute(
            self.request(Method::POST, "bookings")
                .header("Prefer", "return=minimal")
                .json(&row),
            "bookings",
        )
        .await
    }

    async fn create_registration(&self, draft: &RegistrationDraft) -> Result<(), StoreError> {
        let row = NewRegistrationRow::from(draft);
        self.execute(
            self.request(Method::POST, "registrations")
                .header("Prefer", "return=minimal")
                .json(&row),
            "registrations",
        )
        .await
    }

    async fn create_user(&self, user: &User) -> Result<(), StoreError> {
        let row = NewUserRow::from(user);
        let response = self
            .request(Method::POST, "users")
            .header("Prefer", "return=minimal")
            .json(&row)
            .send()
            .await
            .map_err(map_transport_error)?;

        // PostgREST reports unique-constraint violations as 409.
        if response.status() == StatusCode::CONFLICT {
            return Err(StoreError::duplicate_username(user.username().as_str()));
        }
        finish_write(response, "users").await
    }

    async fn delete_user(&self, username: &Username) -> Result<(), StoreError> {
        self.execute(
            self.request(Method::DELETE, "users")
                .query(&[("username", format!("eq.{username}"))]),
            "users",
        )
        .await
    }

    async fn update_booking(
        &self,
        id: &BookingId,
        update: &BookingUpdate,
    ) -> Result<(), StoreError> {
        let patch = BookingPatchRow::from(update);
        self.execute(
            self.request(Method::PATCH, "bookings")
                .query(&[("id", format!("eq.{id}"))])
                .json(&patch),
            "bookings",
        )
        .await
    }
}

fn convert_rows<R, T>(
    rows: Vec<R>,
    convert: impl Fn(R) -> Result<T, String>,
) -> Result<Vec<T>, StoreError> {
    rows.into_iter()
        .map(|row| convert(row).map_err(StoreError::query))
        .collect()
}

async fn finish_write(response: Response, table: &str) -> Result<(), StoreError> {
    let status = response.status();
    if status.is_success() {
        return Ok(());
    }
    let body = response.bytes().await.unwrap_or_default();
    Err(map_status_error(table, status, body.as_ref()))
}

fn map_transport_error(error: reqwest::Error) -> StoreError {
    if error.is_timeout() {
        StoreError::connection(format!("timed out: {error}"))
    } else {
        StoreError::connection(error.to_string())
    }
}

fn map_status_error(table: &str, status: StatusCode, body: &[u8]) -> StoreError {
    StoreError::query(format!(
        "{table}: status {}: {}",
        status.as_u16(),
        body_preview(body)
    ))
}

#[cfg(test)]
mod tests {
    //! Regression coverage for the non-network pieces of the adapter.
    use super::*;

    fn store(project_url: &str) -> SupabaseStore {
        let project_url = Url::parse(project_url).expect("valid url");
        SupabaseStore::new(SupabaseConfig::new(project_url, "anon-key"))
            .expect("client builds")
    }

    #[test]
    fn rest_base_is_rooted_at_the_project() {
        let store = store("https://abc123.supabase.co/");
        assert_eq!(store.rest_base, "https://abc123.supabase.co/rest/v1");
    }

    #[test]
    fn status_errors_name_the_table() {
        let error = map_status_error("bookings", StatusCode::SERVICE_UNAVAILABLE, b"upstream down");
        assert_eq!(
            error,
            StoreError::query("bookings: status 503: upstream down")
        );
    }

    #[test]
    fn row_conversion_stops_at_the_first_bad_row() {
        let rows = vec![Ok::<_, String>(1_u32), Err("row 2 is broken".to_owned())];
        let result = convert_rows(rows, |row| row);
        assert_eq!(result, Err(StoreError::query("row 2 is broken")));
    }
}
