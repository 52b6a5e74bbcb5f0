//! Port for the AI search advisor.
//!
//! The advisor interprets a free-text query against the catalog. It only
//! ever sees public catalog data: [`AdviceRequest`] is built from a
//! projection of id, name, description, and category. User, booking, and
//! registration records never cross this boundary; that is a contract, not
//! an optimisation.

use async_trait::async_trait;
use serde::Serialize;

use crate::domain::catalog::{Catalog, Category, ServiceId};
use crate::domain::recommendation::SearchQuery;

use super::macros::define_port_error;

define_port_error! {
    /// Failures raised by advisor adapters.
    ///
    /// The resolver treats every variant identically (deterministic
    /// fallback), but adapters still distinguish them for logging.
    pub enum AdvisorError {
        /// The advisor endpoint could not be reached.
        Transport { message: String } => "advisor transport failed: {message}",
        /// The call exceeded the adapter's deadline.
        Timeout { message: String } => "advisor call timed out: {message}",
        /// The advisor throttled the caller.
        RateLimited { message: String } => "advisor rate limited the request: {message}",
        /// The completion could not be parsed into advice.
        Decode { message: String } => "advisor response could not be decoded: {message}",
    }
}

/// Public projection of one catalog entry, safe to share with the advisor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceSummary {
    pub id: ServiceId,
    pub name: String,
    pub description: String,
    pub category: Category,
}

/// Everything the advisor is given for one recommendation call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdviceRequest {
    query: String,
    categories: Vec<Category>,
    services: Vec<ServiceSummary>,
}

impl AdviceRequest {
    /// Build a request from the query and the catalog projection.
    pub fn new(query: &SearchQuery, catalog: &Catalog) -> Self {
        let services = catalog
            .services()
            .iter()
            .map(|service| ServiceSummary {
                id: service.id().clone(),
                name: service.name().to_owned(),
                description: service.description().to_owned(),
                category: service.category(),
            })
            .collect();
        Self {
            query: query.as_str().to_owned(),
            categories: Category::ALL.to_vec(),
            services,
        }
    }

    pub fn query(&self) -> &str {
        self.query.as_str()
    }

    pub fn categories(&self) -> &[Category] {
        self.categories.as_slice()
    }

    pub fn services(&self) -> &[ServiceSummary] {
        self.services.as_slice()
    }
}

/// Structured advice parsed from the advisor's completion.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Advice {
    /// Category name as the advisor wrote it, validated by the resolver
    /// rather than trusted here.
    pub recommended_category: Option<String>,
    /// Advisor's reasoning, passed to the UI verbatim.
    pub reasoning: String,
    /// Catalog ids the advisor picked, possibly empty, possibly unknown.
    pub suggested_service_ids: Vec<ServiceId>,
}

/// Single-call advisor surface.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RecommendationSource: Send + Sync {
    /// Ask the advisor to interpret one query against the catalog.
    async fn recommend(&self, request: &AdviceRequest) -> Result<Advice, AdvisorError>;
}
