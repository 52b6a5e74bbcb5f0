//! Search resolution: an ordered cascade from AI advice down to plain text.
//!
//! The resolver is a chain of three tiers tried in order (advisor-picked
//! services, then advisor-named category, then deterministic substring
//! match) where each tier either decides or abstains. Advisor failures are
//! absorbed here:
//! callers always get an outcome, never an error, and an empty match list is
//! a valid outcome the UI renders as an empty state.

use std::fmt;
use std::sync::Arc;

use tracing::{debug, warn};

use crate::domain::catalog::{Catalog, Category, Service};
use crate::domain::ports::{Advice, AdviceRequest, RecommendationSource};

/// Explanation shown when the result comes from the plain-text tier.
pub const PLAIN_MATCH_EXPLANATION: &str = "Here is what we found matching your search.";

/// Validation error for [`SearchQuery`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SearchQueryError {
    /// The query was blank once trimmed. A blank query means "no search"
    /// upstream, so it never reaches the resolver.
    #[error("search query must not be blank")]
    Blank,
}

/// Non-blank, trimmed free-text query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery(String);

impl SearchQuery {
    /// Validate and construct a query.
    pub fn new(raw: impl AsRef<str>) -> Result<Self, SearchQueryError> {
        let trimmed = raw.as_ref().trim();
        if trimmed.is_empty() {
            return Err(SearchQueryError::Blank);
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Borrow the query text.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for SearchQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What a search resolved to: the ranked subset plus its explanation.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchOutcome {
    /// Matching catalog entries in catalog order. May be empty.
    pub matches: Vec<Service>,
    /// Reasoning banner text: the advisor's words for tiers one and two,
    /// [`PLAIN_MATCH_EXPLANATION`] for the deterministic tier.
    pub explanation: String,
}

/// Resolves free-text queries against the catalog through the tier cascade.
#[derive(Clone)]
pub struct RecommendationService<A> {
    advisor: Arc<A>,
}

impl<A> RecommendationService<A> {
    /// Create a resolver backed by the given advisor.
    pub fn new(advisor: Arc<A>) -> Self {
        Self { advisor }
    }
}

impl<A> RecommendationService<A>
where
    A: RecommendationSource,
{
    /// Resolve a query to a subset of the catalog.
    ///
    /// Infallible by contract: an advisor failure is logged and demoted to
    /// the plain-text tier, never surfaced.
    pub async fn resolve(&self, query: &SearchQuery, catalog: &Catalog) -> SearchOutcome {
        let request = AdviceRequest::new(query, catalog);
        match self.advisor.recommend(&request).await {
            Ok(advice) => apply_advice(query, catalog, &advice),
            Err(error) => {
                warn!(error = %error, query = %query, "advisor unavailable, using plain text match");
                plain_text_match(query, catalog)
            }
        }
    }
}

/// Run the tiers in order; the first one that decides wins.
fn apply_advice(query: &SearchQuery, catalog: &Catalog, advice: &Advice) -> SearchOutcome {
    suggested_services(catalog, advice)
        .or_else(|| named_category(query, catalog, advice))
        .unwrap_or_else(|| {
            debug!(query = %query, "advice carried neither services nor a category");
            plain_text_match(query, catalog)
        })
}

/// Tier one: the advisor picked concrete catalog entries.
///
/// Results keep catalog iteration order regardless of how the advisor
/// ordered its ids; ids outside the catalog are dropped silently.
fn suggested_services(catalog: &Catalog, advice: &Advice) -> Option<SearchOutcome> {
    if advice.suggested_service_ids.is_empty() {
        return None;
    }
    debug!(
        suggested = advice.suggested_service_ids.len(),
        "using advisor-suggested services"
    );
    Some(SearchOutcome {
        matches: catalog.by_ids(&advice.suggested_service_ids),
        explanation: advice.reasoning.clone(),
    })
}

/// Tier two: the advisor named a category instead of concrete entries.
///
/// A name outside the closed enumeration degrades to a broad substring
/// match (name, description, and category label), still explained with the
/// advisor's reasoning.
fn named_category(query: &SearchQuery, catalog: &Catalog, advice: &Advice) -> Option<SearchOutcome> {
    let name = advice.recommended_category.as_deref()?;
    let matches = match Category::from_label(name) {
        Some(category) => {
            debug!(category = %category, "using advisor-recommended category");
            catalog.in_category(category)
        }
        None => {
            debug!(category = name, "advisor named an unknown category");
            let needle = query.as_str().to_lowercase();
            catalog
                .services()
                .iter()
                .filter(|service| {
                    contains_ci(service.name(), &needle)
                        || contains_ci(service.description(), &needle)
                        || contains_ci(service.category().label(), &needle)
                })
                .cloned()
                .collect()
        }
    };
    Some(SearchOutcome {
        matches,
        explanation: advice.reasoning.clone(),
    })
}

/// Tier three: deterministic substring match on name and description only.
fn plain_text_match(query: &SearchQuery, catalog: &Catalog) -> SearchOutcome {
    let needle = query.as_str().to_lowercase();
    let matches = catalog
        .services()
        .iter()
        .filter(|service| {
            contains_ci(service.name(), &needle) || contains_ci(service.description(), &needle)
        })
        .cloned()
        .collect();
    SearchOutcome {
        matches,
        explanation: PLAIN_MATCH_EXPLANATION.to_owned(),
    }
}

fn contains_ci(haystack: &str, needle_lower: &str) -> bool {
    haystack.to_lowercase().contains(needle_lower)
}
