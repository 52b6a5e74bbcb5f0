//! Driven ports: the edges of the hexagon.
//!
//! Each port exposes strongly typed errors so adapters map their failures
//! into predictable variants instead of stringly-typed results.

mod advisor;
mod macros;
mod store;

pub use self::advisor::{Advice, AdviceRequest, AdvisorError, RecommendationSource, ServiceSummary};
pub use self::store::{MarketplaceStore, StoreError};

#[cfg(test)]
pub use self::advisor::MockRecommendationSource;
#[cfg(test)]
pub use self::store::MockMarketplaceStore;
