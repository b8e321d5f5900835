//! Travel Companion - context-aware place recommendations
//!
//! This library turns the current weather, the time of day and a user's
//! category preferences into a short list of search keywords for a places
//! API, backed by a read-only catalog of places.

pub mod catalog;
pub mod config;
pub mod context;
pub mod error;
pub mod logging;
pub mod preferences;
pub mod recommend;
pub mod search;
pub mod service;

// Re-export core types for public API
pub use catalog::{Catalog, CatalogError, CatalogLoader, Place};
pub use config::CompanionConfig;
pub use context::{Context, TimeTag, WeatherTag, classify_time, classify_weather};
pub use error::CompanionError;
pub use preferences::{PreferenceKind, PreferenceStore, SurveySelection, parse_preferences};
pub use recommend::{
    DEFAULT_KEYWORDS, FallbackTier, MAX_KEYWORDS, Recommendation, RecommendationPolicy,
    RecommendationRequest, Recommender, recommend,
};
pub use search::{Coordinates, SearchClient, SearchQuery, SearchResult};
pub use service::{RecommendationService, RefreshOutcome};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Core result type used throughout the library
pub type Result<T> = std::result::Result<T, CompanionError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_is_set() {
        assert!(!VERSION.is_empty());
    }
}
