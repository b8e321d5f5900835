//! Recommendation refresh
//!
//! One refresh produces keywords for every preference kind. The kinds are
//! independent, share only the read-only catalog and run concurrently; the
//! only awaits are the preference store and places search calls.

use std::sync::Arc;

use futures::future::join_all;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::context::{self, Context};
use crate::preferences::{PreferenceKind, PreferenceStore, parse_preferences};
use crate::recommend::{FallbackTier, Recommender};
use crate::search::{Coordinates, SearchClient, SearchQuery, SearchResult};

/// Keywords and search results for one preference kind
#[derive(Debug, Clone, Serialize)]
pub struct KindRecommendation {
    pub kind: PreferenceKind,
    pub keywords: Vec<String>,
    pub tier: FallbackTier,
    pub results: Vec<SearchResult>,
}

#[derive(Debug, Clone, Serialize)]
pub struct RefreshOutcome {
    pub context: Context,
    pub recommendations: Vec<KindRecommendation>,
}

impl RefreshOutcome {
    #[must_use]
    pub fn for_kind(&self, kind: PreferenceKind) -> Option<&KindRecommendation> {
        self.recommendations.iter().find(|r| r.kind == kind)
    }
}

pub struct RecommendationService {
    recommender: Recommender,
    preferences: Arc<dyn PreferenceStore>,
    search: Arc<dyn SearchClient>,
    location: Coordinates,
}

impl RecommendationService {
    pub fn new(
        recommender: Recommender,
        preferences: Arc<dyn PreferenceStore>,
        search: Arc<dyn SearchClient>,
        location: Coordinates,
    ) -> Self {
        Self {
            recommender,
            preferences,
            search,
            location,
        }
    }

    /// Recommend and search for every preference kind of a user
    #[tracing::instrument(name = "refresh", skip(self))]
    pub async fn refresh(
        &self,
        user_id: &str,
        weather_description: &str,
        hour: u32,
    ) -> RefreshOutcome {
        let context = context::classify(weather_description, hour);
        info!("Refreshing recommendations for {} in context {}", user_id, context);

        let recommendations = join_all(
            PreferenceKind::ALL
                .into_iter()
                .map(|kind| self.refresh_kind(user_id, &context, kind)),
        )
        .await;

        RefreshOutcome {
            context,
            recommendations,
        }
    }

    async fn refresh_kind(
        &self,
        user_id: &str,
        context: &Context,
        kind: PreferenceKind,
    ) -> KindRecommendation {
        let raw = match self.preferences.get_preferences(user_id, kind).await {
            Ok(raw) => raw,
            Err(e) => {
                warn!("Could not read {} preferences for {}: {}", kind, user_id, e);
                String::new()
            }
        };
        let preferences = parse_preferences(&raw);

        let recommendation = self.recommender.recommend_for(context, &preferences);
        debug!(
            "{} keywords {:?} via {:?}",
            kind, recommendation.keywords, recommendation.tier
        );

        let results = self.search_all(kind, &recommendation.keywords).await;

        KindRecommendation {
            kind,
            keywords: recommendation.keywords,
            tier: recommendation.tier,
            results,
        }
    }

    async fn search_all(&self, kind: PreferenceKind, keywords: &[String]) -> Vec<SearchResult> {
        let queries: Vec<SearchQuery> = keywords
            .iter()
            .map(|keyword| SearchQuery {
                location: self.location,
                place_type: kind.place_type_hint().to_string(),
                keyword: keyword.clone(),
            })
            .collect();

        let responses = join_all(queries.iter().map(|query| self.search.search(query))).await;

        let mut results = Vec::new();
        for (query, response) in queries.iter().zip(responses) {
            match response {
                Ok(found) => results.extend(found),
                Err(e) => warn!("Search for '{}' failed: {}", query.keyword, e),
            }
        }
        results
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Result;
    use crate::catalog::{Catalog, Place};
    use crate::context::{TimeTag, WeatherTag};
    use crate::error::CompanionError;
    use crate::preferences::InMemoryPreferenceStore;
    use crate::recommend::RecommendationPolicy;
    use async_trait::async_trait;
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingSearch {
        queries: Mutex<Vec<SearchQuery>>,
        fail_keyword: Option<String>,
    }

    #[async_trait]
    impl SearchClient for RecordingSearch {
        async fn search(&self, query: &SearchQuery) -> Result<Vec<SearchResult>> {
            self.queries.lock().unwrap().push(query.clone());
            if self.fail_keyword.as_deref() == Some(query.keyword.as_str()) {
                return Err(CompanionError::search("quota exceeded"));
            }
            Ok(vec![SearchResult {
                name: format!("{} near you", query.keyword),
                address: None,
                rating: Some(4.5),
                location: Some(query.location),
            }])
        }
    }

    struct BrokenStore;

    #[async_trait]
    impl PreferenceStore for BrokenStore {
        async fn get_preferences(&self, _user_id: &str, _kind: PreferenceKind) -> Result<String> {
            Err(CompanionError::preferences("database locked"))
        }
    }

    fn catalog() -> Arc<Catalog> {
        Arc::new(Catalog::from_places([
            Place::new("trattoria", "italian restaurant").with_categories(["Italian"]),
            Place::new("ramen", "ramen").with_categories(["Japanese"]),
            Place::new("museum", "museum")
                .with_weather([WeatherTag::Rainy, WeatherTag::Cloudy])
                .with_categories(["Museum", "History"]),
            Place::new("bowling", "bowling alley")
                .with_time([TimeTag::Evening, TimeTag::Night])
                .with_categories(["Games"]),
        ]))
    }

    fn montreal() -> Coordinates {
        Coordinates::new(45.5019, -73.5674).unwrap()
    }

    #[tokio::test]
    async fn test_refresh_covers_every_kind() {
        let store = Arc::new(InMemoryPreferenceStore::new());
        store
            .set_preferences("ana", PreferenceKind::Cuisine, "Japanese")
            .await;
        store
            .set_preferences("ana", PreferenceKind::Attraction, "History, Museum")
            .await;

        let search = Arc::new(RecordingSearch::default());
        let service = RecommendationService::new(
            Recommender::new(Some(catalog()), RecommendationPolicy::default()),
            store,
            search.clone(),
            montreal(),
        );

        let outcome = service.refresh("ana", "light rain", 19).await;
        assert_eq!(outcome.context.weather, WeatherTag::Rainy);
        assert_eq!(outcome.context.time, TimeTag::Evening);
        assert_eq!(outcome.recommendations.len(), 3);

        let cuisine = outcome.for_kind(PreferenceKind::Cuisine).unwrap();
        assert_eq!(cuisine.keywords, vec!["ramen"]);
        assert_eq!(cuisine.tier, FallbackTier::PreferenceMatch);
        assert_eq!(cuisine.results.len(), 1);

        let attraction = outcome.for_kind(PreferenceKind::Attraction).unwrap();
        assert_eq!(attraction.keywords, vec!["museum"]);

        let activity = outcome.for_kind(PreferenceKind::Activity).unwrap();
        assert_eq!(activity.tier, FallbackTier::ContextMatch);
        assert_eq!(
            activity.keywords,
            vec!["italian restaurant", "ramen", "museum"]
        );

        let queries = search.queries.lock().unwrap();
        assert_eq!(queries.len(), 5);
        assert!(
            queries
                .iter()
                .any(|q| q.keyword == "ramen" && q.place_type == "restaurant")
        );
    }

    #[tokio::test]
    async fn test_store_failure_degrades_to_context() {
        let service = RecommendationService::new(
            Recommender::new(Some(catalog()), RecommendationPolicy::default()),
            Arc::new(BrokenStore),
            Arc::new(RecordingSearch::default()),
            montreal(),
        );

        let outcome = service.refresh("ana", "clear sky", 9).await;
        for recommendation in &outcome.recommendations {
            assert_eq!(recommendation.tier, FallbackTier::ContextMatch);
            assert_eq!(
                recommendation.keywords,
                vec!["italian restaurant", "ramen"]
            );
        }
    }

    #[tokio::test]
    async fn test_failed_search_is_skipped() {
        let search = Arc::new(RecordingSearch {
            queries: Mutex::new(Vec::new()),
            fail_keyword: Some("park".to_string()),
        });
        let service = RecommendationService::new(
            Recommender::new(None, RecommendationPolicy::default()),
            Arc::new(InMemoryPreferenceStore::new()),
            search.clone(),
            montreal(),
        );

        let outcome = service.refresh("ana", "snow", 2).await;
        for recommendation in &outcome.recommendations {
            assert_eq!(recommendation.keywords, vec!["restaurant", "park", "museum"]);
            assert_eq!(recommendation.tier, FallbackTier::Default);
            assert_eq!(recommendation.results.len(), 2);
        }
        assert_eq!(search.queries.lock().unwrap().len(), 9);
    }
}
