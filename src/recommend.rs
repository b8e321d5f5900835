//! Recommendation engine
//!
//! Selects the search keywords for one request in three tiers:
//! 1. places compatible with the context and matching a preference
//! 2. places compatible with the context
//! 3. a fixed default list when the catalog is unavailable or nothing fits
//!
//! The result is never empty, never longer than `MAX_KEYWORDS` and holds no
//! duplicates. Keywords come out in catalog order.

use std::collections::HashSet;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::catalog::{Catalog, Place};
use crate::context::{self, Context, TimeTag, WeatherTag};
use crate::preferences::normalize_label;

/// Upper bound on keywords handed to the places search
pub const MAX_KEYWORDS: usize = 3;

/// Keywords used when the catalog cannot help
pub const DEFAULT_KEYWORDS: [&str; 3] = ["restaurant", "park", "museum"];

/// Which source produced a recommendation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FallbackTier {
    PreferenceMatch,
    ContextMatch,
    Default,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recommendation {
    pub keywords: Vec<String>,
    pub tier: FallbackTier,
}

/// Inputs of one engine invocation
#[derive(Debug, Clone)]
pub struct RecommendationRequest {
    pub weather_description: String,
    pub hour: u32,
    pub preferences: Vec<String>,
}

impl RecommendationRequest {
    pub fn new(
        weather_description: impl Into<String>,
        hour: u32,
        preferences: Vec<String>,
    ) -> Self {
        Self {
            weather_description: weather_description.into(),
            hour,
            preferences,
        }
    }

    #[must_use]
    pub fn context(&self) -> Context {
        context::classify(&self.weather_description, self.hour)
    }
}

/// Output limits and the last-resort keyword list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecommendationPolicy {
    pub max_keywords: usize,
    pub fallback_keywords: Vec<String>,
}

impl Default for RecommendationPolicy {
    fn default() -> Self {
        Self {
            max_keywords: MAX_KEYWORDS,
            fallback_keywords: DEFAULT_KEYWORDS.iter().map(|k| k.to_string()).collect(),
        }
    }
}

impl RecommendationPolicy {
    fn limit(&self) -> usize {
        self.max_keywords.clamp(1, MAX_KEYWORDS)
    }

    fn default_recommendation(&self) -> Recommendation {
        let configured = self.fallback_keywords.iter().map(String::as_str);
        let mut keywords = dedupe_truncate(configured, self.limit());
        if keywords.is_empty() {
            keywords = dedupe_truncate(DEFAULT_KEYWORDS.into_iter(), self.limit());
        }
        Recommendation {
            keywords,
            tier: FallbackTier::Default,
        }
    }
}

/// Keywords for the given context with the default policy
#[must_use]
pub fn recommend<S: AsRef<str>>(
    catalog: Option<&Catalog>,
    weather: WeatherTag,
    time: TimeTag,
    preferences: &[S],
) -> Vec<String> {
    select(
        catalog,
        &Context { weather, time },
        preferences,
        &RecommendationPolicy::default(),
    )
    .keywords
}

/// Run the tiered selection and report which tier answered
#[must_use]
pub fn select<S: AsRef<str>>(
    catalog: Option<&Catalog>,
    context: &Context,
    preferences: &[S],
    policy: &RecommendationPolicy,
) -> Recommendation {
    let Some(catalog) = catalog else {
        debug!("No catalog loaded, using default keywords");
        return policy.default_recommendation();
    };

    let compatible: Vec<&Place> = catalog
        .iter()
        .filter(|place| place.is_context_compatible(context))
        .collect();

    if compatible.is_empty() {
        debug!("No place fits {}, using default keywords", context);
        return policy.default_recommendation();
    }

    let wanted: HashSet<String> = preferences
        .iter()
        .map(|p| normalize_label(p.as_ref()))
        .filter(|p| !p.is_empty())
        .collect();

    let preferred: Vec<&Place> = if wanted.is_empty() {
        Vec::new()
    } else {
        compatible
            .iter()
            .copied()
            .filter(|place| place.matches_any(&wanted))
            .collect()
    };

    let (source, tier) = if preferred.is_empty() {
        (compatible, FallbackTier::ContextMatch)
    } else {
        (preferred, FallbackTier::PreferenceMatch)
    };

    debug!(
        "Context {} matched {} places via {:?}",
        context,
        source.len(),
        tier
    );

    Recommendation {
        keywords: dedupe_truncate(source.iter().map(|p| p.keyword.as_str()), policy.limit()),
        tier,
    }
}

fn dedupe_truncate<'a>(keywords: impl Iterator<Item = &'a str>, limit: usize) -> Vec<String> {
    let mut seen = HashSet::new();
    keywords
        .map(str::trim)
        .filter(|k| !k.is_empty())
        .filter(|k| seen.insert(k.to_string()))
        .take(limit)
        .map(str::to_string)
        .collect()
}

/// Engine bound to a shared catalog and a policy
#[derive(Debug, Clone, Default)]
pub struct Recommender {
    catalog: Option<Arc<Catalog>>,
    policy: RecommendationPolicy,
}

impl Recommender {
    pub fn new(catalog: Option<Arc<Catalog>>, policy: RecommendationPolicy) -> Self {
        Self { catalog, policy }
    }

    /// Engine over an already attempted catalog load; a failed load leaves it on defaults
    pub fn from_load<E: std::fmt::Display>(
        loaded: std::result::Result<Arc<Catalog>, E>,
        policy: RecommendationPolicy,
    ) -> Self {
        match loaded {
            Ok(catalog) => Self::new(Some(catalog), policy),
            Err(e) => {
                debug!("Recommending without catalog: {}", e);
                Self::new(None, policy)
            }
        }
    }

    #[must_use]
    pub fn catalog(&self) -> Option<&Catalog> {
        self.catalog.as_deref()
    }

    #[must_use]
    pub fn policy(&self) -> &RecommendationPolicy {
        &self.policy
    }

    #[tracing::instrument(level = "debug", skip(self, request), fields(hour = request.hour))]
    pub fn recommend(&self, request: &RecommendationRequest) -> Recommendation {
        let context = request.context();
        debug!(
            "Context detected: {} (preferences: {:?})",
            context, request.preferences
        );
        select(self.catalog(), &context, &request.preferences, &self.policy)
    }

    pub fn recommend_for(&self, context: &Context, preferences: &[String]) -> Recommendation {
        select(self.catalog(), context, preferences, &self.policy)
    }
}
