//! Place records and the immutable catalog holding them

use std::collections::{BTreeSet, HashSet};

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::context::{Context, TimeTag, WeatherTag};
use crate::preferences::normalize_label;

/// A candidate point of interest.
///
/// Empty tag sets mean the place suits every weather or every time of day.
/// Categories are stored normalized.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Place {
    pub id: String,
    pub weather_tags: BTreeSet<WeatherTag>,
    pub time_tags: BTreeSet<TimeTag>,
    pub categories: BTreeSet<String>,
    pub keyword: String,
}

impl Place {
    pub fn new(id: impl Into<String>, keyword: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            weather_tags: BTreeSet::new(),
            time_tags: BTreeSet::new(),
            categories: BTreeSet::new(),
            keyword: keyword.into().trim().to_string(),
        }
    }

    #[must_use]
    pub fn with_weather(mut self, tags: impl IntoIterator<Item = WeatherTag>) -> Self {
        self.weather_tags.extend(tags);
        self
    }

    #[must_use]
    pub fn with_time(mut self, tags: impl IntoIterator<Item = TimeTag>) -> Self {
        self.time_tags.extend(tags);
        self
    }

    #[must_use]
    pub fn with_categories<S: AsRef<str>>(
        mut self,
        categories: impl IntoIterator<Item = S>,
    ) -> Self {
        self.categories.extend(normalized(categories));
        self
    }

    #[must_use]
    pub fn suits_weather(&self, weather: WeatherTag) -> bool {
        self.weather_tags.is_empty() || self.weather_tags.contains(&weather)
    }

    #[must_use]
    pub fn suits_time(&self, time: TimeTag) -> bool {
        self.time_tags.is_empty() || self.time_tags.contains(&time)
    }

    /// Whether the place is compatible with both parts of the context
    #[must_use]
    pub fn is_context_compatible(&self, context: &Context) -> bool {
        self.suits_weather(context.weather) && self.suits_time(context.time)
    }

    /// Whether any category appears in the given normalized preference set
    #[must_use]
    pub fn matches_any(&self, preferences: &HashSet<String>) -> bool {
        self.categories.iter().any(|c| preferences.contains(c))
    }
}

fn normalized<S: AsRef<str>>(labels: impl IntoIterator<Item = S>) -> impl Iterator<Item = String> {
    labels
        .into_iter()
        .map(|c| normalize_label(c.as_ref()))
        .filter(|c| !c.is_empty())
}

/// Read-only collection of places, in source order.
///
/// There is no mutation API; share it behind an `Arc`.
#[derive(Debug, Default)]
pub struct Catalog {
    places: Vec<Place>,
}

impl Catalog {
    /// Build a catalog, dropping places without a keyword and repeated ids.
    /// Categories are normalized here however the place was built.
    pub fn from_places(places: impl IntoIterator<Item = Place>) -> Self {
        let mut seen_ids = HashSet::new();
        let mut kept = Vec::new();

        for mut place in places {
            if place.keyword.trim().is_empty() {
                warn!("Skipping place {} without a search keyword", place.id);
                continue;
            }
            if !seen_ids.insert(place.id.clone()) {
                warn!("Skipping duplicate place id {}", place.id);
                continue;
            }
            place.categories = normalized(&place.categories).collect();
            kept.push(place);
        }

        Self { places: kept }
    }

    #[must_use]
    pub fn places(&self) -> &[Place] {
        &self.places
    }

    pub fn iter(&self) -> impl Iterator<Item = &Place> {
        self.places.iter()
    }

    #[must_use]
    pub fn get(&self, id: &str) -> Option<&Place> {
        self.places.iter().find(|p| p.id == id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.places.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.places.is_empty()
    }
}

impl<'a> IntoIterator for &'a Catalog {
    type Item = &'a Place;
    type IntoIter = std::slice::Iter<'a, Place>;

    fn into_iter(self) -> Self::IntoIter {
        self.places.iter()
    }
}
