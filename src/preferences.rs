//! User preferences
//!
//! Preferences are stored per user and kind as a single comma-joined string.
//! This module splits that string into labels, defines the store interface
//! and holds the caller-owned survey selection that produces the string.

use std::collections::HashMap;
use std::fmt::Display;
use std::str::FromStr;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

use crate::Result;
use crate::error::CompanionError;

/// The preference categories a user is surveyed on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PreferenceKind {
    Attraction,
    Activity,
    Cuisine,
}

impl PreferenceKind {
    pub const ALL: [PreferenceKind; 3] = [
        PreferenceKind::Cuisine,
        PreferenceKind::Attraction,
        PreferenceKind::Activity,
    ];

    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            PreferenceKind::Attraction => "attraction",
            PreferenceKind::Activity => "activity",
            PreferenceKind::Cuisine => "cuisine",
        }
    }

    /// Place type passed to the places search alongside each keyword
    #[must_use]
    pub fn place_type_hint(&self) -> &'static str {
        match self {
            PreferenceKind::Attraction => "tourist_attraction",
            PreferenceKind::Activity => "point_of_interest",
            PreferenceKind::Cuisine => "restaurant",
        }
    }
}

impl Display for PreferenceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PreferenceKind {
    type Err = CompanionError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let needle = s.trim();
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(needle))
            .ok_or_else(|| {
                CompanionError::validation(format!("unknown preference kind '{needle}'"))
            })
    }
}

/// Case-insensitive comparison form shared by preferences and place categories
#[must_use]
pub fn normalize_label(label: &str) -> String {
    label.trim().to_lowercase()
}

/// Split a stored comma-joined preference string into trimmed, non-empty labels.
///
/// Order and repeats are kept as stored.
#[must_use]
pub fn parse_preferences(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|label| !label.is_empty())
        .map(str::to_string)
        .collect()
}

/// Source of the raw per-user preference strings
#[async_trait]
pub trait PreferenceStore: Send + Sync {
    /// Returns the stored string, empty if the user never answered
    async fn get_preferences(&self, user_id: &str, kind: PreferenceKind) -> Result<String>;
}

/// Preference store kept in memory
#[derive(Debug, Default)]
pub struct InMemoryPreferenceStore {
    entries: RwLock<HashMap<(String, PreferenceKind), String>>,
}

impl InMemoryPreferenceStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn set_preferences(
        &self,
        user_id: &str,
        kind: PreferenceKind,
        raw: impl Into<String>,
    ) {
        self.entries
            .write()
            .await
            .insert((user_id.to_string(), kind), raw.into());
    }

    /// Persist every kind of a finished survey
    pub async fn save_selection(&self, user_id: &str, selection: &SurveySelection) {
        let mut entries = self.entries.write().await;
        for kind in PreferenceKind::ALL {
            entries.insert((user_id.to_string(), kind), selection.to_raw(kind));
        }
    }
}

#[async_trait]
impl PreferenceStore for InMemoryPreferenceStore {
    async fn get_preferences(&self, user_id: &str, kind: PreferenceKind) -> Result<String> {
        Ok(self
            .entries
            .read()
            .await
            .get(&(user_id.to_string(), kind))
            .cloned()
            .unwrap_or_default())
    }
}

/// Options picked during one survey session, owned by the caller
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SurveySelection {
    selected: HashMap<PreferenceKind, Vec<String>>,
}

impl SurveySelection {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an option; returns false if it was already selected
    pub fn select(&mut self, kind: PreferenceKind, option: &str) -> bool {
        let option = option.trim();
        if option.is_empty() || self.is_selected(kind, option) {
            return false;
        }
        self.selected
            .entry(kind)
            .or_default()
            .push(option.to_string());
        true
    }

    /// Remove an option; returns false if it was not selected
    pub fn deselect(&mut self, kind: PreferenceKind, option: &str) -> bool {
        let Some(options) = self.selected.get_mut(&kind) else {
            return false;
        };
        let before = options.len();
        options.retain(|o| !o.eq_ignore_ascii_case(option.trim()));
        before != options.len()
    }

    /// Flip an option, returns whether it is selected afterwards
    pub fn toggle(&mut self, kind: PreferenceKind, option: &str) -> bool {
        if self.is_selected(kind, option) {
            self.deselect(kind, option);
            false
        } else {
            self.select(kind, option)
        }
    }

    #[must_use]
    pub fn is_selected(&self, kind: PreferenceKind, option: &str) -> bool {
        self.selected
            .get(&kind)
            .is_some_and(|options| options.iter().any(|o| o.eq_ignore_ascii_case(option.trim())))
    }

    #[must_use]
    pub fn selected(&self, kind: PreferenceKind) -> &[String] {
        self.selected.get(&kind).map(Vec::as_slice).unwrap_or(&[])
    }

    /// The string form handed to the preference store
    #[must_use]
    pub fn to_raw(&self, kind: PreferenceKind) -> String {
        self.selected(kind).join(", ")
    }
}
