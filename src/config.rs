//! Configuration management for the travel companion
//!
//! Handles loading configuration from files, environment variables,
//! and provides validation for all configuration settings.

use crate::CompanionError;
use crate::recommend::{DEFAULT_KEYWORDS, MAX_KEYWORDS, RecommendationPolicy};
use crate::search::Coordinates;
use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompanionConfig {
    /// Place catalog configuration
    #[serde(default)]
    pub catalog: CatalogConfig,
    /// Recommendation output configuration
    #[serde(default)]
    pub recommendation: RecommendationConfig,
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
    /// Places search configuration
    #[serde(default)]
    pub search: SearchConfig,
}

/// Place catalog settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogConfig {
    /// Path of the XML knowledge file
    #[serde(default = "default_catalog_path")]
    pub path: String,
}

/// Recommendation output settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecommendationConfig {
    /// Maximum keywords per recommendation (1-3)
    #[serde(default = "default_max_keywords")]
    pub max_keywords: usize,
    /// Keywords used when the catalog cannot answer
    #[serde(default = "default_fallback_keywords")]
    pub fallback_keywords: Vec<String>,
}

/// Logging configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (error, warn, info, debug, trace)
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Log format (pretty or json)
    #[serde(default = "default_log_format")]
    pub format: String,
}

/// Places search settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Search center latitude
    #[serde(default = "default_latitude")]
    pub latitude: f64,
    /// Search center longitude
    #[serde(default = "default_longitude")]
    pub longitude: f64,
}

// Default value functions
fn default_catalog_path() -> String {
    "assets/travel_catalog.xml".to_string()
}

fn default_max_keywords() -> usize {
    MAX_KEYWORDS
}

fn default_fallback_keywords() -> Vec<String> {
    DEFAULT_KEYWORDS.iter().map(|k| k.to_string()).collect()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

// Montreal
fn default_latitude() -> f64 {
    45.5019
}

fn default_longitude() -> f64 {
    -73.5674
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            path: default_catalog_path(),
        }
    }
}

impl Default for RecommendationConfig {
    fn default() -> Self {
        Self {
            max_keywords: default_max_keywords(),
            fallback_keywords: default_fallback_keywords(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            latitude: default_latitude(),
            longitude: default_longitude(),
        }
    }
}

impl Default for CompanionConfig {
    fn default() -> Self {
        Self {
            catalog: CatalogConfig::default(),
            recommendation: RecommendationConfig::default(),
            logging: LoggingConfig::default(),
            search: SearchConfig::default(),
        }
    }
}

impl CompanionConfig {
    /// Load configuration from file and environment variables
    pub fn load() -> Result<Self> {
        Self::load_from_path(None)
    }

    /// Load configuration from specified path
    pub fn load_from_path(config_path: Option<PathBuf>) -> Result<Self> {
        let mut builder = Config::builder();

        let config_file = config_path.unwrap_or_else(|| {
            Self::get_config_path().unwrap_or_else(|| PathBuf::from("config.toml"))
        });

        if config_file.exists() {
            builder = builder.add_source(
                File::from(config_file.clone())
                    .required(false)
                    .format(config::FileFormat::Toml),
            );
        }

        // Environment overrides, e.g. TRAVEL_COMPANION_LOGGING__LEVEL=debug
        builder = builder.add_source(
            Environment::with_prefix("TRAVEL_COMPANION")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let settings = builder
            .build()
            .with_context(|| "Failed to build configuration")?;

        let mut config: CompanionConfig = settings
            .try_deserialize()
            .with_context(|| "Failed to deserialize configuration")?;

        config.apply_defaults();
        config.validate()?;

        Ok(config)
    }

    /// Get the default configuration file path
    #[must_use]
    pub fn get_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("travel-companion").join("config.toml"))
    }

    /// Apply default values to missing configuration fields
    pub fn apply_defaults(&mut self) {
        if self.catalog.path.trim().is_empty() {
            self.catalog.path = default_catalog_path();
        }
        if self.recommendation.max_keywords == 0 {
            self.recommendation.max_keywords = default_max_keywords();
        }
        if self.recommendation.fallback_keywords.is_empty() {
            self.recommendation.fallback_keywords = default_fallback_keywords();
        }
        if self.logging.level.is_empty() {
            self.logging.level = default_log_level();
        }
        if self.logging.format.is_empty() {
            self.logging.format = default_log_format();
        }
    }

    /// Validate all configuration settings
    pub fn validate(&self) -> Result<()> {
        self.validate_recommendation()?;
        self.validate_string_values()?;
        self.validate_search()?;
        Ok(())
    }

    fn validate_recommendation(&self) -> Result<()> {
        let max = self.recommendation.max_keywords;
        if !(1..=MAX_KEYWORDS).contains(&max) {
            return Err(CompanionError::config(format!(
                "max_keywords must be between 1 and {MAX_KEYWORDS}, got {max}"
            ))
            .into());
        }

        if self.recommendation.fallback_keywords.is_empty() {
            return Err(CompanionError::config("fallback_keywords cannot be empty").into());
        }

        if self
            .recommendation
            .fallback_keywords
            .iter()
            .any(|k| k.trim().is_empty())
        {
            return Err(
                CompanionError::config("fallback_keywords cannot contain blank entries").into(),
            );
        }

        Ok(())
    }

    /// Validate string configuration values
    fn validate_string_values(&self) -> Result<()> {
        let valid_log_levels = ["error", "warn", "info", "debug", "trace"];
        if !valid_log_levels.contains(&self.logging.level.as_str()) {
            return Err(CompanionError::config(format!(
                "Invalid log level '{}'. Must be one of: {}",
                self.logging.level,
                valid_log_levels.join(", ")
            ))
            .into());
        }

        let valid_log_formats = ["pretty", "json"];
        if !valid_log_formats.contains(&self.logging.format.as_str()) {
            return Err(CompanionError::config(format!(
                "Invalid log format '{}'. Must be one of: {}",
                self.logging.format,
                valid_log_formats.join(", ")
            ))
            .into());
        }

        Ok(())
    }

    fn validate_search(&self) -> Result<()> {
        self.search_location()
            .map(|_| ())
            .map_err(|e| CompanionError::config(e.to_string()).into())
    }

    /// The engine policy described by this configuration
    #[must_use]
    pub fn policy(&self) -> RecommendationPolicy {
        RecommendationPolicy {
            max_keywords: self.recommendation.max_keywords,
            fallback_keywords: self.recommendation.fallback_keywords.clone(),
        }
    }

    pub fn search_location(&self) -> crate::Result<Coordinates> {
        Coordinates::new(self.search.latitude, self.search.longitude)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_config() {
        let config = CompanionConfig::default();
        assert_eq!(config.catalog.path, "assets/travel_catalog.xml");
        assert_eq!(config.recommendation.max_keywords, 3);
        assert_eq!(
            config.recommendation.fallback_keywords,
            vec!["restaurant", "park", "museum"]
        );
        assert_eq!(config.logging.level, "info");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation_invalid_log_level() {
        let mut config = CompanionConfig::default();
        config.logging.level = "invalid".to_string();
        let result = config.validate();
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("Invalid log level"));
    }

    #[test]
    fn test_config_validation_max_keywords() {
        let mut config = CompanionConfig::default();
        config.recommendation.max_keywords = 5;
        let result = config.validate();
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("max_keywords"));
    }

    #[test]
    fn test_config_validation_blank_fallback() {
        let mut config = CompanionConfig::default();
        config.recommendation.fallback_keywords = vec!["cafe".to_string(), " ".to_string()];
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_validation_search_location() {
        let mut config = CompanionConfig::default();
        config.search.latitude = 120.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_apply_defaults() {
        let mut config = CompanionConfig::default();
        config.catalog.path = String::new();
        config.recommendation.max_keywords = 0;
        config.recommendation.fallback_keywords.clear();
        config.apply_defaults();
        assert_eq!(config.catalog.path, "assets/travel_catalog.xml");
        assert_eq!(config.policy(), RecommendationPolicy::default());
    }

    #[test]
    fn test_load_from_file() {
        let mut file = NamedTempFile::with_suffix(".toml").unwrap();
        writeln!(
            file,
            r#"
[catalog]
path = "/srv/places.xml"

[recommendation]
max_keywords = 2
fallback_keywords = ["cafe", "library"]

[logging]
format = "json"
"#
        )
        .unwrap();

        let config = CompanionConfig::load_from_path(Some(file.path().to_path_buf())).unwrap();
        assert_eq!(config.catalog.path, "/srv/places.xml");
        assert_eq!(config.recommendation.max_keywords, 2);
        assert_eq!(config.recommendation.fallback_keywords, vec!["cafe", "library"]);
        assert_eq!(config.logging.format, "json");
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_config_path_generation() {
        if let Some(path) = CompanionConfig::get_config_path() {
            assert!(path.to_string_lossy().contains("travel-companion"));
            assert!(path.to_string_lossy().contains("config.toml"));
        }
    }
}
