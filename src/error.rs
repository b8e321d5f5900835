//! Error types and handling for the travel companion

use thiserror::Error;

use crate::catalog::CatalogError;

/// Main error type for the travel companion
#[derive(Error, Debug)]
pub enum CompanionError {
    /// Configuration-related errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// The place catalog could not be loaded
    #[error("Catalog unavailable: {source}")]
    Catalog {
        #[from]
        source: CatalogError,
    },

    /// Preference store failures
    #[error("Preference store error: {message}")]
    Preferences { message: String },

    /// Places search failures
    #[error("Search error: {message}")]
    Search { message: String },

    /// Input validation errors
    #[error("Invalid input: {message}")]
    Validation { message: String },

    /// I/O operation errors
    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },
}

impl CompanionError {
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    pub fn preferences<S: Into<String>>(message: S) -> Self {
        Self::Preferences {
            message: message.into(),
        }
    }

    pub fn search<S: Into<String>>(message: S) -> Self {
        Self::Search {
            message: message.into(),
        }
    }

    pub fn validation<S: Into<String>>(message: S) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Get a user-friendly error message
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            CompanionError::Config { .. } => {
                "Configuration error. Please check your config file.".to_string()
            }
            CompanionError::Catalog { .. } => {
                "Place catalog unavailable. Showing general suggestions instead.".to_string()
            }
            CompanionError::Preferences { .. } => {
                "Unable to read your saved preferences.".to_string()
            }
            CompanionError::Search { .. } => {
                "Unable to reach the places service. Please check your internet connection."
                    .to_string()
            }
            CompanionError::Validation { message } => {
                format!("Invalid input: {message}")
            }
            CompanionError::Io { .. } => {
                "File operation failed. Please check file permissions.".to_string()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let config_err = CompanionError::config("bad level");
        assert!(matches!(config_err, CompanionError::Config { .. }));

        let search_err = CompanionError::search("connection failed");
        assert!(matches!(search_err, CompanionError::Search { .. }));

        let validation_err = CompanionError::validation("hour out of range");
        assert!(matches!(validation_err, CompanionError::Validation { .. }));
    }

    #[test]
    fn test_user_messages() {
        let config_err = CompanionError::config("test");
        assert!(config_err.user_message().contains("Configuration error"));

        let prefs_err = CompanionError::preferences("test");
        assert!(prefs_err.user_message().contains("preferences"));

        let validation_err = CompanionError::validation("test input");
        assert!(validation_err.user_message().contains("test input"));
    }

    #[test]
    fn test_catalog_error_conversion() {
        let err: CompanionError = CatalogError::FileNotFound("places.xml".to_string()).into();
        assert!(matches!(err, CompanionError::Catalog { .. }));
        assert!(err.to_string().contains("places.xml"));
        assert!(err.user_message().contains("general suggestions"));
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: CompanionError = io_err.into();
        assert!(matches!(err, CompanionError::Io { .. }));
    }
}
