//! Places search interface
//!
//! The keywords picked by the engine are handed to a places API through this
//! trait. Transport and retry policy belong to the implementation.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::Result;
use crate::error::CompanionError;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    pub fn new(latitude: f64, longitude: f64) -> Result<Self> {
        if !(-90.0..=90.0).contains(&latitude) {
            return Err(CompanionError::validation(format!(
                "latitude {latitude} outside -90..90"
            )));
        }
        if !(-180.0..=180.0).contains(&longitude) {
            return Err(CompanionError::validation(format!(
                "longitude {longitude} outside -180..180"
            )));
        }
        Ok(Self {
            latitude,
            longitude,
        })
    }
}

/// One query against the places API
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchQuery {
    pub location: Coordinates,
    pub place_type: String,
    pub keyword: String,
}

/// A place returned by the places API
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    pub name: String,
    pub address: Option<String>,
    pub rating: Option<f32>,
    pub location: Option<Coordinates>,
}

#[async_trait]
pub trait SearchClient: Send + Sync {
    async fn search(&self, query: &SearchQuery) -> Result<Vec<SearchResult>>;
}
