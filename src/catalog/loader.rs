use quick_xml::de::from_str;
use serde::Deserialize;
use std::fs;
use std::path::Path;
use tracing::{info, warn};

use super::{Catalog, CatalogError, Place, Result};
use crate::context::{TimeTag, WeatherTag};

/// Loader for the XML place knowledge file
pub struct CatalogLoader;

/// Catalog XML structure for deserialization
#[derive(Debug, Deserialize)]
pub struct CatalogXml {
    #[serde(rename = "Place", default)]
    pub places: Vec<PlaceXml>,
}

#[derive(Debug, Deserialize)]
pub struct PlaceXml {
    #[serde(rename = "@id")]
    pub id: String,
    #[serde(rename = "Weather", default)]
    pub weather: Vec<String>,
    #[serde(rename = "Time", default)]
    pub time: Vec<String>,
    #[serde(rename = "Category", default)]
    pub categories: Vec<String>,
    #[serde(rename = "Keyword")]
    pub keyword: Option<String>,
}

impl PlaceXml {
    /// Resolve the raw entry into a typed `Place`
    pub fn to_place(&self) -> Result<Place> {
        let id = self.id.trim();
        if id.is_empty() {
            return Err(CatalogError::Parse("Place without an id".to_string()));
        }

        let weather = self
            .weather
            .iter()
            .map(|w| {
                w.parse::<WeatherTag>()
                    .map_err(|e| CatalogError::Parse(format!("Place {id}: {e}")))
            })
            .collect::<Result<Vec<_>>>()?;

        let time = self
            .time
            .iter()
            .map(|t| {
                t.parse::<TimeTag>()
                    .map_err(|e| CatalogError::Parse(format!("Place {id}: {e}")))
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Place::new(id, self.keyword.clone().unwrap_or_default())
            .with_weather(weather)
            .with_time(time)
            .with_categories(&self.categories))
    }
}

impl CatalogLoader {
    /// Load and parse a catalog file
    pub fn load<P: AsRef<Path>>(xml_path: P) -> Result<Catalog> {
        let xml_path = xml_path.as_ref();
        info!("Loading place catalog from: {:?}", xml_path);

        if !xml_path.exists() {
            return Err(CatalogError::FileNotFound(
                xml_path.to_string_lossy().to_string(),
            ));
        }

        let xml_content = fs::read_to_string(xml_path)
            .map_err(|e| CatalogError::Io(format!("Failed to read catalog file: {e}")))?;

        Self::parse_xml(&xml_content)
    }

    /// Parse catalog XML content
    pub fn parse_xml(xml_content: &str) -> Result<Catalog> {
        let catalog_xml: CatalogXml = from_str(xml_content)
            .map_err(|e| CatalogError::Parse(format!("Failed to parse catalog XML: {e}")))?;

        let mut places = Vec::new();
        let mut parse_errors = 0;

        for entry in &catalog_xml.places {
            match entry.to_place() {
                Ok(place) => places.push(place),
                Err(e) => {
                    warn!("Failed to parse place {}: {}", entry.id, e);
                    parse_errors += 1;
                }
            }
        }

        let catalog = Catalog::from_places(places);

        info!(
            "Loaded {} places ({} parse errors)",
            catalog.len(),
            parse_errors
        );

        if catalog.is_empty() {
            return Err(CatalogError::Empty);
        }

        Ok(catalog)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const SAMPLE: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<Catalog>
    <Place id="fine_arts">
        <Weather>Rainy</Weather>
        <Weather>Cloudy</Weather>
        <Category>Museum</Category>
        <Category>Art</Category>
        <Keyword>art museum</Keyword>
    </Place>
    <Place id="riverside">
        <Weather>sunny</Weather>
        <Time>Morning</Time>
        <Time>Evening</Time>
        <Category>Park</Category>
        <Keyword>park</Keyword>
    </Place>
    <Place id="anywhere">
        <Category>Cafe</Category>
        <Keyword>coffee shop</Keyword>
    </Place>
</Catalog>"#;

    #[test]
    fn test_parse_catalog_xml() {
        let catalog = CatalogLoader::parse_xml(SAMPLE).unwrap();
        assert_eq!(catalog.len(), 3);

        let museum = catalog.get("fine_arts").unwrap();
        assert_eq!(museum.keyword, "art museum");
        assert!(museum.weather_tags.contains(&WeatherTag::Rainy));
        assert!(museum.weather_tags.contains(&WeatherTag::Cloudy));
        assert!(museum.time_tags.is_empty());
        assert!(museum.categories.contains("museum"));
        assert!(museum.categories.contains("art"));

        let park = catalog.get("riverside").unwrap();
        assert_eq!(park.weather_tags.len(), 1);
        assert!(park.time_tags.contains(&TimeTag::Evening));

        let cafe = catalog.get("anywhere").unwrap();
        assert!(cafe.weather_tags.is_empty());
        assert!(cafe.time_tags.is_empty());
    }

    #[test]
    fn test_invalid_places_are_skipped() {
        let xml = r#"<Catalog>
    <Place id="foggy_pier">
        <Weather>Foggy</Weather>
        <Keyword>pier</Keyword>
    </Place>
    <Place id="no_keyword">
        <Category>Park</Category>
    </Place>
    <Place id="library">
        <Time>Afternoon</Time>
        <Keyword>library</Keyword>
    </Place>
</Catalog>"#;

        let catalog = CatalogLoader::parse_xml(xml).unwrap();
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.places()[0].id, "library");
    }

    #[test]
    fn test_catalog_without_usable_places() {
        let xml = r#"<Catalog>
    <Place id="nothing">
        <Category>Park</Category>
    </Place>
</Catalog>"#;

        assert!(matches!(
            CatalogLoader::parse_xml(xml),
            Err(CatalogError::Empty)
        ));
    }

    #[test]
    fn test_malformed_xml() {
        let result = CatalogLoader::parse_xml("<Catalog><Place id=\"x\">");
        assert!(matches!(result, Err(CatalogError::Parse(_))));
    }

    #[test]
    fn test_load_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(SAMPLE.as_bytes()).unwrap();

        let catalog = CatalogLoader::load(temp_file.path()).unwrap();
        assert_eq!(catalog.len(), 3);
    }

    #[test]
    fn test_file_not_found() {
        let result = CatalogLoader::load("nonexistent_catalog.xml");
        assert!(matches!(result, Err(CatalogError::FileNotFound(_))));
    }
}
