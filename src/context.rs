//! Context classification
//!
//! Maps raw environmental signals (a weather description from the weather
//! provider and the local hour) onto the discrete tags the catalog is
//! annotated with.

use std::fmt::Display;
use std::str::FromStr;

use chrono::{DateTime, TimeZone, Timelike};
use serde::{Deserialize, Serialize};

use crate::error::CompanionError;

/// Weather condition a place can be suited for
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum WeatherTag {
    Sunny,
    Rainy,
    Snowy,
    Cloudy,
}

/// Part of the day a place can be suited for
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum TimeTag {
    Morning,
    Afternoon,
    Evening,
    Night,
}

/// The classified context of a single recommendation request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Context {
    pub weather: WeatherTag,
    pub time: TimeTag,
}

impl WeatherTag {
    pub const ALL: [WeatherTag; 4] = [
        WeatherTag::Sunny,
        WeatherTag::Rainy,
        WeatherTag::Snowy,
        WeatherTag::Cloudy,
    ];

    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            WeatherTag::Sunny => "Sunny",
            WeatherTag::Rainy => "Rainy",
            WeatherTag::Snowy => "Snowy",
            WeatherTag::Cloudy => "Cloudy",
        }
    }
}

impl TimeTag {
    pub const ALL: [TimeTag; 4] = [
        TimeTag::Morning,
        TimeTag::Afternoon,
        TimeTag::Evening,
        TimeTag::Night,
    ];

    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            TimeTag::Morning => "Morning",
            TimeTag::Afternoon => "Afternoon",
            TimeTag::Evening => "Evening",
            TimeTag::Night => "Night",
        }
    }
}

impl Display for WeatherTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Display for TimeTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Display for Context {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} + {}", self.weather, self.time)
    }
}

impl FromStr for WeatherTag {
    type Err = CompanionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim();
        Self::ALL
            .into_iter()
            .find(|tag| tag.as_str().eq_ignore_ascii_case(needle))
            .ok_or_else(|| CompanionError::validation(format!("unknown weather tag '{needle}'")))
    }
}

impl FromStr for TimeTag {
    type Err = CompanionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim();
        Self::ALL
            .into_iter()
            .find(|tag| tag.as_str().eq_ignore_ascii_case(needle))
            .ok_or_else(|| CompanionError::validation(format!("unknown time tag '{needle}'")))
    }
}

/// Classify a free-text weather description.
///
/// Checks run in priority order, so "rainy with snow flurries" is `Rainy`.
#[must_use]
pub fn classify_weather(description: &str) -> WeatherTag {
    let description = description.to_lowercase();

    if ["rain", "drizzle", "thunder"]
        .iter()
        .any(|needle| description.contains(needle))
    {
        WeatherTag::Rainy
    } else if description.contains("snow") {
        WeatherTag::Snowy
    } else if description.contains("cloud") {
        WeatherTag::Cloudy
    } else {
        WeatherTag::Sunny
    }
}

/// Classify an hour of the day. Values past 23 wrap around.
#[must_use]
pub fn classify_time(hour: u32) -> TimeTag {
    match hour % 24 {
        5..=11 => TimeTag::Morning,
        12..=16 => TimeTag::Afternoon,
        17..=20 => TimeTag::Evening,
        _ => TimeTag::Night,
    }
}

#[must_use]
pub fn classify(description: &str, hour: u32) -> Context {
    Context {
        weather: classify_weather(description),
        time: classify_time(hour),
    }
}

/// Classify using the hour of a timestamp in its own timezone
#[must_use]
pub fn classify_at<Tz: TimeZone>(description: &str, at: &DateTime<Tz>) -> Context {
    classify(description, at.hour())
}
