use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::LocationError;

/// A validated geographic position.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    /// Build coordinates, rejecting values outside latitude [-90, 90] /
    /// longitude [-180, 180].
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, LocationError> {
        if !(-90.0..=90.0).contains(&latitude) || !(-180.0..=180.0).contains(&longitude) {
            return Err(LocationError::OutOfRange { latitude, longitude });
        }
        Ok(Self { latitude, longitude })
    }
}

impl std::fmt::Display for Coordinates {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.4}, {:.4}", self.latitude, self.longitude)
    }
}

/// Which source in the resolver chain produced a location.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LocationSource {
    Device,
    PrimaryIp,
    SecondaryIp,
    Default,
}

impl LocationSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            LocationSource::Device => "device position",
            LocationSource::PrimaryIp => "primary IP geolocation",
            LocationSource::SecondaryIp => "secondary IP geolocation",
            LocationSource::Default => "default location",
        }
    }
}

impl std::fmt::Display for LocationSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The resolver's product: one position plus its human-readable naming.
/// Immutable; a refresh produces a whole new value.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UserLocationInfo {
    pub coordinates: Coordinates,
    pub city: String,
    pub country: String,
    pub source: LocationSource,
}

/// City/country pair from reverse geocoding.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlaceName {
    pub city: String,
    pub country: String,
}

/// Current conditions, fully resolved for display.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CurrentWeatherData {
    pub temperature_c: i32,
    pub condition: String,
    pub icon: String,
    pub wind_speed_kmh: Option<i32>,
    pub humidity_pct: Option<u8>,
}

/// One day of the five-day forecast.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ForecastDay {
    pub date: NaiveDate,
    /// Display form of `date`, e.g. "Mon, Aug 3".
    pub label: String,
    pub high_c: i32,
    pub low_c: i32,
    pub condition: String,
    pub icon: String,
    pub code: i32,
}

/// Exactly five days, day 0 = the response's base day.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FiveDayForecast {
    pub days: [ForecastDay; 5],
}

/// One match from the forward-geocoding city search, in upstream
/// relevance order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CitySearchResult {
    pub id: i64,
    pub name: String,
    pub country: String,
    pub latitude: f64,
    pub longitude: f64,
    pub admin1: Option<String>,
    pub population: Option<u64>,
}
