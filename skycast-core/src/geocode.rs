//! Forward and reverse geocoding.
//!
//! City search goes to the Open-Meteo geocoding service; reverse
//! geocoding goes to Nominatim (OpenStreetMap), which requires a
//! descriptive User-Agent but no API key. Reverse geocoding is cosmetic:
//! the public entry point never fails, it degrades to a fixed
//! placeholder name instead.

use std::time::Duration;

use reqwest::Client;
use serde::Deserialize;

use crate::error::WeatherError;
use crate::model::{CitySearchResult, Coordinates, PlaceName};

const SEARCH_BASE_URL: &str = "https://geocoding-api.open-meteo.com";
const REVERSE_BASE_URL: &str = "https://nominatim.openstreetmap.org";
const REQUEST_TIMEOUT_SECS: u64 = 10;
const USER_AGENT: &str = concat!("skycast/", env!("CARGO_PKG_VERSION"));

/// Maximum number of matches requested from the city search.
pub const SEARCH_RESULT_CAP: usize = 10;

#[derive(Debug, Clone)]
pub struct GeocodingClient {
    http: Client,
    search_base: String,
    reverse_base: String,
}

impl GeocodingClient {
    pub fn new() -> Result<Self, WeatherError> {
        Self::with_base_urls(SEARCH_BASE_URL, REVERSE_BASE_URL)
    }

    /// Point both services at explicit base URLs (used by tests).
    pub fn with_base_urls(
        search_base: impl Into<String>,
        reverse_base: impl Into<String>,
    ) -> Result<Self, WeatherError> {
        let http = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .user_agent(USER_AGENT)
            .build()?;

        Ok(Self {
            http,
            search_base: search_base.into(),
            reverse_base: reverse_base.into(),
        })
    }

    /// Search cities by free-text name, capped at [`SEARCH_RESULT_CAP`]
    /// matches in upstream relevance order.
    ///
    /// A blank query short-circuits to an empty list without touching the
    /// network.
    pub async fn search_cities(&self, query: &str) -> Result<Vec<CitySearchResult>, WeatherError> {
        let query = query.trim();
        if query.is_empty() {
            return Ok(Vec::new());
        }

        let url = format!("{}/v1/search", self.search_base);
        let count = SEARCH_RESULT_CAP.to_string();

        let res = self
            .http
            .get(&url)
            .query(&[
                ("name", query),
                ("count", count.as_str()),
                ("language", "en"),
                ("format", "json"),
            ])
            .send()
            .await?;

        let status = res.status();
        let body = res.text().await?;

        if !status.is_success() {
            return Err(WeatherError::api("city search", status, &body));
        }

        let parsed: SearchResponse =
            serde_json::from_str(&body).map_err(|e| WeatherError::decode("city search", e))?;

        let results = parsed
            .results
            .unwrap_or_default()
            .into_iter()
            .map(|raw| CitySearchResult {
                id: raw.id,
                name: raw.name,
                country: raw.country.unwrap_or_default(),
                latitude: raw.latitude,
                longitude: raw.longitude,
                admin1: raw.admin1,
                population: raw.population,
            })
            .collect();

        Ok(results)
    }

    /// Best-effort reverse geocoding. Never fails: transport or decode
    /// problems degrade to the fixed placeholder pair.
    pub async fn reverse_geocode(&self, coords: Coordinates) -> PlaceName {
        match self.try_reverse_geocode(coords).await {
            Ok(place) => place,
            Err(err) => {
                tracing::debug!(error = %err, "reverse geocoding failed, using placeholder");
                PlaceName { city: "Location".to_string(), country: "Unknown".to_string() }
            }
        }
    }

    /// Fallible reverse geocoding, for callers that apply their own
    /// degradation rule. Missing address components default per field to
    /// "Unknown"; only transport and decode problems are errors.
    pub async fn try_reverse_geocode(
        &self,
        coords: Coordinates,
    ) -> Result<PlaceName, WeatherError> {
        let url = format!("{}/reverse", self.reverse_base);
        let lat = coords.latitude.to_string();
        let lon = coords.longitude.to_string();

        let res = self
            .http
            .get(&url)
            .query(&[
                ("lat", lat.as_str()),
                ("lon", lon.as_str()),
                ("format", "json"),
                ("addressdetails", "1"),
                ("zoom", "10"),
            ])
            .send()
            .await?;

        let status = res.status();
        let body = res.text().await?;

        if !status.is_success() {
            return Err(WeatherError::api("reverse geocoding", status, &body));
        }

        let parsed: ReverseResponse = serde_json::from_str(&body)
            .map_err(|e| WeatherError::decode("reverse geocoding", e))?;

        let address = parsed.address.unwrap_or_default();

        // Prefer city > town > village for the place name.
        let city = address
            .city
            .or(address.town)
            .or(address.village)
            .filter(|c| !c.is_empty())
            .unwrap_or_else(|| "Unknown".to_string());
        let country = address
            .country
            .filter(|c| !c.is_empty())
            .unwrap_or_else(|| "Unknown".to_string());

        Ok(PlaceName { city, country })
    }
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    results: Option<Vec<RawCity>>,
}

#[derive(Debug, Deserialize)]
struct RawCity {
    id: i64,
    name: String,
    latitude: f64,
    longitude: f64,
    country: Option<String>,
    admin1: Option<String>,
    population: Option<u64>,
}

#[derive(Debug, Deserialize)]
struct ReverseResponse {
    address: Option<RawAddress>,
}

#[derive(Debug, Default, Deserialize)]
struct RawAddress {
    city: Option<String>,
    town: Option<String>,
    village: Option<String>,
    country: Option<String>,
}
