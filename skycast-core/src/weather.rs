//! Current-weather and five-day-forecast lookups.
//!
//! Both operations accept optional coordinates and fall back to a fixed
//! location when none are supplied, so the contract stays total under
//! missing input. Numeric readings are rounded to whole display units
//! and the WMO weather code is translated up front; a response without
//! the expected block is a [`WeatherError::DataUnavailable`].

use std::time::Duration;

use chrono::NaiveDate;
use reqwest::Client;
use serde::Deserialize;

use crate::conditions;
use crate::error::WeatherError;
use crate::model::{Coordinates, CurrentWeatherData, FiveDayForecast, ForecastDay};

const FORECAST_BASE_URL: &str = "https://api.open-meteo.com";
const REQUEST_TIMEOUT_SECS: u64 = 10;

/// Used when the caller supplies no coordinates (Madrid).
pub const FALLBACK_COORDINATES: Coordinates =
    Coordinates { latitude: 40.4168, longitude: -3.7038 };

/// Days covered by [`WeatherClient::five_day_forecast`].
pub const FORECAST_DAYS: usize = 5;

#[derive(Debug, Clone)]
pub struct WeatherClient {
    http: Client,
    base_url: String,
}

impl WeatherClient {
    pub fn new() -> Result<Self, WeatherError> {
        Self::with_base_url(FORECAST_BASE_URL)
    }

    /// Point the client at an explicit base URL (used by tests).
    pub fn with_base_url(base_url: impl Into<String>) -> Result<Self, WeatherError> {
        let http = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;

        Ok(Self { http, base_url: base_url.into() })
    }

    /// Fetch current conditions for `coords`, or for the fallback
    /// location when `None`.
    pub async fn current(
        &self,
        coords: Option<Coordinates>,
    ) -> Result<CurrentWeatherData, WeatherError> {
        let coords = coords.unwrap_or(FALLBACK_COORDINATES);
        let lat = coords.latitude.to_string();
        let lon = coords.longitude.to_string();

        let res = self
            .http
            .get(format!("{}/v1/forecast", self.base_url))
            .query(&[
                ("latitude", lat.as_str()),
                ("longitude", lon.as_str()),
                ("current", "temperature_2m,relative_humidity_2m,weather_code,wind_speed_10m"),
                ("timezone", "auto"),
            ])
            .send()
            .await?;

        let status = res.status();
        let body = res.text().await?;

        if !status.is_success() {
            return Err(WeatherError::api("current weather", status, &body));
        }

        let parsed: CurrentResponse =
            serde_json::from_str(&body).map_err(|e| WeatherError::decode("current weather", e))?;

        let current = parsed.current.ok_or(WeatherError::DataUnavailable("current conditions"))?;
        let described = conditions::describe(current.weather_code);

        Ok(CurrentWeatherData {
            temperature_c: current.temperature_2m.round() as i32,
            condition: described.condition.to_string(),
            icon: described.icon.to_string(),
            wind_speed_kmh: current.wind_speed_10m.map(|w| w.round() as i32),
            humidity_pct: current.relative_humidity_2m.map(|h| h.round() as u8),
        })
    }

    /// Fetch the five-day daily forecast for `coords`, or for the
    /// fallback location when `None`. Day 0 is the response's base day.
    pub async fn five_day_forecast(
        &self,
        coords: Option<Coordinates>,
    ) -> Result<FiveDayForecast, WeatherError> {
        let coords = coords.unwrap_or(FALLBACK_COORDINATES);
        let lat = coords.latitude.to_string();
        let lon = coords.longitude.to_string();
        let day_count = FORECAST_DAYS.to_string();

        let res = self
            .http
            .get(format!("{}/v1/forecast", self.base_url))
            .query(&[
                ("latitude", lat.as_str()),
                ("longitude", lon.as_str()),
                ("daily", "weather_code,temperature_2m_max,temperature_2m_min"),
                ("forecast_days", day_count.as_str()),
                ("timezone", "auto"),
            ])
            .send()
            .await?;

        let status = res.status();
        let body = res.text().await?;

        if !status.is_success() {
            return Err(WeatherError::api("forecast", status, &body));
        }

        let parsed: ForecastResponse =
            serde_json::from_str(&body).map_err(|e| WeatherError::decode("forecast", e))?;

        let daily = parsed.daily.ok_or(WeatherError::DataUnavailable("daily forecast"))?;

        let mut days = Vec::with_capacity(FORECAST_DAYS);
        for offset in 0..FORECAST_DAYS {
            let stamp = daily
                .time
                .get(offset)
                .ok_or(WeatherError::DataUnavailable("daily forecast"))?;
            let date = NaiveDate::parse_from_str(stamp, "%Y-%m-%d")
                .map_err(|e| WeatherError::decode("forecast", e))?;
            let code = *daily
                .weather_code
                .get(offset)
                .ok_or(WeatherError::DataUnavailable("daily forecast"))?;
            let high = *daily
                .temperature_2m_max
                .get(offset)
                .ok_or(WeatherError::DataUnavailable("daily forecast"))?;
            let low = *daily
                .temperature_2m_min
                .get(offset)
                .ok_or(WeatherError::DataUnavailable("daily forecast"))?;

            let described = conditions::describe(code);
            days.push(ForecastDay {
                date,
                label: date.format("%a, %b %-d").to_string(),
                high_c: high.round() as i32,
                low_c: low.round() as i32,
                condition: described.condition.to_string(),
                icon: described.icon.to_string(),
                code,
            });
        }

        let days: [ForecastDay; FORECAST_DAYS] =
            days.try_into().map_err(|_| WeatherError::DataUnavailable("daily forecast"))?;

        Ok(FiveDayForecast { days })
    }
}

#[derive(Debug, Deserialize)]
struct CurrentResponse {
    current: Option<CurrentBlock>,
}

#[derive(Debug, Deserialize)]
struct CurrentBlock {
    temperature_2m: f64,
    relative_humidity_2m: Option<f64>,
    weather_code: i32,
    wind_speed_10m: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct ForecastResponse {
    daily: Option<DailyBlock>,
}

#[derive(Debug, Deserialize)]
struct DailyBlock {
    time: Vec<String>,
    weather_code: Vec<i32>,
    temperature_2m_max: Vec<f64>,
    temperature_2m_min: Vec<f64>,
}
