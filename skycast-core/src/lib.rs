//! Core library for the `skycast` CLI.
//!
//! This crate defines:
//! - The location resolution chain (device position → IP geolocation →
//!   static default) and the session slot that caches its result
//! - Clients for current weather, forecasts and geocoding
//! - WMO weather-code translation and shared domain models
//!
//! It is used by `skycast-cli`, but can also be reused by other binaries or services.

pub mod conditions;
pub mod config;
pub mod debounce;
pub mod error;
pub mod geocode;
pub mod location;
pub mod model;
pub mod session;
pub mod weather;

pub use config::{Config, SavedPlace};
pub use debounce::{DEFAULT_SEARCH_DEBOUNCE, Debouncer};
pub use error::{LocationError, WeatherError};
pub use geocode::GeocodingClient;
pub use location::{LocationResolver, LocationStrategy, PositionSource};
pub use model::{
    CitySearchResult, Coordinates, CurrentWeatherData, FiveDayForecast, ForecastDay,
    LocationSource, PlaceName, UserLocationInfo,
};
pub use session::LocationSession;
pub use weather::WeatherClient;
