//! Location resolution.
//!
//! An ordered chain of sources, most precise first: device position
//! (reverse-geocoded into a name), primary IP geolocation, secondary IP
//! geolocation, then a static default. Sources run strictly one at a
//! time; a source's failure means immediate fallthrough, never a retry.
//! The chain ends in a source that cannot fail, so callers always get a
//! location unless the resolver itself is broken.

use async_trait::async_trait;

use crate::config::{Config, SavedPlace};
use crate::error::LocationError;
use crate::geocode::GeocodingClient;
use crate::model::{Coordinates, LocationSource, UserLocationInfo};

pub mod device;
pub mod ip;

pub use device::{DevicePosition, PositionRequest, PositionSource};
pub use ip::{IpApiLocator, IpGeolocationLocator};

/// Last-resort location when no source can do better (London).
pub const DEFAULT_LOCATION: Coordinates =
    Coordinates { latitude: 51.5074, longitude: -0.1278 };
pub const DEFAULT_CITY: &str = "London";
pub const DEFAULT_COUNTRY: &str = "United Kingdom";

/// One step of the fallback chain.
#[async_trait]
pub trait LocationStrategy: Send + Sync {
    fn name(&self) -> &'static str;

    async fn locate(&self) -> Result<UserLocationInfo, LocationError>;
}

/// Runs the strategies in order and stops at the first success.
pub struct LocationResolver {
    strategies: Vec<Box<dyn LocationStrategy>>,
}

impl LocationResolver {
    /// Build the standard chain. `position` is the device seam; pass
    /// `None` where no device position source exists and the chain
    /// starts at IP geolocation.
    pub fn new(
        geocoder: GeocodingClient,
        position: Option<std::sync::Arc<dyn PositionSource>>,
        config: &Config,
    ) -> Result<Self, LocationError> {
        let mut strategies: Vec<Box<dyn LocationStrategy>> = Vec::new();

        if let Some(source) = position {
            strategies.push(Box::new(DevicePosition::new(source, geocoder)));
        }
        strategies.push(Box::new(IpApiLocator::new()?));
        strategies.push(Box::new(IpGeolocationLocator::new(
            config.ip_geolocation_api_key.clone(),
        )?));
        strategies.push(Box::new(StaticDefault::new(config.default_place.clone())));

        Ok(Self { strategies })
    }

    /// Build a resolver over an explicit chain.
    pub fn from_strategies(strategies: Vec<Box<dyn LocationStrategy>>) -> Self {
        Self { strategies }
    }

    /// Produce exactly one location. Errors only when every strategy,
    /// including the static default, failed.
    pub async fn resolve(&self) -> Result<UserLocationInfo, LocationError> {
        for strategy in &self.strategies {
            match strategy.locate().await {
                Ok(info) => {
                    tracing::info!(
                        source = strategy.name(),
                        city = %info.city,
                        country = %info.country,
                        "location resolved"
                    );
                    return Ok(info);
                }
                Err(err) => {
                    tracing::warn!(
                        source = strategy.name(),
                        error = %err,
                        "location source failed, falling through"
                    );
                }
            }
        }

        Err(LocationError::Exhausted)
    }
}

/// Terminal strategy: the configured default place, or London.
pub struct StaticDefault {
    place: Option<SavedPlace>,
}

impl StaticDefault {
    pub fn new(place: Option<SavedPlace>) -> Self {
        Self { place }
    }
}

#[async_trait]
impl LocationStrategy for StaticDefault {
    fn name(&self) -> &'static str {
        "static default"
    }

    async fn locate(&self) -> Result<UserLocationInfo, LocationError> {
        let info = match &self.place {
            Some(place) => UserLocationInfo {
                coordinates: Coordinates::new(place.latitude, place.longitude)?,
                city: place.name.clone(),
                country: place.country.clone(),
                source: LocationSource::Default,
            },
            None => UserLocationInfo {
                coordinates: DEFAULT_LOCATION,
                city: DEFAULT_CITY.to_string(),
                country: DEFAULT_COUNTRY.to_string(),
                source: LocationSource::Default,
            },
        };
        Ok(info)
    }
}
