//! Device position strategy.
//!
//! The platform's position source sits behind [`PositionSource`] so the
//! chain works the same against a real receiver, an embedder-provided
//! implementation, or a test double. A fix is requested in low-accuracy
//! mode with a bounded wait. Once the fix is in, naming it is cosmetic:
//! a reverse-geocoding failure downgrades the name to "Unknown" but
//! never discards the coordinates.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use crate::error::LocationError;
use crate::geocode::GeocodingClient;
use crate::location::LocationStrategy;
use crate::model::{Coordinates, LocationSource, PlaceName, UserLocationInfo};

/// Upper bound on waiting for a device fix.
pub const POSITION_WAIT_BUDGET: Duration = Duration::from_secs(10);

/// Options passed to the position source.
#[derive(Debug, Clone, Copy)]
pub struct PositionRequest {
    /// Low accuracy trades precision for speed and battery; the resolver
    /// always asks for low accuracy.
    pub high_accuracy: bool,
}

/// Seam over whatever can report device coordinates.
#[async_trait]
pub trait PositionSource: Send + Sync {
    async fn position(&self, request: PositionRequest) -> Result<Coordinates, LocationError>;
}

pub struct DevicePosition {
    source: Arc<dyn PositionSource>,
    geocoder: GeocodingClient,
    wait_budget: Duration,
}

impl DevicePosition {
    pub fn new(source: Arc<dyn PositionSource>, geocoder: GeocodingClient) -> Self {
        Self { source, geocoder, wait_budget: POSITION_WAIT_BUDGET }
    }
}

#[async_trait]
impl LocationStrategy for DevicePosition {
    fn name(&self) -> &'static str {
        "device position"
    }

    async fn locate(&self) -> Result<UserLocationInfo, LocationError> {
        let request = PositionRequest { high_accuracy: false };
        let fix = tokio::time::timeout(self.wait_budget, self.source.position(request))
            .await
            .map_err(|_| LocationError::Timeout)??;

        // The fix is trusted even when naming it fails.
        let place = match self.geocoder.try_reverse_geocode(fix).await {
            Ok(place) => place,
            Err(err) => {
                tracing::debug!(error = %err, "could not name device position");
                PlaceName { city: "Unknown".to_string(), country: "Unknown".to_string() }
            }
        };

        Ok(UserLocationInfo {
            coordinates: fix,
            city: place.city,
            country: place.country,
            source: LocationSource::Device,
        })
    }
}
