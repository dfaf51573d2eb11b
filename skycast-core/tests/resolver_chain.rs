//! End-to-end precedence tests for the location fallback chain, with
//! each provider stubbed by its own HTTP server.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;
use wiremock::matchers::{any, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use skycast_core::error::LocationError;
use skycast_core::geocode::GeocodingClient;
use skycast_core::location::{
    DEFAULT_LOCATION, DevicePosition, IpApiLocator, IpGeolocationLocator, LocationResolver,
    PositionRequest, PositionSource, StaticDefault,
};
use skycast_core::model::{Coordinates, LocationSource};

struct FixedSource(Coordinates);

#[async_trait]
impl PositionSource for FixedSource {
    async fn position(&self, _request: PositionRequest) -> Result<Coordinates, LocationError> {
        Ok(self.0)
    }
}

async fn untouched_server() -> MockServer {
    let server = MockServer::start().await;
    Mock::given(any()).respond_with(ResponseTemplate::new(500)).expect(0).mount(&server).await;
    server
}

async fn primary_with(body: serde_json::Value) -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/json/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(&server)
        .await;
    server
}

#[tokio::test]
async fn device_fix_preempts_every_ip_provider() {
    let reverse = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/reverse"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "address": { "city": "Oslo", "country": "Norway" }
        })))
        .mount(&reverse)
        .await;

    let primary = untouched_server().await;
    let secondary = untouched_server().await;

    let fix = Coordinates::new(59.9139, 10.7522).expect("coords");
    let geocoder =
        GeocodingClient::with_base_urls(reverse.uri(), reverse.uri()).expect("geocoder");

    let resolver = LocationResolver::from_strategies(vec![
        Box::new(DevicePosition::new(Arc::new(FixedSource(fix)), geocoder)),
        Box::new(IpApiLocator::with_base_url(primary.uri()).expect("primary")),
        Box::new(IpGeolocationLocator::with_base_url(secondary.uri(), None).expect("secondary")),
        Box::new(StaticDefault::new(None)),
    ]);

    let info = resolver.resolve().await.expect("resolved");
    assert_eq!(info.coordinates, fix);
    assert_eq!(info.city, "Oslo");
    assert_eq!(info.source, LocationSource::Device);
}

#[tokio::test]
async fn primary_ip_success_skips_the_secondary_provider() {
    let primary = primary_with(json!({
        "latitude": 52.52,
        "longitude": 13.405,
        "city": "Berlin",
        "country_name": "Germany"
    }))
    .await;
    let secondary = untouched_server().await;

    let resolver = LocationResolver::from_strategies(vec![
        Box::new(IpApiLocator::with_base_url(primary.uri()).expect("primary")),
        Box::new(IpGeolocationLocator::with_base_url(secondary.uri(), None).expect("secondary")),
        Box::new(StaticDefault::new(None)),
    ]);

    let info = resolver.resolve().await.expect("resolved");
    assert_eq!(info.city, "Berlin");
    assert_eq!(info.country, "Germany");
    assert_eq!(info.source, LocationSource::PrimaryIp);
}

#[tokio::test]
async fn malformed_primary_falls_through_to_the_secondary_provider() {
    let primary = primary_with(json!({ "error": true, "reason": "RateLimited" })).await;

    let secondary = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/ipgeo"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "latitude": "35.6895",
            "longitude": "139.6917",
            "city": "Tokyo",
            "country_name": "Japan"
        })))
        .expect(1)
        .mount(&secondary)
        .await;

    let resolver = LocationResolver::from_strategies(vec![
        Box::new(IpApiLocator::with_base_url(primary.uri()).expect("primary")),
        Box::new(IpGeolocationLocator::with_base_url(secondary.uri(), None).expect("secondary")),
        Box::new(StaticDefault::new(None)),
    ]);

    let info = resolver.resolve().await.expect("resolved");
    assert_eq!(info.city, "Tokyo");
    assert_eq!(info.source, LocationSource::SecondaryIp);
}

#[tokio::test]
async fn every_provider_failing_still_yields_the_default_location() {
    let primary = MockServer::start().await;
    Mock::given(any()).respond_with(ResponseTemplate::new(503)).mount(&primary).await;
    let secondary = MockServer::start().await;
    Mock::given(any()).respond_with(ResponseTemplate::new(503)).mount(&secondary).await;

    let resolver = LocationResolver::from_strategies(vec![
        Box::new(IpApiLocator::with_base_url(primary.uri()).expect("primary")),
        Box::new(IpGeolocationLocator::with_base_url(secondary.uri(), None).expect("secondary")),
        Box::new(StaticDefault::new(None)),
    ]);

    let info = resolver.resolve().await.expect("resolver never fails here");
    assert_eq!(info.coordinates, DEFAULT_LOCATION);
    assert_eq!(info.city, "London");
    assert_eq!(info.country, "United Kingdom");
    assert_eq!(info.source, LocationSource::Default);
}
