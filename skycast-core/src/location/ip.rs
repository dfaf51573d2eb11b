//! IP-based geolocation strategies.
//!
//! Two independent providers with different response shapes: the primary
//! reports latitude/longitude as numbers, the secondary as JSON strings.
//! Each strategy issues exactly one request; a missing or out-of-range
//! coordinate pair is a failure, which the resolver turns into
//! fallthrough.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use crate::error::LocationError;
use crate::location::LocationStrategy;
use crate::model::{Coordinates, LocationSource, UserLocationInfo};

const IPAPI_BASE_URL: &str = "https://ipapi.co";
const IPGEOLOCATION_BASE_URL: &str = "https://api.ipgeolocation.io";
/// The secondary provider serves a limited quota without registration.
const IPGEOLOCATION_DEMO_KEY: &str = "demo";
const REQUEST_TIMEOUT_SECS: u64 = 10;

fn http_client() -> Result<Client, LocationError> {
    Ok(Client::builder().timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS)).build()?)
}

fn display_name(raw: Option<String>) -> String {
    raw.filter(|s| !s.is_empty()).unwrap_or_else(|| "Unknown".to_string())
}

/// Primary provider: ipapi.co.
pub struct IpApiLocator {
    http: Client,
    base_url: String,
}

impl IpApiLocator {
    pub fn new() -> Result<Self, LocationError> {
        Self::with_base_url(IPAPI_BASE_URL)
    }

    pub fn with_base_url(base_url: impl Into<String>) -> Result<Self, LocationError> {
        Ok(Self { http: http_client()?, base_url: base_url.into() })
    }
}

#[derive(Debug, Deserialize)]
struct IpApiResponse {
    latitude: Option<f64>,
    longitude: Option<f64>,
    city: Option<String>,
    country_name: Option<String>,
}

#[async_trait]
impl LocationStrategy for IpApiLocator {
    fn name(&self) -> &'static str {
        "ipapi.co"
    }

    async fn locate(&self) -> Result<UserLocationInfo, LocationError> {
        let res = self.http.get(format!("{}/json/", self.base_url)).send().await?;

        let status = res.status();
        let body = res.text().await?;

        if !status.is_success() {
            return Err(LocationError::api("ipapi.co", status, &body));
        }

        let parsed: IpApiResponse =
            serde_json::from_str(&body).map_err(|e| LocationError::invalid("ipapi.co", e))?;

        let (Some(latitude), Some(longitude)) = (parsed.latitude, parsed.longitude) else {
            return Err(LocationError::invalid("ipapi.co", "no coordinates in response"));
        };

        Ok(UserLocationInfo {
            coordinates: Coordinates::new(latitude, longitude)?,
            city: display_name(parsed.city),
            country: display_name(parsed.country_name),
            source: LocationSource::PrimaryIp,
        })
    }
}

/// Secondary provider: ipgeolocation.io.
pub struct IpGeolocationLocator {
    http: Client,
    base_url: String,
    api_key: String,
}

impl IpGeolocationLocator {
    pub fn new(api_key: Option<String>) -> Result<Self, LocationError> {
        Self::with_base_url(IPGEOLOCATION_BASE_URL, api_key)
    }

    pub fn with_base_url(
        base_url: impl Into<String>,
        api_key: Option<String>,
    ) -> Result<Self, LocationError> {
        Ok(Self {
            http: http_client()?,
            base_url: base_url.into(),
            api_key: api_key.unwrap_or_else(|| IPGEOLOCATION_DEMO_KEY.to_string()),
        })
    }
}

#[derive(Debug, Deserialize)]
struct IpGeolocationResponse {
    // This provider encodes coordinates as strings.
    latitude: Option<String>,
    longitude: Option<String>,
    city: Option<String>,
    country_name: Option<String>,
}

fn parse_coordinate(
    service: &'static str,
    raw: Option<String>,
) -> Result<f64, LocationError> {
    let raw = raw.ok_or_else(|| LocationError::invalid(service, "no coordinates in response"))?;
    raw.parse::<f64>()
        .map_err(|_| LocationError::invalid(service, format!("unparsable coordinate '{raw}'")))
}

#[async_trait]
impl LocationStrategy for IpGeolocationLocator {
    fn name(&self) -> &'static str {
        "ipgeolocation.io"
    }

    async fn locate(&self) -> Result<UserLocationInfo, LocationError> {
        let res = self
            .http
            .get(format!("{}/ipgeo", self.base_url))
            .query(&[("apiKey", self.api_key.as_str())])
            .send()
            .await?;

        let status = res.status();
        let body = res.text().await?;

        if !status.is_success() {
            return Err(LocationError::api("ipgeolocation.io", status, &body));
        }

        let parsed: IpGeolocationResponse = serde_json::from_str(&body)
            .map_err(|e| LocationError::invalid("ipgeolocation.io", e))?;

        let latitude = parse_coordinate("ipgeolocation.io", parsed.latitude)?;
        let longitude = parse_coordinate("ipgeolocation.io", parsed.longitude)?;

        Ok(UserLocationInfo {
            coordinates: Coordinates::new(latitude, longitude)?,
            city: display_name(parsed.city),
            country: display_name(parsed.country_name),
            source: LocationSource::SecondaryIp,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn primary_maps_numeric_coordinates() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/json/"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "latitude": 52.52,
                "longitude": 13.405,
                "city": "Berlin",
                "country_name": "Germany"
            })))
            .mount(&server)
            .await;

        let locator = IpApiLocator::with_base_url(server.uri()).expect("locator");
        let info = locator.locate().await.expect("located");

        assert_eq!(info.coordinates.latitude, 52.52);
        assert_eq!(info.city, "Berlin");
        assert_eq!(info.country, "Germany");
        assert_eq!(info.source, LocationSource::PrimaryIp);
    }

    #[tokio::test]
    async fn primary_defaults_missing_names_to_unknown() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/json/"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "latitude": 52.52,
                "longitude": 13.405
            })))
            .mount(&server)
            .await;

        let locator = IpApiLocator::with_base_url(server.uri()).expect("locator");
        let info = locator.locate().await.expect("located");
        assert_eq!(info.city, "Unknown");
        assert_eq!(info.country, "Unknown");
    }

    #[tokio::test]
    async fn primary_rejects_responses_without_coordinates() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/json/"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "error": true,
                "reason": "RateLimited"
            })))
            .mount(&server)
            .await;

        let locator = IpApiLocator::with_base_url(server.uri()).expect("locator");
        let err = locator.locate().await.unwrap_err();
        assert!(matches!(err, LocationError::InvalidResponse { .. }));
    }

    #[tokio::test]
    async fn primary_rejects_out_of_range_coordinates() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/json/"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "latitude": 912.0,
                "longitude": 13.405
            })))
            .mount(&server)
            .await;

        let locator = IpApiLocator::with_base_url(server.uri()).expect("locator");
        let err = locator.locate().await.unwrap_err();
        assert!(matches!(err, LocationError::OutOfRange { .. }));
    }

    #[tokio::test]
    async fn secondary_parses_string_coordinates_and_sends_demo_key() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/ipgeo"))
            .and(query_param("apiKey", "demo"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "latitude": "51.5074",
                "longitude": "-0.1278",
                "city": "London",
                "country_name": "United Kingdom"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let locator = IpGeolocationLocator::with_base_url(server.uri(), None).expect("locator");
        let info = locator.locate().await.expect("located");

        assert_eq!(info.coordinates.latitude, 51.5074);
        assert_eq!(info.coordinates.longitude, -0.1278);
        assert_eq!(info.city, "London");
        assert_eq!(info.source, LocationSource::SecondaryIp);
    }

    #[tokio::test]
    async fn secondary_uses_the_configured_api_key() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/ipgeo"))
            .and(query_param("apiKey", "real-key"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "latitude": "48.8566",
                "longitude": "2.3522"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let locator =
            IpGeolocationLocator::with_base_url(server.uri(), Some("real-key".to_string()))
                .expect("locator");
        locator.locate().await.expect("located");
    }

    #[tokio::test]
    async fn secondary_rejects_unparsable_coordinates() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/ipgeo"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "latitude": "not-a-number",
                "longitude": "-0.1278"
            })))
            .mount(&server)
            .await;

        let locator = IpGeolocationLocator::with_base_url(server.uri(), None).expect("locator");
        let err = locator.locate().await.unwrap_err();
        assert!(matches!(err, LocationError::InvalidResponse { .. }));
    }
}
