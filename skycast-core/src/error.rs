use reqwest::StatusCode;

/// Errors from the weather and geocoding HTTP clients.
#[derive(Debug, thiserror::Error)]
pub enum WeatherError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("{service} request failed with status {status}: {body}")]
    Api {
        service: &'static str,
        status: StatusCode,
        body: String,
    },

    #[error("Failed to decode {service} response: {reason}")]
    Decode {
        service: &'static str,
        reason: String,
    },

    /// The upstream answered, but without the block this operation needs.
    /// There is no further fallback for weather data, so this surfaces to
    /// the caller instead of being absorbed.
    #[error("Upstream response is missing the {0} block")]
    DataUnavailable(&'static str),
}

impl WeatherError {
    pub(crate) fn api(service: &'static str, status: StatusCode, body: &str) -> Self {
        Self::Api { service, status, body: truncate_body(body) }
    }

    pub(crate) fn decode(service: &'static str, err: impl std::fmt::Display) -> Self {
        Self::Decode { service, reason: err.to_string() }
    }
}

/// Errors from a single location source. Inside the resolver chain these
/// trigger fallthrough to the next source; only `Exhausted` escapes.
#[derive(Debug, thiserror::Error)]
pub enum LocationError {
    #[error("Position permission denied")]
    PermissionDenied,

    #[error("Position source unavailable")]
    ServiceUnavailable,

    #[error("Position request timed out")]
    Timeout,

    #[error("Coordinates out of range: {latitude}, {longitude}")]
    OutOfRange { latitude: f64, longitude: f64 },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("{service} request failed with status {status}: {body}")]
    Api {
        service: &'static str,
        status: StatusCode,
        body: String,
    },

    #[error("Invalid response from {service}: {reason}")]
    InvalidResponse {
        service: &'static str,
        reason: String,
    },

    #[error("Every location source failed")]
    Exhausted,
}

impl LocationError {
    pub(crate) fn api(service: &'static str, status: StatusCode, body: &str) -> Self {
        Self::Api { service, status, body: truncate_body(body) }
    }

    pub(crate) fn invalid(service: &'static str, reason: impl std::fmt::Display) -> Self {
        Self::InvalidResponse { service, reason: reason.to_string() }
    }
}

pub(crate) fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    if body.len() > MAX {
        let mut end = MAX;
        while !body.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}...", &body[..end])
    } else {
        body.to_string()
    }
}
