//! WMO weather-code translation.
//!
//! Maps the integer `weather_code` reported by the forecast API to a
//! human-readable condition and an emoji icon. The table is constant,
//! total over all integers, and side-effect free: codes outside the
//! documented set translate to a fixed "Unknown" pair rather than an
//! error.
//! See: https://open-meteo.com/en/docs#weathervariables

/// Condition text and icon for one weather code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Description {
    pub condition: &'static str,
    pub icon: &'static str,
}

/// Fallback for codes missing from the table.
pub const UNKNOWN: Description = Description { condition: "Unknown", icon: "❓" };

/// Translate a WMO weather code into its display pair.
pub fn describe(code: i32) -> Description {
    let (condition, icon) = match code {
        0 => ("Clear sky", "☀️"),
        1 => ("Mainly clear", "🌤️"),
        2 => ("Partly cloudy", "⛅"),
        3 => ("Overcast", "☁️"),
        45 => ("Fog", "🌫️"),
        48 => ("Depositing rime fog", "🌫️"),
        51 => ("Light drizzle", "🌦️"),
        53 => ("Moderate drizzle", "🌦️"),
        55 => ("Dense drizzle", "🌦️"),
        56 => ("Light freezing drizzle", "🌦️"),
        57 => ("Dense freezing drizzle", "🌦️"),
        61 => ("Slight rain", "🌧️"),
        63 => ("Moderate rain", "🌧️"),
        65 => ("Heavy rain", "🌧️"),
        66 => ("Light freezing rain", "🌧️"),
        67 => ("Heavy freezing rain", "🌧️"),
        71 => ("Slight snow fall", "🌨️"),
        73 => ("Moderate snow fall", "🌨️"),
        75 => ("Heavy snow fall", "🌨️"),
        77 => ("Snow grains", "🌨️"),
        80 => ("Slight rain showers", "🌨️"),
        81 => ("Moderate rain showers", "🌨️"),
        82 => ("Violent rain showers", "🌨️"),
        85 => ("Slight snow showers", "❄️"),
        86 => ("Heavy snow showers", "❄️"),
        95 => ("Thunderstorm", "⛈️"),
        96 => ("Thunderstorm with slight hail", "⛈️"),
        99 => ("Thunderstorm with heavy hail", "⛈️"),
        _ => return UNKNOWN,
    };
    Description { condition, icon }
}
