//! Human-friendly terminal output.

use skycast_core::model::{CitySearchResult, CurrentWeatherData, FiveDayForecast, UserLocationInfo};

pub fn print_current(label: &str, weather: &CurrentWeatherData) {
    println!("{} Current weather", weather.icon);
    println!("📍 {label}");
    println!("🌡️ {}°C, {}", weather.temperature_c, weather.condition);
    if let Some(wind) = weather.wind_speed_kmh {
        println!("💨 {wind} km/h");
    }
    if let Some(humidity) = weather.humidity_pct {
        println!("💧 {humidity}%");
    }
}

pub fn print_forecast(label: &str, forecast: &FiveDayForecast) {
    println!("📅 5-day forecast for {label}");
    for day in &forecast.days {
        println!(
            "  {:<11} {}  {:>3}° / {:>3}°  {}",
            day.label, day.icon, day.high_c, day.low_c, day.condition
        );
    }
}

pub fn print_location(info: &UserLocationInfo) {
    println!("📍 {}, {}", info.city, info.country);
    println!("   {}", info.coordinates);
    println!("   via {}", info.source);
}

pub fn print_search_results(query: &str, results: &[CitySearchResult]) {
    if results.is_empty() {
        println!("No cities matching '{query}'.");
        return;
    }

    println!("Cities matching '{query}':");
    for city in results {
        println!("  {}", city_line(city));
    }
}

/// One search hit on one line, e.g.
/// `London - England, United Kingdom (51.51, -0.13, pop 9.0M)`.
pub fn city_line(city: &CitySearchResult) -> String {
    let mut region = String::new();
    if let Some(admin1) = &city.admin1 {
        region.push_str(admin1);
        region.push_str(", ");
    }
    region.push_str(&city.country);

    let mut details = format!("{:.2}, {:.2}", city.latitude, city.longitude);
    if let Some(population) = format_population(city.population) {
        details.push_str(&format!(", pop {population}"));
    }

    format!("{} - {} ({})", city.name, region, details)
}

/// Short display name for a picked city, e.g. `London, United Kingdom`.
pub fn city_label(city: &CitySearchResult) -> String {
    format!("{}, {}", city.name, city.country)
}

/// Compact population figure: 8961989 → "9.0M", 85000 → "85K".
pub fn format_population(population: Option<u64>) -> Option<String> {
    let population = population?;
    let formatted = if population >= 1_000_000 {
        format!("{:.1}M", population as f64 / 1_000_000.0)
    } else if population >= 1_000 {
        format!("{:.0}K", population as f64 / 1_000.0)
    } else {
        population.to_string()
    };
    Some(formatted)
}
