use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use tokio::io::{AsyncBufReadExt, BufReader};

use skycast_core::config::{Config, SavedPlace};
use skycast_core::debounce::Debouncer;
use skycast_core::geocode::GeocodingClient;
use skycast_core::location::LocationResolver;
use skycast_core::model::{CitySearchResult, Coordinates, UserLocationInfo};
use skycast_core::session::LocationSession;
use skycast_core::weather::WeatherClient;

use crate::render;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "skycast", version, about = "Location-aware weather lookup")]
pub struct Cli {
    /// Emit machine-readable JSON instead of formatted text.
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Show current weather for your location, or for a named city.
    Now {
        /// City name; if absent, your location is resolved automatically.
        city: Option<String>,
    },

    /// Show the five-day forecast for your location, or for a named city.
    Forecast {
        /// City name; if absent, your location is resolved automatically.
        city: Option<String>,
    },

    /// Search for cities by name.
    Search {
        /// Free-text query; required unless --live is given.
        query: Option<String>,

        /// Read queries from stdin, debouncing lookups as you type.
        #[arg(long)]
        live: bool,
    },

    /// Show where skycast thinks you are and which source said so.
    Locate {
        /// Resolve again instead of reusing the session's cached location.
        #[arg(long)]
        refresh: bool,
    },

    /// Interactively pick a default place and store credentials.
    Configure,
}

/// Where a weather lookup points, with its display name.
struct Target {
    coordinates: Coordinates,
    label: String,
}

impl Cli {
    pub async fn run(self) -> Result<()> {
        let config = Config::load()?;

        match self.command {
            Command::Now { city } => {
                let target = target_for(city.as_deref(), &config).await?;
                let weather = WeatherClient::new()?
                    .current(Some(target.coordinates))
                    .await
                    .context("Failed to fetch current weather")?;

                if self.json {
                    println!(
                        "{}",
                        serde_json::to_string_pretty(&serde_json::json!({
                            "location": target.label,
                            "coordinates": target.coordinates,
                            "weather": weather,
                        }))?
                    );
                } else {
                    render::print_current(&target.label, &weather);
                }
            }

            Command::Forecast { city } => {
                let target = target_for(city.as_deref(), &config).await?;
                let forecast = WeatherClient::new()?
                    .five_day_forecast(Some(target.coordinates))
                    .await
                    .context("Failed to fetch the forecast")?;

                if self.json {
                    println!(
                        "{}",
                        serde_json::to_string_pretty(&serde_json::json!({
                            "location": target.label,
                            "coordinates": target.coordinates,
                            "forecast": forecast.days,
                        }))?
                    );
                } else {
                    render::print_forecast(&target.label, &forecast);
                }
            }

            Command::Search { query, live } => {
                let geocoder = GeocodingClient::new()?;

                if live {
                    return live_search(geocoder, &config).await;
                }

                let Some(query) = query else {
                    bail!("Provide a query, or use --live to search as you type.");
                };

                let results = geocoder
                    .search_cities(&query)
                    .await
                    .with_context(|| format!("City search for '{query}' failed"))?;

                if self.json {
                    println!("{}", serde_json::to_string_pretty(&results)?);
                } else {
                    render::print_search_results(&query, &results);
                }
            }

            Command::Locate { refresh } => {
                let session = session(&config)?;
                let resolved = if refresh {
                    session.refresh().await
                } else {
                    session.get_or_resolve().await
                };
                let info = resolved.context("Failed to resolve your location")?;

                if self.json {
                    println!("{}", serde_json::to_string_pretty(info.as_ref())?);
                } else {
                    render::print_location(&info);
                }
            }

            Command::Configure => {
                configure(config).await?;
            }
        }

        Ok(())
    }
}

fn session(config: &Config) -> Result<LocationSession> {
    let geocoder = GeocodingClient::new()?;
    // No device position source on a plain terminal; the chain starts
    // at IP geolocation. Embedders with a receiver pass one here.
    let resolver = LocationResolver::new(geocoder, None, config)?;
    Ok(LocationSession::new(resolver))
}

async fn target_for(city: Option<&str>, config: &Config) -> Result<Target> {
    match city {
        Some(query) => {
            let geocoder = GeocodingClient::new()?;
            let results = geocoder
                .search_cities(query)
                .await
                .with_context(|| format!("City search for '{query}' failed"))?;
            let city = results
                .into_iter()
                .next()
                .with_context(|| format!("No city matching '{query}'"))?;

            Ok(Target {
                coordinates: Coordinates::new(city.latitude, city.longitude)?,
                label: render::city_label(&city),
            })
        }
        None => {
            let info = session(config)?
                .get_or_resolve()
                .await
                .context("Failed to resolve your location")?;
            Ok(Target { coordinates: info.coordinates, label: location_label(&info) })
        }
    }
}

fn location_label(info: &UserLocationInfo) -> String {
    format!("{}, {}", info.city, info.country)
}

async fn live_search(geocoder: GeocodingClient, config: &Config) -> Result<()> {
    let mut debouncer = Debouncer::new(config.search_debounce());
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    println!("Type a city name and press enter; an empty line quits.");
    while let Some(line) = lines.next_line().await? {
        let query = line.trim().to_string();
        if query.is_empty() {
            break;
        }

        let client = geocoder.clone();
        debouncer.schedule(async move {
            match client.search_cities(&query).await {
                Ok(results) => render::print_search_results(&query, &results),
                Err(err) => eprintln!("Search for '{query}' failed: {err}"),
            }
        });
    }

    Ok(())
}

async fn configure(mut config: Config) -> Result<()> {
    let geocoder = GeocodingClient::new()?;

    let query = inquire::Text::new("Default city:")
        .with_help_message("Used when no location source can find you")
        .prompt()?;

    let results = geocoder
        .search_cities(&query)
        .await
        .with_context(|| format!("City search for '{query}' failed"))?;
    if results.is_empty() {
        bail!("No city matching '{query}'. Try a different spelling.");
    }

    let options: Vec<CityOption> = results.into_iter().map(CityOption).collect();
    let chosen = inquire::Select::new("Pick a city:", options).prompt()?.0;

    config.set_default_place(SavedPlace {
        name: chosen.name,
        country: chosen.country,
        latitude: chosen.latitude,
        longitude: chosen.longitude,
    });

    let key = inquire::Text::new("ipgeolocation.io API key:")
        .with_help_message("Optional; leave empty to keep using the demo key")
        .prompt()?;
    let key = key.trim();
    if !key.is_empty() {
        config.ip_geolocation_api_key = Some(key.to_string());
    }

    config.save()?;
    println!("Saved to {}", Config::config_file_path()?.display());

    Ok(())
}

struct CityOption(CitySearchResult);

impl std::fmt::Display for CityOption {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&render::city_line(&self.0))
    }
}
