//! Live weather collaborator: resolves a city name to coordinates and
//! reads the current temperature and relative humidity from Open-Meteo.

use anyhow::{anyhow, Context, Result};
use futures::future::BoxFuture;
use serde::Deserialize;
use std::time::Duration;

const GEOCODING_URL: &str = "https://geocoding-api.open-meteo.com/v1/search";
const FORECAST_URL: &str = "https://api.open-meteo.com/v1/forecast";

/// One completed reading from the collaborator.
#[derive(Debug, Clone, PartialEq)]
pub struct WeatherObservation {
    pub temperature: f64,
    /// Relative humidity in percent, 0-100.
    pub humidity: f64,
    /// Resolved display name of the location the reading is for.
    pub location_name: String,
}

/// The seam the controller talks through. The core only consumes the
/// observation tuple; the transport is this module's business.
pub trait WeatherProvider: Send + Sync {
    fn fetch_current(&self, location: &str) -> BoxFuture<'_, Result<WeatherObservation>>;
}

#[derive(Deserialize)]
struct GeocodingResponse {
    results: Option<Vec<GeocodingHit>>,
}

#[derive(Deserialize)]
struct GeocodingHit {
    name: String,
    latitude: f64,
    longitude: f64,
    country: Option<String>,
}

#[derive(Deserialize)]
struct ForecastResponse {
    current: CurrentWeather,
}

#[derive(Deserialize)]
struct CurrentWeather {
    temperature_2m: f64,
    relative_humidity_2m: f64,
}

/// Open-Meteo client: one geocoding lookup, then one current-weather read.
pub struct OpenMeteo {
    client: reqwest::Client,
}

impl OpenMeteo {
    pub fn new() -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .context("failed to build weather HTTP client")?;
        Ok(OpenMeteo { client })
    }
}

impl WeatherProvider for OpenMeteo {
    fn fetch_current(&self, location: &str) -> BoxFuture<'_, Result<WeatherObservation>> {
        let location = location.to_string();
        Box::pin(async move {
            let geo: GeocodingResponse = self
                .client
                .get(GEOCODING_URL)
                .query(&[("name", location.as_str()), ("count", "1")])
                .send()
                .await
                .context("geocoding request failed")?
                .error_for_status()
                .context("geocoding request rejected")?
                .json()
                .await
                .context("geocoding response was not valid JSON")?;

            let hit = geo
                .results
                .and_then(|results| results.into_iter().next())
                .ok_or_else(|| anyhow!("City '{}' not found", location))?;

            let forecast: ForecastResponse = self
                .client
                .get(FORECAST_URL)
                .query(&[
                    ("latitude", hit.latitude.to_string()),
                    ("longitude", hit.longitude.to_string()),
                    ("current", "temperature_2m,relative_humidity_2m".to_string()),
                ])
                .send()
                .await
                .context("weather request failed")?
                .error_for_status()
                .context("weather request rejected")?
                .json()
                .await
                .context("weather response was not valid JSON")?;

            let location_name = match hit.country {
                Some(country) => format!("{}, {}", hit.name, country),
                None => hit.name,
            };

            Ok(WeatherObservation {
                temperature: forecast.current.temperature_2m,
                humidity: forecast.current.relative_humidity_2m,
                location_name,
            })
        })
    }
}
