use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use crate::{
    error::{Result, Stage, WeatherError},
    http::{USER_AGENT, endpoint_url, truncate_body},
    model::{Coordinates, Place},
};

use super::Geocoder;

/// Open-Meteo geocoding search. Requests go out once, without cache or retry.
#[derive(Debug, Clone)]
pub struct OpenMeteoGeocoder {
    http: Client,
    base_url: String,
}

impl OpenMeteoGeocoder {
    pub fn new(base_url: impl Into<String>) -> reqwest::Result<Self> {
        let http = Client::builder().user_agent(USER_AGENT).build()?;
        Ok(Self::with_client(http, base_url))
    }

    pub fn with_client(http: Client, base_url: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct GeocodingResponse {
    #[serde(default)]
    results: Option<Vec<GeocodingResult>>,
}

#[derive(Debug, Deserialize)]
struct GeocodingResult {
    #[serde(default)]
    name: Option<String>,
    latitude: f64,
    longitude: f64,
    #[serde(default)]
    country: Option<String>,
}

#[async_trait]
impl Geocoder for OpenMeteoGeocoder {
    async fn locate(&self, city: &str) -> Result<Place> {
        let city = city.trim();
        if city.is_empty() {
            return Err(WeatherError::NotFound(city.to_string()));
        }

        let url = endpoint_url(&self.base_url, &[("name", city), ("count", "1")], Stage::Geocoding)?;

        let res = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| WeatherError::network(Stage::Geocoding, e.to_string()))?;

        let status = res.status();
        let body = res
            .text()
            .await
            .map_err(|e| WeatherError::network(Stage::Geocoding, format!("failed to read body: {e}")))?;

        if !status.is_success() {
            return Err(WeatherError::network(
                Stage::Geocoding,
                format!("status {}: {}", status, truncate_body(&body)),
            ));
        }

        parse_best_match(city, &body)
    }
}

fn parse_best_match(city: &str, body: &str) -> Result<Place> {
    let parsed: GeocodingResponse = serde_json::from_str(body)
        .map_err(|e| WeatherError::upstream(Stage::Geocoding, e.to_string()))?;

    let best = parsed
        .results
        .and_then(|results| results.into_iter().next())
        .ok_or_else(|| WeatherError::NotFound(city.to_string()))?;

    let place = Place {
        name: best.name.unwrap_or_else(|| city.to_string()),
        country: best.country,
        coordinates: Coordinates {
            latitude: best.latitude,
            longitude: best.longitude,
        },
    };

    tracing::debug!(
        name = %place.name,
        country = ?place.country,
        latitude = place.coordinates.latitude,
        longitude = place.coordinates.longitude,
        "Geocoded city"
    );

    Ok(place)
}
