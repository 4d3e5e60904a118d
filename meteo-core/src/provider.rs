use crate::{
    Config,
    error::Result,
    http::HttpClient,
    model::{Coordinates, CurrentConditions, Observation, Place},
    provider::{forecast::OpenMeteoProvider, geocoding::OpenMeteoGeocoder},
};
use async_trait::async_trait;
use std::fmt::Debug;

pub mod forecast;
pub mod geocoding;

/// Resolves a free-text city name to its best-matching place.
#[async_trait]
pub trait Geocoder: Send + Sync + Debug {
    async fn locate(&self, city: &str) -> Result<Place>;
}

/// Fetches current conditions for a coordinate pair.
#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    async fn current_conditions(&self, coordinates: Coordinates) -> Result<CurrentConditions>;
}

/// Geocode `city`, then fetch its current conditions.
///
/// The provider is not called unless geocoding produced coordinates.
pub async fn lookup(
    city: &str,
    geocoder: &dyn Geocoder,
    provider: &dyn WeatherProvider,
) -> Result<Observation> {
    let place = geocoder.locate(city).await?;
    let conditions = provider.current_conditions(place.coordinates).await?;

    Ok(Observation { place, conditions })
}

/// Both stages, built once at startup and reused for the run.
#[derive(Debug)]
pub struct Pipeline {
    geocoder: Box<dyn Geocoder>,
    provider: Box<dyn WeatherProvider>,
}

impl Pipeline {
    pub fn new(geocoder: Box<dyn Geocoder>, provider: Box<dyn WeatherProvider>) -> Self {
        Self { geocoder, provider }
    }

    /// Construct the Open-Meteo stages from config.
    pub fn from_config(config: &Config) -> reqwest::Result<Self> {
        let geocoder = OpenMeteoGeocoder::new(config.geocoding_url.clone())?;
        let http = HttpClient::new(&config.http)?;
        let provider = OpenMeteoProvider::new(http, config.forecast_url.clone());

        Ok(Self::new(Box::new(geocoder), Box::new(provider)))
    }

    pub async fn lookup(&self, city: &str) -> Result<Observation> {
        lookup(city, self.geocoder.as_ref(), self.provider.as_ref()).await
    }
}
