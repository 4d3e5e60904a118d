//! Core library for the `meteo` CLI.
//!
//! This crate defines:
//! - Configuration for endpoints and the cached, retrying HTTP client
//! - The geocoding and current-conditions stages, and the pipeline joining them
//! - Shared domain models and the error taxonomy
//! - The console report
//!
//! It is used by `meteo-cli`, but can also be reused by other binaries or services.

pub mod config;
pub mod error;
pub mod http;
pub mod model;
pub mod present;
pub mod provider;

pub use config::{Config, HttpConfig};
pub use error::{Stage, WeatherError};
pub use http::HttpClient;
pub use model::{Coordinates, CurrentConditions, CurrentVariable, Observation, Place};
pub use present::{Report, weather_interpretation};
pub use provider::{Geocoder, Pipeline, WeatherProvider, lookup};
