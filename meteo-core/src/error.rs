//! Failure taxonomy shared by every pipeline stage.

use std::fmt;

use thiserror::Error;

/// Which upstream call a failure belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Geocoding,
    Weather,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Stage::Geocoding => "Geocoding",
            Stage::Weather => "Weather data",
        })
    }
}

#[derive(Debug, Error)]
pub enum WeatherError {
    /// Connectivity failure or a non-2xx status.
    #[error("{stage} request failed: {message}")]
    Network { stage: Stage, message: String },

    /// The geocoder returned no match for the city.
    #[error("City not found: {0:?}")]
    NotFound(String),

    /// The payload did not match the expected schema.
    #[error("{stage} response was malformed: {message}")]
    UpstreamData { stage: Stage, message: String },
}

impl WeatherError {
    pub fn network(stage: Stage, message: impl Into<String>) -> Self {
        Self::Network { stage, message: message.into() }
    }

    pub fn upstream(stage: Stage, message: impl Into<String>) -> Self {
        Self::UpstreamData { stage, message: message.into() }
    }

    /// Stage the failure happened in; `NotFound` is always a geocoding outcome.
    pub fn stage(&self) -> Stage {
        match self {
            Self::Network { stage, .. } | Self::UpstreamData { stage, .. } => *stage,
            Self::NotFound(_) => Stage::Geocoding,
        }
    }
}

pub type Result<T> = std::result::Result<T, WeatherError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn network_message_names_the_stage() {
        let err = WeatherError::network(Stage::Geocoding, "connection refused");
        assert_eq!(err.to_string(), "Geocoding request failed: connection refused");

        let err = WeatherError::network(Stage::Weather, "status 502");
        assert_eq!(err.to_string(), "Weather data request failed: status 502");
    }

    #[test]
    fn not_found_is_a_geocoding_failure() {
        let err = WeatherError::NotFound("Atlantis".into());
        assert_eq!(err.stage(), Stage::Geocoding);
        assert!(err.to_string().contains("City not found"));
        assert!(err.to_string().contains("Atlantis"));
    }

    #[test]
    fn upstream_keeps_its_stage() {
        let err = WeatherError::upstream(Stage::Weather, "missing `current`");
        assert_eq!(err.stage(), Stage::Weather);
        assert!(err.to_string().starts_with("Weather data response was malformed"));
    }
}
