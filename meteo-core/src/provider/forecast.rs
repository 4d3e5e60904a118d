use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::{Map, Value};

use crate::{
    error::{Result, Stage, WeatherError},
    http::{HttpClient, endpoint_url},
    model::{Coordinates, CurrentConditions, CurrentVariable},
};

use super::WeatherProvider;

/// Current conditions from the Open-Meteo forecast endpoint.
#[derive(Debug, Clone)]
pub struct OpenMeteoProvider {
    http: HttpClient,
    base_url: String,
}

impl OpenMeteoProvider {
    pub fn new(http: HttpClient, base_url: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct ForecastResponse {
    #[serde(default)]
    current: Option<Map<String, Value>>,
}

#[async_trait]
impl WeatherProvider for OpenMeteoProvider {
    async fn current_conditions(&self, coordinates: Coordinates) -> Result<CurrentConditions> {
        let url = endpoint_url(
            &self.base_url,
            &[
                ("latitude", coordinates.latitude.to_string()),
                ("longitude", coordinates.longitude.to_string()),
                ("current", CurrentVariable::query_value()),
                ("timezone", "auto".to_string()),
                ("timeformat", "unixtime".to_string()),
            ],
            Stage::Weather,
        )?;

        let body = self.http.get_text(&url, Stage::Weather).await?;
        decode_current(&body)
    }
}

fn decode_current(body: &str) -> Result<CurrentConditions> {
    let parsed: ForecastResponse = serde_json::from_str(body)
        .map_err(|e| WeatherError::upstream(Stage::Weather, e.to_string()))?;

    let current = parsed
        .current
        .ok_or_else(|| WeatherError::upstream(Stage::Weather, "no `current` block"))?;

    let timestamp = current
        .get("time")
        .and_then(Value::as_i64)
        .ok_or_else(|| WeatherError::upstream(Stage::Weather, "missing unix `time`"))?;
    let time = DateTime::<Utc>::from_timestamp(timestamp, 0).ok_or_else(|| {
        WeatherError::upstream(Stage::Weather, format!("timestamp {timestamp} out of range"))
    })?;

    Ok(CurrentConditions {
        time,
        temperature_celsius: variable(&current, CurrentVariable::Temperature)?,
        relative_humidity_percent: variable(&current, CurrentVariable::RelativeHumidity)?,
        weather_code: weather_code(variable(&current, CurrentVariable::WeatherCode)?)?,
    })
}

fn variable(current: &Map<String, Value>, variable: CurrentVariable) -> Result<f64> {
    current
        .get(variable.as_str())
        .and_then(Value::as_f64)
        .ok_or_else(|| {
            WeatherError::upstream(Stage::Weather, format!("missing or non-numeric `{variable}`"))
        })
}

fn weather_code(value: f64) -> Result<i64> {
    if value.is_finite() && value.fract() == 0.0 {
        Ok(value as i64)
    } else {
        Err(WeatherError::upstream(
            Stage::Weather,
            format!("weather code {value} is not an integer"),
        ))
    }
}
