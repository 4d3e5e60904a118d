use chrono::{DateTime, Utc};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

/// Best geocoding match for a city name.
#[derive(Debug, Clone, PartialEq)]
pub struct Place {
    pub name: String,
    pub country: Option<String>,
    pub coordinates: Coordinates,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CurrentConditions {
    pub time: DateTime<Utc>,
    pub temperature_celsius: f64,
    pub relative_humidity_percent: f64,
    pub weather_code: i64,
}

/// Result of a successful lookup.
#[derive(Debug, Clone, PartialEq)]
pub struct Observation {
    pub place: Place,
    pub conditions: CurrentConditions,
}

/// Variables requested from the forecast endpoint's `current` block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CurrentVariable {
    Temperature,
    RelativeHumidity,
    WeatherCode,
}

impl CurrentVariable {
    /// Order in which the variables are listed in the request.
    pub const REQUESTED: [CurrentVariable; 3] = [
        CurrentVariable::Temperature,
        CurrentVariable::RelativeHumidity,
        CurrentVariable::WeatherCode,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CurrentVariable::Temperature => "temperature_2m",
            CurrentVariable::RelativeHumidity => "relative_humidity_2m",
            CurrentVariable::WeatherCode => "weather_code",
        }
    }

    /// Comma-separated value for the `current` query parameter.
    pub fn query_value() -> String {
        Self::REQUESTED
            .iter()
            .map(CurrentVariable::as_str)
            .collect::<Vec<_>>()
            .join(",")
    }
}

impl std::fmt::Display for CurrentVariable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
