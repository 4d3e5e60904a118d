//! Console report for a set of current conditions.

use chrono::{DateTime, TimeZone, Utc};
use std::fmt;

use crate::model::CurrentConditions;

/// Label for codes missing from [`WEATHER_CODES`].
pub const UNKNOWN_WEATHER_CODE: &str = "Unknown weather code";

/// WMO weather interpretation codes this tool knows how to describe.
pub const WEATHER_CODES: &[(i64, &str)] = &[
    (0, "Clear sky"),
    (1, "Mainly clear"),
    (2, "Partly cloudy"),
    (3, "Overcast"),
    (45, "Fog"),
    (51, "Light rain showers"),
    (61, "Light rain"),
    (71, "Light snow showers"),
    (80, "Light rain showers"),
    (95, "Thunderstorm"),
    (99, "Thunderstorm with hail"),
];

/// `HH:MM:SS DD-MM-YYYY`
pub const TIME_FORMAT: &str = "%H:%M:%S %d-%m-%Y";

pub fn weather_interpretation(code: i64) -> &'static str {
    WEATHER_CODES
        .iter()
        .find(|(known, _)| *known == code)
        .map(|(_, description)| *description)
        .unwrap_or(UNKNOWN_WEATHER_CODE)
}

pub fn format_timestamp<Tz>(instant: DateTime<Utc>, tz: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: fmt::Display,
{
    instant.with_timezone(tz).format(TIME_FORMAT).to_string()
}

/// The four-line report printed after a successful lookup.
#[derive(Debug, Clone, PartialEq)]
pub struct Report {
    pub time_and_date: String,
    pub temperature_celsius: f64,
    pub relative_humidity_percent: f64,
    pub description: &'static str,
}

impl Report {
    pub fn new<Tz>(conditions: &CurrentConditions, tz: &Tz) -> Self
    where
        Tz: TimeZone,
        Tz::Offset: fmt::Display,
    {
        Self {
            time_and_date: format_timestamp(conditions.time, tz),
            temperature_celsius: conditions.temperature_celsius,
            relative_humidity_percent: conditions.relative_humidity_percent,
            description: weather_interpretation(conditions.weather_code),
        }
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Time and Date: {}", self.time_and_date)?;
        writeln!(f, "Temperature: {:.0}°C", self.temperature_celsius)?;
        writeln!(f, "Humidity: {:.0}%", self.relative_humidity_percent)?;
        write!(f, "Description: {}", self.description)
    }
}
