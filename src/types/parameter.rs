//! Defines the forecast parameters the engine knows about and the
//! deterministic registry keys they are stored under.

use crate::types::resolution::TimeResolution;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A forecast parameter with a deterministic registry key.
///
/// Single-resolution parameters are keyed by [`Parameter::key`] alone;
/// multi-resolution parameters (the precipitation family and weather
/// symbols) are keyed by [`Parameter::key_at`], which appends the
/// resolution in hours, e.g. `precipitation_6`.
///
/// # Examples
///
/// ```
/// use meteogram::{Parameter, TimeResolution};
///
/// assert_eq!(Parameter::Temperature.key(), "temperature");
/// assert_eq!(
///     Parameter::Precipitation.key_at(TimeResolution::SixHours),
///     "precipitation_6"
/// );
/// assert_eq!(Parameter::Pressure.curve_key(), "pressure_curve");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Parameter {
    Temperature,
    DewPoint,
    Pressure,
    Precipitation,
    PrecipitationMin,
    PrecipitationMax,
    AccumulatedPrecipitation,
    WindSpeed,
    WindDirection,
    CloudCover,
    WeatherSymbol,
    WaveHeight,
}

impl Parameter {
    /// The plain registry key for this parameter.
    pub fn key(&self) -> &'static str {
        match self {
            Parameter::Temperature => "temperature",
            Parameter::DewPoint => "dew_point",
            Parameter::Pressure => "pressure",
            Parameter::Precipitation => "precipitation",
            Parameter::PrecipitationMin => "precipitation_min",
            Parameter::PrecipitationMax => "precipitation_max",
            Parameter::AccumulatedPrecipitation => "accumulated_precipitation",
            Parameter::WindSpeed => "wind_speed",
            Parameter::WindDirection => "wind_direction",
            Parameter::CloudCover => "cloud_cover",
            Parameter::WeatherSymbol => "weather_symbol",
            Parameter::WaveHeight => "wave_height",
        }
    }

    /// The resolution-qualified registry key, e.g. `precipitation_max_1`.
    pub fn key_at(&self, resolution: TimeResolution) -> String {
        format!("{}_{}", self.key(), resolution.hours())
    }

    /// The key a derived smooth-curve series is registered under.
    pub fn curve_key(&self) -> String {
        format!("{}_curve", self.key())
    }

    /// Whether this parameter is delivered at multiple resolutions and is
    /// therefore subject to the assembly policy's fallback chain.
    pub fn is_multi_resolution(&self) -> bool {
        matches!(
            self,
            Parameter::Precipitation
                | Parameter::PrecipitationMin
                | Parameter::PrecipitationMax
                | Parameter::AccumulatedPrecipitation
                | Parameter::WeatherSymbol
        )
    }
}

impl fmt::Display for Parameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.key())
    }
}
