//! Defines the forecast display window driving resolution and derivation
//! choices.

use crate::types::resolution::TimeResolution;
use chrono::Duration;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The forecast term of a chart request.
///
/// Short-term charts cover up to roughly 48 hours at fine resolution;
/// long-term charts cover up to roughly 228 hours at coarse resolution.
/// The term decides the preferred resolution, the fallback chain walked
/// when the preferred data is absent, and the visual spacing of symbol
/// rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ForecastTerm {
    Short,
    Long,
}

impl ForecastTerm {
    /// The resolution a multi-resolution parameter should be read at when
    /// present.
    pub fn preferred_resolution(&self) -> TimeResolution {
        match self {
            ForecastTerm::Short => TimeResolution::OneHour,
            ForecastTerm::Long => TimeResolution::SixHours,
        }
    }

    /// The fallback chain, preferred resolution first.
    ///
    /// Short term walks toward coarser data (1h, 3h, 6h); long term prefers
    /// 6h and walks toward finer data only when the coarse series are
    /// absent.
    pub fn resolution_chain(&self) -> [TimeResolution; 3] {
        match self {
            ForecastTerm::Short => [
                TimeResolution::OneHour,
                TimeResolution::ThreeHours,
                TimeResolution::SixHours,
            ],
            ForecastTerm::Long => [
                TimeResolution::SixHours,
                TimeResolution::ThreeHours,
                TimeResolution::OneHour,
            ],
        }
    }

    /// Target spacing between rendered symbols, in hours.
    pub fn symbol_spacing_hours(&self) -> i64 {
        match self {
            ForecastTerm::Short => 2,
            ForecastTerm::Long => 6,
        }
    }

    /// The longest window a chart of this term displays.
    pub fn max_window(&self) -> Duration {
        match self {
            ForecastTerm::Short => Duration::hours(48),
            ForecastTerm::Long => Duration::hours(228),
        }
    }
}

impl fmt::Display for ForecastTerm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ForecastTerm::Short => write!(f, "short"),
            ForecastTerm::Long => write!(f, "long"),
        }
    }
}
