//! Defines the sampling intervals forecast parameters are delivered at.

use chrono::Duration;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The time resolution a parameter is available at.
///
/// Upstream feeds deliver multi-resolution parameters (precipitation,
/// min/max precipitation, weather symbols) at one or more of these
/// intervals; the assembly policy picks one per request and falls back
/// along the term's chain when the preferred interval is absent.
///
/// # Examples
///
/// ```
/// use meteogram::TimeResolution;
///
/// assert_eq!(TimeResolution::SixHours.hours(), 6);
/// assert_eq!(TimeResolution::OneHour.to_string(), "1h");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TimeResolution {
    OneHour,
    ThreeHours,
    SixHours,
}

impl TimeResolution {
    /// The interval length in whole hours.
    pub fn hours(&self) -> i64 {
        match self {
            TimeResolution::OneHour => 1,
            TimeResolution::ThreeHours => 3,
            TimeResolution::SixHours => 6,
        }
    }

    /// The interval as a `chrono` duration.
    pub fn duration(&self) -> Duration {
        Duration::hours(self.hours())
    }

    /// All resolutions, finest first.
    pub fn all() -> [TimeResolution; 3] {
        [
            TimeResolution::OneHour,
            TimeResolution::ThreeHours,
            TimeResolution::SixHours,
        ]
    }

    /// Resolutions coarser than `self`, finest first.
    pub fn coarser(&self) -> &'static [TimeResolution] {
        match self {
            TimeResolution::OneHour => &[TimeResolution::ThreeHours, TimeResolution::SixHours],
            TimeResolution::ThreeHours => &[TimeResolution::SixHours],
            TimeResolution::SixHours => &[],
        }
    }
}

impl fmt::Display for TimeResolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}h", self.hours())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn coarser_chains() {
        assert_eq!(
            TimeResolution::OneHour.coarser(),
            &[TimeResolution::ThreeHours, TimeResolution::SixHours]
        );
        assert!(TimeResolution::SixHours.coarser().is_empty());
    }

    #[test]
    fn duration_matches_hours() {
        for res in TimeResolution::all() {
            assert_eq!(res.duration().num_hours(), res.hours());
        }
    }
}
