//! Running-sum synthesis of an accumulated precipitation series.

use crate::types::parameter::Parameter;
use crate::types::phenomenon::Phenomenon;
use crate::types::resolution::TimeResolution;
use chrono::{DateTime, Utc};
use log::debug;

/// Synthesizes an accumulated precipitation series from a base series at
/// resolution `resolution`.
///
/// Walks the timeline in resolution-sized steps from the base series'
/// start while strictly before `end`, carrying a running sum: the first
/// step seeds the total with its own instantaneous value, later steps add
/// the instantaneous value only when it is positive and carry the total
/// forward otherwise. Timestamps the base series cannot answer read as
/// zero.
///
/// The result is a new numeric phenomenon named
/// `accumulated_precipitation_{hours}`; the base series is untouched.
///
/// # Examples
///
/// ```
/// use chrono::{Duration, TimeZone, Utc};
/// use meteogram::{accumulated_precipitation, Phenomenon, TimeResolution};
///
/// let start = Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap();
/// let mut rain = Phenomenon::numeric("precipitation_1", "mm");
/// for (hour, v) in [(0, 0.0), (1, 2.0), (2, 0.0), (3, 3.0)] {
///     rain.add_instant_number(start + Duration::hours(hour), v);
/// }
///
/// let accumulated = accumulated_precipitation(
///     &rain,
///     TimeResolution::OneHour,
///     start + Duration::hours(4),
/// );
/// assert_eq!(accumulated.name(), "accumulated_precipitation_1");
/// assert_eq!(accumulated.numbers(), vec![0.0, 2.0, 2.0, 5.0]);
/// ```
pub fn accumulated_precipitation(
    base: &Phenomenon,
    resolution: TimeResolution,
    end: DateTime<Utc>,
) -> Phenomenon {
    let mut out = Phenomenon::numeric(
        Parameter::AccumulatedPrecipitation.key_at(resolution),
        base.unit(),
    );
    let Some(start) = base.start_time() else {
        debug!("accumulation over empty series '{}'", base.name());
        return out;
    };

    let step = resolution.duration();
    let mut total = 0.0;
    let mut time = start;
    let mut first = true;
    while time < end {
        let value = base.number_at(time).unwrap_or(0.0);
        if first {
            total = value;
            first = false;
        } else if value > 0.0 {
            total += value;
        }
        out.add_instant_number(time, total);
        time += step;
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn at(h: i64) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap() + Duration::hours(h)
    }

    fn rain(values: &[(i64, f64)]) -> Phenomenon {
        let mut p = Phenomenon::numeric("precipitation_1", "mm");
        for (h, v) in values {
            p.add_instant_number(at(*h), *v);
        }
        p
    }

    #[test]
    fn running_sum_carries_gaps_forward() {
        let base = rain(&[(0, 0.0), (1, 2.0), (2, 0.0), (3, 3.0)]);
        let acc = accumulated_precipitation(&base, TimeResolution::OneHour, at(4));
        assert_eq!(acc.numbers(), vec![0.0, 2.0, 2.0, 5.0]);
        assert_eq!(acc.from_times(), vec![at(0), at(1), at(2), at(3)]);
    }

    #[test]
    fn first_step_seeds_with_its_own_value() {
        let base = rain(&[(0, 1.5), (1, 0.5)]);
        let acc = accumulated_precipitation(&base, TimeResolution::OneHour, at(2));
        assert_eq!(acc.numbers(), vec![1.5, 2.0]);
    }

    #[test]
    fn missing_steps_read_as_zero() {
        // 6h walk over a series that only answers at 0h and 12h; the 6h
        // step interpolates, the 18h step is past the covered range.
        let base = rain(&[(0, 1.0), (12, 3.0)]);
        let acc = accumulated_precipitation(&base, TimeResolution::SixHours, at(24));
        assert_eq!(acc.len(), 4);
        // 0h seeds 1.0, 6h interpolates to 2.0, 12h adds 3.0, 18h is
        // missing and carries the total forward.
        assert_eq!(acc.numbers(), vec![1.0, 3.0, 6.0, 6.0]);
    }

    #[test]
    fn accumulation_is_monotone_for_nonnegative_input() {
        let base = rain(&[(0, 0.2), (1, 0.0), (2, 1.1), (3, 0.4), (4, 0.0)]);
        let acc = accumulated_precipitation(&base, TimeResolution::OneHour, at(5));
        let values = acc.numbers();
        for pair in values.windows(2) {
            assert!(pair[0] <= pair[1]);
        }
    }

    #[test]
    fn empty_base_yields_empty_series() {
        let base = Phenomenon::numeric("precipitation_1", "mm");
        let acc = accumulated_precipitation(&base, TimeResolution::OneHour, at(4));
        assert!(acc.is_empty());
        assert_eq!(acc.name(), "accumulated_precipitation_1");
    }
}
