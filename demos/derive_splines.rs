//! Runs both spline derivations over the same temperature series and
//! prints the resampled point counts.

use chrono::{Duration, TimeZone, Utc};
use meteogram::{cardinal_spline, hybrid_spline, MeteogramError, Phenomenon, DEFAULT_TENSION};

fn main() -> Result<(), MeteogramError> {
    let start = Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap();
    let mut base = Phenomenon::numeric("temperature", "celsius");
    for (hour, value) in [(0, -2.0), (3, 1.5), (6, 4.0), (9, 2.5), (12, -0.5)] {
        base.add_instant_number(start + Duration::hours(hour), value);
    }
    println!("control points: {}", base.len());

    let mut cardinal = base.clone();
    cardinal_spline(&mut cardinal, DEFAULT_TENSION)?;
    println!("cardinal spline: {} points", cardinal.len());

    let mut hybrid = base.clone();
    hybrid_spline(&mut hybrid, DEFAULT_TENSION, 8)?;
    println!("hybrid spline:   {} points", hybrid.len());

    // Endpoints survive resampling untouched.
    for derived in [&cardinal, &hybrid] {
        assert_eq!(derived.start_time(), base.start_time());
        assert_eq!(derived.end_time(), base.end_time());
    }
    Ok(())
}
