//! Insertion of exact threshold-crossing points into a numeric series.

use crate::derivation::error::DeriveError;
use crate::types::phenomenon::{Phenomenon, PhenomenonKind};
use crate::types::value_item::{PhenomenonValue, ValueItem};
use chrono::{DateTime, Utc};

/// Inserts an item carrying `threshold` at every point where the series
/// crosses it.
///
/// Walks consecutive item pairs; whenever the threshold lies strictly
/// between the two values (rising or falling through it), the exact
/// crossing time is found by inverting the linear segment between the two
/// endpoints and a new instantaneous item is inserted there. A renderer
/// can then split the curve into segments on either side of the threshold,
/// e.g. to colour temperature above and below freezing.
///
/// # Errors
///
/// [`DeriveError::NotNumeric`] for symbol/text phenomena and
/// [`DeriveError::NotInstantaneous`] when any item spans an interval — the
/// same preconditions as the hybrid spline.
///
/// # Examples
///
/// ```
/// use chrono::{Duration, TimeZone, Utc};
/// use meteogram::{insert_threshold_crossings, Phenomenon};
///
/// let t0 = Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap();
/// let mut temperature = Phenomenon::numeric("temperature", "celsius");
/// temperature.add_instant_number(t0, 5.0);
/// temperature.add_instant_number(t0 + Duration::hours(1), 15.0);
///
/// insert_threshold_crossings(&mut temperature, 10.0).unwrap();
/// assert_eq!(temperature.len(), 3);
/// assert_eq!(temperature.item(1).unwrap().value().as_number(), Some(10.0));
/// assert_eq!(
///     temperature.item(1).unwrap().time_from(),
///     t0 + Duration::minutes(30)
/// );
/// ```
pub fn insert_threshold_crossings(
    phenomenon: &mut Phenomenon,
    threshold: f64,
) -> Result<(), DeriveError> {
    if phenomenon.kind() != PhenomenonKind::Numeric {
        return Err(DeriveError::NotNumeric {
            name: phenomenon.name().to_string(),
        });
    }
    if phenomenon.items().iter().any(|item| !item.is_instant()) {
        return Err(DeriveError::NotInstantaneous {
            name: phenomenon.name().to_string(),
        });
    }

    let items = phenomenon.items();
    let mut result: Vec<ValueItem> = Vec::with_capacity(items.len());
    for pair in items.windows(2) {
        result.push(pair[0].clone());
        if let Some(time) = crossing_time(&pair[0], &pair[1], threshold) {
            result.push(ValueItem::instant(time, PhenomenonValue::Number(threshold)));
        }
    }
    if let Some(last) = items.last() {
        result.push(last.clone());
    }
    phenomenon.replace_items(result);
    Ok(())
}

/// The exact time the linear segment between `a` and `b` passes through
/// `threshold`, or `None` when the threshold is not strictly between the
/// two values.
fn crossing_time(a: &ValueItem, b: &ValueItem, threshold: f64) -> Option<DateTime<Utc>> {
    let v0 = a.value().as_number()?;
    let v1 = b.value().as_number()?;
    let rising = v0 < threshold && threshold < v1;
    let falling = v1 < threshold && threshold < v0;
    if !rising && !falling {
        return None;
    }

    // Invert the segment: time = slope * threshold + bias.
    let t0 = a.time_from().timestamp_millis() as f64;
    let t1 = b.time_from().timestamp_millis() as f64;
    let slope = (t1 - t0) / (v1 - v0);
    let bias = t0 - slope * v0;
    DateTime::from_timestamp_millis((slope * threshold + bias).round() as i64)
}
