//! Defines the smallest unit of the data model: a single timestamped
//! observation ([`ValueItem`]) and its payload ([`PhenomenonValue`]).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The payload carried by a [`ValueItem`].
///
/// A phenomenon stores exactly one payload variant for all of its items:
/// numbers for measured quantities (temperature, precipitation, wind speed),
/// symbol codes for icon rows (weather symbols, cloud cover classes) and
/// text for label rows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PhenomenonValue {
    /// A measured or derived quantity in the phenomenon's unit.
    Number(f64),
    /// An integer symbol code, e.g. a weather or cloud symbol id.
    Symbol(i32),
    /// A free-form text label.
    Text(String),
}

impl PhenomenonValue {
    /// Returns the numeric payload, or `None` for symbol/text payloads.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            PhenomenonValue::Number(v) => Some(*v),
            _ => None,
        }
    }

    /// Returns the symbol code, or `None` for number/text payloads.
    pub fn as_symbol(&self) -> Option<i32> {
        match self {
            PhenomenonValue::Symbol(v) => Some(*v),
            _ => None,
        }
    }

    /// Returns the text payload, or `None` for number/symbol payloads.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            PhenomenonValue::Text(v) => Some(v),
            _ => None,
        }
    }
}

/// One `(time_from, time_to, value)` observation within a phenomenon.
///
/// Instantaneous observations have `time_from == time_to`; interval
/// observations (e.g. precipitation accumulated over an hour) span
/// `[time_from, time_to)`. Items are immutable once constructed, except for
/// the in-place value replacement used by
/// [`Phenomenon::scale`](crate::Phenomenon::scale) and
/// [`Phenomenon::translate`](crate::Phenomenon::translate), which preserves
/// both time fields.
///
/// # Examples
///
/// ```
/// use chrono::{TimeZone, Utc};
/// use meteogram::{PhenomenonValue, ValueItem};
///
/// let noon = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();
/// let item = ValueItem::instant(noon, PhenomenonValue::Number(4.2));
/// assert!(item.is_instant());
/// assert_eq!(item.value().as_number(), Some(4.2));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValueItem {
    time_from: DateTime<Utc>,
    time_to: DateTime<Utc>,
    value: PhenomenonValue,
}

impl ValueItem {
    /// Creates an item spanning `[time_from, time_to)`.
    ///
    /// Callers must uphold `time_from <= time_to`; this is checked in debug
    /// builds only.
    pub fn new(time_from: DateTime<Utc>, time_to: DateTime<Utc>, value: PhenomenonValue) -> Self {
        debug_assert!(time_from <= time_to, "value item with time_from > time_to");
        Self {
            time_from,
            time_to,
            value,
        }
    }

    /// Creates an instantaneous item (`time_from == time_to`).
    pub fn instant(time: DateTime<Utc>, value: PhenomenonValue) -> Self {
        Self::new(time, time, value)
    }

    /// The start of the observation interval.
    pub fn time_from(&self) -> DateTime<Utc> {
        self.time_from
    }

    /// The end of the observation interval.
    pub fn time_to(&self) -> DateTime<Utc> {
        self.time_to
    }

    /// The payload.
    pub fn value(&self) -> &PhenomenonValue {
        &self.value
    }

    /// Whether this item is an instantaneous observation.
    pub fn is_instant(&self) -> bool {
        self.time_from == self.time_to
    }

    /// Whether `[time_from, time_to)` overlaps `other`'s interval.
    ///
    /// Intervals are half-open, so instantaneous items never overlap
    /// anything; duplicate instants therefore survive overlap-based pruning.
    pub fn overlaps(&self, other: &ValueItem) -> bool {
        self.time_from < other.time_to && other.time_from < self.time_to
    }

    /// Replaces the payload in place, preserving both time fields.
    pub(crate) fn replace_value(&mut self, value: PhenomenonValue) {
        self.value = value;
    }
}
