//! The central model type: a named, unit-tagged time series of one measured
//! or derived quantity.

use crate::types::value_item::{PhenomenonValue, ValueItem};
use chrono::{DateTime, Utc};
use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};

/// The payload variant a [`Phenomenon`] stores, fixed at construction.
///
/// The registry uses this for typed retrieval, so a caller asking for a
/// numeric series never receives a symbol row by accident.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PhenomenonKind {
    Numeric,
    Symbol,
    Text,
}

/// An ordered, time-ascending collection of [`ValueItem`]s under one name
/// and unit.
///
/// Items are expected to be appended in non-decreasing `time_from` order —
/// this mirrors the ingestion order of upstream forecast feeds and is a
/// documented precondition, not a runtime-checked invariant. Duplicate
/// timestamps are never removed automatically.
///
/// A phenomenon is mutated by appends, by filters (item removal, see
/// [`crate::filtering`]) and by derivation algorithms that replace the item
/// sequence wholesale (see [`crate::cardinal_spline`]). Clone a phenomenon
/// before destructive filtering if the raw series is still needed in the
/// same assembly pass.
///
/// # Examples
///
/// ```
/// use chrono::{TimeZone, Utc};
/// use meteogram::Phenomenon;
///
/// let mut temperature = Phenomenon::numeric("temperature", "celsius");
/// let start = Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap();
/// temperature.add_instant_number(start, -1.5);
/// temperature.add_instant_number(start + chrono::Duration::hours(1), 0.5);
///
/// assert_eq!(temperature.len(), 2);
/// assert_eq!(temperature.min_value(), -1.5);
/// assert_eq!(temperature.start_time(), Some(start));
///
/// // Point-in-time lookup interpolates linearly between neighbours.
/// let half_past = start + chrono::Duration::minutes(30);
/// assert_eq!(temperature.number_at(half_past), Some(-0.5));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Phenomenon {
    name: String,
    unit: String,
    kind: PhenomenonKind,
    items: Vec<ValueItem>,
}

impl Phenomenon {
    /// Creates an empty numeric phenomenon.
    pub fn numeric(name: impl Into<String>, unit: impl Into<String>) -> Self {
        Self::empty(name, unit, PhenomenonKind::Numeric)
    }

    /// Creates an empty symbol-code phenomenon.
    pub fn symbol(name: impl Into<String>, unit: impl Into<String>) -> Self {
        Self::empty(name, unit, PhenomenonKind::Symbol)
    }

    /// Creates an empty text-label phenomenon.
    pub fn text(name: impl Into<String>, unit: impl Into<String>) -> Self {
        Self::empty(name, unit, PhenomenonKind::Text)
    }

    fn empty(name: impl Into<String>, unit: impl Into<String>, kind: PhenomenonKind) -> Self {
        Self {
            name: name.into(),
            unit: unit.into(),
            kind,
            items: Vec::new(),
        }
    }

    /// The registry key this phenomenon is stored under.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The unit of the values, e.g. `"celsius"` or `"mm"`.
    pub fn unit(&self) -> &str {
        &self.unit
    }

    /// The payload variant of this series.
    pub fn kind(&self) -> PhenomenonKind {
        self.kind
    }

    /// Renames the phenomenon; derived series are renamed before they are
    /// registered under their own key.
    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    /// Replaces the unit label, e.g. after scaling m/s values to knots.
    pub fn set_unit(&mut self, unit: impl Into<String>) {
        self.unit = unit.into();
    }

    /// Number of items in the series.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the series holds no items.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// All items, in sequence order.
    pub fn items(&self) -> &[ValueItem] {
        &self.items
    }

    /// The item at ordinal position `index`, if any.
    pub fn item(&self, index: usize) -> Option<&ValueItem> {
        self.items.get(index)
    }

    /// Appends an item spanning `[time_from, time_to)`.
    ///
    /// Ordering is not enforced; callers append in time order.
    pub fn add_value(
        &mut self,
        time_from: DateTime<Utc>,
        time_to: DateTime<Utc>,
        value: PhenomenonValue,
    ) {
        debug_assert!(
            self.matches_kind(&value),
            "payload variant does not match phenomenon kind"
        );
        self.items.push(ValueItem::new(time_from, time_to, value));
    }

    /// Appends a numeric interval item.
    pub fn add_number(&mut self, time_from: DateTime<Utc>, time_to: DateTime<Utc>, value: f64) {
        self.add_value(time_from, time_to, PhenomenonValue::Number(value));
    }

    /// Appends an instantaneous numeric item.
    pub fn add_instant_number(&mut self, time: DateTime<Utc>, value: f64) {
        self.add_number(time, time, value);
    }

    /// Appends an instantaneous symbol item.
    pub fn add_instant_symbol(&mut self, time: DateTime<Utc>, code: i32) {
        self.add_value(time, time, PhenomenonValue::Symbol(code));
    }

    /// Appends an instantaneous text item.
    pub fn add_instant_text(&mut self, time: DateTime<Utc>, label: impl Into<String>) {
        self.add_value(time, time, PhenomenonValue::Text(label.into()));
    }

    fn matches_kind(&self, value: &PhenomenonValue) -> bool {
        matches!(
            (self.kind, value),
            (PhenomenonKind::Numeric, PhenomenonValue::Number(_))
                | (PhenomenonKind::Symbol, PhenomenonValue::Symbol(_))
                | (PhenomenonKind::Text, PhenomenonValue::Text(_))
        )
    }

    /// Ordered list of `time_from` values; the alignment currency between
    /// phenomena sharing one time grid.
    pub fn from_times(&self) -> Vec<DateTime<Utc>> {
        self.items.iter().map(ValueItem::time_from).collect()
    }

    /// Ordered list of numeric values, skipping non-numeric payloads.
    pub fn numbers(&self) -> Vec<f64> {
        self.items
            .iter()
            .filter_map(|item| item.value().as_number())
            .collect()
    }

    /// Point-in-time lookup.
    ///
    /// An exact `time_from` match returns the stored payload. Otherwise,
    /// numeric phenomena interpolate linearly between the nearest preceding
    /// and following items; symbol and text phenomena answer exact matches
    /// only. Returns `None` outside the covered range or when only one
    /// neighbour exists.
    pub fn value_at(&self, time: DateTime<Utc>) -> Option<PhenomenonValue> {
        if let Some(item) = self.items.iter().find(|item| item.time_from() == time) {
            return Some(item.value().clone());
        }
        if self.kind != PhenomenonKind::Numeric {
            return None;
        }

        let before = self
            .items
            .iter()
            .filter(|item| item.time_from() < time)
            .next_back()?;
        let after = self.items.iter().find(|item| item.time_from() > time)?;

        let v0 = before.value().as_number()?;
        let v1 = after.value().as_number()?;
        let span = (after.time_from() - before.time_from()).num_milliseconds() as f64;
        let offset = (time - before.time_from()).num_milliseconds() as f64;
        Some(PhenomenonValue::Number(v0 + (v1 - v0) * offset / span))
    }

    /// Numeric point-in-time lookup; see [`Phenomenon::value_at`].
    pub fn number_at(&self, time: DateTime<Utc>) -> Option<f64> {
        self.value_at(time).and_then(|value| value.as_number())
    }

    /// Smallest numeric value in the series, or `0.0` for an empty series.
    ///
    /// The zero default is an explicit degenerate-case policy for chart
    /// scaling, not an error.
    pub fn min_value(&self) -> f64 {
        self.items
            .iter()
            .filter_map(|item| item.value().as_number())
            .map(OrderedFloat)
            .min()
            .map(|v| v.0)
            .unwrap_or(0.0)
    }

    /// Largest numeric value in the series, or `0.0` for an empty series.
    pub fn max_value(&self) -> f64 {
        self.items
            .iter()
            .filter_map(|item| item.value().as_number())
            .map(OrderedFloat)
            .max()
            .map(|v| v.0)
            .unwrap_or(0.0)
    }

    /// Earliest `time_from` in the series, `None` when empty.
    pub fn start_time(&self) -> Option<DateTime<Utc>> {
        self.items.iter().map(ValueItem::time_from).min()
    }

    /// Latest `time_from` in the series, `None` when empty.
    pub fn end_time(&self) -> Option<DateTime<Utc>> {
        self.items.iter().map(ValueItem::time_from).max()
    }

    /// Latest `time_to` in the series, `None` when empty.
    pub fn last_to_time(&self) -> Option<DateTime<Utc>> {
        self.items.iter().map(ValueItem::time_to).max()
    }

    /// Retains only items with `time_to <= cutoff`, preserving order.
    pub fn cut_older_than(&mut self, cutoff: DateTime<Utc>) {
        self.retain_items(|_, item| item.time_to() <= cutoff);
    }

    /// Multiplies every numeric value by `factor`, preserving times.
    ///
    /// Used for unit conversion, e.g. m/s to knots.
    pub fn scale(&mut self, factor: f64) {
        self.transform_numbers(|v| v * factor);
    }

    /// Adds `offset` to every numeric value, preserving times.
    ///
    /// Used for direction-angle rotation, e.g. +180 degrees.
    pub fn translate(&mut self, offset: f64) {
        self.transform_numbers(|v| v + offset);
    }

    fn transform_numbers(&mut self, f: impl Fn(f64) -> f64) {
        for item in &mut self.items {
            if let Some(v) = item.value().as_number() {
                item.replace_value(PhenomenonValue::Number(f(v)));
            }
        }
    }

    /// Copy-then-filter item removal: builds the retained sequence instead
    /// of removing while iterating.
    pub(crate) fn retain_items(&mut self, mut keep: impl FnMut(usize, &ValueItem) -> bool) {
        let retained = self
            .items
            .iter()
            .enumerate()
            .filter(|(index, item)| keep(*index, item))
            .map(|(_, item)| item.clone())
            .collect();
        self.items = retained;
    }

    /// Replaces the item sequence wholesale; used by spline resampling.
    pub(crate) fn replace_items(&mut self, items: Vec<ValueItem>) {
        self.items = items;
    }

    /// Appends already-constructed items, e.g. when stitching a coarser
    /// resolution onto a finer one.
    pub(crate) fn append_items(&mut self, items: impl IntoIterator<Item = ValueItem>) {
        self.items.extend(items);
    }

    /// Stable sort by `time_from`, restoring the ordering invariant after a
    /// merge.
    pub(crate) fn sort_by_time(&mut self) {
        self.items.sort_by_key(ValueItem::time_from);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(h: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, h, 0, 0).unwrap()
    }

    fn series(values: &[(u32, f64)]) -> Phenomenon {
        let mut p = Phenomenon::numeric("temperature", "celsius");
        for (h, v) in values {
            p.add_instant_number(at(*h), *v);
        }
        p
    }

    #[test]
    fn min_max_bound_every_value() {
        let p = series(&[(0, 3.0), (1, -2.5), (2, 7.25), (3, 0.0)]);
        for v in p.numbers() {
            assert!(p.min_value() <= v && v <= p.max_value());
        }
        assert_eq!(p.min_value(), -2.5);
        assert_eq!(p.max_value(), 7.25);
    }

    #[test]
    fn empty_series_policies() {
        let p = Phenomenon::numeric("temperature", "celsius");
        assert_eq!(p.min_value(), 0.0);
        assert_eq!(p.max_value(), 0.0);
        assert_eq!(p.start_time(), None);
        assert_eq!(p.end_time(), None);
        assert_eq!(p.last_to_time(), None);
        assert_eq!(p.value_at(at(1)), None);
    }

    #[test]
    fn value_at_exact_match_and_interpolation() {
        let p = series(&[(0, 10.0), (2, 20.0)]);
        assert_eq!(p.number_at(at(0)), Some(10.0));
        assert_eq!(p.number_at(at(1)), Some(15.0));
        assert_eq!(p.number_at(at(2)), Some(20.0));
        // Outside the covered range there is only one neighbour.
        assert_eq!(p.number_at(at(3)), None);
    }

    #[test]
    fn value_at_symbol_is_exact_match_only() {
        let mut p = Phenomenon::symbol("weather_symbol", "code");
        p.add_instant_symbol(at(0), 3);
        p.add_instant_symbol(at(2), 4);
        assert_eq!(p.value_at(at(0)), Some(PhenomenonValue::Symbol(3)));
        assert_eq!(p.value_at(at(1)), None);
    }

    #[test]
    fn cut_older_than_keeps_items_up_to_cutoff() {
        let mut p = Phenomenon::numeric("precipitation", "mm");
        p.add_number(at(0), at(1), 0.2);
        p.add_number(at(1), at(2), 0.4);
        p.add_number(at(2), at(3), 0.0);
        p.cut_older_than(at(2));
        assert_eq!(p.len(), 2);
        assert_eq!(p.item(0).unwrap().time_from(), at(0));
        assert_eq!(p.item(1).unwrap().time_from(), at(1));
    }

    #[test]
    fn scale_and_translate_preserve_times() {
        let mut p = series(&[(0, 10.0), (1, 20.0)]);
        p.scale(2.0);
        p.translate(1.0);
        assert_eq!(p.numbers(), vec![21.0, 41.0]);
        assert_eq!(p.from_times(), vec![at(0), at(1)]);
    }

    #[test]
    fn clone_isolates_destructive_edits() {
        let original = series(&[(0, 1.0), (1, 2.0)]);
        let mut copy = original.clone();
        copy.scale(100.0);
        copy.cut_older_than(at(0));
        assert_eq!(original.len(), 2);
        assert_eq!(original.numbers(), vec![1.0, 2.0]);
    }

    #[test]
    fn duplicate_timestamps_are_kept() {
        let p = series(&[(1, 5.0), (1, 6.0)]);
        assert_eq!(p.len(), 2);
    }
}
