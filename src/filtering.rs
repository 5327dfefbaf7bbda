//! Composable item filters over a [`Phenomenon`].
//!
//! A filter prunes items from a phenomenon in place; internally every
//! filter builds the retained sequence instead of removing while iterating.
//! Filters compose by sequential application and the composition order is
//! significant: the assembly policy prescribes exact orders per forecast
//! term and they are not interchangeable.

use crate::types::phenomenon::Phenomenon;
use crate::types::value_item::ValueItem;
use chrono::{DateTime, Utc};

/// A pruning predicate applied to a phenomenon's item sequence.
pub trait ItemFilter {
    /// Removes every item the filter rejects, preserving the order of the
    /// survivors.
    fn apply(&self, phenomenon: &mut Phenomenon);
}

/// Applies `filters` in sequence.
pub fn apply_all(phenomenon: &mut Phenomenon, filters: &[&dyn ItemFilter]) {
    for filter in filters {
        filter.apply(phenomenon);
    }
}

/// Keeps only items whose `time_from` is strictly before the cutoff.
#[derive(Debug, Clone, Copy)]
pub struct BeforeDate {
    pub cutoff: DateTime<Utc>,
}

impl ItemFilter for BeforeDate {
    fn apply(&self, phenomenon: &mut Phenomenon) {
        phenomenon.retain_items(|_, item| item.time_from() < self.cutoff);
    }
}

/// Keeps only items whose `time_from` is strictly after the cutoff.
#[derive(Debug, Clone, Copy)]
pub struct AfterDate {
    pub cutoff: DateTime<Utc>,
}

impl ItemFilter for AfterDate {
    fn apply(&self, phenomenon: &mut Phenomenon) {
        phenomenon.retain_items(|_, item| item.time_from() > self.cutoff);
    }
}

/// Removes numeric items whose value is `<= threshold`; non-numeric items
/// are untouched.
///
/// With a zero threshold this drops "no precipitation" bars before
/// rendering.
#[derive(Debug, Clone, Copy)]
pub struct LessOrEqualNumber {
    pub threshold: f64,
}

impl ItemFilter for LessOrEqualNumber {
    fn apply(&self, phenomenon: &mut Phenomenon) {
        phenomenon.retain_items(|_, item| match item.value().as_number() {
            Some(v) => v > self.threshold,
            None => true,
        });
    }
}

/// Keeps only items whose `time_from` exactly matches one of the supplied
/// timestamps.
///
/// Used to align symbol and arrow rows to a sparser time grid.
#[derive(Debug, Clone)]
pub struct InListFromDate {
    pub times: Vec<DateTime<Utc>>,
}

impl ItemFilter for InListFromDate {
    fn apply(&self, phenomenon: &mut Phenomenon) {
        phenomenon.retain_items(|_, item| self.times.contains(&item.time_from()));
    }
}

/// Removes items at ordinal position `< n`, dropping leading partial-period
/// entries.
#[derive(Debug, Clone, Copy)]
pub struct IndexLessThan {
    pub n: usize,
}

impl ItemFilter for IndexLessThan {
    fn apply(&self, phenomenon: &mut Phenomenon) {
        phenomenon.retain_items(|index, _| index >= self.n);
    }
}

/// Keeps one item out of every `n` in sequence order, starting with the
/// first.
#[derive(Debug, Clone, Copy)]
pub struct EveryNth {
    pub n: usize,
}

impl ItemFilter for EveryNth {
    fn apply(&self, phenomenon: &mut Phenomenon) {
        debug_assert!(self.n >= 1, "EveryNth requires n >= 1");
        let n = self.n.max(1);
        phenomenon.retain_items(|index, _| index % n == 0);
    }
}

/// Removes items whose `[time_from, time_to)` interval overlaps the
/// interval of an already-kept item earlier in the sequence.
///
/// Used when reconciling two resolutions covering overlapping spans: the
/// finer items are registered first, so an appended coarser item that
/// overlaps finer coverage is dropped even when the kept item starts later
/// in time. Instantaneous items are empty intervals and neither shadow nor
/// get shadowed.
#[derive(Debug, Clone, Copy, Default)]
pub struct OverlappingTime;

impl ItemFilter for OverlappingTime {
    fn apply(&self, phenomenon: &mut Phenomenon) {
        let mut kept: Vec<ValueItem> = Vec::new();
        phenomenon.retain_items(|_, item| {
            if kept.iter().any(|earlier| earlier.overlaps(item)) {
                false
            } else {
                kept.push(item.clone());
                true
            }
        });
    }
}
