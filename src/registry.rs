//! A name-keyed collection of phenomena representing one forecast fetch.

use crate::types::phenomenon::{Phenomenon, PhenomenonKind};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// The request-scoped data model: one [`Phenomenon`] per deterministic key.
///
/// A registry is populated by an upstream parser, read and extended by the
/// assembly policy, and handed to the renderer once finished. It is
/// explicitly constructed per request and passed by reference through the
/// call chain; there is no process-wide shared instance, so concurrent
/// requests simply own separate registries.
///
/// # Examples
///
/// ```
/// use chrono::{TimeZone, Utc};
/// use meteogram::{Parameter, Phenomenon, PhenomenonRegistry};
///
/// let mut registry = PhenomenonRegistry::new();
/// let mut temperature = Phenomenon::numeric(Parameter::Temperature.key(), "celsius");
/// temperature.add_instant_number(Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap(), 3.5);
/// registry.insert(temperature);
///
/// assert!(registry.contains(Parameter::Temperature.key()));
/// assert!(registry.numeric(Parameter::Temperature.key()).is_some());
/// assert!(registry.symbol(Parameter::Temperature.key()).is_none());
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PhenomenonRegistry {
    phenomena: HashMap<String, Phenomenon>,
}

impl PhenomenonRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of registered phenomena.
    pub fn len(&self) -> usize {
        self.phenomena.len()
    }

    /// Whether the registry holds no phenomena.
    pub fn is_empty(&self) -> bool {
        self.phenomena.is_empty()
    }

    /// Whether a phenomenon is registered under `key`.
    pub fn contains(&self, key: &str) -> bool {
        self.phenomena.contains_key(key)
    }

    /// All registered keys, in no particular order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.phenomena.keys().map(String::as_str)
    }

    /// Registers a phenomenon under its own name, replacing and returning
    /// any previous entry for that key.
    pub fn insert(&mut self, phenomenon: Phenomenon) -> Option<Phenomenon> {
        self.phenomena.insert(phenomenon.name().to_string(), phenomenon)
    }

    /// The phenomenon registered under `key`, regardless of kind.
    pub fn get(&self, key: &str) -> Option<&Phenomenon> {
        self.phenomena.get(key)
    }

    /// Mutable access to the phenomenon registered under `key`.
    pub fn get_mut(&mut self, key: &str) -> Option<&mut Phenomenon> {
        self.phenomena.get_mut(key)
    }

    /// Removes and returns the phenomenon registered under `key`.
    pub fn remove(&mut self, key: &str) -> Option<Phenomenon> {
        self.phenomena.remove(key)
    }

    /// Typed retrieval: the numeric phenomenon under `key`, or `None` when
    /// absent or of a different kind.
    pub fn numeric(&self, key: &str) -> Option<&Phenomenon> {
        self.of_kind(key, PhenomenonKind::Numeric)
    }

    /// Typed retrieval: the symbol phenomenon under `key`.
    pub fn symbol(&self, key: &str) -> Option<&Phenomenon> {
        self.of_kind(key, PhenomenonKind::Symbol)
    }

    /// Typed retrieval: the text phenomenon under `key`.
    pub fn text(&self, key: &str) -> Option<&Phenomenon> {
        self.of_kind(key, PhenomenonKind::Text)
    }

    fn of_kind(&self, key: &str, kind: PhenomenonKind) -> Option<&Phenomenon> {
        self.phenomena.get(key).filter(|p| p.kind() == kind)
    }

    /// Global age-based pruning: removes items with `time_to` after the
    /// cutoff from every registered phenomenon.
    pub fn cut_older_than(&mut self, cutoff: DateTime<Utc>) {
        for phenomenon in self.phenomena.values_mut() {
            phenomenon.cut_older_than(cutoff);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(h: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, h, 0, 0).unwrap()
    }

    fn registry_with_two_series() -> PhenomenonRegistry {
        let mut registry = PhenomenonRegistry::new();

        let mut temperature = Phenomenon::numeric("temperature", "celsius");
        temperature.add_instant_number(at(0), 1.0);
        temperature.add_instant_number(at(6), 2.0);
        registry.insert(temperature);

        let mut symbols = Phenomenon::symbol("weather_symbol", "code");
        symbols.add_instant_symbol(at(0), 4);
        symbols.add_instant_symbol(at(6), 2);
        registry.insert(symbols);

        registry
    }

    #[test]
    fn typed_retrieval_checks_kind() {
        let registry = registry_with_two_series();
        assert!(registry.numeric("temperature").is_some());
        assert!(registry.symbol("temperature").is_none());
        assert!(registry.symbol("weather_symbol").is_some());
        assert!(registry.text("weather_symbol").is_none());
        assert!(registry.numeric("missing").is_none());
    }

    #[test]
    fn insert_replaces_existing_entry() {
        let mut registry = registry_with_two_series();
        let replacement = Phenomenon::numeric("temperature", "kelvin");
        let previous = registry.insert(replacement);
        assert_eq!(previous.unwrap().unit(), "celsius");
        assert_eq!(registry.get("temperature").unwrap().unit(), "kelvin");
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn cut_older_than_prunes_every_phenomenon() {
        let mut registry = registry_with_two_series();
        registry.cut_older_than(at(3));
        assert_eq!(registry.get("temperature").unwrap().len(), 1);
        assert_eq!(registry.get("weather_symbol").unwrap().len(), 1);
    }

    #[test]
    fn survives_a_serde_round_trip() {
        let registry = registry_with_two_series();
        let json = serde_json::to_string(&registry).unwrap();
        let back: PhenomenonRegistry = serde_json::from_str(&json).unwrap();

        assert_eq!(back.len(), 2);
        let temperature = back.numeric("temperature").unwrap();
        assert_eq!(temperature.unit(), "celsius");
        assert_eq!(temperature.numbers(), vec![1.0, 2.0]);
        assert_eq!(temperature.from_times(), vec![at(0), at(6)]);
        let symbols = back.symbol("weather_symbol").unwrap();
        assert_eq!(symbols.item(0).unwrap().value().as_symbol(), Some(4));
    }
}
