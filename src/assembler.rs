//! The meteogram assembly policy: the decision logic that turns a raw
//! forecast registry into the exact set of display-ready phenomena a
//! renderer reads.
//!
//! Assembly is a stateless, synchronous computation re-run per chart
//! request. Given a forecast term, a time window and per-parameter
//! toggles, it selects which raw or derived series to use, applies the
//! prescribed filter sequences, derives accumulated precipitation,
//! smooth-curve and threshold-crossing series, and aligns symbol rows to a
//! shared time grid. A parameter whose data is absent at every resolution
//! — or whose derivation violates a precondition — is logged and omitted;
//! nothing here fails a whole chart.

use crate::derivation::accumulation::accumulated_precipitation;
use crate::derivation::spline::{cardinal_spline, hybrid_spline, DEFAULT_PRECISION, DEFAULT_TENSION};
use crate::derivation::threshold::insert_threshold_crossings;
use crate::filtering::{
    AfterDate, BeforeDate, EveryNth, InListFromDate, IndexLessThan, ItemFilter, LessOrEqualNumber,
    OverlappingTime,
};
use crate::registry::PhenomenonRegistry;
use crate::types::forecast_term::ForecastTerm;
use crate::types::parameter::Parameter;
use crate::types::phenomenon::Phenomenon;
use crate::types::resolution::TimeResolution;
use bon::bon;
use chrono::{DateTime, Duration, Utc};
use log::{debug, warn};

/// m/s to knots, for wind-barb rendering.
const MS_TO_KNOTS: f64 = 1.943_844_49;

/// Rotation from meteorological from-direction to arrow direction.
const DIRECTION_ROTATION: f64 = 180.0;

/// Freezing point inserted into temperature series as exact crossings.
const FREEZING_POINT: f64 = 0.0;

/// Symbols this close to a window edge lack the context to be
/// representative and are excluded.
const SYMBOL_EDGE_MARGIN_HOURS: i64 = 3;

/// Per-parameter switches for one chart request. Every parameter defaults
/// to enabled.
///
/// # Examples
///
/// ```
/// use meteogram::ParameterToggles;
///
/// let toggles = ParameterToggles::builder().waves(false).build();
/// assert!(toggles.temperature);
/// assert!(!toggles.waves);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParameterToggles {
    pub temperature: bool,
    pub dew_point: bool,
    pub pressure: bool,
    pub precipitation: bool,
    pub wind: bool,
    pub clouds: bool,
    pub weather_symbols: bool,
    pub waves: bool,
}

#[bon]
impl ParameterToggles {
    #[builder]
    pub fn new(
        temperature: Option<bool>,
        dew_point: Option<bool>,
        pressure: Option<bool>,
        precipitation: Option<bool>,
        wind: Option<bool>,
        clouds: Option<bool>,
        weather_symbols: Option<bool>,
        waves: Option<bool>,
    ) -> Self {
        Self {
            temperature: temperature.unwrap_or(true),
            dew_point: dew_point.unwrap_or(true),
            pressure: pressure.unwrap_or(true),
            precipitation: precipitation.unwrap_or(true),
            wind: wind.unwrap_or(true),
            clouds: clouds.unwrap_or(true),
            weather_symbols: weather_symbols.unwrap_or(true),
            waves: waves.unwrap_or(true),
        }
    }
}

impl Default for ParameterToggles {
    fn default() -> Self {
        Self::builder().build()
    }
}

/// The finished assembly of one chart request.
///
/// Holds the registry subset ready for rendering plus the cross-series
/// reconciliations the renderer needs (currently the shared temperature
/// axis range). Read-only by design; the renderer never calls back into
/// filters or derivations.
#[derive(Debug, Clone)]
pub struct Meteogram {
    term: ForecastTerm,
    window_start: DateTime<Utc>,
    window_end: DateTime<Utc>,
    temperature_range: Option<(f64, f64)>,
    registry: PhenomenonRegistry,
}

impl Meteogram {
    /// The forecast term this meteogram was assembled for.
    pub fn term(&self) -> ForecastTerm {
        self.term
    }

    /// Start of the display window.
    pub fn window_start(&self) -> DateTime<Utc> {
        self.window_start
    }

    /// End of the display window.
    pub fn window_end(&self) -> DateTime<Utc> {
        self.window_end
    }

    /// The combined value range both temperature series share on the
    /// temperature axis, when at least one of them was assembled.
    pub fn temperature_range(&self) -> Option<(f64, f64)> {
        self.temperature_range
    }

    /// The finished registry.
    pub fn registry(&self) -> &PhenomenonRegistry {
        &self.registry
    }

    /// The assembled phenomenon under `key`, if the parameter survived
    /// assembly.
    pub fn phenomenon(&self, key: &str) -> Option<&Phenomenon> {
        self.registry.get(key)
    }
}

/// Assembles meteograms from populated registries.
///
/// One assembler describes one chart request shape (term, window, spline
/// settings) and can be reused across source registries. Construction uses
/// a builder:
///
/// ```
/// use chrono::{Duration, TimeZone, Utc};
/// use meteogram::{ForecastTerm, MeteogramAssembler, ParameterToggles, PhenomenonRegistry};
///
/// let start = Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap();
/// let assembler = MeteogramAssembler::builder()
///     .term(ForecastTerm::Short)
///     .window_start(start)
///     .window_end(start + Duration::hours(48))
///     .build();
///
/// let meteogram = assembler.assemble(&PhenomenonRegistry::new(), &ParameterToggles::default());
/// assert!(meteogram.registry().is_empty());
/// ```
#[derive(Debug, Clone)]
pub struct MeteogramAssembler {
    term: ForecastTerm,
    window_start: DateTime<Utc>,
    window_end: DateTime<Utc>,
    tension: f64,
    spline_precision: usize,
}

#[bon]
impl MeteogramAssembler {
    /// Creates an assembler for one window.
    ///
    /// `window_end` is clamped to the term's maximum display window.
    /// `tension` defaults to the Catmull-Rom value 0.5 and
    /// `spline_precision` to 4 steps per interval.
    #[builder]
    pub fn new(
        term: ForecastTerm,
        window_start: DateTime<Utc>,
        window_end: DateTime<Utc>,
        tension: Option<f64>,
        spline_precision: Option<usize>,
    ) -> Self {
        Self {
            term,
            window_start,
            window_end: window_end.min(window_start + term.max_window()),
            tension: tension.unwrap_or(DEFAULT_TENSION),
            spline_precision: spline_precision.unwrap_or(DEFAULT_PRECISION),
        }
    }

    /// Runs the assembly policy over `source` and returns the finished
    /// meteogram.
    ///
    /// `source` must be populated with parser-provided phenomena keyed by
    /// [`Parameter::key`] (single-resolution parameters) or
    /// [`Parameter::key_at`] (the precipitation family and weather
    /// symbols). The source registry is never mutated; every assembled
    /// series is an owned copy.
    pub fn assemble(&self, source: &PhenomenonRegistry, toggles: &ParameterToggles) -> Meteogram {
        let mut out = PhenomenonRegistry::new();

        let mut temperature_range = None;
        if toggles.temperature || toggles.dew_point {
            temperature_range = self.assemble_temperatures(source, toggles, &mut out);
        }
        if toggles.pressure {
            self.assemble_hybrid_curve(source, Parameter::Pressure, &mut out);
        }
        if toggles.waves {
            self.assemble_wave_height(source, &mut out);
        }
        if toggles.precipitation {
            self.assemble_precipitation(source, &mut out);
        }

        let symbol_times = if toggles.weather_symbols {
            self.assemble_weather_symbols(source, &mut out)
        } else {
            None
        };
        if toggles.wind {
            self.assemble_wind(source, symbol_times.as_deref(), &mut out);
        }
        if toggles.clouds {
            self.assemble_clouds(source, symbol_times.as_deref(), &mut out);
        }

        Meteogram {
            term: self.term,
            window_start: self.window_start,
            window_end: self.window_end,
            temperature_range,
            registry: out,
        }
    }

    /// Walks the term's fallback chain and returns the first resolution
    /// `present` answers for, logging when it is not the preferred one.
    fn resolve_resolution(
        &self,
        parameter: Parameter,
        present: impl Fn(TimeResolution) -> bool,
    ) -> Option<TimeResolution> {
        debug_assert!(parameter.is_multi_resolution());
        let preferred = self.term.preferred_resolution();
        for resolution in self.term.resolution_chain() {
            if present(resolution) {
                if resolution != preferred {
                    debug!("{parameter}: {preferred} absent, falling back to {resolution}");
                }
                return Some(resolution);
            }
        }
        None
    }

    fn assemble_temperatures(
        &self,
        source: &PhenomenonRegistry,
        toggles: &ParameterToggles,
        out: &mut PhenomenonRegistry,
    ) -> Option<(f64, f64)> {
        let air = toggles
            .temperature
            .then(|| self.temperature_series(source, Parameter::Temperature, out))
            .flatten();
        let dew = toggles
            .dew_point
            .then(|| self.temperature_series(source, Parameter::DewPoint, out))
            .flatten();

        // Both series share one axis: the combined range replaces each
        // series' own auto-scale.
        match (air, dew) {
            (Some(a), Some(d)) => Some((a.0.min(d.0), a.1.max(d.1))),
            (Some(a), None) => Some(a),
            (None, Some(d)) => Some(d),
            (None, None) => None,
        }
    }

    /// Assembles one temperature-like series: freezing crossings inserted
    /// into the raw series, plus a hybrid-spline curve when derivable.
    /// Returns the series' value range.
    fn temperature_series(
        &self,
        source: &PhenomenonRegistry,
        parameter: Parameter,
        out: &mut PhenomenonRegistry,
    ) -> Option<(f64, f64)> {
        let Some(raw) = source.numeric(parameter.key()) else {
            debug!("{parameter}: not in registry, parameter omitted");
            return None;
        };
        let mut series = raw.clone();
        series.cut_older_than(self.window_end);
        let mut curve = series.clone();

        if let Err(e) = insert_threshold_crossings(&mut series, FREEZING_POINT) {
            warn!("{parameter}: {e}; parameter omitted");
            return None;
        }
        let range = (series.min_value(), series.max_value());

        match hybrid_spline(&mut curve, self.tension, self.spline_precision) {
            Ok(()) => {
                curve.set_name(parameter.curve_key());
                out.insert(curve);
            }
            Err(e) => warn!("{parameter}: curve omitted: {e}"),
        }
        out.insert(series);
        Some(range)
    }

    /// Assembles a plain numeric series plus its hybrid-spline curve.
    fn assemble_hybrid_curve(
        &self,
        source: &PhenomenonRegistry,
        parameter: Parameter,
        out: &mut PhenomenonRegistry,
    ) {
        let Some(raw) = source.numeric(parameter.key()) else {
            debug!("{parameter}: not in registry, parameter omitted");
            return;
        };
        let mut series = raw.clone();
        series.cut_older_than(self.window_end);
        let mut curve = series.clone();
        match hybrid_spline(&mut curve, self.tension, self.spline_precision) {
            Ok(()) => {
                curve.set_name(parameter.curve_key());
                out.insert(curve);
            }
            Err(e) => warn!("{parameter}: curve omitted: {e}"),
        }
        out.insert(series);
    }

    /// Wave height tolerates interval items and sparse coverage, so its
    /// curve uses the cardinal spline directly.
    fn assemble_wave_height(&self, source: &PhenomenonRegistry, out: &mut PhenomenonRegistry) {
        let parameter = Parameter::WaveHeight;
        let Some(raw) = source.numeric(parameter.key()) else {
            debug!("{parameter}: not in registry, parameter omitted");
            return;
        };
        let mut series = raw.clone();
        series.cut_older_than(self.window_end);
        let mut curve = series.clone();
        match cardinal_spline(&mut curve, self.tension) {
            Ok(()) => {
                curve.set_name(parameter.curve_key());
                out.insert(curve);
            }
            Err(e) => warn!("{parameter}: curve omitted: {e}"),
        }
        out.insert(series);
    }

    fn assemble_precipitation(&self, source: &PhenomenonRegistry, out: &mut PhenomenonRegistry) {
        let resolution = self.resolve_resolution(Parameter::Precipitation, |r| {
            self.has_minmax_pair(source, r)
                || source.numeric(&Parameter::Precipitation.key_at(r)).is_some()
        });
        let Some(resolution) = resolution else {
            debug!("precipitation: no series at any resolution, parameter omitted");
            return;
        };

        if self.has_minmax_pair(source, resolution) {
            self.assemble_minmax_precipitation(source, resolution, out);
        } else {
            self.assemble_single_precipitation(source, resolution, out);
        }
    }

    fn has_minmax_pair(&self, source: &PhenomenonRegistry, resolution: TimeResolution) -> bool {
        source
            .numeric(&Parameter::PrecipitationMax.key_at(resolution))
            .is_some()
            && source
                .numeric(&Parameter::PrecipitationMin.key_at(resolution))
                .is_some()
    }

    /// Max/min variant: the max series drives plotting and accumulation,
    /// the min series follows max's surviving timestamps.
    ///
    /// The short-term path zero-filters max before aligning min; the
    /// long-term path aligns first and zero-filters afterwards. The orders
    /// are not equivalent when max carries zero bars and both are
    /// reproduced deliberately.
    fn assemble_minmax_precipitation(
        &self,
        source: &PhenomenonRegistry,
        resolution: TimeResolution,
        out: &mut PhenomenonRegistry,
    ) {
        let max_key = Parameter::PrecipitationMax.key_at(resolution);
        let min_key = Parameter::PrecipitationMin.key_at(resolution);
        let (Some(max_src), Some(min_src)) = (source.numeric(&max_key), source.numeric(&min_key))
        else {
            return;
        };

        let mut max = max_src.clone();
        max.cut_older_than(self.window_end);
        self.stitch_coarser(source, Parameter::PrecipitationMax, resolution, &mut max);
        let mut min = min_src.clone();
        min.cut_older_than(self.window_end);

        match self.term {
            ForecastTerm::Short => {
                LessOrEqualNumber { threshold: 0.0 }.apply(&mut max);
                InListFromDate {
                    times: max.from_times(),
                }
                .apply(&mut min);
            }
            ForecastTerm::Long => {
                InListFromDate {
                    times: max.from_times(),
                }
                .apply(&mut min);
                LessOrEqualNumber { threshold: 0.0 }.apply(&mut max);
            }
        }

        out.insert(accumulated_precipitation(&max, resolution, self.window_end));
        out.insert(max);
        out.insert(min);
    }

    fn assemble_single_precipitation(
        &self,
        source: &PhenomenonRegistry,
        resolution: TimeResolution,
        out: &mut PhenomenonRegistry,
    ) {
        let key = Parameter::Precipitation.key_at(resolution);
        let Some(raw) = source.numeric(&key) else {
            return;
        };
        let mut series = raw.clone();
        series.cut_older_than(self.window_end);
        self.stitch_coarser(source, Parameter::Precipitation, resolution, &mut series);
        LessOrEqualNumber { threshold: 0.0 }.apply(&mut series);

        out.insert(accumulated_precipitation(&series, resolution, self.window_end));
        out.insert(series);
    }

    /// When the chosen series stops before the window end but a coarser
    /// resolution continues, append the coarser items and let the
    /// overlapping-time filter drop whatever doubles finer coverage.
    fn stitch_coarser(
        &self,
        source: &PhenomenonRegistry,
        parameter: Parameter,
        chosen: TimeResolution,
        series: &mut Phenomenon,
    ) {
        let Some(series_end) = series.last_to_time() else {
            return;
        };
        for coarser in chosen.coarser() {
            let Some(other) = source.numeric(&parameter.key_at(*coarser)) else {
                continue;
            };
            if other.last_to_time().map_or(true, |end| end <= series_end) {
                continue;
            }
            let mut extension = other.clone();
            extension.cut_older_than(self.window_end);
            series.append_items(extension.items().iter().cloned());
            OverlappingTime.apply(series);
            series.sort_by_time();
            debug!("{parameter}: stitched {coarser} items past {series_end}");
            return;
        }
    }

    /// Assembles the weather-symbol row and returns its time grid, the
    /// alignment currency for the other symbol rows.
    fn assemble_weather_symbols(
        &self,
        source: &PhenomenonRegistry,
        out: &mut PhenomenonRegistry,
    ) -> Option<Vec<DateTime<Utc>>> {
        let parameter = Parameter::WeatherSymbol;
        let resolution = self.resolve_resolution(parameter, |r| {
            source.symbol(&parameter.key_at(r)).is_some()
        });
        let Some(resolution) = resolution else {
            debug!("{parameter}: no series at any resolution, parameter omitted");
            return None;
        };
        let mut symbols = source.symbol(&parameter.key_at(resolution))?.clone();
        symbols.cut_older_than(self.window_end);

        // Down-sample to the term's target spacing when the data is finer,
        // skipping the leading partial-period entry.
        let per_symbol = (self.term.symbol_spacing_hours() / resolution.hours()).max(1) as usize;
        if per_symbol > 1 {
            IndexLessThan { n: 1 }.apply(&mut symbols);
            EveryNth { n: per_symbol }.apply(&mut symbols);
        }

        let margin = Duration::hours(SYMBOL_EDGE_MARGIN_HOURS);
        BeforeDate {
            cutoff: self.window_end - margin,
        }
        .apply(&mut symbols);
        if self.term == ForecastTerm::Long {
            AfterDate {
                cutoff: self.window_start + margin,
            }
            .apply(&mut symbols);
        }

        let times = symbols.from_times();
        symbols.set_name(parameter.key());
        out.insert(symbols);
        Some(times)
    }

    fn assemble_wind(
        &self,
        source: &PhenomenonRegistry,
        symbol_times: Option<&[DateTime<Utc>]>,
        out: &mut PhenomenonRegistry,
    ) {
        match source.numeric(Parameter::WindSpeed.key()) {
            Some(raw) => {
                let mut speed = raw.clone();
                speed.cut_older_than(self.window_end);
                speed.scale(MS_TO_KNOTS);
                speed.set_unit("knots");
                align_to_symbols(&mut speed, symbol_times);
                out.insert(speed);
            }
            None => debug!("wind_speed: not in registry, parameter omitted"),
        }

        match source.numeric(Parameter::WindDirection.key()) {
            Some(raw) => {
                let mut direction = raw.clone();
                direction.cut_older_than(self.window_end);
                direction.translate(DIRECTION_ROTATION);
                align_to_symbols(&mut direction, symbol_times);
                out.insert(direction);
            }
            None => debug!("wind_direction: not in registry, parameter omitted"),
        }
    }

    fn assemble_clouds(
        &self,
        source: &PhenomenonRegistry,
        symbol_times: Option<&[DateTime<Utc>]>,
        out: &mut PhenomenonRegistry,
    ) {
        let Some(raw) = source.symbol(Parameter::CloudCover.key()) else {
            debug!("cloud_cover: not in registry, parameter omitted");
            return;
        };
        let mut clouds = raw.clone();
        clouds.cut_older_than(self.window_end);
        align_to_symbols(&mut clouds, symbol_times);
        out.insert(clouds);
    }
}

/// All symbol rows share the weather-symbol time grid.
fn align_to_symbols(series: &mut Phenomenon, symbol_times: Option<&[DateTime<Utc>]>) {
    if let Some(times) = symbol_times {
        InListFromDate {
            times: times.to_vec(),
        }
        .apply(series);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(h: i64) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap() + Duration::hours(h)
    }

    fn short_assembler(end_hour: i64) -> MeteogramAssembler {
        MeteogramAssembler::builder()
            .term(ForecastTerm::Short)
            .window_start(at(0))
            .window_end(at(end_hour))
            .build()
    }

    fn numeric_series(name: &str, unit: &str, values: &[(i64, f64)]) -> Phenomenon {
        let mut p = Phenomenon::numeric(name, unit);
        for (h, v) in values {
            p.add_instant_number(at(*h), *v);
        }
        p
    }

    fn symbol_series(name: &str, codes: &[(i64, i32)]) -> Phenomenon {
        let mut p = Phenomenon::symbol(name, "code");
        for (h, c) in codes {
            p.add_instant_symbol(at(*h), *c);
        }
        p
    }

    fn only_precipitation() -> ParameterToggles {
        ParameterToggles::builder()
            .temperature(false)
            .dew_point(false)
            .pressure(false)
            .wind(false)
            .clouds(false)
            .weather_symbols(false)
            .waves(false)
            .build()
    }

    #[test]
    fn falls_back_to_six_hours_when_one_hour_is_absent() {
        let mut source = PhenomenonRegistry::new();
        source.insert(numeric_series(
            "precipitation_6",
            "mm",
            &[(0, 0.0), (6, 2.0), (12, 1.0)],
        ));

        let meteogram = short_assembler(24).assemble(&source, &only_precipitation());

        assert!(meteogram.phenomenon("precipitation_6").is_some());
        assert!(meteogram.phenomenon("accumulated_precipitation_6").is_some());
        assert!(meteogram.phenomenon("precipitation_1").is_none());
    }

    #[test]
    fn absent_parameter_is_omitted_without_failing_the_assembly() {
        let mut source = PhenomenonRegistry::new();
        source.insert(numeric_series(
            "temperature",
            "celsius",
            &[(0, 1.0), (1, 2.0), (2, 3.0), (3, 4.0)],
        ));

        let meteogram = short_assembler(24).assemble(&source, &ParameterToggles::default());

        assert!(meteogram.phenomenon("temperature").is_some());
        for key in [
            "precipitation_1",
            "wind_speed",
            "cloud_cover",
            "weather_symbol",
        ] {
            assert!(meteogram.phenomenon(key).is_none(), "{key} should be omitted");
        }
    }

    #[test]
    fn max_series_drives_min_alignment_short_term() {
        let mut source = PhenomenonRegistry::new();
        source.insert(numeric_series(
            "precipitation_max_1",
            "mm",
            &[(0, 0.0), (1, 2.0), (2, 0.0), (3, 1.0)],
        ));
        source.insert(numeric_series(
            "precipitation_min_1",
            "mm",
            &[(0, 0.0), (1, 1.0), (2, 0.0), (3, 0.5)],
        ));

        let meteogram = short_assembler(24).assemble(&source, &only_precipitation());

        let max = meteogram.phenomenon("precipitation_max_1").unwrap();
        let min = meteogram.phenomenon("precipitation_min_1").unwrap();
        // Short term: max is zero-filtered first, min follows its grid.
        assert_eq!(max.from_times(), vec![at(1), at(3)]);
        assert_eq!(min.from_times(), vec![at(1), at(3)]);
        assert_eq!(min.numbers(), vec![1.0, 0.5]);
    }

    #[test]
    fn long_term_aligns_min_before_zero_filtering() {
        let mut source = PhenomenonRegistry::new();
        source.insert(numeric_series(
            "precipitation_max_6",
            "mm",
            &[(0, 0.0), (6, 2.0), (12, 0.0)],
        ));
        source.insert(numeric_series(
            "precipitation_min_6",
            "mm",
            &[(0, 0.0), (6, 1.0), (12, 0.0)],
        ));

        let assembler = MeteogramAssembler::builder()
            .term(ForecastTerm::Long)
            .window_start(at(0))
            .window_end(at(228))
            .build();
        let meteogram = assembler.assemble(&source, &only_precipitation());

        let max = meteogram.phenomenon("precipitation_max_6").unwrap();
        let min = meteogram.phenomenon("precipitation_min_6").unwrap();
        // Min was aligned while max still carried its zero bars.
        assert_eq!(max.from_times(), vec![at(6)]);
        assert_eq!(min.from_times(), vec![at(0), at(6), at(12)]);
    }

    #[test]
    fn accumulation_runs_over_the_zero_filtered_max_series() {
        let mut source = PhenomenonRegistry::new();
        source.insert(numeric_series(
            "precipitation_1",
            "mm",
            &[(0, 0.0), (1, 2.0), (2, 0.0), (3, 3.0)],
        ));

        let meteogram = short_assembler(4).assemble(&source, &only_precipitation());

        let acc = meteogram.phenomenon("accumulated_precipitation_1").unwrap();
        // Zero-filtering leaves points at 1h and 3h; the walk starts at
        // 1h and the 2h lookup interpolates between the survivors.
        assert_eq!(acc.from_times(), vec![at(1), at(2), at(3)]);
        assert_eq!(acc.numbers(), vec![2.0, 4.5, 7.5]);
    }

    #[test]
    fn symbols_are_downsampled_and_kept_clear_of_the_window_end() {
        let mut source = PhenomenonRegistry::new();
        let codes: Vec<(i64, i32)> = (0..12).map(|h| (h, h as i32)).collect();
        source.insert(symbol_series("weather_symbol_1", &codes));

        let toggles = ParameterToggles::builder()
            .temperature(false)
            .dew_point(false)
            .pressure(false)
            .precipitation(false)
            .wind(false)
            .clouds(false)
            .waves(false)
            .build();
        let meteogram = short_assembler(12).assemble(&source, &toggles);

        let symbols = meteogram.phenomenon("weather_symbol").unwrap();
        // 1h data at 2h target spacing: drop the leading entry, keep every
        // second, then drop everything within 3h of the window end.
        assert_eq!(symbols.from_times(), vec![at(1), at(3), at(5), at(7)]);
    }

    #[test]
    fn wind_and_clouds_share_the_symbol_time_grid() {
        let mut source = PhenomenonRegistry::new();
        source.insert(symbol_series(
            "weather_symbol_1",
            &[(0, 1), (1, 2), (2, 3), (3, 4), (4, 5), (5, 6), (6, 7), (7, 8)],
        ));
        let hours: Vec<(i64, f64)> = (0..8).map(|h| (h, h as f64)).collect();
        source.insert(numeric_series("wind_speed", "m/s", &hours));
        source.insert(numeric_series("wind_direction", "degrees", &hours));
        source.insert(symbol_series(
            "cloud_cover",
            &[(0, 1), (1, 1), (2, 2), (3, 2), (4, 3), (5, 3), (6, 4), (7, 4)],
        ));

        let toggles = ParameterToggles::builder()
            .temperature(false)
            .dew_point(false)
            .pressure(false)
            .precipitation(false)
            .waves(false)
            .build();
        let meteogram = short_assembler(12).assemble(&source, &toggles);

        let symbol_times = meteogram.phenomenon("weather_symbol").unwrap().from_times();
        assert!(!symbol_times.is_empty());
        for key in ["wind_speed", "wind_direction", "cloud_cover"] {
            assert_eq!(
                meteogram.phenomenon(key).unwrap().from_times(),
                symbol_times,
                "{key} should share the symbol grid"
            );
        }
    }

    #[test]
    fn wind_series_are_converted_for_rendering() {
        let mut source = PhenomenonRegistry::new();
        source.insert(numeric_series("wind_speed", "m/s", &[(0, 10.0)]));
        source.insert(numeric_series("wind_direction", "degrees", &[(0, 90.0)]));

        let toggles = ParameterToggles::builder()
            .temperature(false)
            .dew_point(false)
            .pressure(false)
            .precipitation(false)
            .clouds(false)
            .weather_symbols(false)
            .waves(false)
            .build();
        let meteogram = short_assembler(12).assemble(&source, &toggles);

        let speed = meteogram.phenomenon("wind_speed").unwrap();
        assert!((speed.numbers()[0] - 19.438_444_9).abs() < 1e-9);
        assert_eq!(speed.unit(), "knots");
        let direction = meteogram.phenomenon("wind_direction").unwrap();
        assert_eq!(direction.numbers(), vec![270.0]);
    }

    #[test]
    fn combined_temperature_range_spans_both_series() {
        let mut source = PhenomenonRegistry::new();
        source.insert(numeric_series(
            "temperature",
            "celsius",
            &[(0, -5.0), (1, 2.0), (2, 10.0), (3, 8.0)],
        ));
        source.insert(numeric_series(
            "dew_point",
            "celsius",
            &[(0, -8.0), (1, -2.0), (2, 5.0), (3, 3.0)],
        ));

        let toggles = ParameterToggles::builder()
            .pressure(false)
            .precipitation(false)
            .wind(false)
            .clouds(false)
            .weather_symbols(false)
            .waves(false)
            .build();
        let meteogram = short_assembler(12).assemble(&source, &toggles);

        assert_eq!(meteogram.temperature_range(), Some((-8.0, 10.0)));
        // Freezing crossings were inserted into both raw series.
        let temperature = meteogram.phenomenon("temperature").unwrap();
        assert!(temperature.numbers().contains(&0.0));
        assert!(meteogram.phenomenon("temperature_curve").is_some());
        assert!(meteogram.phenomenon("dew_point_curve").is_some());
    }

    #[test]
    fn failed_curve_derivation_downgrades_to_omission() {
        let mut source = PhenomenonRegistry::new();
        // Two points: enough for crossings, too few for the hybrid spline.
        source.insert(numeric_series("temperature", "celsius", &[(0, -1.0), (1, 1.0)]));

        let toggles = ParameterToggles::builder()
            .dew_point(false)
            .pressure(false)
            .precipitation(false)
            .wind(false)
            .clouds(false)
            .weather_symbols(false)
            .waves(false)
            .build();
        let meteogram = short_assembler(12).assemble(&source, &toggles);

        assert!(meteogram.phenomenon("temperature").is_some());
        assert!(meteogram.phenomenon("temperature_curve").is_none());
        assert_eq!(meteogram.temperature_range(), Some((-1.0, 1.0)));
    }

    #[test]
    fn stitching_extends_fine_coverage_with_a_coarser_series() {
        let mut source = PhenomenonRegistry::new();
        let mut fine = Phenomenon::numeric("precipitation_1", "mm");
        for h in 0..6 {
            fine.add_number(at(h), at(h + 1), 0.5);
        }
        source.insert(fine);
        let mut coarse = Phenomenon::numeric("precipitation_6", "mm");
        coarse.add_number(at(0), at(6), 3.0);
        coarse.add_number(at(6), at(12), 2.0);
        coarse.add_number(at(12), at(18), 1.0);
        source.insert(coarse);

        let meteogram = short_assembler(18).assemble(&source, &only_precipitation());

        let series = meteogram.phenomenon("precipitation_1").unwrap();
        // The overlapping 0h-6h coarse bar is dropped; the later bars
        // extend the fine coverage.
        assert_eq!(series.len(), 8);
        assert_eq!(series.item(6).unwrap().time_from(), at(6));
        assert_eq!(series.item(7).unwrap().time_from(), at(12));
    }
}
