//! Builds a 48-hour meteogram from a hand-populated registry and prints
//! what the assembly policy kept.

use chrono::{DateTime, Duration, TimeZone, Utc};
use meteogram::{
    ForecastTerm, MeteogramAssembler, ParameterToggles, Phenomenon, PhenomenonRegistry,
};

fn main() {
    let start = Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap();

    // --- Populate a source registry the way a feed parser would ---
    let mut source = PhenomenonRegistry::new();
    source.insert(hourly(start, "temperature", "celsius", |h| {
        6.0 * (h as f64 / 9.0).sin() - 1.0
    }));
    source.insert(hourly(start, "dew_point", "celsius", |h| {
        5.0 * (h as f64 / 9.0).sin() - 4.0
    }));
    source.insert(hourly(start, "pressure", "hPa", |h| {
        1008.0 + 6.0 * (h as f64 / 15.0).cos()
    }));
    source.insert(hourly(start, "precipitation_1", "mm", |h| {
        if (10..14).contains(&h) { 0.8 } else { 0.0 }
    }));
    source.insert(hourly(start, "wind_speed", "m/s", |h| 3.0 + (h % 6) as f64));
    source.insert(hourly(start, "wind_direction", "degrees", |h| {
        ((h * 10) % 360) as f64
    }));
    let mut symbols = Phenomenon::symbol("weather_symbol_1", "code");
    for h in 0..48 {
        symbols.add_instant_symbol(start + Duration::hours(h), (h % 4) as i32 + 1);
    }
    source.insert(symbols);

    // --- Assemble ---
    let assembler = MeteogramAssembler::builder()
        .term(ForecastTerm::Short)
        .window_start(start)
        .window_end(start + Duration::hours(48))
        .build();
    let meteogram = assembler.assemble(&source, &ParameterToggles::default());

    println!(
        "assembled {} phenomena for {} .. {}",
        meteogram.registry().len(),
        meteogram.window_start(),
        meteogram.window_end()
    );
    if let Some((min, max)) = meteogram.temperature_range() {
        println!("shared temperature axis: {min:.1} .. {max:.1} celsius");
    }
    let mut keys: Vec<&str> = meteogram.registry().keys().collect();
    keys.sort();
    for key in keys {
        let p = meteogram.phenomenon(key).unwrap();
        println!("  {key}: {} items ({})", p.len(), p.unit());
    }
}

fn hourly(start: DateTime<Utc>, name: &str, unit: &str, f: impl Fn(i64) -> f64) -> Phenomenon {
    let mut p = Phenomenon::numeric(name, unit);
    for h in 0..48 {
        p.add_instant_number(start + Duration::hours(h), f(h));
    }
    p
}
