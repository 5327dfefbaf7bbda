//! Spline resampling of numeric phenomena into point sequences dense enough
//! for smooth-curve rendering.
//!
//! Two algorithms are provided. The cardinal spline (Catmull-Rom family)
//! densifies the raw control points with a distance-adaptive sample count
//! per window. The hybrid spline first densifies with the cardinal spline
//! and then fits a natural cubic spline through the densified set,
//! re-sampled at a caller-supplied precision. Both replace the phenomenon's
//! items wholesale; clone first if the raw series is still needed.

use crate::derivation::error::DeriveError;
use crate::types::phenomenon::{Phenomenon, PhenomenonKind};
use crate::types::value_item::{PhenomenonValue, ValueItem};
use chrono::{DateTime, Utc};

/// Default cardinal-spline tension; 0.5 is the classic Catmull-Rom curve.
pub const DEFAULT_TENSION: f64 = 0.5;

/// Default steps per interval for hybrid-spline re-sampling.
pub const DEFAULT_PRECISION: usize = 4;

const MIN_WINDOW_SAMPLES: usize = 1;
const MAX_WINDOW_SAMPLES: usize = 4;

/// An (x, y) pair on the spline's working axes: x is time in epoch
/// milliseconds, y the phenomenon value. Never persisted.
#[derive(Debug, Clone, Copy, PartialEq)]
struct ControlPoint {
    x: f64,
    y: f64,
}

impl ControlPoint {
    fn distance(&self, other: &ControlPoint) -> f64 {
        ((other.x - self.x).powi(2) + (other.y - self.y).powi(2)).sqrt()
    }
}

/// Resamples a numeric phenomenon with a cardinal spline.
///
/// The control-point sequence is padded by duplicating the first and last
/// points; every window of 4 consecutive points is sampled at `N + 1`
/// uniform parameter values between the window's two inner points, where
/// `N` scales with the window's chord relative to the first window's chord,
/// clamped to `1..=4`. Consecutive duplicate output points are removed.
///
/// Exactly 2 source points short-circuit to the straight segment between
/// them: the output is exactly those two points.
///
/// # Errors
///
/// [`DeriveError::NotNumeric`] for symbol/text phenomena,
/// [`DeriveError::TooFewPoints`] for fewer than 2 points.
pub fn cardinal_spline(phenomenon: &mut Phenomenon, tension: f64) -> Result<(), DeriveError> {
    ensure_numeric(phenomenon)?;
    let points = control_points(phenomenon);
    if points.len() < 2 {
        return Err(DeriveError::TooFewPoints {
            name: phenomenon.name().to_string(),
            needed: 2,
            found: points.len(),
        });
    }

    let resampled = if points.len() == 2 {
        points
    } else {
        resample_cardinal(&points, tension)
    };
    write_back(phenomenon, &resampled);
    Ok(())
}

/// Resamples a numeric phenomenon with the hybrid spline: cardinal
/// densification followed by a natural cubic spline through the densified
/// set, evaluated at `precision` evenly spaced steps per interval.
///
/// # Errors
///
/// [`DeriveError::InvalidPrecision`] when `precision` is zero,
/// [`DeriveError::NotNumeric`] for symbol/text phenomena,
/// [`DeriveError::NotInstantaneous`] when any item spans an interval,
/// [`DeriveError::TooFewPoints`] for fewer than 3 points. These are hard
/// failures, never silently approximated; the assembly policy downgrades
/// them to a per-parameter omission.
pub fn hybrid_spline(
    phenomenon: &mut Phenomenon,
    tension: f64,
    precision: usize,
) -> Result<(), DeriveError> {
    if precision == 0 {
        return Err(DeriveError::InvalidPrecision);
    }
    ensure_numeric(phenomenon)?;
    ensure_instantaneous(phenomenon)?;

    let points = control_points(phenomenon);
    if points.len() <= 2 {
        return Err(DeriveError::TooFewPoints {
            name: phenomenon.name().to_string(),
            needed: 3,
            found: points.len(),
        });
    }

    let dense = resample_cardinal(&points, tension);
    // The natural spline needs strictly increasing knots; drop the rare
    // densified point that does not advance the time axis.
    let mut knots: Vec<ControlPoint> = Vec::with_capacity(dense.len());
    for point in dense {
        if knots.last().map_or(true, |prev| point.x > prev.x) {
            knots.push(point);
        }
    }
    if knots.len() < 3 {
        write_back(phenomenon, &knots);
        return Ok(());
    }

    let y2 = natural_second_derivatives(&knots);
    let mut out: Vec<ControlPoint> = Vec::with_capacity((knots.len() - 1) * precision + 1);
    for i in 0..knots.len() - 1 {
        let h = knots[i + 1].x - knots[i].x;
        for j in 0..precision {
            let x = knots[i].x + h * j as f64 / precision as f64;
            out.push(ControlPoint {
                x,
                y: eval_cubic(&knots, &y2, i, x),
            });
        }
    }
    out.push(knots[knots.len() - 1]);

    write_back(phenomenon, &out);
    Ok(())
}

fn ensure_numeric(phenomenon: &Phenomenon) -> Result<(), DeriveError> {
    if phenomenon.kind() != PhenomenonKind::Numeric {
        return Err(DeriveError::NotNumeric {
            name: phenomenon.name().to_string(),
        });
    }
    Ok(())
}

fn ensure_instantaneous(phenomenon: &Phenomenon) -> Result<(), DeriveError> {
    if phenomenon.items().iter().any(|item| !item.is_instant()) {
        return Err(DeriveError::NotInstantaneous {
            name: phenomenon.name().to_string(),
        });
    }
    Ok(())
}

fn control_points(phenomenon: &Phenomenon) -> Vec<ControlPoint> {
    phenomenon
        .items()
        .iter()
        .filter_map(|item| {
            item.value().as_number().map(|y| ControlPoint {
                x: item.time_from().timestamp_millis() as f64,
                y,
            })
        })
        .collect()
}

fn write_back(phenomenon: &mut Phenomenon, points: &[ControlPoint]) {
    let items = points
        .iter()
        .map(|point| ValueItem::instant(to_datetime(point.x), PhenomenonValue::Number(point.y)))
        .collect();
    phenomenon.replace_items(items);
}

fn to_datetime(x: f64) -> DateTime<Utc> {
    // Spline x values stay within the source time range, which is always
    // representable in epoch milliseconds.
    DateTime::from_timestamp_millis(x.round() as i64).unwrap_or(DateTime::<Utc>::MIN_UTC)
}

/// Core cardinal resampling over at least 3 control points.
fn resample_cardinal(points: &[ControlPoint], tension: f64) -> Vec<ControlPoint> {
    let mut padded = Vec::with_capacity(points.len() + 2);
    padded.push(points[0]);
    padded.extend_from_slice(points);
    padded.push(points[points.len() - 1]);

    let first_chord = padded[0].distance(&padded[3]);
    let mut out: Vec<ControlPoint> = Vec::new();
    for window in padded.windows(4) {
        let samples = window_samples(window[0].distance(&window[3]), first_chord);
        for j in 0..=samples {
            let u = j as f64 / samples as f64;
            let point = cardinal_point(window, u, tension);
            if out.last() != Some(&point) {
                out.push(point);
            }
        }
    }
    out
}

/// Distance-adaptive sample count: windows spanning a larger chord than the
/// first window get proportionally more samples, clamped to `1..=4`.
fn window_samples(chord: f64, first_chord: f64) -> usize {
    if first_chord <= 0.0 {
        return MIN_WINDOW_SAMPLES;
    }
    let n = (chord / first_chord).round() as i64;
    n.clamp(MIN_WINDOW_SAMPLES as i64, MAX_WINDOW_SAMPLES as i64) as usize
}

/// Evaluates the cardinal segment between `window[1]` and `window[2]` at
/// parameter `u ∈ [0, 1]` using the Hermite basis with tension-scaled
/// tangents.
fn cardinal_point(window: &[ControlPoint], u: f64, tension: f64) -> ControlPoint {
    let (p0, p1, p2, p3) = (window[0], window[1], window[2], window[3]);
    let u2 = u * u;
    let u3 = u2 * u;

    let h00 = 2.0 * u3 - 3.0 * u2 + 1.0;
    let h10 = u3 - 2.0 * u2 + u;
    let h01 = -2.0 * u3 + 3.0 * u2;
    let h11 = u3 - u2;

    let m1x = tension * (p2.x - p0.x);
    let m1y = tension * (p2.y - p0.y);
    let m2x = tension * (p3.x - p1.x);
    let m2y = tension * (p3.y - p1.y);

    ControlPoint {
        x: h00 * p1.x + h10 * m1x + h01 * p2.x + h11 * m2x,
        y: h00 * p1.y + h10 * m1y + h01 * p2.y + h11 * m2y,
    }
}

/// Second derivatives of the natural cubic spline through `knots`: zero at
/// both endpoints, interior values from the standard tridiagonal system
/// solved by unpivoted Gaussian forward elimination and back substitution.
fn natural_second_derivatives(knots: &[ControlPoint]) -> Vec<f64> {
    let n = knots.len();
    let mut y2 = vec![0.0; n];
    if n < 3 {
        return y2;
    }

    let m = n - 2;
    let mut sub = vec![0.0; m];
    let mut diag = vec![0.0; m];
    let mut sup = vec![0.0; m];
    let mut rhs = vec![0.0; m];
    for i in 0..m {
        let h0 = knots[i + 1].x - knots[i].x;
        let h1 = knots[i + 2].x - knots[i + 1].x;
        sub[i] = h0;
        diag[i] = 2.0 * (h0 + h1);
        sup[i] = h1;
        rhs[i] = 6.0
            * ((knots[i + 2].y - knots[i + 1].y) / h1 - (knots[i + 1].y - knots[i].y) / h0);
    }

    // Forward elimination.
    for i in 1..m {
        let w = sub[i] / diag[i - 1];
        diag[i] -= w * sup[i - 1];
        rhs[i] -= w * rhs[i - 1];
    }
    // Back substitution into the interior of y2.
    y2[m] = rhs[m - 1] / diag[m - 1];
    for i in (0..m - 1).rev() {
        y2[i + 1] = (rhs[i] - sup[i] * y2[i + 2]) / diag[i];
    }
    y2
}

/// Closed-form piecewise cubic evaluation on interval `i`.
fn eval_cubic(knots: &[ControlPoint], y2: &[f64], i: usize, x: f64) -> f64 {
    let (k0, k1) = (knots[i], knots[i + 1]);
    let h = k1.x - k0.x;
    let a = (k1.x - x) / h;
    let b = (x - k0.x) / h;
    a * k0.y + b * k1.y + ((a * a * a - a) * y2[i] + (b * b * b - b) * y2[i + 1]) * h * h / 6.0
}
