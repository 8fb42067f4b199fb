//! Air-data conversions used by the flight-regime summaries.
//!
//! All functions are pure and operate on raw sensor units: pressures in
//! lbf/ft^2, angles in radians. Element-wise conversions over whole sample
//! sequences are parallelized using Rayon.

use rayon::prelude::*;

/// Differential-to-static pressure ratio at exactly Mach 1. Above this the
/// subsonic compressible-flow relation no longer applies.
const SUPERSONIC_QC_PA: f64 = 0.89293;

/// Interval width at which the supersonic bisection stops.
const SUPERSONIC_EPS: f64 = 1e-10;

/// Mach number from one differential-to-static pressure ratio sample.
///
/// The ratio is `(total - static) / static`; its sign is ignored. Below the
/// sonic threshold the subsonic compressible-flow relation applies directly.
/// Above it, the Rayleigh pitot relation is solved for Mach by bisection on
/// the bracket [0.8, 3.0].
pub fn mach_from_pressure_ratio(qc_over_pa: f64) -> f64 {
    let ratio = qc_over_pa.abs();
    if ratio > SUPERSONIC_QC_PA {
        solve_supersonic(ratio)
    } else {
        (5.0 * ((ratio + 1.0).powf(2.0 / 7.0) - 1.0)).sqrt()
    }
}

/// Solves `m = 0.881284 * sqrt((ratio + 1) * (1 - 1/(7 m^2))^2.5)` for m.
///
/// The bracket [0.8, 3.0] spans the supersonic handoff up to Mach 3; ratios
/// beyond the bracket clamp to its upper end.
fn solve_supersonic(ratio: f64) -> f64 {
    let residual =
        |m: f64| m - 0.881284 * ((ratio + 1.0) * (1.0 - 1.0 / (7.0 * m * m)).powf(2.5)).sqrt();

    let (mut lo, mut hi) = (0.8_f64, 3.0_f64);
    if residual(hi) <= 0.0 {
        return hi;
    }

    while hi - lo > SUPERSONIC_EPS {
        let mid = 0.5 * (lo + hi);
        if residual(mid) < 0.0 {
            lo = mid;
        } else {
            hi = mid;
        }
    }

    0.5 * (lo + hi)
}

/// Per-sample Mach number from aligned total/static pressure sequences.
///
/// # Arguments
///
/// * `total_pressure` - Total (pitot) pressure samples
/// * `static_pressure` - Static pressure samples, sample-aligned with the
///   total pressure
///
/// # Returns
///
/// One Mach value per sample. Callers validate alignment before calling.
pub fn speed_metric(total_pressure: &[f64], static_pressure: &[f64]) -> Vec<f64> {
    debug_assert_eq!(
        total_pressure.len(),
        static_pressure.len(),
        "pressure sequences must be sample-aligned"
    );

    total_pressure
        .par_iter()
        .zip(static_pressure.par_iter())
        .map(|(&qt, &ps)| mach_from_pressure_ratio((qt - ps) / ps))
        .collect()
}

/// Converts a sequence of angles from radians to degrees.
pub fn degrees_from_radians(radians: &[f64]) -> Vec<f64> {
    radians.par_iter().map(|r| r.to_degrees()).collect()
}
