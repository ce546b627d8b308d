//! # Helical Bimetal Coil Formulas
//!
//! Closed-form relations for a helically wound thermostatic bimetal strip.
//!
//! ## Notation
//!
//! - `A` = Angular sweep (degrees)
//! - `t` = Strip thickness (in)
//! - `w` = Strip width (in)
//! - `L` = Active length (in)
//! - `F` = Flexivity (1/°F)
//! - `ΔT` = Temperature change (°F)
//! - `E` = Modulus of elasticity (psi)
//! - `D` = Mean coil diameter (in)
//!
//! ## Units
//!
//! Torque outputs are in ounce-inches; the torque rate is ounce-inches per
//! degree of deflection. The numeric constants below already absorb those
//! unit conversions and must not be re-derived.
//!
//! None of these functions guard against a zero denominator; callers
//! validate `ΔT`, `F` and `D` first.

use std::f64::consts::PI;

/// Converts degrees of sweep and inch thickness into flexivity units
pub const SWEEP_CONSTANT: f64 = 67.0;

/// Thermal torque coefficient (oz-in, given in/psi/°F inputs)
pub const THERMAL_TORQUE_CONSTANT: f64 = 1.55;

/// Mechanical torque rate coefficient (oz-in per degree)
pub const TORQUE_RATE_CONSTANT: f64 = 0.0232;

/// Active length for a target sweep
///
/// # Formula
/// ```text
/// L = (A·t) / (67·F·ΔT)
/// ```
#[inline]
pub fn active_length(sweep: f64, thickness: f64, flexivity: f64, delta_t: f64) -> f64 {
    (sweep * thickness) / (SWEEP_CONSTANT * flexivity * delta_t)
}

/// Flexivity bounds `(F_min, F_max)` for a fractional tolerance
///
/// # Formula
/// ```text
/// F_min = F·(1 - tol)
/// F_max = F·(1 + tol)
/// ```
#[inline]
pub fn flexivity_bounds(flexivity: f64, tolerance_fraction: f64) -> (f64, f64) {
    (
        flexivity * (1.0 - tolerance_fraction),
        flexivity * (1.0 + tolerance_fraction),
    )
}

/// Worst-case active length envelope `(L_min, L_max)`
///
/// The longest strip pairs the thickest strip with the weakest flexivity;
/// the shortest pairs the thinnest strip with the strongest flexivity.
///
/// # Formula
/// ```text
/// L_max = (A·(t + Δt)) / (67·F_min·ΔT)
/// L_min = (A·(t - Δt)) / (67·F_max·ΔT)
/// ```
#[inline]
pub fn length_envelope(
    sweep: f64,
    thickness: f64,
    thickness_tol: f64,
    flexivity: f64,
    tolerance_fraction: f64,
    delta_t: f64,
) -> (f64, f64) {
    let (f_min, f_max) = flexivity_bounds(flexivity, tolerance_fraction);
    let min_length = active_length(sweep, thickness - thickness_tol, f_max, delta_t);
    let max_length = active_length(sweep, thickness + thickness_tol, f_min, delta_t);
    (min_length, max_length)
}

/// Mean coil diameter for a strip wound inside an outer diameter
///
/// # Formula
/// ```text
/// D = OD - t
/// ```
#[inline]
pub fn mean_diameter(outer_diameter: f64, thickness: f64) -> f64 {
    outer_diameter - thickness
}

/// Number of turns of length `L` at mean diameter `D`
///
/// # Formula
/// ```text
/// N = L / (π·D)
/// ```
#[inline]
pub fn turns(length: f64, mean_diameter: f64) -> f64 {
    length / (PI * mean_diameter)
}

/// Axial height of `N` turns of width `w` separated by `gap`
///
/// # Formula
/// ```text
/// H = N·(w + gap)
/// ```
///
/// With `gap = 0` this is the solid (turns touching) height.
#[inline]
pub fn stack_height(turns: f64, width: f64, gap: f64) -> f64 {
    turns * (width + gap)
}

/// Torque developed by a temperature change, coil restrained
///
/// # Formula
/// ```text
/// M = 1.55·E·F·ΔT·w·t²
/// ```
#[inline]
pub fn thermal_torque(modulus: f64, flexivity: f64, delta_t: f64, width: f64, thickness: f64) -> f64 {
    THERMAL_TORQUE_CONSTANT * modulus * flexivity * delta_t * width * thickness.powi(2)
}

/// Mechanical restoring torque per degree of deflection
///
/// # Formula
/// ```text
/// k = (0.0232·E·w·t³) / L
/// ```
#[inline]
pub fn torque_rate(modulus: f64, width: f64, thickness: f64, length: f64) -> f64 {
    (TORQUE_RATE_CONSTANT * modulus * width * thickness.powi(3)) / length
}
