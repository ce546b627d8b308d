//! # Coil Equations
//!
//! The fundamental bimetal relations used by the coil engine, kept in one
//! place so each can be checked against the data-sheet formulas on its own.
//!
//! ## Modules
//!
//! - [`coil`] - Active length, tolerance envelope, helix geometry, torque
//!
//! ## Conventions
//!
//! - Temperatures in °F, lengths in inches, modulus in psi
//! - Sweep in angular degrees
//! - Torque in ounce-inches

pub mod coil;

pub use coil::{
    active_length,
    flexivity_bounds,
    length_envelope,
    mean_diameter,
    stack_height,
    thermal_torque,
    torque_rate,
    turns,
    SWEEP_CONSTANT,
    THERMAL_TORQUE_CONSTANT,
    TORQUE_RATE_CONSTANT,
};
