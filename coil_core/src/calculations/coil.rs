//! # Coil Calculation
//!
//! Sizes a helical bimetal coil for one material: active strip length with
//! its tolerance envelope, helix geometry, and torque.
//!
//! ## Pipeline
//!
//! 1. Reject `t2` above the material's rated temperature
//! 2. Select the first flexivity band covering `[t1, t2]`
//! 3. Flag intervals outside the high-accuracy sensitivity range
//! 4. Length: nominal, minimum, maximum
//! 5. Geometry: mean diameter, turns, solid and finished height
//! 6. Torque: thermal torque and torque rate (zero without a modulus)
//!
//! Steps 1 and 2 are the only ways a material can fail, and the failure is
//! returned as a value. [`calculate_coil`] does no input validation of its
//! own; a zero temperature span yields non-finite lengths exactly as the
//! formulas dictate. Use [`CoilRequest::validate`] (as
//! [`super::evaluate_catalog`] does) to rule that out up front.
//!
//! ## Example
//!
//! ```rust
//! use coil_core::calculations::coil::{calculate, CoilOutcome, CoilRequest};
//! use coil_core::materials::{BimetalMaterial, FlexivityBand};
//!
//! let material = BimetalMaterial::new(
//!     "TM1",
//!     600.0,
//!     vec![FlexivityBand {
//!         min_temp_f: -100.0,
//!         max_temp_f: 600.0,
//!         base_value: 10.0,
//!         multiplier: 1e-6,
//!         tolerance_percent: 5.0,
//!     }],
//! );
//!
//! let request = CoilRequest {
//!     t1: 70.0,
//!     t2: 300.0,
//!     sweep: 90.0,
//!     thickness: 0.01,
//!     thick_tol: 0.001,
//!     max_od: 1.0,
//!     width: 0.25,
//!     gap: 0.005,
//! };
//!
//! match calculate(&material, &request) {
//!     CoilOutcome::Design(design) => assert_eq!(design.applied_flexivity_range, "-100°F to 600°F"),
//!     CoilOutcome::Failed { error } => panic!("{}", error),
//! }
//! ```

use serde::{Deserialize, Serialize};

use crate::equations::coil as eq;
use crate::errors::{CalcError, CalcResult, CoilError};
use crate::materials::BimetalMaterial;

/// Design targets for a coil.
///
/// ## JSON Example
///
/// ```json
/// {
///   "t1": 70.0,
///   "t2": 300.0,
///   "sweep": 90.0,
///   "thickness": 0.01,
///   "thickTol": 0.001,
///   "maxOD": 1.0,
///   "width": 0.25,
///   "gap": 0.005
/// }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CoilRequest {
    /// Low end of the operating range (°F)
    pub t1: f64,

    /// High end of the operating range (°F)
    pub t2: f64,

    /// Angular deflection over the range (degrees)
    pub sweep: f64,

    /// Strip thickness (in)
    pub thickness: f64,

    /// Thickness tolerance, ± (in)
    pub thick_tol: f64,

    /// Maximum outside diameter of the coil (in)
    #[serde(rename = "maxOD")]
    pub max_od: f64,

    /// Strip width (in)
    pub width: f64,

    /// Axial gap between turns (in)
    pub gap: f64,
}

impl CoilRequest {
    /// Temperature span ΔT = t2 - t1 (°F)
    pub fn delta_t(&self) -> f64 {
        self.t2 - self.t1
    }

    /// Validate input parameters.
    ///
    /// Rules out every input that would make the coil formulas divide by
    /// zero or produce a negative length.
    pub fn validate(&self) -> CalcResult<()> {
        let fields = [
            ("t1", self.t1),
            ("t2", self.t2),
            ("sweep", self.sweep),
            ("thickness", self.thickness),
            ("thickTol", self.thick_tol),
            ("maxOD", self.max_od),
            ("width", self.width),
            ("gap", self.gap),
        ];
        for (field, value) in fields {
            if !value.is_finite() {
                return Err(CalcError::invalid_input(field, value.to_string(), "Value must be a finite number"));
            }
        }

        if self.t2 <= self.t1 {
            return Err(CalcError::invalid_input(
                "t2",
                self.t2.to_string(),
                format!("Max temperature must be above min temperature ({}°F)", self.t1),
            ));
        }
        if self.sweep <= 0.0 {
            return Err(CalcError::invalid_input(
                "sweep",
                self.sweep.to_string(),
                "Sweep must be positive",
            ));
        }
        if self.thickness <= 0.0 {
            return Err(CalcError::invalid_input(
                "thickness",
                self.thickness.to_string(),
                "Thickness must be positive",
            ));
        }
        if self.thick_tol < 0.0 || self.thick_tol >= self.thickness {
            return Err(CalcError::invalid_input(
                "thickTol",
                self.thick_tol.to_string(),
                "Thickness tolerance must be at least 0 and less than the thickness",
            ));
        }
        if self.max_od <= self.thickness {
            return Err(CalcError::invalid_input(
                "maxOD",
                self.max_od.to_string(),
                "Outside diameter must exceed the strip thickness",
            ));
        }
        if self.width <= 0.0 {
            return Err(CalcError::invalid_input(
                "width",
                self.width.to_string(),
                "Width must be positive",
            ));
        }
        if self.gap < 0.0 {
            return Err(CalcError::invalid_input(
                "gap",
                self.gap.to_string(),
                "Gap cannot be negative",
            ));
        }
        Ok(())
    }
}

/// A sized coil for one material.
///
/// ## JSON Example
///
/// ```json
/// {
///   "astmType": "TM1",
///   "targetLength": 5.840,
///   "minLength": 5.006,
///   "maxLength": 6.762,
///   "meanDiameter": 0.99,
///   "targetTurns": 1.878,
///   "solidAxialLength": 0.469,
///   "coilHeight": 0.479,
///   "thermalTorque": 0.0,
///   "mechTorqueRate": 0.0,
///   "sensitivityWarning": false,
///   "appliedFlexivityRange": "-100°F to 600°F"
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CoilDesign {
    pub astm_type: String,

    /// Nominal active length (in)
    pub target_length: f64,

    /// Shortest length in the tolerance envelope (in)
    pub min_length: f64,

    /// Longest length in the tolerance envelope (in)
    pub max_length: f64,

    /// Mean coil diameter, OD minus one thickness (in)
    pub mean_diameter: f64,

    /// Number of turns at the nominal length
    pub target_turns: f64,

    /// Height with turns touching (in)
    pub solid_axial_length: f64,

    /// Finished height including the inter-turn gap (in)
    pub coil_height: f64,

    /// Torque from the full temperature change, coil restrained (oz-in)
    pub thermal_torque: f64,

    /// Restoring torque per degree of deflection (oz-in/deg)
    pub mech_torque_rate: f64,

    /// Interval leaves the material's high-accuracy sensitivity range
    pub sensitivity_warning: bool,

    /// The flexivity band that was applied, e.g. "-100°F to 600°F"
    pub applied_flexivity_range: String,
}

impl CoilDesign {
    /// Spread of the tolerance envelope, max minus min (in)
    pub fn length_spread(&self) -> f64 {
        self.max_length - self.min_length
    }
}

/// Per-material outcome: a sized coil, or the reason there is none.
///
/// Serializes untagged, so a failure is exactly `{"error": "<message>"}` and
/// a success is the bare [`CoilDesign`] record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CoilOutcome {
    Design(CoilDesign),
    Failed { error: String },
}

impl CoilOutcome {
    pub fn design(&self) -> Option<&CoilDesign> {
        match self {
            CoilOutcome::Design(design) => Some(design),
            CoilOutcome::Failed { .. } => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            CoilOutcome::Design(_) => None,
            CoilOutcome::Failed { error } => Some(error),
        }
    }

    pub fn is_design(&self) -> bool {
        matches!(self, CoilOutcome::Design(_))
    }
}

impl From<Result<CoilDesign, CoilError>> for CoilOutcome {
    fn from(result: Result<CoilDesign, CoilError>) -> Self {
        match result {
            Ok(design) => CoilOutcome::Design(design),
            Err(err) => CoilOutcome::Failed {
                error: err.to_string(),
            },
        }
    }
}

/// Size a coil for one material, keeping the typed failure reason.
pub fn calculate_coil(material: &BimetalMaterial, request: &CoilRequest) -> Result<CoilDesign, CoilError> {
    if request.t2 > material.max_recommended_temp_f {
        return Err(CoilError::TempExceedsMaterialLimit {
            limit_f: material.max_recommended_temp_f,
        });
    }

    let band = material
        .select_flexivity(request.t1, request.t2)
        .ok_or(CoilError::NoFlexivityData)?;

    let sensitivity_warning = material.outside_sensitivity_range(request.t1, request.t2);

    let flexivity = band.flexivity();
    let modulus = material.modulus_psi();
    let delta_t = request.delta_t();

    // Length and tolerance envelope
    let target_length = eq::active_length(request.sweep, request.thickness, flexivity, delta_t);
    let (min_length, max_length) = eq::length_envelope(
        request.sweep,
        request.thickness,
        request.thick_tol,
        flexivity,
        band.tolerance_fraction(),
        delta_t,
    );

    // Helix; both heights come from the same turn count
    let mean_diameter = eq::mean_diameter(request.max_od, request.thickness);
    let target_turns = eq::turns(target_length, mean_diameter);
    let solid_axial_length = eq::stack_height(target_turns, request.width, 0.0);
    let coil_height = eq::stack_height(target_turns, request.width, request.gap);

    let (thermal_torque, mech_torque_rate) = if modulus > 0.0 {
        (
            eq::thermal_torque(modulus, flexivity, delta_t, request.width, request.thickness),
            eq::torque_rate(modulus, request.width, request.thickness, target_length),
        )
    } else {
        (0.0, 0.0)
    };

    Ok(CoilDesign {
        astm_type: material.astm_type.clone(),
        target_length,
        min_length,
        max_length,
        mean_diameter,
        target_turns,
        solid_axial_length,
        coil_height,
        thermal_torque,
        mech_torque_rate,
        sensitivity_warning,
        applied_flexivity_range: band.range_label(),
    })
}

/// Size a coil for one material.
///
/// Never fails: an ineligible material comes back as
/// [`CoilOutcome::Failed`] with a human-readable message.
pub fn calculate(material: &BimetalMaterial, request: &CoilRequest) -> CoilOutcome {
    calculate_coil(material, request).into()
}
