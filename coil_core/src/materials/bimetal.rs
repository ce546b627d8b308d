//! Thermostatic bimetal material records.
//!
//! Field names serialize in camelCase so a catalog file reads the same as
//! the `materials.json` documents the catalog has always been stored in.

use serde::{Deserialize, Serialize};

use crate::errors::{CalcError, CalcResult};

/// A coefficient stored as `base_value × multiplier`, the way data sheets
/// print it (e.g. flexivity `138 × 10⁻⁷`, modulus `25.0 × 10⁶ psi`).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScaledValue {
    pub base_value: f64,
    pub multiplier: f64,
}

impl ScaledValue {
    pub fn new(base_value: f64, multiplier: f64) -> Self {
        ScaledValue { base_value, multiplier }
    }

    /// The coefficient as a plain number
    pub fn value(&self) -> f64 {
        self.base_value * self.multiplier
    }
}

/// Flexivity coefficient valid over one temperature band.
///
/// ## JSON Example
///
/// ```json
/// {
///   "minTempF": 0,
///   "maxTempF": 300,
///   "baseValue": 150,
///   "multiplier": 1e-7,
///   "tolerancePercent": 5
/// }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlexivityBand {
    /// Lower edge of the band (°F)
    pub min_temp_f: f64,
    /// Upper edge of the band (°F)
    pub max_temp_f: f64,
    /// Flexivity mantissa as printed on the data sheet
    pub base_value: f64,
    /// Scale applied to `base_value` (typically 1e-7)
    pub multiplier: f64,
    /// Manufacturing tolerance on flexivity, in percent
    pub tolerance_percent: f64,
}

impl FlexivityBand {
    /// Effective flexivity F = base × multiplier
    pub fn flexivity(&self) -> f64 {
        self.base_value * self.multiplier
    }

    /// Tolerance as a fraction (5% → 0.05)
    pub fn tolerance_fraction(&self) -> f64 {
        self.tolerance_percent / 100.0
    }

    /// True when the whole interval `[t1, t2]` sits inside this band
    pub fn covers(&self, t1: f64, t2: f64) -> bool {
        t1 >= self.min_temp_f && t2 <= self.max_temp_f
    }

    /// True when the two bands share at least one temperature
    pub fn overlaps(&self, other: &FlexivityBand) -> bool {
        self.min_temp_f <= other.max_temp_f && other.min_temp_f <= self.max_temp_f
    }

    /// Human-readable band description, e.g. `"-100°F to 600°F"`
    pub fn range_label(&self) -> String {
        format!("{}°F to {}°F", self.min_temp_f, self.max_temp_f)
    }
}

/// `"ASTM (trade)"`, or the bare ASTM type without a trade name
pub fn material_label(astm_type: &str, truflex_type: Option<&str>) -> String {
    match truflex_type {
        Some(trade) => format!("{} ({})", astm_type, trade),
        None => astm_type.to_string(),
    }
}

/// One bimetal alloy pairing as stored in the material catalog.
///
/// ## JSON Example
///
/// ```json
/// {
///   "astmType": "TM2",
///   "truflexType": "P675R",
///   "maxRecommendedTempF": 500,
///   "flexivities": [
///     { "minTempF": 0, "maxTempF": 300, "baseValue": 205,
///       "multiplier": 1e-7, "tolerancePercent": 5 }
///   ],
///   "modulusOfElasticityPsi": { "baseValue": 20.0, "multiplier": 1e6 },
///   "maxSensitivityRangeF": [0, 300]
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BimetalMaterial {
    /// ASTM B388 type designation, the catalog key
    pub astm_type: String,

    /// Manufacturer trade designation, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub truflex_type: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Highest recommended service temperature (°F)
    pub max_recommended_temp_f: f64,

    /// Flexivity bands in priority order; the first covering band is used
    pub flexivities: Vec<FlexivityBand>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub modulus_of_elasticity_psi: Option<ScaledValue>,

    /// Interval of highest sensitivity `[low, high]` (°F). Only a
    /// two-element list is meaningful; anything else is ignored.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_sensitivity_range_f: Option<Vec<f64>>,
}

impl BimetalMaterial {
    /// Create a material with no modulus and no sensitivity range
    pub fn new(astm_type: impl Into<String>, max_recommended_temp_f: f64, flexivities: Vec<FlexivityBand>) -> Self {
        BimetalMaterial {
            astm_type: astm_type.into(),
            truflex_type: None,
            description: None,
            max_recommended_temp_f,
            flexivities,
            modulus_of_elasticity_psi: None,
            max_sensitivity_range_f: None,
        }
    }

    pub fn with_modulus(mut self, base_value: f64, multiplier: f64) -> Self {
        self.modulus_of_elasticity_psi = Some(ScaledValue::new(base_value, multiplier));
        self
    }

    pub fn with_sensitivity_range(mut self, low_f: f64, high_f: f64) -> Self {
        self.max_sensitivity_range_f = Some(vec![low_f, high_f]);
        self
    }

    pub fn with_truflex_type(mut self, truflex_type: impl Into<String>) -> Self {
        self.truflex_type = Some(truflex_type.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Display name: ASTM type, followed by the trade name in parentheses
    /// when one is recorded
    pub fn display_name(&self) -> String {
        material_label(&self.astm_type, self.truflex_type.as_deref())
    }

    /// Case-insensitive match on the catalog key
    pub fn matches_key(&self, astm_type: &str) -> bool {
        self.astm_type.to_lowercase() == astm_type.to_lowercase()
    }

    /// First band, in catalog order, covering `[t1, t2]`.
    ///
    /// Overlapping bands are resolved purely by order.
    pub fn select_flexivity(&self, t1: f64, t2: f64) -> Option<&FlexivityBand> {
        self.flexivities.iter().find(|band| band.covers(t1, t2))
    }

    /// Modulus of elasticity E (psi), or 0 when none is recorded.
    ///
    /// A zero base value counts as "not recorded".
    pub fn modulus_psi(&self) -> f64 {
        match self.modulus_of_elasticity_psi {
            Some(modulus) if modulus.base_value != 0.0 => modulus.value(),
            _ => 0.0,
        }
    }

    /// The `[low, high]` sensitivity interval, if exactly two values are recorded
    pub fn sensitivity_range(&self) -> Option<(f64, f64)> {
        match self.max_sensitivity_range_f.as_deref() {
            Some([low, high]) => Some((*low, *high)),
            _ => None,
        }
    }

    /// True when `[t1, t2]` leaves the high-accuracy sensitivity interval
    pub fn outside_sensitivity_range(&self, t1: f64, t2: f64) -> bool {
        match self.sensitivity_range() {
            Some((low, high)) => t1 < low || t2 > high,
            None => false,
        }
    }

    /// Index pairs of bands that share temperatures
    pub fn overlapping_bands(&self) -> Vec<(usize, usize)> {
        let mut pairs = Vec::new();
        for (i, a) in self.flexivities.iter().enumerate() {
            for (j, b) in self.flexivities.iter().enumerate().skip(i + 1) {
                if a.overlaps(b) {
                    pairs.push((i, j));
                }
            }
        }
        pairs
    }

    /// Validate a record before it enters the catalog.
    ///
    /// Overlapping bands are legal (first match wins) and are only logged.
    pub fn validate(&self) -> CalcResult<()> {
        if self.astm_type.trim().is_empty() {
            return Err(CalcError::missing_field("astmType"));
        }
        if !self.max_recommended_temp_f.is_finite() {
            return Err(CalcError::invalid_input(
                "maxRecommendedTempF",
                self.max_recommended_temp_f.to_string(),
                "Temperature limit must be a finite number",
            ));
        }
        if self.flexivities.is_empty() {
            return Err(CalcError::invalid_input(
                "flexivities",
                "[]",
                format!("{} needs at least one flexivity band", self.astm_type),
            ));
        }
        for (i, band) in self.flexivities.iter().enumerate() {
            let field = format!("flexivities[{}]", i);
            if band.min_temp_f > band.max_temp_f {
                return Err(CalcError::invalid_input(
                    field,
                    band.range_label(),
                    "Band minimum is above its maximum",
                ));
            }
            if !(band.flexivity() > 0.0) || !band.flexivity().is_finite() {
                return Err(CalcError::invalid_input(
                    field,
                    band.flexivity().to_string(),
                    "Flexivity must be positive",
                ));
            }
            // At 100% or more the lower flexivity bound reaches zero
            if !(band.tolerance_percent >= 0.0 && band.tolerance_percent < 100.0) {
                return Err(CalcError::invalid_input(
                    field,
                    band.tolerance_percent.to_string(),
                    "Tolerance percent must be at least 0 and below 100",
                ));
            }
        }
        if let Some(modulus) = self.modulus_of_elasticity_psi {
            if !(modulus.value() >= 0.0) {
                return Err(CalcError::invalid_input(
                    "modulusOfElasticityPsi",
                    modulus.value().to_string(),
                    "Modulus cannot be negative",
                ));
            }
        }
        if let Some((low, high)) = self.sensitivity_range() {
            if low > high {
                return Err(CalcError::invalid_input(
                    "maxSensitivityRangeF",
                    format!("[{}, {}]", low, high),
                    "Sensitivity range must be [low, high]",
                ));
            }
        }

        for (i, j) in self.overlapping_bands() {
            tracing::warn!(
                astm_type = %self.astm_type,
                "flexivity bands {} ({}) and {} ({}) overlap; band {} takes precedence",
                i,
                self.flexivities[i].range_label(),
                j,
                self.flexivities[j].range_label(),
                i
            );
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn band(min: f64, max: f64, base: f64) -> FlexivityBand {
        FlexivityBand {
            min_temp_f: min,
            max_temp_f: max,
            base_value: base,
            multiplier: 1e-7,
            tolerance_percent: 5.0,
        }
    }

    #[test]
    fn test_first_covering_band_wins() {
        let mat = BimetalMaterial::new(
            "TM1",
            550.0,
            vec![band(0.0, 200.0, 150.0), band(-100.0, 550.0, 140.0)],
        );

        let narrow = mat.select_flexivity(50.0, 150.0).unwrap();
        assert_eq!(narrow.base_value, 150.0);

        // Narrow band does not cover 250, falls through to the wide one
        let wide = mat.select_flexivity(50.0, 250.0).unwrap();
        assert_eq!(wide.base_value, 140.0);

        assert!(mat.select_flexivity(-200.0, 100.0).is_none());
    }

    #[test]
    fn test_band_edges_are_inclusive() {
        let b = band(-100.0, 600.0, 100.0);
        assert!(b.covers(-100.0, 600.0));
        assert!(!b.covers(-100.1, 600.0));
        assert!(!b.covers(-100.0, 600.1));
    }

    #[test]
    fn test_range_label_formats_like_whole_numbers() {
        assert_eq!(band(-100.0, 600.0, 1.0).range_label(), "-100°F to 600°F");
        assert_eq!(band(32.5, 212.0, 1.0).range_label(), "32.5°F to 212°F");
    }

    #[test]
    fn test_modulus_absent_or_zero_reads_as_zero() {
        let mat = BimetalMaterial::new("TM1", 550.0, vec![band(0.0, 550.0, 150.0)]);
        assert_eq!(mat.modulus_psi(), 0.0);

        let zero = mat.clone().with_modulus(0.0, 1e6);
        assert_eq!(zero.modulus_psi(), 0.0);

        let real = mat.with_modulus(25.0, 1e6);
        assert!((real.modulus_psi() - 25.0e6).abs() < 1e-6);
    }

    #[test]
    fn test_sensitivity_range_requires_two_values() {
        let mut mat = BimetalMaterial::new("TM1", 550.0, vec![band(0.0, 550.0, 150.0)]);
        assert!(!mat.outside_sensitivity_range(-50.0, 500.0));

        mat.max_sensitivity_range_f = Some(vec![0.0]);
        assert!(!mat.outside_sensitivity_range(-50.0, 500.0));

        let mat = mat.with_sensitivity_range(0.0, 300.0);
        assert!(!mat.outside_sensitivity_range(0.0, 300.0));
        assert!(mat.outside_sensitivity_range(-1.0, 200.0));
        assert!(mat.outside_sensitivity_range(10.0, 301.0));
    }

    #[test]
    fn test_overlapping_bands_detected() {
        let mat = BimetalMaterial::new(
            "TM1",
            550.0,
            vec![band(0.0, 200.0, 150.0), band(200.0, 400.0, 140.0), band(500.0, 550.0, 130.0)],
        );
        assert_eq!(mat.overlapping_bands(), vec![(0, 1)]);
        // Overlap is allowed
        assert!(mat.validate().is_ok());
    }

    #[test]
    fn test_validation_rejects_bad_records() {
        let empty = BimetalMaterial::new("TM1", 550.0, vec![]);
        assert!(empty.validate().is_err());

        let unnamed = BimetalMaterial::new("  ", 550.0, vec![band(0.0, 100.0, 150.0)]);
        assert_eq!(unnamed.validate().unwrap_err().error_code(), "MISSING_FIELD");

        let inverted = BimetalMaterial::new("TM1", 550.0, vec![band(300.0, 100.0, 150.0)]);
        assert!(inverted.validate().is_err());

        let zero_flex = BimetalMaterial::new("TM1", 550.0, vec![band(0.0, 100.0, 0.0)]);
        assert!(zero_flex.validate().is_err());

        for tolerance in [-1.0, 100.0, 150.0, f64::NAN] {
            let mut loose = band(0.0, 100.0, 150.0);
            loose.tolerance_percent = tolerance;
            let err = BimetalMaterial::new("TM1", 550.0, vec![loose]).validate().unwrap_err();
            assert_eq!(err.error_code(), "INVALID_INPUT");
        }

        let mut wide = band(0.0, 100.0, 150.0);
        wide.tolerance_percent = 99.0;
        assert!(BimetalMaterial::new("TM1", 550.0, vec![wide]).validate().is_ok());

        let backwards = BimetalMaterial::new("TM1", 550.0, vec![band(0.0, 100.0, 150.0)])
            .with_sensitivity_range(300.0, 0.0);
        assert!(backwards.validate().is_err());
    }

    #[test]
    fn test_display_name() {
        let mat = BimetalMaterial::new("TM1", 550.0, vec![band(0.0, 550.0, 150.0)]);
        assert_eq!(mat.display_name(), "TM1");
        assert_eq!(mat.with_truflex_type("B1").display_name(), "TM1 (B1)");
    }

    #[test]
    fn test_json_uses_catalog_field_names() {
        let json = r#"{
            "astmType": "TM2",
            "maxRecommendedTempF": 500,
            "flexivities": [
                { "minTempF": 0, "maxTempF": 300, "baseValue": 205,
                  "multiplier": 1e-7, "tolerancePercent": 5 }
            ],
            "modulusOfElasticityPsi": { "baseValue": 20.0, "multiplier": 1000000 },
            "maxSensitivityRangeF": [0, 300],
            "notes": "ignored"
        }"#;
        let mat: BimetalMaterial = serde_json::from_str(json).unwrap();
        assert_eq!(mat.astm_type, "TM2");
        assert_eq!(mat.flexivities[0].max_temp_f, 300.0);
        assert_eq!(mat.sensitivity_range(), Some((0.0, 300.0)));
        assert!((mat.modulus_psi() - 20.0e6).abs() < 1e-6);

        let out = serde_json::to_value(&mat).unwrap();
        assert!(out.get("maxRecommendedTempF").is_some());
        assert!(out.get("truflexType").is_none());
    }
}
