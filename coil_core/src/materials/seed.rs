//! Built-in seed records for bootstrapping an empty catalog.
//!
//! Flat data-sheet values (one flexivity, one modulus) are normalized to
//! the banded schema: a single band from -100°F up to the rated limit.

use once_cell::sync::Lazy;

use super::bimetal::{BimetalMaterial, FlexivityBand};

/// Flexivity tolerance assumed when a data sheet does not state one (%)
pub const DEFAULT_FLEXIVITY_TOLERANCE_PERCENT: f64 = 5.0;

/// Lowest temperature a seeded band covers (°F)
pub const SEED_BAND_MIN_TEMP_F: f64 = -100.0;

static SEED_MATERIALS: Lazy<Vec<BimetalMaterial>> = Lazy::new(|| {
    vec![
        flat_record("N/A", "GB14", 1000.0, 100.0, 26.0)
            .with_description("Good corrosion resistance in aqueous environments."),
    ]
});

/// Seed records in insertion order
pub fn seed_materials() -> &'static [BimetalMaterial] {
    &SEED_MATERIALS
}

/// Build a record from a flat data-sheet entry.
///
/// `flexivity_e7` is in units of 10⁻⁷ /°F and `modulus_mpsi` in 10⁶ psi,
/// the way both are tabulated.
fn flat_record(
    astm_type: &str,
    truflex_type: &str,
    max_temp_f: f64,
    flexivity_e7: f64,
    modulus_mpsi: f64,
) -> BimetalMaterial {
    let band = FlexivityBand {
        min_temp_f: SEED_BAND_MIN_TEMP_F,
        max_temp_f,
        base_value: flexivity_e7,
        multiplier: 1e-7,
        tolerance_percent: DEFAULT_FLEXIVITY_TOLERANCE_PERCENT,
    };
    BimetalMaterial::new(astm_type, max_temp_f, vec![band])
        .with_truflex_type(truflex_type)
        .with_modulus(modulus_mpsi, 1e6)
}
