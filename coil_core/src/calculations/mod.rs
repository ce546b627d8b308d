//! # Coil Calculations
//!
//! The coil engine lives in [`coil`]; this module runs it across a whole
//! material catalog and orders the results.
//!
//! Each calculation follows the pattern:
//!
//! - `CoilRequest` - Input parameters (JSON-serializable)
//! - `CoilOutcome` - Result or error message (JSON-serializable)
//! - `calculate(material, request) -> CoilOutcome` - Pure calculation function
//!
//! ## Catalog Scan
//!
//! [`evaluate_catalog`] validates the request once, sizes a coil for every
//! material, and returns successes by ascending target length followed by
//! failures in catalog order. A failing material never stops the scan; a
//! record that fails validation is reported as a failure without being
//! sized.

pub mod coil;

use serde::{Deserialize, Serialize};

use crate::errors::CalcResult;
use crate::materials::{material_label, BimetalMaterial, MaterialCatalog};

// Re-export commonly used types
pub use coil::{calculate, calculate_coil, CoilDesign, CoilOutcome, CoilRequest};

/// One material's outcome in a catalog scan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogEntry {
    pub astm_type: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub truflex_type: Option<String>,

    pub result: CoilOutcome,
}

impl CatalogEntry {
    fn evaluate(material: &BimetalMaterial, request: &CoilRequest) -> Self {
        // Hand-edited catalog files bypass upsert validation
        if let Err(e) = material.validate() {
            tracing::warn!(astm_type = %material.astm_type, "invalid material record: {}", e);
            return CatalogEntry::new(material, CoilOutcome::Failed { error: e.to_string() });
        }

        let result = calculate(material, request);

        match &result {
            CoilOutcome::Design(design) => {
                if design.sensitivity_warning {
                    tracing::warn!(
                        astm_type = %material.astm_type,
                        "{}..{}°F leaves the high-accuracy sensitivity range",
                        request.t1,
                        request.t2
                    );
                }
                tracing::debug!(
                    astm_type = %material.astm_type,
                    band = %design.applied_flexivity_range,
                    target_length = design.target_length,
                    "coil sized"
                );
            }
            CoilOutcome::Failed { error } => {
                tracing::debug!(astm_type = %material.astm_type, "skipped: {}", error);
            }
        }

        CatalogEntry::new(material, result)
    }

    fn new(material: &BimetalMaterial, result: CoilOutcome) -> Self {
        CatalogEntry {
            astm_type: material.astm_type.clone(),
            truflex_type: material.truflex_type.clone(),
            result,
        }
    }

    /// Material label, e.g. `"N/A (GB14)"`
    pub fn display_name(&self) -> String {
        material_label(&self.astm_type, self.truflex_type.as_deref())
    }
}

/// Size a coil with every material in the catalog.
///
/// # Returns
///
/// * `Ok(entries)` - Designs sorted by ascending `target_length` (ties keep
///   catalog order), then failures in catalog order
/// * `Err(CalcError::InvalidInput)` - The request itself is unusable
pub fn evaluate_catalog(catalog: &MaterialCatalog, request: &CoilRequest) -> CalcResult<Vec<CatalogEntry>> {
    request.validate()?;

    let (mut designs, failures): (Vec<CatalogEntry>, Vec<CatalogEntry>) = catalog
        .iter()
        .map(|material| CatalogEntry::evaluate(material, request))
        .partition(|entry| entry.result.is_design());

    designs.sort_by(|a, b| target_length(a).total_cmp(&target_length(b)));

    tracing::info!(
        materials = catalog.len(),
        designs = designs.len(),
        failures = failures.len(),
        "catalog evaluated"
    );

    designs.extend(failures);
    Ok(designs)
}

fn target_length(entry: &CatalogEntry) -> f64 {
    entry.result.design().map_or(f64::INFINITY, |d| d.target_length)
}

/// Only the successful designs from a scan, in scan order
pub fn viable_designs(entries: &[CatalogEntry]) -> Vec<&CoilDesign> {
    entries.iter().filter_map(|entry| entry.result.design()).collect()
}

/// Scan results packaged with the request that produced them.
///
/// ## JSON Example
///
/// ```json
/// {
///   "request": { "t1": 70.0, "t2": 300.0, "...": "..." },
///   "spanF": 230.0,
///   "designCount": 3,
///   "failureCount": 1,
///   "entries": [ { "astmType": "TM1", "result": { "targetLength": 5.84 } } ]
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogReport {
    pub request: CoilRequest,

    /// Temperature span t2 - t1 (°F)
    pub span_f: f64,

    pub design_count: usize,

    pub failure_count: usize,

    pub entries: Vec<CatalogEntry>,
}

impl CatalogReport {
    /// Evaluate the catalog and package the results
    pub fn build(catalog: &MaterialCatalog, request: &CoilRequest) -> CalcResult<Self> {
        let entries = evaluate_catalog(catalog, request)?;
        Ok(CatalogReport::from_entries(*request, entries))
    }

    pub fn from_entries(request: CoilRequest, entries: Vec<CatalogEntry>) -> Self {
        let design_count = entries.iter().filter(|e| e.result.is_design()).count();
        CatalogReport {
            request,
            span_f: request.delta_t(),
            design_count,
            failure_count: entries.len() - design_count,
            entries,
        }
    }

    /// Drop failed materials from the report
    pub fn viable_only(mut self) -> Self {
        self.entries.retain(|e| e.result.is_design());
        self.failure_count = 0;
        self
    }

    /// Shortest-strip design, if any material qualified
    pub fn best(&self) -> Option<&CoilDesign> {
        self.entries.first().and_then(|e| e.result.design())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::materials::FlexivityBand;

    fn material(astm: &str, max_temp_f: f64, base: f64) -> BimetalMaterial {
        BimetalMaterial::new(
            astm,
            max_temp_f,
            vec![FlexivityBand {
                min_temp_f: -100.0,
                max_temp_f,
                base_value: base,
                multiplier: 1e-7,
                tolerance_percent: 5.0,
            }],
        )
    }

    fn request() -> CoilRequest {
        CoilRequest {
            t1: 70.0,
            t2: 300.0,
            sweep: 270.0,
            thickness: 0.012,
            thick_tol: 0.0005,
            max_od: 0.75,
            width: 0.2,
            gap: 0.01,
        }
    }

    fn catalog() -> MaterialCatalog {
        vec![
            material("LOW", 250.0, 150.0),
            material("TM1", 550.0, 100.0),
            material("TM2", 500.0, 205.0),
            material("TM5", 700.0, 150.0),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn test_designs_sorted_then_failures() {
        let entries = evaluate_catalog(&catalog(), &request()).unwrap();
        let order: Vec<&str> = entries.iter().map(|e| e.astm_type.as_str()).collect();
        // Highest flexivity needs the shortest strip
        assert_eq!(order, vec!["TM2", "TM5", "TM1", "LOW"]);

        assert!(entries[3].result.error().unwrap().contains("250°F"));
        assert_eq!(viable_designs(&entries).len(), 3);
    }

    #[test]
    fn test_ties_keep_catalog_order() {
        let catalog: MaterialCatalog = vec![
            material("B", 600.0, 150.0),
            material("A", 600.0, 150.0),
        ]
        .into_iter()
        .collect();
        let entries = evaluate_catalog(&catalog, &request()).unwrap();
        assert_eq!(entries[0].astm_type, "B");
        assert_eq!(entries[1].astm_type, "A");
    }

    #[test]
    fn test_invalid_request_rejected_before_scan() {
        let bad = CoilRequest { t2: 70.0, ..request() };
        let err = evaluate_catalog(&catalog(), &bad).unwrap_err();
        assert_eq!(err.error_code(), "INVALID_INPUT");
    }

    #[test]
    fn test_invalid_record_reported_as_failure() {
        let mut zero_flex = material("ZF", 600.0, 150.0);
        zero_flex.flexivities[0].base_value = 0.0;
        let catalog: MaterialCatalog = vec![zero_flex, material("TM1", 550.0, 100.0)].into_iter().collect();

        let report = CatalogReport::build(&catalog, &request()).unwrap();
        assert_eq!(report.design_count, 1);
        assert_eq!(report.failure_count, 1);
        assert_eq!(report.entries[0].astm_type, "TM1");
        assert_eq!(report.entries[1].astm_type, "ZF");
        assert!(report.entries[1].result.error().unwrap().contains("Flexivity must be positive"));
        assert!(report.entries.iter().filter_map(|e| e.result.design()).all(|d| d.max_length.is_finite()));
    }

    #[test]
    fn test_entry_display_name() {
        let seeded = CatalogEntry::new(
            &material("N/A", 600.0, 100.0).with_truflex_type("GB14"),
            CoilOutcome::Failed { error: String::new() },
        );
        assert_eq!(seeded.display_name(), "N/A (GB14)");
    }

    #[test]
    fn test_empty_catalog() {
        let entries = evaluate_catalog(&MaterialCatalog::new(), &request()).unwrap();
        assert!(entries.is_empty());
    }

    #[test]
    fn test_report_counts() {
        let report = CatalogReport::build(&catalog(), &request()).unwrap();
        assert_eq!(report.span_f, 230.0);
        assert_eq!(report.design_count, 3);
        assert_eq!(report.failure_count, 1);
        assert_eq!(report.best().unwrap().astm_type, "TM2");

        let viable = report.viable_only();
        assert_eq!(viable.entries.len(), 3);
        assert_eq!(viable.failure_count, 0);
    }

    #[test]
    fn test_report_json() {
        let report = CatalogReport::build(&catalog(), &request()).unwrap();
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["designCount"], 3);
        assert_eq!(json["entries"][0]["astmType"], "TM2");
        assert!(json["entries"][0]["result"]["targetLength"].is_number());
        assert!(json["entries"][3]["result"]["error"].is_string());
    }
}
