//! Plain-text tables for terminal output.

use coil_core::calculations::{CatalogReport, CoilOutcome};
use coil_core::materials::MaterialCatalog;

/// Render a catalog scan as a fixed-width table.
///
/// Lengths use `precision` decimals; torques get three more, since they
/// are small numbers in oz-in.
pub fn coil_table(report: &CatalogReport, precision: usize) -> String {
    let p = precision;
    let tp = precision + 3;
    let mut out = String::new();

    out.push_str(&format!(
        "Span: {}°F ({}°F to {}°F), sweep {}°\n\n",
        report.span_f, report.request.t1, report.request.t2, report.request.sweep
    ));
    out.push_str(&format!(
        "{:<16} {:>10} {:>10} {:>10} {:>8} {:>8} {:>8} {:>11} {:>11}  {}\n",
        "Material", "Length", "Min", "Max", "Turns", "Solid", "Height", "Torque", "Rate", "Band"
    ));
    out.push_str(&format!("{}\n", "─".repeat(118)));

    for entry in &report.entries {
        let name = entry.display_name();
        match &entry.result {
            CoilOutcome::Design(d) => {
                let flag = if d.sensitivity_warning { " [!]" } else { "" };
                out.push_str(&format!(
                    "{:<16} {:>10.p$} {:>10.p$} {:>10.p$} {:>8.p$} {:>8.p$} {:>8.p$} {:>11.tp$} {:>11.tp$}  {}{}\n",
                    name,
                    d.target_length,
                    d.min_length,
                    d.max_length,
                    d.target_turns,
                    d.solid_axial_length,
                    d.coil_height,
                    d.thermal_torque,
                    d.mech_torque_rate,
                    d.applied_flexivity_range,
                    flag,
                    p = p,
                    tp = tp,
                ));
            }
            CoilOutcome::Failed { error } => {
                out.push_str(&format!("{:<16} {}\n", name, error));
            }
        }
    }

    out.push('\n');
    out.push_str(&format!(
        "{} design(s), {} material(s) not usable",
        report.design_count, report.failure_count
    ));
    if report
        .entries
        .iter()
        .filter_map(|e| e.result.design())
        .any(|d| d.sensitivity_warning)
    {
        out.push_str("\n[!] outside the material's high-accuracy sensitivity range");
    }
    out
}

/// Render the catalog contents as a table
pub fn material_table(catalog: &MaterialCatalog) -> String {
    let mut out = format!(
        "{:<10} {:<10} {:>10} {:>6} {:>14}  {}\n",
        "ASTM", "Trade", "Max °F", "Bands", "E (psi)", "Description"
    );
    out.push_str(&format!("{}\n", "─".repeat(70)));
    for m in catalog.iter() {
        let modulus = match m.modulus_psi() {
            e if e > 0.0 => format!("{:.3e}", e),
            _ => "-".to_string(),
        };
        out.push_str(&format!(
            "{:<10} {:<10} {:>10} {:>6} {:>14}  {}\n",
            m.astm_type,
            m.truflex_type.as_deref().unwrap_or("-"),
            m.max_recommended_temp_f,
            m.flexivities.len(),
            modulus,
            m.description.as_deref().unwrap_or(""),
        ));
    }
    out.push_str(&format!("{} material(s)", catalog.len()));
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use coil_core::calculations::CoilRequest;
    use coil_core::materials::{seed_materials, BimetalMaterial, FlexivityBand};

    fn catalog() -> MaterialCatalog {
        let narrow = BimetalMaterial::new(
            "TM2",
            250.0,
            vec![FlexivityBand {
                min_temp_f: 0.0,
                max_temp_f: 250.0,
                base_value: 205.0,
                multiplier: 1e-7,
                tolerance_percent: 5.0,
            }],
        );
        let mut materials: Vec<BimetalMaterial> = seed_materials().to_vec();
        materials.push(narrow);
        materials.into_iter().collect()
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

    #[test]
    fn test_coil_table_lists_designs_and_failures() {
        let report = CatalogReport::build(&catalog(), &request()).unwrap();
        let table = coil_table(&report, 3);

        assert!(table.contains("N/A (GB14)"));
        assert!(table.contains("-100°F to 1000°F"));
        assert!(table.contains("Max temp exceeds material limit (250°F)"));
        assert!(table.ends_with("1 design(s), 1 material(s) not usable"));
    }

    #[test]
    fn test_material_table() {
        let table = material_table(&catalog());
        assert!(table.contains("GB14"));
        assert!(table.contains("2.600e7"));
        assert!(table.ends_with("2 material(s)"));
    }
}
