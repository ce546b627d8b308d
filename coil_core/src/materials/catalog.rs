//! Ordered material catalog with upsert-by-ASTM-type semantics.
//!
//! The catalog serializes as a bare JSON array so it stays interchangeable
//! with hand-edited `materials.json` files.

use serde::{Deserialize, Serialize};

use super::bimetal::BimetalMaterial;
use crate::errors::{CalcError, CalcResult};

/// What [`MaterialCatalog::upsert`] did with the record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertAction {
    /// An existing record with the same ASTM type was replaced in place
    Replaced,
    /// The record was appended to the end of the catalog
    Inserted,
}

/// Ordered list of bimetal materials.
///
/// Order matters: a catalog scan evaluates materials in this order, and
/// failures are reported in it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MaterialCatalog {
    materials: Vec<BimetalMaterial>,
}

impl MaterialCatalog {
    pub fn new() -> Self {
        MaterialCatalog::default()
    }

    /// Build a catalog from records, rejecting duplicate ASTM types
    pub fn from_materials(materials: Vec<BimetalMaterial>) -> CalcResult<Self> {
        let mut catalog = MaterialCatalog::new();
        for material in materials {
            if catalog.find(&material.astm_type).is_some() {
                return Err(CalcError::duplicate_material(material.astm_type));
            }
            catalog.materials.push(material);
        }
        Ok(catalog)
    }

    pub fn len(&self) -> usize {
        self.materials.len()
    }

    pub fn is_empty(&self) -> bool {
        self.materials.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &BimetalMaterial> {
        self.materials.iter()
    }

    pub fn as_slice(&self) -> &[BimetalMaterial] {
        &self.materials
    }

    /// Look up a material by ASTM type (case-insensitive)
    pub fn find(&self, astm_type: &str) -> Option<&BimetalMaterial> {
        self.materials.iter().find(|m| m.matches_key(astm_type))
    }

    /// Look up a material, failing with `MaterialNotFound`
    pub fn get(&self, astm_type: &str) -> CalcResult<&BimetalMaterial> {
        self.find(astm_type)
            .ok_or_else(|| CalcError::material_not_found(astm_type))
    }

    /// Insert a material, or replace the one with the same ASTM type.
    ///
    /// Replacement keeps the existing position in the catalog.
    pub fn upsert(&mut self, material: BimetalMaterial) -> CalcResult<UpsertAction> {
        material.validate()?;

        match self.materials.iter().position(|m| m.matches_key(&material.astm_type)) {
            Some(index) => {
                tracing::info!(astm_type = %material.astm_type, "replacing catalog entry");
                self.materials[index] = material;
                Ok(UpsertAction::Replaced)
            }
            None => {
                tracing::info!(astm_type = %material.astm_type, "adding catalog entry");
                self.materials.push(material);
                Ok(UpsertAction::Inserted)
            }
        }
    }

    /// Remove a material by ASTM type, returning it
    pub fn remove(&mut self, astm_type: &str) -> CalcResult<BimetalMaterial> {
        let index = self
            .materials
            .iter()
            .position(|m| m.matches_key(astm_type))
            .ok_or_else(|| CalcError::material_not_found(astm_type))?;
        Ok(self.materials.remove(index))
    }

    /// Validate every record, stopping at the first invalid one
    pub fn validate(&self) -> CalcResult<()> {
        for material in &self.materials {
            material.validate()?;
        }
        Ok(())
    }
}

impl FromIterator<BimetalMaterial> for MaterialCatalog {
    /// Collects without validation; later duplicates are kept as-is
    fn from_iter<I: IntoIterator<Item = BimetalMaterial>>(iter: I) -> Self {
        MaterialCatalog {
            materials: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::materials::FlexivityBand;

    fn material(astm: &str, base: f64) -> BimetalMaterial {
        BimetalMaterial::new(
            astm,
            600.0,
            vec![FlexivityBand {
                min_temp_f: -100.0,
                max_temp_f: 600.0,
                base_value: base,
                multiplier: 1e-7,
                tolerance_percent: 5.0,
            }],
        )
    }

    #[test]
    fn test_upsert_appends_new_key() {
        let mut catalog = MaterialCatalog::new();
        assert_eq!(catalog.upsert(material("TM1", 150.0)).unwrap(), UpsertAction::Inserted);
        assert_eq!(catalog.upsert(material("TM2", 205.0)).unwrap(), UpsertAction::Inserted);
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.as_slice()[1].astm_type, "TM2");
    }

    #[test]
    fn test_upsert_replaces_in_place_ignoring_case() {
        let mut catalog = MaterialCatalog::new();
        catalog.upsert(material("TM1", 150.0)).unwrap();
        catalog.upsert(material("TM2", 205.0)).unwrap();

        let action = catalog.upsert(material("tm1", 160.0)).unwrap();
        assert_eq!(action, UpsertAction::Replaced);
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.as_slice()[0].astm_type, "tm1");
        assert_eq!(catalog.as_slice()[0].flexivities[0].base_value, 160.0);
    }

    #[test]
    fn test_upsert_rejects_invalid_material() {
        let mut catalog = MaterialCatalog::new();
        let bad = BimetalMaterial::new("TM9", 600.0, vec![]);
        assert!(catalog.upsert(bad).is_err());
        assert!(catalog.is_empty());
    }

    #[test]
    fn test_find_and_remove() {
        let mut catalog: MaterialCatalog =
            vec![material("TM1", 150.0), material("TM2", 205.0)].into_iter().collect();

        assert!(catalog.find("tm2").is_some());
        assert_eq!(catalog.get("TM7").unwrap_err().error_code(), "MATERIAL_NOT_FOUND");

        let removed = catalog.remove("TM1").unwrap();
        assert_eq!(removed.astm_type, "TM1");
        assert_eq!(catalog.len(), 1);
        assert!(catalog.remove("TM1").is_err());
    }

    #[test]
    fn test_from_materials_rejects_duplicates() {
        let result = MaterialCatalog::from_materials(vec![material("TM1", 150.0), material("tm1", 160.0)]);
        assert_eq!(result.unwrap_err().error_code(), "DUPLICATE_MATERIAL");
    }

    #[test]
    fn test_serializes_as_bare_array() {
        let catalog: MaterialCatalog = vec![material("TM1", 150.0)].into_iter().collect();
        let json = serde_json::to_value(&catalog).unwrap();
        assert!(json.is_array());

        let roundtrip: MaterialCatalog = serde_json::from_value(json).unwrap();
        assert_eq!(roundtrip, catalog);
    }
}
