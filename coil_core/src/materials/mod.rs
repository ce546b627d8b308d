//! # Materials Database
//!
//! Thermostatic bimetal material records and the catalog that holds them.
//!
//! ## Structure
//!
//! - [`bimetal`] - `BimetalMaterial`, `FlexivityBand`, `ScaledValue`
//! - [`catalog`] - Ordered `MaterialCatalog` with upsert by ASTM type
//! - [`seed`] - Built-in records for bootstrapping an empty catalog
//!
//! ## Example
//!
//! ```rust
//! use coil_core::materials::{BimetalMaterial, FlexivityBand, MaterialCatalog};
//!
//! let tm1 = BimetalMaterial::new(
//!     "TM1",
//!     550.0,
//!     vec![FlexivityBand {
//!         min_temp_f: 0.0,
//!         max_temp_f: 300.0,
//!         base_value: 150.0,
//!         multiplier: 1e-7,
//!         tolerance_percent: 5.0,
//!     }],
//! )
//! .with_modulus(25.0, 1e6);
//!
//! let mut catalog = MaterialCatalog::new();
//! catalog.upsert(tm1).unwrap();
//! assert!(catalog.find("tm1").is_some());
//! ```

pub mod bimetal;
pub mod catalog;
pub mod seed;

pub use bimetal::{material_label, BimetalMaterial, FlexivityBand, ScaledValue};
pub use catalog::{MaterialCatalog, UpsertAction};
pub use seed::seed_materials;
