//! # coil_core - Bimetal Coil Calculation Engine
//!
//! `coil_core` sizes helical thermostatic bimetal coils: from a material's
//! flexivity data and a set of design targets it derives the active strip
//! length (with its tolerance envelope), the helix geometry, and the torque
//! the coil can deliver. All inputs and outputs are JSON-serializable.
//!
//! ## Design Philosophy
//!
//! - **Stateless**: Pure functions that take input and return results
//! - **JSON-First**: All types implement Serialize/Deserialize
//! - **Errors as values**: An ineligible material is a result, not a panic
//!
//! ## Quick Start
//!
//! ```rust
//! use coil_core::calculations::{evaluate_catalog, CoilRequest};
//! use coil_core::materials::{seed_materials, MaterialCatalog};
//!
//! let catalog: MaterialCatalog = seed_materials().iter().cloned().collect();
//! let request = CoilRequest {
//!     t1: 70.0,
//!     t2: 300.0,
//!     sweep: 270.0,
//!     thickness: 0.012,
//!     thick_tol: 0.0005,
//!     max_od: 0.75,
//!     width: 0.2,
//!     gap: 0.01,
//! };
//!
//! let entries = evaluate_catalog(&catalog, &request).unwrap();
//! let json = serde_json::to_string_pretty(&entries).unwrap();
//! ```
//!
//! ## Modules
//!
//! - [`calculations`] - The coil engine and catalog scan
//! - [`equations`] - Closed-form coil formulas
//! - [`materials`] - Bimetal material records and the catalog
//! - [`errors`] - Structured error types
//! - [`file_io`] - Catalog files with atomic saves and locking

pub mod calculations;
pub mod equations;
pub mod errors;
pub mod file_io;
pub mod materials;

// Re-export commonly used types at crate root for convenience
pub use calculations::{calculate, evaluate_catalog, CatalogEntry, CatalogReport, CoilDesign, CoilOutcome, CoilRequest};
pub use errors::{CalcError, CalcResult, CoilError};
pub use file_io::{load_catalog, load_catalog_or_empty, save_catalog, update_catalog, FileLock};
pub use materials::{BimetalMaterial, FlexivityBand, MaterialCatalog};
