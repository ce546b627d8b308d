//! CLI configuration loaded from `coil.toml`.
//!
//! Lookup order: `--config <path>`, then `$COIL_CONFIG`, then `coil.toml` in
//! the working directory. With none of those present the defaults apply.
//!
//! ```toml
//! catalog_path = "data/materials.json"
//! log_filter = "coil_core=debug"
//! precision = 4
//!
//! [defaults]
//! t1 = 70.0
//! t2 = 300.0
//! sweep = 270.0
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use coil_core::calculations::CoilRequest;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const CONFIG_ENV: &str = "COIL_CONFIG";
pub const DEFAULT_CONFIG_FILE: &str = "coil.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Cannot read config '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config '{}': {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

/// Default values for each request field, used for omitted flags and as
/// the suggestion shown at interactive prompts.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RequestDefaults {
    pub t1: f64,
    pub t2: f64,
    pub sweep: f64,
    pub thickness: f64,
    pub thick_tol: f64,
    pub max_od: f64,
    pub width: f64,
    pub gap: f64,
}

impl Default for RequestDefaults {
    fn default() -> Self {
        Self {
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
}

impl From<RequestDefaults> for CoilRequest {
    fn from(d: RequestDefaults) -> Self {
        CoilRequest {
            t1: d.t1,
            t2: d.t2,
            sweep: d.sweep,
            thickness: d.thickness,
            thick_tol: d.thick_tol,
            max_od: d.max_od,
            width: d.width,
            gap: d.gap,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Material catalog file
    pub catalog_path: PathBuf,
    /// `tracing` filter used when `RUST_LOG` is unset
    pub log_filter: String,
    /// Name recorded in catalog lock files
    pub lock_user: Option<String>,
    /// Decimal places in table output
    pub precision: usize,
    pub defaults: RequestDefaults,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            catalog_path: PathBuf::from("materials.json"),
            log_filter: "coil_core=info,coil_cli=info".to_string(),
            lock_user: None,
            precision: 3,
            defaults: RequestDefaults::default(),
        }
    }
}

impl Config {
    /// Lock owner: configured name, then the login name
    pub fn lock_user(&self) -> String {
        self.lock_user
            .clone()
            .or_else(|| std::env::var("USER").ok())
            .or_else(|| std::env::var("USERNAME").ok())
            .unwrap_or_else(|| "unknown".to_string())
    }
}

/// Parse a config file's contents
pub fn parse(path: &Path, content: &str) -> Result<Config, ConfigError> {
    toml::from_str(content).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Read a config file that must exist
pub fn load(path: &Path) -> Result<Config, ConfigError> {
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse(path, &content)
}

/// Resolve the config per the lookup order, falling back to defaults
pub fn load_or_default(explicit: Option<&Path>) -> Result<Config, ConfigError> {
    if let Some(path) = explicit {
        return load(path);
    }
    if let Ok(path) = std::env::var(CONFIG_ENV) {
        return load(Path::new(&path));
    }
    let path = Path::new(DEFAULT_CONFIG_FILE);
    if path.exists() {
        load(path)
    } else {
        Ok(Config::default())
    }
}
