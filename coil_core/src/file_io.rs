//! # File I/O Module
//!
//! Handles material catalog file operations with safety features:
//! - **Atomic saves**: Write to .tmp, verify, rename to prevent corruption
//! - **File locking**: Prevent concurrent edits on shared drives
//! - **Lenient empty files**: An empty catalog file reads as an empty catalog
//!
//! ## File Format
//!
//! A catalog is a pretty-printed JSON array of material records
//! (`materials.json`). Lock files use a `.json.lock` extension with metadata
//! about who holds the lock.
//!
//! ## Example
//!
//! ```rust,no_run
//! use coil_core::file_io::{load_catalog_or_empty, save_catalog, FileLock};
//! use coil_core::materials::seed_materials;
//! use std::path::Path;
//!
//! let path = Path::new("materials.json");
//!
//! // Acquire lock before saving
//! let lock = FileLock::acquire(path, "engineer@company.com").unwrap();
//!
//! let mut catalog = load_catalog_or_empty(path).unwrap();
//! for material in seed_materials() {
//!     catalog.upsert(material.clone()).unwrap();
//! }
//! save_catalog(&catalog, path).unwrap();
//!
//! // Lock is released when dropped
//! drop(lock);
//! ```

use std::fs::{self, File, OpenOptions};
use std::io::{ErrorKind, Read, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use fs2::FileExt;
use serde::{Deserialize, Serialize};

use crate::errors::{CalcError, CalcResult};
use crate::materials::MaterialCatalog;

/// Lock file metadata stored in .lock files
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LockInfo {
    /// User identifier (email or username)
    pub user_id: String,
    /// Machine name where lock was acquired
    pub machine: String,
    /// Process ID that holds the lock
    pub pid: u32,
    /// When the lock was acquired
    pub locked_at: DateTime<Utc>,
}

impl LockInfo {
    /// Create new lock info for the current process
    pub fn new(user_id: impl Into<String>) -> Self {
        LockInfo {
            user_id: user_id.into(),
            machine: hostname().unwrap_or_else(|| "unknown".to_string()),
            pid: std::process::id(),
            locked_at: Utc::now(),
        }
    }
}

/// Get the hostname of the current machine
fn hostname() -> Option<String> {
    #[cfg(windows)]
    {
        std::env::var("COMPUTERNAME").ok()
    }
    #[cfg(not(windows))]
    {
        std::env::var("HOSTNAME")
            .ok()
            .or_else(|| std::env::var("HOST").ok())
    }
}

/// File lock guard that releases the lock when dropped.
///
/// Uses both:
/// 1. OS-level file locking (via fs2) for process safety
/// 2. .lock file with metadata for user visibility
pub struct FileLock {
    /// Path to the catalog file
    catalog_path: PathBuf,
    /// Path to the lock file
    lock_path: PathBuf,
    /// The underlying file handle (keeps OS lock)
    _lock_file: File,
    /// Lock metadata
    pub info: LockInfo,
}

impl FileLock {
    /// Acquire an exclusive lock on a catalog file.
    ///
    /// # Returns
    ///
    /// * `Ok(FileLock)` - Lock acquired successfully
    /// * `Err(CalcError::FileLocked)` - Another process holds the lock
    pub fn acquire(path: &Path, user_id: impl Into<String>) -> CalcResult<Self> {
        let lock_path = lock_path_for(path);
        let info = LockInfo::new(user_id);

        if lock_path.exists() {
            if let Ok(existing) = read_lock_info(&lock_path) {
                if !is_lock_stale(&existing) {
                    return Err(CalcError::file_locked(
                        path.display().to_string(),
                        format!("{} ({})", existing.user_id, existing.machine),
                        existing.locked_at.to_rfc3339(),
                    ));
                }
                tracing::warn!(
                    "taking over stale lock on {} held by {}",
                    path.display(),
                    existing.user_id
                );
            }
        }

        let mut lock_file = OpenOptions::new()
            .write(true)
            .read(true)
            .create(true)
            .truncate(true)
            .open(&lock_path)
            .map_err(|e| {
                CalcError::file_error("create lock", lock_path.display().to_string(), e.to_string())
            })?;

        // Non-blocking
        lock_file.try_lock_exclusive().map_err(|_| {
            CalcError::file_locked(
                path.display().to_string(),
                "another process".to_string(),
                "unknown".to_string(),
            )
        })?;

        let lock_json = serde_json::to_string_pretty(&info)
            .map_err(|e| CalcError::serialization(e.to_string()))?;

        lock_file.write_all(lock_json.as_bytes()).map_err(|e| {
            CalcError::file_error("write lock", lock_path.display().to_string(), e.to_string())
        })?;

        lock_file.sync_all().map_err(|e| {
            CalcError::file_error("sync lock", lock_path.display().to_string(), e.to_string())
        })?;

        tracing::debug!("acquired lock {}", lock_path.display());

        Ok(FileLock {
            catalog_path: path.to_path_buf(),
            lock_path,
            _lock_file: lock_file,
            info,
        })
    }

    /// Get the path to the catalog file
    pub fn catalog_path(&self) -> &Path {
        &self.catalog_path
    }
}

impl Drop for FileLock {
    fn drop(&mut self) {
        // OS lock is released when _lock_file is dropped
        let _ = fs::remove_file(&self.lock_path);
    }
}

/// Get the lock file path for a catalog file
fn lock_path_for(catalog_path: &Path) -> PathBuf {
    let mut lock_path = catalog_path.to_path_buf();
    let extension = lock_path
        .extension()
        .map(|e| format!("{}.lock", e.to_string_lossy()))
        .unwrap_or_else(|| "lock".to_string());
    lock_path.set_extension(extension);
    lock_path
}

/// Get the temp file path used during an atomic save
fn tmp_path_for(catalog_path: &Path) -> PathBuf {
    let mut tmp_path = catalog_path.to_path_buf();
    let extension = tmp_path
        .extension()
        .map(|e| format!("{}.tmp", e.to_string_lossy()))
        .unwrap_or_else(|| "tmp".to_string());
    tmp_path.set_extension(extension);
    tmp_path
}

/// Read lock info from a lock file
fn read_lock_info(lock_path: &Path) -> CalcResult<LockInfo> {
    let mut file = File::open(lock_path).map_err(|e| {
        CalcError::file_error("read lock", lock_path.display().to_string(), e.to_string())
    })?;

    let mut contents = String::new();
    file.read_to_string(&mut contents).map_err(|e| {
        CalcError::file_error("read lock", lock_path.display().to_string(), e.to_string())
    })?;

    serde_json::from_str(&contents).map_err(|e| CalcError::serialization(e.to_string()))
}

/// Check if a lock is stale (the process that created it is no longer running)
fn is_lock_stale(info: &LockInfo) -> bool {
    if let Some(our_machine) = hostname() {
        if info.machine == our_machine {
            #[cfg(windows)]
            {
                use std::process::Command;
                let output = Command::new("tasklist")
                    .args(["/FI", &format!("PID eq {}", info.pid), "/NH"])
                    .output();
                if let Ok(output) = output {
                    let stdout = String::from_utf8_lossy(&output.stdout);
                    if stdout.contains("No tasks") || !stdout.contains(&info.pid.to_string()) {
                        return true;
                    }
                }
            }
            #[cfg(unix)]
            {
                if fs::metadata(format!("/proc/{}", info.pid)).is_err() {
                    return true;
                }
            }
        }
    }

    // More than 24 hours old
    let age = Utc::now() - info.locked_at;
    age.num_hours() > 24
}

/// Save a catalog to a file with atomic write semantics.
///
/// The save process:
/// 1. Serialize catalog to JSON (2-space indent)
/// 2. Write to a temporary file (.json.tmp)
/// 3. Sync to disk (fsync)
/// 4. Rename over the target (atomic on most filesystems)
///
/// This prevents corruption if the process is interrupted during write.
pub fn save_catalog(catalog: &MaterialCatalog, path: &Path) -> CalcResult<()> {
    let json = serde_json::to_string_pretty(catalog).map_err(|e| CalcError::serialization(e.to_string()))?;

    let tmp_path = tmp_path_for(path);

    let mut tmp_file = File::create(&tmp_path).map_err(|e| {
        CalcError::file_error("create temp file", tmp_path.display().to_string(), e.to_string())
    })?;

    tmp_file.write_all(json.as_bytes()).map_err(|e| {
        CalcError::file_error("write temp file", tmp_path.display().to_string(), e.to_string())
    })?;

    tmp_file.sync_all().map_err(|e| {
        CalcError::file_error("sync temp file", tmp_path.display().to_string(), e.to_string())
    })?;

    fs::rename(&tmp_path, path).map_err(|e| {
        let _ = fs::remove_file(&tmp_path);
        CalcError::file_error("rename to final", path.display().to_string(), e.to_string())
    })?;

    tracing::info!(materials = catalog.len(), "saved catalog {}", path.display());
    Ok(())
}

/// Parse catalog JSON. Blank input is an empty catalog.
pub fn parse_catalog(contents: &str) -> CalcResult<MaterialCatalog> {
    if contents.trim().is_empty() {
        return Ok(MaterialCatalog::new());
    }
    serde_json::from_str(contents)
        .map_err(|e| CalcError::serialization(format!("Catalog is corrupted: {}", e)))
}

/// Load a catalog from a file.
///
/// # Returns
///
/// * `Ok(MaterialCatalog)` - Successfully loaded (empty for a blank file)
/// * `Err(CalcError::SerializationError)` - Not a JSON array of materials
/// * `Err(CalcError::FileError)` - I/O error, including a missing file
pub fn load_catalog(path: &Path) -> CalcResult<MaterialCatalog> {
    let mut file = File::open(path).map_err(|e| {
        CalcError::file_error("open", path.display().to_string(), e.to_string())
    })?;

    let mut contents = String::new();
    file.read_to_string(&mut contents).map_err(|e| {
        CalcError::file_error("read", path.display().to_string(), e.to_string())
    })?;

    let catalog = parse_catalog(&contents).map_err(|e| match e {
        CalcError::SerializationError { reason } => {
            CalcError::serialization(format!("{} ({})", reason, path.display()))
        }
        other => other,
    })?;

    tracing::info!(materials = catalog.len(), "loaded catalog {}", path.display());
    Ok(catalog)
}

/// Load a catalog, treating a missing file as an empty catalog.
pub fn load_catalog_or_empty(path: &Path) -> CalcResult<MaterialCatalog> {
    match fs::metadata(path) {
        Err(e) if e.kind() == ErrorKind::NotFound => {
            tracing::debug!("no catalog at {}, starting empty", path.display());
            Ok(MaterialCatalog::new())
        }
        _ => load_catalog(path),
    }
}

/// Lock, load, modify and atomically save a catalog in one step.
///
/// The catalog is only written when `edit` succeeds.
pub fn update_catalog<T, F>(path: &Path, user_id: &str, edit: F) -> CalcResult<T>
where
    F: FnOnce(&mut MaterialCatalog) -> CalcResult<T>,
{
    let _lock = FileLock::acquire(path, user_id)?;
    let mut catalog = load_catalog_or_empty(path)?;
    let value = edit(&mut catalog)?;
    save_catalog(&catalog, path)?;
    Ok(value)
}
