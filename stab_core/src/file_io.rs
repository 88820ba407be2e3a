//! # Model Files
//!
//! Stability models are stored as `.pgs` files holding the JSON document
//! produced by [`crate::document`].
//!
//! - **Atomic saves**: the document is written to `<file>.tmp`, synced and
//!   renamed over the target, so an interrupted save never truncates a model
//! - **Lock files**: `<file>.pgs.lock` records who has a model open; an OS
//!   level lock via `fs2` guards the lock file itself
//!
//! ## Example
//!
//! ```rust,no_run
//! use stab_core::file_io::{load_model, save_model, FileLock};
//! use stab_core::model::StabilityModel;
//! use std::path::Path;
//!
//! let path = Path::new("girder.pgs");
//! let lock = FileLock::acquire(path, "engineer@company.com")?;
//! save_model(&StabilityModel::default(), path)?;
//! let model = load_model(path)?;
//! drop(lock);
//! # Ok::<(), stab_core::errors::StabError>(())
//! ```

use std::fs::{self, File, OpenOptions};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Duration, Utc};
use fs2::FileExt;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::errors::{StabError, StabResult};
use crate::model::StabilityModel;

/// File extension for stability models
pub const MODEL_EXTENSION: &str = "pgs";

/// Locks older than this are treated as abandoned
const STALE_LOCK_HOURS: i64 = 24;

/// Contents of a `.pgs.lock` file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LockInfo {
    /// User identifier (email or username)
    pub user_id: String,
    pub machine: String,
    pub pid: u32,
    pub locked_at: DateTime<Utc>,
}

impl LockInfo {
    /// Lock info for the current process
    pub fn new(user_id: impl Into<String>) -> Self {
        LockInfo {
            user_id: user_id.into(),
            machine: hostname().unwrap_or_else(|| "unknown".to_string()),
            pid: std::process::id(),
            locked_at: Utc::now(),
        }
    }

    /// Whether the owner of this lock has gone away
    fn is_stale(&self) -> bool {
        if Utc::now() - self.locked_at > Duration::hours(STALE_LOCK_HOURS) {
            return true;
        }
        match hostname() {
            Some(machine) if machine == self.machine => !process_is_running(self.pid),
            _ => false,
        }
    }
}

fn hostname() -> Option<String> {
    #[cfg(windows)]
    {
        std::env::var("COMPUTERNAME").ok()
    }
    #[cfg(not(windows))]
    {
        std::env::var("HOSTNAME").ok().or_else(|| std::env::var("HOST").ok())
    }
}

#[cfg(unix)]
fn process_is_running(pid: u32) -> bool {
    Path::new(&format!("/proc/{pid}")).exists()
}

#[cfg(windows)]
fn process_is_running(pid: u32) -> bool {
    use std::process::Command;
    match Command::new("tasklist")
        .args(["/FI", &format!("PID eq {pid}"), "/NH"])
        .output()
    {
        Ok(output) => String::from_utf8_lossy(&output.stdout).contains(&pid.to_string()),
        Err(_) => true,
    }
}

#[cfg(not(any(unix, windows)))]
fn process_is_running(_pid: u32) -> bool {
    true
}

// ============================================================================
// Locking
// ============================================================================

/// Exclusive lock on a model file, released when dropped
#[derive(Debug)]
pub struct FileLock {
    model_path: PathBuf,
    lock_path: PathBuf,
    /// Held open to keep the OS level lock
    _lock_file: File,
    pub info: LockInfo,
}

impl FileLock {
    /// Acquire the lock for `path`.
    ///
    /// A live lock held by someone else is reported as
    /// [`StabError::FileLocked`]; a stale lock is taken over.
    pub fn acquire(path: &Path, user_id: impl Into<String>) -> StabResult<Self> {
        let lock_path = lock_path_for(path);
        if let Some(existing) = FileLock::check(path) {
            return Err(StabError::file_locked(
                path.display().to_string(),
                format!("{} ({})", existing.user_id, existing.machine),
                existing.locked_at.to_rfc3339(),
            ));
        }

        let lock_display = lock_path.display().to_string();
        let mut lock_file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(true)
            .open(&lock_path)
            .map_err(|e| StabError::file_error("create lock", &lock_display, e.to_string()))?;

        lock_file
            .try_lock_exclusive()
            .map_err(|_| StabError::file_locked(path.display().to_string(), "another process", "unknown"))?;

        let info = LockInfo::new(user_id);
        let json = serde_json::to_string_pretty(&info)
            .map_err(|e| StabError::SerializationError { reason: e.to_string() })?;
        lock_file
            .write_all(json.as_bytes())
            .and_then(|_| lock_file.sync_all())
            .map_err(|e| StabError::file_error("write lock", &lock_display, e.to_string()))?;

        debug!(path = %path.display(), user = %info.user_id, "Acquired model lock");
        Ok(FileLock {
            model_path: path.to_path_buf(),
            lock_path,
            _lock_file: lock_file,
            info,
        })
    }

    /// The live lock on `path`, if any, without acquiring it
    pub fn check(path: &Path) -> Option<LockInfo> {
        let lock_path = lock_path_for(path);
        if !lock_path.exists() {
            return None;
        }
        match read_lock_info(&lock_path) {
            Ok(info) if !info.is_stale() => Some(info),
            Ok(info) => {
                warn!(path = %path.display(), user = %info.user_id, "Ignoring stale model lock");
                None
            }
            Err(_) => None,
        }
    }

    pub fn model_path(&self) -> &Path {
        &self.model_path
    }
}

impl Drop for FileLock {
    fn drop(&mut self) {
        let _ = fs::remove_file(&self.lock_path);
    }
}

/// `girder.pgs` → `girder.pgs.lock`
pub fn lock_path_for(model_path: &Path) -> PathBuf {
    with_suffix(model_path, "lock")
}

fn with_suffix(path: &Path, suffix: &str) -> PathBuf {
    let extension = match path.extension() {
        Some(ext) => format!("{}.{suffix}", ext.to_string_lossy()),
        None => suffix.to_string(),
    };
    path.with_extension(extension)
}

fn read_lock_info(lock_path: &Path) -> StabResult<LockInfo> {
    let contents = read_text(lock_path, "read lock")?;
    serde_json::from_str(&contents).map_err(|e| StabError::SerializationError { reason: e.to_string() })
}

fn read_text(path: &Path, operation: &str) -> StabResult<String> {
    let mut contents = String::new();
    File::open(path)
        .and_then(|mut file| file.read_to_string(&mut contents))
        .map_err(|e| StabError::file_error(operation, path.display().to_string(), e.to_string()))?;
    Ok(contents)
}

// ============================================================================
// Save / load
// ============================================================================

/// Write `contents` to `path` through a synced temporary file and a rename
fn write_atomic(path: &Path, contents: &[u8]) -> StabResult<()> {
    let tmp_path = with_suffix(path, "tmp");
    let tmp_display = tmp_path.display().to_string();

    let mut tmp_file =
        File::create(&tmp_path).map_err(|e| StabError::file_error("create temp file", &tmp_display, e.to_string()))?;
    tmp_file
        .write_all(contents)
        .and_then(|_| tmp_file.sync_all())
        .map_err(|e| StabError::file_error("write temp file", &tmp_display, e.to_string()))?;
    drop(tmp_file);

    fs::rename(&tmp_path, path).map_err(|e| {
        let _ = fs::remove_file(&tmp_path);
        StabError::file_error("rename to final", path.display().to_string(), e.to_string())
    })
}

/// Save a model with atomic write semantics
pub fn save_model(model: &StabilityModel, path: &Path) -> StabResult<()> {
    let json = model.to_json()?;
    write_atomic(path, json.as_bytes())?;
    info!(path = %path.display(), "Saved stability model");
    Ok(())
}

/// Load a model of any supported document version
pub fn load_model(path: &Path) -> StabResult<StabilityModel> {
    let contents = read_text(path, "open")?;
    let model = StabilityModel::from_json(&contents)?;
    info!(path = %path.display(), "Loaded stability model");
    Ok(model)
}

/// Load a model and report whether someone else holds its lock
pub fn load_model_with_lock_check(path: &Path) -> StabResult<(StabilityModel, Option<LockInfo>)> {
    let model = load_model(path)?;
    Ok((model, FileLock::check(path)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::girder::GirderType;
    use tempfile::tempdir;

    #[test]
    fn test_lock_path() {
        assert_eq!(
            lock_path_for(Path::new("/jobs/girder.pgs")),
            Path::new("/jobs/girder.pgs.lock")
        );
        assert_eq!(lock_path_for(Path::new("/jobs/girder")), Path::new("/jobs/girder.lock"));
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("girder.pgs");

        let mut model = StabilityModel::default();
        model.set_girder_type(GirderType::NonPrismatic);
        save_model(&model, &path).unwrap();

        assert!(!with_suffix(&path, "tmp").exists());
        assert_eq!(load_model(&path).unwrap(), model);
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempdir().unwrap();
        let result = load_model(&dir.path().join("missing.pgs"));
        assert!(matches!(result, Err(StabError::FileError { .. })));
    }

    #[test]
    fn test_load_garbage_is_format_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("garbage.pgs");
        fs::write(&path, "{ not a model").unwrap();
        assert!(matches!(load_model(&path), Err(StabError::InvalidFileFormat { .. })));
    }

    #[test]
    fn test_lock_acquire_and_release() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("locked.pgs");
        save_model(&StabilityModel::default(), &path).unwrap();

        let lock = FileLock::acquire(&path, "test@example.com").unwrap();
        assert_eq!(lock.info.user_id, "test@example.com");
        assert_eq!(lock.model_path(), path.as_path());
        assert!(lock_path_for(&path).exists());

        drop(lock);
        assert!(!lock_path_for(&path).exists());
    }

    #[test]
    fn test_old_lock_is_stale() {
        let mut info = LockInfo::new("someone");
        info.machine = "elsewhere".into();
        assert!(!info.is_stale());
        info.locked_at = Utc::now() - Duration::hours(STALE_LOCK_HOURS + 1);
        assert!(info.is_stale());
    }

    #[test]
    fn test_load_with_lock_check() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("check.pgs");
        save_model(&StabilityModel::default(), &path).unwrap();

        let (_, lock) = load_model_with_lock_check(&path).unwrap();
        assert!(lock.is_none());
    }
}
