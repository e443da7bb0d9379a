mod config;
pub mod file_store;
pub mod local;

pub use config::{ClientConfig, Config, HabitConfig, ServerConfig};
pub use file_store::{HabitFile, JsonFileStore};
pub use local::{FallbackStore, JsonBlobStore, LocalStore, MemoryStore, LOCAL_STATE_KEY};

use std::path::{Path, PathBuf};

use crate::error::{ConfigError, StorageError};

/// Returns `~/.config/habitlog[-dev]/` based on HABITLOG_ENV.
///
/// Set HABITLOG_ENV=dev to use development data directory.
///
/// # Errors
/// Returns an error if creating the directory fails.
pub fn data_dir() -> Result<PathBuf, ConfigError> {
    let base_dir = dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config");

    let env = std::env::var("HABITLOG_ENV").unwrap_or_else(|_| "production".to_string());

    let dir = if env == "dev" {
        base_dir.join("habitlog-dev")
    } else {
        base_dir.join("habitlog")
    };

    std::fs::create_dir_all(&dir).map_err(|e| ConfigError::DataDir(e.to_string()))?;
    Ok(dir)
}

/// Resolve a configured path: absolute paths are kept, relative ones land
/// under `base`.
pub fn resolve_under(base: &Path, configured: &Path) -> PathBuf {
    if configured.is_absolute() {
        configured.to_path_buf()
    } else {
        base.join(configured)
    }
}

/// Replace `path` with `bytes` in one step: write a sibling temp file, then
/// rename it over the target.
pub(crate) fn write_replace(path: &Path, bytes: &[u8]) -> Result<(), StorageError> {
    let write_err = |source| StorageError::WriteFailed {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(write_err)?;
    }

    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    let tmp = PathBuf::from(tmp);

    std::fs::write(&tmp, bytes).map_err(write_err)?;
    std::fs::rename(&tmp, path).map_err(write_err)
}
