//! Server-side habit state file.
//!
//! The whole document is read on every access and rewritten on every
//! mutation:
//!
//! ```json
//! { "habit": { "name": "Drink Water", "records": { "2024-01-03": { ... } } } }
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use super::write_replace;
use crate::error::StorageError;
use crate::records::HabitState;

/// On-disk document layout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HabitFile {
    pub habit: HabitState,
}

#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
    default_name: String,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>, default_name: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            default_name: default_name.into(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn default_state(&self) -> HabitState {
        HabitState::named(self.default_name.clone())
    }

    /// Create the file with the default state unless it already exists.
    pub fn initialize(&self) -> Result<(), StorageError> {
        if self.path.exists() {
            return Ok(());
        }
        tracing::info!(path = %self.path.display(), "creating habit data file");
        self.save(&self.default_state())
    }

    /// Read the current state.
    ///
    /// A missing or undecodable file yields the default state. Any other
    /// read failure is returned.
    pub fn load(&self) -> Result<HabitState, StorageError> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %self.path.display(), "habit data file missing, using defaults");
                return Ok(self.default_state());
            }
            Err(source) => {
                return Err(StorageError::ReadFailed {
                    path: self.path.clone(),
                    source,
                })
            }
        };

        match serde_json::from_str::<HabitFile>(&content) {
            Ok(file) => Ok(file.habit),
            Err(e) => {
                tracing::warn!(
                    path = %self.path.display(),
                    error = %e,
                    "habit data file is malformed, using defaults"
                );
                Ok(self.default_state())
            }
        }
    }

    /// Rewrite the whole file with `state`, pretty-printed.
    pub fn save(&self, state: &HabitState) -> Result<(), StorageError> {
        let doc = HabitFile {
            habit: state.clone(),
        };
        let content = serde_json::to_string_pretty(&doc)?;
        write_replace(&self.path, content.as_bytes())
    }
}
