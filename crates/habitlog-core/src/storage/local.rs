//! Client-side copies of the habit state.
//!
//! The client keeps one blob under a fixed key. [`JsonBlobStore`] puts it in
//! a small JSON key/value file, [`MemoryStore`] keeps it in process, and
//! [`FallbackStore`] chains two stores so a failing primary degrades to the
//! secondary instead of losing the write.

use serde_json::{Map, Value};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use super::write_replace;
use crate::error::StorageError;
use crate::records::HabitState;

/// Key the habit blob is stored under.
pub const LOCAL_STATE_KEY: &str = "habitTracker";

pub trait LocalStore: Send + Sync {
    /// `Ok(None)` when nothing usable has been stored yet.
    fn load(&self) -> Result<Option<HabitState>, StorageError>;

    fn save(&self, state: &HabitState) -> Result<(), StorageError>;
}

impl<T: LocalStore + ?Sized> LocalStore for std::sync::Arc<T> {
    fn load(&self) -> Result<Option<HabitState>, StorageError> {
        (**self).load()
    }

    fn save(&self, state: &HabitState) -> Result<(), StorageError> {
        (**self).save(state)
    }
}

/// Key/value JSON file holding the blob under [`LOCAL_STATE_KEY`].
#[derive(Debug, Clone)]
pub struct JsonBlobStore {
    path: PathBuf,
}

impl JsonBlobStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_entries(&self) -> Result<Option<Map<String, Value>>, StorageError> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(source) => {
                return Err(StorageError::ReadFailed {
                    path: self.path.clone(),
                    source,
                })
            }
        };

        match serde_json::from_str::<Map<String, Value>>(&content) {
            Ok(entries) => Ok(Some(entries)),
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "local store is not a JSON object");
                Ok(None)
            }
        }
    }
}

impl LocalStore for JsonBlobStore {
    fn load(&self) -> Result<Option<HabitState>, StorageError> {
        let Some(mut entries) = self.read_entries()? else {
            return Ok(None);
        };
        let Some(blob) = entries.remove(LOCAL_STATE_KEY) else {
            return Ok(None);
        };

        match serde_json::from_value::<HabitState>(blob) {
            Ok(state) => Ok(Some(state)),
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "discarding undecodable local habit state");
                Ok(None)
            }
        }
    }

    fn save(&self, state: &HabitState) -> Result<(), StorageError> {
        // Other keys in the file belong to someone else; keep them.
        let mut entries = self.read_entries()?.unwrap_or_default();
        entries.insert(LOCAL_STATE_KEY.to_string(), serde_json::to_value(state)?);
        let content = serde_json::to_string_pretty(&entries)?;
        write_replace(&self.path, content.as_bytes())
    }
}

/// In-process store.
#[derive(Debug, Default)]
pub struct MemoryStore {
    state: Mutex<Option<HabitState>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_state(state: HabitState) -> Self {
        Self {
            state: Mutex::new(Some(state)),
        }
    }

    /// Current contents, for inspection.
    pub fn snapshot(&self) -> Option<HabitState> {
        self.state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl LocalStore for MemoryStore {
    fn load(&self) -> Result<Option<HabitState>, StorageError> {
        Ok(self.snapshot())
    }

    fn save(&self, state: &HabitState) -> Result<(), StorageError> {
        *self.state.lock().unwrap_or_else(PoisonError::into_inner) = Some(state.clone());
        Ok(())
    }
}

/// Primary store with a secondary to fall back on.
#[derive(Debug)]
pub struct FallbackStore<P, S> {
    primary: P,
    secondary: S,
}

impl<P: LocalStore, S: LocalStore> FallbackStore<P, S> {
    pub fn new(primary: P, secondary: S) -> Self {
        Self { primary, secondary }
    }
}

impl<P: LocalStore, S: LocalStore> LocalStore for FallbackStore<P, S> {
    fn load(&self) -> Result<Option<HabitState>, StorageError> {
        match self.primary.load() {
            Ok(Some(state)) => Ok(Some(state)),
            Ok(None) => self.secondary.load(),
            Err(e) => {
                tracing::warn!(error = %e, "primary local store unreadable, trying fallback");
                self.secondary.load()
            }
        }
    }

    fn save(&self, state: &HabitState) -> Result<(), StorageError> {
        let primary_err = match self.primary.save(state) {
            Ok(()) => return Ok(()),
            Err(e) => e,
        };
        tracing::warn!(error = %primary_err, "primary local store rejected write, using fallback");
        self.secondary
            .save(state)
            .map_err(|e| StorageError::Unavailable(format!("{primary_err}; {e}")))
    }
}
