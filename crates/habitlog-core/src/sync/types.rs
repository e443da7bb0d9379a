//! Core types for client/backend synchronization.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Outcome of the most recent remote attempt, as shown to the user.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SyncStatus {
    /// No remote involved; the local copy is all there is.
    #[default]
    Local,
    Synced,
    /// Last remote call failed. Local data is unaffected.
    Error,
}

impl SyncStatus {
    /// Short label for status lines.
    pub fn label(&self) -> &'static str {
        match self {
            SyncStatus::Local => "Local only",
            SyncStatus::Synced => "Synced",
            SyncStatus::Error => "Sync failed",
        }
    }
}

impl fmt::Display for SyncStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_local() {
        assert_eq!(SyncStatus::default(), SyncStatus::Local);
    }

    #[test]
    fn test_serialized_names() {
        assert_eq!(serde_json::to_value(SyncStatus::Synced).unwrap(), "synced");
        assert_eq!(serde_json::to_value(SyncStatus::Error).unwrap(), "error");
    }
}
