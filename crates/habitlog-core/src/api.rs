//! JSON bodies exchanged over `/api`.
//!
//! The server serializes these and [`crate::sync::ApiClient`] decodes them,
//! so both sides stay on one definition.

use serde::{Deserialize, Serialize};

use crate::records::{HabitState, RecordStore};

pub const HEALTH_MESSAGE: &str = "Tiny Habit Logger API is running";
pub const COMPLETE_MESSAGE: &str = "Habit marked as completed for today";
pub const RESET_MESSAGE: &str = "Habit data reset successfully";

/// Response of `GET /api/habit`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HabitSummary {
    pub name: String,
    pub streak: u32,
    pub completed_today: bool,
    pub records: RecordStore,
}

impl HabitSummary {
    pub fn into_state(self) -> HabitState {
        HabitState {
            name: self.name,
            records: self.records,
        }
    }
}

/// Response of the mutating endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MutationOutcome {
    pub success: bool,
    pub streak: u32,
    pub completed_today: bool,
    pub message: String,
}

/// Response of `GET /api/health`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    pub message: String,
}

impl HealthStatus {
    pub fn ok() -> Self {
        Self {
            status: "OK".into(),
            message: HEALTH_MESSAGE.into(),
        }
    }
}

/// Body returned with a 500.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_uses_camel_case() {
        let summary = HabitSummary {
            name: "Drink Water".into(),
            streak: 0,
            completed_today: false,
            records: RecordStore::new(),
        };
        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "name": "Drink Water",
                "streak": 0,
                "completedToday": false,
                "records": {}
            })
        );
    }
}
