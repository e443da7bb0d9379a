//! Habit state and the per-day completion records.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Name given to the habit on first run.
pub const DEFAULT_HABIT_NAME: &str = "Drink Water";

/// Marker stored for a completed day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletionEntry {
    #[serde(default = "completed_default")]
    pub completed: bool,
    /// Absent in hand-edited or older records.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime<Utc>>,
}

fn completed_default() -> bool {
    true
}

impl CompletionEntry {
    pub fn completed_at(timestamp: DateTime<Utc>) -> Self {
        Self {
            completed: true,
            timestamp: Some(timestamp),
        }
    }

    fn untimed() -> Self {
        Self {
            completed: true,
            timestamp: None,
        }
    }
}

/// Completed calendar dates, keyed `YYYY-MM-DD` on the wire.
///
/// A date is present only when the habit was done that day. Absence is the
/// only representation of "not done".
///
/// Decoding is per entry: a key that is not a date is dropped, `null` and
/// `false` count as absent, and any other value counts as done even when
/// its fields do not parse.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct RecordStore(BTreeMap<NaiveDate, CompletionEntry>);

impl<'de> Deserialize<'de> for RecordStore {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = BTreeMap::<String, Value>::deserialize(deserializer)?;
        let mut records = BTreeMap::new();

        for (key, value) in raw {
            let Ok(date) = key.parse::<NaiveDate>() else {
                tracing::warn!(key = %key, "dropping record with a non-date key");
                continue;
            };
            if matches!(value, Value::Null | Value::Bool(false)) {
                continue;
            }
            let entry: CompletionEntry = serde_json::from_value(value).unwrap_or_else(|e| {
                tracing::warn!(%date, error = %e, "record entry is malformed, keeping the day");
                CompletionEntry::untimed()
            });
            records.insert(date, entry);
        }

        Ok(Self(records))
    }
}

impl RecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `date` as done, replacing any earlier entry for the same day.
    pub fn mark_completed(&mut self, date: NaiveDate, at: DateTime<Utc>) {
        self.0.insert(date, CompletionEntry::completed_at(at));
    }

    pub fn is_completed(&self, date: NaiveDate) -> bool {
        self.0.contains_key(&date)
    }

    pub fn get(&self, date: NaiveDate) -> Option<&CompletionEntry> {
        self.0.get(&date)
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// The single tracked habit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HabitState {
    #[serde(default = "default_name", deserialize_with = "name_or_default")]
    pub name: String,
    #[serde(default)]
    pub records: RecordStore,
}

fn default_name() -> String {
    DEFAULT_HABIT_NAME.to_string()
}

/// Missing, `null` and empty names all fall back to the default.
fn name_or_default<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    let name = Option::<String>::deserialize(deserializer)?.unwrap_or_default();
    Ok(if name.is_empty() { default_name() } else { name })
}

impl HabitState {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            records: RecordStore::new(),
        }
    }

    /// Drop every record; the name is kept.
    pub fn reset(&mut self) {
        self.records.clear();
    }
}

impl Default for HabitState {
    fn default() -> Self {
        Self::named(DEFAULT_HABIT_NAME)
    }
}
