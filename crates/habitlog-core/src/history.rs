//! Trailing week view for display.

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::records::RecordStore;

/// Number of days shown, today included.
pub const HISTORY_DAYS: i64 = 7;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    pub date: NaiveDate,
    pub completed: bool,
    /// Short English weekday, e.g. "Mon".
    pub day_name: String,
}

/// The last seven days ending at `today`, oldest first.
pub fn build_history(records: &RecordStore, today: NaiveDate) -> Vec<HistoryEntry> {
    (0..HISTORY_DAYS)
        .rev()
        .map(|offset| {
            let date = today - Duration::days(offset);
            HistoryEntry {
                date,
                completed: records.is_completed(date),
                day_name: date.format("%a").to_string(),
            }
        })
        .collect()
}
