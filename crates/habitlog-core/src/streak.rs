//! Consecutive-day streak ending today.

use chrono::NaiveDate;

use crate::records::RecordStore;

/// Count consecutive completed days walking backward from `today`.
///
/// Stops at the first missing day, so a day that is not yet marked yields 0
/// even when yesterday was.
pub fn calculate_streak(records: &RecordStore, today: NaiveDate) -> u32 {
    let mut streak = 0;
    let mut day = Some(today);

    while let Some(current) = day {
        if !records.is_completed(current) {
            break;
        }
        streak += 1;
        day = current.pred_opt();
    }

    streak
}
