//! Habit operations over the file-backed state.
//!
//! Every call reads the state file, and every mutation rewrites it, while
//! holding the service mutex. Concurrent requests in one process therefore
//! cannot interleave their read-modify-write cycles.

use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::api::{HabitSummary, MutationOutcome, COMPLETE_MESSAGE, RESET_MESSAGE};
use crate::clock::{Clock, SystemClock};
use crate::error::StorageError;
use crate::history::{build_history, HistoryEntry};
use crate::records::HabitState;
use crate::storage::JsonFileStore;
use crate::streak::calculate_streak;

pub struct HabitService<C = SystemClock> {
    store: JsonFileStore,
    clock: C,
    access: Mutex<()>,
}

impl HabitService<SystemClock> {
    pub fn new(store: JsonFileStore) -> Self {
        Self::with_clock(store, SystemClock)
    }
}

impl<C: Clock> HabitService<C> {
    pub fn with_clock(store: JsonFileStore, clock: C) -> Self {
        Self {
            store,
            clock,
            access: Mutex::new(()),
        }
    }

    fn lock(&self) -> MutexGuard<'_, ()> {
        // The guarded value is `()`, so a poisoned lock carries no broken state.
        self.access.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn summarize(&self, state: HabitState) -> HabitSummary {
        let today = self.clock.today();
        HabitSummary {
            streak: calculate_streak(&state.records, today),
            completed_today: state.records.is_completed(today),
            name: state.name,
            records: state.records,
        }
    }

    /// Current habit with derived streak.
    pub fn get_habit(&self) -> Result<HabitSummary, StorageError> {
        let _guard = self.lock();
        let state = self.store.load()?;
        Ok(self.summarize(state))
    }

    /// Mark today as done. Repeating on the same day only refreshes the
    /// timestamp.
    pub fn complete_habit(&self) -> Result<MutationOutcome, StorageError> {
        let _guard = self.lock();
        let mut state = self.store.load()?;
        let now = self.clock.now();
        let today = now.date_naive();

        state.records.mark_completed(today, now);
        self.store.save(&state)?;

        let streak = calculate_streak(&state.records, today);
        tracing::info!(date = %today, streak, "habit completed");

        Ok(MutationOutcome {
            success: true,
            streak,
            completed_today: true,
            message: COMPLETE_MESSAGE.into(),
        })
    }

    /// Clear all records, keeping the habit name.
    pub fn reset_habit(&self) -> Result<MutationOutcome, StorageError> {
        let _guard = self.lock();
        let mut state = self.store.load()?;
        let cleared = state.records.len();

        state.reset();
        self.store.save(&state)?;
        tracing::info!(cleared, "habit records reset");

        Ok(MutationOutcome {
            success: true,
            streak: 0,
            completed_today: false,
            message: RESET_MESSAGE.into(),
        })
    }

    /// The last seven days ending today.
    pub fn history(&self) -> Result<Vec<HistoryEntry>, StorageError> {
        let _guard = self.lock();
        let state = self.store.load()?;
        Ok(build_history(&state.records, self.clock.today()))
    }
}
