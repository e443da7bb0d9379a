//! Local/remote reconciliation for the client.
//!
//! Policy:
//! - the backend is probed once on connect and the answer is kept for the
//!   whole session;
//! - on load, remote state wins when it can be fetched and is copied over
//!   the local store;
//! - on mutation, the local store is written first and the backend is told
//!   afterwards on a best-effort basis. Remote failures only change
//!   [`SyncStatus`].
//!
//! This is last-write-wins with no conflict detection, which is only sound
//! for one user on one device.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::client::RemoteHabitApi;
use super::types::SyncStatus;
use crate::clock::{Clock, SystemClock};
use crate::error::StorageError;
use crate::history::{build_history, HistoryEntry};
use crate::records::{HabitState, DEFAULT_HABIT_NAME};
use crate::storage::LocalStore;
use crate::streak::calculate_streak;

/// What the client renders.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HabitView {
    pub name: String,
    pub streak: u32,
    pub completed_today: bool,
    pub history: Vec<HistoryEntry>,
}

#[derive(Debug, Clone, Copy)]
enum RemoteOp {
    Complete,
    Reset,
}

pub struct PersistenceGateway<L, R, C = SystemClock> {
    local: L,
    remote: Option<R>,
    remote_available: bool,
    clock: C,
    default_name: String,
    state: HabitState,
    status: SyncStatus,
    last_synced_at: Option<DateTime<Utc>>,
}

impl<L, R, C> PersistenceGateway<L, R, C>
where
    L: LocalStore,
    R: RemoteHabitApi,
    C: Clock,
{
    /// Probe the backend (if any) and build a gateway holding the default
    /// state. Call [`load`](Self::load) before use.
    pub async fn connect(local: L, remote: Option<R>, clock: C) -> Self {
        let remote_available = match &remote {
            Some(api) => api.is_available().await,
            None => false,
        };

        if remote_available {
            tracing::info!("backend is available, sync enabled");
        } else {
            tracing::info!("backend not available, using local storage only");
        }

        Self {
            local,
            remote,
            remote_available,
            clock,
            default_name: DEFAULT_HABIT_NAME.to_string(),
            state: HabitState::default(),
            status: SyncStatus::Local,
            last_synced_at: None,
        }
    }

    /// Name used when neither copy exists.
    pub fn with_default_name(mut self, name: impl Into<String>) -> Self {
        self.default_name = name.into();
        self.state = HabitState::named(self.default_name.clone());
        self
    }

    pub fn remote_available(&self) -> bool {
        self.remote_available
    }

    pub fn sync_status(&self) -> SyncStatus {
        self.status
    }

    pub fn last_synced_at(&self) -> Option<DateTime<Utc>> {
        self.last_synced_at
    }

    pub fn state(&self) -> &HabitState {
        &self.state
    }

    /// Resolve the starting state from remote, then local, then defaults.
    pub async fn load(&mut self) -> Result<HabitView, StorageError> {
        let remote_state = self.pull_remote().await;

        let state = match remote_state {
            Some(state) => {
                self.local.save(&state)?;
                state
            }
            None => match self.local.load()? {
                Some(state) => state,
                None => {
                    let state = HabitState::named(self.default_name.clone());
                    self.local.save(&state)?;
                    state
                }
            },
        };

        self.state = state;
        Ok(self.view())
    }

    /// Mark today as done.
    pub async fn complete(&mut self) -> Result<HabitView, StorageError> {
        let now = self.clock.now();
        let mut next = self.state.clone();
        next.records.mark_completed(now.date_naive(), now);
        self.commit(next, RemoteOp::Complete).await
    }

    /// Clear all records, keeping the name.
    pub async fn reset(&mut self) -> Result<HabitView, StorageError> {
        let mut next = self.state.clone();
        next.reset();
        self.commit(next, RemoteOp::Reset).await
    }

    /// Derived view of the in-memory state.
    pub fn view(&self) -> HabitView {
        let today = self.clock.today();
        HabitView {
            name: self.state.name.clone(),
            streak: calculate_streak(&self.state.records, today),
            completed_today: self.state.records.is_completed(today),
            history: build_history(&self.state.records, today),
        }
    }

    pub fn history(&self) -> Vec<HistoryEntry> {
        build_history(&self.state.records, self.clock.today())
    }

    async fn commit(&mut self, next: HabitState, op: RemoteOp) -> Result<HabitView, StorageError> {
        // Local first. If this fails the previous state stays in place.
        self.local.save(&next)?;
        self.state = next;
        self.push_remote(op).await;
        Ok(self.view())
    }

    async fn pull_remote(&mut self) -> Option<HabitState> {
        let api = match (&self.remote, self.remote_available) {
            (Some(api), true) => api,
            _ => return None,
        };

        let fetched = api.get_habit().await;
        match fetched {
            Ok(summary) => {
                self.mark_synced();
                Some(summary.into_state())
            }
            Err(e) => {
                tracing::warn!(error = %e, "backend load failed, using local copy");
                self.status = SyncStatus::Error;
                None
            }
        }
    }

    async fn push_remote(&mut self, op: RemoteOp) {
        let api = match (&self.remote, self.remote_available) {
            (Some(api), true) => api,
            _ => return,
        };

        let result = match op {
            RemoteOp::Complete => api.complete_habit().await,
            RemoteOp::Reset => api.reset_habit().await,
        };
        match result {
            Ok(_) => self.mark_synced(),
            Err(e) => {
                tracing::warn!(error = %e, ?op, "backend sync failed");
                self.status = SyncStatus::Error;
            }
        }
    }

    fn mark_synced(&mut self) {
        self.status = SyncStatus::Synced;
        self.last_synced_at = Some(self.clock.now());
    }
}
