//! Tests for the gateway's load and mutation policy.

use super::client::RemoteHabitApi;
use super::gateway::PersistenceGateway;
use super::types::SyncStatus;
use crate::api::{HabitSummary, HealthStatus, MutationOutcome, COMPLETE_MESSAGE, RESET_MESSAGE};
use crate::clock::FixedClock;
use crate::error::{ApiError, StorageError};
use crate::history::{build_history, HistoryEntry};
use crate::records::HabitState;
use crate::storage::{JsonBlobStore, LocalStore, MemoryStore};
use crate::streak::calculate_streak;
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 3, 9, 30, 0).unwrap()
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn state_with(name: &str, dates: &[NaiveDate]) -> HabitState {
    let mut state = HabitState::named(name);
    for d in dates {
        state.records.mark_completed(*d, now());
    }
    state
}

/// In-process backend double.
#[derive(Default)]
struct FakeRemote {
    state: Mutex<HabitState>,
    reachable: AtomicBool,
    fail_calls: AtomicBool,
    health_calls: AtomicUsize,
    mutation_calls: AtomicUsize,
}

impl FakeRemote {
    fn up(state: HabitState) -> Arc<Self> {
        Arc::new(Self {
            state: Mutex::new(state),
            reachable: AtomicBool::new(true),
            ..Self::default()
        })
    }

    fn down() -> Arc<Self> {
        Arc::new(Self::default())
    }

    fn check(&self) -> Result<(), ApiError> {
        if self.reachable.load(Ordering::SeqCst) && !self.fail_calls.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(ApiError::Status { status: 503 })
        }
    }

    fn snapshot(&self) -> HabitState {
        self.state.lock().unwrap().clone()
    }
}

#[async_trait]
impl RemoteHabitApi for Arc<FakeRemote> {
    async fn health(&self) -> Result<HealthStatus, ApiError> {
        self.health_calls.fetch_add(1, Ordering::SeqCst);
        self.check()?;
        Ok(HealthStatus::ok())
    }

    async fn get_habit(&self) -> Result<HabitSummary, ApiError> {
        self.check()?;
        let state = self.snapshot();
        Ok(HabitSummary {
            streak: calculate_streak(&state.records, now().date_naive()),
            completed_today: state.records.is_completed(now().date_naive()),
            name: state.name,
            records: state.records,
        })
    }

    async fn complete_habit(&self) -> Result<MutationOutcome, ApiError> {
        self.mutation_calls.fetch_add(1, Ordering::SeqCst);
        self.check()?;
        let mut state = self.state.lock().unwrap();
        state.records.mark_completed(now().date_naive(), now());
        Ok(MutationOutcome {
            success: true,
            streak: calculate_streak(&state.records, now().date_naive()),
            completed_today: true,
            message: COMPLETE_MESSAGE.into(),
        })
    }

    async fn reset_habit(&self) -> Result<MutationOutcome, ApiError> {
        self.mutation_calls.fetch_add(1, Ordering::SeqCst);
        self.check()?;
        self.state.lock().unwrap().reset();
        Ok(MutationOutcome {
            success: true,
            streak: 0,
            completed_today: false,
            message: RESET_MESSAGE.into(),
        })
    }

    async fn history(&self) -> Result<Vec<HistoryEntry>, ApiError> {
        self.check()?;
        Ok(build_history(&self.snapshot().records, now().date_naive()))
    }
}

/// Local store whose writes can be switched off.
#[derive(Default)]
struct FlakyStore {
    inner: MemoryStore,
    reject_writes: AtomicBool,
}

impl LocalStore for FlakyStore {
    fn load(&self) -> Result<Option<HabitState>, StorageError> {
        self.inner.load()
    }

    fn save(&self, state: &HabitState) -> Result<(), StorageError> {
        if self.reject_writes.load(Ordering::SeqCst) {
            return Err(StorageError::Unavailable("quota exceeded".into()));
        }
        self.inner.save(state)
    }
}

async fn gateway<L: LocalStore>(
    local: L,
    remote: Option<Arc<FakeRemote>>,
) -> PersistenceGateway<L, Arc<FakeRemote>, FixedClock> {
    PersistenceGateway::connect(local, remote, FixedClock(now())).await
}

#[tokio::test]
async fn test_remote_wins_on_load_and_overwrites_local() {
    let local = Arc::new(MemoryStore::with_state(state_with("Drink Water", &[date(2024, 1, 1)])));
    let remote = FakeRemote::up(state_with(
        "Drink Water",
        &[date(2024, 1, 2), date(2024, 1, 3)],
    ));

    let mut gw = gateway(local.clone(), Some(remote)).await;
    let view = gw.load().await.unwrap();

    assert!(gw.remote_available());
    assert_eq!(view.streak, 2);
    assert!(view.completed_today);
    assert_eq!(gw.sync_status(), SyncStatus::Synced);
    assert_eq!(gw.last_synced_at(), Some(now()));

    let stored = local.snapshot().unwrap();
    assert!(!stored.records.is_completed(date(2024, 1, 1)));
    assert!(stored.records.is_completed(date(2024, 1, 3)));
}

#[tokio::test]
async fn test_unreachable_remote_falls_back_to_local() {
    let local = Arc::new(MemoryStore::with_state(state_with("Read", &[date(2024, 1, 3)])));

    let mut gw = gateway(local, Some(FakeRemote::down())).await;
    let view = gw.load().await.unwrap();

    assert!(!gw.remote_available());
    assert_eq!(view.name, "Read");
    assert_eq!(view.streak, 1);
    assert_eq!(gw.sync_status(), SyncStatus::Local);
}

#[tokio::test]
async fn test_failed_remote_fetch_uses_local_and_flags_error() {
    let remote = FakeRemote::up(state_with("Remote", &[]));
    let local = Arc::new(MemoryStore::with_state(state_with("Local", &[])));

    let mut gw = gateway(local, Some(remote.clone())).await;
    remote.fail_calls.store(true, Ordering::SeqCst);
    let view = gw.load().await.unwrap();

    assert_eq!(view.name, "Local");
    assert_eq!(gw.sync_status(), SyncStatus::Error);
}

#[tokio::test]
async fn test_nothing_stored_initializes_default_locally() {
    let local = Arc::new(MemoryStore::new());

    let mut gw = gateway(local.clone(), None).await;
    let view = gw.load().await.unwrap();

    assert_eq!(view.name, "Drink Water");
    assert_eq!(view.streak, 0);
    assert!(!view.completed_today);
    assert_eq!(view.history.len(), 7);
    assert_eq!(local.snapshot(), Some(HabitState::default()));
}

#[tokio::test]
async fn test_default_name_is_configurable() {
    let local = Arc::new(MemoryStore::new());

    let mut gw = gateway(local.clone(), None).await.with_default_name("Stretch");
    let view = gw.load().await.unwrap();

    assert_eq!(view.name, "Stretch");
    assert_eq!(local.snapshot().unwrap().name, "Stretch");
}

#[tokio::test]
async fn test_complete_writes_local_then_syncs() {
    let local = Arc::new(MemoryStore::new());
    let remote = FakeRemote::up(HabitState::default());

    let mut gw = gateway(local.clone(), Some(remote.clone())).await;
    gw.load().await.unwrap();
    let view = gw.complete().await.unwrap();

    assert_eq!(view.streak, 1);
    assert!(view.completed_today);
    assert!(local.snapshot().unwrap().records.is_completed(date(2024, 1, 3)));
    assert!(remote.snapshot().records.is_completed(date(2024, 1, 3)));
    assert_eq!(gw.sync_status(), SyncStatus::Synced);
}

#[tokio::test]
async fn test_complete_twice_is_idempotent() {
    let local = Arc::new(MemoryStore::new());
    let mut gw = gateway(local.clone(), None).await;
    gw.load().await.unwrap();

    let first = gw.complete().await.unwrap();
    let second = gw.complete().await.unwrap();

    assert_eq!(first.streak, second.streak);
    assert_eq!(local.snapshot().unwrap().records.len(), 1);
}

#[tokio::test]
async fn test_remote_failure_on_mutation_keeps_local_write() {
    let local = Arc::new(MemoryStore::new());
    let remote = FakeRemote::up(HabitState::default());

    let mut gw = gateway(local.clone(), Some(remote.clone())).await;
    gw.load().await.unwrap();
    remote.reachable.store(false, Ordering::SeqCst);

    let view = gw.complete().await.unwrap();

    assert!(view.completed_today);
    assert!(local.snapshot().unwrap().records.is_completed(date(2024, 1, 3)));
    assert_eq!(gw.sync_status(), SyncStatus::Error);
    // Still considered available: reachability is not re-checked.
    assert!(gw.remote_available());
}

#[tokio::test]
async fn test_local_write_failure_is_error_and_state_unchanged() {
    let store = Arc::new(FlakyStore::default());
    let remote = FakeRemote::up(HabitState::default());

    let mut gw = gateway(store.clone(), Some(remote.clone())).await;
    gw.load().await.unwrap();
    store.reject_writes.store(true, Ordering::SeqCst);

    let result = gw.complete().await;

    assert!(matches!(result, Err(StorageError::Unavailable(_))));
    assert!(gw.state().records.is_empty());
    assert!(!gw.view().completed_today);
    assert_eq!(remote.mutation_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_reset_clears_everywhere_and_keeps_name() {
    let seeded = state_with("Walk", &[date(2024, 1, 2), date(2024, 1, 3)]);
    let local = Arc::new(MemoryStore::with_state(seeded.clone()));
    let remote = FakeRemote::up(seeded);

    let mut gw = gateway(local.clone(), Some(remote.clone())).await;
    gw.load().await.unwrap();
    let view = gw.reset().await.unwrap();

    assert_eq!(view.name, "Walk");
    assert_eq!(view.streak, 0);
    assert!(view.history.iter().all(|e| !e.completed));
    assert!(local.snapshot().unwrap().records.is_empty());
    assert!(remote.snapshot().records.is_empty());
}

#[tokio::test]
async fn test_remote_probed_once_per_session() {
    let local = Arc::new(MemoryStore::new());
    let remote = FakeRemote::up(HabitState::default());

    let mut gw = gateway(local, Some(remote.clone())).await;
    gw.load().await.unwrap();
    gw.complete().await.unwrap();
    gw.reset().await.unwrap();

    assert_eq!(remote.health_calls.load(Ordering::SeqCst), 1);
    assert_eq!(remote.mutation_calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_offline_session_never_calls_remote() {
    let local = Arc::new(MemoryStore::new());
    let remote = FakeRemote::down();

    let mut gw = gateway(local, Some(remote.clone())).await;
    gw.load().await.unwrap();
    // Backend comes up mid-session; it is not picked up.
    remote.reachable.store(true, Ordering::SeqCst);
    gw.complete().await.unwrap();

    assert_eq!(remote.mutation_calls.load(Ordering::SeqCst), 0);
    assert_eq!(gw.sync_status(), SyncStatus::Local);
}

#[tokio::test]
async fn test_local_blob_without_name_keeps_records() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("local_state.json");
    std::fs::write(
        &path,
        r#"{"habitTracker": {"records": {
            "2024-01-02": {"completed": true, "timestamp": "2024-01-02T08:00:00.000Z"},
            "2024-01-03": {"completed": true, "timestamp": "2024-01-03T08:00:00.000Z"}
        }}}"#,
    )
    .unwrap();

    let mut gw = gateway(JsonBlobStore::new(&path), None).await;
    let view = gw.load().await.unwrap();

    assert_eq!(view.name, "Drink Water");
    assert_eq!(view.streak, 2);
    assert!(view.completed_today);

    gw.reset().await.unwrap();
    gw.complete().await.unwrap();
    let stored = JsonBlobStore::new(&path).load().unwrap().unwrap();
    assert_eq!(stored.records.len(), 1);
    assert_eq!(stored.name, "Drink Water");
}

#[tokio::test]
async fn test_local_blob_with_untimed_entry_survives_complete() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("local_state.json");
    std::fs::write(
        &path,
        r#"{"habitTracker": {"name": "Read", "records": {"2024-01-02": {"completed": true}}}}"#,
    )
    .unwrap();

    let mut gw = gateway(JsonBlobStore::new(&path), None).await;
    gw.load().await.unwrap();
    let view = gw.complete().await.unwrap();

    assert_eq!(view.name, "Read");
    assert_eq!(view.streak, 2);
    assert_eq!(gw.history(), view.history);

    let stored = JsonBlobStore::new(&path).load().unwrap().unwrap();
    assert!(stored.records.is_completed(date(2024, 1, 2)));
    assert!(stored.records.is_completed(date(2024, 1, 3)));
}
