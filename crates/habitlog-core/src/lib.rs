//! # habitlog Core Library
//!
//! Business logic for a single-habit tracker. The HTTP backend and the CLI
//! client are thin layers over this crate.
//!
//! ## Architecture
//!
//! - **Records**: completed calendar dates, keyed `YYYY-MM-DD`
//! - **Streak / History**: pure derivations from the records and "today"
//! - **Service**: serialized get/complete/reset over the JSON state file
//! - **Sync**: client gateway reconciling a local copy with the backend
//! - **Storage**: JSON state files and TOML configuration
//!
//! ## Key Components
//!
//! - [`HabitService`]: backend operations behind one mutex
//! - [`PersistenceGateway`]: remote-wins-on-load, local-first-on-write client
//! - [`Config`]: application configuration management

pub mod api;
pub mod clock;
pub mod error;
pub mod history;
pub mod records;
pub mod service;
pub mod storage;
pub mod streak;
pub mod sync;

pub use api::{HabitSummary, HealthStatus, MutationOutcome};
pub use clock::{Clock, FixedClock, SystemClock};
pub use error::{ApiError, ConfigError, CoreError, StorageError};
pub use history::{build_history, HistoryEntry};
pub use records::{CompletionEntry, HabitState, RecordStore, DEFAULT_HABIT_NAME};
pub use service::HabitService;
pub use storage::{Config, JsonBlobStore, JsonFileStore, LocalStore, MemoryStore};
pub use streak::calculate_streak;
pub use sync::{ApiClient, HabitView, PersistenceGateway, RemoteHabitApi, SyncStatus};
