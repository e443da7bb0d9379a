//! HTTP backend for habitlog.
//!
//! Routes live under `/api`; see [`router`]. Handlers hand the file work to
//! the blocking pool and the service serializes it.

pub mod error;
mod routes;

use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;
use habitlog_core::{Clock, HabitService, JsonFileStore, StorageError, SystemClock};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::error::ApiFailure;

type SharedService = Arc<HabitService<Arc<dyn Clock>>>;

#[derive(Clone)]
pub struct AppState {
    service: SharedService,
}

impl AppState {
    pub fn new(store: JsonFileStore) -> Self {
        Self::with_clock(store, Arc::new(SystemClock))
    }

    pub fn with_clock(store: JsonFileStore, clock: Arc<dyn Clock>) -> Self {
        Self {
            service: Arc::new(HabitService::with_clock(store, clock)),
        }
    }

    /// Run `op` against the service on the blocking pool.
    async fn run<T, F>(&self, op: F) -> Result<T, ApiFailure>
    where
        T: Send + 'static,
        F: FnOnce(&HabitService<Arc<dyn Clock>>) -> Result<T, StorageError> + Send + 'static,
    {
        let service = Arc::clone(&self.service);
        tokio::task::spawn_blocking(move || op(&service))
            .await
            .map_err(|e| ApiFailure::Internal(e.to_string()))?
            .map_err(ApiFailure::from)
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/habit", get(routes::get_habit))
        .route("/api/habit/complete", post(routes::complete_habit))
        .route("/api/habit/reset", post(routes::reset_habit))
        .route("/api/habit/history", get(routes::get_history))
        .route("/api/health", get(routes::health))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
