use axum::extract::State;
use axum::Json;
use habitlog_core::{HabitSummary, HealthStatus, HistoryEntry, MutationOutcome};

use crate::error::ApiFailure;
use crate::AppState;

pub(crate) async fn get_habit(
    State(state): State<AppState>,
) -> Result<Json<HabitSummary>, ApiFailure> {
    state.run(|svc| svc.get_habit()).await.map(Json)
}

pub(crate) async fn complete_habit(
    State(state): State<AppState>,
) -> Result<Json<MutationOutcome>, ApiFailure> {
    state.run(|svc| svc.complete_habit()).await.map(Json)
}

pub(crate) async fn reset_habit(
    State(state): State<AppState>,
) -> Result<Json<MutationOutcome>, ApiFailure> {
    state.run(|svc| svc.reset_habit()).await.map(Json)
}

pub(crate) async fn get_history(
    State(state): State<AppState>,
) -> Result<Json<Vec<HistoryEntry>>, ApiFailure> {
    state.run(|svc| svc.history()).await.map(Json)
}

pub(crate) async fn health() -> Json<HealthStatus> {
    Json(HealthStatus::ok())
}
