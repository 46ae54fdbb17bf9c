//! Current system state.

use axum::Json;
use axum::extract::State;

use entryguard_app::ports::{AuditLog, CommandPublisher};
use entryguard_domain::state::SystemState;

use crate::state::AppState;

/// `GET /api/state`
pub async fn get<A, P>(State(state): State<AppState<A, P>>) -> Json<SystemState>
where
    A: AuditLog + Send + Sync + 'static,
    P: CommandPublisher + Send + Sync + 'static,
{
    Json(state.controller.snapshot().await)
}
