//! Audit log reader.

use axum::Json;
use axum::extract::State;
use axum::response::{IntoResponse, Response};

use entryguard_app::ports::{AuditLog, CommandPublisher};
use entryguard_domain::audit::LogEntry;

use crate::error::ApiError;
use crate::state::AppState;

/// Possible responses from the list endpoint.
pub enum ListResponse {
    Ok(Json<Vec<LogEntry>>),
}

impl IntoResponse for ListResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Ok(json) => json.into_response(),
        }
    }
}

/// `GET /api/logs`: every audit entry, oldest first.
pub async fn list<A, P>(State(state): State<AppState<A, P>>) -> Result<ListResponse, ApiError>
where
    A: AuditLog + Send + Sync + 'static,
    P: CommandPublisher + Send + Sync + 'static,
{
    let entries = state.controller.audit_entries().await?;
    Ok(ListResponse::Ok(Json(entries)))
}
