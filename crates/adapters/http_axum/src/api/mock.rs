//! Dashboard-driven sensor simulations.

use axum::Json;
use axum::extract::State;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use entryguard_app::ports::{AuditLog, CommandPublisher};

use crate::error::ApiError;
use crate::state::AppState;

#[derive(Serialize)]
pub struct Ack {
    success: bool,
}

/// Possible responses from the simulation endpoints.
pub enum SimulateResponse {
    Ok(Json<Ack>),
}

impl SimulateResponse {
    fn ok() -> Self {
        Self::Ok(Json(Ack { success: true }))
    }
}

impl IntoResponse for SimulateResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Ok(json) => json.into_response(),
        }
    }
}

/// `POST /api/mock/motion`: motion `ON`, reset to `OFF` shortly after.
pub async fn motion<A, P>(State(state): State<AppState<A, P>>) -> Result<SimulateResponse, ApiError>
where
    A: AuditLog + Send + Sync + 'static,
    P: CommandPublisher + Send + Sync + 'static,
{
    state.controller.simulate_motion().await?;
    Ok(SimulateResponse::ok())
}

/// `POST /api/mock/arm`
pub async fn arm<A, P>(State(state): State<AppState<A, P>>) -> Result<SimulateResponse, ApiError>
where
    A: AuditLog + Send + Sync + 'static,
    P: CommandPublisher + Send + Sync + 'static,
{
    state.controller.simulate_arm_button().await?;
    Ok(SimulateResponse::ok())
}

/// `POST /api/mock/disarm`
pub async fn disarm<A, P>(State(state): State<AppState<A, P>>) -> Result<SimulateResponse, ApiError>
where
    A: AuditLog + Send + Sync + 'static,
    P: CommandPublisher + Send + Sync + 'static,
{
    state.controller.simulate_disarm_button().await?;
    Ok(SimulateResponse::ok())
}
