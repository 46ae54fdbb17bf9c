//! Dashboard commands for the fan, LED and buzzer.

use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};

use entryguard_app::ports::{AuditLog, CommandPublisher};
use entryguard_domain::device::{Device, DeviceCode};

use crate::error::ApiError;
use crate::state::AppState;

/// Request body for a device command.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct SetDeviceRequest {
    /// Wire code, e.g. `ON` or `FAST_STROBE`.
    pub state: Option<String>,
}

#[derive(Serialize)]
pub struct SetDeviceBody {
    success: bool,
    state: DeviceCode,
}

/// Possible responses from the set endpoints.
pub enum SetResponse {
    Ok(Json<SetDeviceBody>),
}

impl IntoResponse for SetResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Ok(json) => json.into_response(),
        }
    }
}

async fn set<A, P>(
    state: &AppState<A, P>,
    device: Device,
    body: Result<Json<SetDeviceRequest>, JsonRejection>,
) -> Result<SetResponse, ApiError>
where
    A: AuditLog + Send + Sync + 'static,
    P: CommandPublisher + Send + Sync + 'static,
{
    let Json(req) = body.map_err(|rejection| {
        tracing::debug!(
            %device,
            error = %rejection.body_text(),
            "rejected device request body"
        );
        ApiError::MissingState
    })?;
    let code = req
        .state
        .filter(|code| !code.trim().is_empty())
        .ok_or(ApiError::MissingState)?;
    let command = state.controller.set_device(device, code.trim()).await?;
    Ok(SetResponse::Ok(Json(SetDeviceBody {
        success: true,
        state: command.code(),
    })))
}

/// `POST /api/fan`
pub async fn set_fan<A, P>(
    State(state): State<AppState<A, P>>,
    body: Result<Json<SetDeviceRequest>, JsonRejection>,
) -> Result<SetResponse, ApiError>
where
    A: AuditLog + Send + Sync + 'static,
    P: CommandPublisher + Send + Sync + 'static,
{
    set(&state, Device::Fan, body).await
}

/// `POST /api/led`
pub async fn set_led<A, P>(
    State(state): State<AppState<A, P>>,
    body: Result<Json<SetDeviceRequest>, JsonRejection>,
) -> Result<SetResponse, ApiError>
where
    A: AuditLog + Send + Sync + 'static,
    P: CommandPublisher + Send + Sync + 'static,
{
    set(&state, Device::Led, body).await
}

/// `POST /api/buzzer`
pub async fn set_buzzer<A, P>(
    State(state): State<AppState<A, P>>,
    body: Result<Json<SetDeviceRequest>, JsonRejection>,
) -> Result<SetResponse, ApiError>
where
    A: AuditLog + Send + Sync + 'static,
    P: CommandPublisher + Send + Sync + 'static,
{
    set(&state, Device::Buzzer, body).await
}
