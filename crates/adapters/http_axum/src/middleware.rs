//! Request audit and caller-token check.

use std::net::SocketAddr;

use axum::extract::{ConnectInfo, Request, State};
use axum::http::header::AUTHORIZATION;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};

use entryguard_app::ports::{AuditLog, CommandPublisher};
use entryguard_domain::audit::{LogEntry, LogType};

use crate::error::ApiError;
use crate::state::AppState;

const LOG_READER_PATH: &str = "/api/logs";

/// Append an `HTTP_REQUEST` entry for every request except the log reader.
pub async fn audit_request<A, P>(
    State(state): State<AppState<A, P>>,
    request: Request,
    next: Next,
) -> Response
where
    A: AuditLog + Send + Sync + 'static,
    P: CommandPublisher + Send + Sync + 'static,
{
    if request.uri().path() != LOG_READER_PATH {
        let peer = request
            .extensions()
            .get::<ConnectInfo<SocketAddr>>()
            .map_or_else(|| "Unknown IP".to_string(), |info| info.0.ip().to_string());
        let details = format!("Method: {} | URL: {}", request.method(), request.uri());
        state
            .controller
            .record(LogEntry::new(LogType::HttpRequest, details, peer))
            .await;
    }
    next.run(request).await
}

/// Reject control requests whose `Authorization` header does not carry the
/// configured token. Without a configured token every request passes.
pub async fn require_token<A, P>(
    State(state): State<AppState<A, P>>,
    request: Request,
    next: Next,
) -> Response
where
    A: AuditLog + Send + Sync + 'static,
    P: CommandPublisher + Send + Sync + 'static,
{
    let Some(expected) = state.api_token.as_deref() else {
        return next.run(request).await;
    };
    let presented = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok());
    if presented == Some(expected) {
        return next.run(request).await;
    }

    tracing::warn!(uri = %request.uri(), "caller token denied");
    state
        .controller
        .record(LogEntry::new(LogType::AuthFail, "Token denied", "Unknown User"))
        .await;
    ApiError::Unauthorized.into_response()
}
