//! Axum router assembly.

use axum::Router;
use axum::routing::get;
use tower_http::trace::TraceLayer;

use entryguard_app::ports::{AuditLog, CommandPublisher};

use crate::state::AppState;

/// Build the top-level axum [`Router`].
///
/// Nests the API under `/api`. Every request passes the audit middleware,
/// and a [`TraceLayer`] logs each HTTP request/response at the `DEBUG`
/// level using the `tracing` ecosystem.
pub fn build<A, P>(state: AppState<A, P>) -> Router
where
    A: AuditLog + Send + Sync + 'static,
    P: CommandPublisher + Send + Sync + 'static,
{
    Router::new()
        .route("/health", get(health_check))
        .nest("/api", crate::api::routes(state.clone()))
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            crate::middleware::audit_request::<A, P>,
        ))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health_check() -> &'static str {
    "OK"
}
