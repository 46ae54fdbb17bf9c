//! JSON API handler modules.

#[allow(clippy::missing_errors_doc)]
pub mod devices;
#[allow(clippy::missing_errors_doc)]
pub mod logs;
#[allow(clippy::missing_errors_doc)]
pub mod mock;
pub mod sse;
pub mod status;

use axum::Router;
use axum::routing::{get, post};

use entryguard_app::ports::{AuditLog, CommandPublisher};

use crate::state::AppState;

/// Build the `/api` sub-router.
///
/// Control routes (device commands and simulations) sit behind the caller
/// token check; reads do not.
pub fn routes<A, P>(state: AppState<A, P>) -> Router<AppState<A, P>>
where
    A: AuditLog + Send + Sync + 'static,
    P: CommandPublisher + Send + Sync + 'static,
{
    let control = Router::new()
        .route("/fan", post(devices::set_fan::<A, P>))
        .route("/led", post(devices::set_led::<A, P>))
        .route("/buzzer", post(devices::set_buzzer::<A, P>))
        .route("/mock/motion", post(mock::motion::<A, P>))
        .route("/mock/arm", post(mock::arm::<A, P>))
        .route("/mock/disarm", post(mock::disarm::<A, P>))
        .route_layer(axum::middleware::from_fn_with_state(
            state,
            crate::middleware::require_token::<A, P>,
        ));

    Router::new()
        .route("/state", get(status::get::<A, P>))
        .route("/state/stream", get(sse::stream::<A, P>))
        .route("/logs", get(logs::list::<A, P>))
        .merge(control)
}
