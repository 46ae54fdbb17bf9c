//! Server-Sent Events (SSE) stream of state snapshots.

use std::convert::Infallible;

use axum::extract::State;
use axum::response::sse::{Event, KeepAlive, Sse};
use tokio_stream::StreamExt;
use tokio_stream::wrappers::BroadcastStream;
use tokio_stream::wrappers::errors::BroadcastStreamRecvError;

use entryguard_app::ports::{AuditLog, CommandPublisher};
use entryguard_domain::state::SystemState;

use crate::state::AppState;

const EVENT_NAME: &str = "state_update";

/// `GET /api/state/stream`: the current snapshot on connect, then one
/// `state_update` event per broadcast.
///
/// The subscription is taken before the snapshot is read, so no broadcast
/// can fall between the two. A client that falls behind loses the oldest
/// snapshots and keeps streaming.
pub async fn stream<A, P>(
    State(state): State<AppState<A, P>>,
) -> Sse<impl tokio_stream::Stream<Item = Result<Event, Infallible>>>
where
    A: AuditLog + Send + Sync + 'static,
    P: CommandPublisher + Send + Sync + 'static,
{
    let updates = BroadcastStream::new(state.broadcaster.subscribe());
    let current = state.controller.snapshot().await;
    tracing::debug!(
        observers = state.broadcaster.observer_count(),
        "SSE client connected"
    );

    let events = tokio_stream::once(Ok::<_, BroadcastStreamRecvError>(current))
        .chain(updates)
        .filter_map(|result| match result {
            Ok(snapshot) => to_event(&snapshot).map(Ok),
            Err(BroadcastStreamRecvError::Lagged(n)) => {
                tracing::warn!(skipped = n, "SSE subscriber lagged, snapshots dropped");
                None
            }
        });

    Sse::new(events).keep_alive(KeepAlive::default())
}

fn to_event(snapshot: &SystemState) -> Option<Event> {
    match Event::default().event(EVENT_NAME).json_data(snapshot) {
        Ok(event) => Some(event),
        Err(err) => {
            tracing::warn!(%err, "failed to serialize state for SSE stream");
            None
        }
    }
}
