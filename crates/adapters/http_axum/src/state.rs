//! Shared application state for axum handlers.

use std::sync::Arc;

use entryguard_app::broadcaster::StateBroadcaster;
use entryguard_app::controller::SecurityController;
use entryguard_app::ports::{AuditLog, CommandPublisher};

/// Controller type served over HTTP: observers are fed by the shared
/// [`StateBroadcaster`].
pub type Controller<A, P> = SecurityController<A, P, Arc<StateBroadcaster>>;

/// Application state shared across all axum handlers.
///
/// Generic over the audit log and bus publisher to avoid dynamic dispatch.
/// `Clone` is implemented manually so the underlying types themselves do not
/// need to be `Clone`.
pub struct AppState<A, P> {
    /// Serialization domain for every state change.
    pub controller: Controller<A, P>,
    /// Source of snapshots for SSE subscribers.
    pub broadcaster: Arc<StateBroadcaster>,
    /// Caller token required on control routes, if any.
    pub api_token: Option<Arc<str>>,
}

impl<A, P> Clone for AppState<A, P> {
    fn clone(&self) -> Self {
        Self {
            controller: self.controller.clone(),
            broadcaster: Arc::clone(&self.broadcaster),
            api_token: self.api_token.clone(),
        }
    }
}

impl<A, P> AppState<A, P>
where
    A: AuditLog + Send + Sync + 'static,
    P: CommandPublisher + Send + Sync + 'static,
{
    pub fn new(
        controller: Controller<A, P>,
        broadcaster: Arc<StateBroadcaster>,
        api_token: Option<String>,
    ) -> Self {
        Self {
            controller,
            broadcaster,
            api_token: api_token.map(Arc::from),
        }
    }
}
