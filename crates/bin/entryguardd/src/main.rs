//! # entryguardd: entryguard daemon
//!
//! Composition root that wires all adapters together and starts the server.
//!
//! ## Responsibilities
//! - Load configuration (config file, env vars)
//! - Initialize structured logging
//! - Open the JSON Lines audit log
//! - Connect to the MQTT broker, or run in simulation mode when disabled
//! - Construct the security controller, injecting adapters via port traits
//! - Build the axum router, bind to a TCP port and serve
//! - Handle graceful shutdown (SIGINT)
//!
//! ## Dependency rule
//! This is the **only** crate that depends on all other crates.
//! It is the wiring layer: no domain logic belongs here.

mod config;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use tracing_subscriber::EnvFilter;

use entryguard_adapter_audit_jsonl::JsonlAuditLog;
use entryguard_adapter_http_axum::router;
use entryguard_adapter_http_axum::state::AppState;
use entryguard_app::audit_trail::AuditTrail;
use entryguard_app::broadcaster::StateBroadcaster;
use entryguard_app::controller::{ControllerSettings, SecurityController};
use entryguard_app::dispatcher::CommandDispatcher;

use crate::config::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::load().context("failed to load configuration")?;
    init_tracing(&config.logging.filter);

    // Audit log
    let audit_log = JsonlAuditLog::open(&config.audit.path)
        .await
        .context("failed to open audit log")?;

    // Observers
    let broadcaster = Arc::new(StateBroadcaster::new(config.security.broadcast_capacity));

    // Message bus
    let (publisher, session) = if config.mqtt.enabled {
        let (publisher, session) = entryguard_adapter_mqtt::connect(&config.mqtt);
        (Some(publisher), Some(session))
    } else {
        tracing::warn!("MQTT disabled, running in simulation mode");
        (None, None)
    };

    // Controller
    let dispatcher = CommandDispatcher::new(
        AuditTrail::new(audit_log, config.audit_write_timeout()),
        publisher,
        Arc::clone(&broadcaster),
    );
    let controller = SecurityController::new(
        ControllerSettings {
            entry_delay: config.entry_delay(),
            motion_reset: config.motion_reset(),
        },
        dispatcher,
    );
    let bus_task = session.map(|session| session.spawn(controller.clone()));

    // HTTP
    let state = AppState::new(controller, broadcaster, config.api.token.clone());
    let app = router::build(state);

    let bind_addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {bind_addr}"))?;
    tracing::info!(%bind_addr, "entryguardd listening");

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await
    .context("HTTP server failed")?;

    if let Some(task) = bus_task {
        task.abort();
    }
    tracing::info!("entryguardd stopped");
    Ok(())
}

fn init_tracing(filter: &str) {
    let filter = EnvFilter::try_new(filter).unwrap_or_else(|err| {
        eprintln!("invalid log filter {filter:?} ({err}), falling back to info");
        EnvFilter::new("info")
    });
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(%err, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutdown signal received");
}
