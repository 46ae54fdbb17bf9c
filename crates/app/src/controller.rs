//! Security controller: the single serialization domain of the system.
//!
//! Every inbound bus message, timer expiry, external command and simulation
//! enters the same [`tokio::sync::Mutex`] before touching [`SystemState`]
//! or the automaton. Audit appends and bus publishes happen while the lock is
//! held, so the audit trail follows causal order. Observer delivery does not:
//! the broadcaster only enqueues a snapshot and each observer drains its own
//! buffer outside the lock.

use std::sync::{Arc, Weak};
use std::time::Duration;

use tokio::sync::Mutex;

use entryguard_domain::audit::{LogEntry, LogType};
use entryguard_domain::command::{Command, CommandSource};
use entryguard_domain::device::{Device, MotionState};
use entryguard_domain::error::{EntryGuardError, ValidationError};
use entryguard_domain::sensor::{PRESSED, SensorEvent, SensorTopic};
use entryguard_domain::state::SystemState;
use entryguard_domain::time::now;

use crate::automaton::{ExpiryFuture, ExpiryHook, SecurityAutomaton, StateChange};
use crate::dispatcher::CommandDispatcher;
use crate::ports::{AuditLog, BusMessageHandler, CommandPublisher, StatePublisher};
use crate::router;
use crate::timer::TimerToken;

/// Timing knobs for the controller.
#[derive(Debug, Clone, Copy)]
pub struct ControllerSettings {
    /// Grace period between motion while armed and the alarm.
    pub entry_delay: Duration,
    /// How long a simulated motion stays `ON` before it is reset.
    pub motion_reset: Duration,
}

impl Default for ControllerSettings {
    fn default() -> Self {
        Self {
            entry_delay: Duration::from_secs(10),
            motion_reset: Duration::from_secs(3),
        }
    }
}

struct Core {
    state: SystemState,
    automaton: SecurityAutomaton,
}

struct Inner<A, P, S> {
    core: Mutex<Core>,
    dispatcher: CommandDispatcher<A, P, S>,
    motion_reset: Duration,
}

/// Owns the mirrored state and the automaton; cheap to clone.
pub struct SecurityController<A, P, S> {
    inner: Arc<Inner<A, P, S>>,
}

impl<A, P, S> Clone for SecurityController<A, P, S> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<A, P, S> SecurityController<A, P, S>
where
    A: AuditLog + Send + Sync + 'static,
    P: CommandPublisher + Send + Sync + 'static,
    S: StatePublisher + Send + Sync + 'static,
{
    /// Create a controller in the `DISARMED` state with every device `OFF`.
    pub fn new(settings: ControllerSettings, dispatcher: CommandDispatcher<A, P, S>) -> Self {
        let inner = Arc::new_cyclic(|weak: &Weak<Inner<A, P, S>>| {
            let weak = weak.clone();
            let on_expire: ExpiryHook = Arc::new(move |token| -> ExpiryFuture {
                let weak = weak.clone();
                Box::pin(async move {
                    if let Some(inner) = weak.upgrade() {
                        inner.expire(token).await;
                    }
                })
            });
            Inner {
                core: Mutex::new(Core {
                    state: SystemState::default(),
                    automaton: SecurityAutomaton::new(settings.entry_delay, on_expire),
                }),
                dispatcher,
                motion_reset: settings.motion_reset,
            }
        });
        Self { inner }
    }

    /// Current mirrored state.
    pub async fn snapshot(&self) -> SystemState {
        self.inner.core.lock().await.state
    }

    /// Whether an entry-delay countdown is live.
    pub async fn timer_armed(&self) -> bool {
        self.inner.core.lock().await.automaton.timer_armed()
    }

    /// Route one decoded sensor event through telemetry and the automaton.
    ///
    /// # Errors
    ///
    /// Returns [`EntryGuardError::Invariant`] when the automaton detects a
    /// corrupt state.
    pub async fn handle_sensor_event(
        &self,
        event: SensorEvent,
    ) -> Result<Option<StateChange>, EntryGuardError> {
        let mut core = self.inner.core.lock().await;
        self.inner.process(&mut core, &event).await
    }

    /// Dispatch an externally issued command.
    pub async fn execute(&self, command: Command) {
        let mut core = self.inner.core.lock().await;
        self.inner.dispatcher.dispatch(&mut core.state, command).await;
    }

    /// Validate and dispatch a dashboard command for `device`.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] for codes the device does not accept;
    /// nothing is dispatched or audited in that case.
    pub async fn set_device(&self, device: Device, code: &str) -> Result<Command, ValidationError> {
        let command = Command::parse(device, code, CommandSource::WebDashboard)?;
        self.execute(command).await;
        Ok(command)
    }

    /// # Errors
    ///
    /// See [`set_device`](Self::set_device).
    pub async fn set_fan(&self, code: &str) -> Result<Command, ValidationError> {
        self.set_device(Device::Fan, code).await
    }

    /// # Errors
    ///
    /// See [`set_device`](Self::set_device).
    pub async fn set_led(&self, code: &str) -> Result<Command, ValidationError> {
        self.set_device(Device::Led, code).await
    }

    /// # Errors
    ///
    /// See [`set_device`](Self::set_device).
    pub async fn set_buzzer(&self, code: &str) -> Result<Command, ValidationError> {
        self.set_device(Device::Buzzer, code).await
    }

    /// Simulate motion at the entryway; it resets to `OFF` after the
    /// configured delay.
    ///
    /// # Errors
    ///
    /// See [`handle_sensor_event`](Self::handle_sensor_event).
    pub async fn simulate_motion(&self) -> Result<Option<StateChange>, EntryGuardError> {
        let change = self
            .simulate("Motion Simulated via Dashboard", SensorTopic::Motion, "ON")
            .await?;

        let controller = self.clone();
        tokio::spawn(async move {
            tokio::time::sleep(controller.inner.motion_reset).await;
            let reset = SensorEvent::simulated(SensorTopic::Motion, "OFF", now());
            if let Err(err) = controller.handle_sensor_event(reset).await {
                tracing::error!(%err, "failed to reset simulated motion");
            }
        });

        Ok(change)
    }

    /// Simulate a press of the arm button.
    ///
    /// # Errors
    ///
    /// See [`handle_sensor_event`](Self::handle_sensor_event).
    pub async fn simulate_arm_button(&self) -> Result<Option<StateChange>, EntryGuardError> {
        self.simulate(
            "Arm Button Simulated via Dashboard",
            SensorTopic::ButtonArm,
            PRESSED,
        )
        .await
    }

    /// Simulate a press of the disarm button.
    ///
    /// # Errors
    ///
    /// See [`handle_sensor_event`](Self::handle_sensor_event).
    pub async fn simulate_disarm_button(&self) -> Result<Option<StateChange>, EntryGuardError> {
        self.simulate(
            "Disarm Button Simulated via Dashboard",
            SensorTopic::ButtonDisarm,
            PRESSED,
        )
        .await
    }

    /// Append an audit entry in order with every state change.
    pub async fn record(&self, entry: LogEntry) {
        let _core = self.inner.core.lock().await;
        self.inner.dispatcher.audit().record(entry).await;
    }

    /// Every audit entry, oldest first.
    ///
    /// # Errors
    ///
    /// Propagates storage errors from the audit log.
    pub async fn audit_entries(&self) -> Result<Vec<LogEntry>, EntryGuardError> {
        self.inner.dispatcher.audit().read_all().await
    }

    async fn simulate(
        &self,
        details: &'static str,
        topic: SensorTopic,
        payload: &'static str,
    ) -> Result<Option<StateChange>, EntryGuardError> {
        let source = CommandSource::WebDashboard;
        let mut core = self.inner.core.lock().await;
        self.inner
            .dispatcher
            .audit()
            .record(LogEntry::new(LogType::Simulation, details, source.label()))
            .await;
        let event = SensorEvent::simulated(topic, payload, now());
        self.inner.process(&mut core, &event).await
    }
}

impl<A, P, S> Inner<A, P, S>
where
    A: AuditLog + Send + Sync + 'static,
    P: CommandPublisher + Send + Sync + 'static,
    S: StatePublisher + Send + Sync + 'static,
{
    async fn process(
        &self,
        core: &mut Core,
        event: &SensorEvent,
    ) -> Result<Option<StateChange>, EntryGuardError> {
        let Core { state, automaton } = core;

        let mut telemetry_changed = false;
        if event.topic == SensorTopic::Motion {
            let Ok(motion) = event.payload.parse::<MotionState>() else {
                tracing::debug!(payload = %event.payload, "ignoring malformed motion payload");
                return Ok(None);
            };
            state.set_motion(motion);
            telemetry_changed = true;
            if motion == MotionState::On {
                self.dispatcher
                    .audit()
                    .record(LogEntry::new(
                        LogType::Sensor,
                        "Motion Detected at Entryway",
                        event.source.label(),
                    ))
                    .await;
            }
        }

        let change = match automaton.apply_event(state, event) {
            Ok(change) => change,
            Err(violation) => {
                tracing::error!(%violation, "security automaton invariant violated");
                if telemetry_changed {
                    self.dispatcher.broadcast(state);
                }
                return Err(violation.into());
            }
        };

        match &change {
            Some(change) => self.realize(state, change).await,
            None if telemetry_changed => self.dispatcher.broadcast(state),
            None => {}
        }
        Ok(change)
    }

    async fn expire(&self, token: TimerToken) {
        let mut core = self.core.lock().await;
        let Core { state, automaton } = &mut *core;
        if let Some(change) = automaton.on_timer_expired(state, token) {
            tracing::warn!("entry delay elapsed without disarm, alarm triggered");
            self.realize(state, &change).await;
        }
    }

    async fn realize(&self, state: &mut SystemState, change: &StateChange) {
        self.dispatcher.audit().record(change.audit.clone()).await;
        self.dispatcher.dispatch_all(state, &change.commands).await;
    }
}

impl<A, P, S> BusMessageHandler for SecurityController<A, P, S>
where
    A: AuditLog + Send + Sync + 'static,
    P: CommandPublisher + Send + Sync + 'static,
    S: StatePublisher + Send + Sync + 'static,
{
    async fn on_bus_message(&self, topic: &str, payload: &[u8]) {
        let Some(event) = router::decode(topic, payload, now()) else {
            return;
        };
        tracing::debug!(topic, payload = %event.payload, "sensor message received");
        if let Err(err) = self.handle_sensor_event(event).await {
            tracing::error!(%err, topic, "failed to process sensor message");
        }
    }
}
