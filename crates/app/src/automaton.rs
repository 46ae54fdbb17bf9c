//! Security automaton: owns the entry-delay timer and turns sensor events
//! and timer expiries into [`StateChange`]s.
//!
//! The automaton never performs IO itself. It moves `SystemState.security`
//! along the transition table, starts or cancels the timer, and hands back
//! the commands and audit entry the caller must dispatch.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;

use entryguard_domain::audit::LogEntry;
use entryguard_domain::command::{Command, CommandSource};
use entryguard_domain::error::InvariantViolation;
use entryguard_domain::security::{SecurityState, TimerDirective, Transition, Trigger};
use entryguard_domain::sensor::SensorEvent;
use entryguard_domain::state::SystemState;

use crate::timer::{EntryDelayTimer, TimerToken};

/// Future returned by an [`ExpiryHook`].
pub type ExpiryFuture = Pin<Box<dyn Future<Output = ()> + Send>>;

/// Callback run by the timer task when a countdown elapses.
pub type ExpiryHook = Arc<dyn Fn(TimerToken) -> ExpiryFuture + Send + Sync>;

/// Outcome of one applied transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StateChange {
    pub from: SecurityState,
    pub to: SecurityState,
    /// Commands to dispatch, in order.
    pub commands: Vec<Command>,
    /// `SECURITY` or `ALARM` record describing the transition.
    pub audit: LogEntry,
}

/// The security finite-state machine plus its single timer.
pub struct SecurityAutomaton {
    entry_delay: Duration,
    timer: EntryDelayTimer,
    on_expire: ExpiryHook,
}

impl SecurityAutomaton {
    /// Create an automaton whose timer calls `on_expire` after `entry_delay`.
    #[must_use]
    pub fn new(entry_delay: Duration, on_expire: ExpiryHook) -> Self {
        Self {
            entry_delay,
            timer: EntryDelayTimer::new(),
            on_expire,
        }
    }

    /// Feed one sensor event.
    ///
    /// Returns `Ok(None)` when the event matches no transition for the
    /// current state.
    ///
    /// # Errors
    ///
    /// Returns an [`InvariantViolation`] if the timer could not be armed;
    /// `state` is left untouched in that case.
    pub fn apply_event(
        &mut self,
        state: &mut SystemState,
        event: &SensorEvent,
    ) -> Result<Option<StateChange>, InvariantViolation> {
        let Some(trigger) = Trigger::from_event(event) else {
            return Ok(None);
        };
        let Some(transition) = state.security().on(trigger) else {
            tracing::debug!(
                state = %state.security(),
                ?trigger,
                "no transition for trigger in current state"
            );
            return Ok(None);
        };

        let actor = match trigger {
            Trigger::ArmPressed | Trigger::DisarmPressed => event.button_actor(),
            Trigger::MotionDetected | Trigger::EntryDelayExpired => CommandSource::System,
        };
        self.enter(state, &transition, actor).map(Some)
    }

    /// Handle the expiry of the countdown identified by `token`.
    ///
    /// Returns `None` for an expiry that lost the race against a cancel.
    pub fn on_timer_expired(
        &mut self,
        state: &mut SystemState,
        token: TimerToken,
    ) -> Option<StateChange> {
        if !self.timer.claim(token) {
            return None;
        }
        let Some(transition) = state.security().on(Trigger::EntryDelayExpired) else {
            tracing::error!(
                state = %state.security(),
                "entry-delay timer expired outside ENTRY_DELAY"
            );
            return None;
        };
        self.enter(state, &transition, CommandSource::System).ok()
    }

    /// Whether an entry-delay countdown is live.
    #[must_use]
    pub fn timer_armed(&self) -> bool {
        self.timer.is_armed()
    }

    fn enter(
        &mut self,
        state: &mut SystemState,
        transition: &Transition,
        actor: CommandSource,
    ) -> Result<StateChange, InvariantViolation> {
        match transition.timer() {
            TimerDirective::Start => {
                if self.timer.cancel() {
                    tracing::warn!("stale entry-delay timer cancelled before re-arming");
                }
                let hook = Arc::clone(&self.on_expire);
                self.timer.start(self.entry_delay, move |token| hook(token))?;
            }
            TimerDirective::Cancel => {
                self.timer.cancel();
            }
            TimerDirective::Keep => {}
        }

        state.apply(transition);
        tracing::info!(
            from = %transition.from(),
            to = %transition.to(),
            actor = %actor,
            "security state changed"
        );

        Ok(StateChange {
            from: transition.from(),
            to: transition.to(),
            commands: transition.commands().to_vec(),
            audit: LogEntry::new(transition.log_type(), transition.details(), actor.label()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use entryguard_domain::audit::LogType;
    use entryguard_domain::device::{Device, DeviceCode};
    use entryguard_domain::sensor::SensorTopic;
    use entryguard_domain::time::now;
    use tokio::sync::mpsc;

    const DELAY: Duration = Duration::from_secs(10);

    fn automaton() -> (SecurityAutomaton, mpsc::UnboundedReceiver<TimerToken>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let hook: ExpiryHook = Arc::new(move |token| -> ExpiryFuture {
            let tx = tx.clone();
            Box::pin(async move {
                let _ = tx.send(token);
            })
        });
        (SecurityAutomaton::new(DELAY, hook), rx)
    }

    fn bus(topic: SensorTopic, payload: &str) -> SensorEvent {
        SensorEvent::from_bus(topic, payload, now())
    }

    #[tokio::test]
    async fn should_arm_and_attribute_to_physical_button() {
        let (mut automaton, _rx) = automaton();
        let mut state = SystemState::default();

        let change = automaton
            .apply_event(&mut state, &bus(SensorTopic::ButtonArm, "PRESSED"))
            .unwrap()
            .unwrap();

        assert_eq!(state.security(), SecurityState::Armed);
        assert_eq!(change.from, SecurityState::Disarmed);
        assert_eq!(change.to, SecurityState::Armed);
        assert_eq!(change.audit.log_type, LogType::Security);
        assert_eq!(change.audit.user, "Physical Button");
        assert_eq!(change.commands[1].code(), DeviceCode::ArmChirp);
        assert!(!automaton.timer_armed());
    }

    #[tokio::test]
    async fn should_leave_state_unchanged_for_unmatched_events() {
        let (mut automaton, _rx) = automaton();
        let mut state = SystemState::default();

        for event in [
            bus(SensorTopic::Motion, "ON"),
            bus(SensorTopic::ButtonDisarm, "PRESSED"),
            bus(SensorTopic::ButtonArm, "HELD"),
        ] {
            let change = automaton.apply_event(&mut state, &event).unwrap();
            assert!(change.is_none());
            assert_eq!(state.security(), SecurityState::Disarmed);
        }
    }

    #[tokio::test]
    async fn should_arm_timer_on_motion_while_armed() {
        let (mut automaton, _rx) = automaton();
        let mut state = SystemState::default();
        automaton
            .apply_event(&mut state, &bus(SensorTopic::ButtonArm, "PRESSED"))
            .unwrap();

        let change = automaton
            .apply_event(&mut state, &bus(SensorTopic::Motion, "ON"))
            .unwrap()
            .unwrap();

        assert_eq!(state.security(), SecurityState::EntryDelay);
        assert_eq!(change.audit.user, "System");
        assert!(automaton.timer_armed());
    }

    #[tokio::test(start_paused = true)]
    async fn should_ignore_expiry_that_lost_race_with_disarm() {
        let (mut automaton, mut rx) = automaton();
        let mut state = SystemState::default();
        automaton
            .apply_event(&mut state, &bus(SensorTopic::ButtonArm, "PRESSED"))
            .unwrap();
        automaton
            .apply_event(&mut state, &bus(SensorTopic::Motion, "ON"))
            .unwrap();

        // let the countdown fire, but process the disarm before the expiry
        let token = rx.recv().await.unwrap();
        automaton
            .apply_event(&mut state, &bus(SensorTopic::ButtonDisarm, "PRESSED"))
            .unwrap();

        assert!(automaton.on_timer_expired(&mut state, token).is_none());
        assert_eq!(state.security(), SecurityState::Disarmed);
    }

    #[tokio::test(start_paused = true)]
    async fn should_trigger_alarm_on_claimed_expiry() {
        let (mut automaton, mut rx) = automaton();
        let mut state = SystemState::default();
        automaton
            .apply_event(&mut state, &bus(SensorTopic::ButtonArm, "PRESSED"))
            .unwrap();
        automaton
            .apply_event(&mut state, &bus(SensorTopic::Motion, "ON"))
            .unwrap();

        let token = rx.recv().await.unwrap();
        let change = automaton.on_timer_expired(&mut state, token).unwrap();

        assert_eq!(state.security(), SecurityState::AlarmTriggered);
        assert_eq!(change.audit.log_type, LogType::Alarm);
        assert_eq!(change.commands[0].device(), Device::Buzzer);
        assert_eq!(change.commands[0].code(), DeviceCode::Alarm);
        assert!(automaton.on_timer_expired(&mut state, token).is_none());
    }

    #[tokio::test]
    async fn should_attribute_simulated_disarm_to_dashboard() {
        let (mut automaton, _rx) = automaton();
        let mut state = SystemState::default();
        automaton
            .apply_event(
                &mut state,
                &SensorEvent::simulated(SensorTopic::ButtonArm, "PRESSED", now()),
            )
            .unwrap();
        let change = automaton
            .apply_event(
                &mut state,
                &SensorEvent::simulated(SensorTopic::ButtonDisarm, "PRESSED", now()),
            )
            .unwrap()
            .unwrap();

        assert_eq!(change.audit.user, "Web Dashboard");
        assert_eq!(change.audit.details, "System DISARMED");
    }
}
