//! Security state machine: the transition table, with no timers or IO.
//!
//! | State | Trigger | Next |
//! |---|---|---|
//! | `DISARMED` | arm button | `ARMED` |
//! | `ARMED` | motion `ON` | `ENTRY_DELAY` |
//! | `ARMED` | disarm button | `DISARMED` |
//! | `ENTRY_DELAY` | disarm button | `DISARMED` |
//! | `ENTRY_DELAY` | timer expiry | `ALARM_TRIGGERED` |
//! | `ALARM_TRIGGERED` | disarm button | `DISARMED` |
//!
//! Any other pairing is a legal no-op.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::audit::LogType;
use crate::command::Command;
use crate::device::{Device, DeviceCode};
use crate::sensor::{PRESSED, SensorEvent, SensorTopic};

/// State of the security automaton.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SecurityState {
    #[default]
    Disarmed,
    Armed,
    EntryDelay,
    AlarmTriggered,
}

impl SecurityState {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Disarmed => "DISARMED",
            Self::Armed => "ARMED",
            Self::EntryDelay => "ENTRY_DELAY",
            Self::AlarmTriggered => "ALARM_TRIGGERED",
        }
    }

    /// Look up the transition for `trigger` in the current state.
    ///
    /// Returns `None` when the table has no row for the pair.
    #[must_use]
    pub fn on(self, trigger: Trigger) -> Option<Transition> {
        use DeviceCode::{Alarm, ArmChirp, DisarmChirp, EntryBeep, FastStrobe, Off, On};

        let transition = match (self, trigger) {
            (Self::Disarmed, Trigger::ArmPressed) => Transition::new(
                self,
                Self::Armed,
                LogType::Security,
                "System ARMED",
                [(Device::Led, On), (Device::Buzzer, ArmChirp)],
                TimerDirective::Keep,
            ),
            (Self::Armed, Trigger::MotionDetected) => Transition::new(
                self,
                Self::EntryDelay,
                LogType::Security,
                "Entry Delay Started - Possible Intrusion",
                [(Device::Led, FastStrobe), (Device::Buzzer, EntryBeep)],
                TimerDirective::Start,
            ),
            (Self::Armed, Trigger::DisarmPressed) => Transition::new(
                self,
                Self::Disarmed,
                LogType::Security,
                "System DISARMED",
                [(Device::Led, Off), (Device::Buzzer, DisarmChirp)],
                TimerDirective::Keep,
            ),
            (Self::EntryDelay, Trigger::DisarmPressed) => Transition::new(
                self,
                Self::Disarmed,
                LogType::Security,
                "System DISARMED - Alarm Cancelled",
                [(Device::Led, Off), (Device::Buzzer, DisarmChirp)],
                TimerDirective::Cancel,
            ),
            (Self::EntryDelay, Trigger::EntryDelayExpired) => Transition::new(
                self,
                Self::AlarmTriggered,
                LogType::Alarm,
                "ALARM TRIGGERED - Intrusion Confirmed",
                [(Device::Buzzer, Alarm), (Device::Led, FastStrobe)],
                TimerDirective::Keep,
            ),
            (Self::AlarmTriggered, Trigger::DisarmPressed) => Transition::new(
                self,
                Self::Disarmed,
                LogType::Security,
                "System DISARMED - Alarm Silenced",
                [(Device::Led, Off), (Device::Buzzer, Off)],
                TimerDirective::Keep,
            ),
            _ => return None,
        };
        Some(transition)
    }
}

impl fmt::Display for SecurityState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Something the automaton reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
    ArmPressed,
    DisarmPressed,
    MotionDetected,
    EntryDelayExpired,
}

impl Trigger {
    /// Classify a sensor event. Payloads other than `PRESSED` for buttons
    /// and `ON` for motion carry no trigger.
    #[must_use]
    pub fn from_event(event: &SensorEvent) -> Option<Self> {
        if event.is(SensorTopic::ButtonArm, PRESSED) {
            Some(Self::ArmPressed)
        } else if event.is(SensorTopic::ButtonDisarm, PRESSED) {
            Some(Self::DisarmPressed)
        } else if event.is(SensorTopic::Motion, "ON") {
            Some(Self::MotionDetected)
        } else {
            None
        }
    }
}

/// What a transition asks of the entry-delay timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerDirective {
    Keep,
    Start,
    Cancel,
}

/// One row of the transition table, resolved.
///
/// Only [`SecurityState::on`] builds these, so holding one proves the move
/// from `from` to `to` is legal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    from: SecurityState,
    to: SecurityState,
    log_type: LogType,
    details: &'static str,
    commands: [Command; 2],
    timer: TimerDirective,
}

impl Transition {
    fn new(
        from: SecurityState,
        to: SecurityState,
        log_type: LogType,
        details: &'static str,
        commands: [(Device, DeviceCode); 2],
        timer: TimerDirective,
    ) -> Self {
        Self {
            from,
            to,
            log_type,
            details,
            commands: commands.map(|(device, code)| Command::automatic(device, code)),
            timer,
        }
    }

    #[must_use]
    pub fn from(&self) -> SecurityState {
        self.from
    }

    #[must_use]
    pub fn to(&self) -> SecurityState {
        self.to
    }

    /// Audit category for this transition (`SECURITY` or `ALARM`).
    #[must_use]
    pub fn log_type(&self) -> LogType {
        self.log_type
    }

    #[must_use]
    pub fn details(&self) -> &'static str {
        self.details
    }

    /// Commands to dispatch, in order.
    #[must_use]
    pub fn commands(&self) -> &[Command] {
        &self.commands
    }

    #[must_use]
    pub fn timer(&self) -> TimerDirective {
        self.timer
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::now;

    const ALL_STATES: [SecurityState; 4] = [
        SecurityState::Disarmed,
        SecurityState::Armed,
        SecurityState::EntryDelay,
        SecurityState::AlarmTriggered,
    ];

    const ALL_TRIGGERS: [Trigger; 4] = [
        Trigger::ArmPressed,
        Trigger::DisarmPressed,
        Trigger::MotionDetected,
        Trigger::EntryDelayExpired,
    ];

    fn codes(transition: &Transition) -> Vec<(Device, DeviceCode)> {
        transition
            .commands()
            .iter()
            .map(|cmd| (cmd.device(), cmd.code()))
            .collect()
    }

    #[test]
    fn should_define_exactly_six_transitions() {
        let rows = ALL_STATES
            .iter()
            .flat_map(|state| ALL_TRIGGERS.iter().map(move |t| state.on(*t)))
            .flatten()
            .count();
        assert_eq!(rows, 6);
    }

    #[test]
    fn should_arm_from_disarmed() {
        let t = SecurityState::Disarmed.on(Trigger::ArmPressed).unwrap();
        assert_eq!(t.to(), SecurityState::Armed);
        assert_eq!(t.log_type(), LogType::Security);
        assert_eq!(
            codes(&t),
            vec![(Device::Led, DeviceCode::On), (Device::Buzzer, DeviceCode::ArmChirp)]
        );
        assert_eq!(t.timer(), TimerDirective::Keep);
    }

    #[test]
    fn should_start_timer_when_motion_detected_while_armed() {
        let t = SecurityState::Armed.on(Trigger::MotionDetected).unwrap();
        assert_eq!(t.to(), SecurityState::EntryDelay);
        assert_eq!(t.timer(), TimerDirective::Start);
        assert_eq!(
            codes(&t),
            vec![
                (Device::Led, DeviceCode::FastStrobe),
                (Device::Buzzer, DeviceCode::EntryBeep)
            ]
        );
    }

    #[test]
    fn should_cancel_timer_when_disarmed_during_entry_delay() {
        let t = SecurityState::EntryDelay.on(Trigger::DisarmPressed).unwrap();
        assert_eq!(t.to(), SecurityState::Disarmed);
        assert_eq!(t.timer(), TimerDirective::Cancel);
        assert_eq!(t.details(), "System DISARMED - Alarm Cancelled");
    }

    #[test]
    fn should_raise_alarm_on_expiry() {
        let t = SecurityState::EntryDelay.on(Trigger::EntryDelayExpired).unwrap();
        assert_eq!(t.to(), SecurityState::AlarmTriggered);
        assert_eq!(t.log_type(), LogType::Alarm);
        assert_eq!(
            codes(&t),
            vec![
                (Device::Buzzer, DeviceCode::Alarm),
                (Device::Led, DeviceCode::FastStrobe)
            ]
        );
    }

    #[test]
    fn should_silence_buzzer_when_disarmed_from_alarm() {
        let t = SecurityState::AlarmTriggered.on(Trigger::DisarmPressed).unwrap();
        assert_eq!(
            codes(&t),
            vec![(Device::Led, DeviceCode::Off), (Device::Buzzer, DeviceCode::Off)]
        );
    }

    #[test]
    fn should_ignore_unlisted_pairs() {
        assert!(SecurityState::Disarmed.on(Trigger::MotionDetected).is_none());
        assert!(SecurityState::Disarmed.on(Trigger::DisarmPressed).is_none());
        assert!(SecurityState::Armed.on(Trigger::ArmPressed).is_none());
        assert!(SecurityState::Armed.on(Trigger::EntryDelayExpired).is_none());
        assert!(SecurityState::EntryDelay.on(Trigger::MotionDetected).is_none());
        assert!(SecurityState::AlarmTriggered.on(Trigger::EntryDelayExpired).is_none());
    }

    #[test]
    fn should_classify_sensor_events() {
        let ts = now();
        let arm = SensorEvent::from_bus(SensorTopic::ButtonArm, "PRESSED", ts);
        let motion_off = SensorEvent::from_bus(SensorTopic::Motion, "OFF", ts);
        let released = SensorEvent::from_bus(SensorTopic::ButtonDisarm, "RELEASED", ts);
        assert_eq!(Trigger::from_event(&arm), Some(Trigger::ArmPressed));
        assert_eq!(Trigger::from_event(&motion_off), None);
        assert_eq!(Trigger::from_event(&released), None);
    }

    #[test]
    fn should_serialize_state_in_screaming_case() {
        let json = serde_json::to_string(&SecurityState::AlarmTriggered).unwrap();
        assert_eq!(json, "\"ALARM_TRIGGERED\"");
    }
}
