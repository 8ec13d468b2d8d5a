//! Bench keyboard override.
//!
//! Single keystrokes inject the same events the sensors and the referee bus
//! would produce, or write the drive motors directly.

use joust_common::command::MatchCommand;
use joust_common::consts::{BOT_FREQ, MAX_BALLS};
use joust_common::event::{Event, EventKind, ServiceId, TimerId};
use joust_common::hal::types::MotorSide;
use tracing::{debug, trace};

use super::{CheckerIo, EventChecker};
use crate::state::drive;

/// Direct motor write requested by a drive test key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MotorTest {
    Single(MotorSide, i16),
    Translate(i16),
    Forward,
}

/// What a keystroke does.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    Post(ServiceId, Event),
    Motor(MotorTest),
}

fn command(cmd: MatchCommand) -> KeyAction {
    KeyAction::Post(
        ServiceId::Match,
        Event::new(EventKind::NewCommandReceived, cmd as u16),
    )
}

fn to(target: ServiceId, kind: EventKind, param: u16) -> KeyAction {
    KeyAction::Post(target, Event::new(kind, param))
}

/// Look up the override for `key`.
pub fn key_action(key: u8) -> Option<KeyAction> {
    use EventKind::*;
    use MotorTest::*;
    use ServiceId as S;

    let action = match key {
        b'1' => to(S::Command, QueryStatus, 0),
        b'2' => to(S::Command, QueryScore, 0),
        b'3' => to(S::Reload, ReloadBalls, 0),
        b'0' => to(S::Lance, DeployLance, 0),

        b'a' => to(S::Aim, StartAlign, BOT_FREQ),
        b's' => to(S::Aim, StopAligning, 0),
        b'd' => to(S::Aim, SenseBoth, BOT_FREQ),
        b'f' => to(S::Aim, SenseNone, 0),
        b'g' => to(S::Aim, LeftOnly, BOT_FREQ),
        b'h' => to(S::Aim, RightOnly, BOT_FREQ),

        b'u' => to(S::Fire, StartShootingMotors, 0),
        b't' => to(S::Fire, ShootBall, MAX_BALLS),

        b'Q' => command(MatchCommand::Wait),
        b'q' => command(MatchCommand::StartRound),
        b'w' => command(MatchCommand::Recess),
        b'e' => command(MatchCommand::End),

        b'A' => KeyAction::Post(S::Orientation, Event::timeout(TimerId::Pause)),

        b'4' => KeyAction::Motor(Single(MotorSide::Right, 74)),
        b'5' => KeyAction::Motor(Single(MotorSide::Right, 76)),
        b'6' => KeyAction::Motor(Single(MotorSide::Right, 78)),
        b'7' => KeyAction::Motor(Single(MotorSide::Left, -76)),
        b'8' => KeyAction::Motor(Single(MotorSide::Left, -74)),
        b'9' => KeyAction::Motor(Single(MotorSide::Left, -78)),
        b'l' => KeyAction::Motor(Translate(70)),
        b'r' => KeyAction::Motor(Translate(80)),
        b'z' => KeyAction::Motor(Translate(60)),
        b'x' => KeyAction::Motor(Translate(75)),
        b'c' => KeyAction::Motor(Forward),
        b'v' => KeyAction::Motor(Translate(0)),

        _ => return None,
    };
    Some(action)
}

/// Polls the console for one keystroke per cycle.
#[derive(Debug, Default)]
pub struct KeystrokeChecker;

impl EventChecker for KeystrokeChecker {
    fn name(&self) -> &'static str {
        "keystroke"
    }

    fn check(&mut self, io: &mut CheckerIo<'_>) -> bool {
        let Some(key) = io.hal().poll_key() else {
            return false;
        };
        match key_action(key) {
            Some(KeyAction::Post(target, event)) => {
                debug!(key = %char::from(key), to = target.name(), kind = ?event.kind, "Key override");
                io.post(target, event)
            }
            Some(KeyAction::Motor(test)) => {
                debug!(key = %char::from(key), ?test, "Motor test key");
                let hal = io.hal();
                match test {
                    MotorTest::Single(side, speed) => hal.set_motor_drive(side, speed),
                    MotorTest::Translate(speed) => drive::translate(hal, speed),
                    MotorTest::Forward => drive::forward(hal),
                }
                false
            }
            None => {
                trace!(key, "Unmapped key");
                false
            }
        }
    }
}
