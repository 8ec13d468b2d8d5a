//! Hardware value types shared between drivers and the core.

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

/// Servo output channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum ServoChannel {
    /// Ball feeder pusher.
    Feeder = 0,
    /// Scanning turret carrying the IR sensors and launcher.
    Turret = 1,
    /// Lance arm.
    Lance = 2,
}

/// Number of servo channels.
pub const SERVO_COUNT: usize = 3;

/// Drive motor side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum MotorSide {
    Left = 0,
    Right = 1,
}

bitflags! {
    /// Indicator LEDs (bit positions match the indicator port).
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Indicators: u8 {
        /// Between rounds.
        const RECESS = 0x08;
        /// Match in progress.
        const MATCH  = 0x10;
        /// Reload request being signalled.
        const RELOAD = 0x20;
    }
}

/// Analog input channel numbers.
pub mod analog {
    /// Left IR beacon detector.
    pub const IR_LEFT: u8 = 0;
    /// Right IR beacon detector.
    pub const IR_RIGHT: u8 = 1;
    /// Right-side tape color sensor.
    pub const TAPE_RIGHT: u8 = 6;
    /// Number of analog channels.
    pub const COUNT: usize = 8;
}

/// Digital input pins polled by the core.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum DigitalPin {
    /// Red/dark side selector, high = red.
    SideSelect = 0,
}

/// Tape color classes seen by the tape sensor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[repr(u8)]
pub enum TapeColor {
    #[default]
    White = 0,
    Red = 1,
    Green = 2,
    Black = 3,
}

impl TapeColor {
    #[inline]
    pub const fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(Self::White),
            1 => Some(Self::Red),
            2 => Some(Self::Green),
            3 => Some(Self::Black),
            _ => None,
        }
    }

    #[inline]
    pub fn from_param(param: u16) -> Option<Self> {
        u8::try_from(param).ok().and_then(Self::from_u8)
    }
}
