//! Simulated robot I/O.
//!
//! `IoSimulator` keeps:
//! - the last value written to every actuator
//! - scripted analog channel values and digital pin levels
//! - pending console keystrokes

use joust_common::hal::types::{
    DigitalPin, Indicators, MotorSide, SERVO_COUNT, ServoChannel, analog,
};
use std::collections::VecDeque;
use std::sync::mpsc::Receiver;
use tracing::trace;

/// Actuator outputs and sensor inputs of the simulated robot.
#[derive(Debug, Default)]
pub struct IoSimulator {
    servos: [u16; SERVO_COUNT],
    motors: [i16; 2],
    launcher_duty: u8,
    indicators: Indicators,
    analog: [u16; analog::COUNT],
    side_pin: bool,
    keys: VecDeque<u8>,
    key_source: Option<Receiver<u8>>,
    servo_writes: u64,
}

impl IoSimulator {
    /// Create an I/O simulator with all outputs at zero.
    pub fn new() -> Self {
        Self::default()
    }

    // ── Actuator side ──

    pub(crate) fn write_servo(&mut self, channel: ServoChannel, width_us: u16) {
        trace!(?channel, width_us, "servo");
        self.servos[channel as usize] = width_us;
        self.servo_writes += 1;
    }

    pub(crate) fn write_motor(&mut self, side: MotorSide, speed: i16) {
        trace!(?side, speed, "motor");
        self.motors[side as usize] = speed;
    }

    pub(crate) fn write_launcher(&mut self, duty: u8) {
        self.launcher_duty = duty;
    }

    pub(crate) fn write_indicator(&mut self, indicator: Indicators, on: bool) {
        self.indicators.set(indicator, on);
    }

    /// Last pulse width written to `channel` (0 if never written).
    pub fn servo(&self, channel: ServoChannel) -> u16 {
        self.servos[channel as usize]
    }

    /// Total servo writes since creation.
    pub fn servo_writes(&self) -> u64 {
        self.servo_writes
    }

    /// Last speed written to a drive motor.
    pub fn motor(&self, side: MotorSide) -> i16 {
        self.motors[side as usize]
    }

    /// Current launcher duty.
    pub fn launcher_duty(&self) -> u8 {
        self.launcher_duty
    }

    /// Indicator LEDs currently lit.
    pub fn indicators(&self) -> Indicators {
        self.indicators
    }

    // ── Sensor side ──

    /// Script the value returned by analog `channel`. Out-of-range channels are ignored.
    pub fn set_analog(&mut self, channel: u8, value: u16) {
        if let Some(slot) = self.analog.get_mut(channel as usize) {
            *slot = value;
        }
    }

    pub(crate) fn read_analog(&self, channel: u8) -> u16 {
        self.analog.get(channel as usize).copied().unwrap_or(0)
    }

    /// Script a digital pin level.
    pub fn set_pin(&mut self, pin: DigitalPin, level: bool) {
        match pin {
            DigitalPin::SideSelect => self.side_pin = level,
        }
    }

    pub(crate) fn pin(&self, pin: DigitalPin) -> bool {
        match pin {
            DigitalPin::SideSelect => self.side_pin,
        }
    }

    // ── Console ──

    /// Queue a keystroke.
    pub fn push_key(&mut self, key: u8) {
        self.keys.push_back(key);
    }

    /// Forward keystrokes arriving on `source` into the console.
    pub fn attach_key_source(&mut self, source: Receiver<u8>) {
        self.key_source = Some(source);
    }

    pub(crate) fn next_key(&mut self) -> Option<u8> {
        if let Some(key) = self.keys.pop_front() {
            return Some(key);
        }
        self.key_source.as_ref().and_then(|rx| rx.try_recv().ok())
    }
}
