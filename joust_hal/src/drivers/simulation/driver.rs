//! Simulated robot backend.
//!
//! `SimulatedRobot` implements `Hardware` entirely in memory. Tests script
//! its inputs (analog channels, side pin, keystrokes, referee frame) and
//! inspect the last value written to every actuator.

use super::io::IoSimulator;
use super::referee::SimReferee;
use joust_common::command::Side;
use joust_common::hal::driver::{
    Actuators, BurstReader, BurstRecorder, CommandBus, Console, Hardware, ReloadEmitter, Sensors,
    burst_counter,
};
use joust_common::hal::types::{DigitalPin, Indicators, MotorSide, ServoChannel};
use tracing::debug;

/// In-memory robot.
pub struct SimulatedRobot {
    io: IoSimulator,
    referee: SimReferee,
    // Emitter "interrupt" side: sole writer of the burst counter.
    burst_recorder: BurstRecorder,
    bursts: BurstReader,
    emitting: bool,
    auto_complete_bursts: bool,
    pulses_requested: u64,
}

impl SimulatedRobot {
    /// Robot with the side switch low (dark) and bursts completing immediately.
    pub fn new() -> Self {
        let (burst_recorder, bursts) = burst_counter();
        Self {
            io: IoSimulator::new(),
            referee: SimReferee::new(),
            burst_recorder,
            bursts,
            emitting: false,
            auto_complete_bursts: true,
            pulses_requested: 0,
        }
    }

    /// Robot with the side switch set for `side`.
    pub fn with_side(side: Side) -> Self {
        let mut robot = Self::new();
        robot.io.set_pin(DigitalPin::SideSelect, side == Side::Red);
        robot
    }

    /// Scripted I/O.
    pub fn io(&self) -> &IoSimulator {
        &self.io
    }

    /// Scripted I/O, mutable.
    pub fn io_mut(&mut self) -> &mut IoSimulator {
        &mut self.io
    }

    /// Referee responder.
    pub fn referee(&self) -> &SimReferee {
        &self.referee
    }

    /// Referee responder, mutable.
    pub fn referee_mut(&mut self) -> &mut SimReferee {
        &mut self.referee
    }

    /// When false, bursts only complete through [`Self::complete_burst`].
    pub fn set_auto_complete_bursts(&mut self, auto: bool) {
        self.auto_complete_bursts = auto;
    }

    /// Finish the burst in flight (emitter interrupt side).
    pub fn complete_burst(&mut self) {
        if self.emitting {
            self.burst_recorder.record();
        }
    }

    /// True while the reload emitter is enabled.
    pub fn emitter_active(&self) -> bool {
        self.emitting
    }

    /// Total IR pulses requested since creation.
    pub fn pulses_requested(&self) -> u64 {
        self.pulses_requested
    }
}

impl Default for SimulatedRobot {
    fn default() -> Self {
        Self::new()
    }
}

impl Actuators for SimulatedRobot {
    fn set_servo_pulse_width(&mut self, channel: ServoChannel, width_us: u16) {
        self.io.write_servo(channel, width_us);
    }

    fn set_motor_drive(&mut self, side: MotorSide, speed: i16) {
        self.io.write_motor(side, speed);
    }

    fn set_launcher_duty(&mut self, duty: u8) {
        self.io.write_launcher(duty);
    }

    fn set_indicator(&mut self, indicator: Indicators, on: bool) {
        self.io.write_indicator(indicator, on);
    }
}

impl Sensors for SimulatedRobot {
    fn read_analog(&mut self, channel: u8) -> u16 {
        self.io.read_analog(channel)
    }

    fn digital_pin(&mut self, pin: DigitalPin) -> bool {
        self.io.pin(pin)
    }
}

impl CommandBus for SimulatedRobot {
    fn tx_ready(&mut self) -> bool {
        self.referee.tx_ready()
    }

    fn select(&mut self, active: bool) {
        self.referee.select(active);
    }

    fn send(&mut self, byte: u8) {
        self.referee.transfer(byte);
    }

    fn data_ready(&mut self) -> bool {
        self.referee.data_ready()
    }

    fn receive(&mut self) -> u8 {
        self.referee.take()
    }
}

impl Console for SimulatedRobot {
    fn poll_key(&mut self) -> Option<u8> {
        self.io.next_key()
    }
}

impl ReloadEmitter for SimulatedRobot {
    fn start_burst(&mut self, pulses: u32) {
        debug!(pulses, "Reload burst started");
        self.emitting = true;
        self.pulses_requested += u64::from(pulses);
        if self.auto_complete_bursts {
            self.burst_recorder.record();
        }
    }

    fn stop_emitter(&mut self) {
        self.emitting = false;
    }

    fn bursts_completed(&self) -> u32 {
        self.bursts.get()
    }
}

impl Hardware for SimulatedRobot {
    fn name(&self) -> &'static str {
        "simulation"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn side_switch_follows_constructor() {
        let mut red = SimulatedRobot::with_side(Side::Red);
        let mut dark = SimulatedRobot::with_side(Side::Dark);
        assert!(red.digital_pin(DigitalPin::SideSelect));
        assert!(!dark.digital_pin(DigitalPin::SideSelect));
    }

    #[test]
    fn bursts_complete_immediately_by_default() {
        let mut robot = SimulatedRobot::new();
        robot.start_burst(10);
        robot.start_burst(10);
        assert_eq!(robot.bursts_completed(), 2);
        assert_eq!(robot.pulses_requested(), 20);
        robot.stop_emitter();
        assert!(!robot.emitter_active());
    }

    #[test]
    fn manual_bursts_need_completion() {
        let mut robot = SimulatedRobot::new();
        robot.set_auto_complete_bursts(false);
        robot.start_burst(10);
        assert_eq!(robot.bursts_completed(), 0);
        robot.complete_burst();
        assert_eq!(robot.bursts_completed(), 1);
    }

    #[test]
    fn bus_roundtrip_through_trait() {
        let mut robot = SimulatedRobot::new();
        robot.referee_mut().set_status(0x41);
        robot.select(true);
        for _ in 0..3 {
            robot.send(0);
            robot.receive();
        }
        robot.send(0);
        assert!(robot.data_ready());
        assert_eq!(robot.receive(), 0x41);
    }
}
