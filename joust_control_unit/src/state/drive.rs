//! Drive helpers and the timed-move service.
//!
//! Motor speeds are signed; positive turns a wheel counter-clockwise. The
//! right wheel is mounted mirrored, so straight travel needs opposite signs.

use joust_common::event::{Event, ServiceId, TimerId};
use joust_common::hal::driver::Actuators;
use joust_common::hal::types::MotorSide;
use tracing::debug;

use crate::context::ServiceStatus;
use crate::error::ServiceFault;
use crate::framework::service::{Ctx, Service};

/// Right wheel speed for forward travel.
pub const FORWARD_RIGHT: i16 = 75;
/// Left wheel speed for forward travel.
pub const FORWARD_LEFT: i16 = -74;

pub fn forward(hal: &mut (impl Actuators + ?Sized)) {
    hal.set_motor_drive(MotorSide::Right, FORWARD_RIGHT);
    hal.set_motor_drive(MotorSide::Left, FORWARD_LEFT);
}

pub fn reverse(hal: &mut (impl Actuators + ?Sized)) {
    hal.set_motor_drive(MotorSide::Right, -FORWARD_RIGHT);
    hal.set_motor_drive(MotorSide::Left, -FORWARD_LEFT);
}

/// Straight move at `speed` (negative backs up).
pub fn translate(hal: &mut (impl Actuators + ?Sized), speed: i16) {
    hal.set_motor_drive(MotorSide::Left, -speed);
    hal.set_motor_drive(MotorSide::Right, speed);
}

pub fn stop(hal: &mut (impl Actuators + ?Sized)) {
    translate(hal, 0);
}

/// Straight move that the Drive service ends after `ticks`.
pub fn timed_translate(ctx: &mut Ctx<'_>, speed: i16, ticks: u32) {
    translate(ctx.hal(), speed);
    ctx.init_timer_for(ServiceId::Drive, TimerId::DriveStop, ticks);
}

// ─── Service ────────────────────────────────────────────────────────

/// Ends timed moves.
#[derive(Debug, Default)]
pub struct DriveService {
    moves_completed: u32,
}

impl DriveService {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Service for DriveService {
    fn id(&self) -> ServiceId {
        ServiceId::Drive
    }

    fn init(&mut self, ctx: &mut Ctx<'_>) -> Result<(), ServiceFault> {
        stop(ctx.hal());
        Ok(())
    }

    fn run(&mut self, event: Event, ctx: &mut Ctx<'_>) -> Result<(), ServiceFault> {
        if event.is_timeout(TimerId::DriveStop) {
            stop(ctx.hal());
            self.moves_completed += 1;
            debug!(moves = self.moves_completed, "Timed move complete");
        }
        Ok(())
    }

    fn status(&self) -> ServiceStatus {
        ServiceStatus::Drive {
            moves_completed: self.moves_completed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use joust_hal::drivers::simulation::SimulatedRobot;

    #[test]
    fn helpers_set_mirrored_speeds() {
        let mut robot = SimulatedRobot::new();
        forward(&mut robot);
        assert_eq!(robot.io().motor(MotorSide::Right), 75);
        assert_eq!(robot.io().motor(MotorSide::Left), -74);

        reverse(&mut robot);
        assert_eq!(robot.io().motor(MotorSide::Right), -75);
        assert_eq!(robot.io().motor(MotorSide::Left), 74);

        translate(&mut robot, 65);
        assert_eq!(robot.io().motor(MotorSide::Right), 65);
        assert_eq!(robot.io().motor(MotorSide::Left), -65);

        stop(&mut robot);
        assert_eq!(robot.io().motor(MotorSide::Right), 0);
        assert_eq!(robot.io().motor(MotorSide::Left), 0);
    }
}
