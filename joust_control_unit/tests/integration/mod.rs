//! Shared rig for the whole-robot scenarios.

mod aim_lance;
mod dispatch;
mod fire_reload;
mod match_flow;
mod orientation_tape;

use joust_common::command::{MatchCommand, Side};
use joust_control_unit::config::JoustConfig;
use joust_control_unit::cycle::build_framework;
use joust_control_unit::framework::Framework;
use joust_hal::drivers::simulation::SimulatedRobot;

pub type Robot = Framework<SimulatedRobot>;

/// Cycles long enough for at least two full referee frames.
pub const FRAME_CYCLES: usize = 40;

pub fn robot() -> Robot {
    robot_on(Side::Dark)
}

pub fn robot_on(side: Side) -> Robot {
    build_framework(SimulatedRobot::with_side(side), &JoustConfig::default()).unwrap()
}

/// Run `cycles` cycles of one tick each.
pub fn run(fw: &mut Robot, cycles: usize) {
    for _ in 0..cycles {
        fw.run_cycle(1).unwrap();
    }
}

/// Put `status` on the referee's status byte and let it propagate.
pub fn referee(fw: &mut Robot, status: u8) {
    fw.hal_mut().referee_mut().set_status(status);
    run(fw, FRAME_CYCLES);
}

pub fn command(fw: &mut Robot, cmd: MatchCommand) {
    referee(fw, cmd as u8);
}

/// Robot that has seen WAIT and is in round `round` (1..=4).
pub fn in_round(round: u8) -> Robot {
    let mut fw = robot();
    run(&mut fw, FRAME_CYCLES);
    for r in 1..=round {
        if r > 1 {
            command(&mut fw, MatchCommand::Recess);
        }
        command(&mut fw, MatchCommand::StartRound);
    }
    assert_eq!(fw.board().round(), round);
    fw
}
