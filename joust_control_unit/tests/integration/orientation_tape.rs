//! Integration test: tape debounce and homing moves.
//!
//! Validates: a tape color is confirmed on exactly the 400th consecutive
//! poll, green retargets red after the delay, red homes the robot, and the
//! stop-moving failsafe homes it when no tape is ever seen.

use joust_common::consts::ONE_SEC;
use joust_common::event::{ServiceId, TimerId};
use joust_common::hal::types::{MotorSide, TapeColor, analog};
use joust_control_unit::checkers::tape::CONFIRM_POLLS;
use joust_control_unit::state::match_ctl::STOP_MOVING_TICKS;
use joust_control_unit::state::orientation::{GREEN_TO_RED_TICKS, HOMING_SPEED};

use super::{Robot, in_round, run};

const GREEN_RAW: u16 = 400;
const RED_RAW: u16 = 290;

fn tape(fw: &mut Robot, raw: u16) {
    fw.hal_mut().io_mut().set_analog(analog::TAPE_RIGHT, raw);
}

// ── Tests ───────────────────────────────────────────────────────────

#[test]
fn green_confirmed_on_exact_poll_count() {
    let mut fw = in_round(1);
    tape(&mut fw, GREEN_RAW);

    run(&mut fw, CONFIRM_POLLS as usize - 1);
    assert!(!fw.timers().is_running(TimerId::Tape));
    run(&mut fw, 1);
    assert!(fw.timers().is_running(TimerId::Tape));
    assert_eq!(fw.timers().owner(TimerId::Tape), Some(ServiceId::Orientation));
}

#[test]
fn green_then_red_homes_forward_in_charging_round() {
    let mut fw = in_round(1);
    tape(&mut fw, GREEN_RAW);
    run(&mut fw, CONFIRM_POLLS as usize);
    run(&mut fw, GREEN_TO_RED_TICKS as usize);
    assert_eq!(fw.board().tape_target(), TapeColor::Red);

    tape(&mut fw, RED_RAW);
    run(&mut fw, CONFIRM_POLLS as usize);
    assert_eq!(fw.hal().io().motor(MotorSide::Right), HOMING_SPEED);
    assert_eq!(fw.hal().io().motor(MotorSide::Left), -HOMING_SPEED);
    assert!(fw.timers().is_running(TimerId::DriveStop));

    run(&mut fw, (ONE_SEC * 3 / 8) as usize);
    assert_eq!(fw.hal().io().motor(MotorSide::Right), 0);
    assert_eq!(fw.hal().io().motor(MotorSide::Left), 0);
}

#[test]
fn red_before_green_is_ignored() {
    let mut fw = in_round(1);
    tape(&mut fw, RED_RAW);
    run(&mut fw, CONFIRM_POLLS as usize + 10);

    assert_eq!(fw.board().tape_target(), TapeColor::Green);
    assert!(!fw.timers().is_running(TimerId::DriveStop));
    assert!(!fw.timers().is_running(TimerId::Tape));
}

#[test]
fn failsafe_homes_when_no_tape_seen() {
    let mut fw = in_round(1);
    run(&mut fw, STOP_MOVING_TICKS as usize);

    assert_eq!(fw.hal().io().motor(MotorSide::Right), HOMING_SPEED);
    assert_eq!(fw.timers().owner(TimerId::DriveStop), Some(ServiceId::Drive));
    assert!(fw.timers().is_running(TimerId::DriveStop));
}
