//! Integration test: IR alignment, lance strokes and the round-3 volley.
//!
//! The IR detectors are scripted on the simulated analog channels; the IR
//! checker turns changes into sightings for Aim.

use joust_common::consts::MAX_BALLS;
use joust_common::event::{ServiceId, TimerId};
use joust_common::hal::types::{MotorSide, ServoChannel, analog};
use joust_control_unit::state::aim::VOLLEY_DRIVE_DELAY;
use joust_control_unit::state::drive::FORWARD_RIGHT;
use joust_control_unit::state::lance::{
    DEPLOY_HOLD_TICKS, LANCE_DEPLOY_US, LANCE_RETRACT_US, RETRACT_TICKS,
};
use joust_control_unit::state::{AimPhase, LancePhase};

use super::{FRAME_CYCLES, Robot, in_round, robot, run};

const BOT_RAW: u16 = 280;
const DARK_RAW: u16 = 50;

fn beacon(fw: &mut Robot, left: u16, right: u16) {
    let io = fw.hal_mut().io_mut();
    io.set_analog(analog::IR_LEFT, left);
    io.set_analog(analog::IR_RIGHT, right);
}

// ── Tests ───────────────────────────────────────────────────────────

#[test]
fn aligning_on_bot_deploys_lance() {
    let mut fw = in_round(1);
    beacon(&mut fw, BOT_RAW, BOT_RAW);
    run(&mut fw, 3);

    assert_eq!(fw.board().aim_phase(), AimPhase::Aligned);
    assert_eq!(fw.board().lance_phase(), LancePhase::Deployed);
    assert_eq!(fw.hal().io().servo(ServoChannel::Lance), LANCE_DEPLOY_US);
    assert!(!fw.timers().is_running(TimerId::AimSweep));
    // No volley outside round 3: still charging.
    assert_eq!(fw.hal().io().motor(MotorSide::Right), FORWARD_RIGHT);
}

#[test]
fn lance_strokes_once_per_alignment() {
    let mut fw = in_round(1);
    beacon(&mut fw, BOT_RAW, BOT_RAW);
    run(&mut fw, (DEPLOY_HOLD_TICKS + RETRACT_TICKS) as usize + 10);

    // Beacon still in view, but no new edge: the lance stays home.
    assert_eq!(fw.board().aim_phase(), AimPhase::Aligned);
    assert_eq!(fw.board().lance_phase(), LancePhase::Retracted);
    assert_eq!(fw.hal().io().servo(ServoChannel::Lance), LANCE_RETRACT_US);

    // Losing and regaining the beacon is a new entry into Aligned.
    beacon(&mut fw, DARK_RAW, DARK_RAW);
    run(&mut fw, 3);
    assert_eq!(fw.board().aim_phase(), AimPhase::Active);
    beacon(&mut fw, BOT_RAW, BOT_RAW);
    run(&mut fw, 3);
    assert_eq!(fw.board().lance_phase(), LancePhase::Deployed);
}

#[test]
fn one_sided_sighting_steers_sweep() {
    let mut fw = in_round(1);
    beacon(&mut fw, BOT_RAW, DARK_RAW);
    run(&mut fw, 3);
    assert_eq!(fw.board().aim_phase(), AimPhase::LeftAligned);
    assert!(fw.timers().is_running(TimerId::AimSweep));

    beacon(&mut fw, DARK_RAW, BOT_RAW);
    run(&mut fw, 3);
    assert_eq!(fw.board().aim_phase(), AimPhase::RightAligned);
    assert_eq!(fw.board().lance_phase(), LancePhase::Retracted);
}

#[test]
fn disarmed_aim_ignores_beacon() {
    let mut fw = robot();
    run(&mut fw, FRAME_CYCLES);
    beacon(&mut fw, BOT_RAW, BOT_RAW);
    run(&mut fw, 20);

    assert_eq!(fw.board().aim_phase(), AimPhase::Deactivated);
    assert_eq!(fw.board().lance_phase(), LancePhase::Retracted);
}

#[test]
fn round_three_alignment_fires_volley_then_resumes() {
    let mut fw = in_round(3);
    beacon(&mut fw, BOT_RAW, BOT_RAW);
    run(&mut fw, 3);

    assert_eq!(fw.board().aim_phase(), AimPhase::Aligned);
    assert_eq!(fw.hal().io().motor(MotorSide::Right), 0);
    assert_eq!(fw.hal().io().motor(MotorSide::Left), 0);
    assert_eq!(fw.board().balls_remaining(), MAX_BALLS - 1);
    assert_eq!(fw.timers().owner(TimerId::AimSearch), Some(ServiceId::Aim));

    run(&mut fw, VOLLEY_DRIVE_DELAY as usize);
    assert_eq!(fw.hal().io().motor(MotorSide::Right), FORWARD_RIGHT);
}
