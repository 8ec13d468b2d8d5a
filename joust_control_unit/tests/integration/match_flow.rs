//! Integration test: match sequencing driven by referee commands.
//!
//! Validates: WAIT → round 1 charge → recess → round 2 volley → reload
//! recess → round 3 charge, plus END and WAIT from a running round, after
//! which the robot stays put.

use joust_common::command::MatchCommand;
use joust_common::consts::{BOT_FREQ, GOAL_FREQ, MAX_BALLS};
use joust_common::event::{ServiceId, TimerId};
use joust_common::hal::types::{Indicators, MotorSide, ServoChannel, TapeColor};
use joust_control_unit::state::aim::{TURRET_INIT_US, TURRET_MAX_US, TURRET_MIN_US};
use joust_control_unit::state::drive::{FORWARD_LEFT, FORWARD_RIGHT};
use joust_control_unit::state::fire::{FEEDER_SHOOT_US, LAUNCHER_DUTY};
use joust_control_unit::state::match_ctl::{SEARCH_BLIND_TICKS, STOP_MOVING_TICKS};
use joust_control_unit::state::{AimPhase, MatchPhase};

use super::{FRAME_CYCLES, Robot, command, in_round, robot, run};

fn charging(fw: &Robot) -> bool {
    let io = fw.hal().io();
    io.motor(MotorSide::Right) == FORWARD_RIGHT && io.motor(MotorSide::Left) == FORWARD_LEFT
}

fn stopped(fw: &Robot) -> bool {
    let io = fw.hal().io();
    io.motor(MotorSide::Right) == 0 && io.motor(MotorSide::Left) == 0
}

// ── Tests ───────────────────────────────────────────────────────────

#[test]
fn wait_spins_launcher_and_parks_turret() {
    let mut fw = robot();
    run(&mut fw, FRAME_CYCLES);

    let io = fw.hal().io();
    assert_eq!(io.launcher_duty(), LAUNCHER_DUTY);
    assert_eq!(io.servo(ServoChannel::Turret), TURRET_MAX_US);
    assert!(!io.indicators().contains(Indicators::MATCH));
    assert_eq!(fw.board().round(), 0);
    assert_eq!(fw.board().match_phase(), MatchPhase::Recess);
    assert!(stopped(&fw));
}

#[test]
fn first_round_charges_the_bot() {
    let fw = in_round(1);

    assert_eq!(fw.board().match_phase(), MatchPhase::PasDArmes);
    assert!(fw.hal().io().indicators().contains(Indicators::MATCH));
    assert!(!fw.hal().io().indicators().contains(Indicators::RECESS));
    assert!(charging(&fw));
    assert_eq!(fw.board().aim_phase(), AimPhase::Active);
    assert_eq!(fw.board().aim_target(), BOT_FREQ);
    assert_eq!(fw.board().tape_target(), TapeColor::Green);
    assert_eq!(fw.timers().owner(TimerId::StopMoving), Some(ServiceId::Orientation));
    assert!(fw.timers().is_running(TimerId::StopMoving));
}

#[test]
fn end_stops_everything() {
    let mut fw = in_round(1);
    command(&mut fw, MatchCommand::End);

    assert!(stopped(&fw));
    assert_eq!(fw.hal().io().launcher_duty(), 0);
    assert!(!fw.hal().io().indicators().contains(Indicators::MATCH));
    assert_eq!(fw.board().aim_phase(), AimPhase::Deactivated);
    assert_eq!(fw.board().match_phase(), MatchPhase::Recess);
    assert!(!fw.timers().is_running(TimerId::AimSweep));
}

#[test]
fn end_cancels_search_retry() {
    let mut fw = in_round(2);
    command(&mut fw, MatchCommand::End);
    assert!(!fw.timers().is_running(TimerId::MatchSearch));

    run(&mut fw, SEARCH_BLIND_TICKS as usize);
    assert!(stopped(&fw));
    assert_eq!(fw.board().aim_phase(), AimPhase::Deactivated);
}

#[test]
fn end_cancels_stop_moving_failsafe() {
    let mut fw = in_round(1);
    command(&mut fw, MatchCommand::End);
    assert!(!fw.timers().is_running(TimerId::StopMoving));

    run(&mut fw, STOP_MOVING_TICKS as usize);
    assert!(stopped(&fw));
    assert!(!fw.timers().is_running(TimerId::DriveStop));
}

#[test]
fn wait_mid_round_stays_parked() {
    let mut fw = in_round(2);
    command(&mut fw, MatchCommand::Wait);

    run(&mut fw, STOP_MOVING_TICKS as usize);
    assert!(stopped(&fw));
    assert_eq!(fw.hal().io().servo(ServoChannel::Turret), TURRET_MAX_US);
    assert_eq!(fw.board().round(), 0);
}

#[test]
fn wait_mid_round_resets_counter() {
    let mut fw = in_round(1);
    command(&mut fw, MatchCommand::Wait);

    assert_eq!(fw.board().round(), 0);
    assert_eq!(fw.board().match_phase(), MatchPhase::Recess);
    assert!(stopped(&fw));
    assert_eq!(fw.hal().io().launcher_duty(), LAUNCHER_DUTY);

    command(&mut fw, MatchCommand::StartRound);
    assert_eq!(fw.board().round(), 1);
}

#[test]
fn start_ignored_while_round_running() {
    let mut fw = in_round(1);
    command(&mut fw, MatchCommand::SuddenDeath);
    assert_eq!(fw.board().round(), 1);
    assert_eq!(fw.board().match_phase(), MatchPhase::PasDArmes);
}

#[test]
fn sudden_death_starts_a_round() {
    let mut fw = robot();
    run(&mut fw, FRAME_CYCLES);
    command(&mut fw, MatchCommand::SuddenDeath);
    assert_eq!(fw.board().round(), 1);
    assert!(charging(&fw));
}

#[test]
fn recess_after_charge_retargets_goal() {
    let mut fw = in_round(1);
    command(&mut fw, MatchCommand::Recess);

    assert_eq!(fw.board().match_phase(), MatchPhase::Recess);
    assert!(fw.hal().io().indicators().contains(Indicators::RECESS));
    assert_eq!(fw.board().aim_target(), GOAL_FREQ);
    assert_eq!(fw.hal().io().launcher_duty(), LAUNCHER_DUTY);
}

#[test]
fn second_round_fires_blind_volley() {
    let fw = in_round(2);

    assert!(!fw.hal().io().indicators().contains(Indicators::RECESS));
    // Aim was only searching for the goal, so the turret drops to its rest.
    assert_eq!(fw.board().aim_phase(), AimPhase::Deactivated);
    assert_eq!(fw.hal().io().servo(ServoChannel::Turret), TURRET_MIN_US);
    assert_eq!(fw.hal().io().servo(ServoChannel::Feeder), FEEDER_SHOOT_US);
    assert_eq!(fw.board().balls_remaining(), MAX_BALLS - 1);
    assert_eq!(fw.timers().owner(TimerId::MatchSearch), Some(ServiceId::Match));
    assert!(fw.timers().is_running(TimerId::MatchSearch));
}

#[test]
fn recess_after_round_two_reloads() {
    let mut fw = in_round(2);
    command(&mut fw, MatchCommand::Recess);

    let io = fw.hal().io();
    assert!(io.indicators().contains(Indicators::RECESS));
    assert!(io.indicators().contains(Indicators::RELOAD));
    assert_eq!(io.servo(ServoChannel::Turret), TURRET_INIT_US);
    assert_eq!(io.launcher_duty(), 0);
    assert!(fw.hal().emitter_active());
    assert_eq!(fw.board().balls_remaining(), MAX_BALLS);
}

#[test]
fn third_round_charges_again() {
    let fw = in_round(3);

    assert_eq!(fw.board().match_phase(), MatchPhase::PasDArmes);
    assert!(charging(&fw));
    assert_eq!(fw.board().aim_phase(), AimPhase::Active);
    assert_eq!(fw.board().aim_target(), BOT_FREQ);
}

#[test]
fn search_timeout_backs_off_and_rearms_aim() {
    let mut fw = in_round(2);
    run(&mut fw, SEARCH_BLIND_TICKS as usize);

    let io = fw.hal().io();
    assert_eq!(io.motor(MotorSide::Right), -FORWARD_RIGHT);
    assert_eq!(io.motor(MotorSide::Left), -FORWARD_LEFT);
    assert_eq!(fw.board().aim_target(), BOT_FREQ);
    assert_ne!(fw.board().aim_phase(), AimPhase::Deactivated);
}
