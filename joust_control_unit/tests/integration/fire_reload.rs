//! Integration test: feeder cycling and the reload handshake.

use joust_common::command::MatchCommand;
use joust_common::consts::MAX_BALLS;
use joust_common::event::{Event, EventKind, ServiceId};
use joust_common::hal::types::{Indicators, ServoChannel};
use joust_control_unit::context::ServiceStatus;
use joust_control_unit::state::fire::{FEED_TICKS, FEEDER_RETRACT_US, FEEDER_SHOOT_US, LAUNCHER_DUTY, REARM_TICKS};
use joust_control_unit::state::reload::{BURSTS_PER_RELOAD, PULSES_PER_BURST, RELOAD_TICKS};

use super::{FRAME_CYCLES, Robot, command, in_round, robot, run};

/// Run `cycles` cycles, counting feeder pushes.
fn count_pushes(fw: &mut Robot, cycles: usize) -> usize {
    let mut pushes = 0;
    let mut prev = fw.hal().io().servo(ServoChannel::Feeder);
    for _ in 0..cycles {
        fw.run_cycle(1).unwrap();
        let now = fw.hal().io().servo(ServoChannel::Feeder);
        if now == FEEDER_SHOOT_US && prev != FEEDER_SHOOT_US {
            pushes += 1;
        }
        prev = now;
    }
    pushes
}

// ── Tests ───────────────────────────────────────────────────────────

#[test]
fn volley_feeds_every_ball_then_stops_launcher() {
    let mut fw = robot();
    run(&mut fw, FRAME_CYCLES);
    assert_eq!(fw.hal().io().launcher_duty(), LAUNCHER_DUTY);

    fw.post(ServiceId::Fire, Event::new(EventKind::ShootBall, MAX_BALLS));
    let cycle = (FEED_TICKS + REARM_TICKS) as usize;
    let pushes = count_pushes(&mut fw, MAX_BALLS as usize * cycle + 100);

    assert_eq!(pushes, MAX_BALLS as usize);
    assert_eq!(fw.board().balls_remaining(), 0);
    assert_eq!(fw.hal().io().launcher_duty(), 0);
    assert_eq!(fw.hal().io().servo(ServoChannel::Feeder), FEEDER_RETRACT_US);
}

#[test]
fn short_volley_fires_requested_count() {
    let mut fw = robot();
    run(&mut fw, FRAME_CYCLES);
    fw.post(ServiceId::Fire, Event::new(EventKind::ShootBall, 2));
    let pushes = count_pushes(&mut fw, 5 * (FEED_TICKS + REARM_TICKS) as usize);
    assert_eq!(pushes, 2);
}

#[test]
fn reload_request_signals_then_restarts_launcher() {
    let mut fw = in_round(2);
    command(&mut fw, MatchCommand::Recess);
    assert!(fw.hal().emitter_active());

    run(&mut fw, (BURSTS_PER_RELOAD * RELOAD_TICKS) as usize + 10);

    assert!(!fw.hal().emitter_active());
    assert!(!fw.hal().io().indicators().contains(Indicators::RELOAD));
    assert_eq!(fw.hal().io().launcher_duty(), LAUNCHER_DUTY);
    assert_eq!(
        fw.hal().pulses_requested(),
        u64::from(PULSES_PER_BURST * BURSTS_PER_RELOAD)
    );
    assert!(matches!(
        fw.board().status(ServiceId::Reload),
        Some(ServiceStatus::Reload {
            signalling: false,
            ..
        })
    ));
}
