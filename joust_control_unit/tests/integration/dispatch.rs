//! Integration test: dispatcher behavior seen from outside the crate.
//!
//! Validates: side latch and reload mask, fault propagation, queue overflow,
//! unrouted events, and the cycle runner driving the assembled robot.

use std::sync::atomic::AtomicBool;

use joust_common::command::Side;
use joust_common::event::{Event, EventKind, ServiceId};
use joust_common::hal::types::DigitalPin;
use joust_control_unit::context::ServiceStatus;
use joust_control_unit::cycle::{CycleRunner, TickCounter};
use joust_control_unit::error::{FrameworkError, ServiceFault};
use joust_control_unit::framework::{Ctx, Framework, Service};
use joust_control_unit::state::fire::LAUNCHER_DUTY;
use joust_hal::drivers::simulation::SimulatedRobot;

use super::{FRAME_CYCLES, referee, robot, robot_on, run};

/// Fire stand-in that jams on every shot.
struct Jammed;

impl Service for Jammed {
    fn id(&self) -> ServiceId {
        ServiceId::Fire
    }

    fn init(&mut self, _ctx: &mut Ctx<'_>) -> Result<(), ServiceFault> {
        Ok(())
    }

    fn run(&mut self, event: Event, _ctx: &mut Ctx<'_>) -> Result<(), ServiceFault> {
        if event.is(EventKind::ShootBall) {
            return Err(ServiceFault::new("feeder jammed"));
        }
        Ok(())
    }

    fn status(&self) -> ServiceStatus {
        ServiceStatus::Fire {
            remaining: 0,
            launcher_on: false,
        }
    }
}

// ── Tests ───────────────────────────────────────────────────────────

#[test]
fn red_side_latches_and_reads_red_reload_bit() {
    let mut fw = robot_on(Side::Red);
    run(&mut fw, 1);
    assert_eq!(fw.board().side(), Side::Red);

    // Red reload bit with a WAIT command.
    referee(&mut fw, 0x10);
    assert!(fw.board().reload_requested());
}

#[test]
fn dark_side_ignores_red_reload_bit() {
    let mut fw = robot();
    referee(&mut fw, 0x10);
    assert_eq!(fw.board().side(), Side::Dark);
    assert!(!fw.board().reload_requested());

    referee(&mut fw, 0x40);
    assert!(fw.board().reload_requested());
}

#[test]
fn side_latch_survives_switch_release() {
    let mut fw = robot_on(Side::Red);
    run(&mut fw, 1);
    fw.hal_mut().io_mut().set_pin(DigitalPin::SideSelect, false);
    run(&mut fw, 10);
    assert_eq!(fw.board().side(), Side::Red);
}

#[test]
fn service_fault_surfaces_from_cycle() {
    let mut fw = Framework::new(SimulatedRobot::new(), 8);
    fw.register(Box::new(Jammed)).unwrap();
    fw.init().unwrap();
    fw.run_cycle(1).unwrap();

    assert!(fw.post(ServiceId::Fire, Event::new(EventKind::ShootBall, 5)));
    let err = fw.run_cycle(1).unwrap_err();
    assert!(matches!(
        err,
        FrameworkError::InternalFault {
            service: ServiceId::Fire,
            ..
        }
    ));
    assert!(err.to_string().contains("feeder jammed"));
    assert!(fw.is_registered(ServiceId::Fire));
}

#[test]
fn overflow_drops_newest_and_unrouted_are_counted() {
    let mut fw = Framework::new(SimulatedRobot::new(), 2);
    assert!(fw.post(ServiceId::Aim, Event::signal(EventKind::StartAlign)));
    assert!(fw.post(ServiceId::Aim, Event::signal(EventKind::SenseNone)));
    assert!(!fw.post(ServiceId::Aim, Event::signal(EventKind::SenseBoth)));
    assert_eq!(fw.queue().overflows(), 1);

    fw.run_cycle(1).unwrap();
    assert_eq!(fw.stats().unrouted, 2);
    assert_eq!(fw.queue().len(), 0);
}

#[test]
fn cycle_runner_drives_assembled_robot() {
    let ticks = TickCounter::new();
    let mut runner = CycleRunner::new(robot(), ticks.clone(), 1);
    for _ in 0..FRAME_CYCLES {
        ticks.add(1);
        runner.step().unwrap();
    }
    assert_eq!(runner.framework().hal().io().launcher_duty(), LAUNCHER_DUTY);
    assert_eq!(runner.stats().cycle_count, FRAME_CYCLES as u64);
    assert_eq!(runner.stats().ticks, FRAME_CYCLES as u64);

    let running = AtomicBool::new(true);
    let mut runner = runner.with_cycle_limit(Some(FRAME_CYCLES as u64 + 5));
    runner.run(&running).unwrap();
    assert_eq!(runner.stats().cycle_count, FRAME_CYCLES as u64 + 5);
}
