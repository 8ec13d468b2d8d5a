//! Aim subsystem: turret sweep and beacon alignment.
//!
//! The turret servo sweeps between its limits in fixed steps while the IR
//! checker reports which detectors see the armed beacon. A one-sided
//! sighting biases the sweep toward that side; both detectors stop the
//! sweep. Aligning on the bot beacon deploys the lance, and in round 3 fires
//! one volley.

use joust_common::consts::{BOT_FREQ, MAX_BALLS};
use joust_common::event::{Event, EventKind, ServiceId, TimerId};
use joust_common::hal::types::ServoChannel;
use tracing::{debug, info};

use super::drive;
use crate::context::ServiceStatus;
use crate::error::ServiceFault;
use crate::framework::service::{Ctx, Service};

/// Turret servo upper limit [µs].
pub const TURRET_MAX_US: u16 = 1500;
/// Turret servo lower limit [µs]; also the retracted rest position.
pub const TURRET_MIN_US: u16 = 590;
/// Turret rest position [µs].
pub const TURRET_INIT_US: u16 = 1485;
/// Sweep step per timer period [µs].
pub const SWEEP_STEP_US: i16 = 10;
/// Sweep timer period [ticks].
pub const SWEEP_TICKS: u32 = 12;
/// Round the bot-aligned volley is fired in.
pub const VOLLEY_ROUND: u8 = 3;
/// Delay before driving on after the volley [ticks].
pub const VOLLEY_DRIVE_DELAY: u32 = 3000;

/// Alignment phase.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AimPhase {
    #[default]
    Deactivated,
    Active,
    LeftAligned,
    RightAligned,
    Aligned,
}

/// Aim service.
#[derive(Debug)]
pub struct AimService {
    phase: AimPhase,
    target: u16,
    servo_us: u16,
    step: i16,
    /// Round the volley was last fired in; cleared on deactivation.
    volley_round: Option<u8>,
}

impl Default for AimService {
    fn default() -> Self {
        Self {
            phase: AimPhase::Deactivated,
            target: 0,
            servo_us: TURRET_INIT_US,
            step: SWEEP_STEP_US,
            volley_round: None,
        }
    }
}

impl AimService {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> AimPhase {
        self.phase
    }

    pub fn servo_us(&self) -> u16 {
        self.servo_us
    }

    fn set_phase(&mut self, next: AimPhase) {
        if self.phase != next {
            debug!(from = ?self.phase, to = ?next, "Aim phase");
            self.phase = next;
        }
    }

    fn arm(&mut self, target: u16, ctx: &mut Ctx<'_>) {
        self.target = target;
        self.set_phase(AimPhase::Active);
        ctx.init_timer(TimerId::AimSweep, SWEEP_TICKS);
    }

    /// Hold the turret at `pulse_us`, clamped to the servo limits. The next
    /// sweep starts from there.
    fn park(&mut self, pulse_us: u16, ctx: &mut Ctx<'_>) {
        self.servo_us = pulse_us.clamp(TURRET_MIN_US, TURRET_MAX_US);
        ctx.hal()
            .set_servo_pulse_width(ServoChannel::Turret, self.servo_us);
    }

    /// Advance the turret one step, reversing at either limit.
    fn sweep(&mut self, ctx: &mut Ctx<'_>) {
        match self.phase {
            AimPhase::LeftAligned => self.step = -SWEEP_STEP_US,
            AimPhase::RightAligned => self.step = SWEEP_STEP_US,
            _ => {}
        }
        let next = i32::from(self.servo_us) + i32::from(self.step);
        self.servo_us = if next >= i32::from(TURRET_MAX_US) {
            self.step = -SWEEP_STEP_US;
            TURRET_MAX_US
        } else if next <= i32::from(TURRET_MIN_US) {
            self.step = SWEEP_STEP_US;
            TURRET_MIN_US
        } else {
            next as u16
        };
        ctx.hal()
            .set_servo_pulse_width(ServoChannel::Turret, self.servo_us);
        ctx.init_timer(TimerId::AimSweep, SWEEP_TICKS);
    }

    /// Resume the sweep where it was stopped, or restart it.
    fn resume_sweep(&self, ctx: &mut Ctx<'_>) {
        ctx.start_timer(TimerId::AimSweep);
        if !ctx.timer_running(TimerId::AimSweep) {
            ctx.init_timer(TimerId::AimSweep, SWEEP_TICKS);
        }
    }

    fn aligned(&mut self, ctx: &mut Ctx<'_>) {
        let entering = self.phase != AimPhase::Aligned;
        self.set_phase(AimPhase::Aligned);
        ctx.stop_timer(TimerId::AimSweep);
        if self.target != BOT_FREQ {
            return;
        }
        if entering {
            ctx.signal(ServiceId::Lance, EventKind::DeployLance);
        }
        let round = ctx.board().round();
        if round == VOLLEY_ROUND && self.volley_round != Some(round) {
            self.volley_round = Some(round);
            info!(round, "Aligned on bot, firing volley");
            drive::stop(ctx.hal());
            ctx.post(ServiceId::Fire, Event::new(EventKind::ShootBall, MAX_BALLS));
            ctx.init_timer(TimerId::AimSearch, VOLLEY_DRIVE_DELAY);
        }
    }
}

impl Service for AimService {
    fn id(&self) -> ServiceId {
        ServiceId::Aim
    }

    fn init(&mut self, ctx: &mut Ctx<'_>) -> Result<(), ServiceFault> {
        *self = Self::default();
        ctx.hal()
            .set_servo_pulse_width(ServoChannel::Turret, self.servo_us);
        Ok(())
    }

    fn run(&mut self, event: Event, ctx: &mut Ctx<'_>) -> Result<(), ServiceFault> {
        use EventKind::*;

        if event.kind == ParkTurret {
            self.park(event.param, ctx);
            return Ok(());
        }

        if self.phase == AimPhase::Deactivated {
            if event.kind == StartAlign {
                self.arm(event.param, ctx);
            }
            return Ok(());
        }

        match event.kind {
            StopAligning => {
                self.set_phase(AimPhase::Deactivated);
                self.target = 0;
                self.volley_round = None;
                ctx.stop_timer(TimerId::AimSweep);
                let rest = if event.param == 1 {
                    TURRET_MIN_US
                } else {
                    TURRET_INIT_US
                };
                self.park(rest, ctx);
            }
            Timeout => match event.timer() {
                Some(TimerId::AimSweep) => self.sweep(ctx),
                Some(TimerId::AimSearch) => drive::forward(ctx.hal()),
                _ => {}
            },
            LeftOnly => {
                self.set_phase(AimPhase::LeftAligned);
                self.resume_sweep(ctx);
            }
            RightOnly => {
                self.set_phase(AimPhase::RightAligned);
                self.resume_sweep(ctx);
            }
            SenseBoth => self.aligned(ctx),
            SenseNone => {
                self.set_phase(AimPhase::Active);
                self.resume_sweep(ctx);
            }
            StartAlign => self.arm(event.param, ctx),
            _ => {}
        }
        Ok(())
    }

    fn status(&self) -> ServiceStatus {
        ServiceStatus::Aim {
            phase: self.phase,
            target: self.target,
            servo_us: self.servo_us,
        }
    }
}
