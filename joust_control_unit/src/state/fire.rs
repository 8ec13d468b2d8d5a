//! Fire subsystem: feeder servo and launcher wheels.
//!
//! Each shot pushes the feeder out, holds for the feed time, pulls it back,
//! and waits the rearm time before the next shot. The rearm timeout fires
//! the next shot directly; nothing is re-posted to the queue.

use joust_common::consts::MAX_BALLS;
use joust_common::event::{Event, EventKind, ServiceId, TimerId};
use joust_common::hal::types::ServoChannel;
use tracing::{debug, info};

use crate::context::ServiceStatus;
use crate::error::ServiceFault;
use crate::framework::service::{Ctx, Service};

/// Feeder pushed into the launcher [µs].
pub const FEEDER_SHOOT_US: u16 = 970;
/// Feeder retracted [µs].
pub const FEEDER_RETRACT_US: u16 = 700;
/// Feeder hold time per shot [ticks].
pub const FEED_TICKS: u32 = 700;
/// Pause between retract and the next shot [ticks].
pub const REARM_TICKS: u32 = 700;
/// Launcher wheel duty while spinning.
pub const LAUNCHER_DUTY: u8 = 13;

/// Fire service.
#[derive(Debug)]
pub struct FireService {
    remaining: u16,
    launcher_on: bool,
}

impl Default for FireService {
    fn default() -> Self {
        Self {
            remaining: MAX_BALLS,
            launcher_on: false,
        }
    }
}

impl FireService {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn remaining(&self) -> u16 {
        self.remaining
    }

    fn launcher(&mut self, ctx: &mut Ctx<'_>, on: bool) {
        self.launcher_on = on;
        ctx.hal()
            .set_launcher_duty(if on { LAUNCHER_DUTY } else { 0 });
    }

    /// Fire the next of `count` balls.
    fn shoot(&mut self, count: u16, ctx: &mut Ctx<'_>) {
        self.remaining = count;
        if self.remaining > 0 {
            ctx.hal()
                .set_servo_pulse_width(ServoChannel::Feeder, FEEDER_SHOOT_US);
            ctx.init_timer(TimerId::ShootFeed, FEED_TICKS);
            self.remaining -= 1;
            debug!(remaining = self.remaining, "Ball fed");
        }
        if self.remaining == 0 {
            info!("Magazine empty, launcher stopped");
            self.launcher(ctx, false);
        }
    }
}

impl Service for FireService {
    fn id(&self) -> ServiceId {
        ServiceId::Fire
    }

    fn init(&mut self, ctx: &mut Ctx<'_>) -> Result<(), ServiceFault> {
        *self = Self::default();
        ctx.hal()
            .set_servo_pulse_width(ServoChannel::Feeder, FEEDER_RETRACT_US);
        self.launcher(ctx, false);
        Ok(())
    }

    fn run(&mut self, event: Event, ctx: &mut Ctx<'_>) -> Result<(), ServiceFault> {
        match event.kind {
            EventKind::ShootBall => self.shoot(event.param, ctx),
            EventKind::Timeout => match event.timer() {
                Some(TimerId::ShootFeed) => {
                    ctx.hal()
                        .set_servo_pulse_width(ServoChannel::Feeder, FEEDER_RETRACT_US);
                    if self.remaining > 0 {
                        ctx.init_timer(TimerId::FeederRearm, REARM_TICKS);
                    }
                }
                Some(TimerId::FeederRearm) => self.shoot(self.remaining, ctx),
                _ => {}
            },
            EventKind::ReloadBalls => {
                self.remaining = MAX_BALLS;
                debug!("Magazine reloaded");
            }
            EventKind::StartShootingMotors => self.launcher(ctx, true),
            EventKind::StopShootingMotors => self.launcher(ctx, false),
            _ => {}
        }
        Ok(())
    }

    fn status(&self) -> ServiceStatus {
        ServiceStatus::Fire {
            remaining: self.remaining,
            launcher_on: self.launcher_on,
        }
    }
}
