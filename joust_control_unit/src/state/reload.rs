//! Reload signaler: asks the referee for balls over the IR emitter.
//!
//! A request is a series of pulse bursts, one per reload period. The
//! emitter's interrupt side counts finished bursts; this service only reads
//! that counter and compares it with the value seen when the request began.

use joust_common::event::{Event, EventKind, ServiceId, TimerId};
use joust_common::hal::types::Indicators;
use tracing::{debug, info};

use crate::context::ServiceStatus;
use crate::error::ServiceFault;
use crate::framework::service::{Ctx, Service};

/// Pulses in one burst.
pub const PULSES_PER_BURST: u32 = 10;
/// Bursts in one reload request.
pub const BURSTS_PER_RELOAD: u32 = 5;
/// Reload period [ticks].
pub const RELOAD_TICKS: u32 = 3000;

/// Reload service.
#[derive(Debug, Default)]
pub struct ReloadService {
    baseline: u32,
    signalling: bool,
    bursts_sent: u32,
}

impl ReloadService {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_signalling(&self) -> bool {
        self.signalling
    }

    fn burst(&mut self, ctx: &mut Ctx<'_>) {
        ctx.hal().start_burst(PULSES_PER_BURST);
        ctx.init_timer(TimerId::Reload, RELOAD_TICKS);
    }
}

impl Service for ReloadService {
    fn id(&self) -> ServiceId {
        ServiceId::Reload
    }

    fn init(&mut self, ctx: &mut Ctx<'_>) -> Result<(), ServiceFault> {
        *self = Self::default();
        ctx.hal().stop_emitter();
        ctx.hal().set_indicator(Indicators::RELOAD, false);
        Ok(())
    }

    fn run(&mut self, event: Event, ctx: &mut Ctx<'_>) -> Result<(), ServiceFault> {
        match event.kind {
            EventKind::ReloadBalls => {
                self.baseline = ctx.hal().bursts_completed();
                self.bursts_sent = 0;
                self.signalling = true;
                info!("Requesting reload");
                ctx.hal().set_indicator(Indicators::RELOAD, true);
                self.burst(ctx);
            }
            EventKind::Timeout if self.signalling && event.is_timeout(TimerId::Reload) => {
                self.bursts_sent = ctx.hal().bursts_completed().wrapping_sub(self.baseline);
                if self.bursts_sent < BURSTS_PER_RELOAD {
                    debug!(bursts = self.bursts_sent, "Reload burst");
                    self.burst(ctx);
                } else {
                    info!(bursts = self.bursts_sent, "Reload request complete");
                    self.signalling = false;
                    ctx.hal().stop_emitter();
                    ctx.hal().set_indicator(Indicators::RELOAD, false);
                    ctx.signal(ServiceId::Fire, EventKind::StartShootingMotors);
                }
            }
            _ => {}
        }
        Ok(())
    }

    fn status(&self) -> ServiceStatus {
        ServiceStatus::Reload {
            signalling: self.signalling,
            bursts_sent: self.bursts_sent,
        }
    }
}
