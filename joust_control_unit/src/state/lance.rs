//! Lance: deploy, hold, retract.

use joust_common::consts::ONE_SEC;
use joust_common::event::{Event, EventKind, ServiceId, TimerId};
use joust_common::hal::types::ServoChannel;
use tracing::debug;

use crate::context::ServiceStatus;
use crate::error::ServiceFault;
use crate::framework::service::{Ctx, Service};

/// Lance extended [µs].
pub const LANCE_DEPLOY_US: u16 = 900;
/// Lance pulled in [µs].
pub const LANCE_RETRACT_US: u16 = 1600;
/// Time the lance stays out [ticks].
pub const DEPLOY_HOLD_TICKS: u32 = 3 * ONE_SEC;
/// Time for the retract stroke [ticks].
pub const RETRACT_TICKS: u32 = ONE_SEC;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LancePhase {
    #[default]
    Retracted,
    Deployed,
    /// Retracting; a new deploy is refused until the stroke completes.
    Inactive,
}

/// Lance service.
#[derive(Debug, Default)]
pub struct LanceService {
    phase: LancePhase,
}

impl LanceService {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> LancePhase {
        self.phase
    }
}

impl Service for LanceService {
    fn id(&self) -> ServiceId {
        ServiceId::Lance
    }

    fn init(&mut self, _ctx: &mut Ctx<'_>) -> Result<(), ServiceFault> {
        self.phase = LancePhase::Retracted;
        Ok(())
    }

    fn run(&mut self, event: Event, ctx: &mut Ctx<'_>) -> Result<(), ServiceFault> {
        let next = match (self.phase, event.kind) {
            (LancePhase::Retracted, EventKind::DeployLance) => {
                ctx.hal()
                    .set_servo_pulse_width(ServoChannel::Lance, LANCE_DEPLOY_US);
                ctx.init_timer(TimerId::Lance, DEPLOY_HOLD_TICKS);
                LancePhase::Deployed
            }
            (LancePhase::Deployed, EventKind::Timeout) => {
                ctx.hal()
                    .set_servo_pulse_width(ServoChannel::Lance, LANCE_RETRACT_US);
                ctx.init_timer(TimerId::Lance, RETRACT_TICKS);
                LancePhase::Inactive
            }
            (LancePhase::Inactive, EventKind::Timeout) => LancePhase::Retracted,
            (phase, _) => phase,
        };
        if next != self.phase {
            debug!(from = ?self.phase, to = ?next, "Lance");
            self.phase = next;
        }
        Ok(())
    }

    fn status(&self) -> ServiceStatus {
        ServiceStatus::Lance { phase: self.phase }
    }
}
