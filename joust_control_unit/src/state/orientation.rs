//! Orientation: tape-based homing at the end of a charge.
//!
//! Each round first looks for the green tape; seeing it retargets red after
//! a short delay, and the red tape triggers the final homing move. If the
//! stop-moving failsafe or the pause timeout fires before any tape was
//! seen, a fixed homing move is made instead. Moves go forward after the
//! charging rounds (1 and 3) and backward otherwise.

use joust_common::consts::ONE_SEC;
use joust_common::event::{Event, EventKind, ServiceId, TimerId};
use joust_common::hal::types::TapeColor;
use tracing::{debug, info};

use super::drive;
use crate::context::ServiceStatus;
use crate::error::ServiceFault;
use crate::framework::service::{Ctx, Service};

/// Homing speed.
pub const HOMING_SPEED: i16 = 65;
/// Delay between seeing green and looking for red [ticks].
pub const GREEN_TO_RED_TICKS: u32 = 6 * ONE_SEC / 4;

/// Orientation service.
#[derive(Debug)]
pub struct OrientationService {
    target: TapeColor,
    not_yet_detected: bool,
}

impl Default for OrientationService {
    fn default() -> Self {
        Self {
            target: TapeColor::White,
            not_yet_detected: false,
        }
    }
}

impl OrientationService {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn target(&self) -> TapeColor {
        self.target
    }
}

/// Forward homing after the charging rounds.
fn charging_round(ctx: &Ctx<'_>) -> bool {
    matches!(ctx.board().round(), 1 | 3)
}

/// Straight homing move: `(forward_ticks, backward_ticks)` picked by round.
fn home(ctx: &mut Ctx<'_>, forward_ticks: u32, backward_ticks: u32) {
    if charging_round(ctx) {
        drive::timed_translate(ctx, HOMING_SPEED, forward_ticks);
    } else {
        drive::timed_translate(ctx, -HOMING_SPEED, backward_ticks);
    }
}

impl Service for OrientationService {
    fn id(&self) -> ServiceId {
        ServiceId::Orientation
    }

    fn init(&mut self, _ctx: &mut Ctx<'_>) -> Result<(), ServiceFault> {
        *self = Self::default();
        Ok(())
    }

    fn run(&mut self, event: Event, ctx: &mut Ctx<'_>) -> Result<(), ServiceFault> {
        match event.kind {
            EventKind::UpdateTargetColor => {
                self.target = TapeColor::from_param(event.param).unwrap_or_default();
                self.not_yet_detected = true;
                debug!(target = ?self.target, "Tape target");
            }
            EventKind::RightTape => {
                let seen = TapeColor::from_param(event.param);
                if seen != Some(self.target) {
                    return Ok(());
                }
                match self.target {
                    TapeColor::Red => {
                        info!("Red tape reached, homing");
                        self.not_yet_detected = false;
                        home(ctx, ONE_SEC * 3 / 8, ONE_SEC * 3 / 4);
                    }
                    TapeColor::Green => ctx.init_timer(TimerId::Tape, GREEN_TO_RED_TICKS),
                    _ => {}
                }
            }
            EventKind::Timeout => match event.timer() {
                Some(TimerId::Pause) if self.not_yet_detected => {
                    ctx.stop_timer(TimerId::StopMoving);
                    home(ctx, ONE_SEC / 4, ONE_SEC / 2);
                }
                Some(TimerId::Tape) => {
                    self.target = TapeColor::Red;
                    debug!("Tape target red");
                }
                Some(TimerId::StopMoving) if self.not_yet_detected => {
                    info!("Stop-moving failsafe, tape never seen");
                    self.not_yet_detected = false;
                    home(ctx, ONE_SEC / 4, ONE_SEC / 4);
                }
                _ => {}
            },
            _ => {}
        }
        Ok(())
    }

    fn status(&self) -> ServiceStatus {
        ServiceStatus::Orientation {
            target: self.target,
            awaiting_tape: self.not_yet_detected,
        }
    }
}
